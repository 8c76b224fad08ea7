//! Death → respawn sequencer
//!
//! Фазы:
//! 1. Агент мёртв, input выключен (звук смерти если засчитывается)
//! 2. Не instant: флаг "dying", ждём `dying_feedback`
//! 3. Default layer, флаг "dying" снят
//! 4. Таймер жизни и бюджет прыжков заново; засчитанная смерть → счётчик,
//!    при one-life ещё и откат уровня на старт
//! 5. Reset pass × `reset_passes` с паузой `pass_interval` после каждого
//! 6. Агент жив, input включён
//!
//! Одна последовательность на агента: DeathRequested пока она идёт игнорируется.

use bevy::prelude::*;

use super::components::{DeathRequested, LifecycleConfig, LifecycleStep};
use crate::components::{Agent, AgentLayer, ColorState, ControlState, HeldInventory, JumpBudget, LifeState, PaintColor};
use crate::locomotion::{KinematicMotion, LocomotionState};
use crate::scheduler::DeferredScheduler;
use crate::signals::{AnimationSignals, AudioCue, AudioCueEvent, ColorChanged, DeathCounted};
use crate::world_reset::{set_agent_color, WorldResetRegistry, ZoneTracker};

/// Система: фазы 1-2
///
/// Instant смерть ставит AfterDyingFeedback на "сейчас" - `advance_lifecycle`
/// (следующая в цепочке) исполняет его в этом же тике.
pub fn start_lifecycle(
    mut requests: EventReader<DeathRequested>,
    mut agents: Query<(&mut LifeState, &mut ControlState, &mut AnimationSignals), With<Agent>>,
    mut scheduler: ResMut<DeferredScheduler<LifecycleStep>>,
    mut zones: ResMut<ZoneTracker>,
    config: Res<LifecycleConfig>,
    mut cues: EventWriter<AudioCueEvent>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs_f64();

    for request in requests.read() {
        let agent = request.agent;
        let Ok((mut life, mut control, mut signals)) = agents.get_mut(agent) else {
            continue;
        };

        if scheduler.is_active(agent) || !life.alive {
            crate::log(&format!(
                "Lifecycle {:?}: {:?} ignored, respawn already in progress",
                agent, request.cause
            ));
            continue;
        }

        // Фаза 1
        life.alive = false;
        control.input_enabled = false;
        if request.cause.counted() {
            cues.write(AudioCueEvent {
                agent,
                cue: AudioCue::Death,
            });
        }
        if request.cause.counts_zone_death() {
            zones.record_death();
        }
        crate::log_info(&format!("Lifecycle {:?}: died ({:?})", agent, request.cause));

        // Фаза 2
        let resume_at = if request.cause.instant() {
            now
        } else {
            signals.dying = true;
            now + config.dying_feedback as f64
        };
        scheduler.schedule(
            agent,
            LifecycleStep::AfterDyingFeedback {
                cause: request.cause,
            },
            resume_at,
        );
    }
}

/// Система: фазы 3-6
pub fn advance_lifecycle(
    mut agents: Query<
        (
            &mut LifeState,
            &mut ControlState,
            &mut AnimationSignals,
            &mut AgentLayer,
            &mut ColorState,
            &mut HeldInventory,
            &mut JumpBudget,
            &mut Transform,
            &mut LocomotionState,
            &mut KinematicMotion,
        ),
        With<Agent>,
    >,
    mut registry: WorldResetRegistry,
    mut scheduler: ResMut<DeferredScheduler<LifecycleStep>>,
    config: Res<LifecycleConfig>,
    mut death_counted: EventWriter<DeathCounted>,
    mut color_changes: EventWriter<ColorChanged>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs_f64();

    for (agent, step) in scheduler.drain_due(now) {
        let Ok((
            mut life,
            mut control,
            mut signals,
            mut layer,
            mut color,
            mut held,
            mut budget,
            mut transform,
            mut locomotion,
            mut motion,
        )) = agents.get_mut(agent)
        else {
            continue;
        };

        let remaining = match step {
            LifecycleStep::AfterDyingFeedback { cause } => {
                // Фаза 3
                *layer = AgentLayer::default();
                signals.dying = false;

                // Фаза 4
                registry.clock.restart_life();
                budget.remaining = registry.rules.jumps_per_life();
                if cause.counted() {
                    registry.deaths.total += 1;
                    death_counted.write(DeathCounted {
                        agent,
                        total: registry.deaths.total,
                    });

                    if registry.rules.one_life {
                        registry.zones.reset_timers();
                        registry.checkpoint.reset_to_start();
                        registry.clock.run_elapsed = 0.0;
                        registry.reveal_all_collectibles();
                        crate::log_info(&format!("Lifecycle {:?}: one-life rule, level restarted", agent));
                    }
                }

                config.reset_passes.max(1)
            }
            LifecycleStep::ResetPass { remaining } => remaining,
            LifecycleStep::Finish => {
                // Фаза 6
                life.alive = true;
                control.input_enabled = true;
                crate::log_info(&format!(
                    "Lifecycle {:?}: respawned at {:?}",
                    agent, transform.translation
                ));
                continue;
            }
        };

        // Фаза 5
        let released = registry.release_held(&mut held);
        set_agent_color(agent, PaintColor::Neutral, &mut color, &mut layer, &mut color_changes);
        registry.restart_boss();
        transform.translation = registry.respawn_position();
        locomotion.vertical_velocity = 0.0;
        *motion = KinematicMotion::default();
        let hazards = registry.reset_hazards();
        crate::log(&format!(
            "Lifecycle {:?}: reset pass ({} left), released {} items, reset {} hazards",
            agent,
            remaining - 1,
            released,
            hazards
        ));

        let next = if remaining > 1 {
            LifecycleStep::ResetPass {
                remaining: remaining - 1,
            }
        } else {
            LifecycleStep::Finish
        };
        scheduler.schedule(agent, next, now + config.pass_interval as f64);
    }
}
