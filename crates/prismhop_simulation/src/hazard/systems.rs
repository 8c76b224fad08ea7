//! Hazard systems (FixedUpdate, SimulationSet::Hazards)
//!
//! Порядок внутри тика: contacts → due шаги scheduler'а → motion.
//! Шаг BeginMoving, сработавший в этом тике, уже двигает платформу в этом же тике.

use bevy::prelude::*;

use super::components::{apply_local_motion, HazardState, HazardStep, HazardTrigger, MovingHazard};
use crate::contact::HazardContact;
use crate::scheduler::DeferredScheduler;

/// Система: касание агента → запуск отложенной последовательности
///
/// Только из Waiting. Повторные касания (Moving/Done или уже запланировано)
/// ничего не меняют и таймер не перезапускают.
pub fn handle_hazard_contacts(
    mut contacts: EventReader<HazardContact>,
    hazards: Query<&HazardTrigger>,
    mut scheduler: ResMut<DeferredScheduler<HazardStep>>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs_f64();

    for contact in contacts.read() {
        let Ok(trigger) = hazards.get(contact.hazard) else {
            continue;
        };

        if !trigger.is_waiting() || scheduler.is_active(contact.hazard) {
            continue;
        }

        scheduler.schedule(contact.hazard, HazardStep::BeginMoving, now + trigger.delay as f64);
        crate::log(&format!(
            "Hazard {:?}: touched by {:?}, moving in {:.2}s",
            contact.hazard, contact.agent, trigger.delay
        ));
    }
}

/// Система: исполнение due шагов
///
/// Каждый шаг перечитывает state: шаг, чей hazard уже не в ожидаемом
/// состоянии, ничего не ломает.
pub fn advance_hazard_sequences(
    mut hazards: Query<(&mut HazardTrigger, &mut Transform)>,
    mut scheduler: ResMut<DeferredScheduler<HazardStep>>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs_f64();

    for (hazard, step) in scheduler.drain_due(now) {
        let Ok((mut trigger, mut transform)) = hazards.get_mut(hazard) else {
            continue;
        };

        match step {
            HazardStep::BeginMoving => {
                if trigger.state != HazardState::Waiting {
                    continue;
                }
                trigger.state = HazardState::Moving;
                scheduler.schedule(
                    hazard,
                    HazardStep::SettleOrRevert,
                    now + trigger.active_duration as f64,
                );
                crate::log(&format!("Hazard {:?}: Waiting → Moving", hazard));
            }
            HazardStep::SettleOrRevert => {
                if trigger.state == HazardState::Moving {
                    trigger.state = HazardState::Done;
                    crate::log(&format!("Hazard {:?}: Moving → Done", hazard));
                } else {
                    *transform = trigger.original;
                    crate::log(&format!(
                        "Hazard {:?}: not moving at settle ({:?}), pose reverted",
                        hazard, trigger.state
                    ));
                }
            }
        }
    }
}

/// Система: непрерывное движение Moving hazard'ов
pub fn apply_hazard_motion(mut hazards: Query<(&HazardTrigger, &mut Transform)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for (trigger, mut transform) in hazards.iter_mut() {
        if trigger.state == HazardState::Moving {
            apply_local_motion(&mut transform, trigger.translation_rate, trigger.rotation_rate, delta);
        }
    }
}

/// Система: moving spikes
pub fn apply_mover_motion(mut movers: Query<(&MovingHazard, &mut Transform)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for (mover, mut transform) in movers.iter_mut() {
        apply_local_motion(&mut transform, mover.translation_rate, mover.rotation_rate, delta);
    }
}
