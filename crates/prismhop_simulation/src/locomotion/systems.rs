//! Locomotion systems (FixedUpdate)

use bevy::prelude::*;

use super::components::{KinematicMotion, LocomotionConfig, LocomotionState, MovementInput};
use super::integrator::{step_jump_and_gravity, step_move};
use crate::camera::CameraOrbit;
use crate::components::{Agent, ControlState, JumpBudget, LifeState};
use crate::signals::{AnimationSignals, AudioCue, AudioCueEvent};
use crate::world_reset::ChallengeRules;

/// Система: input gate
///
/// Пока lifecycle держит `input_enabled == false` (или run закончен),
/// агент видит нейтральный input; защёлки jump/restart сбрасываются.
pub fn gate_input(mut agents: Query<(&ControlState, &mut MovementInput), With<Agent>>) {
    for (control, mut input) in agents.iter_mut() {
        if !control.accepts_input() && *input != input.neutral() {
            *input = input.neutral();
        }
    }
}

/// Система: прыжок и гравитация
///
/// Мёртвый агент не тикает (ни гравитации, ни таймеров).
pub fn jump_and_gravity(
    mut agents: Query<
        (
            Entity,
            &LocomotionConfig,
            &mut LocomotionState,
            &mut MovementInput,
            &mut AnimationSignals,
            &mut JumpBudget,
            &LifeState,
        ),
        With<Agent>,
    >,
    rules: Res<ChallengeRules>,
    mut cues: EventWriter<AudioCueEvent>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (agent, config, mut state, mut input, mut signals, mut budget, life) in agents.iter_mut() {
        if !life.alive {
            continue;
        }

        let jump_allowed = !rules.limited_jumps || budget.remaining > 0;
        let mut jump_requested = input.jump;

        let outcome = step_jump_and_gravity(
            &mut state,
            config,
            &mut jump_requested,
            jump_allowed,
            &mut signals,
            delta,
        );

        if input.jump != jump_requested {
            input.jump = jump_requested;
        }

        if outcome.jumped {
            if rules.limited_jumps {
                budget.remaining = budget.remaining.saturating_sub(1);
            }
            cues.write(AudioCueEvent {
                agent,
                cue: AudioCue::Jump,
            });
        }
    }
}

/// Система: горизонтальное движение → displacement
///
/// Yaw камеры берётся с прошлого тика (камера обновляется после движения).
pub fn integrate_locomotion(
    mut agents: Query<
        (
            &LocomotionConfig,
            &mut LocomotionState,
            &MovementInput,
            &mut KinematicMotion,
            &mut Transform,
            &mut AnimationSignals,
            &CameraOrbit,
            &LifeState,
        ),
        With<Agent>,
    >,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (config, mut state, input, mut motion, mut transform, mut signals, camera, life) in agents.iter_mut() {
        if !life.alive {
            continue;
        }

        let current_speed = motion.horizontal_speed();
        let displacement = step_move(
            &mut state,
            config,
            input,
            current_speed,
            camera.yaw,
            &mut signals,
            delta,
        );

        transform.rotation = Quat::from_rotation_y(state.facing_yaw.to_radians());
        motion.displacement = displacement;
    }
}
