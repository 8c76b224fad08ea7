//! Locomotion: speed blending, поворот, прыжок, гравитация
//!
//! Тик агента:
//! 1. Probe - grounding probe (physics backend)
//! 2. Gravity - jump/gravity
//! 3. Integrate - скорость + поворот → displacement
//! 4. Apply - kinematic move (physics backend)

use bevy::prelude::*;

pub mod components;
pub mod integrator;
pub mod systems;

#[cfg(test)]
mod integrator_tests;

pub use components::*;
pub use integrator::{jump_velocity, smooth_damp_angle, JumpOutcome};

use crate::SimulationSet;

/// Шаги locomotion внутри `SimulationSet::Locomotion`
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionStep {
    Probe,
    Gravity,
    Integrate,
    Apply,
}

pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                LocomotionStep::Probe,
                LocomotionStep::Gravity,
                LocomotionStep::Integrate,
                LocomotionStep::Apply,
            )
                .chain()
                .in_set(SimulationSet::Locomotion),
        )
        .add_systems(
            FixedUpdate,
            (
                systems::gate_input.in_set(SimulationSet::Triggers),
                systems::jump_and_gravity.in_set(LocomotionStep::Gravity),
                systems::integrate_locomotion.in_set(LocomotionStep::Integrate),
            ),
        );
    }
}
