//! Lifecycle: смерть агента и respawn
//!
//! Запросы (`DeathRequested`) приходят из contact dispatch, restart input,
//! лимита времени и первого spawn'а. Последовательность фаз - отложенные шаги
//! в `DeferredScheduler<LifecycleStep>` (ключ = agent entity).

use bevy::prelude::*;

pub mod components;
pub mod sequencer;
pub mod triggers;

pub use components::*;
pub use sequencer::{advance_lifecycle, start_lifecycle};
pub use triggers::{request_initial_spawn, restart_from_input, time_limit_check};

use crate::locomotion::systems::gate_input;
use crate::scheduler::DeferredScheduler;
use crate::SimulationSet;

pub struct LifecyclePlugin;

impl Plugin for LifecyclePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DeathRequested>()
            .init_resource::<DeferredScheduler<LifecycleStep>>()
            .init_resource::<LifecycleConfig>()
            .register_type::<LifecycleConfig>()
            .add_systems(
                FixedUpdate,
                (
                    (request_initial_spawn, restart_from_input, time_limit_check)
                        .after(gate_input)
                        .in_set(SimulationSet::Triggers),
                    (start_lifecycle, advance_lifecycle)
                        .chain()
                        .in_set(SimulationSet::Lifecycle),
                ),
            );
    }
}
