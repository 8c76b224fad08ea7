//! Timed hazards: trapdoor state machine + moving spikes
//!
//! Отложенные шаги живут в `DeferredScheduler<HazardStep>` (ключ = hazard entity).
//! Reset (`ResetHazard`, `reset_hazard`) отменяет их атомарно до конца тика.

use bevy::ecs::system::Command;
use bevy::prelude::*;

pub mod components;
pub mod systems;


pub use components::*;
pub use systems::*;

use crate::scheduler::DeferredScheduler;
use crate::SimulationSet;

/// Reset одного hazard'а: отмена шагов, исходная поза, Waiting
///
/// Безопасен из любого состояния (в т.ч. Moving и Done).
pub fn reset_hazard(
    hazard: Entity,
    trigger: &mut HazardTrigger,
    transform: &mut Transform,
    scheduler: &mut DeferredScheduler<HazardStep>,
) {
    let cancelled = scheduler.cancel(hazard);
    let previous = trigger.state;
    trigger.restore(transform);

    if cancelled || previous != HazardState::Waiting {
        crate::log(&format!(
            "Hazard {:?}: reset from {:?} (pending cancelled: {})",
            hazard, previous, cancelled
        ));
    }
}

/// Command: reset hazard'а снаружи систем (tools, тесты)
#[derive(Debug, Clone, Copy)]
pub struct ResetHazard(pub Entity);

impl Command for ResetHazard {
    fn apply(self, world: &mut World) {
        let hazard = self.0;
        let Ok(entity) = world.get_entity(hazard) else {
            return;
        };
        let (Some(mut trigger), Some(mut transform)) =
            (entity.get::<HazardTrigger>().copied(), entity.get::<Transform>().copied())
        else {
            return;
        };

        let mut scheduler = world.resource_mut::<DeferredScheduler<HazardStep>>();
        reset_hazard(hazard, &mut trigger, &mut transform, &mut scheduler);

        world.entity_mut(hazard).insert((trigger, transform));
    }
}

pub struct HazardPlugin;

impl Plugin for HazardPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DeferredScheduler<HazardStep>>()
            .register_type::<HazardTrigger>()
            .add_systems(
                FixedUpdate,
                (
                    handle_hazard_contacts,
                    advance_hazard_sequences,
                    (apply_hazard_motion, apply_mover_motion),
                )
                    .chain()
                    .in_set(SimulationSet::Hazards),
            );
    }
}
