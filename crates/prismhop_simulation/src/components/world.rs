//! Компоненты объектов уровня: collectibles, checkpoints, switches, movers

use bevy::ecs::component::HookContext;
use bevy::ecs::world::DeferredWorld;
use bevy::prelude::*;

/// Активен ли объект в мире (аналог show/hide: подобранный jewel, нажатый switch)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Interactable {
    pub active: bool,
}

impl Default for Interactable {
    fn default() -> Self {
        Self { active: true }
    }
}

/// Collectible (jewel)
///
/// `id` - стабильное имя, по нему UI включает/выключает слот.
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component)]
#[require(Interactable)]
pub struct Collectible {
    pub id: String,
}

impl Collectible {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Checkpoint marker
///
/// `is_final` - финиш уровня: после касания input больше не принимается.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct CheckpointMarker {
    pub is_final: bool,
}

/// Boss switch marker (нажимается касанием, восстанавливается boss restart'ом)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Interactable)]
pub struct BossSwitch;

/// Исходная поза timed-motion hazard'а без собственного state machine
/// (moving spikes и т.п.): respawn возвращает его сюда.
///
/// `pose` копируется из Transform сущности при добавлении компонента.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[component(on_add = capture_original_pose)]
pub struct OriginalPose {
    pub pose: Transform,
}

fn capture_original_pose(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
    let Some(pose) = world.get::<Transform>(entity).copied() else {
        return;
    };
    if let Some(mut original) = world.get_mut::<OriginalPose>(entity) {
        original.pose = pose;
    }
}
