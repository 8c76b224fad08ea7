//! Rapier backend (bevy_rapier3d)
//!
//! Overlap через query pipeline, movement через KinematicCharacterController,
//! contacts через CollisionEvent::Started. `RapierPhysicsPlugin` добавляется
//! снаружи (игровой клиент), здесь только мост к capabilities.
//!
//! `AgentLayer` агента → memberships его `CollisionGroups`; кто сквозь кого
//! проходит решают filters геометрии уровня.

use std::cell::Cell;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::grounding::apply_ground_probe;
use super::OverlapFn;
use crate::components::{Agent, AgentLayer, LifeState};
use crate::contact::{emit_contact_pair, ContactEvent, ContactTag};
use crate::locomotion::{KinematicMotion, LocomotionConfig, LocomotionState, LocomotionStep};
use crate::signals::AnimationSignals;
use crate::SimulationSet;

/// Фильтр overlap запроса: только solid коллайдеры на `layer_mask`, без самого агента
pub fn ground_filter(layer_mask: u32, agent: Entity) -> QueryFilter<'static> {
    QueryFilter::new()
        .exclude_sensors()
        .exclude_collider(agent)
        .groups(CollisionGroups::new(
            Group::ALL,
            Group::from_bits_truncate(layer_mask),
        ))
}

/// Система: grounding probe через Rapier
pub fn rapier_ground_check(
    rapier: ReadRapierContext,
    mut agents: Query<
        (
            Entity,
            &Transform,
            &LocomotionConfig,
            &mut LocomotionState,
            &mut AnimationSignals,
            &LifeState,
        ),
        With<Agent>,
    >,
) {
    let Ok(context) = rapier.single() else {
        return;
    };

    for (agent, transform, config, mut state, mut signals, life) in agents.iter_mut() {
        if !life.alive {
            continue;
        }

        let overlap = OverlapFn(|point: Vec3, radius: f32, mask: u32| {
            let ball = Collider::ball(radius);
            let hit = Cell::new(false);
            context.intersect_shape(point, Quat::IDENTITY, &*ball.raw, ground_filter(mask, agent), |_| {
                hit.set(true);
                false
            });
            hit.get()
        });

        apply_ground_probe(&overlap, transform, config, &mut state, &mut signals);
    }
}

/// Система: layer агента (меняется с цветом) → memberships коллайдера
///
/// Filters не трогаем: матрицу задаёт геометрия уровня.
pub fn rapier_sync_agent_layers(
    mut commands: Commands,
    mut agents: Query<
        (Entity, &AgentLayer, Option<&mut CollisionGroups>),
        (With<Agent>, Or<(Changed<AgentLayer>, Added<CollisionGroups>)>),
    >,
) {
    for (agent, layer, groups) in agents.iter_mut() {
        let memberships = Group::from_bits_truncate(layer.bits);
        match groups {
            Some(mut groups) => {
                if groups.memberships != memberships {
                    groups.memberships = memberships;
                }
            }
            None => {
                commands
                    .entity(agent)
                    .insert(CollisionGroups::new(memberships, Group::ALL));
            }
        }
    }
}

/// Система: displacement → KinematicCharacterController
pub fn rapier_submit_moves(
    mut agents: Query<(&mut KinematicMotion, &mut KinematicCharacterController), With<Agent>>,
) {
    for (mut motion, mut controller) in agents.iter_mut() {
        let displacement = std::mem::take(&mut motion.displacement);
        controller.translation = Some(displacement);
    }
}

/// Система: фактический сдвиг прошлого physics step → last_velocity
pub fn rapier_read_move_output(
    mut agents: Query<(&mut KinematicMotion, &KinematicCharacterControllerOutput), With<Agent>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    if delta <= 0.0 {
        return;
    }

    for (mut motion, output) in agents.iter_mut() {
        motion.last_velocity = output.effective_translation / delta;
    }
}

/// Система: CollisionEvent::Started → ContactEvent
pub fn rapier_contacts(
    mut collisions: EventReader<CollisionEvent>,
    tags: Query<&ContactTag>,
    mut writer: EventWriter<ContactEvent>,
) {
    for collision in collisions.read() {
        if let CollisionEvent::Started(a, b, _) = collision {
            emit_contact_pair(*a, *b, &tags, &mut writer);
        }
    }
}

/// Rapier backend plugin
pub struct RapierBackendPlugin;

impl Plugin for RapierBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                rapier_contacts
                    .in_set(SimulationSet::Contacts)
                    .before(crate::contact::dispatch_contacts),
                (rapier_sync_agent_layers, rapier_read_move_output, rapier_ground_check)
                    .chain()
                    .in_set(LocomotionStep::Probe),
                rapier_submit_moves.in_set(LocomotionStep::Apply),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision_layers::{LAYER_AGENT, LAYER_AGENT_BLUE, LAYER_BLUE};
    use crate::components::PaintColor;

    #[test]
    fn test_ground_filter_uses_layer_mask() {
        let filter = ground_filter(LAYER_BLUE, Entity::from_raw(1));
        let groups = filter.groups.expect("groups set");

        assert_eq!(groups.filters, Group::from_bits_truncate(LAYER_BLUE));
        assert_eq!(filter.exclude_collider, Some(Entity::from_raw(1)));
    }

    fn memberships(world: &World, agent: Entity) -> Option<Group> {
        world.get::<CollisionGroups>(agent).map(|groups| groups.memberships)
    }

    #[test]
    fn test_agent_layer_drives_collision_memberships() {
        let mut world = World::new();
        let mut schedule = Schedule::default();
        schedule.add_systems(rapier_sync_agent_layers);

        let agent = world
            .spawn((
                Agent,
                AgentLayer::for_color(PaintColor::Blue),
                CollisionGroups::default(),
            ))
            .id();
        schedule.run(&mut world);
        assert_eq!(memberships(&world, agent), Some(Group::from_bits_truncate(LAYER_AGENT_BLUE)));
        assert_eq!(world.get::<CollisionGroups>(agent).map(|g| g.filters), Some(Group::ALL));

        // Respawn сбрасывает цвет → нейтральный layer
        world.entity_mut(agent).insert(AgentLayer::default());
        schedule.run(&mut world);
        assert_eq!(memberships(&world, agent), Some(Group::from_bits_truncate(LAYER_AGENT)));
    }

    #[test]
    fn test_agent_without_groups_gets_them() {
        let mut world = World::new();
        let mut schedule = Schedule::default();
        schedule.add_systems(rapier_sync_agent_layers);

        let agent = world.spawn((Agent, AgentLayer::for_color(PaintColor::Blue))).id();
        schedule.run(&mut world);

        assert_eq!(memberships(&world, agent), Some(Group::from_bits_truncate(LAYER_AGENT_BLUE)));
    }
}
