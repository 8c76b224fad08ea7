//! Headless physics backend
//!
//! Axis-aligned коллайдеры без broad-phase: хватает для тестов, headless
//! прогонов и CI. Вращение коллайдеров игнорируется.
//!
//! - Overlap: sphere vs AABB
//! - Kinematic move: прямой сдвиг + snap на верх solid коллайдера при падении сквозь него;
//!   коллайдер держит только агентов, чей layer есть в его `blocks`
//! - Contacts: AABB агента vs AABB коллайдеров, событие только на enter

use bevy::prelude::*;

use super::grounding::apply_ground_probe;
use super::OverlapQuery;
use crate::collision_layers::AGENT_LAYERS;
use crate::components::{Agent, AgentLayer, Interactable, LifeState};
use crate::contact::{emit_contact_pair, ActiveContacts, ContactEvent, ContactTag};
use crate::locomotion::{KinematicMotion, LocomotionConfig, LocomotionState, LocomotionStep};
use crate::signals::AnimationSignals;
use crate::SimulationSet;

/// Половина габаритов агента для contact детекции (pivot агента - у ступней)
pub const AGENT_HALF_EXTENTS: Vec3 = Vec3::new(0.28, 0.9, 0.28);

/// Допуск contact детекции: стоящий на платформе агент её "касается"
pub const CONTACT_SKIN: f32 = 0.05;

/// Axis-aligned коллайдер (центр = Transform.translation)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct HeadlessCollider {
    pub half_extents: Vec3,
    /// Битовая маска слоёв (см. `collision_layers`)
    pub layers: u32,
    /// Trigger-only объём: не земля, не препятствие, только contacts
    pub sensor: bool,
    /// Layer'ы агентов, которых коллайдер держит (остальные проходят насквозь)
    pub blocks: u32,
}

impl HeadlessCollider {
    pub fn solid(half_extents: Vec3, layers: u32) -> Self {
        Self {
            half_extents,
            layers,
            sensor: false,
            blocks: AGENT_LAYERS,
        }
    }

    /// Цветная платформа: держит только агентов с layer'ом из `agent_layers`
    pub fn blocking(mut self, agent_layers: u32) -> Self {
        self.blocks = agent_layers;
        self
    }

    pub fn blocks_agent(&self, agent_layer: u32) -> bool {
        !self.sensor && self.blocks & agent_layer != 0
    }

    pub fn sensor(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            layers: 0,
            sensor: true,
            blocks: 0,
        }
    }

    pub fn top(&self, center: Vec3) -> f32 {
        center.y + self.half_extents.y
    }
}

/// Sphere vs AABB (closest point)
pub fn sphere_overlaps_aabb(point: Vec3, radius: f32, center: Vec3, half_extents: Vec3) -> bool {
    let closest = point.clamp(center - half_extents, center + half_extents);
    closest.distance_squared(point) <= radius * radius
}

/// AABB vs AABB с допуском `skin`
pub fn aabb_overlaps(a_center: Vec3, a_half: Vec3, b_center: Vec3, b_half: Vec3, skin: f32) -> bool {
    let gap = (a_center - b_center).abs() - (a_half + b_half);
    gap.x <= skin && gap.y <= skin && gap.z <= skin
}

/// Снимок solid коллайдеров уровня для overlap запросов (один на тик)
#[derive(Debug, Clone, Default)]
pub struct HeadlessOverlap {
    colliders: Vec<(Vec3, HeadlessCollider)>,
}

impl HeadlessOverlap {
    pub fn new(colliders: impl IntoIterator<Item = (Vec3, HeadlessCollider)>) -> Self {
        Self {
            colliders: colliders
                .into_iter()
                .filter(|(_, collider)| !collider.sensor)
                .collect(),
        }
    }
}

impl OverlapQuery for HeadlessOverlap {
    fn overlap_sphere(&self, point: Vec3, radius: f32, layer_mask: u32) -> bool {
        self.colliders.iter().any(|(center, collider)| {
            collider.layers & layer_mask != 0
                && sphere_overlaps_aabb(point, radius, *center, collider.half_extents)
        })
    }
}

/// Система: grounding probe через headless коллайдеры
pub fn headless_ground_check(
    mut agents: Query<
        (
            &Transform,
            &LocomotionConfig,
            &mut LocomotionState,
            &mut AnimationSignals,
            &LifeState,
        ),
        With<Agent>,
    >,
    colliders: Query<(Entity, &Transform, &HeadlessCollider), Without<Agent>>,
) {
    let overlap = HeadlessOverlap::new(
        colliders
            .iter()
            .map(|(_, transform, collider)| (transform.translation, *collider)),
    );

    for (transform, config, mut state, mut signals, life) in agents.iter_mut() {
        if !life.alive {
            continue;
        }
        apply_ground_probe(&overlap, transform, config, &mut state, &mut signals);
    }
}

/// Куда агент реально сдвинется: не проваливаемся сквозь верх solid коллайдера
pub fn resolve_headless_move<'a>(
    from: Vec3,
    displacement: Vec3,
    agent_layer: u32,
    solids: impl Iterator<Item = (Vec3, &'a HeadlessCollider)>,
) -> Vec3 {
    let mut to = from + displacement;
    if displacement.y >= 0.0 {
        return to;
    }

    for (center, collider) in solids {
        if !collider.blocks_agent(agent_layer) {
            continue;
        }
        let top = collider.top(center);
        let inside_xz = (to.x - center.x).abs() <= collider.half_extents.x
            && (to.z - center.z).abs() <= collider.half_extents.z;

        if inside_xz && from.y >= top - 1e-4 && to.y < top {
            to.y = top;
        }
    }

    to
}

/// Система: kinematic move (headless)
///
/// Потребляет `KinematicMotion::displacement`, пишет `last_velocity`
/// (из неё locomotion берёт текущую горизонтальную скорость).
pub fn headless_apply_moves(
    mut agents: Query<(&mut Transform, &mut KinematicMotion, &AgentLayer), With<Agent>>,
    colliders: Query<(Entity, &Transform, &HeadlessCollider), Without<Agent>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut motion, layer) in agents.iter_mut() {
        let displacement = std::mem::take(&mut motion.displacement);
        let from = transform.translation;
        let to = resolve_headless_move(
            from,
            displacement,
            layer.bits,
            colliders.iter().map(|(_, t, c)| (t.translation, c)),
        );

        transform.translation = to;
        motion.last_velocity = if delta > 0.0 { (to - from) / delta } else { Vec3::ZERO };
    }
}

/// Система: contacts (только enter, как trigger enter)
///
/// Неактивные объекты (подобранный jewel, нажатый switch) не касаются.
pub fn headless_detect_contacts(
    mut agents: Query<(Entity, &Transform, &mut ActiveContacts), With<Agent>>,
    colliders: Query<(Entity, &Transform, &HeadlessCollider, Option<&Interactable>), Without<Agent>>,
    tags: Query<&ContactTag>,
    mut writer: EventWriter<ContactEvent>,
) {
    for (agent, transform, mut active) in agents.iter_mut() {
        let agent_center = transform.translation + Vec3::Y * AGENT_HALF_EXTENTS.y;

        let touching: Vec<Entity> = colliders
            .iter()
            .filter(|(_, _, _, interactable)| interactable.map(|i| i.active).unwrap_or(true))
            .filter(|(_, collider_transform, collider, _)| {
                aabb_overlaps(
                    agent_center,
                    AGENT_HALF_EXTENTS,
                    collider_transform.translation,
                    collider.half_extents,
                    CONTACT_SKIN,
                )
            })
            .map(|(entity, ..)| entity)
            .collect();

        for &other in &touching {
            if !active.entities.contains(&other) {
                emit_contact_pair(agent, other, &tags, &mut writer);
            }
        }

        active.entities = touching;
    }
}

/// Headless backend plugin
pub struct HeadlessPhysicsPlugin;

impl Plugin for HeadlessPhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                headless_detect_contacts
                    .in_set(SimulationSet::Contacts)
                    .before(crate::contact::dispatch_contacts),
                headless_ground_check.in_set(LocomotionStep::Probe),
                headless_apply_moves.in_set(LocomotionStep::Apply),
            ),
        );
    }
}
