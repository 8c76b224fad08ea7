//! Physics capabilities
//!
//! Симуляция не владеет broad-phase. Она потребляет две capability:
//! - overlap test: "пересекает ли сфера что-то на этих слоях"
//! - kinematic move: "сдвинь агента на displacement"
//!
//! Два backend'а:
//! - Headless (по умолчанию): AABB коллайдеры, тесты и headless прогоны
//! - Rapier: `bevy_rapier3d` (overlap через query pipeline, KinematicCharacterController)

use bevy::prelude::*;

pub mod grounding;
pub mod headless;
pub mod rapier_backend;

pub use grounding::{probe_ground, probe_point};
pub use headless::{HeadlessCollider, HeadlessPhysicsPlugin};
pub use rapier_backend::RapierBackendPlugin;

/// Capability: sphere overlap test
///
/// Trigger-only объёмы (sensors) не считаются.
pub trait OverlapQuery {
    fn overlap_sphere(&self, point: Vec3, radius: f32, layer_mask: u32) -> bool;
}

/// Adapter: замыкание как OverlapQuery (Rapier context, моки в тестах)
pub struct OverlapFn<F>(pub F)
where
    F: Fn(Vec3, f32, u32) -> bool;

impl<F> OverlapQuery for OverlapFn<F>
where
    F: Fn(Vec3, f32, u32) -> bool,
{
    fn overlap_sphere(&self, point: Vec3, radius: f32, layer_mask: u32) -> bool {
        (self.0)(point, radius, layer_mask)
    }
}

/// Какой backend обслуживает capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhysicsBackend {
    #[default]
    Headless,
    /// Требует `RapierPhysicsPlugin` в App (добавляется снаружи)
    Rapier,
}
