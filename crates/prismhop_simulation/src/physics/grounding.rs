//! Grounding probe: касается ли агент земли

use bevy::prelude::*;

use super::OverlapQuery;
use crate::locomotion::{LocomotionConfig, LocomotionState};
use crate::signals::AnimationSignals;

/// Точка пробы: `position - (0, offset, 0)`
///
/// Offset отрицательный по умолчанию (-0.14) → сфера чуть выше ступней,
/// чтобы неровный пол не давал ложных "в воздухе".
pub fn probe_point(position: Vec3, offset: f32) -> Vec3 {
    position - Vec3::new(0.0, offset, 0.0)
}

/// true на первой маске, по которой overlap дал попадание
///
/// Порядок масок влияет только на стоимость (early exit), не на результат.
pub fn probe_ground<Q: OverlapQuery + ?Sized>(
    query: &Q,
    position: Vec3,
    offset: f32,
    radius: f32,
    masks: &[u32],
) -> bool {
    let point = probe_point(position, offset);
    masks
        .iter()
        .any(|&mask| query.overlap_sphere(point, radius, mask))
}

/// Записать результат пробы в locomotion state и animator flag
pub fn apply_ground_probe<Q: OverlapQuery + ?Sized>(
    query: &Q,
    transform: &Transform,
    config: &LocomotionConfig,
    state: &mut LocomotionState,
    signals: &mut AnimationSignals,
) {
    state.grounded = probe_ground(
        query,
        transform.translation,
        config.grounded_offset,
        config.grounded_radius,
        &config.ground_layers,
    );
    signals.grounded = state.grounded;
}
