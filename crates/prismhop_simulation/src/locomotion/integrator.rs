//! Locomotion integrator: скорость, поворот, прыжок, гравитация
//!
//! Чистые функции над `LocomotionState` - системы только достают компоненты
//! и отдают результат в kinematic move.

use bevy::prelude::*;

use super::components::{LocomotionConfig, LocomotionState, MovementInput};
use crate::signals::AnimationSignals;

/// Зона, внутри которой скорость не сглаживается, а сразу = target
pub const SPEED_OFFSET: f32 = 0.1;

/// Ниже этого blend обнуляется (без остаточного "ползания" idle анимации)
pub const BLEND_SNAP_THRESHOLD: f32 = 0.01;

/// Вертикальная скорость "стоя на земле" (чтобы не копилась бесконечно)
pub const GROUNDED_VERTICAL_VELOCITY: f32 = -2.0;

/// Lerp с t ∈ [0, 1]
pub fn lerp_clamped(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Округление до 3 знаков (гасит дрожание скорости)
pub fn round_to_millis(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

/// `t` по модулю `length`, результат в [0, length]
pub fn repeat(t: f32, length: f32) -> f32 {
    (t - (t / length).floor() * length).clamp(0.0, length)
}

/// Кратчайшая разница углов (градусы, (-180, 180])
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let mut delta = repeat(target - current, 360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Critically damped spring к `target` (без ограничения скорости)
///
/// `velocity` - состояние пружины между вызовами. Не перелетает target.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, delta: f32) -> f32 {
    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;
    let x = omega * delta;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * delta;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Перелёт через target → встаём ровно в target
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = if delta > 0.0 { (output - target) / delta } else { 0.0 };
    }

    output
}

/// `smooth_damp` по кратчайшей дуге (градусы)
pub fn smooth_damp_angle(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, delta: f32) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, delta)
}

/// Вертикальная скорость для прыжка на высоту `height` при гравитации `gravity`
///
/// v = sqrt(2·h·|g|)
pub fn jump_velocity(height: f32, gravity: f32) -> f32 {
    (height * -2.0 * gravity).sqrt()
}

/// Горизонтальное направление для yaw (градусы; 0 → +Z)
pub fn yaw_forward(yaw_degrees: f32) -> Vec3 {
    Quat::from_rotation_y(yaw_degrees.to_radians()) * Vec3::Z
}

pub fn has_move_input(axis: Vec2) -> bool {
    axis.length_squared() > 1e-10
}

/// Результат шага jump/gravity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpOutcome {
    pub jumped: bool,
}

/// Шаг прыжка и гравитации (до движения)
///
/// - На земле: сброс fall timeout, clamp падения к -2, прыжок если
///   запрошен, timeout истёк и `jump_allowed`
/// - В воздухе: сброс jump timeout, отсчёт fall timeout → free fall,
///   запрос прыжка сбрасывается всегда
/// - Гравитация: `v += g·dt` пока `v < terminal` (проверка ДО сложения)
pub fn step_jump_and_gravity(
    state: &mut LocomotionState,
    config: &LocomotionConfig,
    jump_requested: &mut bool,
    jump_allowed: bool,
    signals: &mut AnimationSignals,
    delta: f32,
) -> JumpOutcome {
    let mut outcome = JumpOutcome::default();

    if state.grounded {
        state.fall_timeout_delta = config.fall_timeout;
        signals.jump = false;
        signals.free_fall = false;

        if state.vertical_velocity < 0.0 {
            state.vertical_velocity = GROUNDED_VERTICAL_VELOCITY;
        }

        if *jump_requested && state.jump_timeout_delta <= 0.0 && jump_allowed {
            state.vertical_velocity = jump_velocity(config.jump_height, config.gravity);
            state.grounded = false;
            *jump_requested = false;
            signals.jump = true;
            outcome.jumped = true;
        }

        if state.jump_timeout_delta >= 0.0 {
            state.jump_timeout_delta -= delta;
        }
    } else {
        state.jump_timeout_delta = config.jump_timeout;

        if state.fall_timeout_delta >= 0.0 {
            state.fall_timeout_delta -= delta;
        } else {
            signals.free_fall = true;
        }

        *jump_requested = false;
    }

    if state.vertical_velocity < config.terminal_velocity {
        state.vertical_velocity += config.gravity * delta;
    }

    outcome
}

/// Шаг горизонтального движения: скорость, blend, поворот, displacement
///
/// `current_horizontal_speed` - фактическая скорость прошлого kinematic move.
/// `camera_yaw` - yaw камеры (градусы), input интерпретируется относительно неё.
/// Направление сдвига берётся из СГЛАЖЕННОГО facing, не из target.
pub fn step_move(
    state: &mut LocomotionState,
    config: &LocomotionConfig,
    input: &MovementInput,
    current_horizontal_speed: f32,
    camera_yaw: f32,
    signals: &mut AnimationSignals,
    delta: f32,
) -> Vec3 {
    let moving = has_move_input(input.move_axis);

    let target_speed = match (moving, input.sprint) {
        (false, _) => 0.0,
        (true, true) => config.sprint_speed,
        (true, false) => config.move_speed,
    };

    let input_magnitude = if input.analog_movement {
        input.move_axis.length()
    } else {
        1.0
    };

    let rate = delta * config.speed_change_rate;

    if current_horizontal_speed < target_speed - SPEED_OFFSET
        || current_horizontal_speed > target_speed + SPEED_OFFSET
    {
        state.speed = round_to_millis(lerp_clamped(
            current_horizontal_speed,
            target_speed * input_magnitude,
            rate,
        ));
    } else {
        state.speed = target_speed;
    }

    state.animation_blend = lerp_clamped(state.animation_blend, target_speed, rate);
    if state.animation_blend < BLEND_SNAP_THRESHOLD {
        state.animation_blend = 0.0;
    }

    if moving {
        let direction = Vec3::new(input.move_axis.x, 0.0, input.move_axis.y).normalize();
        state.target_rotation = direction.x.atan2(direction.z).to_degrees() + camera_yaw;

        let facing = smooth_damp_angle(
            state.facing_yaw,
            state.target_rotation,
            &mut state.rotation_velocity,
            config.rotation_smooth_time,
            delta,
        );
        state.facing_yaw = facing.rem_euclid(360.0);
    }

    signals.speed = state.animation_blend;
    signals.motion_speed = input_magnitude;

    yaw_forward(state.facing_yaw) * (state.speed * delta)
        + Vec3::new(0.0, state.vertical_velocity, 0.0) * delta
}
