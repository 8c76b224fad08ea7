//! Camera orbit: look input → yaw/pitch follow-камеры
//!
//! Камера тикает ПОСЛЕ движения (SimulationSet::Camera), поэтому locomotion
//! видит yaw прошлого тика. Внешний camera rig читает `CameraOrbit::orientation`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::Agent;
use crate::locomotion::{MovementInput, PointerDevice};
use crate::SimulationSet;

/// Минимальный sqr magnitude look input (мёртвая зона стика)
pub const LOOK_THRESHOLD: f32 = 0.01;

/// Настройки орбиты
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct CameraOrbitConfig {
    /// Насколько высоко можно поднять камеру (градусы)
    pub top_clamp: f32,
    /// Насколько низко можно опустить камеру (градусы)
    pub bottom_clamp: f32,
    /// Доп. pitch поверх input (подстройка ракурса когда камера залочена)
    pub angle_override: f32,
    pub locked: bool,
}

impl Default for CameraOrbitConfig {
    fn default() -> Self {
        Self {
            top_clamp: 70.0,
            bottom_clamp: -30.0,
            angle_override: 0.0,
            locked: false,
        }
    }
}

/// Состояние орбиты (мутируется только `update_camera_orbit`)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CameraOrbit {
    /// Градусы, держится в [-360, 360]
    pub yaw: f32,
    /// Градусы, в [bottom_clamp, top_clamp]
    pub pitch: f32,
    /// Итоговая ориентация для camera rig (pitch + override, yaw, 0)
    pub orientation: Quat,
}

impl Default for CameraOrbit {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            orientation: Quat::IDENTITY,
        }
    }
}

/// Сначала одна обёртка в ±360, потом clamp
pub fn clamp_angle(mut angle: f32, min: f32, max: f32) -> f32 {
    if angle < -360.0 {
        angle += 360.0;
    }
    if angle > 360.0 {
        angle -= 360.0;
    }
    angle.clamp(min, max)
}

/// Ориентация rig'а из углов (градусы)
pub fn orbit_orientation(yaw: f32, pitch: f32) -> Quat {
    Quat::from_euler(EulerRot::YXZ, yaw.to_radians(), pitch.to_radians(), 0.0)
}

impl CameraOrbit {
    /// Один шаг орбиты
    ///
    /// Мышь уже отдаёт дельту за кадр → без dt; стик отдаёт скорость → × dt.
    pub fn apply_look(&mut self, look: Vec2, device: PointerDevice, config: &CameraOrbitConfig, delta: f32) {
        if look.length_squared() >= LOOK_THRESHOLD && !config.locked {
            let scale = match device {
                PointerDevice::Mouse => 1.0,
                PointerDevice::Gamepad => delta,
            };
            self.yaw += look.x * scale;
            self.pitch += look.y * scale;
        }

        self.yaw = clamp_angle(self.yaw, f32::MIN, f32::MAX);
        self.pitch = clamp_angle(self.pitch, config.bottom_clamp, config.top_clamp);
        self.orientation = orbit_orientation(self.yaw, self.pitch + config.angle_override);
    }
}

/// Система: look input → орбита
pub fn update_camera_orbit(
    mut agents: Query<(&MovementInput, &CameraOrbitConfig, &mut CameraOrbit), With<Agent>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (input, config, mut orbit) in agents.iter_mut() {
        orbit.apply_look(input.look, input.pointer_device, config, delta);
    }
}

pub struct CameraOrbitPlugin;

impl Plugin for CameraOrbitPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, update_camera_orbit.in_set(SimulationSet::Camera));
    }
}
