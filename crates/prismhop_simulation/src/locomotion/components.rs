//! Locomotion компоненты: конфиг, состояние интегратора, input, kinematic motion

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collision_layers::GROUND_MASKS;

/// Параметры движения агента
///
/// Значения по умолчанию - тюнинг third-person контроллера игры.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct LocomotionConfig {
    /// Скорость ходьбы (m/s)
    pub move_speed: f32,
    /// Скорость бега (m/s)
    pub sprint_speed: f32,
    /// Время сглаживания поворота к направлению движения (секунды, 0.0..0.3)
    pub rotation_smooth_time: f32,
    /// Ускорение/торможение (exponential approach rate)
    pub speed_change_rate: f32,
    /// Высота прыжка (m)
    pub jump_height: f32,
    /// Собственная гравитация агента (m/s², отрицательная)
    pub gravity: f32,
    /// Пауза между прыжками (секунды)
    pub jump_timeout: f32,
    /// Время в воздухе до состояния "падение" (ступеньки вниз не считаются)
    pub fall_timeout: f32,
    pub terminal_velocity: f32,
    /// Смещение сферы пробы земли (отрицательное → выше ступней)
    pub grounded_offset: f32,
    /// Радиус сферы пробы земли (совпадает с радиусом капсулы)
    pub grounded_radius: f32,
    /// Маски слоёв, считающихся землёй (порядок = порядок проверки)
    pub ground_layers: Vec<u32>,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            sprint_speed: 5.335,
            rotation_smooth_time: 0.12,
            speed_change_rate: 10.0,
            jump_height: 1.2,
            gravity: -15.0,
            jump_timeout: 0.5,
            fall_timeout: 0.15,
            terminal_velocity: 53.0,
            grounded_offset: -0.14,
            grounded_radius: 0.28,
            ground_layers: GROUND_MASKS.to_vec(),
        }
    }
}

/// Состояние интегратора (мутируется только locomotion и lifecycle)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct LocomotionState {
    /// Сглаженная горизонтальная скорость (m/s)
    pub speed: f32,
    pub animation_blend: f32,
    /// Куда хотим смотреть (градусы, мировой yaw)
    pub target_rotation: f32,
    /// Куда реально смотрим после сглаживания (градусы, [0, 360))
    pub facing_yaw: f32,
    /// Скорость поворота для smooth damp (градусы/сек)
    pub rotation_velocity: f32,
    pub vertical_velocity: f32,
    pub jump_timeout_delta: f32,
    pub fall_timeout_delta: f32,
    pub grounded: bool,
}

impl Default for LocomotionState {
    fn default() -> Self {
        Self::from_config(&LocomotionConfig::default())
    }
}

impl LocomotionState {
    pub fn from_config(config: &LocomotionConfig) -> Self {
        Self {
            speed: 0.0,
            animation_blend: 0.0,
            target_rotation: 0.0,
            facing_yaw: 0.0,
            rotation_velocity: 0.0,
            vertical_velocity: 0.0,
            jump_timeout_delta: config.jump_timeout,
            fall_timeout_delta: config.fall_timeout,
            grounded: true,
        }
    }
}

/// Тип устройства для look input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum PointerDevice {
    /// Мышь: дельта уже "за кадр", не масштабируем временем
    #[default]
    Mouse,
    /// Стик: скорость, умножаем на dt
    Gamepad,
}

/// Input агента (пишется внешним input слоем)
///
/// `jump` и `restart` - защёлки: locomotion/lifecycle сбрасывают их после обработки.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MovementInput {
    /// X - вправо, Y - вперёд (|v| ≤ 1 кроме analog)
    pub move_axis: Vec2,
    pub look: Vec2,
    pub sprint: bool,
    pub jump: bool,
    pub restart: bool,
    /// Analog стик: скорость масштабируется магнитудой input
    pub analog_movement: bool,
    pub pointer_device: PointerDevice,
}

impl MovementInput {
    /// Нейтральный input (то что видит агент при выключенном input gate)
    pub fn neutral(&self) -> Self {
        Self {
            pointer_device: self.pointer_device,
            analog_movement: self.analog_movement,
            ..Default::default()
        }
    }
}

/// Kinematic move capability
///
/// Locomotion пишет `displacement` на тик, backend его потребляет и
/// возвращает фактическую скорость в `last_velocity`.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct KinematicMotion {
    pub displacement: Vec3,
    pub last_velocity: Vec3,
}

impl KinematicMotion {
    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.last_velocity.x, 0.0, self.last_velocity.z).length()
    }
}
