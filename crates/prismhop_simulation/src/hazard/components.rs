//! Timed hazard компоненты: HazardTrigger (Waiting → Moving → Done), MovingHazard

use bevy::ecs::component::HookContext;
use bevy::ecs::world::DeferredWorld;
use bevy::prelude::*;

use crate::components::OriginalPose;

/// Состояние timed hazard'а
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum HazardState {
    /// Ждёт касания агента
    #[default]
    Waiting,
    /// Двигается/вращается каждый тик
    Moving,
    /// Терминальное: поза заморожена до Reset
    Done,
}

/// Timed hazard ("исчезающая платформа", trapdoor)
///
/// Касание в Waiting → через `delay` Moving → ещё через `active_duration`
/// Done. Reset из любого состояния: отмена отложенных шагов, исходная поза, Waiting.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
#[require(Transform)]
#[component(on_add = capture_hazard_pose)]
pub struct HazardTrigger {
    pub state: HazardState,
    /// Секунды от касания до начала движения
    pub delay: f32,
    /// Секунды движения до Done
    pub active_duration: f32,
    /// Скорость сдвига в local space (m/s)
    pub translation_rate: Vec3,
    /// Скорость вращения в local space (градусы/сек, euler x/y/z)
    pub rotation_rate: Vec3,
    /// Исходная поза: Transform сущности в момент добавления компонента
    pub original: Transform,
}

impl HazardTrigger {
    /// `original` заполнит hook при вставке в сущность
    pub fn new(delay: f32, active_duration: f32) -> Self {
        Self {
            state: HazardState::Waiting,
            delay,
            active_duration,
            translation_rate: Vec3::ZERO,
            rotation_rate: Vec3::ZERO,
            original: Transform::IDENTITY,
        }
    }

    pub fn with_translation(mut self, rate: Vec3) -> Self {
        self.translation_rate = rate;
        self
    }

    pub fn with_rotation(mut self, degrees_per_second: Vec3) -> Self {
        self.rotation_rate = degrees_per_second;
        self
    }

    pub fn is_waiting(&self) -> bool {
        self.state == HazardState::Waiting
    }

    /// Исходная поза + Waiting (отмену отложенных шагов делает вызывающий)
    pub fn restore(&mut self, transform: &mut Transform) {
        *transform = self.original;
        self.state = HazardState::Waiting;
    }
}

/// Повторные insert'ы (ResetHazard) не срабатывают: только первое добавление
fn capture_hazard_pose(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
    let Some(pose) = world.get::<Transform>(entity).copied() else {
        return;
    };
    if let Some(mut trigger) = world.get_mut::<HazardTrigger>(entity) {
        trigger.original = pose;
    }
}

/// Hazard с постоянным движением без state machine (moving spikes)
///
/// Двигается всегда; respawn возвращает его в `OriginalPose` (снимается с
/// Transform при spawn'е).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
#[require(Transform, OriginalPose)]
pub struct MovingHazard {
    pub translation_rate: Vec3,
    /// Градусы/сек
    pub rotation_rate: Vec3,
}

/// Шаги отложенной последовательности hazard'а
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardStep {
    /// После `delay`: Waiting → Moving
    BeginMoving,
    /// После `active_duration`: Moving → Done, иначе вернуть исходную позу
    SettleOrRevert,
}

/// Сдвиг + поворот в local space за `delta` секунд
///
/// Сдвиг по текущей ориентации, потом поворот (euler: Z, X, Y).
pub fn apply_local_motion(transform: &mut Transform, translation_rate: Vec3, rotation_rate: Vec3, delta: f32) {
    let step = translation_rate * delta;
    transform.translation += transform.rotation * step;

    let angles = rotation_rate * delta;
    transform.rotation *= Quat::from_euler(
        EulerRot::YXZ,
        angles.y.to_radians(),
        angles.x.to_radians(),
        angles.z.to_radians(),
    );
}
