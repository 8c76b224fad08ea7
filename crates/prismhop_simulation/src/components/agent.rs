//! Компоненты агента: Agent, LifeState, ControlState, HeldInventory, ColorState

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::camera::{CameraOrbit, CameraOrbitConfig};
use crate::collision_layers::{agent_layer_for, LAYER_AGENT};
use crate::contact::ActiveContacts;
use crate::locomotion::{KinematicMotion, LocomotionConfig, LocomotionState, MovementInput};
use crate::signals::AnimationSignals;

/// Агент под управлением игрока
///
/// Через Required Components получает весь набор состояния: жизнь, input gate,
/// locomotion, камеру, сигналы анимации. Spawn helper: `spawn_agent`.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(
    Transform,
    LifeState,
    ControlState,
    HeldInventory,
    ColorState,
    AgentLayer,
    JumpBudget,
    LocomotionConfig,
    LocomotionState,
    MovementInput,
    KinematicMotion,
    AnimationSignals,
    CameraOrbit,
    CameraOrbitConfig,
    ActiveContacts
)]
pub struct Agent;

/// Жив ли агент
///
/// Пока `alive == false` locomotion не тикает (ни гравитации, ни движения),
/// contact events со стороны агента игнорируются.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct LifeState {
    pub alive: bool,
}

impl Default for LifeState {
    fn default() -> Self {
        Self { alive: true }
    }
}

/// Input gate
///
/// `input_enabled` принадлежит lifecycle sequencer на всё время respawn.
/// `run_finished` выставляется финальным checkpoint и не сбрасывается.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ControlState {
    pub input_enabled: bool,
    pub run_finished: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            input_enabled: true,
            run_finished: false,
        }
    }
}

impl ControlState {
    pub fn accepts_input(&self) -> bool {
        self.input_enabled && !self.run_finished
    }
}

/// Collectibles, подобранные в текущей жизни (ещё не засчитанные checkpoint'ом)
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct HeldInventory {
    pub items: Vec<Entity>,
}

impl HeldInventory {
    pub fn hold(&mut self, item: Entity) {
        if !self.items.contains(&item) {
            self.items.push(item);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Цвет агента (определяет collision layer и по каким платформам можно ходить)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum PaintColor {
    #[default]
    Neutral,
    Blue,
    Yellow,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub struct ColorState {
    pub color: PaintColor,
}

/// Collision layer агента (битовая маска из `collision_layers`)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct AgentLayer {
    pub bits: u32,
}

impl Default for AgentLayer {
    fn default() -> Self {
        Self { bits: LAYER_AGENT }
    }
}

impl AgentLayer {
    pub fn for_color(color: PaintColor) -> Self {
        Self {
            bits: agent_layer_for(color),
        }
    }
}

/// Сколько прыжков осталось в текущей жизни
///
/// Расходуется только при `ChallengeRules::limited_jumps`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct JumpBudget {
    pub remaining: u32,
}

impl Default for JumpBudget {
    fn default() -> Self {
        Self { remaining: 3 }
    }
}

/// Spawn helper: агент в точке `position`
///
/// Первый тик после spawn запускает неучитываемую "смерть" (initial spawn),
/// которая телепортирует агента на checkpoint и сбрасывает мир.
pub fn spawn_agent(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Agent,
            Transform::from_translation(position),
            crate::contact::ContactTag(crate::contact::ContactClass::Player),
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision_layers::{LAYER_AGENT_BLUE, LAYER_AGENT_YELLOW};

    #[test]
    fn test_control_state_gate() {
        let mut control = ControlState::default();
        assert!(control.accepts_input());

        control.input_enabled = false;
        assert!(!control.accepts_input());

        control.input_enabled = true;
        control.run_finished = true;
        assert!(!control.accepts_input());
    }

    #[test]
    fn test_held_inventory_no_duplicates() {
        let mut held = HeldInventory::default();
        let jewel = Entity::from_raw(7);

        held.hold(jewel);
        held.hold(jewel);

        assert_eq!(held.items.len(), 1);
    }

    #[test]
    fn test_agent_layer_for_color() {
        assert_eq!(AgentLayer::default().bits, LAYER_AGENT);
        assert_eq!(AgentLayer::for_color(PaintColor::Blue).bits, LAYER_AGENT_BLUE);
        assert_eq!(AgentLayer::for_color(PaintColor::Yellow).bits, LAYER_AGENT_YELLOW);
    }
}
