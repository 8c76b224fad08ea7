//! World reset: коллабораторы respawn'а и взаимодействия агента с уровнем
//!
//! - resources: checkpoint, collectibles UI, boss, зоны, правила, часы, смерти
//! - registry: `WorldResetRegistry` (SystemParam) + проверка конфигурации
//! - interactions: checkpoint/switch/jewel/color zone контакты
//!
//! Checkpoint manager, collectibles UI, boss и правила челленджей приходят
//! от уровня (`insert_level_collaborators` или свои `insert_resource`).
//! Plugin их НЕ создаёт: без них Startup проверка валит app.

use bevy::prelude::*;

pub mod interactions;
pub mod registry;
pub mod resources;

pub use interactions::{handle_interactions, set_agent_color, tick_challenge_clocks};
pub use registry::{verify_world_reset_config, ConfigError, WorldResetRegistry};
pub use resources::*;

use crate::SimulationSet;

/// Подключить обязательных коллабораторов уровня к app
pub fn insert_level_collaborators(app: &mut App, checkpoint: CheckpointManager, rules: ChallengeRules) -> &mut App {
    app.insert_resource(checkpoint)
        .insert_resource(CollectibleRegistry::default())
        .insert_resource(BossEncounter::default())
        .insert_resource(rules)
}

pub struct WorldResetPlugin;

impl Plugin for WorldResetPlugin {
    fn build(&self, app: &mut App) {
        // Внутреннее состояние run'а; коллабораторы уровня - снаружи
        app.init_resource::<ZoneTracker>()
            .init_resource::<ChallengeClock>()
            .init_resource::<DeathCounter>()
            .register_type::<CheckpointManager>()
            .register_type::<ChallengeRules>()
            .add_systems(Startup, verify_world_reset_config)
            .add_systems(
                FixedUpdate,
                (
                    handle_interactions.in_set(SimulationSet::Interactions),
                    tick_challenge_clocks.in_set(SimulationSet::Bookkeeping),
                ),
            );
    }
}
