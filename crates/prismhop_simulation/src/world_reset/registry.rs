//! WorldResetRegistry: всё, что respawn обязан вернуть в исходное состояние
//!
//! SystemParam вместо глобальных синглтонов: lifecycle получает явные ссылки
//! на коллабораторов и на все hazard/mover/collectible entity.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use thiserror::Error;

use super::resources::*;
use crate::components::{Agent, BossSwitch, Collectible, HeldInventory, Interactable, OriginalPose};
use crate::hazard::{reset_hazard, HazardStep, HazardTrigger};
use crate::scheduler::DeferredScheduler;

/// Обязательный коллаборатор отсутствует при старте
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("CheckpointManager resource is missing")]
    MissingCheckpointManager,
    #[error("CollectibleRegistry resource is missing")]
    MissingCollectibleRegistry,
    #[error("BossEncounter resource is missing")]
    MissingBossEncounter,
    #[error("ChallengeRules resource is missing")]
    MissingChallengeRules,
}

#[derive(SystemParam)]
pub struct WorldResetRegistry<'w, 's> {
    pub checkpoint: ResMut<'w, CheckpointManager>,
    pub collectibles: ResMut<'w, CollectibleRegistry>,
    pub boss: ResMut<'w, BossEncounter>,
    pub zones: ResMut<'w, ZoneTracker>,
    pub rules: Res<'w, ChallengeRules>,
    pub clock: ResMut<'w, ChallengeClock>,
    pub deaths: ResMut<'w, DeathCounter>,
    hazard_scheduler: ResMut<'w, DeferredScheduler<HazardStep>>,
    hazards: Query<'w, 's, (Entity, &'static mut HazardTrigger, &'static mut Transform), Without<Agent>>,
    movers: Query<
        'w,
        's,
        (&'static OriginalPose, &'static mut Transform),
        (Without<Agent>, Without<HazardTrigger>),
    >,
    items: Query<'w, 's, (&'static Collectible, &'static mut Interactable), Without<BossSwitch>>,
    switches: Query<'w, 's, &'static mut Interactable, (With<BossSwitch>, Without<Collectible>)>,
}

impl WorldResetRegistry<'_, '_> {
    /// Проверка обязательных коллабораторов (до первого тика)
    pub fn verify(world: &World) -> Result<(), ConfigError> {
        if !world.contains_resource::<CheckpointManager>() {
            return Err(ConfigError::MissingCheckpointManager);
        }
        if !world.contains_resource::<CollectibleRegistry>() {
            return Err(ConfigError::MissingCollectibleRegistry);
        }
        if !world.contains_resource::<BossEncounter>() {
            return Err(ConfigError::MissingBossEncounter);
        }
        if !world.contains_resource::<ChallengeRules>() {
            return Err(ConfigError::MissingChallengeRules);
        }
        Ok(())
    }

    /// Вернуть jewel в мир и погасить его UI слот
    pub fn reveal(&mut self, item: Entity) {
        if let Ok((collectible, mut interactable)) = self.items.get_mut(item) {
            interactable.active = true;
            self.collectibles.disable(&collectible.id);
        }
    }

    /// Все jewel'ы, которые держит агент, обратно в мир; held пустеет
    pub fn release_held(&mut self, held: &mut HeldInventory) -> usize {
        let released = held.items.len();
        for item in std::mem::take(&mut held.items) {
            self.reveal(item);
        }
        released
    }

    /// One-life: все подобранные за run jewel'ы снова в мире
    pub fn reveal_all_collectibles(&mut self) {
        for (_, mut interactable) in self.items.iter_mut() {
            interactable.active = true;
        }
        self.collectibles.collected_ui.clear();
    }

    /// Boss restart: нажатые switch'и снова активны
    pub fn restart_boss(&mut self) {
        for switch in std::mem::take(&mut self.boss.pressed) {
            if let Ok(mut interactable) = self.switches.get_mut(switch) {
                interactable.active = true;
            }
        }
    }

    /// Reset всех timed hazard'ов и moving spikes. Возвращает число hazard'ов.
    pub fn reset_hazards(&mut self) -> usize {
        let mut count = 0;
        for (hazard, mut trigger, mut transform) in self.hazards.iter_mut() {
            reset_hazard(hazard, &mut trigger, &mut transform, &mut self.hazard_scheduler);
            count += 1;
        }

        for (original, mut transform) in self.movers.iter_mut() {
            *transform = original.pose;
            count += 1;
        }
        count
    }

    pub fn respawn_position(&self) -> Vec3 {
        self.checkpoint.position
    }
}

/// Startup система: fail fast при неполной конфигурации
pub fn verify_world_reset_config(world: &mut World) {
    if let Err(error) = WorldResetRegistry::verify(world) {
        crate::log_error(&format!("World reset config invalid: {}", error));
        panic!("World reset configuration error: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_reports_first_missing_collaborator() {
        let mut world = World::new();
        assert_eq!(
            WorldResetRegistry::verify(&world),
            Err(ConfigError::MissingCheckpointManager)
        );

        world.init_resource::<CheckpointManager>();
        world.init_resource::<CollectibleRegistry>();
        assert_eq!(
            WorldResetRegistry::verify(&world),
            Err(ConfigError::MissingBossEncounter)
        );

        world.init_resource::<BossEncounter>();
        world.init_resource::<ChallengeRules>();
        assert_eq!(WorldResetRegistry::verify(&world), Ok(()));
    }

    #[test]
    #[should_panic(expected = "World reset configuration error")]
    fn test_startup_check_panics() {
        let mut world = World::new();
        verify_world_reset_config(&mut world);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::MissingChallengeRules.to_string(),
            "ChallengeRules resource is missing"
        );
    }
}
