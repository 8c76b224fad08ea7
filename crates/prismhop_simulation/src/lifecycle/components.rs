//! Lifecycle типы: причины смерти, запрос смерти, шаги respawn'а, конфиг

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Почему агент умирает
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum DeathCause {
    /// Смертельный пол: без анимации смерти
    InstantHazard,
    /// Камни, шипы, враги: анимация смерти перед respawn'ом
    Hazard,
    /// Кончилось время жизни (timed челлендж)
    TimeLimit,
    /// Игрок нажал restart
    ManualRestart,
    /// Первый spawn агента: тот же respawn, но не засчитывается
    InitialSpawn,
}

impl DeathCause {
    /// Засчитывается в счётчик смертей (звук, UI, one-life откат)
    pub fn counted(&self) -> bool {
        !matches!(self, DeathCause::InitialSpawn)
    }

    /// Без фазы "dying" (сразу к reset'у)
    pub fn instant(&self) -> bool {
        matches!(self, DeathCause::InstantHazard | DeathCause::InitialSpawn)
    }

    /// Учитывается в статистике смертей текущей зоны
    pub fn counts_zone_death(&self) -> bool {
        matches!(
            self,
            DeathCause::InstantHazard | DeathCause::Hazard | DeathCause::TimeLimit
        )
    }
}

/// Запрос на запуск death → respawn последовательности
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathRequested {
    pub agent: Entity,
    pub cause: DeathCause,
}

/// Отложенные шаги lifecycle (ключ scheduler'а = agent entity)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStep {
    /// Закончилась анимация смерти → фазы 3-4 и первый reset pass
    AfterDyingFeedback { cause: DeathCause },
    /// Очередной reset pass (`remaining` включая этот)
    ResetPass { remaining: u32 },
    /// Фаза 6: агент жив, input включён
    Finish,
}

/// Тайминги respawn'а
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Resource)]
pub struct LifecycleConfig {
    /// Длительность анимации смерти (секунды)
    pub dying_feedback: f32,
    /// Сколько раз прогнать reset pass (каждый pass идемпотентен)
    pub reset_passes: u32,
    /// Пауза после каждого pass'а (секунды)
    pub pass_interval: f32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            dying_feedback: 0.7,
            reset_passes: 1,
            pass_interval: 0.01,
        }
    }
}

impl LifecycleConfig {
    /// Legacy тайминг: 10 pass'ов (UI эффекты, завязанные на длительность reset'а)
    pub fn with_legacy_passes() -> Self {
        Self {
            reset_passes: 10,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_death_cause_table() {
        use DeathCause::*;

        let table = [
            (InstantHazard, true, true, true),
            (Hazard, true, false, true),
            (TimeLimit, true, false, true),
            (ManualRestart, true, false, false),
            (InitialSpawn, false, true, false),
        ];

        for (cause, counted, instant, zone) in table {
            assert_eq!(cause.counted(), counted, "{:?} counted", cause);
            assert_eq!(cause.instant(), instant, "{:?} instant", cause);
            assert_eq!(cause.counts_zone_death(), zone, "{:?} zone death", cause);
        }
    }

    #[test]
    fn test_lifecycle_config_defaults() {
        let config = LifecycleConfig::default();
        assert_eq!(config.dying_feedback, 0.7);
        assert_eq!(config.reset_passes, 1);
        assert_eq!(LifecycleConfig::with_legacy_passes().reset_passes, 10);
    }
}
