//! Коллабораторы respawn'а: checkpoint, collectibles UI, boss, зоны, челленджи

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Checkpoint manager: куда телепортировать агента на respawn
#[derive(Resource, Debug, Clone, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct CheckpointManager {
    /// Стартовая точка уровня
    pub start: Vec3,
    /// Текущая точка respawn'а
    pub position: Vec3,
    /// Последний достигнутый marker (None → старт)
    pub current: Option<Entity>,
    /// Respawn чуть выше marker'а (агент падает на платформу)
    pub respawn_height_offset: f32,
}

impl Default for CheckpointManager {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl CheckpointManager {
    pub fn new(start: Vec3) -> Self {
        Self {
            start,
            position: start,
            current: None,
            respawn_height_offset: 3.0,
        }
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Агент коснулся checkpoint marker'а в `marker_position`
    pub fn notify_reached(&mut self, marker: Entity, marker_position: Vec3) {
        self.current = Some(marker);
        self.set_position(marker_position + Vec3::Y * self.respawn_height_offset);
    }

    /// Новый checkpoint "с нуля" (one-life правило)
    pub fn reset_to_start(&mut self) {
        self.current = None;
        self.position = self.start;
    }
}

/// UI слоты collectibles: какие jewel'ы показаны как подобранные
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct CollectibleRegistry {
    pub collected_ui: HashSet<String>,
}

impl CollectibleRegistry {
    pub fn enable(&mut self, id: &str) {
        self.collected_ui.insert(id.to_string());
    }

    pub fn disable(&mut self, id: &str) {
        self.collected_ui.remove(id);
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.collected_ui.contains(id)
    }
}

/// Финальный босс: какие switch'и нажаты с прошлого restart'а
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct BossEncounter {
    pub pressed: Vec<Entity>,
}

impl BossEncounter {
    pub fn record_press(&mut self, switch: Entity) {
        if !self.pressed.contains(&switch) {
            self.pressed.push(switch);
        }
    }
}

/// Зоны уровня: текущая зона, смерти и время по зонам
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ZoneTracker {
    pub current_zone: usize,
    pub deaths_per_zone: Vec<u32>,
    pub zone_timers: Vec<f32>,
}

impl Default for ZoneTracker {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ZoneTracker {
    pub fn new(zone_count: usize) -> Self {
        let zone_count = zone_count.max(1);
        Self {
            current_zone: 0,
            deaths_per_zone: vec![0; zone_count],
            zone_timers: vec![0.0; zone_count],
        }
    }

    /// Переход в зону `zone` (индекс вне диапазона игнорируется)
    pub fn enter_zone(&mut self, zone: usize) {
        if zone < self.deaths_per_zone.len() {
            self.current_zone = zone;
        }
    }

    pub fn record_death(&mut self) {
        if let Some(count) = self.deaths_per_zone.get_mut(self.current_zone) {
            *count += 1;
        }
    }

    pub fn advance(&mut self, delta: f32) {
        if let Some(timer) = self.zone_timers.get_mut(self.current_zone) {
            *timer += delta;
        }
    }

    pub fn reset_timers(&mut self) {
        self.zone_timers.iter_mut().for_each(|timer| *timer = 0.0);
    }
}

/// Правила челленджей (выбираются в меню перед уровнем)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Resource)]
pub struct ChallengeRules {
    /// Лимит времени на одну жизнь
    pub timed: bool,
    /// Секунды (целые, как показывает UI таймер)
    pub time_limit: f32,
    /// Смерть откатывает на старт уровня
    pub one_life: bool,
    /// Один прыжок на жизнь вместо трёх
    pub one_jump: bool,
    /// Бюджет прыжков вообще расходуется
    pub limited_jumps: bool,
}

impl Default for ChallengeRules {
    fn default() -> Self {
        Self {
            timed: false,
            time_limit: 15.0,
            one_life: false,
            one_jump: false,
            limited_jumps: false,
        }
    }
}

impl ChallengeRules {
    /// Прыжков на одну жизнь
    pub fn jumps_per_life(&self) -> u32 {
        if self.one_jump {
            1
        } else {
            3
        }
    }
}

/// Таймеры: текущая жизнь и весь run
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ChallengeClock {
    pub life_elapsed: f32,
    pub run_elapsed: f32,
}

impl ChallengeClock {
    pub fn restart_life(&mut self) {
        self.life_elapsed = 0.0;
    }

    pub fn limit_reached(&self, rules: &ChallengeRules) -> bool {
        rules.timed && self.life_elapsed.floor() >= rules.time_limit
    }
}

/// Счётчик засчитанных смертей за run
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeathCounter {
    pub total: u32,
}
