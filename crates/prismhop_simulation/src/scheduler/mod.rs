//! Deferred sequences ("подождать N секунд, потом…")
//!
//! Вместо корутин - явное состояние: шаг + время возобновления.
//! Один `DeferredScheduler<S>` на вид последовательности (hazard, lifecycle),
//! ключ - entity-владелец. Отмена всех шагов владельца - один `remove` из map.
//!
//! Инвариант: отменённый шаг никогда не исполняется. Кто отменил,
//! тот и отвечает за состояние; continuation всё равно перечитывает
//! компоненты перед тем как что-то менять.

use bevy::prelude::*;
use std::collections::HashMap;

/// Допуск при сравнении времени (накопленная ошибка f64 на fixed timestep)
const RESUME_EPSILON: f64 = 1e-9;

/// Отложенный шаг последовательности
#[derive(Debug, Clone, PartialEq)]
pub struct Deferred<S> {
    pub step: S,
    /// Elapsed time (секунды) когда шаг должен выполниться
    pub resume_at: f64,
}

#[derive(Resource, Debug)]
pub struct DeferredScheduler<S: Send + Sync + 'static> {
    pending: HashMap<Entity, Vec<Deferred<S>>>,
}

impl<S: Send + Sync + 'static> Default for DeferredScheduler<S> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }
}

impl<S: Send + Sync + 'static> DeferredScheduler<S> {
    /// Поставить шаг `step` владельцу `owner` на время `resume_at`
    pub fn schedule(&mut self, owner: Entity, step: S, resume_at: f64) {
        self.pending
            .entry(owner)
            .or_default()
            .push(Deferred { step, resume_at });
    }

    /// Отменить все ожидающие шаги владельца. true если что-то было отменено.
    pub fn cancel(&mut self, owner: Entity) -> bool {
        self.pending.remove(&owner).is_some()
    }

    pub fn is_active(&self, owner: Entity) -> bool {
        self.pending.contains_key(&owner)
    }

    pub fn pending_for(&self, owner: Entity) -> &[Deferred<S>] {
        self.pending.get(&owner).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn active_owners(&self) -> usize {
        self.pending.len()
    }

    /// Забрать все шаги с `resume_at <= now`
    ///
    /// Порядок детерминирован: по времени, затем по entity.
    /// Владелец без оставшихся шагов перестаёт быть active - continuation
    /// должна сама запланировать следующий шаг.
    pub fn drain_due(&mut self, now: f64) -> Vec<(Entity, S)> {
        let mut due: Vec<(f64, Entity, S)> = Vec::new();

        self.pending.retain(|owner, steps| {
            let mut index = 0;
            while index < steps.len() {
                if steps[index].resume_at <= now + RESUME_EPSILON {
                    let deferred = steps.swap_remove(index);
                    due.push((deferred.resume_at, *owner, deferred.step));
                } else {
                    index += 1;
                }
            }
            !steps.is_empty()
        });

        due.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        due.into_iter().map(|(_, owner, step)| (owner, step)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Step {
        First,
        Second,
    }

    #[test]
    fn test_step_fires_only_when_due() {
        let mut scheduler = DeferredScheduler::<Step>::default();
        let owner = Entity::from_raw(1);

        scheduler.schedule(owner, Step::First, 1.0);

        assert!(scheduler.drain_due(0.5).is_empty());
        assert!(scheduler.is_active(owner));

        let due = scheduler.drain_due(1.0);
        assert_eq!(due, vec![(owner, Step::First)]);
        assert!(!scheduler.is_active(owner));
    }

    #[test]
    fn test_cancel_drops_all_steps_of_owner() {
        let mut scheduler = DeferredScheduler::<Step>::default();
        let owner = Entity::from_raw(1);
        let other = Entity::from_raw(2);

        scheduler.schedule(owner, Step::First, 1.0);
        scheduler.schedule(owner, Step::Second, 2.0);
        scheduler.schedule(other, Step::First, 1.0);

        assert!(scheduler.cancel(owner));
        assert!(!scheduler.cancel(owner)); // Повторная отмена - no-op

        let due = scheduler.drain_due(10.0);
        assert_eq!(due, vec![(other, Step::First)]);
    }

    #[test]
    fn test_drain_order_is_deterministic() {
        let mut scheduler = DeferredScheduler::<Step>::default();
        let a = Entity::from_raw(5);
        let b = Entity::from_raw(3);

        scheduler.schedule(a, Step::Second, 2.0);
        scheduler.schedule(a, Step::First, 1.0);
        scheduler.schedule(b, Step::First, 1.0);

        let due = scheduler.drain_due(2.0);
        assert_eq!(
            due,
            vec![(b, Step::First), (a, Step::First), (a, Step::Second)]
        );
    }

    #[test]
    fn test_float_accumulation_does_not_skip_a_tick() {
        let mut scheduler = DeferredScheduler::<Step>::default();
        let owner = Entity::from_raw(1);

        // contact_time + delay = 0.30000000000000004 в f64
        let resume_at = 0.1 + 0.2;
        scheduler.schedule(owner, Step::First, resume_at);

        let now = 0.15 + 0.15;
        assert!(now < resume_at);
        assert_eq!(scheduler.drain_due(now).len(), 1);
    }
}
