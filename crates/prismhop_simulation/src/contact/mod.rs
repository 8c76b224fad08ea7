//! Contact classification & dispatch
//!
//! Physics backend (headless или Rapier) сообщает "subject коснулся other"
//! вместе с классом other. Единственный `match` по `ContactClass` превращает
//! это в типизированные запросы для hazard/lifecycle/world-interaction систем.
//! Новый тип объекта = новый вариант enum, компилятор покажет где не обработан.

use bevy::prelude::*;

use crate::components::{Agent, LifeState, PaintColor};
use crate::hazard::HazardTrigger;
use crate::lifecycle::{DeathCause, DeathRequested};
use crate::SimulationSet;


/// Класс объекта, с которым произошёл контакт
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ContactClass {
    /// Агент (с точки зрения hazard'а)
    Player,
    /// Смертельная зона без анимации смерти (пол под уровнем)
    DeathHazardInstant,
    /// Смертельный объект с анимацией смерти (камни)
    DeathHazardDelayed,
    HazardSpike,
    HazardEnemy,
    Checkpoint,
    BossSwitch,
    Collectible,
    ColorZone(PaintColor),
}

/// Классификация entity для contact dispatch
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ContactTag(pub ContactClass);

/// Событие: `subject` вошёл в контакт с `other` (класс - класс `other`)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub subject: Entity,
    pub other: Entity,
    pub class: ContactClass,
}

/// Entities, с которыми агент сейчас пересекается (enter-tracking headless backend)
#[derive(Component, Debug, Clone, Default)]
pub struct ActiveContacts {
    pub entities: Vec<Entity>,
}

/// Запрос: агент коснулся timed hazard'а
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HazardContact {
    pub hazard: Entity,
    pub agent: Entity,
}

/// Взаимодействия агента с объектами уровня (не смертельные)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentInteraction {
    CheckpointReached { agent: Entity, marker: Entity },
    BossSwitchPressed { agent: Entity, switch: Entity },
    CollectiblePicked { agent: Entity, item: Entity },
    ColorZoneEntered { agent: Entity, color: PaintColor },
}

/// Записать ContactEvent для каждой тегированной стороны пары
///
/// Используется обоими backend'ами. Сторона без `ContactTag` - просто геометрия.
pub fn emit_contact_pair(
    a: Entity,
    b: Entity,
    tags: &Query<&ContactTag>,
    writer: &mut EventWriter<ContactEvent>,
) {
    if let Ok(tag) = tags.get(b) {
        writer.write(ContactEvent {
            subject: a,
            other: b,
            class: tag.0,
        });
    }
    if let Ok(tag) = tags.get(a) {
        writer.write(ContactEvent {
            subject: b,
            other: a,
            class: tag.0,
        });
    }
}

/// Система: ContactEvent → типизированные запросы
///
/// Контакты мёртвого агента игнорируются (respawn в процессе), в том числе
/// касания hazard'ов: телепорт на checkpoint не должен запускать trapdoor.
pub fn dispatch_contacts(
    mut contacts: EventReader<ContactEvent>,
    agents: Query<&LifeState, With<Agent>>,
    hazards: Query<(), With<HazardTrigger>>,
    mut hazard_contacts: EventWriter<HazardContact>,
    mut deaths: EventWriter<DeathRequested>,
    mut interactions: EventWriter<AgentInteraction>,
) {
    for contact in contacts.read() {
        let subject = contact.subject;
        let other = contact.other;
        let agent_alive = agents.get(subject).map(|life| life.alive).unwrap_or(false);

        match contact.class {
            ContactClass::Player => {
                let toucher_alive = agents.get(other).map(|life| life.alive).unwrap_or(false);
                if hazards.contains(subject) && toucher_alive {
                    hazard_contacts.write(HazardContact {
                        hazard: subject,
                        agent: other,
                    });
                }
            }
            ContactClass::DeathHazardInstant => {
                if agent_alive {
                    deaths.write(DeathRequested {
                        agent: subject,
                        cause: DeathCause::InstantHazard,
                    });
                }
            }
            ContactClass::DeathHazardDelayed
            | ContactClass::HazardSpike
            | ContactClass::HazardEnemy => {
                if agent_alive {
                    deaths.write(DeathRequested {
                        agent: subject,
                        cause: DeathCause::Hazard,
                    });
                }
            }
            ContactClass::Checkpoint => {
                if agent_alive {
                    interactions.write(AgentInteraction::CheckpointReached {
                        agent: subject,
                        marker: other,
                    });
                }
            }
            ContactClass::BossSwitch => {
                if agent_alive {
                    interactions.write(AgentInteraction::BossSwitchPressed {
                        agent: subject,
                        switch: other,
                    });
                }
            }
            ContactClass::Collectible => {
                if agent_alive {
                    interactions.write(AgentInteraction::CollectiblePicked {
                        agent: subject,
                        item: other,
                    });
                }
            }
            ContactClass::ColorZone(color) => {
                if agent_alive {
                    interactions.write(AgentInteraction::ColorZoneEntered {
                        agent: subject,
                        color,
                    });
                }
            }
        }
    }
}

/// Contact Plugin: события + dispatch
///
/// Детекция контактов регистрируется physics backend'ом в тот же set, до dispatch.
pub struct ContactPlugin;

impl Plugin for ContactPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ContactEvent>()
            .add_event::<HazardContact>()
            .add_event::<AgentInteraction>()
            .add_systems(
                FixedUpdate,
                dispatch_contacts.in_set(SimulationSet::Contacts),
            );
    }
}
