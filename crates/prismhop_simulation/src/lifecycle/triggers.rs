//! Источники DeathRequested помимо контактов: restart, лимит времени, первый spawn

use bevy::prelude::*;

use super::components::{DeathCause, DeathRequested};
use crate::components::{Agent, LifeState};
use crate::locomotion::MovementInput;
use crate::world_reset::{ChallengeClock, ChallengeRules};

/// Система: новый агент → неучитываемый respawn на checkpoint
pub fn request_initial_spawn(agents: Query<Entity, Added<Agent>>, mut deaths: EventWriter<DeathRequested>) {
    for agent in agents.iter() {
        deaths.write(DeathRequested {
            agent,
            cause: DeathCause::InitialSpawn,
        });
    }
}

/// Система: restart input (защёлка сбрасывается здесь)
pub fn restart_from_input(
    mut agents: Query<(Entity, &mut MovementInput, &LifeState), With<Agent>>,
    mut deaths: EventWriter<DeathRequested>,
) {
    for (agent, mut input, life) in agents.iter_mut() {
        if !input.restart {
            continue;
        }
        input.restart = false;

        if life.alive {
            deaths.write(DeathRequested {
                agent,
                cause: DeathCause::ManualRestart,
            });
        }
    }
}

/// Система: timed челлендж, время жизни вышло
pub fn time_limit_check(
    agents: Query<(Entity, &LifeState), With<Agent>>,
    rules: Res<ChallengeRules>,
    clock: Res<ChallengeClock>,
    mut deaths: EventWriter<DeathRequested>,
) {
    if !clock.limit_reached(&rules) {
        return;
    }

    for (agent, life) in agents.iter() {
        if life.alive {
            deaths.write(DeathRequested {
                agent,
                cause: DeathCause::TimeLimit,
            });
        }
    }
}
