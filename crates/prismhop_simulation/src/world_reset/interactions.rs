//! Взаимодействия агента с уровнем + часы челленджей

use bevy::prelude::*;

use super::resources::*;
use crate::collision_layers::get_layer_name;
use crate::components::{
    Agent, AgentLayer, CheckpointMarker, Collectible, ColorState, ControlState, HeldInventory, Interactable,
    LifeState, PaintColor,
};
use crate::contact::AgentInteraction;
use crate::signals::{AudioCue, AudioCueEvent, ColorChanged};

/// Сменить цвет агента (layer + state), сигнал только при реальной смене
pub fn set_agent_color(
    agent: Entity,
    color: PaintColor,
    state: &mut ColorState,
    layer: &mut AgentLayer,
    changes: &mut EventWriter<ColorChanged>,
) -> bool {
    *layer = AgentLayer::for_color(color);
    if state.color == color {
        return false;
    }
    state.color = color;
    changes.write(ColorChanged { agent, color });
    true
}

/// Система: AgentInteraction → коллабораторы
///
/// - Checkpoint: нейтральный цвет, новая точка respawn'а, held засчитывается
///   (кроме one-life), финальный marker заканчивает run
/// - Boss switch: switch гаснет, нажатие запоминается для restart'а
/// - Collectible: jewel прячется, попадает в held, UI слот загорается
/// - Color zone: layer и цвет агента
pub fn handle_interactions(
    mut interactions: EventReader<AgentInteraction>,
    mut agents: Query<
        (
            &mut ColorState,
            &mut AgentLayer,
            &mut HeldInventory,
            &mut ControlState,
        ),
        With<Agent>,
    >,
    markers: Query<(&CheckpointMarker, &Transform), Without<Agent>>,
    mut interactables: Query<(&mut Interactable, Option<&Collectible>), Without<Agent>>,
    mut checkpoint: ResMut<CheckpointManager>,
    mut collectibles: ResMut<CollectibleRegistry>,
    mut boss: ResMut<BossEncounter>,
    rules: Res<ChallengeRules>,
    mut cues: EventWriter<AudioCueEvent>,
    mut color_changes: EventWriter<ColorChanged>,
) {
    for interaction in interactions.read() {
        match *interaction {
            AgentInteraction::CheckpointReached { agent, marker } => {
                let Ok((mut color, mut layer, mut held, mut control)) = agents.get_mut(agent) else {
                    continue;
                };
                let Ok((marker_info, marker_transform)) = markers.get(marker) else {
                    continue;
                };

                set_agent_color(agent, PaintColor::Neutral, &mut color, &mut layer, &mut color_changes);
                checkpoint.notify_reached(marker, marker_transform.translation);

                if !rules.one_life && !held.is_empty() {
                    crate::log(&format!("Checkpoint {:?}: banked {} collectibles", marker, held.items.len()));
                    held.items.clear();
                }

                if marker_info.is_final && !control.run_finished {
                    control.run_finished = true;
                    crate::log_info(&format!("Agent {:?} reached final checkpoint, run finished", agent));
                }
            }
            AgentInteraction::BossSwitchPressed { agent, switch } => {
                let Ok((mut interactable, _)) = interactables.get_mut(switch) else {
                    continue;
                };
                if !interactable.active {
                    continue;
                }

                interactable.active = false;
                boss.record_press(switch);
                cues.write(AudioCueEvent {
                    agent,
                    cue: AudioCue::BossSwitch,
                });
                crate::log(&format!("Boss switch {:?} pressed ({} total)", switch, boss.pressed.len()));
            }
            AgentInteraction::CollectiblePicked { agent, item } => {
                let Ok((mut interactable, Some(collectible))) = interactables.get_mut(item) else {
                    continue;
                };
                let Ok((_, _, mut held, _)) = agents.get_mut(agent) else {
                    continue;
                };
                if !interactable.active {
                    continue;
                }

                interactable.active = false;
                held.hold(item);
                collectibles.enable(&collectible.id);
                cues.write(AudioCueEvent {
                    agent,
                    cue: AudioCue::Collectible,
                });
                crate::log(&format!("Agent {:?} picked collectible '{}'", agent, collectible.id));
            }
            AgentInteraction::ColorZoneEntered { agent, color } => {
                let Ok((mut state, mut layer, _, _)) = agents.get_mut(agent) else {
                    continue;
                };

                cues.write(AudioCueEvent {
                    agent,
                    cue: AudioCue::ColorChange,
                });
                if set_agent_color(agent, color, &mut state, &mut layer, &mut color_changes) {
                    crate::log(&format!(
                        "Agent {:?} color → {:?} (layer {})",
                        agent,
                        color,
                        get_layer_name(layer.bits)
                    ));
                }
            }
        }
    }
}

/// Система: таймеры жизни/run/зоны (тикают пока агент жив и run не закончен)
pub fn tick_challenge_clocks(
    agents: Query<(&LifeState, &ControlState), With<Agent>>,
    mut clock: ResMut<ChallengeClock>,
    mut zones: ResMut<ZoneTracker>,
    time: Res<Time<Fixed>>,
) {
    let running = agents
        .iter()
        .any(|(life, control)| life.alive && !control.run_finished);
    if !running {
        return;
    }

    let delta = time.delta_secs();
    clock.life_elapsed += delta;
    clock.run_elapsed += delta;
    zones.advance(delta);
}
