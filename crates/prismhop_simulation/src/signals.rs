//! Produced signals для animation/audio/UI коллабораторов
//!
//! Fire-and-forget: симуляция пишет, внешний слой (renderer, audio, UI) читает.
//! Порядок относительно физики не гарантируется.

use bevy::prelude::*;
use rand::Rng;

use crate::components::PaintColor;
use crate::DeterministicRng;

/// Флаги и скаляры для animator'а агента
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AnimationSignals {
    pub grounded: bool,
    pub jump: bool,
    pub free_fall: bool,
    pub dying: bool,
    /// Blend value скорости (0 → idle, move_speed → walk, sprint_speed → run)
    pub speed: f32,
    /// Магнитуда input (1.0 для цифрового input)
    pub motion_speed: f32,
}

/// Звуковые подсказки (клипы выбирает audio слой)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Jump,
    Death,
    Collectible,
    ColorChange,
    BossSwitch,
    Footstep { variant: usize },
    Landing,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioCueEvent {
    pub agent: Entity,
    pub cue: AudioCue,
}

/// Цвет агента сменился (particles, renderer swap, UI tint)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorChanged {
    pub agent: Entity,
    pub color: PaintColor,
}

/// Засчитанная смерть (UI счётчик)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathCounted {
    pub agent: Entity,
    pub total: u32,
}

/// Animation event: шаг (приходит от animation слоя)
///
/// `weight` - вес клипа в blend tree; шаги от затухающих клипов игнорируются.
#[derive(Event, Debug, Clone, Copy)]
pub struct FootstepEvent {
    pub agent: Entity,
    pub weight: f32,
}

/// Animation event: приземление
#[derive(Event, Debug, Clone, Copy)]
pub struct LandingEvent {
    pub agent: Entity,
    pub weight: f32,
}

/// Минимальный вес клипа, при котором animation event озвучивается
pub const AUDIBLE_CLIP_WEIGHT: f32 = 0.5;

/// Количество вариантов звука шага
pub const FOOTSTEP_VARIANTS: usize = 4;

/// Система: animation events → audio cues
///
/// Вариант шага выбирается через DeterministicRng (повторяемые прогоны).
pub fn footstep_audio(
    mut footsteps: EventReader<FootstepEvent>,
    mut landings: EventReader<LandingEvent>,
    mut cues: EventWriter<AudioCueEvent>,
    mut rng: ResMut<DeterministicRng>,
) {
    for step in footsteps.read() {
        if step.weight > AUDIBLE_CLIP_WEIGHT {
            let variant = rng.rng.gen_range(0..FOOTSTEP_VARIANTS);
            cues.write(AudioCueEvent {
                agent: step.agent,
                cue: AudioCue::Footstep { variant },
            });
        }
    }

    for landing in landings.read() {
        if landing.weight > AUDIBLE_CLIP_WEIGHT {
            cues.write(AudioCueEvent {
                agent: landing.agent,
                cue: AudioCue::Landing,
            });
        }
    }
}

/// Signals Plugin: produced события + озвучка animation events
pub struct SignalsPlugin;

impl Plugin for SignalsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AudioCueEvent>()
            .add_event::<ColorChanged>()
            .add_event::<DeathCounted>()
            .add_event::<FootstepEvent>()
            .add_event::<LandingEvent>()
            .add_systems(
                FixedUpdate,
                footstep_audio.in_set(crate::SimulationSet::Bookkeeping),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(seed: u64) -> (World, Schedule) {
        let mut world = World::new();
        world.insert_resource(DeterministicRng::new(seed));
        world.init_resource::<Events<FootstepEvent>>();
        world.init_resource::<Events<LandingEvent>>();
        world.init_resource::<Events<AudioCueEvent>>();

        let mut schedule = Schedule::default();
        schedule.add_systems(footstep_audio);
        (world, schedule)
    }

    fn cues(world: &mut World) -> Vec<AudioCue> {
        world
            .resource_mut::<Events<AudioCueEvent>>()
            .drain()
            .map(|event| event.cue)
            .collect()
    }

    #[test]
    fn test_faded_clips_are_silent() {
        let (mut world, mut schedule) = setup(1);
        let agent = Entity::from_raw(1);

        world.send_event(FootstepEvent { agent, weight: 0.3 });
        world.send_event(LandingEvent { agent, weight: 0.5 });
        world.send_event(LandingEvent { agent, weight: 0.9 });
        schedule.run(&mut world);

        assert_eq!(cues(&mut world), vec![AudioCue::Landing]);
    }

    #[test]
    fn test_footstep_variants_deterministic() {
        let run = |seed: u64| {
            let (mut world, mut schedule) = setup(seed);
            let agent = Entity::from_raw(1);
            for _ in 0..16 {
                world.send_event(FootstepEvent { agent, weight: 1.0 });
            }
            schedule.run(&mut world);
            cues(&mut world)
        };

        let first = run(7);
        assert_eq!(first.len(), 16);
        assert_eq!(first, run(7));
        assert!(first
            .iter()
            .all(|cue| matches!(cue, AudioCue::Footstep { variant } if *variant < FOOTSTEP_VARIANTS)));
    }
}
