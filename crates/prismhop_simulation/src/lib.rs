//! PRISMHOP Simulation Core
//!
//! ECS-симуляция third-person агента на Bevy 0.16 (headless)
//!
//! Тик (FixedUpdate 60Hz), порядок `SimulationSet`:
//! 1. Triggers - input gate, restart, лимит времени, первый spawn
//! 2. Contacts - physics backend → ContactEvent → типизированные запросы
//! 3. Interactions - checkpoint / switch / jewel / color zone
//! 4. Lifecycle - death → respawn фазы, reset мира
//! 5. Hazards - timed trapdoor'ы и moving spikes
//! 6. Locomotion - probe → gravity → integrate → kinematic move
//! 7. Camera - orbit после движения
//! 8. Bookkeeping - часы челленджей, звуки шагов

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod camera;
pub mod collision_layers;
pub mod components;
pub mod contact;
pub mod hazard;
pub mod lifecycle;
pub mod locomotion;
pub mod logger;
pub mod physics;
pub mod scheduler;
pub mod signals;
pub mod world_reset;

// Re-export базовых типов для удобства
pub use camera::{CameraOrbit, CameraOrbitConfig, CameraOrbitPlugin};
pub use components::*;
pub use contact::{AgentInteraction, ContactClass, ContactEvent, ContactPlugin, ContactTag, HazardContact};
pub use hazard::{HazardPlugin, HazardState, HazardStep, HazardTrigger, MovingHazard, ResetHazard};
pub use lifecycle::{DeathCause, DeathRequested, LifecycleConfig, LifecyclePlugin, LifecycleStep};
pub use locomotion::{
    KinematicMotion, LocomotionConfig, LocomotionPlugin, LocomotionState, MovementInput, PointerDevice,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use physics::{HeadlessCollider, PhysicsBackend};
pub use scheduler::DeferredScheduler;
pub use signals::{AnimationSignals, AudioCue, AudioCueEvent, ColorChanged, DeathCounted};
pub use world_reset::{
    BossEncounter, ChallengeClock, ChallengeRules, CheckpointManager, CollectibleRegistry, ConfigError, DeathCounter,
    insert_level_collaborators, WorldResetRegistry, ZoneTracker,
};

/// Порядок подсистем внутри одного FixedUpdate тика
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Triggers,
    Contacts,
    Interactions,
    Lifecycle,
    Hazards,
    Locomotion,
    Camera,
    Bookkeeping,
}

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationPlugin {
    pub backend: PhysicsBackend,
}

impl SimulationPlugin {
    pub fn with_backend(backend: PhysicsBackend) -> Self {
        Self { backend }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Triggers,
                    SimulationSet::Contacts,
                    SimulationSet::Interactions,
                    SimulationSet::Lifecycle,
                    SimulationSet::Hazards,
                    SimulationSet::Locomotion,
                    SimulationSet::Camera,
                    SimulationSet::Bookkeeping,
                )
                    .chain(),
            )
            .add_plugins((
                signals::SignalsPlugin,
                ContactPlugin,
                world_reset::WorldResetPlugin,
                LifecyclePlugin,
                HazardPlugin,
                LocomotionPlugin,
                CameraOrbitPlugin,
            ));

        if !app.world().contains_resource::<DeterministicRng>() {
            // Детерминистичный RNG (seed по умолчанию)
            app.insert_resource(DeterministicRng::new(42));
        }

        match self.backend {
            PhysicsBackend::Headless => {
                app.add_plugins(physics::HeadlessPhysicsPlugin);
            }
            PhysicsBackend::Rapier => {
                app.add_plugins(physics::RapierBackendPlugin);
            }
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
