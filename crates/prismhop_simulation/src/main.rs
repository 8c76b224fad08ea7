//! Headless симуляция PRISMHOP
//!
//! Маленькая трасса (пол, trapdoor, jewel, checkpoint), скриптованный input,
//! сводка в консоль. Без рендера.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use prismhop_simulation::collision_layers::LAYER_DEFAULT;
use prismhop_simulation::*;

const TICK_COUNT: usize = 900;

fn build_course(commands: &mut Commands) -> Entity {
    // Пол (top = 0)
    commands.spawn((
        Transform::from_xyz(0.0, -0.5, 0.0),
        HeadlessCollider::solid(Vec3::new(4.0, 0.5, 6.0), LAYER_DEFAULT),
    ));

    // Trapdoor впереди: проваливается через 0.5 сек после касания
    let trapdoor = commands
        .spawn((
            Transform::from_xyz(0.0, -0.25, 8.0),
            HeadlessCollider::solid(Vec3::new(2.0, 0.25, 2.0), LAYER_DEFAULT),
            HazardTrigger::new(0.5, 1.5)
                .with_translation(Vec3::new(0.0, -4.0, 0.0))
                .with_rotation(Vec3::new(30.0, 0.0, 0.0)),
        ))
        .id();

    // Смертельный пол под трассой
    commands.spawn((
        Transform::from_xyz(0.0, -12.0, 0.0),
        HeadlessCollider::sensor(Vec3::new(50.0, 1.0, 50.0)),
        ContactTag(ContactClass::DeathHazardInstant),
    ));

    // Jewel у старта
    commands.spawn((
        Transform::from_xyz(0.0, 1.0, 3.0),
        HeadlessCollider::sensor(Vec3::splat(0.3)),
        Collectible::new("jewel_start"),
        ContactTag(ContactClass::Collectible),
    ));

    // Checkpoint за trapdoor'ом
    commands.spawn((
        Transform::from_xyz(0.0, 0.5, 11.0),
        HeadlessCollider::sensor(Vec3::new(2.0, 1.0, 0.5)),
        CheckpointMarker { is_final: false },
        ContactTag(ContactClass::Checkpoint),
    ));

    trapdoor
}

fn main() {
    let seed = 42;
    println!("Starting PRISMHOP headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin::default())
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)));
    insert_level_collaborators(&mut app, CheckpointManager::new(Vec3::ZERO), ChallengeRules::default());

    let (agent, trapdoor) = {
        let mut commands = app.world_mut().commands();
        let trapdoor = build_course(&mut commands);
        let agent = spawn_agent(&mut commands, Vec3::ZERO);
        (agent, trapdoor)
    };
    app.world_mut().flush();

    for tick in 0..TICK_COUNT {
        if let Some(mut input) = app.world_mut().get_mut::<MovementInput>(agent) {
            input.move_axis = if tick < 600 { Vec2::Y } else { Vec2::ZERO };
            input.sprint = (200..600).contains(&tick);
            input.jump = tick == 420;
            input.restart = tick == 750;
        }

        app.update();

        if tick % 60 == 0 {
            let world = app.world();
            let position = world.get::<Transform>(agent).map(|t| t.translation).unwrap_or_default();
            let alive = world.get::<LifeState>(agent).map(|l| l.alive).unwrap_or(false);
            let hazard = world.get::<HazardTrigger>(trapdoor).map(|h| h.state);
            println!(
                "Tick {}: agent at ({:.2}, {:.2}, {:.2}), alive: {}, trapdoor: {:?}",
                tick, position.x, position.y, position.z, alive, hazard
            );
        }
    }

    let world = app.world();
    let deaths = world.resource::<DeathCounter>().total;
    let checkpoint = world.resource::<CheckpointManager>().position;
    let collected = world.resource::<CollectibleRegistry>().collected_ui.len();
    println!(
        "Simulation complete! deaths: {}, checkpoint: {:?}, collectibles shown: {}",
        deaths, checkpoint, collected
    );
}
