//! Tests for locomotion integrator.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::locomotion::integrator::*;
    use crate::locomotion::{LocomotionConfig, LocomotionState, MovementInput};
    use crate::signals::AnimationSignals;

    const DT: f32 = 1.0 / 60.0;

    fn grounded_state(config: &LocomotionConfig) -> LocomotionState {
        LocomotionState {
            jump_timeout_delta: 0.0,
            grounded: true,
            ..LocomotionState::from_config(config)
        }
    }

    #[test]
    fn test_jump_velocity_formula() {
        // sqrt(2 * 1.2 * 15) = 6.0
        assert!((jump_velocity(1.2, -15.0) - 6.0).abs() < 1e-5);
        assert!((jump_velocity(2.0, -9.81) - (2.0f32 * 2.0 * 9.81).sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_jump_sets_exact_velocity_before_gravity() {
        let config = LocomotionConfig::default();
        let mut state = grounded_state(&config);
        let mut signals = AnimationSignals::default();
        let mut jump = true;

        let outcome = step_jump_and_gravity(&mut state, &config, &mut jump, true, &mut signals, DT);

        assert!(outcome.jumped);
        assert!(!jump, "jump request consumed");
        assert!(!state.grounded);
        assert!(signals.jump);
        // Гравитация применяется в том же шаге после прыжка
        let expected = jump_velocity(config.jump_height, config.gravity) + config.gravity * DT;
        assert!((state.vertical_velocity - expected).abs() < 1e-5);
    }

    #[test]
    fn test_jump_waits_for_timeout_and_stays_latched() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState::from_config(&config);
        let mut signals = AnimationSignals::default();
        let mut jump = true;

        // 0.5 сек timeout при dt 0.25: два тика ждём, запрос висит
        let mut ticks = 0;
        loop {
            state.grounded = true;
            let outcome = step_jump_and_gravity(&mut state, &config, &mut jump, true, &mut signals, 0.25);
            if outcome.jumped {
                break;
            }
            assert!(jump, "request stays latched while timeout runs");
            ticks += 1;
            assert!(ticks < 10, "jump never happened");
        }

        assert_eq!(ticks, 2);
    }

    #[test]
    fn test_no_jump_when_airborne_and_request_dropped() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState {
            grounded: false,
            jump_timeout_delta: 0.0,
            ..LocomotionState::from_config(&config)
        };
        let mut signals = AnimationSignals::default();
        let mut jump = true;

        let outcome = step_jump_and_gravity(&mut state, &config, &mut jump, true, &mut signals, DT);

        assert!(!outcome.jumped);
        assert!(!jump);
        assert_eq!(state.jump_timeout_delta, config.jump_timeout);
    }

    #[test]
    fn test_jump_budget_blocks_jump() {
        let config = LocomotionConfig::default();
        let mut state = grounded_state(&config);
        let mut signals = AnimationSignals::default();
        let mut jump = true;

        let outcome = step_jump_and_gravity(&mut state, &config, &mut jump, false, &mut signals, DT);

        assert!(!outcome.jumped);
        assert!(state.grounded);
    }

    #[test]
    fn test_grounded_clamps_falling_velocity() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState {
            vertical_velocity: -30.0,
            ..grounded_state(&config)
        };
        let mut signals = AnimationSignals::default();
        let mut jump = false;

        step_jump_and_gravity(&mut state, &config, &mut jump, true, &mut signals, DT);

        let expected = GROUNDED_VERTICAL_VELOCITY + config.gravity * DT;
        assert!((state.vertical_velocity - expected).abs() < 1e-5);
    }

    #[test]
    fn test_free_fall_after_fall_timeout() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState {
            grounded: false,
            ..LocomotionState::from_config(&config)
        };
        let mut signals = AnimationSignals::default();
        let mut jump = false;

        // 0.15 сек ≈ 9 тиков отсчёта, free fall только после истечения
        for _ in 0..9 {
            step_jump_and_gravity(&mut state, &config, &mut jump, true, &mut signals, DT);
            assert!(!signals.free_fall);
        }
        for _ in 0..2 {
            step_jump_and_gravity(&mut state, &config, &mut jump, true, &mut signals, DT);
        }
        assert!(signals.free_fall);
    }

    #[test]
    fn test_gravity_check_happens_before_add() {
        let config = LocomotionConfig {
            terminal_velocity: 1.0,
            gravity: 15.0, // "Вверх", чтобы упереться в terminal
            ..LocomotionConfig::default()
        };
        let mut state = LocomotionState {
            grounded: false,
            vertical_velocity: 0.9,
            ..LocomotionState::from_config(&config)
        };
        let mut signals = AnimationSignals::default();
        let mut jump = false;

        // 0.9 < 1.0 → добавляем и выходим за terminal
        step_jump_and_gravity(&mut state, &config, &mut jump, true, &mut signals, 0.1);
        assert!((state.vertical_velocity - 2.4).abs() < 1e-5);

        // Теперь 2.4 ≥ 1.0 → больше не добавляем
        step_jump_and_gravity(&mut state, &config, &mut jump, true, &mut signals, 0.1);
        assert!((state.vertical_velocity - 2.4).abs() < 1e-5);
    }

    #[test]
    fn test_speed_snaps_inside_offset() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState::default();
        let mut signals = AnimationSignals::default();
        let input = MovementInput {
            move_axis: Vec2::Y,
            ..Default::default()
        };

        step_move(&mut state, &config, &input, 1.95, 0.0, &mut signals, DT);
        assert_eq!(state.speed, config.move_speed);
    }

    #[test]
    fn test_speed_lerps_and_rounds() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState::default();
        let mut signals = AnimationSignals::default();
        let input = MovementInput {
            move_axis: Vec2::Y,
            sprint: true,
            ..Default::default()
        };

        step_move(&mut state, &config, &input, 0.0, 0.0, &mut signals, DT);

        let raw = config.sprint_speed * DT * config.speed_change_rate;
        assert!((state.speed - raw).abs() < 1e-3);
        assert_eq!(state.speed, round_to_millis(state.speed));
    }

    #[test]
    fn test_analog_magnitude_scales_target() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState::default();
        let mut signals = AnimationSignals::default();
        let input = MovementInput {
            move_axis: Vec2::new(0.0, 0.5),
            analog_movement: true,
            ..Default::default()
        };

        // Большой dt: lerp t = 1 → ровно target * magnitude
        step_move(&mut state, &config, &input, 0.0, 0.0, &mut signals, 1.0);
        assert!((state.speed - 1.0).abs() < 1e-6);
        assert_eq!(signals.motion_speed, 0.5);
    }

    #[test]
    fn test_blend_snaps_to_zero() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState {
            animation_blend: 0.0105,
            ..Default::default()
        };
        let mut signals = AnimationSignals::default();

        step_move(&mut state, &config, &MovementInput::default(), 0.0, 0.0, &mut signals, DT);

        assert_eq!(state.animation_blend, 0.0);
        assert_eq!(signals.speed, 0.0);
    }

    #[test]
    fn test_translation_follows_smoothed_facing() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState::default();
        let mut signals = AnimationSignals::default();
        // Вправо относительно камеры → target yaw 90°
        let input = MovementInput {
            move_axis: Vec2::X,
            ..Default::default()
        };

        let displacement = step_move(&mut state, &config, &input, config.move_speed, 0.0, &mut signals, DT);

        assert!((state.target_rotation - 90.0).abs() < 1e-4);
        assert!(state.facing_yaw > 0.0 && state.facing_yaw < 90.0, "facing {}", state.facing_yaw);

        let horizontal = Vec3::new(displacement.x, 0.0, displacement.z).normalize();
        let facing = yaw_forward(state.facing_yaw);
        assert!(horizontal.distance(facing) < 1e-4);
    }

    #[test]
    fn test_camera_yaw_offsets_target() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState::default();
        let mut signals = AnimationSignals::default();
        let input = MovementInput {
            move_axis: Vec2::Y,
            ..Default::default()
        };

        step_move(&mut state, &config, &input, 0.0, 45.0, &mut signals, DT);
        assert!((state.target_rotation - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_facing_converges_without_overshoot() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState::default();
        let mut signals = AnimationSignals::default();
        let input = MovementInput {
            move_axis: Vec2::new(-1.0, 0.0),
            ..Default::default()
        };

        for _ in 0..120 {
            step_move(&mut state, &config, &input, 0.0, 0.0, &mut signals, DT);
            // Цель -90° = 270°, поворот по короткой дуге через 360
            assert!(state.facing_yaw == 0.0 || state.facing_yaw >= 269.9);
        }
        assert!((state.facing_yaw - 270.0).abs() < 0.01);
    }

    #[test]
    fn test_delta_angle_shortest_path() {
        assert!((delta_angle(350.0, 10.0) - 20.0).abs() < 1e-4);
        assert!((delta_angle(10.0, 350.0) + 20.0).abs() < 1e-4);
        assert!((delta_angle(0.0, 180.0) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_displacement_includes_vertical_velocity() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState {
            vertical_velocity: -6.0,
            ..Default::default()
        };
        let mut signals = AnimationSignals::default();

        let displacement = step_move(&mut state, &config, &MovementInput::default(), 0.0, 0.0, &mut signals, 0.5);
        assert!((displacement.y + 3.0).abs() < 1e-6);
        assert!(displacement.x.abs() < 1e-6 && displacement.z.abs() < 1e-6);
    }
}
