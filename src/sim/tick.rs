//! Single physics step
//!
//! One call = one display frame. Order matters: the trail records where the
//! ball was before it moves, and the wall is checked after it moves.

use super::collision::resolve_boundary_collision;
use super::state::{CollisionEvent, SimState};
use crate::settings::PhysicsConfig;

/// Advance the ball by one tick. Returns the collision raised this tick, if any.
pub fn step(state: &mut SimState, config: &PhysicsConfig) -> Option<CollisionEvent> {
    state.time_ticks += 1;

    state.motion.push(state.ball.center);

    let ball = &mut state.ball;
    ball.velocity.y += config.gravity;
    ball.velocity *= config.velocity_decay;
    ball.center += ball.velocity;

    let result = resolve_boundary_collision(ball, &state.boundary, config);
    if !result.hit {
        return None;
    }

    ball.velocity = result.velocity;
    ball.radius = result.radius;
    ball.center = result.center;

    let point = result.point?;
    state.collisions.push(point);
    state.collision_count += 1;

    log::debug!(
        "Collision #{} at ({:.1}, {:.1}), radius {:.2}",
        state.collision_count,
        point.x,
        point.y,
        result.radius
    );

    Some(CollisionEvent {
        point,
        center: result.center,
        radius: result.radius,
        speed: result.velocity.length(),
        count: state.collision_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::Boundary;
    use glam::DVec2;

    fn scenario_state() -> SimState {
        // 440x440 surface -> boundary radius 200
        SimState::new(Boundary::from_surface(440.0, 440.0).unwrap())
    }

    #[test]
    fn test_free_flight_integrates_gravity_and_decay() {
        let mut state = scenario_state();
        let config = PhysicsConfig::default();
        let start = state.ball.center;

        let event = step(&mut state, &config);
        assert!(event.is_none());

        let expected_v = DVec2::new(0.8, 0.8 + config.gravity) * config.velocity_decay;
        assert!((state.ball.velocity - expected_v).length() < 1e-12);
        assert!((state.ball.center - (start + expected_v)).length() < 1e-12);

        // Trail holds the pre-move position
        assert_eq!(state.motion.latest(), Some(start));
        assert!(state.collisions.is_empty());
    }

    #[test]
    fn test_first_collision_scenario() {
        let mut state = scenario_state();
        let config = PhysicsConfig {
            gravity: 0.4,
            ..Default::default()
        };
        assert!((state.boundary.distance_to(state.ball.center) - 150.0).abs() < 1e-9);

        let mut first = None;
        for _ in 0..10_000 {
            if let Some(event) = step(&mut state, &config) {
                first = Some(event);
                break;
            }
        }

        let event = first.expect("ball should eventually reach the wall");
        assert_eq!(event.count, 1);
        assert_eq!(state.collisions.len(), 1);
        let expected = (INITIAL_BALL_RADIUS * 1.015).min(MAX_BALL_RADIUS);
        assert!((state.ball.radius - expected).abs() < 1e-12);
        assert!((event.radius - expected).abs() < 1e-12);
    }

    #[test]
    fn test_one_collision_per_crossing() {
        let mut state = scenario_state();
        let config = PhysicsConfig::default();

        // Straight drop: every bounce is on the floor
        state.ball.center = state.boundary.center - DVec2::new(0.0, 100.0);
        state.ball.velocity = DVec2::ZERO;

        // Hitting the wall on consecutive ticks would mean the ball got stuck
        let mut last_hit_tick = None;
        for _ in 0..2_000 {
            if state.boundary.radius - state.ball.radius < 20.0 {
                break;
            }
            if step(&mut state, &config).is_some() {
                if let Some(last) = last_hit_tick {
                    assert!(state.time_ticks > last + 1, "stuck at tick {}", state.time_ticks);
                }
                last_hit_tick = Some(state.time_ticks);
            }
        }
        assert!(state.collision_count > 1);
    }

    #[test]
    fn test_no_penetration_after_collision() {
        let mut state = scenario_state();
        let config = PhysicsConfig::default();

        for _ in 0..5_000 {
            if step(&mut state, &config).is_some() {
                let dist = state.boundary.distance_to(state.ball.center);
                let expected = (state.boundary.radius - state.ball.radius).max(0.0);
                assert!((dist - expected).abs() < 1e-6);
                assert!(state.ball.speed() >= MIN_VELOCITY - 1e-9);
            }
        }
    }

    #[test]
    fn test_histories_stay_bounded() {
        let mut state = scenario_state();
        let config = PhysicsConfig::default();

        for _ in 0..5_000 {
            step(&mut state, &config);
            assert!(state.motion.len() <= MOTION_BLUR_STEPS);
            assert!(state.collisions.len() <= MAX_COLLISION_POINTS);
        }
        assert_eq!(state.motion.len(), MOTION_BLUR_STEPS);
    }

    #[test]
    fn test_degenerate_config_does_not_panic() {
        let mut state = scenario_state();
        let config = PhysicsConfig {
            gravity: -3.0,
            velocity_increase_factor: 0.0,
            velocity_decay: -1.0,
            ball_growth_rate: 0.0,
        };
        for _ in 0..1_000 {
            step(&mut state, &config);
        }
        assert!(state.ball.center.is_finite());
        assert!(state.ball.radius >= INITIAL_BALL_RADIUS);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn radius_grows_monotonically_within_bounds(
                gravity in 0.0f64..2.0,
                decay in 0.9f64..=1.0,
                speedup in 1.0f64..1.05,
                growth in 0.5f64..1.1,
                ticks in 1usize..3_000,
            ) {
                let mut state = scenario_state();
                let config = PhysicsConfig {
                    gravity,
                    velocity_increase_factor: speedup,
                    velocity_decay: decay,
                    ball_growth_rate: growth,
                };

                let mut previous = state.ball.radius;
                let mut events = 0u64;
                for _ in 0..ticks {
                    if step(&mut state, &config).is_some() {
                        events += 1;
                    }
                    prop_assert!(state.ball.radius >= previous);
                    prop_assert!(state.ball.radius <= MAX_BALL_RADIUS);
                    previous = state.ball.radius;
                }

                prop_assert!(state.motion.len() <= MOTION_BLUR_STEPS);
                prop_assert!(state.collisions.len() <= MAX_COLLISION_POINTS);
                prop_assert_eq!(state.collision_count, events);
                prop_assert_eq!(state.time_ticks, ticks as u64);
            }
        }
    }
}
