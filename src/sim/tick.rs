//! Navigation integration step
//!
//! Advances rocket motion by one tick. Constants are tuned per reference
//! frame (16 ms); other deltas scale them so behavior holds across frame
//! rates.

use glam::Vec2;

use super::proximity::nearest_station;
use super::state::{Bounds, SimulationState, Station};
use crate::config::MotionTuning;
use crate::consts::*;
use crate::error::SimError;
use crate::is_finite_vec;

/// Advance the navigation state by `delta_ms`.
///
/// Inactive states are left untouched. On invalid input the state is not
/// modified.
pub fn tick(
    state: &mut SimulationState,
    tuning: &MotionTuning,
    bounds: &Bounds,
    stations: &[Station],
    delta_ms: f32,
) -> Result<(), SimError> {
    if !delta_ms.is_finite() || delta_ms <= 0.0 {
        log::warn!("Dropping navigation tick with delta {}", delta_ms);
        return Err(SimError::InvalidInput("tick delta must be finite and positive"));
    }
    if !state.is_active {
        return Ok(());
    }

    let scale = delta_ms / REFERENCE_FRAME_MS;

    let velocity = step_velocity(state.velocity, state.input.thrust(), tuning, scale);
    let position = bounds.clamp(state.position + velocity * scale);

    if !is_finite_vec(velocity) || !is_finite_vec(position) {
        log::warn!("Dropping non-finite navigation step (vel {velocity}, pos {position})");
        return Err(SimError::InvalidInput("navigation step produced non-finite state"));
    }

    state.velocity = velocity;
    state.position = position;
    state.time_ticks += 1;
    state.nearest_station = nearest_station(position, stations, tuning.proximity_threshold)
        .map(|hit| hit.index);

    Ok(())
}

/// Acceleration, friction and speed cap for one tick
pub fn step_velocity(velocity: Vec2, thrust: Vec2, tuning: &MotionTuning, scale: f32) -> Vec2 {
    let mut vel = velocity + thrust * tuning.acceleration * scale;

    vel *= tuning.friction.powf(scale);
    if vel.length() < VELOCITY_EPSILON {
        vel = Vec2::ZERO;
    }

    clamp_speed(vel, tuning.max_speed)
}

/// Rescale to exactly `max_speed` when faster, keeping direction
#[inline]
pub fn clamp_speed(vel: Vec2, max_speed: f32) -> Vec2 {
    let speed = vel.length();
    if speed > max_speed {
        vel * (max_speed / speed)
    } else {
        vel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Direction;
    use proptest::prelude::*;

    fn tuning() -> MotionTuning {
        MotionTuning {
            acceleration: 0.5,
            friction: 0.92,
            max_speed: 5.0,
            proximity_threshold: 80.0,
        }
    }

    fn open_bounds() -> Bounds {
        Bounds::new(Vec2::splat(-1.0e6), Vec2::splat(1.0e6))
    }

    #[test]
    fn test_hold_then_release() {
        let mut state = SimulationState::new(Vec2::ZERO);
        let tuning = tuning();
        let bounds = open_bounds();

        state.input.set(Direction::Right, true);
        let mut last = 0.0;
        for _ in 0..20 {
            tick(&mut state, &tuning, &bounds, &[], REFERENCE_FRAME_MS).unwrap();
            assert!(state.velocity.x > last);
            assert!(state.velocity.x <= 5.0);
            last = state.velocity.x;
        }
        assert!(last > 4.0);

        state.input.set(Direction::Right, false);
        for _ in 0..30 {
            tick(&mut state, &tuning, &bounds, &[], REFERENCE_FRAME_MS).unwrap();
            assert!(state.velocity.x <= last);
            assert!(state.velocity.x >= 0.0);
            last = state.velocity.x;
        }
        assert!(last < 0.5);
        assert_eq!(state.velocity.y, 0.0);
    }

    #[test]
    fn test_speed_capped_exactly() {
        let mut state = SimulationState::new(Vec2::ZERO);
        state.input.set(Direction::Right, true);
        state.input.set(Direction::Down, true);
        for _ in 0..200 {
            tick(&mut state, &tuning(), &open_bounds(), &[], REFERENCE_FRAME_MS).unwrap();
        }
        assert!((state.velocity.length() - 5.0).abs() < 1e-4);
        // Diagonal direction preserved
        assert!((state.velocity.x - state.velocity.y).abs() < 1e-4);
    }

    #[test]
    fn test_decays_to_exact_zero() {
        let mut state = SimulationState::new(Vec2::ZERO);
        state.velocity = Vec2::new(5.0, -3.0);
        for _ in 0..500 {
            tick(&mut state, &tuning(), &open_bounds(), &[], REFERENCE_FRAME_MS).unwrap();
        }
        assert_eq!(state.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_position_clamped() {
        let bounds = Bounds::new(Vec2::ZERO, Vec2::new(100.0, 100.0));
        let mut state = SimulationState::new(Vec2::new(99.0, 1.0));
        state.input.set(Direction::Right, true);
        state.input.set(Direction::Up, true);
        for _ in 0..50 {
            tick(&mut state, &tuning(), &bounds, &[], REFERENCE_FRAME_MS).unwrap();
        }
        assert_eq!(state.position, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_invalid_delta_leaves_state() {
        let mut state = SimulationState::new(Vec2::new(10.0, 10.0));
        state.velocity = Vec2::new(1.0, 0.0);
        let before = state.clone();
        for bad in [f32::NAN, f32::INFINITY, 0.0, -16.0] {
            let result = tick(&mut state, &tuning(), &open_bounds(), &[], bad);
            assert!(matches!(result, Err(SimError::InvalidInput(_))));
        }
        assert_eq!(state.position, before.position);
        assert_eq!(state.velocity, before.velocity);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_inactive_tick_is_noop() {
        let mut state = SimulationState::new(Vec2::ZERO);
        state.velocity = Vec2::new(3.0, 0.0);
        state.is_active = false;
        tick(&mut state, &tuning(), &open_bounds(), &[], REFERENCE_FRAME_MS).unwrap();
        assert_eq!(state.position, Vec2::ZERO);
        assert_eq!(state.velocity, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_variable_step_matches_reference() {
        // Two 8 ms ticks with no thrust decay the same as one 16 ms tick
        let mut a = SimulationState::new(Vec2::ZERO);
        let mut b = SimulationState::new(Vec2::ZERO);
        a.velocity = Vec2::new(4.0, 0.0);
        b.velocity = Vec2::new(4.0, 0.0);
        tick(&mut a, &tuning(), &open_bounds(), &[], 16.0).unwrap();
        tick(&mut b, &tuning(), &open_bounds(), &[], 8.0).unwrap();
        tick(&mut b, &tuning(), &open_bounds(), &[], 8.0).unwrap();
        assert!((a.velocity.x - b.velocity.x).abs() < 1e-4);
    }

    #[test]
    fn test_nearest_station_updated() {
        let stations = [Station::new("a", "A", Vec2::new(60.0, 0.0))];
        let mut state = SimulationState::new(Vec2::new(-100.0, 0.0));
        state.input.set(Direction::Right, true);
        let mut seen = false;
        for _ in 0..60 {
            tick(&mut state, &tuning(), &open_bounds(), &stations, REFERENCE_FRAME_MS).unwrap();
            let in_range = state.position.distance(stations[0].position) <= 80.0;
            assert_eq!(state.nearest_station.is_some(), in_range);
            seen |= in_range;
        }
        assert!(seen);
    }

    fn direction_strategy() -> impl Strategy<Value = (bool, bool, bool, bool)> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>())
    }

    proptest! {
        #[test]
        fn prop_speed_and_bounds_hold(
            inputs in prop::collection::vec((direction_strategy(), 1.0f32..48.0), 1..120),
        ) {
            let bounds = Bounds::new(Vec2::ZERO, Vec2::new(200.0, 120.0));
            let mut state = SimulationState::new(Vec2::new(100.0, 60.0));
            for ((up, down, left, right), dt) in inputs {
                state.input.set(Direction::Up, up);
                state.input.set(Direction::Down, down);
                state.input.set(Direction::Left, left);
                state.input.set(Direction::Right, right);
                tick(&mut state, &tuning(), &bounds, &[], dt).unwrap();
                prop_assert!(state.velocity.length() <= 5.0 + 1e-4);
                prop_assert!(bounds.contains(state.position));
            }
        }

        #[test]
        fn prop_no_input_speed_non_increasing(
            vx in -5.0f32..5.0,
            vy in -5.0f32..5.0,
            dts in prop::collection::vec(1.0f32..48.0, 1..100),
        ) {
            let mut state = SimulationState::new(Vec2::ZERO);
            state.velocity = clamp_speed(Vec2::new(vx, vy), 5.0);
            let mut last = state.velocity.length();
            for dt in dts {
                tick(&mut state, &tuning(), &open_bounds(), &[], dt).unwrap();
                let speed = state.velocity.length();
                prop_assert!(speed <= last + 1e-6);
                last = speed;
            }
        }
    }
}
