//! Rocket navigator
//!
//! Owns the input and motion state for one rocket and exposes the commands
//! a host issues: steer, tick, reset, stop, select.

use std::sync::Arc;

use glam::Vec2;

use super::state::{Bounds, Direction, NavSnapshot, SimulationState, Station};
use super::tick::tick;
use crate::config::MotionTuning;
use crate::error::SimError;
use crate::is_finite_vec;

#[derive(Debug, Clone)]
pub struct Navigator {
    stations: Arc<[Station]>,
    bounds: Bounds,
    tuning: MotionTuning,
    state: SimulationState,
}

impl Navigator {
    /// Create an active navigator at `start` (clamped to bounds)
    pub fn new(
        stations: Arc<[Station]>,
        bounds: Bounds,
        tuning: MotionTuning,
        start: Vec2,
    ) -> Self {
        Self {
            stations,
            bounds,
            tuning,
            state: SimulationState::new(bounds.clamp(start)),
        }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active
    }

    pub fn nearest_station(&self) -> Option<&Station> {
        self.state.nearest_station.and_then(|i| self.stations.get(i))
    }

    pub fn set_direction_held(&mut self, direction: Direction, held: bool) {
        self.state.input.set(direction, held);
    }

    /// Advance by `delta_ms`. Returns the post-tick snapshot.
    pub fn tick(&mut self, delta_ms: f32) -> Result<NavSnapshot, SimError> {
        tick(
            &mut self.state,
            &self.tuning,
            &self.bounds,
            &self.stations,
            delta_ms,
        )?;
        Ok(self.snapshot())
    }

    /// Teleport to `position` with zero velocity and reactivate
    pub fn reset(&mut self, position: Vec2) -> Result<(), SimError> {
        if !is_finite_vec(position) {
            log::warn!("Ignoring reset to non-finite position {}", position);
            return Err(SimError::InvalidInput("reset position must be finite"));
        }
        self.state.position = self.bounds.clamp(position);
        self.state.velocity = Vec2::ZERO;
        self.state.nearest_station = None;
        self.state.is_active = true;
        Ok(())
    }

    /// Deactivate without selecting; ticks become no-ops until `reset`
    pub fn stop(&mut self) {
        self.state.is_active = false;
        self.state.velocity = Vec2::ZERO;
        self.state.input.clear();
    }

    /// Select the nearby station and halt the rocket
    pub fn trigger_station_selection(&mut self) -> Result<&Station, SimError> {
        let index = self
            .state
            .nearest_station
            .filter(|_| self.state.is_active)
            .ok_or(SimError::NoStationInRange)?;
        self.stop();
        let station = &self.stations[index];
        log::info!("Station selected: {}", station.name);
        Ok(station)
    }

    pub fn snapshot(&self) -> NavSnapshot {
        NavSnapshot::from_state(&self.state, &self.stations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::REFERENCE_FRAME_MS;

    fn navigator(start: Vec2) -> Navigator {
        let stations: Arc<[Station]> = vec![
            Station::new("a", "Alpha", Vec2::new(100.0, 100.0)),
            Station::new("b", "Beta", Vec2::new(400.0, 100.0)),
        ]
        .into();
        Navigator::new(
            stations,
            Bounds::new(Vec2::ZERO, Vec2::new(500.0, 300.0)),
            MotionTuning::default(),
            start,
        )
    }

    #[test]
    fn test_select_with_station_nearby() {
        let mut nav = navigator(Vec2::new(150.0, 100.0));
        nav.set_direction_held(Direction::Right, true);
        let snap = nav.tick(REFERENCE_FRAME_MS).unwrap();
        assert_eq!(snap.nearest_station_id.as_deref(), Some("a"));

        let station = nav.trigger_station_selection().unwrap();
        assert_eq!(station.id, "a");
        assert!(!nav.is_active());
        assert_eq!(nav.state().velocity, Vec2::ZERO);
        assert!(!nav.state().input.is_held(Direction::Right));

        // Ticks are no-ops while inactive
        let before = nav.state().position;
        nav.set_direction_held(Direction::Right, true);
        nav.tick(REFERENCE_FRAME_MS).unwrap();
        assert_eq!(nav.state().position, before);
    }

    #[test]
    fn test_select_without_station() {
        let mut nav = navigator(Vec2::new(250.0, 250.0));
        nav.tick(REFERENCE_FRAME_MS).unwrap();
        assert_eq!(nav.trigger_station_selection(), Err(SimError::NoStationInRange));
        assert!(nav.is_active());
    }

    #[test]
    fn test_reset_reactivates() {
        let mut nav = navigator(Vec2::new(120.0, 100.0));
        nav.tick(REFERENCE_FRAME_MS).unwrap();
        nav.trigger_station_selection().unwrap();

        nav.reset(Vec2::new(250.0, 150.0)).unwrap();
        assert!(nav.is_active());
        assert_eq!(nav.state().position, Vec2::new(250.0, 150.0));
        assert!(nav.nearest_station().is_none());

        nav.set_direction_held(Direction::Down, true);
        nav.tick(REFERENCE_FRAME_MS).unwrap();
        assert!(nav.state().position.y > 150.0);
    }

    #[test]
    fn test_reset_rejects_non_finite() {
        let mut nav = navigator(Vec2::new(250.0, 150.0));
        let result = nav.reset(Vec2::new(f32::NAN, 0.0));
        assert!(matches!(result, Err(SimError::InvalidInput(_))));
        assert_eq!(nav.state().position, Vec2::new(250.0, 150.0));
    }

    #[test]
    fn test_reset_clamps_to_bounds() {
        let mut nav = navigator(Vec2::ZERO);
        nav.reset(Vec2::new(900.0, -50.0)).unwrap();
        assert_eq!(nav.state().position, Vec2::new(500.0, 0.0));
    }

    #[test]
    fn test_stop_halts() {
        let mut nav = navigator(Vec2::new(250.0, 150.0));
        nav.set_direction_held(Direction::Left, true);
        nav.tick(REFERENCE_FRAME_MS).unwrap();
        nav.stop();
        let snap = nav.snapshot();
        assert!(!snap.is_active);
        assert!(!snap.is_boosting);
        assert_eq!(snap.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_boost_and_heading() {
        let mut nav = navigator(Vec2::new(250.0, 150.0));
        nav.set_direction_held(Direction::Down, true);
        let mut snap = nav.snapshot();
        for _ in 0..30 {
            snap = nav.tick(REFERENCE_FRAME_MS).unwrap();
        }
        assert!(snap.is_boosting);
        assert!((snap.heading_degrees - 90.0).abs() < 1e-3);
    }
}
