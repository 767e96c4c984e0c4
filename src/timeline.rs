//! Timeline layout helpers
//!
//! Maps horizontal travel onto a span of years and runs the automatic
//! station tour.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::sim::sequencer::{Phase, PhaseSequencer};
use crate::sim::state::Station;

/// Years covered left-to-right across the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineScale {
    pub start_year: i32,
    pub end_year: i32,
}

impl Default for TimelineScale {
    fn default() -> Self {
        Self {
            start_year: 2000,
            end_year: 2025,
        }
    }
}

impl TimelineScale {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.end_year < self.start_year {
            return Err(SimError::InvalidConfig(format!(
                "timeline ends ({}) before it starts ({})",
                self.end_year, self.start_year
            )));
        }
        Ok(())
    }

    /// Year at a 0..=1 progress fraction, rounded and clamped to the span
    pub fn year_at(&self, progress: f32) -> i32 {
        let start = self.start_year as f64;
        let span = self.end_year as f64 - start;
        let year = (start + progress.clamp(0.0, 1.0) as f64 * span).round();
        year.clamp(start, self.end_year as f64) as i32
    }
}

/// Journey progress (0..=100) when standing at station `index` of `count`
pub fn journey_progress(index: usize, count: usize) -> f32 {
    if count <= 1 {
        return 0.0;
    }
    index.min(count - 1) as f32 / (count - 1) as f32 * 100.0
}

/// Automatic tour: visits every station in list order, dwelling at each
#[derive(Debug, Clone)]
pub struct AutoTour {
    sequencer: PhaseSequencer,
    current: Option<usize>,
}

/// What a tour tick asks the host to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourStep {
    /// Nothing changed
    Hold,
    /// Move the rocket to this station index
    Visit(usize),
    /// The tour has ended
    Finished,
}

impl AutoTour {
    pub fn new(stations: &[Station], dwell_ms: f64) -> Result<Self, SimError> {
        let phases = stations
            .iter()
            .map(|s| Phase::new(s.id.clone(), dwell_ms))
            .collect();
        Ok(Self {
            sequencer: PhaseSequencer::new(phases)?,
            current: None,
        })
    }

    pub fn is_running(&self) -> bool {
        self.sequencer.is_running()
    }

    /// Station currently being shown
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn start(&mut self, now: f64) -> Result<(), SimError> {
        self.sequencer.start(now)?;
        log::info!(
            "Auto tour started ({} stations)",
            self.sequencer.phases().len()
        );
        Ok(())
    }

    pub fn stop(&mut self) {
        self.sequencer.cancel();
        self.current = None;
    }

    /// Advance the tour. A tick that jumps several stops reports the last one.
    pub fn tick(&mut self, now: f64) -> Result<TourStep, SimError> {
        let out = self.sequencer.tick(now)?;
        if out.completed() {
            log::info!("Auto tour finished");
            self.current = None;
            return Ok(TourStep::Finished);
        }
        match out.entered().last() {
            Some(index) => {
                self.current = Some(index);
                Ok(TourStep::Visit(index))
            }
            None => Ok(TourStep::Hold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn stations(n: usize) -> Vec<Station> {
        (0..n)
            .map(|i| Station::new(format!("s{i}"), format!("S{i}"), Vec2::new(i as f32, 0.0)))
            .collect()
    }

    #[test]
    fn test_year_at() {
        let scale = TimelineScale::default();
        assert_eq!(scale.year_at(0.0), 2000);
        assert_eq!(scale.year_at(0.5), 2013);
        assert_eq!(scale.year_at(1.0), 2025);
        assert_eq!(scale.year_at(2.0), 2025);
        assert_eq!(scale.year_at(-1.0), 2000);
    }

    #[test]
    fn test_year_at_full_i32_span() {
        let scale = TimelineScale {
            start_year: -2_000_000_000,
            end_year: 2_000_000_000,
        };
        scale.validate().unwrap();
        assert_eq!(scale.year_at(0.0), -2_000_000_000);
        assert_eq!(scale.year_at(1.0), 2_000_000_000);
        assert_eq!(scale.year_at(0.5), 0);

        let widest = TimelineScale {
            start_year: i32::MIN,
            end_year: i32::MAX,
        };
        assert_eq!(widest.year_at(1.0), i32::MAX);
        assert_eq!(widest.year_at(0.0), i32::MIN);
    }

    #[test]
    fn test_journey_progress() {
        assert_eq!(journey_progress(0, 8), 0.0);
        assert_eq!(journey_progress(7, 8), 100.0);
        assert!((journey_progress(2, 5) - 50.0).abs() < 1e-4);
        assert_eq!(journey_progress(0, 1), 0.0);
    }

    #[test]
    fn test_invalid_scale() {
        let scale = TimelineScale {
            start_year: 2025,
            end_year: 2000,
        };
        assert!(scale.validate().is_err());
    }

    #[test]
    fn test_tour_visits_in_order() {
        let mut tour = AutoTour::new(&stations(3), 1500.0).unwrap();
        tour.start(0.0).unwrap();

        assert_eq!(tour.tick(0.0).unwrap(), TourStep::Visit(0));
        assert_eq!(tour.tick(1000.0).unwrap(), TourStep::Hold);
        assert_eq!(tour.tick(1500.0).unwrap(), TourStep::Visit(1));
        assert_eq!(tour.current(), Some(1));
        assert_eq!(tour.tick(3100.0).unwrap(), TourStep::Visit(2));
        assert_eq!(tour.tick(4500.0).unwrap(), TourStep::Finished);
        assert!(!tour.is_running());
        assert_eq!(tour.current(), None);
    }

    #[test]
    fn test_tour_stop() {
        let mut tour = AutoTour::new(&stations(2), 1500.0).unwrap();
        tour.start(0.0).unwrap();
        tour.tick(10.0).unwrap();
        tour.stop();
        assert!(!tour.is_running());
        assert_eq!(tour.tick(5000.0).unwrap(), TourStep::Hold);
    }

    #[test]
    fn test_empty_tour_rejected() {
        assert!(AutoTour::new(&[], 1500.0).is_err());
    }
}
