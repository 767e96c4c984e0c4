//! Explorer session
//!
//! Wires the navigator, warp sequencer, tour and starfield together the way
//! the scene host drives them: fly around in space, select a nearby station,
//! warp, dock, and fly back out.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ExplorerConfig;
use crate::consts::*;
use crate::error::SimError;
use crate::input::Command;
use crate::sim::nav::Navigator;
use crate::sim::sequencer::{PhaseSequencer, TransitionSnapshot};
use crate::sim::starfield::Starfield;
use crate::sim::state::{Direction, NavSnapshot, Station};
use crate::timeline::{AutoTour, TourStep, journey_progress};

/// Starfield speed-up at full warp progress
const WARP_STAR_STRETCH: f32 = 40.0;

/// Which screen the host should be showing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    /// Free flight
    Space,
    /// Warp transition toward a station
    Warping { station_id: String },
    /// Station detail content
    Docked { station_id: String },
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameOutput {
    pub view: View,
    pub nav: NavSnapshot,
    pub transition: TransitionSnapshot,
    pub year: i32,
    pub journey_progress: f32,
    /// Station whose warp completed this frame
    pub arrived: Option<String>,
    /// Station the automatic tour is showing
    pub tour_station: Option<String>,
}

pub type CompletionCallback = Box<dyn FnMut(&str)>;

pub struct Explorer {
    config: ExplorerConfig,
    stations: Arc<[Station]>,
    nav: Navigator,
    warp: PhaseSequencer,
    tour: Option<AutoTour>,
    starfield: Option<Starfield>,
    view: View,
    accumulator: f64,
    last_time: Option<f64>,
    journey_progress: f32,
    on_complete: Option<CompletionCallback>,
}

impl Explorer {
    pub fn new(config: ExplorerConfig) -> Result<Self, SimError> {
        config.validate()?;

        let stations: Arc<[Station]> = config.stations.clone().into();
        let nav = Navigator::new(
            Arc::clone(&stations),
            config.bounds,
            config.motion,
            config.start_position,
        );
        let warp = PhaseSequencer::new(config.phases.clone())?;
        let tour = if stations.is_empty() {
            None
        } else {
            Some(AutoTour::new(&stations, config.tour_dwell_ms)?)
        };
        let starfield = (config.starfield_depth > 0)
            .then(|| Starfield::new(config.seed, config.bounds, config.starfield_depth));

        log::info!(
            "Explorer ready: {} stations, {} warp phases",
            stations.len(),
            config.phases.len()
        );

        Ok(Self {
            config,
            stations,
            nav,
            warp,
            tour,
            starfield,
            view: View::Space,
            accumulator: 0.0,
            last_time: None,
            journey_progress: 0.0,
            on_complete: None,
        })
    }

    /// Called once with the station id each time a warp completes
    pub fn set_on_complete(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn transition(&self) -> TransitionSnapshot {
        self.warp.snapshot()
    }

    pub fn starfield(&self) -> Option<&Starfield> {
        self.starfield.as_ref()
    }

    pub fn is_touring(&self) -> bool {
        self.tour.as_ref().is_some_and(|t| t.is_running())
    }

    pub fn key_down(&mut self, key: &str, now: f64) -> Result<(), SimError> {
        match Command::from_key(key) {
            Some(Command::Steer(direction)) => {
                self.nav.set_direction_held(direction, true);
                Ok(())
            }
            Some(Command::Select) => self.select(now).map(|_| ()),
            Some(Command::ResetJourney) => self.reset_journey(),
            Some(Command::JumpTo(index)) => self.jump_to_station(index),
            None => Ok(()),
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(direction) = Direction::from_key(key) {
            self.nav.set_direction_held(direction, false);
        }
    }

    /// Enter the nearby station: halts the rocket and starts the warp
    pub fn select(&mut self, now: f64) -> Result<Station, SimError> {
        if !now.is_finite() {
            return Err(SimError::InvalidInput("select timestamp must be finite"));
        }
        match self.view {
            View::Space => {}
            View::Warping { .. } => return Err(SimError::AlreadyRunning),
            View::Docked { .. } => return Err(SimError::NoStationInRange),
        }

        let station = self.nav.trigger_station_selection()?.clone();
        self.warp.start(now)?;
        if let Some(tour) = self.tour.as_mut() {
            tour.stop();
        }
        log::info!("Warping to {}", station.name);
        self.view = View::Warping {
            station_id: station.id.clone(),
        };
        Ok(station)
    }

    /// Advance everything to host time `now` (milliseconds)
    pub fn frame(&mut self, now: f64) -> Result<FrameOutput, SimError> {
        if !now.is_finite() {
            log::warn!("Dropping frame at non-finite time {}", now);
            return Err(SimError::InvalidInput("frame timestamp must be finite"));
        }
        let delta = match self.last_time {
            Some(last) => (now - last).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.last_time = Some(now);

        self.accumulator += delta;
        let step = REFERENCE_FRAME_MS as f64;
        let mut substeps = 0;
        while self.accumulator >= step && substeps < MAX_SUBSTEPS {
            self.nav.tick(REFERENCE_FRAME_MS)?;
            self.accumulator -= step;
            substeps += 1;
        }
        if substeps > 0 && self.nav.state().velocity != glam::Vec2::ZERO {
            self.journey_progress = self.nav.bounds().progress_x(self.nav.state().position) * 100.0;
        }

        let mut arrived = None;
        if let View::Warping { station_id } = &self.view {
            let out = self.warp.tick(now)?;
            if out.completed() {
                let station_id = station_id.clone();
                log::info!("Docked at {}", station_id);
                if let Some(callback) = self.on_complete.as_mut() {
                    callback(&station_id);
                }
                self.view = View::Docked {
                    station_id: station_id.clone(),
                };
                arrived = Some(station_id);
            }
        }

        let tour_step = match self.tour.as_mut() {
            Some(tour) => tour.tick(now)?,
            None => TourStep::Hold,
        };
        if let TourStep::Visit(index) = tour_step {
            self.visit(index)?;
        }

        let multiplier = match self.view {
            View::Warping { .. } => {
                1.0 + self.warp.snapshot().progress_percent / 100.0 * WARP_STAR_STRETCH
            }
            _ => 1.0 + self.nav.state().velocity.length(),
        };
        if let Some(field) = self.starfield.as_mut() {
            field.advance(delta as f32, multiplier);
        }

        Ok(self.output(arrived))
    }

    /// Leave the docked station and return to the start position
    pub fn back_to_space(&mut self) -> Result<(), SimError> {
        if !matches!(self.view, View::Docked { .. }) {
            return Ok(());
        }
        self.nav.reset(self.config.start_position)?;
        self.view = View::Space;
        log::info!("Back to space");
        Ok(())
    }

    /// Jump straight to a station, stopping any running tour
    pub fn jump_to_station(&mut self, index: usize) -> Result<(), SimError> {
        if let Some(tour) = self.tour.as_mut() {
            tour.stop();
        }
        self.visit(index)
    }

    /// Tour every station in order
    pub fn start_tour(&mut self, now: f64) -> Result<(), SimError> {
        if self.view != View::Space {
            return Err(SimError::AlreadyRunning);
        }
        match self.tour.as_mut() {
            Some(tour) => tour.start(now),
            None => Err(SimError::NoStationInRange),
        }
    }

    /// Abort tour and warp, return to free flight at the start position
    pub fn reset_journey(&mut self) -> Result<(), SimError> {
        if let Some(tour) = self.tour.as_mut() {
            tour.stop();
        }
        self.warp.cancel();
        self.nav.reset(self.config.start_position)?;
        self.view = View::Space;
        self.journey_progress = 0.0;
        Ok(())
    }

    fn visit(&mut self, index: usize) -> Result<(), SimError> {
        if self.view != View::Space {
            return Ok(());
        }
        let position = self
            .stations
            .get(index)
            .map(|s| s.position)
            .ok_or(SimError::InvalidInput("station index out of range"))?;
        self.nav.reset(position)?;
        self.journey_progress = journey_progress(index, self.stations.len());
        log::debug!("Jumped to station {}", self.stations[index].id);
        Ok(())
    }

    /// Year label: the nearby station's own year, else the timeline position
    fn year(&self) -> i32 {
        let state = self.nav.state();
        state
            .nearest_station
            .and_then(|i| self.stations.get(i))
            .and_then(|s| s.year)
            .unwrap_or_else(|| {
                self.config
                    .timeline
                    .year_at(self.nav.bounds().progress_x(state.position))
            })
    }

    fn output(&self, arrived: Option<String>) -> FrameOutput {
        FrameOutput {
            view: self.view.clone(),
            nav: self.nav.snapshot(),
            transition: self.warp.snapshot(),
            year: self.year(),
            journey_progress: self.journey_progress,
            arrived,
            tour_station: self
                .tour
                .as_ref()
                .and_then(|t| t.current())
                .and_then(|i| self.stations.get(i))
                .map(|s| s.id.clone()),
        }
    }
}
