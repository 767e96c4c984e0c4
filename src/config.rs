//! Explorer configuration
//!
//! Supplied once at construction and never mutated afterwards. Loadable from
//! JSON; every field falls back to the built-in scene when omitted.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::sim::sequencer::{Phase, TransitionStyle, validate_phases};
use crate::sim::starfield::MAX_STARFIELD_DEPTH;
use crate::sim::state::{Bounds, Station};
use crate::timeline::TimelineScale;

/// Per-reference-frame motion constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    pub acceleration: f32,
    /// Damping factor, strictly between 0 and 1
    pub friction: f32,
    pub max_speed: f32,
    pub proximity_threshold: f32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            acceleration: ACCELERATION,
            friction: FRICTION,
            max_speed: MAX_SPEED,
            proximity_threshold: PROXIMITY_THRESHOLD,
        }
    }
}

impl MotionTuning {
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.acceleration.is_finite() || self.acceleration < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "acceleration must be finite and non-negative, got {}",
                self.acceleration
            )));
        }
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(SimError::InvalidConfig(format!(
                "friction must be in (0, 1), got {}",
                self.friction
            )));
        }
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "max_speed must be finite and positive, got {}",
                self.max_speed
            )));
        }
        if !self.proximity_threshold.is_finite() || self.proximity_threshold < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "proximity_threshold must be finite and non-negative, got {}",
                self.proximity_threshold
            )));
        }
        Ok(())
    }
}

/// Complete scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub bounds: Bounds,
    /// Where the rocket appears on start and after leaving a station
    pub start_position: Vec2,
    pub motion: MotionTuning,
    pub stations: Vec<Station>,
    /// Warp transition phases, in order
    pub phases: Vec<Phase>,
    pub timeline: TimelineScale,
    /// Time spent at each station during the automatic tour
    pub tour_dwell_ms: f64,
    /// Starfield layers (0 disables the starfield)
    pub starfield_depth: u32,
    /// Starfield seed
    pub seed: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        let bounds = Bounds::default();
        Self {
            bounds,
            start_position: Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0),
            motion: MotionTuning::default(),
            stations: default_stations(),
            phases: TransitionStyle::Warp.phases(),
            timeline: TimelineScale::default(),
            tour_dwell_ms: TOUR_DWELL_MS,
            starfield_depth: 3,
            seed: 0x5EED_5747,
        }
    }
}

impl ExplorerConfig {
    /// Default scene with a different transition preset
    pub fn with_style(style: TransitionStyle) -> Self {
        Self {
            phases: style.phases(),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !self.bounds.is_valid() {
            return Err(SimError::InvalidConfig(format!(
                "bounds must be finite with min <= max, got {:?}",
                self.bounds
            )));
        }
        if !crate::is_finite_vec(self.start_position) {
            return Err(SimError::InvalidConfig("start_position must be finite".into()));
        }
        self.motion.validate()?;
        validate_phases(&self.phases)?;

        for (i, station) in self.stations.iter().enumerate() {
            if !crate::is_finite_vec(station.position) {
                return Err(SimError::InvalidConfig(format!(
                    "station '{}' has a non-finite position",
                    station.id
                )));
            }
            if self.stations[..i].iter().any(|s| s.id == station.id) {
                return Err(SimError::InvalidConfig(format!(
                    "duplicate station id '{}'",
                    station.id
                )));
            }
        }

        if self.starfield_depth > MAX_STARFIELD_DEPTH {
            return Err(SimError::InvalidConfig(format!(
                "starfield_depth must be at most {}, got {}",
                MAX_STARFIELD_DEPTH, self.starfield_depth
            )));
        }

        if !self.tour_dwell_ms.is_finite() || self.tour_dwell_ms <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "tour_dwell_ms must be finite and positive, got {}",
                self.tour_dwell_ms
            )));
        }
        self.timeline.validate()
    }
}

/// Five topic stations laid out as percentages of the default world
pub fn default_stations() -> Vec<Station> {
    let at = |px: f32, py: f32| Vec2::new(px / 100.0 * WORLD_WIDTH, py / 100.0 * WORLD_HEIGHT);
    vec![
        Station::new("agriculture", "Agriculture", at(20.0, 30.0)),
        Station::new("health", "Health", at(80.0, 25.0)),
        Station::new("technology", "Technology", at(75.0, 70.0)),
        Station::new("space", "Space", at(25.0, 75.0)),
        Station::new("oceans", "Oceans & Weather", at(50.0, 50.0)),
    ]
}
