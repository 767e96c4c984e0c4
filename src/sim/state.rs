//! Navigation state and core simulation types
//!
//! Everything the navigator mutates per tick lives here. Stations and bounds
//! are fixed at construction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::heading_degrees;

/// Logical steering direction (screen convention: `Up` is -y)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector for this direction
    #[inline]
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Held state for each direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Sum of unit vectors of all held directions (opposites cancel)
    pub fn thrust(&self) -> Vec2 {
        Direction::ALL
            .iter()
            .filter(|d| self.is_held(**d))
            .fold(Vec2::ZERO, |acc, d| acc + d.unit())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A point of interest the rocket can approach and enter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub position: Vec2,
    /// Timeline year, for timeline layouts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Host data carried through untouched (colors, icons, descriptions)
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Station {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Vec2) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            year: None,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

/// Axis-aligned world rectangle the rocket is confined to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::with_margin(WORLD_WIDTH, WORLD_HEIGHT, EDGE_MARGIN)
    }
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// A `width` x `height` viewport inset by `margin` on every side
    pub fn with_margin(width: f32, height: f32, margin: f32) -> Self {
        Self {
            min: Vec2::splat(margin),
            max: Vec2::new(width - margin, height - margin),
        }
    }

    pub fn is_valid(&self) -> bool {
        crate::is_finite_vec(self.min)
            && crate::is_finite_vec(self.max)
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
    }

    /// Clamp independently per axis
    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Horizontal position as a 0..=1 fraction of the width
    pub fn progress_x(&self, p: Vec2) -> f32 {
        let width = self.max.x - self.min.x;
        if width <= 0.0 {
            return 0.0;
        }
        ((p.x - self.min.x) / width).clamp(0.0, 1.0)
    }
}

/// Mutable per-tick navigation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Index into the station list
    pub nearest_station: Option<usize>,
    pub is_active: bool,
    pub input: InputState,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl SimulationState {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            nearest_station: None,
            is_active: true,
            input: InputState::default(),
            time_ticks: 0,
        }
    }
}

/// Read-only navigation view polled by the renderer once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub nearest_station_id: Option<String>,
    pub is_active: bool,
    pub is_boosting: bool,
    pub heading_degrees: f32,
}

impl NavSnapshot {
    pub fn from_state(state: &SimulationState, stations: &[Station]) -> Self {
        Self {
            position: state.position,
            velocity: state.velocity,
            nearest_station_id: state
                .nearest_station
                .and_then(|i| stations.get(i))
                .map(|s| s.id.clone()),
            is_active: state.is_active,
            is_boosting: state.velocity.length() > BOOST_SPEED,
            heading_degrees: heading_degrees(state.velocity),
        }
    }
}
