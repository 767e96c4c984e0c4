//! Terra Voyage - rocket navigation core for a space explorer scene
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rocket motion, station proximity, warp phases, starfield)
//! - `input`: Host key names to directions and commands
//! - `timeline`: Year scale, journey progress and the automatic station tour
//! - `explorer`: Session wiring navigation and warp into Space/Warping/Docked views
//! - `config`: Data-driven tuning and station layout
//! - `web`: wasm-bindgen host binding (wasm32 only)

pub mod config;
pub mod error;
pub mod explorer;
pub mod input;
pub mod sim;
pub mod timeline;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::ExplorerConfig;
pub use error::SimError;
pub use explorer::{Explorer, FrameOutput, View};

/// Simulation configuration constants
pub mod consts {
    /// Frame length the per-tick constants are tuned for (~60 Hz)
    pub const REFERENCE_FRAME_MS: f32 = 16.0;
    /// Maximum fixed steps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Host frame deltas above this are treated as a stall and capped
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Velocity added per reference frame for each held direction
    pub const ACCELERATION: f32 = 0.5;
    /// Velocity damping per reference frame
    pub const FRICTION: f32 = 0.92;
    /// Speed cap (units per reference frame)
    pub const MAX_SPEED: f32 = 5.0;
    /// Speeds below this are snapped to zero
    pub const VELOCITY_EPSILON: f32 = 1e-3;
    /// Above this speed the rocket shows its boost exhaust
    pub const BOOST_SPEED: f32 = 2.0;

    /// Distance at which a station counts as nearby
    pub const PROXIMITY_THRESHOLD: f32 = 80.0;

    /// Default world size (pixels)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    /// Rocket keeps this far from the world edges
    pub const EDGE_MARGIN: f32 = 20.0;

    /// Time spent at each station during the automatic tour
    pub const TOUR_DWELL_MS: f64 = 1500.0;
}

/// Rocket heading in degrees (0 = facing +x, 90 = facing +y/down screen)
#[inline]
pub fn heading_degrees(vel: glam::Vec2) -> f32 {
    vel.y.atan2(vel.x).to_degrees()
}

/// True when every component is finite
#[inline]
pub fn is_finite_vec(v: glam::Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
