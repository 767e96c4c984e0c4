//! Deterministic simulation module
//!
//! All navigation and transition logic lives here. This module must be pure and deterministic:
//! - Time is injected by the caller, never read from a clock
//! - Seeded RNG only
//! - Stable iteration order (station list order)
//! - No rendering or platform dependencies

pub mod nav;
pub mod proximity;
pub mod sequencer;
pub mod starfield;
pub mod state;
pub mod tick;

pub use nav::Navigator;
pub use proximity::{ProximityHit, nearest_station, within_range};
pub use sequencer::{
    Phase, PhaseSequencer, SequencerEvent, SequencerStatus, SequencerTick, TransitionSnapshot,
    TransitionStyle,
};
pub use starfield::{Star, Starfield};
pub use state::{Bounds, Direction, InputState, NavSnapshot, SimulationState, Station};
pub use tick::{clamp_speed, step_velocity, tick};
