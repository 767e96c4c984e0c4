//! Timed phase sequencer
//!
//! Drives an ordered list of named phases from a single injected clock.
//! Phase and progress are recomputed from `now - start` on every tick, so
//! there are no chained timers to drift.

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// A named, timed segment of a transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub duration_ms: f64,
}

impl Phase {
    pub fn new(name: impl Into<String>, duration_ms: f64) -> Self {
        Self {
            name: name.into(),
            duration_ms,
        }
    }
}

/// Built-in transition timings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransitionStyle {
    /// Four-stage warp: dive, star tunnel, dimensional breach, emergence
    #[default]
    Warp,
    /// Short white flash followed by warp lines
    Hyperspace,
}

impl TransitionStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionStyle::Warp => "Warp",
            TransitionStyle::Hyperspace => "Hyperspace",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "warp" => Some(TransitionStyle::Warp),
            "hyperspace" | "hyper" => Some(TransitionStyle::Hyperspace),
            _ => None,
        }
    }

    pub fn phases(&self) -> Vec<Phase> {
        match self {
            TransitionStyle::Warp => vec![
                Phase::new("dive", 3000.0),
                Phase::new("tunnel", 5000.0),
                Phase::new("breach", 2000.0),
                Phase::new("emerge", 2500.0),
            ],
            TransitionStyle::Hyperspace => {
                vec![Phase::new("flash", 1000.0), Phase::new("warp", 1000.0)]
            }
        }
    }
}

/// Check a phase list: non-empty, every duration finite and positive
pub fn validate_phases(phases: &[Phase]) -> Result<(), SimError> {
    if phases.is_empty() {
        return Err(SimError::InvalidConfig("phase list is empty".into()));
    }
    for phase in phases {
        if !phase.duration_ms.is_finite() || phase.duration_ms <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "phase '{}' has invalid duration {}",
                phase.name, phase.duration_ms
            )));
        }
    }
    Ok(())
}

/// Sequencer status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequencerStatus {
    Idle,
    Running { phase_index: usize },
}

/// Events produced by a single tick, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SequencerEvent {
    PhaseEntered { index: usize, name: String },
    Completed,
}

/// Output of one `tick`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequencerTick {
    /// Progress reached by this tick (100 on the completing tick)
    pub progress_percent: f32,
    pub events: Vec<SequencerEvent>,
}

impl SequencerTick {
    pub fn completed(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, SequencerEvent::Completed))
    }

    /// Indices of phases entered during this tick
    pub fn entered(&self) -> impl Iterator<Item = usize> + '_ {
        self.events.iter().filter_map(|e| match e {
            SequencerEvent::PhaseEntered { index, .. } => Some(*index),
            SequencerEvent::Completed => None,
        })
    }
}

/// Read-only transition view polled by the renderer once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionSnapshot {
    pub phase_name: Option<String>,
    pub phase_index: Option<usize>,
    pub progress_percent: f32,
    pub is_running: bool,
}

/// Ordered phase sequencer
#[derive(Debug, Clone)]
pub struct PhaseSequencer {
    phases: Vec<Phase>,
    /// Cumulative end time of each phase
    boundaries: Vec<f64>,
    status: SequencerStatus,
    start_ms: f64,
    progress_percent: f32,
    /// Highest phase index already reported through `PhaseEntered`
    announced: Option<usize>,
}

impl PhaseSequencer {
    pub fn new(phases: Vec<Phase>) -> Result<Self, SimError> {
        validate_phases(&phases)?;
        Ok(Self::build(phases))
    }

    pub fn from_style(style: TransitionStyle) -> Self {
        Self::build(style.phases())
    }

    fn build(phases: Vec<Phase>) -> Self {
        let boundaries = phases
            .iter()
            .scan(0.0, |acc, p| {
                *acc += p.duration_ms;
                Some(*acc)
            })
            .collect();
        Self {
            phases,
            boundaries,
            status: SequencerStatus::Idle,
            start_ms: 0.0,
            progress_percent: 0.0,
            announced: None,
        }
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn status(&self) -> SequencerStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        matches!(self.status, SequencerStatus::Running { .. })
    }

    pub fn total_duration_ms(&self) -> f64 {
        self.boundaries.last().copied().unwrap_or(0.0)
    }

    pub fn start_timestamp(&self) -> Option<f64> {
        self.is_running().then_some(self.start_ms)
    }

    /// Begin a run at `now`
    pub fn start(&mut self, now: f64) -> Result<(), SimError> {
        if !now.is_finite() {
            log::warn!("Ignoring sequencer start at non-finite time {}", now);
            return Err(SimError::InvalidInput("start timestamp must be finite"));
        }
        if self.is_running() {
            return Err(SimError::AlreadyRunning);
        }
        self.status = SequencerStatus::Running { phase_index: 0 };
        self.start_ms = now;
        self.progress_percent = 0.0;
        self.announced = None;
        log::debug!("Sequence started at {:.1} ms ({} phases)", now, self.phases.len());
        Ok(())
    }

    /// Advance to `now`, reporting every phase boundary crossed in order
    pub fn tick(&mut self, now: f64) -> Result<SequencerTick, SimError> {
        if !now.is_finite() {
            log::warn!("Dropping sequencer tick at non-finite time {}", now);
            return Err(SimError::InvalidInput("tick timestamp must be finite"));
        }
        let SequencerStatus::Running { phase_index } = self.status else {
            return Ok(SequencerTick::default());
        };

        // Clock skew: never run backwards
        let elapsed = (now - self.start_ms).max(0.0);
        let total = self.total_duration_ms();
        let finished = elapsed >= total;

        let target = if finished {
            self.phases.len() - 1
        } else {
            self.phase_at(elapsed).max(phase_index)
        };

        let mut out = SequencerTick::default();
        let first = self.announced.map_or(0, |i| i + 1);
        for index in first..=target {
            log::debug!("Entering phase '{}'", self.phases[index].name);
            out.events.push(SequencerEvent::PhaseEntered {
                index,
                name: self.phases[index].name.clone(),
            });
        }
        if first <= target {
            self.announced = Some(target);
        }

        if finished {
            out.progress_percent = 100.0;
            out.events.push(SequencerEvent::Completed);
            log::debug!("Sequence completed after {:.1} ms", elapsed);
            self.reset();
            return Ok(out);
        }

        let progress = ((elapsed / total) * 100.0).min(100.0) as f32;
        self.progress_percent = self.progress_percent.max(progress);
        self.status = SequencerStatus::Running {
            phase_index: target,
        };
        out.progress_percent = self.progress_percent;
        Ok(out)
    }

    /// Abort a running sequence without completing. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        let was_running = self.is_running();
        if was_running {
            log::debug!("Sequence cancelled");
        }
        self.reset();
        was_running
    }

    pub fn snapshot(&self) -> TransitionSnapshot {
        match self.status {
            SequencerStatus::Idle => TransitionSnapshot {
                phase_name: None,
                phase_index: None,
                progress_percent: 0.0,
                is_running: false,
            },
            SequencerStatus::Running { phase_index } => TransitionSnapshot {
                phase_name: Some(self.phases[phase_index].name.clone()),
                phase_index: Some(phase_index),
                progress_percent: self.progress_percent,
                is_running: true,
            },
        }
    }

    /// Index of the phase whose time window contains `elapsed`
    fn phase_at(&self, elapsed: f64) -> usize {
        self.boundaries
            .iter()
            .position(|end| elapsed < *end)
            .unwrap_or(self.phases.len() - 1)
    }

    fn reset(&mut self) {
        self.status = SequencerStatus::Idle;
        self.start_ms = 0.0;
        self.progress_percent = 0.0;
        self.announced = None;
    }
}
