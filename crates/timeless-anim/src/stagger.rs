//! Per-target delay offsets ("stagger") for batch animations.

use serde::{Deserialize, Serialize};

/// Where the stagger sequence is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StaggerFrom {
    /// First target starts first.
    #[default]
    First,
    /// Middle target(s) start first, neighbours fan out.
    Center,
}

/// Incremental delay applied across a batch of targets.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stagger {
    /// Delay added per step away from the anchor.
    pub step_ms: f32,
    /// Delay before the first target starts.
    pub start_ms: f32,
    pub from: StaggerFrom,
}

impl Stagger {
    pub fn new(step_ms: f32) -> Self {
        Self {
            step_ms,
            ..Self::default()
        }
    }

    pub fn start(mut self, start_ms: f32) -> Self {
        self.start_ms = start_ms;
        self
    }

    pub fn from(mut self, from: StaggerFrom) -> Self {
        self.from = from;
        self
    }

    /// Anchor position for `count` targets (fractional for an even centre).
    pub fn anchor(&self, count: usize) -> f32 {
        let last = count.saturating_sub(1) as f32;
        match self.from {
            StaggerFrom::First => 0.0,
            StaggerFrom::Center => last / 2.0,
        }
    }

    /// Delay for target `index` out of `count`.
    pub fn delay_for(&self, index: usize, count: usize) -> f32 {
        let distance = (index as f32 - self.anchor(count)).abs();
        self.start_ms + self.step_ms * distance
    }
}
