//! Core animation types.
//!
//! - `Property`: the animatable channels page scripts drive
//! - `AnimationId`: unique identifier for a running animation
//! - `AnimationState`: lifecycle of a running animation

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for an animation instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

impl AnimationId {
    /// Generate a new unique animation ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for AnimationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Current state of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    /// Created, nothing sampled yet.
    #[default]
    Pending,
    Running,
    Finished,
    Cancelled,
}

/// Animatable channel of an element.
///
/// Translation is in pixels, rotation in degrees, blur radius in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Opacity,
    TranslateX,
    TranslateY,
    Scale,
    Rotate,
    Blur,
}

impl Property {
    /// Value at which the channel has no visual effect.
    pub fn identity(&self) -> f64 {
        match self {
            Property::Opacity | Property::Scale => 1.0,
            _ => 0.0,
        }
    }
}

/// Linear interpolation between two channel values.
#[inline]
pub fn lerp(from: f64, to: f64, t: f32) -> f64 {
    from + (to - from) * t as f64
}
