//! Property tweens over one or many targets.
//!
//! A `TweenSpec` describes what to animate (targets and property ranges) and
//! how (duration, per-target delay, easing, direction, iterations). Sampling
//! a spec at a local time yields the current value of every channel it
//! drives on every target that has started.
//!
//! # Example
//!
//! ```
//! use timeless_anim::{Property, Stagger, TweenSpec};
//!
//! let words = TweenSpec::new("headline")
//!     .animate(Property::TranslateY, 40.0, 0.0)
//!     .animate(Property::Opacity, 0.0, 1.0)
//!     .duration_ms(1000.0)
//!     .stagger(Stagger::new(220.0).start(200.0));
//! assert_eq!(words.label, "headline");
//! ```

use serde::{Deserialize, Serialize};
use timeless_dom::NodeId;

use crate::easing::EasingFunction;
use crate::stagger::Stagger;
use crate::types::{Property, lerp};

/// How many times a tween repeats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IterationCount {
    Count { count: u32 },
    Infinite,
}

impl Default for IterationCount {
    fn default() -> Self {
        Self::Count { count: 1 }
    }
}

impl IterationCount {
    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinite)
    }
}

/// Direction of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationDirection {
    #[default]
    Normal,
    /// Forward, then backward, then forward...
    Alternate,
}

impl AnimationDirection {
    /// Whether iteration `iteration` (0-indexed) plays backward.
    pub fn is_reversed(&self, iteration: u32) -> bool {
        match self {
            Self::Normal => false,
            Self::Alternate => iteration % 2 == 1,
        }
    }
}

/// Start or end value of a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TweenValue {
    Uniform(f64),
    /// One value per target; targets past the end reuse the last value.
    PerTarget(Vec<f64>),
}

impl TweenValue {
    pub fn at(&self, index: usize) -> f64 {
        match self {
            Self::Uniform(v) => *v,
            Self::PerTarget(values) => values
                .get(index)
                .or_else(|| values.last())
                .copied()
                .unwrap_or_default(),
        }
    }
}

impl From<f64> for TweenValue {
    fn from(value: f64) -> Self {
        Self::Uniform(value)
    }
}

impl From<Vec<f64>> for TweenValue {
    fn from(values: Vec<f64>) -> Self {
        Self::PerTarget(values)
    }
}

/// One channel driven from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyTween {
    pub property: Property,
    pub from: TweenValue,
    pub to: TweenValue,
}

/// Delay before each target starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Delay {
    Fixed { ms: f32 },
    Staggered(Stagger),
}

impl Default for Delay {
    fn default() -> Self {
        Self::Fixed { ms: 0.0 }
    }
}

impl Delay {
    pub fn for_target(&self, index: usize, count: usize) -> f32 {
        match self {
            Self::Fixed { ms } => *ms,
            Self::Staggered(stagger) => stagger.delay_for(index, count),
        }
    }
}

/// Definition of a tween.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweenSpec {
    /// Name reported in begin/complete events.
    pub label: String,
    #[serde(skip)]
    pub targets: Vec<NodeId>,
    pub properties: Vec<PropertyTween>,
    pub duration_ms: f32,
    pub delay: Delay,
    /// `None` inherits the timeline (or manager) default.
    pub easing: Option<EasingFunction>,
    pub direction: AnimationDirection,
    pub iterations: IterationCount,
}

impl TweenSpec {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            targets: Vec::new(),
            properties: Vec::new(),
            duration_ms: 1000.0,
            delay: Delay::default(),
            easing: None,
            direction: AnimationDirection::Normal,
            iterations: IterationCount::default(),
        }
    }

    pub fn target(mut self, target: NodeId) -> Self {
        self.targets.push(target);
        self
    }

    pub fn targets(mut self, targets: impl IntoIterator<Item = NodeId>) -> Self {
        self.targets.extend(targets);
        self
    }

    pub fn animate(
        mut self,
        property: Property,
        from: impl Into<TweenValue>,
        to: impl Into<TweenValue>,
    ) -> Self {
        self.properties.push(PropertyTween {
            property,
            from: from.into(),
            to: to.into(),
        });
        self
    }

    pub fn duration_ms(mut self, duration: f32) -> Self {
        self.duration_ms = duration.max(0.0);
        self
    }

    pub fn stagger(mut self, stagger: Stagger) -> Self {
        self.delay = Delay::Staggered(stagger);
        self
    }

    pub fn easing(mut self, easing: EasingFunction) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn direction(mut self, direction: AnimationDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn iterations(mut self, iterations: IterationCount) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn looped(self) -> Self {
        self.iterations(IterationCount::Infinite)
    }

    fn target_delay(&self, index: usize) -> f32 {
        self.delay.for_target(index, self.targets.len())
    }

    /// Active length of one target (all iterations), infinite for loops.
    pub fn active_ms(&self) -> f32 {
        match self.iterations {
            IterationCount::Infinite => f32::INFINITY,
            IterationCount::Count { count } => self.duration_ms * count.max(1) as f32,
        }
    }

    /// Time until the last target finishes.
    pub fn total_ms(&self) -> f32 {
        let longest_delay = (0..self.targets.len())
            .map(|i| self.target_delay(i))
            .fold(0.0f32, f32::max);
        longest_delay + self.active_ms()
    }

    /// Current channel values at `local_ms` for targets that have started.
    pub fn sample(
        &self,
        local_ms: f32,
        default_easing: EasingFunction,
    ) -> Vec<(NodeId, Property, f64)> {
        let easing = self.easing.unwrap_or(default_easing);
        let mut out = Vec::with_capacity(self.targets.len() * self.properties.len());
        for (index, target) in self.targets.iter().enumerate() {
            let active = local_ms - self.target_delay(index);
            if active < 0.0 {
                continue;
            }
            let progress = self.progress(active);
            let eased = easing.evaluate(progress);
            for tween in &self.properties {
                let value = lerp(tween.from.at(index), tween.to.at(index), eased);
                out.push((*target, tween.property, value));
            }
        }
        out
    }

    /// Direction-adjusted linear progress after `active_ms` of playback.
    fn progress(&self, active_ms: f32) -> f32 {
        if self.duration_ms <= 0.0 {
            let last = match self.iterations {
                IterationCount::Count { count } => count.max(1) - 1,
                IterationCount::Infinite => 0,
            };
            return if self.direction.is_reversed(last) { 0.0 } else { 1.0 };
        }

        let (iteration, raw) = match self.iterations {
            IterationCount::Count { count } if active_ms >= self.active_ms() => {
                (count.max(1) - 1, 1.0)
            }
            _ => {
                let cycles = active_ms / self.duration_ms;
                (cycles.floor() as u32, cycles.fract())
            }
        };

        if self.direction.is_reversed(iteration) {
            1.0 - raw
        } else {
            raw
        }
    }
}
