//! Timeline animation engine for page scripts.
//!
//! This crate provides:
//! - **Easing**: CSS keywords, cubic-bezier, steps and the Penner curves
//!   (`easeOutExpo`, `easeInOutSine`, ...)
//! - **Tweens**: property animations over one or many targets with staggered
//!   delays, alternate direction and infinite loops
//! - **Timelines**: ordered tweens with relative offsets and
//!   begin/complete events
//! - **Smooth scrolling** of the document viewport
//!
//! # Architecture
//!
//! ```text
//! AnimationManager
//!   ├── Held values  (node, property) -> f64
//!   ├── Active tweens and timelines (insertion order, last write wins)
//!   ├── Viewport scroll tween
//!   └── EventQueue (Began / Completed / Cancelled)
//!
//! apply(&mut Document)
//!   └── composes opacity / transform / filter into inline styles
//! ```

pub mod easing;
pub mod error;
pub mod events;
pub mod manager;
pub mod stagger;
pub mod style;
pub mod timeline;
pub mod tween;
pub mod types;

pub use easing::{EaseMode, EasingFunction, PennerCurve, StepPosition};
pub use error::AnimError;
pub use events::{AnimationEvent, EventQueue};
pub use manager::AnimationManager;
pub use stagger::{Stagger, StaggerFrom};
pub use timeline::{Offset, Timeline};
pub use tween::{AnimationDirection, Delay, IterationCount, PropertyTween, TweenSpec, TweenValue};
pub use types::{AnimationId, AnimationState, Property};
