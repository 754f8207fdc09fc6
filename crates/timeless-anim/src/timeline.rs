//! Ordered tween sequences.
//!
//! Each entry is placed relative to the timeline's running duration:
//! `After` starts when everything added so far has finished, `Relative`
//! shifts that point (`relative(-200.0)` overlaps the previous entry by
//! 200ms). An entry never starts before the one added just before it.

use serde::{Deserialize, Serialize};

use crate::easing::EasingFunction;
use crate::tween::TweenSpec;

/// Placement of a timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Offset {
    #[default]
    After,
    Relative { ms: f32 },
}

impl Offset {
    pub fn relative(ms: f32) -> Self {
        Self::Relative { ms }
    }
}

/// A tween placed on a timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub spec: TweenSpec,
    pub start_ms: f32,
}

impl TimelineEntry {
    pub fn end_ms(&self) -> f32 {
        self.start_ms + self.spec.total_ms()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub label: String,
    /// Applied to entries that do not set their own easing.
    pub easing: EasingFunction,
    entries: Vec<TimelineEntry>,
    duration_ms: f32,
}

impl Timeline {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            easing: EasingFunction::default(),
            entries: Vec::new(),
            duration_ms: 0.0,
        }
    }

    pub fn easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    pub fn add(mut self, spec: TweenSpec, offset: Offset) -> Self {
        let base = self.duration_ms;
        let requested = match offset {
            Offset::After => base,
            Offset::Relative { ms } => base + ms,
        };
        let floor = self.entries.last().map_or(0.0, |e| e.start_ms);
        let start_ms = requested.max(floor).max(0.0);
        let entry = TimelineEntry { spec, start_ms };
        self.duration_ms = self.duration_ms.max(entry.end_ms());
        self.entries.push(entry);
        self
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    /// Start time of the first entry labelled `label`.
    pub fn start_of(&self, label: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|e| e.spec.label == label)
            .map(|e| e.start_ms)
    }

    pub(crate) fn into_entries(self) -> Vec<TimelineEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tween(label: &str, duration: f32) -> TweenSpec {
        TweenSpec::new(label).duration_ms(duration)
    }

    #[test]
    fn sequences_hero_stages() {
        let tl = Timeline::new("hero")
            .add(tween("reveal", 1000.0), Offset::After)
            .add(tween("dismiss", 1000.0), Offset::relative(500.0))
            .add(tween("text", 1000.0), Offset::relative(-200.0))
            .add(tween("cta", 800.0), Offset::relative(-600.0));
        assert_eq!(tl.start_of("reveal"), Some(0.0));
        assert_eq!(tl.start_of("dismiss"), Some(1500.0));
        assert_eq!(tl.start_of("text"), Some(2300.0));
        assert_eq!(tl.start_of("cta"), Some(2700.0));
        assert_eq!(tl.duration_ms(), 3500.0);
    }

    #[test]
    fn entries_never_start_before_their_predecessor() {
        let tl = Timeline::new("t")
            .add(tween("a", 100.0), Offset::relative(300.0))
            .add(tween("b", 1000.0), Offset::After)
            .add(tween("c", 100.0), Offset::relative(-1500.0));
        assert_eq!(tl.start_of("a"), Some(300.0));
        assert_eq!(tl.start_of("b"), Some(400.0));
        // 1400 - 1500 lands before `b`, so `c` waits for it.
        assert_eq!(tl.start_of("c"), Some(400.0));
    }
}
