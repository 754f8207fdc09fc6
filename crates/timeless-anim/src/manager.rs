//! Animation manager.
//!
//! Owns every running tween and timeline plus the per-node channel values
//! they write. The host advances it with `update(delta_ms)` and then calls
//! `apply` to flush changed channels into inline styles. Animations write in
//! insertion order, so a later animation on the same channel wins.

use std::collections::{BTreeMap, HashMap, HashSet};

use timeless_dom::{Document, NodeId};
use tracing::{debug, trace};

use crate::easing::EasingFunction;
use crate::events::{AnimationEvent, EventQueue};
use crate::style;
use crate::timeline::Timeline;
use crate::tween::TweenSpec;
use crate::types::{AnimationId, AnimationState, Property};

/// One tween of an active animation with its own start offset.
#[derive(Debug)]
struct Track {
    spec: TweenSpec,
    start_ms: f32,
    began: bool,
    completed: bool,
}

#[derive(Debug)]
struct ActiveAnimation {
    id: AnimationId,
    /// Timeline label; standalone tweens report through their track.
    label: Option<String>,
    easing: EasingFunction,
    elapsed_ms: f32,
    state: AnimationState,
    tracks: Vec<Track>,
}

impl ActiveAnimation {
    fn display_label(&self) -> String {
        self.label
            .clone()
            .or_else(|| self.tracks.first().map(|t| t.spec.label.clone()))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy)]
struct ScrollTween {
    from: f64,
    to: f64,
    duration_ms: f32,
    elapsed_ms: f32,
    easing: EasingFunction,
}

impl ScrollTween {
    fn position(&self) -> f64 {
        if self.is_done() {
            return self.to;
        }
        let t = (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0);
        crate::types::lerp(self.from, self.to, self.easing.evaluate(t))
    }

    fn is_done(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

#[derive(Debug, Default)]
pub struct AnimationManager {
    values: HashMap<NodeId, BTreeMap<Property, f64>>,
    dirty: HashSet<NodeId>,
    active: Vec<ActiveAnimation>,
    scroll: Option<ScrollTween>,
    events: EventQueue,
}

impl AnimationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a channel immediately, outside any animation.
    pub fn set(&mut self, node: NodeId, property: Property, value: f64) {
        self.values.entry(node).or_default().insert(property, value);
        self.dirty.insert(node);
    }

    pub fn value(&self, node: NodeId, property: Property) -> Option<f64> {
        self.values.get(&node)?.get(&property).copied()
    }

    pub fn play(&mut self, spec: TweenSpec) -> AnimationId {
        let id = AnimationId::new();
        debug!(id = id.0, label = %spec.label, targets = spec.targets.len(), "tween started");
        self.active.push(ActiveAnimation {
            id,
            label: None,
            easing: spec.easing.unwrap_or_default(),
            elapsed_ms: 0.0,
            state: AnimationState::Pending,
            tracks: vec![Track {
                spec,
                start_ms: 0.0,
                began: false,
                completed: false,
            }],
        });
        id
    }

    pub fn play_timeline(&mut self, timeline: Timeline) -> AnimationId {
        let id = AnimationId::new();
        debug!(
            id = id.0,
            label = %timeline.label,
            duration_ms = timeline.duration_ms(),
            "timeline started"
        );
        let label = timeline.label.clone();
        let easing = timeline.easing;
        let tracks = timeline
            .into_entries()
            .into_iter()
            .map(|entry| Track {
                spec: entry.spec,
                start_ms: entry.start_ms,
                began: false,
                completed: false,
            })
            .collect();
        self.active.push(ActiveAnimation {
            id,
            label: Some(label),
            easing,
            elapsed_ms: 0.0,
            state: AnimationState::Pending,
            tracks,
        });
        id
    }

    /// Stop an animation where it is; returns false if it was not running.
    pub fn cancel(&mut self, id: AnimationId) -> bool {
        let Some(index) = self.active.iter().position(|a| a.id == id) else {
            return false;
        };
        let animation = self.active.remove(index);
        let label = animation.display_label();
        debug!(id = id.0, label = %label, "animation cancelled");
        self.events.push(AnimationEvent::Cancelled { id, label });
        true
    }

    pub fn is_running(&self, id: AnimationId) -> bool {
        self.active.iter().any(|a| a.id == id)
    }

    pub fn state(&self, id: AnimationId) -> Option<AnimationState> {
        self.active.iter().find(|a| a.id == id).map(|a| a.state)
    }

    /// No tween, timeline or scroll is in flight.
    pub fn is_idle(&self) -> bool {
        self.active.is_empty() && self.scroll.is_none()
    }

    /// Smoothly scroll the viewport from `from` to `to`, replacing any
    /// scroll already in flight.
    pub fn scroll_viewport(&mut self, from: f64, to: f64, duration_ms: f32, easing: EasingFunction) {
        debug!(from, to, duration_ms, "smooth scroll");
        self.scroll = Some(ScrollTween {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
            easing,
        });
    }

    pub fn scroll_target(&self) -> Option<f64> {
        self.scroll.map(|s| s.to)
    }

    /// Advance every animation by `delta_ms`.
    pub fn update(&mut self, delta_ms: f32) {
        if let Some(scroll) = self.scroll.as_mut() {
            scroll.elapsed_ms += delta_ms;
        }

        let mut writes: Vec<(NodeId, Property, f64)> = Vec::new();
        for animation in &mut self.active {
            animation.elapsed_ms += delta_ms;
            animation.state = AnimationState::Running;
            let elapsed = animation.elapsed_ms;

            for track in &mut animation.tracks {
                if track.completed {
                    continue;
                }
                let local = elapsed - track.start_ms;
                if local < 0.0 {
                    continue;
                }
                if !track.began {
                    track.began = true;
                    self.events.push(AnimationEvent::Began {
                        id: animation.id,
                        label: track.spec.label.clone(),
                    });
                }
                let total = track.spec.total_ms();
                let done = local >= total;
                let at = if done { total } else { local };
                writes.extend(track.spec.sample(at, animation.easing));
                if done {
                    track.completed = true;
                    self.events.push(AnimationEvent::Completed {
                        id: animation.id,
                        label: track.spec.label.clone(),
                    });
                }
            }

            if animation.tracks.iter().all(|t| t.completed) {
                animation.state = AnimationState::Finished;
                if let Some(label) = &animation.label {
                    self.events.push(AnimationEvent::Completed {
                        id: animation.id,
                        label: label.clone(),
                    });
                }
                debug!(id = animation.id.0, label = %animation.display_label(), "animation finished");
            }
        }
        self.active.retain(|a| a.state != AnimationState::Finished);

        trace!(writes = writes.len(), delta_ms, "animation frame");
        for (node, property, value) in writes {
            self.set(node, property, value);
        }
    }

    /// Flush changed channels into inline styles and move the viewport.
    /// Returns whether the scroll position changed.
    pub fn apply(&mut self, doc: &mut Document) -> bool {
        for node in self.dirty.drain() {
            if !doc.is_connected(node) {
                continue;
            }
            if let Some(channels) = self.values.get(&node) {
                style::apply(doc, node, channels);
            }
        }

        let Some(scroll) = self.scroll else {
            return false;
        };
        let moved = doc.viewport_mut().set_scroll_y(scroll.position());
        if scroll.is_done() {
            self.scroll = None;
        }
        moved
    }

    pub fn drain_events(&mut self) -> Vec<AnimationEvent> {
        self.events.drain()
    }
}
