//! Animation lifecycle events.
//!
//! The manager queues events while advancing; the page drains them after
//! each frame and reacts (hide the hero image, start the pulse, ...).

use std::collections::VecDeque;

use crate::types::AnimationId;

#[derive(Debug, Clone, PartialEq)]
pub enum AnimationEvent {
    /// First frame in which the tween (or timeline entry) is active.
    Began { id: AnimationId, label: String },
    /// Final value has been written.
    Completed { id: AnimationId, label: String },
    Cancelled { id: AnimationId, label: String },
}

impl AnimationEvent {
    pub fn id(&self) -> AnimationId {
        match self {
            Self::Began { id, .. } | Self::Completed { id, .. } | Self::Cancelled { id, .. } => *id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Began { label, .. }
            | Self::Completed { label, .. }
            | Self::Cancelled { label, .. } => label,
        }
    }

    pub fn is_began(&self, label: &str) -> bool {
        matches!(self, Self::Began { label: l, .. } if l == label)
    }

    pub fn is_completed(&self, label: &str) -> bool {
        matches!(self, Self::Completed { label: l, .. } if l == label)
    }
}

/// FIFO of pending events.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<AnimationEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: AnimationEvent) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn drain(&mut self) -> Vec<AnimationEvent> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_order() {
        let mut queue = EventQueue::new();
        let id = AnimationId::new();
        queue.push(AnimationEvent::Began { id, label: "reveal".into() });
        queue.push(AnimationEvent::Completed { id, label: "reveal".into() });
        assert_eq!(queue.len(), 2);
        let events = queue.drain();
        assert!(events[0].is_began("reveal"));
        assert!(events[1].is_completed("reveal"));
        assert!(!events[1].is_completed("dismiss"));
        assert!(queue.is_empty());
    }
}
