//! State shared by every controller.

use timeless_anim::{AnimationManager, EasingFunction};
use timeless_config::SiteConfig;
use timeless_dom::{Document, NodeId};
use tracing::warn;

use crate::event::{EventKind, Handler, ListenerId, Listeners, Target};
use crate::timers::{Task, TimerId, TimerQueue};

/// Document loading phase, as `document.readyState` reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    #[default]
    Loading,
    Interactive,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// Acknowledgement shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub at_ms: f64,
}

/// Re-run after structural document changes until it reports success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observer {
    DrawerBinding,
}

pub struct PageContext {
    pub doc: Document,
    pub config: SiteConfig,
    pub listeners: Listeners,
    pub timers: TimerQueue,
    pub anim: AnimationManager,
    pub notices: Vec<Notice>,
    pub observers: Vec<Observer>,
    pub ready_state: ReadyState,
    pub now_ms: f64,
}

impl PageContext {
    pub fn new(doc: Document, config: SiteConfig) -> Self {
        Self {
            doc,
            config,
            listeners: Listeners::new(),
            timers: TimerQueue::new(),
            anim: AnimationManager::new(),
            notices: Vec::new(),
            observers: Vec::new(),
            ready_state: ReadyState::default(),
            now_ms: 0.0,
        }
    }

    pub fn listen(&mut self, target: Target, kind: EventKind, handler: Handler) -> ListenerId {
        self.listeners.add(target, kind, handler)
    }

    pub fn listen_node(&mut self, node: NodeId, kind: EventKind, handler: Handler) -> ListenerId {
        self.listen(Target::Node(node), kind, handler)
    }

    pub fn set_timeout(&mut self, delay_ms: f64, task: Task) -> TimerId {
        self.timers.schedule(self.now_ms, delay_ms, task)
    }

    pub fn observe(&mut self, observer: Observer) {
        if !self.observers.contains(&observer) {
            self.observers.push(observer);
        }
    }

    pub fn disconnect(&mut self, observer: Observer) {
        self.observers.retain(|o| *o != observer);
    }

    pub fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.notices.push(Notice {
            kind,
            message: message.into(),
            at_ms: self.now_ms,
        });
    }

    /// Resolve a configured easing name, falling back to `fallback` when
    /// the name is not recognised.
    pub fn easing(&self, name: &str, fallback: EasingFunction) -> EasingFunction {
        name.parse().unwrap_or_else(|err| {
            warn!(easing = name, error = %err, "unknown easing, using fallback");
            fallback
        })
    }
}
