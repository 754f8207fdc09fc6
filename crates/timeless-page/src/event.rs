//! Page events, listener registry and the per-dispatch event object.
//!
//! Listeners are plain data: a target, an event kind and a [`Handler`]
//! naming the controller routine to run. The runtime resolves the
//! propagation path first and runs handlers second, so controllers can
//! freely mutate the registry while an event is in flight.

use timeless_dom::NodeId;

/// Input from the host.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    DomContentLoaded,
    Load,
    Click { target: NodeId },
    KeyDown { key: String },
    Submit { form: NodeId },
    Scroll { y: f64 },
    Resize { width: f64, height: f64 },
}

impl PageEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::DomContentLoaded => EventKind::DomContentLoaded,
            Self::Load => EventKind::Load,
            Self::Click { .. } => EventKind::Click,
            Self::KeyDown { .. } => EventKind::KeyDown,
            Self::Submit { .. } => EventKind::Submit,
            Self::Scroll { .. } => EventKind::Scroll,
            Self::Resize { .. } => EventKind::Resize,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DomContentLoaded,
    Load,
    Click,
    KeyDown,
    Submit,
    Scroll,
    Resize,
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Window,
    Document,
    Node(NodeId),
}

/// Controller routine a listener runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    InitAll,
    DrawerToggle,
    DrawerBackdrop,
    DrawerEscape,
    DrawerLinkClose,
    AnchorLink,
    ContactSubmit,
    SectionMargins,
    HashScroll,
    CardReveal,
    ScrollReveal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Debug, Clone)]
struct Listener {
    id: ListenerId,
    target: Target,
    kind: EventKind,
    handler: Handler,
}

#[derive(Debug, Default)]
pub struct Listeners {
    next_id: u64,
    items: Vec<Listener>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, target: Target, kind: EventKind, handler: Handler) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.items.push(Listener {
            id,
            target,
            kind,
            handler,
        });
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.items.len();
        self.items.retain(|l| l.id != id);
        self.items.len() != before
    }

    /// Remove every listener running `handler`; returns how many went.
    pub fn remove_handler(&mut self, handler: Handler) -> usize {
        let before = self.items.len();
        self.items.retain(|l| l.handler != handler);
        before - self.items.len()
    }

    /// Handlers attached to `target` for `kind`, in registration order.
    pub fn handlers_for(&self, target: Target, kind: EventKind) -> Vec<(ListenerId, Handler)> {
        self.items
            .iter()
            .filter(|l| l.target == target && l.kind == kind)
            .map(|l| (l.id, l.handler))
            .collect()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.items.iter().any(|l| l.id == id)
    }

    pub fn count(&self, target: Target, kind: EventKind) -> usize {
        self.items
            .iter()
            .filter(|l| l.target == target && l.kind == kind)
            .count()
    }

    pub fn count_handler(&self, handler: Handler) -> usize {
        self.items.iter().filter(|l| l.handler == handler).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Event object handed to each handler during a dispatch.
#[derive(Debug, Clone)]
pub struct DomEvent {
    pub kind: EventKind,
    /// Node the event was fired at, if any.
    pub target: Option<NodeId>,
    /// Target whose listeners are currently running.
    pub current: Target,
    pub key: Option<String>,
    propagation_stopped: bool,
    default_prevented: bool,
}

impl DomEvent {
    pub fn new(event: &PageEvent) -> Self {
        let (target, key) = match event {
            PageEvent::Click { target } => (Some(*target), None),
            PageEvent::Submit { form } => (Some(*form), None),
            PageEvent::KeyDown { key } => (None, Some(key.clone())),
            _ => (None, None),
        };
        Self {
            kind: event.kind(),
            target,
            current: Target::Window,
            key,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn key_is(&self, key: &str) -> bool {
        self.key.as_deref() == Some(key)
    }
}

/// Result of [`crate::Page::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    pub default_prevented: bool,
    pub handlers_run: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeless_dom::Document;

    #[test]
    fn registry_keeps_registration_order() {
        let doc = Document::parse("<html><body><button>Menu</button></body></html>");
        let button = doc.select_first("button").unwrap().unwrap();
        let mut listeners = Listeners::new();
        listeners.add(Target::Node(button), EventKind::Click, Handler::DrawerToggle);
        let anchor = listeners.add(Target::Node(button), EventKind::Click, Handler::AnchorLink);
        listeners.add(Target::Window, EventKind::Scroll, Handler::CardReveal);

        let handlers: Vec<Handler> = listeners
            .handlers_for(Target::Node(button), EventKind::Click)
            .into_iter()
            .map(|(_, h)| h)
            .collect();
        assert_eq!(handlers, [Handler::DrawerToggle, Handler::AnchorLink]);

        assert!(listeners.remove(anchor));
        assert!(!listeners.remove(anchor));
        assert_eq!(listeners.count(Target::Node(button), EventKind::Click), 1);
        assert_eq!(listeners.remove_handler(Handler::CardReveal), 1);
        assert_eq!(listeners.len(), 1);
    }

    #[test]
    fn event_flags() {
        let mut event = DomEvent::new(&PageEvent::KeyDown {
            key: "Escape".into(),
        });
        assert!(event.key_is("Escape"));
        assert!(!event.default_prevented());
        event.prevent_default();
        event.stop_propagation();
        assert!(event.default_prevented());
        assert!(event.propagation_stopped());
    }
}
