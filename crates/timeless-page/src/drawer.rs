//! Mobile navigation drawer.
//!
//! Two states, `Closed` and `Open`. Every transition writes the panel's
//! open class, the trigger's `aria-expanded`, the panel's `aria-hidden` and
//! the body marker class together, so the four never disagree.
//!
//! Binding is idempotent per trigger element. When the trigger or the panel
//! is not in the document yet, the controller registers a mutation observer
//! and retries after every structural change until binding succeeds.

use timeless_dom::NodeId;
use tracing::{debug, info, warn};

use crate::context::{Observer, PageContext};
use crate::error::PageError;
use crate::event::{DomEvent, EventKind, Handler, Target};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawerState {
    #[default]
    Closed,
    Open,
}

impl DrawerState {
    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Binding {
    trigger: NodeId,
    panel: NodeId,
}

#[derive(Debug, Default)]
pub struct DrawerController {
    state: DrawerState,
    binding: Option<Binding>,
}

impl DrawerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DrawerState {
        self.state
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    pub fn trigger(&self) -> Option<NodeId> {
        self.binding.map(|b| b.trigger)
    }

    pub fn panel(&self) -> Option<NodeId> {
        self.binding.map(|b| b.panel)
    }

    /// Bind now, or keep retrying on document mutations until the elements
    /// exist.
    pub fn init(&mut self, ctx: &mut PageContext) -> Result<(), PageError> {
        if self.bind(ctx)? {
            return Ok(());
        }
        ctx.observe(Observer::DrawerBinding);
        Err(PageError::missing(format!(
            "{} / {}",
            ctx.config.drawer.trigger_selector, ctx.config.drawer.panel_selector
        )))
    }

    /// Attach the drawer listeners. Returns `Ok(false)` if the trigger or
    /// panel is missing; repeated calls against the same trigger attach
    /// nothing new.
    pub fn bind(&mut self, ctx: &mut PageContext) -> Result<bool, PageError> {
        let trigger = ctx.doc.select_first(&ctx.config.drawer.trigger_selector)?;
        let panel = ctx.doc.select_first(&ctx.config.drawer.panel_selector)?;
        let (Some(trigger), Some(panel)) = (trigger, panel) else {
            warn!(
                trigger = trigger.is_some(),
                panel = panel.is_some(),
                "drawer elements missing"
            );
            return Ok(false);
        };

        let binding = Binding { trigger, panel };
        if self.binding == Some(binding) {
            debug!("drawer already bound");
            return Ok(true);
        }
        if self.binding.is_some() {
            // A new trigger instance replaced the old one.
            for handler in [
                Handler::DrawerToggle,
                Handler::DrawerBackdrop,
                Handler::DrawerEscape,
                Handler::DrawerLinkClose,
            ] {
                ctx.listeners.remove_handler(handler);
            }
        }

        ctx.listen_node(trigger, EventKind::Click, Handler::DrawerToggle);
        ctx.listen_node(panel, EventKind::Click, Handler::DrawerBackdrop);
        ctx.listen(Target::Document, EventKind::KeyDown, Handler::DrawerEscape);
        for link in ctx.doc.select_in(panel, r##"a[href^="#"]"##)? {
            ctx.listen_node(link, EventKind::Click, Handler::DrawerLinkClose);
        }
        self.binding = Some(binding);

        // Adopt whatever state the markup starts in.
        let open = ctx.doc.has_class(panel, &ctx.config.drawer.open_class);
        self.set_state(
            ctx,
            if open {
                DrawerState::Open
            } else {
                DrawerState::Closed
            },
        );
        info!("drawer bound");
        Ok(true)
    }

    /// Mutation observer callback; true once bound (disconnect).
    pub fn on_mutation(&mut self, ctx: &mut PageContext) -> bool {
        match self.bind(ctx) {
            Ok(bound) => bound,
            Err(err) => {
                warn!(error = %err, "drawer rebind failed");
                false
            }
        }
    }

    pub fn toggle(&mut self, ctx: &mut PageContext) {
        let next = match self.state {
            DrawerState::Open => DrawerState::Closed,
            DrawerState::Closed => DrawerState::Open,
        };
        self.set_state(ctx, next);
    }

    pub fn close(&mut self, ctx: &mut PageContext) {
        if self.state.is_open() {
            self.set_state(ctx, DrawerState::Closed);
        }
    }

    pub fn on_toggle_click(&mut self, ctx: &mut PageContext, event: &mut DomEvent) {
        event.stop_propagation();
        self.toggle(ctx);
    }

    /// Clicks on the panel itself (its backdrop), not on its content.
    pub fn on_backdrop_click(&mut self, ctx: &mut PageContext, event: &DomEvent) {
        if event.target.is_some() && event.target == self.panel() {
            self.close(ctx);
        }
    }

    pub fn on_key_down(&mut self, ctx: &mut PageContext, event: &DomEvent) {
        if event.key_is("Escape") {
            self.close(ctx);
        }
    }

    pub fn on_link_click(&mut self, ctx: &mut PageContext) {
        self.close(ctx);
    }

    fn set_state(&mut self, ctx: &mut PageContext, state: DrawerState) {
        let Some(Binding { trigger, panel }) = self.binding else {
            return;
        };
        let open = state.is_open();
        let drawer = &ctx.config.drawer;
        let doc = &mut ctx.doc;
        doc.toggle_class(panel, &drawer.open_class, Some(open));
        doc.set_attr(trigger, "aria-expanded", open.to_string());
        doc.set_attr(panel, "aria-hidden", (!open).to_string());
        if let Some(body) = doc.body() {
            doc.toggle_class(body, &drawer.body_class, Some(open));
        }
        if self.state != state {
            debug!(open, "drawer toggled");
        }
        self.state = state;
    }
}
