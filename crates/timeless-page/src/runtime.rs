//! The page runtime: event dispatch, the clock and the bootstrap fan-out.

use timeless_config::SiteConfig;
use timeless_dom::{Document, NodeId};
use tracing::{debug, error, trace};

use crate::aos::ScrollReveal;
use crate::bootstrap::{InitReport, InitState};
use crate::context::{Notice, Observer, PageContext, ReadyState};
use crate::drawer::{DrawerController, DrawerState};
use crate::event::{DispatchOutcome, DomEvent, EventKind, Handler, Listeners, PageEvent, Target};
use crate::footer;
use crate::form::{FormController, SimulatedSubmitter, Submitter};
use crate::hero::HeroOrchestrator;
use crate::reveal::CardReveals;
use crate::scroll::SmoothScroll;
use crate::timers::{Task, TimerId};

/// Longest animation step `advance` takes between two frames.
pub const FRAME_MS: f64 = 16.0;

#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    /// Footer year; the current calendar year when unset.
    pub year: Option<i32>,
}

pub struct Page {
    ctx: PageContext,
    init: InitState,
    report: InitReport,
    options: PageOptions,
    submitter: Box<dyn Submitter>,
    drawer: DrawerController,
    form: FormController,
    scroll: SmoothScroll,
    hero: HeroOrchestrator,
    cards: CardReveals,
    reveal: ScrollReveal,
}

impl Page {
    pub fn new(doc: Document, config: SiteConfig) -> Self {
        let resize_debounce = f64::from(config.scroll.resize_debounce_ms);
        let mut ctx = PageContext::new(doc, config);
        ctx.listen(Target::Document, EventKind::DomContentLoaded, Handler::InitAll);
        ctx.listen(Target::Window, EventKind::Load, Handler::InitAll);
        Self {
            ctx,
            init: InitState::new(),
            report: InitReport::default(),
            options: PageOptions::default(),
            submitter: Box::new(SimulatedSubmitter),
            drawer: DrawerController::new(),
            form: FormController::new(),
            scroll: SmoothScroll::new(resize_debounce),
            hero: HeroOrchestrator::new(),
            cards: CardReveals::new(),
            reveal: ScrollReveal::new(),
        }
    }

    pub fn from_html(html: &str, config: SiteConfig) -> Self {
        Self::new(Document::parse(html), config)
    }

    pub fn with_submitter(mut self, submitter: impl Submitter + 'static) -> Self {
        self.submitter = Box::new(submitter);
        self
    }

    pub fn with_options(mut self, options: PageOptions) -> Self {
        self.options = options;
        self
    }

    pub fn document(&self) -> &Document {
        &self.ctx.doc
    }

    /// Non-structural edits: layout boxes, control values, the fragment.
    /// Structural changes go through [`Page::mutate`].
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.ctx.doc
    }

    pub fn config(&self) -> &SiteConfig {
        &self.ctx.config
    }

    pub fn listeners(&self) -> &Listeners {
        &self.ctx.listeners
    }

    pub fn notices(&self) -> &[Notice] {
        &self.ctx.notices
    }

    pub fn now_ms(&self) -> f64 {
        self.ctx.now_ms
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ctx.ready_state
    }

    pub fn is_initialized(&self) -> bool {
        self.init.is_initialized()
    }

    pub fn init_report(&self) -> &InitReport {
        &self.report
    }

    pub fn drawer_state(&self) -> DrawerState {
        self.drawer.state()
    }

    pub fn drawer(&self) -> &DrawerController {
        &self.drawer
    }

    pub fn hero(&self) -> &HeroOrchestrator {
        &self.hero
    }

    pub fn cards(&self) -> &CardReveals {
        &self.cards
    }

    pub fn is_observing(&self, observer: Observer) -> bool {
        self.ctx.observers.contains(&observer)
    }

    /// No timers pending and no animation running.
    pub fn is_settled(&self) -> bool {
        self.ctx.timers.is_empty() && self.ctx.anim.is_idle()
    }

    /// Initialize every feature. Only the first call does anything.
    pub fn init_all(&mut self) {
        if !self.init.begin() {
            debug!("initAll already ran");
            return;
        }
        let ctx = &mut self.ctx;
        let report = &mut self.report;
        report.record("reveal", self.reveal.init(ctx));
        report.record("year", footer::init_year(ctx, self.options.year));
        report.record("drawer", self.drawer.init(ctx));
        report.record("form", self.form.init(ctx));
        report.record("scroll", self.scroll.init(ctx));
        report.record("section-margins", self.scroll.init_section_margins(ctx));
        report.record("hero", self.hero.init(ctx));
        report.record("cards", self.cards.init(ctx));
        report.log_summary();
        self.flush();
    }

    /// Deliver a host event to the listeners on its propagation path.
    pub fn dispatch(&mut self, event: PageEvent) -> DispatchOutcome {
        match &event {
            PageEvent::DomContentLoaded => {
                if self.ctx.ready_state == ReadyState::Loading {
                    self.ctx.ready_state = ReadyState::Interactive;
                }
            }
            PageEvent::Load => self.ctx.ready_state = ReadyState::Complete,
            PageEvent::Scroll { y } => {
                self.ctx.doc.viewport_mut().set_scroll_y(*y);
            }
            PageEvent::Resize { width, height } => {
                let viewport = self.ctx.doc.viewport_mut();
                viewport.width = *width;
                viewport.height = *height;
            }
            _ => {}
        }

        let path = self.propagation_path(&event);
        let mut dom_event = DomEvent::new(&event);
        let handlers_run = self.deliver(&path, &mut dom_event);
        let outcome = DispatchOutcome {
            default_prevented: dom_event.default_prevented(),
            handlers_run,
        };
        trace!(kind = ?event.kind(), handlers_run, prevented = outcome.default_prevented, "event dispatched");

        if !outcome.default_prevented {
            self.default_action(&event);
        }
        self.flush();
        outcome
    }

    /// Move the clock forward, firing timers in due order between
    /// animation frames.
    pub fn advance(&mut self, ms: f64) {
        let end = self.ctx.now_ms + ms.max(0.0);
        loop {
            let frame_end = (self.ctx.now_ms + FRAME_MS).min(end);
            while let Some(due) = self.ctx.timers.next_due().filter(|due| *due <= frame_end) {
                self.render_frame(due.max(self.ctx.now_ms));
                if let Some((id, task)) = self.ctx.timers.pop_due(self.ctx.now_ms) {
                    self.run_task(id, task);
                }
            }
            self.render_frame(frame_end);
            if frame_end >= end {
                break;
            }
        }
    }

    /// Apply a structural change to the document, then re-run pending
    /// mutation observers.
    pub fn mutate<R>(&mut self, change: impl FnOnce(&mut Document) -> R) -> R {
        let before = self.ctx.doc.mutation_seq();
        let result = change(&mut self.ctx.doc);
        if self.ctx.doc.mutation_seq() != before {
            self.run_observers();
        }
        result
    }

    fn propagation_path(&self, event: &PageEvent) -> Vec<Target> {
        let doc = &self.ctx.doc;
        let start = match event {
            PageEvent::Click { target } => Some(*target),
            PageEvent::Submit { form } => Some(*form),
            PageEvent::KeyDown { .. } => doc.focused(),
            PageEvent::DomContentLoaded => return vec![Target::Document, Target::Window],
            PageEvent::Load | PageEvent::Scroll { .. } | PageEvent::Resize { .. } => {
                return vec![Target::Window];
            }
        };

        let mut path = Vec::new();
        let mut current = start.filter(|node| doc.is_connected(*node));
        while let Some(node) = current {
            path.push(Target::Node(node));
            current = doc.parent_element(node);
        }
        path.push(Target::Document);
        path.push(Target::Window);
        path
    }

    /// Run listeners target by target; handlers registered while the event
    /// is in flight do not see it.
    fn deliver(&mut self, path: &[Target], event: &mut DomEvent) -> usize {
        let mut run = 0;
        for target in path {
            let handlers = self.ctx.listeners.handlers_for(*target, event.kind);
            event.current = *target;
            for (id, handler) in handlers {
                if !self.ctx.listeners.contains(id) {
                    continue;
                }
                self.run_handler(handler, event);
                run += 1;
            }
            if event.propagation_stopped() {
                break;
            }
        }
        run
    }

    fn run_handler(&mut self, handler: Handler, event: &mut DomEvent) {
        if handler == Handler::InitAll {
            self.init_all();
            return;
        }
        let ctx = &mut self.ctx;
        match handler {
            Handler::InitAll => {}
            Handler::DrawerToggle => self.drawer.on_toggle_click(ctx, event),
            Handler::DrawerBackdrop => self.drawer.on_backdrop_click(ctx, event),
            Handler::DrawerEscape => self.drawer.on_key_down(ctx, event),
            Handler::DrawerLinkClose => self.drawer.on_link_click(ctx),
            Handler::AnchorLink => SmoothScroll::on_anchor_click(ctx, &mut self.drawer, event),
            Handler::ContactSubmit => {
                if let Err(err) = self.form.on_submit(ctx, event) {
                    error!(error = %err, "contact form handler failed");
                }
            }
            Handler::SectionMargins => self.scroll.on_resize(ctx),
            Handler::HashScroll => {
                SmoothScroll::schedule_hash(ctx);
            }
            Handler::CardReveal => {
                self.cards.on_scroll(ctx);
            }
            Handler::ScrollReveal => self.reveal.refresh(&mut ctx.doc),
        }
    }

    /// Native behaviour of an unprevented click on an in-page link: jump to
    /// the section, honouring its `scroll-margin-top`.
    fn default_action(&mut self, event: &PageEvent) {
        let PageEvent::Click { target } = event else {
            return;
        };
        let doc = &mut self.ctx.doc;
        let Ok(Some(link)) = doc.closest(*target, "a[href]") else {
            return;
        };
        let Some(id) = doc
            .attr(link, "href")
            .and_then(|href| href.strip_prefix('#'))
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
        else {
            return;
        };
        doc.set_fragment(Some(&id));
        let Some(section) = doc.element_by_id(&id) else {
            return;
        };
        let margin = doc
            .style(section, "scroll-margin-top")
            .and_then(|value| value.trim_end_matches("px").parse::<f64>().ok())
            .unwrap_or(0.0);
        let top = doc.layout(section).top - margin;
        if doc.viewport_mut().set_scroll_y(top) {
            self.notify_scroll();
        }
    }

    fn notify_scroll(&mut self) {
        let mut event = DomEvent::new(&PageEvent::Scroll {
            y: self.ctx.doc.viewport().scroll_y(),
        });
        self.deliver(&[Target::Window], &mut event);
    }

    fn render_frame(&mut self, at: f64) {
        let delta = at - self.ctx.now_ms;
        self.ctx.now_ms = at;
        if delta > 0.0 {
            self.ctx.anim.update(delta as f32);
        }
        self.flush();
    }

    /// Write animation state into the document and react to what changed.
    fn flush(&mut self) {
        let scrolled = self.ctx.anim.apply(&mut self.ctx.doc);
        let events = self.ctx.anim.drain_events();
        if !events.is_empty() {
            self.hero.on_animation_events(&mut self.ctx, &events);
            self.ctx.anim.apply(&mut self.ctx.doc);
        }
        if scrolled {
            self.notify_scroll();
        }
    }

    fn run_task(&mut self, id: TimerId, task: Task) {
        debug!(?task, at_ms = self.ctx.now_ms, "timer fired");
        match task {
            Task::HashScroll { id: section } => {
                SmoothScroll::scroll_to(&mut self.ctx, &section);
            }
            Task::SubmitSettled { form, fields } => {
                self.form
                    .settle(&mut self.ctx, self.submitter.as_mut(), form, &fields);
            }
            Task::SectionMargins => {
                if let Err(err) = self.scroll.on_margins_timer(&mut self.ctx, id) {
                    error!(error = %err, "section margins update failed");
                }
            }
        }
    }

    fn run_observers(&mut self) {
        for observer in self.ctx.observers.clone() {
            let satisfied = match observer {
                Observer::DrawerBinding => self.drawer.on_mutation(&mut self.ctx),
            };
            if satisfied {
                self.ctx.disconnect(observer);
                debug!(?observer, "mutation observer disconnected");
            }
        }
    }

    /// Node the drawer trigger is bound to, if any.
    pub fn drawer_trigger(&self) -> Option<NodeId> {
        self.drawer.trigger()
    }
}
