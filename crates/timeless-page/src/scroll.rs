//! Smooth section navigation with header compensation.
//!
//! Covers in-page anchor links, the URL fragment present at load, and the
//! `scroll-margin-top` written onto every `section[id]`.

use timeless_anim::EasingFunction;
use timeless_dom::{Document, NodeId};
use tracing::{debug, info};

use crate::context::{PageContext, ReadyState};
use crate::drawer::DrawerController;
use crate::error::PageError;
use crate::event::{DomEvent, EventKind, Handler, Target};
use crate::header::header_height;
use crate::timers::{Debounce, Task, TimerId};

const ANCHOR_SELECTOR: &str = r##"a[href^="#"]"##;

/// Document offset that puts the top of `#id` just below the header,
/// never above the page top. `None` if there is no such element.
pub fn section_offset(doc: &Document, id: &str, margin_px: f64) -> Option<f64> {
    let node = doc.element_by_id(id)?;
    let top = doc.layout(node).top;
    let header = f64::from(header_height(doc));
    Some((top - header - margin_px).max(0.0))
}

/// `scroll-margin-top` for sections given the current header height.
pub fn section_margin(header_px: u32, extra_px: f64, min_px: f64) -> f64 {
    (f64::from(header_px) + extra_px).max(min_px)
}

#[derive(Debug, Default)]
pub struct SmoothScroll {
    resize: Debounce,
    anchors: Vec<NodeId>,
    margins_bound: bool,
}

impl SmoothScroll {
    pub fn new(resize_debounce_ms: f64) -> Self {
        Self {
            resize: Debounce::new(resize_debounce_ms),
            ..Self::default()
        }
    }

    /// Smooth-scroll to `#id`; a missing element is a no-op.
    pub fn scroll_to(ctx: &mut PageContext, id: &str) -> bool {
        let scroll = &ctx.config.scroll;
        let Some(offset) = section_offset(&ctx.doc, id, scroll.margin_px) else {
            debug!(id, "scroll target not found");
            return false;
        };
        let viewport = ctx.doc.viewport();
        let from = viewport.scroll_y();
        let to = viewport.clamp_scroll(offset);
        let duration = scroll.smooth_duration_ms as f32;
        debug!(id, from, to, "scrolling to section");
        ctx.anim
            .scroll_viewport(from, to, duration, EasingFunction::EaseInOut);
        true
    }

    /// Intercept in-page links and arrange the scroll to the load fragment.
    pub fn init(&mut self, ctx: &mut PageContext) -> Result<(), PageError> {
        for link in ctx.doc.select(ANCHOR_SELECTOR)? {
            if self.anchors.contains(&link) {
                continue;
            }
            ctx.listen_node(link, EventKind::Click, Handler::AnchorLink);
            self.anchors.push(link);
        }
        debug!(links = self.anchors.len(), "anchor links intercepted");

        if ctx.ready_state == ReadyState::Complete {
            // The load event already fired; waiting for it would never scroll.
            Self::schedule_hash(ctx);
        } else {
            ctx.listen(Target::Window, EventKind::Load, Handler::HashScroll);
        }
        Ok(())
    }

    pub fn on_anchor_click(
        ctx: &mut PageContext,
        drawer: &mut DrawerController,
        event: &mut DomEvent,
    ) {
        let Target::Node(link) = event.current else {
            return;
        };
        let Some(href) = ctx.doc.attr(link, "href").map(str::to_owned) else {
            return;
        };
        let Some(id) = href.strip_prefix('#').filter(|id| !id.is_empty()) else {
            return;
        };
        if ctx.doc.element_by_id(id).is_none() {
            return;
        }
        event.prevent_default();
        drawer.close(ctx);
        Self::scroll_to(ctx, id);
    }

    /// Schedule the delayed scroll to the URL fragment, if there is one.
    pub fn schedule_hash(ctx: &mut PageContext) -> Option<TimerId> {
        let id = ctx.doc.fragment()?.to_string();
        let delay = f64::from(ctx.config.scroll.hash_delay_ms);
        info!(fragment = %id, delay_ms = delay, "scrolling to fragment after load");
        Some(ctx.set_timeout(delay, Task::HashScroll { id }))
    }

    /// Write section scroll margins now and again whenever resizing pauses.
    pub fn init_section_margins(&mut self, ctx: &mut PageContext) -> Result<(), PageError> {
        Self::apply_section_margins(ctx)?;
        if !self.margins_bound {
            ctx.listen(Target::Window, EventKind::Resize, Handler::SectionMargins);
            self.margins_bound = true;
        }
        Ok(())
    }

    pub fn apply_section_margins(ctx: &mut PageContext) -> Result<usize, PageError> {
        let scroll = &ctx.config.scroll;
        let margin = section_margin(
            header_height(&ctx.doc),
            scroll.section_margin_extra_px,
            scroll.section_margin_min_px,
        );
        let sections = ctx.doc.select("section[id]")?;
        let value = format!("{}px", margin);
        for section in &sections {
            ctx.doc.set_style(*section, "scroll-margin-top", value.clone());
        }
        debug!(sections = sections.len(), margin, "section scroll margins applied");
        Ok(sections.len())
    }

    pub fn on_resize(&mut self, ctx: &mut PageContext) {
        let now = ctx.now_ms;
        self.resize.trigger(&mut ctx.timers, now, Task::SectionMargins);
    }

    pub fn on_margins_timer(&mut self, ctx: &mut PageContext, fired: TimerId) -> Result<(), PageError> {
        self.resize.settle(fired);
        Self::apply_section_margins(ctx).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeless_config::SiteConfig;
    use timeless_dom::LayoutBox;

    fn ctx() -> PageContext {
        let mut doc = Document::parse(
            r##"<html><body>
                <header>Logo</header>
                <a id="go" href="#servicios">Servicios</a>
                <a id="top" href="#">Top</a>
                <section id="servicios"></section>
                <section id="contacto"></section>
            </body></html>"##,
        );
        let header = doc.select_first("header").unwrap().unwrap();
        doc.set_layout(header, LayoutBox::new(0.0, 80.0));
        let servicios = doc.element_by_id("servicios").unwrap();
        doc.set_layout(servicios, LayoutBox::new(1200.0, 600.0));
        let contacto = doc.element_by_id("contacto").unwrap();
        doc.set_layout(contacto, LayoutBox::new(40.0, 600.0));
        PageContext::new(doc, SiteConfig::default())
    }

    #[test]
    fn offset_compensates_for_header() {
        let ctx = ctx();
        assert_eq!(section_offset(&ctx.doc, "servicios", 10.0), Some(1110.0));
        assert_eq!(section_offset(&ctx.doc, "missing", 10.0), None);
    }

    #[test]
    fn offset_never_goes_above_page_top() {
        let ctx = ctx();
        assert_eq!(section_offset(&ctx.doc, "contacto", 10.0), Some(0.0));
    }

    #[test]
    fn section_margin_has_a_floor() {
        assert_eq!(section_margin(80, 8.0, 10.0), 88.0);
        assert_eq!(section_margin(0, 8.0, 10.0), 10.0);
    }

    #[test]
    fn scroll_to_missing_section_is_a_no_op() {
        let mut ctx = ctx();
        assert!(!SmoothScroll::scroll_to(&mut ctx, "nowhere"));
        assert!(ctx.anim.is_idle());
        assert!(SmoothScroll::scroll_to(&mut ctx, "servicios"));
        assert_eq!(ctx.anim.scroll_target(), Some(1110.0));
    }

    #[test]
    fn writes_margins_on_every_section() {
        let mut ctx = ctx();
        let mut scroll = SmoothScroll::new(200.0);
        scroll.init_section_margins(&mut ctx).unwrap();
        let servicios = ctx.doc.element_by_id("servicios").unwrap();
        assert_eq!(ctx.doc.style(servicios, "scroll-margin-top"), Some("88px"));
        assert_eq!(ctx.listeners.count_handler(Handler::SectionMargins), 1);
        scroll.init_section_margins(&mut ctx).unwrap();
        assert_eq!(ctx.listeners.count_handler(Handler::SectionMargins), 1);
    }

    #[test]
    fn load_fragment_waits_for_load_unless_already_complete() {
        let mut ctx = ctx();
        ctx.doc.set_fragment(Some("#servicios"));
        let mut scroll = SmoothScroll::new(200.0);
        scroll.init(&mut ctx).unwrap();
        assert_eq!(ctx.listeners.count_handler(Handler::HashScroll), 1);
        assert!(ctx.timers.is_empty());
        assert_eq!(ctx.listeners.count_handler(Handler::AnchorLink), 2);

        let mut late = self::ctx();
        late.doc.set_fragment(Some("servicios"));
        late.ready_state = ReadyState::Complete;
        SmoothScroll::new(200.0).init(&mut late).unwrap();
        assert_eq!(late.listeners.count_handler(Handler::HashScroll), 0);
        assert_eq!(late.timers.next_due(), Some(220.0));
    }
}
