//! Scroll-reveal for `[data-aos]` elements.
//!
//! Elements get `aos-init` up front and toggle `aos-animate` as the page
//! scrolls; the stylesheet owns the actual transition. Global options come
//! from the `reveal` config section and each element may override them with
//! `data-aos-offset`, `data-aos-duration`, `data-aos-easing`,
//! `data-aos-once` and `data-aos-mirror`.

use timeless_anim::EasingFunction;
use timeless_config::RevealConfig;
use timeless_dom::{Document, NodeId};
use tracing::{debug, warn};

use crate::context::PageContext;
use crate::error::PageError;
use crate::event::{EventKind, Handler, Target};

const INIT_CLASS: &str = "aos-init";
const ANIMATE_CLASS: &str = "aos-animate";

#[derive(Debug, Clone, PartialEq)]
struct RevealItem {
    node: NodeId,
    offset_px: f64,
    once: bool,
    mirror: bool,
    animated: bool,
}

fn attr_bool(doc: &Document, node: NodeId, name: &str, default: bool) -> bool {
    match doc.attr(node, name) {
        Some("true") | Some("") => true,
        Some("false") => false,
        _ => default,
    }
}

fn attr_number<T: std::str::FromStr>(doc: &Document, node: NodeId, name: &str) -> Option<T> {
    doc.attr(node, name)?.trim().parse().ok()
}

#[derive(Debug, Default)]
pub struct ScrollReveal {
    items: Vec<RevealItem>,
    initialized: bool,
}

impl ScrollReveal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn init(&mut self, ctx: &mut PageContext) -> Result<(), PageError> {
        let options = ctx.config.reveal.clone();
        if !options.enabled {
            debug!("scroll reveal disabled");
            return Ok(());
        }
        if self.initialized {
            return Ok(());
        }
        self.initialized = true;

        for node in ctx.doc.select("[data-aos]")? {
            let item = prepare(&mut ctx.doc, node, &options);
            self.items.push(item);
        }
        if self.items.is_empty() {
            return Ok(());
        }
        ctx.listen(Target::Window, EventKind::Scroll, Handler::ScrollReveal);
        ctx.listen(Target::Window, EventKind::Resize, Handler::ScrollReveal);
        debug!(elements = self.items.len(), "scroll reveal initialized");
        self.refresh(&mut ctx.doc);
        Ok(())
    }

    /// Recompute `aos-animate` for every element at the current scroll.
    pub fn refresh(&mut self, doc: &mut Document) {
        let scroll_y = doc.viewport().scroll_y();
        let window = doc.viewport().height;
        for item in &mut self.items {
            let layout = doc.layout(item.node);
            let trigger = layout.top - window + item.offset_px;
            let past = item.mirror && scroll_y > layout.bottom();
            let show = scroll_y >= trigger && !past;
            if show && !item.animated {
                doc.add_class(item.node, ANIMATE_CLASS);
                item.animated = true;
            } else if !show && item.animated && !item.once {
                doc.remove_class(item.node, ANIMATE_CLASS);
                item.animated = false;
            }
        }
    }
}

/// Element easing, else the configured one, else CSS `ease`.
fn resolve_easing(name: &str, default: &str) -> EasingFunction {
    name.parse().unwrap_or_else(|err| {
        warn!(easing = %name, error = %err, "unrecognised scroll reveal easing");
        default.parse().unwrap_or_default()
    })
}

fn prepare(doc: &mut Document, node: NodeId, options: &RevealConfig) -> RevealItem {
    let duration = attr_number::<u32>(doc, node, "data-aos-duration").unwrap_or(options.duration_ms);
    let easing = doc
        .attr(node, "data-aos-easing")
        .unwrap_or(&options.easing)
        .to_string();
    let timing = resolve_easing(&easing, &options.easing);
    let item = RevealItem {
        node,
        offset_px: attr_number(doc, node, "data-aos-offset").unwrap_or(options.offset_px),
        once: attr_bool(doc, node, "data-aos-once", options.once),
        mirror: attr_bool(doc, node, "data-aos-mirror", options.mirror),
        animated: false,
    };
    doc.add_class(node, INIT_CLASS);
    doc.set_style(node, "transition-duration", format!("{duration}ms"));
    doc.set_style(node, "transition-timing-function", timing.to_css());
    doc.set_attr(node, "data-aos-easing", easing);
    item
}
