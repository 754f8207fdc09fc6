//! One-shot card group reveals.
//!
//! Each configured group starts hidden and plays its reveal the first time
//! its container enters the viewport. A group never fires twice; once every
//! group has fired the scroll listener is removed.

use timeless_anim::{EasingFunction, Property, Stagger, StaggerFrom, TweenSpec};
use timeless_config::{CardEffect, CardsConfig};
use timeless_dom::{Document, NodeId};
use tracing::{debug, info};

use crate::context::PageContext;
use crate::error::PageError;
use crate::event::{EventKind, Handler, ListenerId, Target};

/// `top <= innerHeight * threshold && bottom >= 0`.
pub fn in_viewport(doc: &Document, node: NodeId, threshold: f64) -> bool {
    let rect = doc.bounding_rect(node);
    rect.top <= doc.viewport().height * threshold && rect.bottom >= 0.0
}

/// Signed distance of each item from the middle of the group.
fn center_offsets(count: usize) -> Vec<f64> {
    let center = count.saturating_sub(1) as f64 / 2.0;
    (0..count).map(|i| i as f64 - center).collect()
}

#[derive(Debug)]
struct CardGroup {
    name: String,
    container: NodeId,
    items: Vec<NodeId>,
    effect: CardEffect,
    fired: bool,
}

impl CardGroup {
    fn hide(&self, ctx: &mut PageContext) {
        let cards = &ctx.config.cards;
        let offsets = center_offsets(self.items.len());
        for (item, offset) in self.items.iter().zip(offsets) {
            let (x, rotate) = match self.effect {
                CardEffect::Rise => (None, cards.tilt_deg),
                CardEffect::Fan => (
                    Some(-offset * cards.fan_spread_px),
                    offset * cards.fan_rotate_deg,
                ),
            };
            ctx.anim.set(*item, Property::Opacity, 0.0);
            ctx.anim.set(*item, Property::TranslateY, cards.rise_px);
            ctx.anim.set(*item, Property::Rotate, rotate);
            if let Some(x) = x {
                ctx.anim.set(*item, Property::TranslateX, x);
            }
        }
    }

    fn reveal(&self, cards: &CardsConfig, easing: EasingFunction) -> TweenSpec {
        let spec = TweenSpec::new(format!("cards:{}", self.name))
            .targets(self.items.iter().copied())
            .animate(Property::Opacity, 0.0, 1.0)
            .animate(Property::TranslateY, cards.rise_px, 0.0)
            .duration_ms(cards.duration_ms)
            .easing(easing);
        match self.effect {
            CardEffect::Rise => spec
                .animate(Property::Rotate, cards.tilt_deg, 0.0)
                .stagger(Stagger::new(cards.stagger_ms)),
            CardEffect::Fan => {
                let offsets = center_offsets(self.items.len());
                let xs: Vec<f64> = offsets.iter().map(|o| -o * cards.fan_spread_px).collect();
                let angles: Vec<f64> = offsets.iter().map(|o| o * cards.fan_rotate_deg).collect();
                spec.animate(Property::TranslateX, xs, 0.0)
                    .animate(Property::Rotate, angles, 0.0)
                    .stagger(Stagger::new(cards.stagger_ms).from(StaggerFrom::Center))
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct CardReveals {
    groups: Vec<CardGroup>,
    listener: Option<ListenerId>,
    initialized: bool,
}

impl CardReveals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn fired(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g.name == name && g.fired)
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    pub fn init(&mut self, ctx: &mut PageContext) -> Result<(), PageError> {
        if self.initialized {
            return Ok(());
        }
        self.initialized = true;

        for config in ctx.config.cards.groups.clone() {
            let Some(container) = ctx.doc.select_first(&config.container)? else {
                debug!(group = %config.name, "card group not on this page");
                continue;
            };
            let items = ctx.doc.select_in(container, &config.items)?;
            if items.is_empty() {
                debug!(group = %config.name, "card group has no items");
                continue;
            }
            let group = CardGroup {
                name: config.name,
                container,
                items,
                effect: config.effect,
                fired: false,
            };
            group.hide(ctx);
            self.groups.push(group);
        }

        if self.groups.is_empty() {
            return Ok(());
        }
        debug!(groups = self.groups.len(), "card reveals armed");
        self.listener = Some(ctx.listen(Target::Window, EventKind::Scroll, Handler::CardReveal));
        // Groups already on screen reveal right away.
        self.on_scroll(ctx);
        Ok(())
    }

    /// Fire every group that has just entered the viewport.
    pub fn on_scroll(&mut self, ctx: &mut PageContext) -> usize {
        let threshold = ctx.config.cards.viewport_threshold;
        let easing = ctx.easing(&ctx.config.cards.easing, EasingFunction::EaseOut);
        let mut fired = 0;
        for group in self.groups.iter_mut().filter(|g| !g.fired) {
            if !in_viewport(&ctx.doc, group.container, threshold) {
                continue;
            }
            group.fired = true;
            let spec = group.reveal(&ctx.config.cards, easing);
            ctx.anim.play(spec);
            info!(group = %group.name, cards = group.items.len(), "card group revealed");
            fired += 1;
        }

        if self.groups.iter().all(|g| g.fired) {
            if let Some(listener) = self.listener.take() {
                ctx.listeners.remove(listener);
                debug!("all card groups revealed, scroll listener removed");
            }
        }
        fired
    }
}
