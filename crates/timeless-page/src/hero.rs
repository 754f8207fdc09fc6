//! Hero banner animation.
//!
//! The headline is split into word (or letter) spans, everything starts
//! hidden, then one timeline plays four stages:
//!
//! 1. `hero:reveal`: the image scales down from 1.9 and sharpens.
//! 2. `hero:dismiss`: after a pause the image scales up, blurs out and is
//!    removed from layout.
//! 3. `hero:headline`: fragments rise and fade in, staggered; the text
//!    block gains `visible`.
//! 4. `hero:cta`: call-to-action elements rise in.
//!
//! A gentle pulse loops on the image between the end of the reveal and the
//! start of the dismiss.

use timeless_anim::{
    AnimationDirection, AnimationEvent, AnimationId, EasingFunction, Offset, Property, Stagger,
    Timeline, TweenSpec,
};
use timeless_config::{HeroConfig, SplitMode};
use timeless_dom::{Document, ElementData, NodeId};
use tracing::{debug, info};

use crate::context::PageContext;
use crate::error::PageError;

const HERO: &str = ".hero";
const ART: &str = ".hero__art img";
const TEXT: &str = ".hero__text";
const TITLE: &str = ".hero__text h1";
const CTA: &str = ".hero__cta";

const REVEAL: &str = "hero:reveal";
const DISMISS: &str = "hero:dismiss";
const HEADLINE: &str = "hero:headline";
const CALL_TO_ACTION: &str = "hero:cta";
const PULSE: &str = "hero:pulse";

/// Replace the text of `title` with one span per word (or per letter,
/// grouped in word spans). Returns the fragments to animate; a heading
/// that is already split is left alone.
pub fn split_heading(doc: &mut Document, title: NodeId, mode: SplitMode) -> Result<Vec<NodeId>, PageError> {
    let fragment = match mode {
        SplitMode::Words => ".word",
        SplitMode::Letters => ".letter",
    };
    let existing = doc.select_in(title, fragment)?;
    if !existing.is_empty() {
        debug!(fragments = existing.len(), "heading already split");
        return Ok(existing);
    }

    let text = doc.text_content(title);
    let words: Vec<&str> = text.split_whitespace().collect();
    doc.clear_children(title);

    let mut fragments = Vec::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            doc.append_text(title, " ");
        }
        let Some(word_span) = doc.append_element(title, span("word")) else {
            continue;
        };
        match mode {
            SplitMode::Words => {
                doc.append_text(word_span, word);
                fragments.push(word_span);
            }
            SplitMode::Letters => {
                for letter in word.chars() {
                    if let Some(node) = doc.append_element(word_span, span("letter")) {
                        doc.append_text(node, letter.encode_utf8(&mut [0; 4]));
                        fragments.push(node);
                    }
                }
            }
        }
    }
    Ok(fragments)
}

fn span(class: &str) -> ElementData {
    ElementData::new("span", [("class", class)])
}

fn find_in(doc: &Document, scope: NodeId, selector: &str) -> Result<NodeId, PageError> {
    doc.select_in(scope, selector)?
        .into_iter()
        .next()
        .ok_or_else(|| PageError::missing(selector))
}

#[derive(Debug, Clone, Copy)]
struct HeroParts {
    art: NodeId,
    text: NodeId,
}

#[derive(Debug, Default)]
pub struct HeroOrchestrator {
    parts: Option<HeroParts>,
    timeline: Option<AnimationId>,
    /// Pulse loop on the image. It only runs between the end of the reveal
    /// and the start of the dismiss, where no timeline stage writes the
    /// image scale; it never runs alongside the whole timeline.
    pulse: Option<AnimationId>,
    dismissed: bool,
}

impl HeroOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_played(&self) -> bool {
        self.timeline.is_some()
    }

    pub fn pulse(&self) -> Option<AnimationId> {
        self.pulse
    }

    /// The dismiss stage has begun; the image will not pulse again.
    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    pub fn init(&mut self, ctx: &mut PageContext) -> Result<(), PageError> {
        if self.has_played() {
            return Ok(());
        }
        let doc = &mut ctx.doc;
        let hero = doc.select_first(HERO)?.ok_or_else(|| PageError::missing(HERO))?;
        let art = find_in(doc, hero, ART)?;
        let text = find_in(doc, hero, TEXT)?;
        let title = find_in(doc, hero, TITLE)?;
        let ctas = doc.select_in(hero, CTA)?;

        let config = ctx.config.hero.clone();
        let fragments = split_heading(doc, title, config.split)?;
        doc.set_style(title, "word-break", "keep-all");
        doc.set_style(title, "hyphens", "none");
        doc.set_style(title, "white-space", "normal");

        let anim = &mut ctx.anim;
        anim.set(art, Property::Opacity, 0.0);
        anim.set(text, Property::Opacity, 0.0);
        for fragment in &fragments {
            anim.set(*fragment, Property::Opacity, 0.0);
            anim.set(*fragment, Property::TranslateY, 20.0);
        }
        for cta in &ctas {
            anim.set(*cta, Property::Opacity, 0.0);
        }

        let timeline = build_timeline(ctx, &config, art, fragments.clone(), ctas.clone());
        let duration = timeline.duration_ms();
        self.timeline = Some(ctx.anim.play_timeline(timeline));
        self.parts = Some(HeroParts { art, text });
        info!(fragments = fragments.len(), ctas = ctas.len(), duration_ms = duration, "hero timeline started");
        Ok(())
    }

    /// React to timeline stage events.
    pub fn on_animation_events(&mut self, ctx: &mut PageContext, events: &[AnimationEvent]) {
        let Some(HeroParts { art, text }) = self.parts else {
            return;
        };
        for event in events {
            if event.is_completed(REVEAL) {
                if self.dismissed {
                    debug!("reveal finished after dismiss began, no pulse");
                } else {
                    self.start_pulse(ctx, art);
                }
            } else if event.is_began(DISMISS) {
                self.dismissed = true;
                if let Some(pulse) = self.pulse.take() {
                    ctx.anim.cancel(pulse);
                }
            } else if event.is_completed(DISMISS) {
                // Out of layout so it no longer covers the text.
                ctx.doc.set_style(art, "display", "none");
                ctx.doc.set_attr(art, "aria-hidden", "true");
                debug!("hero image dismissed");
            } else if event.is_began(HEADLINE) {
                ctx.doc.add_class(text, "visible");
                ctx.anim.set(text, Property::Opacity, 1.0);
            }
        }
    }

    fn start_pulse(&mut self, ctx: &mut PageContext, art: NodeId) {
        let config = &ctx.config.hero;
        let easing = ctx.easing(&config.pulse_easing, EasingFunction::EaseInOut);
        let spec = TweenSpec::new(PULSE)
            .target(art)
            .animate(Property::Scale, 1.0, config.pulse_scale)
            .duration_ms(config.pulse_ms)
            .easing(easing)
            .direction(AnimationDirection::Alternate)
            .looped();
        self.pulse = Some(ctx.anim.play(spec));
    }
}

fn build_timeline(
    ctx: &PageContext,
    config: &HeroConfig,
    art: NodeId,
    fragments: Vec<NodeId>,
    ctas: Vec<NodeId>,
) -> Timeline {
    let base = ctx.easing(&config.easing, EasingFunction::EaseOut);
    let reveal_easing = ctx.easing(&config.reveal_easing, base);
    let dismiss_easing = ctx.easing(&config.dismiss_easing, base);

    let reveal = TweenSpec::new(REVEAL)
        .target(art)
        .animate(Property::Opacity, 0.0, 1.0)
        .animate(Property::Scale, config.reveal_scale_from, 1.0)
        .animate(Property::Blur, config.reveal_blur_px, 0.0)
        .duration_ms(config.reveal_ms)
        .easing(reveal_easing);

    let dismiss = TweenSpec::new(DISMISS)
        .target(art)
        .animate(Property::Opacity, 1.0, 0.0)
        .animate(Property::Scale, 1.0, config.dismiss_scale_to)
        .animate(Property::Blur, 0.0, config.dismiss_blur_px)
        .duration_ms(config.dismiss_ms)
        .easing(dismiss_easing);

    let headline = TweenSpec::new(HEADLINE)
        .targets(fragments)
        .animate(Property::TranslateY, config.text_rise_px, 0.0)
        .animate(Property::Opacity, 0.0, 1.0)
        .duration_ms(config.text_ms)
        .stagger(Stagger::new(config.text_stagger_ms).start(config.text_stagger_start_ms));

    let cta = TweenSpec::new(CALL_TO_ACTION)
        .targets(ctas)
        .animate(Property::Opacity, 0.0, 1.0)
        .animate(Property::TranslateY, config.cta_rise_px, 0.0)
        .duration_ms(config.cta_ms)
        .stagger(Stagger::new(config.cta_stagger_ms));

    Timeline::new("hero")
        .easing(base)
        .add(reveal, Offset::After)
        .add(dismiss, Offset::relative(config.dismiss_pause_ms))
        .add(headline, Offset::relative(-config.text_overlap_ms))
        .add(cta, Offset::relative(-config.cta_overlap_ms))
}
