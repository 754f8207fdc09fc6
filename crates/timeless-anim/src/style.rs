//! Compose held channel values into inline CSS.

use std::collections::BTreeMap;

use timeless_dom::{Document, NodeId};

use crate::types::Property;

/// Inline style values derived from a node's channels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposedStyle {
    pub opacity: Option<String>,
    pub transform: Option<String>,
    pub filter: Option<String>,
}

pub fn compose(channels: &BTreeMap<Property, f64>) -> ComposedStyle {
    let opacity = channels
        .get(&Property::Opacity)
        .map(|v| format_number(v.clamp(0.0, 1.0)));

    let mut parts = Vec::new();
    if let Some(x) = channels.get(&Property::TranslateX) {
        parts.push(format!("translateX({}px)", format_number(*x)));
    }
    if let Some(y) = channels.get(&Property::TranslateY) {
        parts.push(format!("translateY({}px)", format_number(*y)));
    }
    if let Some(s) = channels.get(&Property::Scale) {
        parts.push(format!("scale({})", format_number(*s)));
    }
    if let Some(r) = channels.get(&Property::Rotate) {
        parts.push(format!("rotate({}deg)", format_number(*r)));
    }
    let transform = (!parts.is_empty()).then(|| parts.join(" "));

    let filter = channels
        .get(&Property::Blur)
        .map(|b| format!("blur({}px)", format_number(b.max(0.0))));

    ComposedStyle {
        opacity,
        transform,
        filter,
    }
}

/// Write the composed style onto `node`; channels that are absent clear
/// their property.
pub fn apply(doc: &mut Document, node: NodeId, channels: &BTreeMap<Property, f64>) {
    let composed = compose(channels);
    write(doc, node, "opacity", composed.opacity);
    write(doc, node, "transform", composed.transform);
    write(doc, node, "filter", composed.filter);
}

fn write(doc: &mut Document, node: NodeId, property: &str, value: Option<String>) {
    match value {
        Some(value) => doc.set_style(node, property, value),
        None => doc.remove_style(node, property),
    }
}

/// Round to three decimals and drop trailing zeros (`0.500` -> `0.5`).
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // Avoid "-0".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{rounded:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_numbers_compactly() {
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-0.0001), "0");
        assert_eq!(format_number(1.03), "1.03");
        assert_eq!(format_number(-4.0), "-4");
        assert_eq!(format_number(12.34567), "12.346");
    }

    #[test]
    fn composes_transform_in_fixed_order() {
        let channels = BTreeMap::from([
            (Property::Rotate, -4.0),
            (Property::TranslateY, 40.0),
            (Property::Opacity, 0.0),
        ]);
        let style = compose(&channels);
        assert_eq!(style.opacity.as_deref(), Some("0"));
        assert_eq!(style.transform.as_deref(), Some("translateY(40px) rotate(-4deg)"));
        assert!(style.filter.is_none());
    }

    #[test]
    fn writes_and_clears_inline_styles() {
        let mut doc = Document::parse(r#"<html><body><img id="art"></body></html>"#);
        let art = doc.element_by_id("art").unwrap();
        let mut channels = BTreeMap::from([(Property::Scale, 1.9), (Property::Blur, 12.0)]);
        apply(&mut doc, art, &channels);
        assert_eq!(doc.style(art, "transform"), Some("scale(1.9)"));
        assert_eq!(doc.style(art, "filter"), Some("blur(12px)"));
        channels.remove(&Property::Blur);
        apply(&mut doc, art, &channels);
        assert_eq!(doc.style(art, "filter"), None);
    }
}
