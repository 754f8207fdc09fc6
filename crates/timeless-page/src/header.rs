//! Header metrics.

use timeless_dom::Document;

/// Rendered height of the page header in whole pixels; 0 without a header.
pub fn header_height(doc: &Document) -> u32 {
    doc.select_first("header")
        .ok()
        .flatten()
        .map(|header| doc.offset_height(header).round().max(0.0) as u32)
        .unwrap_or(0)
}
