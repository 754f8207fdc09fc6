//! HTML ingestion: parse with scraper, then copy into the mutable tree.

use ego_tree::NodeRef;
use scraper::{Html, Node};
use tracing::debug;

use crate::document::Document;
use crate::node::ElementData;
use crate::NodeId;

pub fn parse_document(html: &str) -> Document {
    let parsed = Html::parse_document(html);
    if !parsed.errors.is_empty() {
        debug!(errors = parsed.errors.len(), "HTML parsed with recoverable errors");
    }
    let mut doc = Document::new();
    let root = doc.root();
    copy_children(parsed.tree.root(), &mut doc, root);
    doc
}

/// Parse a fragment and append its nodes under `parent`.
pub fn append_fragment(doc: &mut Document, parent: NodeId, html: &str) {
    let parsed = Html::parse_fragment(html);
    let root = parsed.tree.root();
    // Fragments are wrapped in a synthetic <html> element.
    let container = root
        .children()
        .find(|c| matches!(c.value(), Node::Element(el) if el.name() == "html"))
        .unwrap_or(root);
    copy_children(container, doc, parent);
}

fn copy_children(source: NodeRef<'_, Node>, doc: &mut Document, parent: NodeId) {
    for child in source.children() {
        match child.value() {
            Node::Element(el) => {
                let data = ElementData::new(el.name(), el.attrs());
                if let Some(id) = doc.append_element(parent, data) {
                    copy_children(child, doc, id);
                }
            }
            Node::Text(text) => {
                let text: &str = text;
                if !text.is_empty() {
                    doc.append_text(parent, text);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_structure_and_attributes() {
        let doc = parse_document(
            r##"<html><body><nav id="mobile-drawer" aria-hidden="true" class="drawer">
               <a href="#inicio">Inicio</a></nav></body></html>"##,
        );
        let nav = doc.element_by_id("mobile-drawer").unwrap();
        assert_eq!(doc.tag_name(nav), Some("nav"));
        assert_eq!(doc.attr(nav, "aria-hidden"), Some("true"));
        assert!(doc.has_class(nav, "drawer"));
        assert_eq!(doc.text_content(nav).trim(), "Inicio");
        assert!(doc.body().is_some());
    }

    #[test]
    fn fragments_append_under_parent() {
        let mut doc = parse_document("<html><body><main></main></body></html>");
        let main = doc.select_first("main").unwrap().unwrap();
        let before = doc.mutation_seq();
        append_fragment(
            &mut doc,
            main,
            r#"<button class="hamburger">Menu</button>"#,
        );
        assert!(doc.mutation_seq() > before);
        let button = doc.select_first("main > .hamburger").unwrap();
        assert!(button.is_some());
    }
}
