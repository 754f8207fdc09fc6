use std::collections::HashMap;
use std::path::Path;

use ego_tree::{NodeId, NodeRef, Tree};
use tracing::trace;

use crate::error::DomError;
use crate::layout::{LayoutBox, Rect, Viewport};
use crate::node::{DomNode, ElementData};
use crate::selector::Selector;

/// Mutable document: node tree plus the browser-side state around it.
#[derive(Debug, Clone)]
pub struct Document {
    tree: Tree<DomNode>,
    layout: HashMap<NodeId, LayoutBox>,
    viewport: Viewport,
    focused: Option<NodeId>,
    fragment: Option<String>,
    mutation_seq: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document (root node only).
    pub fn new() -> Self {
        Self {
            tree: Tree::new(DomNode::Document),
            layout: HashMap::new(),
            viewport: Viewport::default(),
            focused: None,
            fragment: None,
            mutation_seq: 0,
        }
    }

    pub fn parse(html: &str) -> Self {
        crate::html::parse_document(html)
    }

    pub fn from_file(path: &Path) -> Result<Self, DomError> {
        let html = std::fs::read_to_string(path)?;
        Ok(Self::parse(&html))
    }

    pub fn root(&self) -> NodeId {
        self.tree.root().id()
    }

    pub fn body(&self) -> Option<NodeId> {
        self.tree
            .root()
            .descendants()
            .find(|n| matches!(n.value(), DomNode::Element(el) if el.tag == "body"))
            .map(|n| n.id())
    }

    fn node(&self, id: NodeId) -> Option<NodeRef<'_, DomNode>> {
        self.tree.get(id)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.node(id).and_then(|n| n.value().as_element())
    }

    fn with_element<R>(&mut self, id: NodeId, f: impl FnOnce(&mut ElementData) -> R) -> Option<R> {
        let mut node = self.tree.get_mut(id)?;
        node.value().as_element_mut().map(f)
    }

    /// Whether the node is still attached under the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let root = self.root();
        self.node(id).is_some_and(|n| {
            n.id() == root || n.ancestors().last().is_some_and(|top| top.id() == root)
        })
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?
            .ancestors()
            .find(|n| n.value().as_element().is_some())
            .map(|n| n.id())
    }

    /// Element children in document order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|n| {
                n.children()
                    .filter(|c| c.value().as_element().is_some())
                    .map(|c| c.id())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `ancestor` is `node` or contains it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor == node
            || self
                .node(node)
                .is_some_and(|n| n.ancestors().any(|a| a.id() == ancestor))
    }

    // ----- attributes, classes, styles -----

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        self.with_element(id, |el| el.set_attr(name, value));
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        self.with_element(id, |el| el.remove_attr(name));
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        self.with_element(id, |el| el.add_class(class));
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        self.with_element(id, |el| el.remove_class(class));
    }

    /// Toggle a class, or force it on/off; returns whether it is now present.
    pub fn toggle_class(&mut self, id: NodeId, class: &str, force: Option<bool>) -> bool {
        self.with_element(id, |el| {
            let on = force.unwrap_or(!el.has_class(class));
            if on {
                el.add_class(class);
            } else {
                el.remove_class(class);
            }
            on
        })
        .unwrap_or(false)
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id)?.style(property)
    }

    pub fn set_style(&mut self, id: NodeId, property: &str, value: impl Into<String>) {
        self.with_element(id, |el| el.set_style(property, value));
    }

    pub fn remove_style(&mut self, id: NodeId, property: &str) {
        self.with_element(id, |el| el.remove_style(property));
    }

    // ----- text and structure -----

    pub fn text_content(&self, id: NodeId) -> String {
        let Some(node) = self.node(id) else {
            return String::new();
        };
        node.descendants()
            .filter_map(|n| match n.value() {
                DomNode::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace all children with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        self.clear_children(id);
        if !text.is_empty() {
            self.append_text(id, text);
        }
    }

    pub fn clear_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self
            .node(id)
            .map(|n| n.children().map(|c| c.id()).collect())
            .unwrap_or_default();
        if children.is_empty() {
            return;
        }
        for child in children {
            if let Some(mut node) = self.tree.get_mut(child) {
                node.detach();
            }
        }
        self.bump();
    }

    pub fn append_element(&mut self, parent: NodeId, element: ElementData) -> Option<NodeId> {
        let id = self.tree.get_mut(parent)?.append(DomNode::Element(element)).id();
        self.bump();
        Some(id)
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Option<NodeId> {
        let id = self
            .tree
            .get_mut(parent)?
            .append(DomNode::Text(text.to_string()))
            .id();
        self.bump();
        Some(id)
    }

    /// Parse `html` as a fragment and append it under `parent`.
    pub fn append_html(&mut self, parent: NodeId, html: &str) {
        crate::html::append_fragment(self, parent, html);
    }

    /// Detach a node (and its subtree) from the document.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root() {
            return;
        }
        let detached = match self.tree.get_mut(id) {
            Some(mut node) => {
                node.detach();
                true
            }
            None => false,
        };
        if detached {
            self.bump();
        }
        if self.focused.is_some_and(|f| !self.is_connected(f)) {
            self.focused = None;
        }
    }

    /// Counter bumped on every structural change (child list edits).
    pub fn mutation_seq(&self) -> u64 {
        self.mutation_seq
    }

    fn bump(&mut self) {
        self.mutation_seq += 1;
        trace!(seq = self.mutation_seq, "document mutated");
    }

    // ----- queries -----

    /// All connected elements matching `selector`, in document order.
    pub fn select(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let selector = Selector::parse(selector)?;
        Ok(self.select_parsed(self.root(), &selector))
    }

    pub fn select_first(&self, selector: &str) -> Result<Option<NodeId>, DomError> {
        Ok(self.select(selector)?.into_iter().next())
    }

    /// Matching descendants of `scope` (the scope itself excluded).
    pub fn select_in(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .select_parsed(scope, &selector)
            .into_iter()
            .filter(|id| *id != scope)
            .collect())
    }

    pub fn select_parsed(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        let Some(scope) = self.node(scope) else {
            return Vec::new();
        };
        scope
            .descendants()
            .filter(|n| n.value().as_element().is_some())
            .map(|n| n.id())
            .filter(|id| selector.matches(self, *id))
            .collect()
    }

    pub fn matches(&self, id: NodeId, selector: &str) -> Result<bool, DomError> {
        Ok(Selector::parse(selector)?.matches(self, id))
    }

    /// Nearest inclusive ancestor matching `selector`.
    pub fn closest(&self, id: NodeId, selector: &str) -> Result<Option<NodeId>, DomError> {
        let selector = Selector::parse(selector)?;
        let mut current = self.element(id).map(|_| id);
        while let Some(node) = current {
            if selector.matches(self, node) {
                return Ok(Some(node));
            }
            current = self.parent_element(node);
        }
        Ok(None)
    }

    pub fn element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.tree
            .root()
            .descendants()
            .find(|n| n.value().as_element().and_then(ElementData::id) == Some(element_id))
            .map(|n| n.id())
    }

    // ----- geometry -----

    pub fn layout(&self, id: NodeId) -> LayoutBox {
        self.layout.get(&id).copied().unwrap_or_default()
    }

    pub fn set_layout(&mut self, id: NodeId, layout: LayoutBox) {
        self.layout.insert(id, layout);
    }

    /// Rendered height; zero for elements hidden with `display: none`.
    pub fn offset_height(&self, id: NodeId) -> f64 {
        if self.style(id, "display") == Some("none") {
            return 0.0;
        }
        self.layout(id).height
    }

    pub fn bounding_rect(&self, id: NodeId) -> Rect {
        self.viewport.rect_of(&self.layout(id))
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// URL fragment without the leading `#`.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn set_fragment(&mut self, fragment: Option<&str>) {
        self.fragment = fragment
            .map(|f| f.trim_start_matches('#'))
            .filter(|f| !f.is_empty())
            .map(str::to_string);
    }

    // ----- focus and forms -----

    pub fn focus(&mut self, id: NodeId) {
        if self.element(id).is_some() {
            self.focused = Some(id);
        }
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Current value of a form control.
    pub fn value(&self, id: NodeId) -> Option<String> {
        let el = self.element(id)?;
        if let Some(value) = &el.dirty_value {
            return Some(value.clone());
        }
        match el.tag.as_str() {
            "textarea" => Some(self.text_content(id)),
            "select" => self
                .select_in(id, "option")
                .ok()?
                .into_iter()
                .find(|opt| self.attr(*opt, "selected").is_some())
                .or_else(|| self.select_in(id, "option").ok()?.into_iter().next())
                .map(|opt| {
                    self.attr(opt, "value")
                        .map(str::to_string)
                        .unwrap_or_else(|| self.text_content(opt))
                }),
            _ => Some(el.attr("value").unwrap_or_default().to_string()),
        }
    }

    pub fn set_value(&mut self, id: NodeId, value: &str) {
        self.with_element(id, |el| el.dirty_value = Some(value.to_string()));
    }

    /// Named controls of a form, in document order.
    pub fn form_controls(&self, form: NodeId) -> Vec<NodeId> {
        let Some(node) = self.node(form) else {
            return Vec::new();
        };
        node.descendants()
            .filter(|n| {
                n.value()
                    .as_element()
                    .is_some_and(|el| el.is_form_control() && el.attr("name").is_some())
            })
            .map(|n| n.id())
            .collect()
    }

    /// `(name, value)` pairs the form would submit.
    pub fn form_values(&self, form: NodeId) -> Vec<(String, String)> {
        self.form_controls(form)
            .into_iter()
            .filter_map(|id| {
                let name = self.attr(id, "name")?.to_string();
                Some((name, self.value(id).unwrap_or_default()))
            })
            .collect()
    }

    /// Restore every control of the form to its default value.
    pub fn reset_form(&mut self, form: NodeId) {
        for id in self.form_controls(form) {
            self.with_element(id, |el| el.dirty_value = None);
        }
    }

    // ----- serialization -----

    /// Serialize a node and its subtree back to HTML.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(node) = self.node(id) {
            write_node(node, &mut out);
        }
        out
    }
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

fn write_node(node: NodeRef<'_, DomNode>, out: &mut String) {
    match node.value() {
        DomNode::Document => {
            for child in node.children() {
                write_node(child, out);
            }
        }
        DomNode::Text(text) => out.push_str(&escape(text, false)),
        DomNode::Element(el) => {
            out.push('<');
            out.push_str(&el.tag);
            let classes: Vec<&str> = el.classes().collect();
            if !classes.is_empty() {
                out.push_str(&format!(" class=\"{}\"", classes.join(" ")));
            }
            for (name, value) in el.attrs() {
                out.push_str(&format!(" {}=\"{}\"", name, escape(value, true)));
            }
            let style: Vec<String> = el.styles().map(|(k, v)| format!("{k}: {v}")).collect();
            if !style.is_empty() {
                out.push_str(&format!(" style=\"{}\"", escape(&style.join("; "), true)));
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&el.tag.as_str()) {
                return;
            }
            for child in node.children() {
                write_node(child, out);
            }
            out.push_str(&format!("</{}>", el.tag));
        }
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"<!DOCTYPE html><html><body>
        <header>Timeless</header>
        <form id="contactForm">
            <div class="field"><input name="nombre" type="text"><small class="error"></small></div>
            <div class="field"><input name="email" value="hola@timeless.mx"></div>
            <div class="field"><textarea name="mensaje">Hola</textarea></div>
            <button type="submit">Enviar</button>
        </form>
        <p id="year">2000</p>
    </body></html>"##;

    #[test]
    fn text_content_and_replacement() {
        let mut doc = Document::parse(PAGE);
        let year = doc.element_by_id("year").unwrap();
        assert_eq!(doc.text_content(year), "2000");
        let before = doc.mutation_seq();
        doc.set_text_content(year, "2026");
        assert_eq!(doc.text_content(year), "2026");
        assert!(doc.mutation_seq() > before);
    }

    #[test]
    fn form_values_follow_defaults_and_edits() {
        let mut doc = Document::parse(PAGE);
        let form = doc.element_by_id("contactForm").unwrap();
        let values = doc.form_values(form);
        assert_eq!(
            values,
            vec![
                ("nombre".to_string(), String::new()),
                ("email".to_string(), "hola@timeless.mx".to_string()),
                ("mensaje".to_string(), "Hola".to_string()),
            ]
        );

        let name = doc.select_first("[name=nombre]").unwrap().unwrap();
        doc.set_value(name, "Ana");
        assert_eq!(doc.value(name).as_deref(), Some("Ana"));
        doc.reset_form(form);
        assert_eq!(doc.value(name).as_deref(), Some(""));
    }

    #[test]
    fn closest_walks_inclusive_ancestors() {
        let doc = Document::parse(PAGE);
        let input = doc.select_first("[name=nombre]").unwrap().unwrap();
        let field = doc.closest(input, ".field").unwrap().unwrap();
        assert!(doc.has_class(field, "field"));
        let error = doc.select_in(field, ".error").unwrap();
        assert_eq!(error.len(), 1);
        assert_eq!(doc.closest(input, "input").unwrap(), Some(input));
    }

    #[test]
    fn removed_nodes_are_disconnected() {
        let mut doc = Document::parse(PAGE);
        let year = doc.element_by_id("year").unwrap();
        assert!(doc.is_connected(year));
        doc.remove(year);
        assert!(!doc.is_connected(year));
        assert!(doc.element_by_id("year").is_none());
        assert!(doc.select("#year").unwrap().is_empty());
    }

    #[test]
    fn hidden_elements_have_no_height() {
        let mut doc = Document::parse(PAGE);
        let header = doc.select_first("header").unwrap().unwrap();
        doc.set_layout(header, LayoutBox::new(0.0, 72.0));
        assert_eq!(doc.offset_height(header), 72.0);
        doc.set_style(header, "display", "none");
        assert_eq!(doc.offset_height(header), 0.0);
    }

    #[test]
    fn toggle_class_reports_state() {
        let mut doc = Document::parse(PAGE);
        let body = doc.body().unwrap();
        assert!(doc.toggle_class(body, "menu-open", None));
        assert!(!doc.toggle_class(body, "menu-open", None));
        assert!(!doc.toggle_class(body, "menu-open", Some(false)));
        assert!(doc.toggle_class(body, "menu-open", Some(true)));
    }

    #[test]
    fn fragment_strips_hash() {
        let mut doc = Document::new();
        doc.set_fragment(Some("#contacto"));
        assert_eq!(doc.fragment(), Some("contacto"));
        doc.set_fragment(Some("#"));
        assert_eq!(doc.fragment(), None);
    }
}
