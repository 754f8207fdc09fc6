use std::collections::BTreeMap;

/// A node stored in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum DomNode {
    /// The tree root.
    Document,
    Element(ElementData),
    Text(String),
}

impl DomNode {
    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            DomNode::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match self {
            DomNode::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// Element payload: tag, attributes, inline style and form state.
///
/// The `class` and `style` attributes are not kept in `attrs`; they live in
/// `classes` and `style` so they can be edited without re-parsing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementData {
    /// Lowercase tag name.
    pub tag: String,
    attrs: Vec<(String, String)>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    /// Value typed into a form control; `None` means the control shows its default.
    pub(crate) dirty_value: Option<String>,
}

impl ElementData {
    pub fn new<I, K, V>(tag: &str, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut element = Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        };
        for (name, value) in attrs {
            element.set_attr(name.into(), value.into());
        }
        element
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match name.as_str() {
            "class" => {
                self.classes = value.split_whitespace().map(str::to_string).collect();
            }
            "style" => {
                self.style = parse_inline_style(&value);
            }
            _ => {
                if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| *k == name) {
                    slot.1 = value;
                } else {
                    self.attrs.push((name, value));
                }
            }
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self
            .attrs
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))?;
        Some(self.attrs.remove(idx).1)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn styles(&self) -> impl Iterator<Item = (&str, &str)> {
        self.style.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_style(&mut self, property: &str, value: impl Into<String>) {
        self.style.insert(property.to_string(), value.into());
    }

    pub fn remove_style(&mut self, property: &str) -> Option<String> {
        self.style.remove(property)
    }

    /// Whether this element takes part in form submission data.
    pub fn is_form_control(&self) -> bool {
        match self.tag.as_str() {
            "textarea" | "select" => true,
            "input" => !matches!(
                self.attr("type").map(str::to_ascii_lowercase).as_deref(),
                Some("submit" | "button" | "reset" | "image")
            ),
            _ => false,
        }
    }
}

fn parse_inline_style(source: &str) -> BTreeMap<String, String> {
    source
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim();
            let value = value.trim();
            if prop.is_empty() || value.is_empty() {
                None
            } else {
                Some((prop.to_ascii_lowercase(), value.to_string()))
            }
        })
        .collect()
}
