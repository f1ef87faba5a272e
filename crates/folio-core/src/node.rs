//! In-memory XML element tree.
//!
//! An [`Element`] is either a leaf carrying text or a container of ordered
//! child elements. There are no attributes and no namespaces. Presence is
//! significant: a missing child means "never set", while a child with empty
//! text means "set to the empty string".

/// A named XML element with leaf text and ordered children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Creates a leaf element holding `text`.
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the leaf text (empty for containers).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub(crate) fn clear_text(&mut self) {
        self.text.clear();
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Returns `true` if the element has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Appends a child element.
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Appends a child element if one is given.
    pub fn push_opt(&mut self, child: Option<Element>) {
        if let Some(child) = child {
            self.children.push(child);
        }
    }

    /// Appends a leaf child.
    pub fn push_leaf(&mut self, name: &str, text: impl Into<String>) {
        self.children.push(Element::leaf(name, text));
    }

    /// Appends a leaf child only when a value is present.
    pub fn push_leaf_opt(&mut self, name: &str, text: Option<&str>) {
        if let Some(text) = text {
            self.push_leaf(name, text);
        }
    }

    /// Builder-style [`Element::push`].
    pub fn with(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    /// Builder-style [`Element::push_leaf`].
    pub fn with_leaf(mut self, name: &str, text: impl Into<String>) -> Self {
        self.push_leaf(name, text);
        self
    }

    /// Returns the first child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns the text of the first child with the given name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(Element::text)
    }

    /// Returns the names of the direct children, in order.
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }

    /// Returns a copy of this element under a different name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
