//! In-memory HTML element trees.
//!
//! This module contains the [`Element`] builder used by every renderer in the
//! crate. A renderer returns a fresh subtree, and interactive behaviors are
//! expressed as "compose a new subtree, swap it in place of the old one", so
//! the whole pipeline stays testable without a live document.

/// A single node in the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Plain text, escaped on render.
    Text(String),
    /// A pre-rendered HTML fragment, emitted verbatim.
    Raw(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

/// Elements which never have a closing tag.
const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// An HTML element with classes, attributes and child nodes.
///
/// Construction is builder-style, mirroring how the renderers compose cards:
///
/// ```rust
/// use vitrine::html::Element;
///
/// let card = Element::new("div")
///     .class("thumb")
///     .child(Element::new("img").attr("src", "a.webp").attr("loading", "lazy"));
/// assert_eq!(card.render(), r#"<div class="thumb"><img src="a.webp" loading="lazy"></div>"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds one or more space-separated class names.
    pub fn class(mut self, class: impl AsRef<str>) -> Self {
        for name in class.as_ref().split_whitespace() {
            if !self.classes.iter().any(|c| c == name) {
                self.classes.push(name.to_string());
            }
        }
        self
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    /// Adds a boolean attribute, rendered without a value (`muted`, `loop`).
    pub fn flag(self, key: impl Into<String>) -> Self {
        self.attr(key, "")
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Adds the child if present, skipping `None` the way the original
    /// element factory skipped falsy children.
    pub fn maybe(mut self, child: Option<impl Into<Node>>) -> Self {
        if let Some(child) = child {
            self.children.push(child.into());
        }
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Adds an escaped text child.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Adds a verbatim HTML fragment child.
    pub fn raw(mut self, html: impl Into<String>) -> Self {
        self.children.push(Node::Raw(html.into()));
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Adds or removes a marker class.
    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            if !self.has_class(class) {
                self.classes.push(class.to_string());
            }
        } else {
            self.classes.retain(|c| c != class);
        }
    }

    /// Sets an attribute in place, replacing any previous value.
    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, old)) => *old = value.into(),
            None => self.attrs.push((key.to_string(), value.into())),
        }
    }

    /// Replaces all children with a single escaped text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    /// Replaces all children with a single verbatim HTML fragment.
    pub fn set_raw(&mut self, html: impl Into<String>) {
        self.children = vec![Node::Raw(html.into())];
    }

    /// Iterates over direct element children.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Finds the first element with the given class, depth-first, including
    /// the receiver itself.
    pub fn find_class(&self, class: &str) -> Option<&Element> {
        if self.has_class(class) {
            return Some(self);
        }
        for child in &self.children {
            if let Node::Element(el) = child {
                if let Some(found) = el.find_class(class) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Mutable counterpart of [`Element::find_class`].
    pub fn find_class_mut(&mut self, class: &str) -> Option<&mut Element> {
        if self.has_class(class) {
            return Some(self);
        }
        for child in &mut self.children {
            if let Node::Element(el) = child {
                if let Some(found) = el.find_class_mut(class) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Finds the first element with the given tag, depth-first, excluding
    /// the receiver.
    pub fn find_tag_mut(&mut self, tag: &str) -> Option<&mut Element> {
        for child in &mut self.children {
            if let Node::Element(el) = child {
                if el.tag == tag {
                    return Some(el);
                }
                if let Some(found) = el.find_tag_mut(tag) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Finds the element directly containing a child with the given class.
    fn parent_of_class_mut(&mut self, class: &str) -> Option<&mut Element> {
        let direct = self
            .children
            .iter()
            .any(|c| matches!(c, Node::Element(el) if el.has_class(class)));
        if direct {
            return Some(self);
        }
        for child in &mut self.children {
            if let Node::Element(el) = child {
                if let Some(found) = el.parent_of_class_mut(class) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn child_position(&self, class: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|c| matches!(c, Node::Element(el) if el.has_class(class)))
    }

    /// Swaps the first element with the given class for a fresh subtree.
    /// Returns `false` when no such element exists.
    pub fn replace_class(&mut self, class: &str, new: Element) -> bool {
        let Some(parent) = self.parent_of_class_mut(class) else {
            return false;
        };
        match parent.child_position(class) {
            Some(i) => {
                parent.children[i] = Node::Element(new);
                true
            }
            None => false,
        }
    }

    /// Inserts a fresh subtree right after the first element with the given
    /// class. Returns `false` when no such element exists.
    pub fn insert_after_class(&mut self, class: &str, new: Element) -> bool {
        let Some(parent) = self.parent_of_class_mut(class) else {
            return false;
        };
        match parent.child_position(class) {
            Some(i) => {
                parent.children.insert(i + 1, Node::Element(new));
                true
            }
            None => false,
        }
    }

    /// Removes the first element with the given class. Returns `false` when
    /// no such element exists.
    pub fn remove_class_node(&mut self, class: &str) -> bool {
        let Some(parent) = self.parent_of_class_mut(class) else {
            return false;
        };
        match parent.child_position(class) {
            Some(i) => {
                parent.children.remove(i);
                true
            }
            None => false,
        }
    }

    /// Renders the subtree to an HTML string.
    pub fn render(&self) -> String {
        let mut buffer = String::new();
        self.write(&mut buffer);
        buffer
    }

    fn write(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);

        if !self.classes.is_empty() {
            out.push_str(" class=\"");
            escape(&self.classes.join(" "), out);
            out.push('"');
        }

        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            if !value.is_empty() {
                out.push_str("=\"");
                escape(value, out);
                out.push('"');
            }
        }

        out.push('>');

        if VOID.contains(&self.tag) {
            return;
        }

        for child in &self.children {
            match child {
                Node::Element(el) => el.write(out),
                Node::Text(text) => escape(text, out),
                Node::Raw(html) => out.push_str(html),
            }
        }

        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

/// A single explanatory message shown in place of container content.
pub fn message(text: impl Into<String>) -> Element {
    Element::new("p").class("meta").text(text)
}

fn escape(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
