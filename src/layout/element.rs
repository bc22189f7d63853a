//! Minimal element tree produced by components and serialized to HTML.

use std::fmt::Write;

use serde::Serialize;

/// A rendered UI element: either escaped text or a tag with attributes and children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Text { text: String },
    Node { tag: &'static str, attrs: Vec<(&'static str, String)>, children: Vec<Element> },
}

impl Element {
    #[must_use]
    pub fn node(tag: &'static str) -> Self {
        Self::Node { tag, attrs: Vec::new(), children: Vec::new() }
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Add an attribute. No-op on text elements.
    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        if let Self::Node { attrs, .. } = &mut self {
            attrs.push((name, value.into()));
        }
        self
    }

    /// Append a child. No-op on text elements.
    #[must_use]
    pub fn child(mut self, child: Element) -> Self {
        if let Self::Node { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    #[must_use]
    pub fn children(mut self, items: impl IntoIterator<Item = Element>) -> Self {
        if let Self::Node { children, .. } = &mut self {
            children.extend(items);
        }
        self
    }

    /// Concatenated text content, depth first.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Serialize to HTML with text and attribute values escaped.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_html(self, &mut out);
        out
    }
}

fn collect_text(el: &Element, out: &mut String) {
    match el {
        Element::Text { text } => out.push_str(text),
        Element::Node { children, .. } => {
            for c in children {
                collect_text(c, out);
            }
        }
    }
}

pub(crate) fn write_open_tag(out: &mut String, tag: &str, attrs: &[(&'static str, String)]) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs {
        let _ = write!(out, " {name}=\"{}\"", html_escape::encode_double_quoted_attribute(value));
    }
    out.push('>');
}

pub(crate) fn write_html(el: &Element, out: &mut String) {
    match el {
        Element::Text { text } => out.push_str(&html_escape::encode_text(text)),
        Element::Node { tag, attrs, children } => {
            write_open_tag(out, tag, attrs);
            for c in children {
                write_html(c, out);
            }
            let _ = write!(out, "</{tag}>");
        }
    }
}

#[cfg(test)]
#[path = "element_test.rs"]
mod tests;
