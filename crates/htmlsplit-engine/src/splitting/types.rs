//! Core token types and their serialized forms.
//!
//! Budget accounting everywhere in the splitter counts Unicode scalar
//! values, never bytes, so multi-byte text cannot blow past a budget that
//! was checked in characters.

/// An element tag with its attributes in source order.
///
/// Attributes are an ordered list of key/value pairs rather than a map so
/// that re-serialization is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub attrs: Vec<(String, String)>,
}

impl Tag {
    /// Creates a tag with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: vec![],
        }
    }

    /// Serialized open tag: `<name key="value" ...>`.
    pub fn open_str(&self) -> String {
        let mut out = String::new();
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
        out.push('>');
        out
    }

    /// Serialized close tag: `</name>`.
    pub fn close_str(&self) -> String {
        close_str(&self.name)
    }
}

/// Serialized close tag for a bare name.
pub fn close_str(name: &str) -> String {
    format!("</{name}>")
}

/// One syntactic event of the flattened document, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Entering an element (pre-order).
    Open(Tag),
    /// Leaving an element (post-order), by name.
    Close(String),
    /// A text node, verbatim, whitespace-only nodes included.
    Text(String),
}

/// Reopening prefix for a fragment: every open block's open tag,
/// outermost first.
pub fn reopen_prefix(stack: &[Tag]) -> String {
    stack.iter().map(Tag::open_str).collect()
}

/// Closer suffix for a fragment: every open block's close tag, innermost
/// first, which is exactly what makes the in-progress buffer well-formed.
pub fn closer_suffix(stack: &[Tag]) -> String {
    stack.iter().rev().map(|tag| close_str(&tag.name)).collect()
}

/// Character count of the closer suffix, without building the string.
pub fn closer_suffix_len(stack: &[Tag]) -> usize {
    // "</" + name + ">"
    stack.iter().map(|tag| char_len(&tag.name) + 3).sum()
}

/// Length in Unicode scalar values.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
