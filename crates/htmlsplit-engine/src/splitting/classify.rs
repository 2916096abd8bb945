//! Static tag policy consulted by the fragment builder.

/// Splitting behavior for a tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    /// Open/close events may be separated across fragment boundaries; the
    /// tag is tracked on the open-block stack and reopened as needed.
    Block,
    /// The whole subtree, open through matching close, must land inside a
    /// single fragment.
    Atomic,
}

/// Tags whose open/close events may be split across fragments.
const BLOCK_TAGS: &[&str] = &["p", "b", "strong", "i", "ul", "ol", "div", "span"];

/// Classifies tag names for the splitting phase.
///
/// Only the name is consulted, never the content.
pub struct TagClassifier;

impl TagClassifier {
    /// Classifies a tag name as [`TagClass::Block`] or [`TagClass::Atomic`].
    pub fn classify(&self, name: &str) -> TagClass {
        if BLOCK_TAGS.contains(&name) {
            TagClass::Block
        } else {
            TagClass::Atomic
        }
    }

    pub fn is_block(&self, name: &str) -> bool {
        self.classify(name) == TagClass::Block
    }
}
