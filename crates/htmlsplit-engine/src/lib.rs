pub mod dom;
pub mod splitting;

// Re-export key types for easier usage
pub use splitting::{split_message, FragmentBuilder, SplitError, Tag, TagClass, TagClassifier, Token};
