//! # Message Splitting
//!
//! Splits an HTML message into an ordered sequence of fragments, each no
//! longer than a caller-supplied character budget, while keeping every
//! fragment independently well-formed with respect to block tags and never
//! splitting the content of an atomic tag.
//!
//! ## Pipeline
//!
//! 1. **Parse** (`dom`): the tolerant HTML parser turns raw text into a
//!    tree, auto-closing dangling tags.
//! 2. **Tokenize** (`tokenize`): the tree is flattened into a linear
//!    `Open`/`Close`/`Text` stream via iterative depth-first traversal.
//! 3. **Classify** (`classify`): tag names map to block or atomic behavior.
//! 4. **Build** (`builder`): the fragmenting state machine consumes the
//!    stream and lazily yields fragments.
//!
//! ## Key invariants
//!
//! - `chars(buffer) + chars(closer suffix) <= max_len` whenever a fragment
//!   is finalized.
//! - Every fragment after the first begins with the reopening prefix of the
//!   stack as it stood at the previous flush; the last fragment reopens
//!   nothing.
//! - Atomic subtrees appear contiguously within exactly one fragment.

pub mod builder;
pub mod classify;
pub mod tokenize;
pub mod types;


use crate::dom;

pub use builder::FragmentBuilder;
pub use classify::{TagClass, TagClassifier};
pub use types::{Tag, Token};

/// Errors raised by a splitting pass.
///
/// All of these are fatal: the pass aborts with no retry and no partial
/// recovery. Fragments yielded before the error remain valid, but the
/// overall result is incomplete.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    /// Input is empty or whitespace-only; detected before tokenization.
    #[error("source document is empty")]
    EmptySource,

    /// The budget cannot accommodate even a fresh, empty fragment's
    /// mandatory prefix and closers.
    #[error("not enough fragment length ({max_len}) to even start a fragment")]
    NotEnoughFragmentLenForInitialization { max_len: usize },

    /// A specific indivisible unit (an open tag, a close tag, or an entire
    /// atomic subtree) cannot fit even in a freshly flushed fragment.
    #[error("cannot add '{unit}' to fragment '{fragment}' with max length {max_len}")]
    NotEnoughFragmentLen {
        fragment: String,
        unit: String,
        max_len: usize,
    },

    /// An opened tag never sees its matching close before the stream ends;
    /// the upstream parser's well-formedness guarantee was violated.
    #[error("unclosed <{0}> tag in token stream")]
    UnmatchedOpen(String),

    /// A close tag arrived with no matching open tag on the stack.
    #[error("close tag </{0}> without a matching open tag")]
    UnmatchedClose(String),
}

/// Splits an HTML message into fragments of at most `max_len` characters.
///
/// Returns a lazy iterator: fragments become observable one at a time, in
/// order, and a fatal error can follow any number of successful fragments.
/// Empty or whitespace-only input is rejected before any parsing. Each call
/// owns fresh state, so independent inputs can be split concurrently.
///
/// `max_len` has no minimum: budgets too small to start a fragment are the
/// normal way to get [`SplitError::NotEnoughFragmentLenForInitialization`].
pub fn split_message(source: &str, max_len: usize) -> Result<FragmentBuilder, SplitError> {
    if source.trim().is_empty() {
        return Err(SplitError::EmptySource);
    }

    let body = dom::parse_body(source);
    let tokens = tokenize::tokenize(&body);
    tracing::debug!(tokens = tokens.len(), max_len, "starting split");
    Ok(FragmentBuilder::new(tokens, max_len))
}
