//! The fragmenting state machine.
//!
//! [`FragmentBuilder`] consumes the token stream left to right and lazily
//! yields fragments. The budget test for every unit counts the buffer, the
//! unit itself, and the closers that would be needed to finish the fragment
//! right now; a failing unit first forces a flush (emitting the buffered
//! fragment and reseeding the buffer with the reopening prefix for the
//! current stack) and is then retried once against the fresh buffer before
//! the failure becomes fatal.
//!
//! ## Key invariants
//!
//! - The closer suffix of the open-block stack, innermost first, is always
//!   exactly the string that makes the in-progress buffer well-formed.
//! - A flush never touches the stack; only block `Open`/`Close` tokens do.
//! - Atomic subtrees are appended as one unit and never appear on the stack,
//!   so no fragment boundary can fall inside them.

use super::SplitError;
use super::classify::TagClassifier;
use super::types::{
    Tag, Token, char_len, close_str, closer_suffix, closer_suffix_len, reopen_prefix,
};

/// Outcome of attempting the current unit against the buffer.
enum Step {
    /// Unit fully applied; the position has advanced past it.
    Consumed,
    /// The budget forced a flush. The finished fragment must be yielded and
    /// the same unit retried against the reseeded buffer.
    Flushed(String),
    Failed(SplitError),
}

/// Lazily yields fragments of at most `max_len` characters.
///
/// Items are `Result`: a fatal error can follow any number of successful
/// fragments, after which the iterator fuses. Fragments already yielded
/// remain valid, but the overall result is incomplete.
pub struct FragmentBuilder {
    tokens: Vec<Token>,
    pos: usize,
    max_len: usize,
    classifier: TagClassifier,
    buffer: String,
    open_blocks: Vec<Tag>,
    /// Unconsumed tail of the text token currently being chunked.
    text_rem: Option<String>,
    /// Set while the current unit has already forced one flush; a second
    /// failure for the same unit is fatal.
    retried: bool,
    done: bool,
}

impl FragmentBuilder {
    pub(crate) fn new(tokens: Vec<Token>, max_len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            max_len,
            classifier: TagClassifier,
            buffer: String::new(),
            open_blocks: vec![],
            text_rem: None,
            retried: false,
            done: false,
        }
    }

    /// Budget test: buffer + unit + the closers that would be needed if the
    /// fragment were finished right now.
    fn fits(&self, unit_len: usize) -> bool {
        char_len(&self.buffer) + unit_len + closer_suffix_len(&self.open_blocks) <= self.max_len
    }

    /// Finishes the in-progress fragment and reseeds the buffer with the
    /// reopening prefix for the current stack. The stack itself is
    /// untouched, which is what keeps every emitted fragment independently
    /// well-formed.
    fn flush(&mut self) -> String {
        let fragment = format!("{}{}", self.buffer, closer_suffix(&self.open_blocks));
        tracing::debug!(
            len = char_len(&fragment),
            reopened = self.open_blocks.len(),
            "flushing fragment"
        );
        self.buffer = reopen_prefix(&self.open_blocks);
        self.retried = true;
        fragment
    }

    fn cannot_fit(&self, unit: String) -> SplitError {
        SplitError::NotEnoughFragmentLen {
            fragment: self.buffer.clone(),
            unit,
            max_len: self.max_len,
        }
    }

    fn step(&mut self) -> Step {
        // Mid-text resumption after a flush; the token itself was already
        // partially consumed.
        if let Some(remaining) = self.text_rem.take() {
            return self.text(remaining);
        }

        match self.tokens[self.pos].clone() {
            Token::Open(tag) => {
                if self.classifier.is_block(&tag.name) {
                    self.open_block(tag)
                } else {
                    self.atomic_unit(tag)
                }
            }
            Token::Close(name) => self.close_block(name),
            Token::Text(text) => self.text(text),
        }
    }

    fn open_block(&mut self, tag: Tag) -> Step {
        let open = tag.open_str();
        if !self.fits(char_len(&open)) {
            if self.retried {
                return Step::Failed(self.cannot_fit(open));
            }
            if self.buffer.is_empty() {
                return Step::Failed(SplitError::NotEnoughFragmentLenForInitialization {
                    max_len: self.max_len,
                });
            }
            return Step::Flushed(self.flush());
        }

        self.buffer.push_str(&open);
        self.open_blocks.push(tag);
        self.retried = false;
        self.pos += 1;
        Step::Consumed
    }

    /// Serializes the whole subtree of an atomic tag, open through matching
    /// close, and places it as one indivisible unit.
    fn atomic_unit(&mut self, tag: Tag) -> Step {
        let mut unit = tag.open_str();
        let mut depth = 1usize;
        let mut next = self.pos + 1;
        while next < self.tokens.len() && depth > 0 {
            match &self.tokens[next] {
                Token::Open(inner) => {
                    unit.push_str(&inner.open_str());
                    depth += 1;
                }
                Token::Close(name) => {
                    unit.push_str(&close_str(name));
                    depth -= 1;
                }
                Token::Text(text) => unit.push_str(text),
            }
            next += 1;
        }
        if depth != 0 {
            return Step::Failed(SplitError::UnmatchedOpen(tag.name));
        }

        if !self.fits(char_len(&unit)) {
            // Unlike a single tag, an atomic unit is never guaranteed small,
            // so the empty-buffer case is the same failure as the post-flush
            // one.
            if self.buffer.is_empty() || self.retried {
                return Step::Failed(self.cannot_fit(unit));
            }
            return Step::Flushed(self.flush());
        }

        self.buffer.push_str(&unit);
        self.retried = false;
        self.pos = next;
        Step::Consumed
    }

    fn close_block(&mut self, name: String) -> Step {
        if !self.open_blocks.iter().any(|tag| tag.name == name) {
            return Step::Failed(SplitError::UnmatchedClose(name));
        }

        let close = close_str(&name);
        if !self.fits(char_len(&close)) {
            if self.retried {
                return Step::Failed(self.cannot_fit(close));
            }
            if self.buffer.is_empty() {
                return Step::Failed(SplitError::NotEnoughFragmentLenForInitialization {
                    max_len: self.max_len,
                });
            }
            return Step::Flushed(self.flush());
        }

        // Scan from the top of the stack for the first same-name entry.
        // Well-formed input always matches the top, but same-name nesting
        // must remove the innermost entry.
        if let Some(idx) = self.open_blocks.iter().rposition(|tag| tag.name == name) {
            self.buffer.push_str(&close);
            self.open_blocks.remove(idx);
        }
        self.retried = false;
        self.pos += 1;
        Step::Consumed
    }

    /// Consumes text incrementally, chunking at raw character positions
    /// whenever the remainder does not fit alongside the pending closers.
    fn text(&mut self, mut remaining: String) -> Step {
        while !remaining.is_empty() {
            if self.fits(char_len(&remaining)) {
                self.buffer.push_str(&remaining);
                self.retried = false;
                break;
            }

            let used = char_len(&self.buffer) + closer_suffix_len(&self.open_blocks);
            if used >= self.max_len {
                if !self.buffer.is_empty() && !self.retried {
                    self.text_rem = Some(remaining);
                    return Step::Flushed(self.flush());
                }
                return Step::Failed(SplitError::NotEnoughFragmentLenForInitialization {
                    max_len: self.max_len,
                });
            }

            let space_left = self.max_len - used;
            let cut = byte_index_of_char(&remaining, space_left);
            let rest = remaining.split_off(cut);
            self.buffer.push_str(&remaining);
            self.retried = false;
            remaining = rest;
        }

        self.pos += 1;
        Step::Consumed
    }
}

impl Iterator for FragmentBuilder {
    type Item = Result<String, SplitError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        while self.pos < self.tokens.len() {
            match self.step() {
                Step::Consumed => {}
                Step::Flushed(fragment) => return Some(Ok(fragment)),
                Step::Failed(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }

        // EOF flush: whatever is buffered, plus the closers still owed.
        // This last fragment carries no reopening requirement.
        self.done = true;
        if !self.buffer.is_empty() || !self.open_blocks.is_empty() {
            return Some(Ok(format!(
                "{}{}",
                self.buffer,
                closer_suffix(&self.open_blocks)
            )));
        }
        None
    }
}

impl std::iter::FusedIterator for FragmentBuilder {}

/// Byte index of the `n`-th character, or the string length if `n` is past
/// the end. Keeps chunk cuts on character boundaries.
fn byte_index_of_char(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}
