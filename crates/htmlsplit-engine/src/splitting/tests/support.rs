//! Shared helpers for the splitting tests.

use regex::Regex;

use crate::splitting::{SplitError, TagClassifier, split_message, types::char_len};

/// Splits and collects all fragments, panicking on any error.
pub fn split_all(source: &str, max_len: usize) -> Vec<String> {
    split_message(source, max_len)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

/// Splits and returns the terminal error, panicking if the pass succeeds.
pub fn split_err(source: &str, max_len: usize) -> SplitError {
    match split_message(source, max_len) {
        Err(err) => err,
        Ok(fragments) => fragments
            .collect::<Result<Vec<_>, _>>()
            .expect_err("split unexpectedly succeeded"),
    }
}

/// Asserts the two core fragment properties: the character budget, and
/// independent well-formedness with respect to block tags.
pub fn assert_fragment_invariants(fragments: &[String], max_len: usize) {
    for fragment in fragments {
        assert!(
            char_len(fragment) <= max_len,
            "fragment over budget ({} > {max_len}): {fragment}",
            char_len(fragment)
        );
        assert_block_balanced(fragment);
    }
}

/// Asserts that every block tag opened in `fragment` is closed within it,
/// in properly nested order.
pub fn assert_block_balanced(fragment: &str) {
    let tag_re = Regex::new(r"</?([a-zA-Z][a-zA-Z0-9-]*)[^>]*>").unwrap();
    let classifier = TagClassifier;
    let mut stack: Vec<String> = vec![];

    for caps in tag_re.captures_iter(fragment) {
        let whole = caps.get(0).unwrap().as_str();
        let name = caps.get(1).unwrap().as_str();
        if !classifier.is_block(name) {
            continue;
        }
        if whole.starts_with("</") {
            assert_eq!(
                stack.pop().as_deref(),
                Some(name),
                "mismatched </{name}> in fragment: {fragment}"
            );
        } else {
            stack.push(name.to_string());
        }
    }

    assert!(
        stack.is_empty(),
        "unclosed block tags {stack:?} in fragment: {fragment}"
    );
}
