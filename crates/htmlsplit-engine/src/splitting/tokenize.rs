//! Flattens a parsed tree into a linear token stream.

use markup5ever_rcdom::{Handle, NodeData};

use super::types::{Tag, Token};

/// Work item for the explicit traversal stack.
enum Visit {
    Enter(Handle),
    Leave(String),
}

/// Produces the token stream for the children of `root` in document order.
///
/// Depth-first with an explicit work stack, so arbitrarily deep nesting
/// never risks overflowing the call stack. Entering an element emits
/// [`Token::Open`] and schedules its [`Token::Close`] after all children;
/// text nodes are emitted verbatim, whitespace-only nodes included.
/// Comments, doctypes and processing instructions produce no token.
pub fn tokenize(root: &Handle) -> Vec<Token> {
    let mut out = vec![];
    let mut work: Vec<Visit> = vec![];

    for child in root.children.borrow().iter().rev() {
        work.push(Visit::Enter(child.clone()));
    }

    while let Some(visit) = work.pop() {
        match visit {
            Visit::Enter(node) => match &node.data {
                NodeData::Element { name, attrs, .. } => {
                    let tag = Tag {
                        name: name.local.to_string(),
                        attrs: attrs
                            .borrow()
                            .iter()
                            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                            .collect(),
                    };
                    out.push(Token::Open(tag));
                    work.push(Visit::Leave(name.local.to_string()));
                    for child in node.children.borrow().iter().rev() {
                        work.push(Visit::Enter(child.clone()));
                    }
                }
                NodeData::Text { contents } => {
                    out.push(Token::Text(contents.borrow().to_string()));
                }
                _ => {}
            },
            Visit::Leave(name) => out.push(Token::Close(name)),
        }
    }

    tracing::debug!(tokens = out.len(), "tokenized document");
    out
}
