//! HTML parsing front end.
//!
//! Thin wrapper over html5ever's built-in RcDom. The parser owns all
//! tolerance policy: malformed input is repaired and dangling tags are
//! auto-closed before the splitter ever sees the tree.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parses an HTML string and returns the `<body>` element whose children
/// are the content to split.
///
/// html5ever always produces the `html > head + body` document skeleton;
/// content it hoists out of `<body>` (e.g. `<title>`) is not part of the
/// split surface. Falls back to the document root if the skeleton is
/// missing.
pub fn parse_body(source: &str) -> Handle {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut source.as_bytes())
        .expect("reading from an in-memory buffer cannot fail");

    tracing::debug!("parsed {} bytes of HTML", source.len());
    body_of(&dom)
}

fn body_of(dom: &RcDom) -> Handle {
    if let Some(html) = child_element(&dom.document, "html") {
        if let Some(body) = child_element(&html, "body") {
            return body;
        }
    }
    dom.document.clone()
}

fn child_element(node: &Handle, name: &str) -> Option<Handle> {
    node.children
        .borrow()
        .iter()
        .find(|child| element_name(child).as_deref() == Some(name))
        .cloned()
}

fn element_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}
