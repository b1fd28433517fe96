//! Path-based lookup over parsed response documents.
//!
//! Player responses are shallow trees with well-known tag names, so lookups
//! here walk by tag path instead of going through any general XPath
//! machinery. Text nodes never match a path segment; they are only reachable
//! through [`text`].

use xmltree::{Element, XMLNode};

/// Find the first element matching `path`, starting from `nodes`.
///
/// Each segment matches the first element at its level with that tag, and
/// the search then descends into that element's children with the remaining
/// segments. Returns `None` as soon as a segment has no match.
///
/// # Panics
/// Panics if `path` is empty.
pub fn first<'a>(path: &[&str], nodes: &'a [XMLNode]) -> Option<&'a Element> {
    assert!(!path.is_empty(), "query path must not be empty");
    let head = elements(nodes).find(|element| element.name == path[0])?;
    if path.len() == 1 {
        Some(head)
    } else {
        first(&path[1..], &head.children)
    }
}

/// Collect every element matching the final segment of `path`.
///
/// Intermediate segments descend the way [`first`] does, except that the
/// walk continues from the *last* element matching each segment. Siblings
/// are only collected at the final segment; matches under earlier siblings
/// of an intermediate segment are not visited.
pub fn all<'a>(path: &[&str], nodes: &'a [XMLNode]) -> Vec<&'a Element> {
    assert!(!path.is_empty(), "query path must not be empty");
    let matches: Vec<&Element> = elements(nodes)
        .filter(|element| element.name == path[0])
        .collect();
    if path.len() == 1 {
        return matches;
    }
    match matches.last() {
        Some(last) => all(&path[1..], &last.children),
        None => Vec::new(),
    }
}

/// Direct text content of an element: its first text child, if any.
pub fn text(element: &Element) -> Option<&str> {
    element.children.iter().find_map(|node| match node {
        XMLNode::Text(value) => Some(value.as_str()),
        _ => None,
    })
}

fn elements<'a>(nodes: &'a [XMLNode]) -> impl Iterator<Item = &'a Element> + 'a {
    nodes.iter().filter_map(|node| match node {
        XMLNode::Element(element) => Some(element),
        _ => None,
    })
}
