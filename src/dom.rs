//! Document tree adapter
//!
//! Thin helpers over the `dom_query` crate. The parsed [`Document`] is the
//! read-only tree every stage borrows; [`NodeId`] (an index into the
//! document's node arena) is the identity used for deduplication.
//!
//! All walks here are iterative and depth-capped. Hitting a cap is the only
//! condition in the crate logged at `warn` level.

pub use dom_query::{Document, NodeId, NodeRef, Selection};

pub use tendril::StrTendril;

/// Outcome of a depth-capped search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk<T> {
    /// The predicate matched.
    Found(T),
    /// The walk ran out of nodes without a match.
    Exhausted,
    /// The walk stopped at the depth cap without a match.
    Truncated,
}

impl<T> Walk<T> {
    /// Matched value, if any.
    #[must_use]
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Exhausted | Self::Truncated => None,
        }
    }
}

/// Parse an HTML string into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

// === Attribute Operations ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(node: &NodeRef, name: &str) -> Option<String> {
    node.attr(name).map(|s| s.to_string())
}

/// Get the raw class attribute
#[inline]
#[must_use]
pub fn class_name(node: &NodeRef) -> Option<String> {
    get_attribute(node, "class")
}

/// Whether the class list contains exactly `token`
#[must_use]
pub fn has_class_token(node: &NodeRef, token: &str) -> bool {
    class_name(node).is_some_and(|class| class.split_whitespace().any(|t| t == token))
}

/// Whether the raw class attribute contains `needle` anywhere
#[must_use]
pub fn class_contains(node: &NodeRef, needle: &str) -> bool {
    class_name(node).is_some_and(|class| class.contains(needle))
}

/// Whether a class token equals `base` or is a BEM modifier of it (`base_mod`).
///
/// `EShopItem` and `EShopItem_view_big` match `EShopItem`;
/// the element class `EShopItem-Title` does not.
#[must_use]
pub fn is_block_token(token: &str, base: &str) -> bool {
    token
        .strip_prefix(base)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('_'))
}

// === Text Content ===

/// Get all text content of node and descendants
#[inline]
#[must_use]
pub fn text_content(node: &NodeRef) -> StrTendril {
    node.text()
}

/// Text content with whitespace runs collapsed to single spaces and trimmed.
#[must_use]
pub fn normalized_text(node: &NodeRef) -> String {
    normalize_whitespace(&text_content(node))
}

/// Normalized text of `root` with the subtrees rooted at `excluded` left out.
#[must_use]
pub fn text_without(root: &NodeRef, excluded: &[NodeId], max_depth: usize) -> String {
    let mut text = String::new();
    let mut stack: Vec<(NodeRef, usize)> = root
        .children()
        .into_iter()
        .rev()
        .map(|child| (child, 1))
        .collect();

    while let Some((node, depth)) = stack.pop() {
        if node.is_text() {
            text.push_str(&node.text());
            continue;
        }
        if !node.is_element() || excluded.contains(&node.id) {
            continue;
        }
        if depth > max_depth {
            tracing::warn!(root = ?root.id, max_depth, "text walk hit depth cap");
            continue;
        }
        // Element boundaries separate words.
        text.push(' ');
        stack.extend(node.children().into_iter().rev().map(|child| (child, depth + 1)));
    }

    normalize_whitespace(&text)
}

/// Collapse whitespace runs (including NBSP and thin spaces) and trim.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// === Tree Navigation ===

/// Node for an arena id.
#[inline]
#[must_use]
pub fn node_by_id(doc: &Document, id: NodeId) -> Option<NodeRef<'_>> {
    doc.tree.get(&id)
}

/// Parent element, skipping the document node.
#[must_use]
pub fn parent_element<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    node.parent().filter(NodeRef::is_element)
}

/// Walk ancestors nearest-first until `pred` matches, at most `max_depth` levels.
pub fn find_ancestor<'a, F>(node: &NodeRef<'a>, max_depth: usize, mut pred: F) -> Walk<NodeRef<'a>>
where
    F: FnMut(&NodeRef<'a>) -> bool,
{
    let mut current = parent_element(node);
    let mut depth = 0;

    while let Some(ancestor) = current {
        if depth >= max_depth {
            tracing::warn!(node = ?node.id, max_depth, "ancestor walk hit depth cap");
            return Walk::Truncated;
        }
        if pred(&ancestor) {
            return Walk::Found(ancestor);
        }
        current = parent_element(&ancestor);
        depth += 1;
    }

    Walk::Exhausted
}

/// Whether `node` sits strictly below `ancestor`.
#[must_use]
pub fn is_descendant_of(node: &NodeRef, ancestor: &NodeRef, max_depth: usize) -> bool {
    matches!(
        find_ancestor(node, max_depth, |a| a.id == ancestor.id),
        Walk::Found(_)
    )
}

/// Element descendants of `root` in pre-order, excluding `root` itself.
///
/// Subtrees deeper than `max_depth` below `root` are skipped with a warning.
#[must_use]
pub fn descendants<'a>(root: &NodeRef<'a>, max_depth: usize) -> Vec<NodeRef<'a>> {
    let mut out = Vec::new();
    let mut truncated = false;
    let mut stack: Vec<(NodeRef<'a>, usize)> = root
        .children()
        .into_iter()
        .rev()
        .map(|child| (child, 1))
        .collect();

    while let Some((node, depth)) = stack.pop() {
        if !node.is_element() {
            continue;
        }
        if depth > max_depth {
            truncated = true;
            continue;
        }
        out.push(node);
        stack.extend(node.children().into_iter().rev().map(|child| (child, depth + 1)));
    }

    if truncated {
        tracing::warn!(root = ?root.id, max_depth, "descendant walk hit depth cap");
    }

    out
}

/// Find the first element descendant matching `pred`, in pre-order.
pub fn find_descendant<'a, F>(root: &NodeRef<'a>, max_depth: usize, pred: F) -> Option<NodeRef<'a>>
where
    F: FnMut(&NodeRef<'a>) -> bool,
{
    descendants(root, max_depth).into_iter().find(pred)
}

// === Querying ===

/// All matches of `selector` below `node`, in document order.
#[must_use]
pub fn query_all<'a>(node: &NodeRef<'a>, selector: &str) -> Vec<NodeRef<'a>> {
    Selection::from(*node).select(selector).nodes().to_vec()
}
