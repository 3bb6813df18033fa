//! Nesting and duplicate resolution.
//!
//! Reduces located candidates to top-level containers only. A candidate is
//! dropped when its node was already accepted, or when any ancestor matches
//! any registered signature. The result is non-overlapping and keeps
//! document order.

use std::collections::HashSet;

use crate::dom::{self, Document, NodeId, Walk};
use crate::locator::{Candidate, Confidence};
use crate::options::{ContainerKind, Options};

/// A top-level, non-duplicate container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalSnippet {
    /// Arena identity of the container node.
    pub node: NodeId,
    /// Name of the signature that classified the container.
    pub snippet_type: String,
    /// Family of that signature.
    pub kind: ContainerKind,
    /// Position among canonical snippets, in document order.
    pub index: usize,
}

/// Reduce `candidates` to the canonical snippet sequence.
///
/// Weak candidates never become canonical. An ancestor walk that hits the
/// depth cap counts as "no container ancestor".
#[must_use]
pub fn resolve_nesting(
    doc: &Document,
    candidates: Vec<Candidate>,
    options: &Options,
) -> Vec<CanonicalSnippet> {
    let total = candidates.len();
    let mut accepted: HashSet<NodeId> = HashSet::with_capacity(total);
    let mut out = Vec::new();

    for candidate in candidates {
        if candidate.confidence != Confidence::Strong {
            tracing::trace!(node = ?candidate.node, snippet_type = %candidate.snippet_type, "weak candidate skipped");
            continue;
        }
        if accepted.contains(&candidate.node) {
            continue;
        }
        let Some(node) = dom::node_by_id(doc, candidate.node) else {
            continue;
        };

        let container_ancestor = dom::find_ancestor(&node, options.max_ancestor_depth, |ancestor| {
            dom::class_name(ancestor).is_some_and(|class| options.matches_any_signature(&class))
        });
        if let Walk::Found(ancestor) = container_ancestor {
            tracing::trace!(node = ?candidate.node, ancestor = ?ancestor.id, "nested candidate dropped");
            continue;
        }

        accepted.insert(candidate.node);
        out.push(CanonicalSnippet {
            node: candidate.node,
            snippet_type: candidate.snippet_type,
            kind: candidate.kind,
            index: out.len(),
        });
    }

    tracing::debug!(candidates = total, canonical = out.len(), "resolved nesting");
    out
}
