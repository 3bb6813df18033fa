//! Container location.
//!
//! A single pre-order pass over the document tests every element's class
//! attribute against the signature registry in priority order. Each element
//! yields at most one [`Candidate`], tagged with the first signature that
//! matched it.

use crate::dom::{self, Document, NodeId};
use crate::options::{ContainerKind, ContainerSignature, MatchMode, Options};

/// How firmly a candidate matched its signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Confidence {
    /// Matched in the signature's declared mode.
    Strong,
    /// Loose substring match for an exact-prefix signature that had no strong
    /// match anywhere in the document. Diagnostic only.
    Weak,
}

/// A node matching a registered container signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Arena identity of the matched node.
    pub node: NodeId,
    /// Name of the matched signature.
    pub snippet_type: String,
    /// Family of the matched signature.
    pub kind: ContainerKind,
    /// Match strength.
    pub confidence: Confidence,
}

impl Candidate {
    fn new(node: NodeId, sig: &ContainerSignature, confidence: Confidence) -> Self {
        Self {
            node,
            snippet_type: sig.name.clone(),
            kind: sig.kind,
            confidence,
        }
    }
}

/// Every element matching a registered signature, in document order.
///
/// Strong matches are preferred per element; a weak candidate appears only
/// for exact-prefix signatures with zero strong matches document-wide.
#[must_use]
pub fn locate_candidates(doc: &Document, options: &Options) -> Vec<Candidate> {
    let signatures = options.signatures_by_priority();
    let root = doc.root();

    // (node, best strong signature, every weak signature in priority order)
    let mut hits: Vec<(NodeId, Option<usize>, Vec<usize>)> = Vec::new();
    let mut strong_seen = vec![false; signatures.len()];

    for node in dom::descendants(&root, options.max_tree_depth) {
        let Some(class_attr) = dom::class_name(&node) else {
            continue;
        };
        if class_attr.trim().is_empty() {
            continue;
        }

        let mut strong = None;
        let mut weak = Vec::new();
        for (i, sig) in signatures.iter().enumerate() {
            if sig.matches(&class_attr) {
                strong_seen[i] = true;
                if strong.is_none() {
                    strong = Some(i);
                }
            } else if sig.match_mode == MatchMode::ExactPrefix && sig.matches_substring(&class_attr) {
                weak.push(i);
            }
        }

        if strong.is_some() || !weak.is_empty() {
            hits.push((node.id, strong, weak));
        }
    }

    let candidates: Vec<Candidate> = hits
        .into_iter()
        .filter_map(|(node, strong, weak)| {
            if let Some(i) = strong {
                return Some(Candidate::new(node, signatures[i], Confidence::Strong));
            }
            // Eligibility is known only after the whole pass.
            weak.into_iter()
                .find(|&i| !strong_seen[i])
                .map(|i| Candidate::new(node, signatures[i], Confidence::Weak))
        })
        .collect();

    let weak = candidates
        .iter()
        .filter(|c| c.confidence == Confidence::Weak)
        .count();
    tracing::debug!(
        candidates = candidates.len(),
        weak,
        "located container candidates"
    );

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(candidates: &[Candidate]) -> Vec<(&str, Confidence)> {
        candidates
            .iter()
            .map(|c| (c.snippet_type.as_str(), c.confidence))
            .collect()
    }

    #[test]
    fn test_locates_in_document_order() {
        let doc = dom::parse(
            r#"<div class="EShopItem">a</div>
               <div class="Organic Organic_withOfferInfo">b</div>
               <div class="EProductSnippet2">c</div>"#,
        );
        let found = locate_candidates(&doc, &Options::default());
        assert_eq!(
            names(&found),
            vec![
                ("EShopItem", Confidence::Strong),
                ("Organic_withOfferInfo", Confidence::Strong),
                ("EProductSnippet2", Confidence::Strong),
            ]
        );
        assert_eq!(found[0].kind, ContainerKind::ShopItem);
    }

    #[test]
    fn test_one_candidate_per_node_highest_priority() {
        let doc = dom::parse(r#"<div class="EShopItem EProductSnippet2">x</div>"#);
        let found = locate_candidates(&doc, &Options::default());
        assert_eq!(names(&found), vec![("EProductSnippet2", Confidence::Strong)]);
    }

    #[test]
    fn test_element_classes_are_not_containers() {
        let doc = dom::parse(
            r#"<div class="EShopItem"><span class="EShopItem-Title">t</span></div>"#,
        );
        let found = locate_candidates(&doc, &Options::default());
        assert_eq!(names(&found), vec![("EShopItem", Confidence::Strong)]);
    }

    #[test]
    fn test_weak_matches_only_without_strong_ones() {
        let doc = dom::parse(r#"<div class="LegacyEShopItemCard">x</div>"#);
        let found = locate_candidates(&doc, &Options::default());
        assert_eq!(names(&found), vec![("EShopItem", Confidence::Weak)]);
    }

    #[test]
    fn test_weak_falls_through_to_eligible_signature() {
        // Both signatures match loosely; only EShopItem lacks a strong match.
        let doc = dom::parse(
            r#"<div class="EProductSnippet2">strong</div>
               <div class="LegacyEProductSnippet2EShopItemCard">x</div>"#,
        );
        let found = locate_candidates(&doc, &Options::default());
        assert_eq!(
            names(&found),
            vec![
                ("EProductSnippet2", Confidence::Strong),
                ("EShopItem", Confidence::Weak),
            ]
        );
    }

    #[test]
    fn test_no_classes_no_candidates() {
        let doc = dom::parse("<div><p>plain</p><span class=\"\">x</span></div>");
        assert!(locate_candidates(&doc, &Options::default()).is_empty());
    }
}
