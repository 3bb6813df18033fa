//! Advertisement filtering.
//!
//! A canonical snippet is dropped when any of these holds:
//! - its own class attribute contains an advertisement marker substring
//! - a descendant carries an advertisement marker class token
//! - a descendant matches the promotional gallery card signature
//! - an ancestor is a promotional gallery

use crate::dom::{self, Document, NodeRef, Walk};
use crate::options::{AdMarkers, Options};
use crate::resolver::CanonicalSnippet;

/// Remove advertisement snippets, keeping order.
#[must_use]
pub fn filter_ads(
    doc: &Document,
    snippets: Vec<CanonicalSnippet>,
    options: &Options,
) -> Vec<CanonicalSnippet> {
    let before = snippets.len();
    let kept: Vec<CanonicalSnippet> = snippets
        .into_iter()
        .filter(|snippet| {
            dom::node_by_id(doc, snippet.node).is_some_and(|node| {
                let flagged = is_advertisement(&node, options);
                if flagged {
                    tracing::trace!(node = ?snippet.node, index = snippet.index, "advertisement dropped");
                }
                !flagged
            })
        })
        .collect();

    tracing::debug!(dropped = before - kept.len(), kept = kept.len(), "filtered advertisements");
    kept
}

/// Whether a container node is an advertisement.
#[must_use]
pub fn is_advertisement(node: &NodeRef, options: &Options) -> bool {
    let ads = &options.ads;
    own_class_flagged(node, ads)
        || descendant_flagged(node, ads, options.max_tree_depth)
        || inside_gallery(node, ads, options.max_ancestor_depth)
}

fn own_class_flagged(node: &NodeRef, ads: &AdMarkers) -> bool {
    dom::class_name(node).is_some_and(|class| {
        ads.own_class
            .iter()
            .any(|marker| !marker.is_empty() && class.contains(marker.as_str()))
    })
}

fn descendant_flagged(node: &NodeRef, ads: &AdMarkers, max_depth: usize) -> bool {
    dom::find_descendant(node, max_depth, |child| {
        let Some(class) = dom::class_name(child) else {
            return false;
        };
        let marker_token = class
            .split_whitespace()
            .any(|token| ads.descendant_class.iter().any(|marker| marker == token));
        let gallery_card = !ads.gallery_card.is_empty() && class.contains(ads.gallery_card.as_str());
        marker_token || gallery_card
    })
    .is_some()
}

fn inside_gallery(node: &NodeRef, ads: &AdMarkers, max_depth: usize) -> bool {
    if ads.gallery_ancestor.is_empty() {
        return false;
    }
    matches!(
        dom::find_ancestor(node, max_depth, |ancestor| {
            dom::class_name(ancestor).is_some_and(|class| {
                ads.gallery_ancestor
                    .iter()
                    .any(|marker| !marker.is_empty() && class.contains(marker.as_str()))
            })
        }),
        Walk::Found(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::locate_candidates;
    use crate::resolver::resolve_nesting;

    fn kept_ids(html: &str) -> Vec<String> {
        let doc = dom::parse(html);
        let options = Options::default();
        let snippets = resolve_nesting(&doc, locate_candidates(&doc, &options), &options);
        filter_ads(&doc, snippets, &options)
            .iter()
            .filter_map(|s| dom::node_by_id(&doc, s.node))
            .filter_map(|n| dom::get_attribute(&n, "id"))
            .collect()
    }

    #[test]
    fn test_own_class_marker() {
        let ids = kept_ids(
            r#"<div id="ad" class="Organic Organic_withOfferInfo Organic_withAdvLabel">x</div>
               <div id="ok" class="Organic Organic_withOfferInfo">y</div>"#,
        );
        assert_eq!(ids, vec!["ok"]);
    }

    #[test]
    fn test_descendant_marker_token() {
        let ids = kept_ids(
            r#"<div id="ad" class="EShopItem"><span class="Organic-Label Organic-Label_type_advertisement">Реклама</span></div>
               <div id="ok" class="EShopItem"><span class="Organic-Label">Label</span></div>"#,
        );
        assert_eq!(ids, vec!["ok"]);
    }

    #[test]
    fn test_marker_tokens_are_exact() {
        let ids = kept_ids(r#"<div id="ok" class="EShopItem"><span class="AdvLabelHint">x</span></div>"#);
        assert_eq!(ids, vec!["ok"]);
    }

    #[test]
    fn test_gallery_card_descendant() {
        let ids = kept_ids(
            r#"<div id="ad" class="EProductSnippet2"><div class="AdvProductGalleryCard-Inner">x</div></div>"#,
        );
        assert!(ids.is_empty());
    }

    #[test]
    fn test_inside_gallery_ancestor() {
        let ids = kept_ids(
            r#"<div class="AdvProductGallery"><div id="ad" class="EProductSnippet2">x</div></div>
               <div id="ok" class="EProductSnippet2">y</div>"#,
        );
        assert_eq!(ids, vec!["ok"]);
    }
}
