//! Field extraction.
//!
//! Turns one canonical container into an [`ExtractedRecord`]. Every field is
//! read through an ordered selector fallback chain from [`FieldSelectors`];
//! the first match yielding a non-empty value wins and an exhausted chain
//! leaves the field absent.
//!
//! # Module Structure
//!
//! - `price`: current/old price, currency and discount
//! - `shop`: shop name, official-shop flag and site host
//! - `rating`: product rating, shop rating and review count
//! - `badges`: fintech badge and price barometer
//! - `media`: image, product link and delivery options
//!
//! [`FieldSelectors`]: crate::FieldSelectors

pub mod badges;
pub mod media;
pub mod price;
pub mod rating;
pub mod shop;

use crate::dom::{self, NodeRef};
use crate::favicon::{self, SpriteStyleIndex, VariantMatcher};
use crate::options::Options;
use crate::resolver::CanonicalSnippet;
use crate::result::ExtractedRecord;

/// Read-only state shared by every snippet of one pass.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    /// Engine configuration.
    pub options: &'a Options,
    /// Compiled favicon variant-index patterns.
    pub variant_patterns: &'a [VariantMatcher],
    /// Sprite rules from the page's stylesheets.
    pub sprite_styles: &'a SpriteStyleIndex,
}

/// Build the record for one canonical container.
#[must_use]
pub fn extract_record(node: &NodeRef, snippet: &CanonicalSnippet, ctx: &FieldContext) -> ExtractedRecord {
    let options = ctx.options;
    let fields = &options.fields;

    let prices = price::extract_prices(node, options);
    let shop = shop::extract_shop(node, snippet.kind, options);
    let host = shop::extract_host(node, snippet.kind, shop.name.as_deref(), options);
    let product_rating = rating::extract_product_rating(node, options);
    let shop_rating = rating::extract_shop_rating(node, options);

    let favicon_nodes = matches_in_chain(node, &fields.favicon);
    let favicon = favicon::resolve_snippet_favicon(
        &favicon_nodes,
        ctx.sprite_styles,
        ctx.variant_patterns,
        &options.favicon,
    );

    let record = ExtractedRecord {
        index: snippet.index,
        snippet_type: snippet.snippet_type.clone(),
        kind: snippet.kind,
        title: first_text(node, &fields.title),
        current_price: prices.current,
        old_price: prices.old,
        currency: prices.currency,
        discount_percent: price::extract_discount(node, options),
        shop_name: shop.name,
        is_official_shop: shop.official,
        rating: product_rating.clone().or_else(|| shop_rating.clone()),
        product_rating,
        shop_rating,
        reviews_count: rating::extract_reviews_count(node, options),
        host,
        description: first_text(node, &fields.description),
        is_verified: has_match(node, &fields.verified),
        has_checkout: has_match(node, &fields.checkout),
        delivery_options: media::extract_delivery(node, options),
        image_url: media::extract_image(node, options),
        product_url: media::extract_product_url(node, options),
        fintech: badges::extract_fintech(node, options),
        price_barometer: badges::extract_barometer(node, options),
        favicon,
    };

    if record.title.is_none() {
        tracing::debug!(index = snippet.index, snippet_type = %snippet.snippet_type, "title chain exhausted");
    }
    if record.current_price.is_none() {
        tracing::debug!(index = snippet.index, snippet_type = %snippet.snippet_type, "price chain exhausted");
    }

    record
}

// === Fallback chains ===

/// First value produced by `read` over the chain's matches.
///
/// Selectors are tried in order; within a selector, matches are tried in
/// document order.
pub(crate) fn first_value<'a, T, F>(root: &NodeRef<'a>, chain: &[String], mut read: F) -> Option<T>
where
    F: FnMut(&NodeRef<'a>) -> Option<T>,
{
    chain
        .iter()
        .find_map(|selector| dom::query_all(root, selector).iter().find_map(&mut read))
}

/// First non-empty normalized text over the chain's matches.
pub(crate) fn first_text(root: &NodeRef, chain: &[String]) -> Option<String> {
    first_value(root, chain, |el| {
        let text = dom::normalized_text(el);
        (!text.is_empty()).then_some(text)
    })
}

/// Whether any selector in the chain matches.
pub(crate) fn has_match(root: &NodeRef, chain: &[String]) -> bool {
    chain.iter().any(|selector| !dom::query_all(root, selector).is_empty())
}

/// Matches of the first selector in the chain that matches anything.
pub(crate) fn first_matching_selector<'a>(root: &NodeRef<'a>, chain: &[String]) -> Vec<NodeRef<'a>> {
    chain
        .iter()
        .map(|selector| dom::query_all(root, selector))
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}

/// Every match of every selector, in chain order, without repeats.
pub(crate) fn matches_in_chain<'a>(root: &NodeRef<'a>, chain: &[String]) -> Vec<NodeRef<'a>> {
    let mut out: Vec<NodeRef<'a>> = Vec::new();
    for selector in chain {
        for el in dom::query_all(root, selector) {
            if !out.iter().any(|seen| seen.id == el.id) {
                out.push(el);
            }
        }
    }
    out
}
