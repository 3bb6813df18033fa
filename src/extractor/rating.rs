//! Product rating, shop rating and review count.

use super::first_value;
use crate::dom::{self, NodeRef};
use crate::options::Options;
use crate::patterns::{RATING_VALUE, REVIEWS_COUNT};

/// Product rating label value, e.g. `"4.8"`.
///
/// Labels with a percent sign or a leading minus are discounts, not ratings,
/// and values outside `0..=5` are rejected.
#[must_use]
pub fn extract_product_rating(node: &NodeRef, options: &Options) -> Option<String> {
    first_value(node, &options.fields.product_rating, |el| {
        parse_product_rating(&dom::normalized_text(el))
    })
}

/// Validated product rating from label text.
#[must_use]
pub fn parse_product_rating(text: &str) -> Option<String> {
    if text.contains('%') || text.starts_with(['\u{2212}', '-', '\u{2013}', '\u{2014}']) {
        return None;
    }
    let raw = RATING_VALUE.find(text)?.as_str();
    let value: f64 = raw.replace(',', ".").parse().ok()?;
    (0.0..=5.0).contains(&value).then(|| raw.to_string())
}

/// Shop rating as displayed, e.g. `"4,8"`.
#[must_use]
pub fn extract_shop_rating(node: &NodeRef, options: &Options) -> Option<String> {
    first_value(node, &options.fields.shop_rating, |el| {
        RATING_VALUE
            .find(&dom::normalized_text(el))
            .map(|m| m.as_str().to_string())
    })
}

/// Number of reviews from the first element that states one.
#[must_use]
pub fn extract_reviews_count(node: &NodeRef, options: &Options) -> Option<u32> {
    first_value(node, &options.fields.reviews, |el| {
        parse_reviews_count(&dom::normalized_text(el))
    })
}

/// Review count from text such as `"12 отзывов"` or `"1,2К отзывов"`.
#[must_use]
pub fn parse_reviews_count(text: &str) -> Option<u32> {
    let caps = REVIEWS_COUNT.captures(text)?;
    let number: String = caps[1]
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    let mut value: f64 = number.parse().ok()?;
    if caps.get(2).is_some() {
        value *= 1000.0;
    }
    if !(0.0..=f64::from(u32::MAX)).contains(&value) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = value.round() as u32;
    Some(count)
}
