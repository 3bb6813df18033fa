//! Prices, currency and discount.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::{first_matching_selector, first_text, first_value};
use crate::dom::{self, NodeRef};
use crate::options::{ClassMarkers, Options};
use crate::patterns::{CURRENCY_RUB, DISCOUNT_VALUE, PRICE_AMOUNT};
use crate::result::Currency;

/// Prices read from one container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prices {
    /// First price not under an old-price group.
    pub current: Option<Decimal>,
    /// First price under an old-price group.
    pub old: Option<Decimal>,
    /// Currency of the current price.
    pub currency: Option<Currency>,
}

/// Read current and old price.
///
/// Each price-value element is classified by its nearest price-group
/// ancestor: a group whose class carries an old-price marker makes it the
/// old price, anything else a current-price candidate.
#[must_use]
pub fn extract_prices(node: &NodeRef, options: &Options) -> Prices {
    let markers = &options.markers;
    let mut prices = Prices::default();
    let mut current_el = None;

    for el in first_matching_selector(node, &options.fields.price_value) {
        let old = nearest_price_group(&el, markers, options.max_ancestor_depth)
            .is_some_and(|group| is_old_group(&group, markers));
        let Some(amount) = parse_amount(&dom::normalized_text(&el)) else {
            continue;
        };
        if old {
            prices.old.get_or_insert(amount);
        } else if prices.current.is_none() {
            prices.current = Some(amount);
            current_el = Some(el);
        }
        if prices.current.is_some() && prices.old.is_some() {
            break;
        }
    }

    if let Some(el) = current_el {
        prices.currency = first_text(node, &options.fields.currency)
            .as_deref()
            .and_then(detect_currency)
            .or_else(|| {
                let scope = nearest_price_group(&el, markers, options.max_ancestor_depth).unwrap_or(el);
                detect_currency(&dom::normalized_text(&scope))
            });
    }

    prices
}

fn nearest_price_group<'a>(el: &NodeRef<'a>, markers: &ClassMarkers, max_depth: usize) -> Option<NodeRef<'a>> {
    dom::find_ancestor(el, max_depth, |ancestor| {
        dom::class_name(ancestor).is_some_and(|class| {
            class.split_whitespace().any(|token| {
                markers
                    .price_group
                    .iter()
                    .any(|base| dom::is_block_token(token, base))
            })
        })
    })
    .found()
}

fn is_old_group(group: &NodeRef, markers: &ClassMarkers) -> bool {
    dom::class_name(group).is_some_and(|class| {
        markers
            .old_price
            .iter()
            .any(|marker| !marker.is_empty() && class.contains(marker.as_str()))
    })
}

/// Parse the first amount in `text`, e.g. `"12 990 ₽"` or `"1 299,50"`.
///
/// The last `,` or `.` is a decimal separator only when one or two digits
/// follow it to the end of the amount. Every other separator groups
/// thousands, so `"$1,299"` is 1299.
#[must_use]
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let raw = PRICE_AMOUNT.find(text)?.as_str();
    let (whole, fraction) = match raw.rfind([',', '.']) {
        Some(pos) if is_fraction(&raw[pos + 1..]) => (&raw[..pos], &raw[pos + 1..]),
        _ => (raw, ""),
    };
    let mut digits: String = whole.chars().filter(char::is_ascii_digit).collect();
    if !fraction.is_empty() {
        digits.push('.');
        digits.push_str(fraction);
    }
    Decimal::from_str(&digits).ok()
}

fn is_fraction(tail: &str) -> bool {
    (1..=2).contains(&tail.len()) && tail.chars().all(|c| c.is_ascii_digit())
}

/// Currency named by a sign or abbreviation in `text`.
#[must_use]
pub fn detect_currency(text: &str) -> Option<Currency> {
    if CURRENCY_RUB.is_match(text) {
        Some(Currency::Rub)
    } else if text.contains('$') || text.contains("USD") {
        Some(Currency::Usd)
    } else if text.contains('€') || text.contains("EUR") {
        Some(Currency::Eur)
    } else {
        None
    }
}

/// Discount percentage from the first label that carries one.
///
/// The label's content sub-element is preferred over the whole label text.
#[must_use]
pub fn extract_discount(node: &NodeRef, options: &Options) -> Option<u32> {
    let fields = &options.fields;
    first_value(node, &fields.discount_label, |label| {
        let text = first_text(label, &fields.discount_content).unwrap_or_else(|| dom::normalized_text(label));
        parse_discount(&text)
    })
}

/// Unsigned discount value from text such as `"−15%"` or `"-7"`.
#[must_use]
pub fn parse_discount(text: &str) -> Option<u32> {
    let caps = DISCOUNT_VALUE.captures(text)?;
    let raw = caps.get(1).or_else(|| caps.get(2))?.as_str();
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}
