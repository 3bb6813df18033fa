//! Fintech badge and price barometer.

use super::matches_in_chain;
use crate::dom::{self, NodeRef};
use crate::options::{ClassMarkers, Options};
use crate::result::{FintechBadge, FintechCompactness, FintechKind, PriceBarometer};

/// Read the payment-plan badge.
///
/// Icon-only sub-elements are skipped. The kind comes from the `type`
/// modifier class when present, otherwise from the badge text.
#[must_use]
pub fn extract_fintech(node: &NodeRef, options: &Options) -> Option<FintechBadge> {
    let markers = &options.markers;

    matches_in_chain(node, &options.fields.fintech)
        .into_iter()
        .find_map(|el| {
            let class = dom::class_name(&el).unwrap_or_default();
            let tokens: Vec<&str> = class.split_whitespace().collect();
            if is_icon(&tokens, markers) {
                return None;
            }

            let provider = modifier_value(&tokens, &markers.fintech_type_prefix);
            let view = modifier_value(&tokens, &markers.fintech_view_prefix);
            let kind = match provider {
                Some(value) => kind_from_provider(value),
                None => kind_from_text(&dom::normalized_text(&el)),
            };

            Some(FintechBadge {
                kind,
                compactness: view.map(compactness_from_view).unwrap_or_default(),
                provider: provider.map(str::to_string),
            })
        })
}

fn is_icon(tokens: &[&str], markers: &ClassMarkers) -> bool {
    let suffix = markers.fintech_icon_suffix.as_str();
    !suffix.is_empty()
        && tokens
            .iter()
            .any(|token| token.starts_with("Fintech") && token.ends_with(suffix))
}

fn modifier_value<'c>(tokens: &[&'c str], prefix: &str) -> Option<&'c str> {
    if prefix.is_empty() {
        return None;
    }
    tokens
        .iter()
        .find_map(|token| token.strip_prefix(prefix))
        .filter(|value| !value.is_empty())
}

fn kind_from_provider(provider: &str) -> FintechKind {
    let lower = provider.to_lowercase();
    if lower.contains("split") {
        FintechKind::Split
    } else if lower.contains("pay") {
        FintechKind::Pay
    } else {
        FintechKind::Unknown
    }
}

fn kind_from_text(text: &str) -> FintechKind {
    let lower = text.to_lowercase();
    if lower.contains("сплит") || lower.contains("split") {
        FintechKind::Split
    } else if lower.contains("пэй") || lower.contains("pay") {
        FintechKind::Pay
    } else {
        FintechKind::Unknown
    }
}

fn compactness_from_view(view: &str) -> FintechCompactness {
    let key: String = view
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect::<String>()
        .to_lowercase();
    match key.as_str() {
        "extrashort" => FintechCompactness::ExtraShort,
        "short" => FintechCompactness::Short,
        "long" => FintechCompactness::Long,
        "extralong" => FintechCompactness::ExtraLong,
        _ => FintechCompactness::Default,
    }
}

/// Read the market price comparison.
#[must_use]
pub fn extract_barometer(node: &NodeRef, options: &Options) -> Option<PriceBarometer> {
    let markers = &options.markers;
    let table = [
        (&markers.barometer_below, PriceBarometer::BelowMarket),
        (&markers.barometer_in, PriceBarometer::InMarket),
        (&markers.barometer_above, PriceBarometer::AboveMarket),
    ];

    matches_in_chain(node, &options.fields.barometer)
        .iter()
        .find_map(|el| {
            let class = dom::class_name(el)?;
            table.iter().find_map(|(needles, value)| {
                needles
                    .iter()
                    .any(|needle| !needle.is_empty() && class.contains(needle.as_str()))
                    .then_some(*value)
            })
        })
}
