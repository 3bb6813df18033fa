//! Result types for extraction output.
//!
//! One [`ExtractedRecord`] is produced per canonical, non-advertisement
//! snippet. Records own their data and are immutable once built.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::options::ContainerKind;

/// Normalized product-offer record extracted from one snippet container.
///
/// All fields except the booleans and the delivery list are optional: a field
/// whose fallback chain is exhausted is simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedRecord {
    /// Position of the snippet among canonical snippets, in document order.
    pub index: usize,

    /// Registry name of the container signature that classified the snippet.
    pub snippet_type: String,

    /// Container family the signature belongs to.
    pub kind: ContainerKind,

    /// Full title text.
    pub title: Option<String>,

    /// Current (non-historical) price.
    pub current_price: Option<Decimal>,

    /// Price found under the "old/historical" marker.
    pub old_price: Option<Decimal>,

    /// Currency of the current price.
    pub currency: Option<Currency>,

    /// Discount percentage, without sign.
    pub discount_percent: Option<u32>,

    /// Shop name with the official-shop marker text removed.
    pub shop_name: Option<String>,

    /// Whether the shop name carries an official-shop marker.
    pub is_official_shop: bool,

    /// Rating as displayed (e.g. `"4.8"`): the product rating when present,
    /// otherwise the shop rating.
    pub rating: Option<String>,

    /// Product rating label, within `0..=5`.
    pub product_rating: Option<String>,

    /// Shop rating.
    pub shop_rating: Option<String>,

    /// Number of reviews.
    pub reviews_count: Option<u32>,

    /// Host of the result's site, without `www.`.
    pub host: Option<String>,

    /// Snippet description text.
    pub description: Option<String>,

    /// Whether the site carries a "sells goods" verification badge.
    pub is_verified: bool,

    /// Whether the offer can be bought through the marketplace checkout.
    pub has_checkout: bool,

    /// Delivery option texts in document order.
    pub delivery_options: Vec<String>,

    /// Absolute product image URL.
    pub image_url: Option<String>,

    /// Absolute product link.
    pub product_url: Option<String>,

    /// Payment-plan badge.
    pub fintech: Option<FintechBadge>,

    /// Market price comparison indicator.
    pub price_barometer: Option<PriceBarometer>,

    /// Shop icon decoded from the favicon sprite.
    pub favicon: Option<FaviconResolution>,
}

/// Currency of a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// Russian rouble (`₽`, `руб.`).
    Rub,
    /// US dollar.
    Usd,
    /// Euro.
    Eur,
}

/// Payment-plan badge attached to a price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FintechBadge {
    /// Payment product family.
    pub kind: FintechKind,
    /// Visual compactness of the badge.
    pub compactness: FintechCompactness,
    /// Raw `type` modifier value when the markup carried one (e.g. `yandexPay`).
    pub provider: Option<String>,
}

/// Payment product family of a fintech badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FintechKind {
    /// Split / installment offer.
    Split,
    /// Pay / wallet offer.
    Pay,
    /// Badge present but not classifiable.
    Unknown,
}

/// Compactness variant of a fintech badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FintechCompactness {
    /// No view modifier.
    #[default]
    Default,
    /// `extra-short` view.
    ExtraShort,
    /// `short` view.
    Short,
    /// `long` view.
    Long,
    /// `extra-long` view.
    ExtraLong,
}

/// Qualitative market-price comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceBarometer {
    /// Cheaper than the market.
    BelowMarket,
    /// At market price.
    InMarket,
    /// More expensive than the market.
    AboveMarket,
}

/// Decoded favicon sprite reference.
///
/// `resolved_index`, when present, is always within `0..address_list.len()`
/// and `resolved_domain` is the address at that index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaviconResolution {
    /// Image URL from the style declaration, HTML entities decoded.
    pub raw_sprite_url: String,
    /// Domains encoded in the sprite, in sprite order.
    pub address_list: Vec<String>,
    /// Requested position, when it fell within the address list.
    pub resolved_index: Option<usize>,
    /// Domain at `resolved_index`.
    pub resolved_domain: Option<String>,
    /// Service prefix the addresses were found behind.
    #[serde(skip)]
    pub(crate) service_prefix: String,
    /// Icon size for single-icon URLs.
    #[serde(skip)]
    pub(crate) icon_size: u32,
}

impl FaviconResolution {
    /// Single-icon URL for the resolved domain.
    #[must_use]
    pub fn icon_url(&self) -> Option<String> {
        self.resolved_domain.as_ref().map(|domain| {
            format!(
                "https://{}{}?size={}",
                self.service_prefix, domain, self.icon_size
            )
        })
    }
}
