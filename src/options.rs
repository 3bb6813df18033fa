//! Configuration options for snippet extraction.
//!
//! `Options` carries everything that is markup-version specific: the container
//! signature registry, the per-field selector fallback chains, class markers
//! and the favicon sprite service layout. The defaults describe the current
//! marketplace result-page family; callers can override any part, or load the
//! whole value from JSON with [`Options::from_json`].

use serde::{Deserialize, Serialize};

use crate::dom;
use crate::error::Result;

/// Container family a signature classifies a snippet as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// Organic result with offer info (price, shop).
    Organic,
    /// Product card.
    ProductSnippet,
    /// Marketplace shop row.
    ShopItem,
    /// Product tile in a grid.
    ProductTile,
    /// Shop offer inside a price comparison list.
    OfferItem,
    /// Any other registered container.
    #[default]
    Generic,
}

/// How a signature name is compared against a node's class list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// A class token equals the name or is a `name_modifier` of it.
    ExactPrefix,
    /// The class attribute contains the name anywhere.
    Substring,
}

/// A registered container-type signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSignature {
    /// Class name (or fragment) identifying the container.
    pub name: String,

    /// Family used by field extraction.
    #[serde(default)]
    pub kind: ContainerKind,

    /// Matching strictness.
    pub match_mode: MatchMode,

    /// Lower values are tried first. Ties keep registry order.
    pub priority: u32,
}

impl ContainerSignature {
    /// Create a signature.
    #[must_use]
    pub fn new(name: &str, kind: ContainerKind, match_mode: MatchMode, priority: u32) -> Self {
        Self {
            name: name.to_string(),
            kind,
            match_mode,
            priority,
        }
    }

    /// Match using the signature's declared mode.
    #[must_use]
    pub fn matches(&self, class_attr: &str) -> bool {
        match self.match_mode {
            MatchMode::ExactPrefix => class_attr
                .split_whitespace()
                .any(|token| dom::is_block_token(token, &self.name)),
            MatchMode::Substring => self.matches_substring(class_attr),
        }
    }

    /// Loose substring match, regardless of declared mode.
    #[must_use]
    pub fn matches_substring(&self, class_attr: &str) -> bool {
        class_attr.contains(self.name.as_str())
    }
}

/// Ordered CSS selector fallback chains, one per semantic field.
///
/// Each chain is tried in order; the first match yielding a non-empty value
/// wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSelectors {
    /// Title elements.
    pub title: Vec<String>,
    /// Price value elements (current and old).
    pub price_value: Vec<String>,
    /// Currency sign elements.
    pub currency: Vec<String>,
    /// Discount label elements.
    pub discount_label: Vec<String>,
    /// Inner content of a discount label.
    pub discount_content: Vec<String>,
    /// Shop name elements.
    pub shop_name: Vec<String>,
    /// Official-shop markers, searched inside the shop name element.
    pub official_shop: Vec<String>,
    /// Breadcrumb path elements (organic shop-name fallback).
    pub path: Vec<String>,
    /// Product rating labels.
    pub product_rating: Vec<String>,
    /// Shop rating elements.
    pub shop_rating: Vec<String>,
    /// Review-count elements.
    pub reviews: Vec<String>,
    /// Description text elements.
    pub description: Vec<String>,
    /// Breadcrumb links whose `href` names the result's host.
    pub host_link: Vec<String>,
    /// Breadcrumb elements whose text is the bare host.
    pub host_text: Vec<String>,
    /// Absolute links, the last source for the host.
    pub external_link: Vec<String>,
    /// "Sells goods" verification badges.
    pub verified: Vec<String>,
    /// Marketplace checkout labels.
    pub checkout: Vec<String>,
    /// Delivery group containers.
    pub delivery_group: Vec<String>,
    /// Delivery items, searched inside the group.
    pub delivery_item: Vec<String>,
    /// Product image elements.
    pub image: Vec<String>,
    /// Product link elements.
    pub product_link: Vec<String>,
    /// Fintech badge elements.
    pub fintech: Vec<String>,
    /// Price barometer elements.
    pub barometer: Vec<String>,
    /// Favicon elements.
    pub favicon: Vec<String>,
}

fn chain(selectors: &[&str]) -> Vec<String> {
    selectors.iter().map(|s| (*s).to_string()).collect()
}

impl Default for FieldSelectors {
    fn default() -> Self {
        Self {
            title: chain(&[
                ".OrganicTitle",
                "[class*=\"OrganicTitle\"]",
                ".EProductSnippet2-Title",
                "[class*=\"EProductSnippet2-Title\"]",
                ".EShopItem-Title",
                "[class*=\"EShopItem-Title\"]",
                ".EOfferItem-Title",
                ".ProductTile-Title",
            ]),
            price_value: chain(&[".EPrice-Value", "[class*=\"EPrice-Value\"]"]),
            currency: chain(&[".EPrice-Currency", "[class*=\"EPrice-Currency\"]"]),
            discount_label: chain(&[
                ".LabelDiscount",
                "[class*=\"LabelDiscount\"]:not([class*=\"withLabelDiscount\"])",
                ".Price-DiscountPercent",
                ".EProductSnippet2-Discount",
            ]),
            discount_content: chain(&[".Label-Content", "[class*=\"Label-Content\"]"]),
            shop_name: chain(&[
                ".EShopName",
                "[class*=\"EShopName\"]",
                ".EShopItem-ShopName",
                ".EOfferItem-ShopName",
                "[class*=\"ShopName\"]",
            ]),
            official_shop: chain(&[".OfficialShop", "[class*=\"OfficialShop\"]"]),
            path: chain(&[".Path", "[class*=\"Path\"]"]),
            product_rating: chain(&[
                ".ELabelRating .Label-Content",
                "[class*=\"ELabelRating\"] [class*=\"Label-Content\"]",
                ".ELabelRating",
                "[class*=\"ELabelRating\"]",
                "[class*=\"LabelRating\"]",
            ]),
            shop_rating: chain(&[
                ".RatingOneStar .Line-AddonContent",
                ".ShopInfo-Ugc",
                ".EReviewsLabel-Rating",
                ".Rating",
                "[class*=\"Rating\"]:not([class*=\"LabelRating\"])",
            ]),
            reviews: chain(&[
                ".EReviewsLabel",
                "[class*=\"Reviews\"]",
                "[class*=\"Review\"]",
                ".ShopInfo-Ugc",
            ]),
            description: chain(&[
                ".OrganicTextContentSpan",
                "[class*=\"OrganicTextContentSpan\"]",
                ".EProductSnippet2-Text",
                "[class*=\"EProductSnippet2-Text\"]",
            ]),
            host_link: chain(&[".Path-Item[href]", "[class*=\"Path-Item\"][href]", "a.path__item[href]"]),
            host_text: chain(&[".Path b", ".Path-Item b", ".path__item b"]),
            external_link: chain(&["a[href^=\"http\"]"]),
            verified: chain(&[".Verified_type_goods", ".Verified"]),
            checkout: chain(&[".EMarketCheckoutLabel", "[class*=\"EMarketCheckoutLabel\"]"]),
            delivery_group: chain(&[
                ".EDeliveryGroup",
                "[class*=\"EDeliveryGroup\"]:not([class*=\"EDeliveryGroup-Item\"])",
                ".EOfferItem-Deliveries",
            ]),
            delivery_item: chain(&[".EDeliveryGroup-Item", "[class*=\"EDeliveryGroup-Item\"]"]),
            image: chain(&[
                ".Organic-OfferThumbImage",
                "[class*=\"Organic-OfferThumbImage\"]",
                ".EProductSnippet2-Thumb img",
                "[class*=\"EProductSnippet2-Thumb\"] img",
                ".EThumb-Image",
                "img",
            ]),
            product_link: chain(&[
                ".EProductSnippet2-Overlay[href]",
                ".EShopItem-ButtonLink[href]",
                ".EShopItem-Title a[href]",
                ".OrganicTitle a[href]",
                ".Organic-Title a[href]",
                "a[href]",
                "[data-href]",
            ]),
            fintech: chain(&[".Fintech:not(.Fintech-Icon)", "[class*=\"EPriceGroup-Fintech\"]"]),
            barometer: chain(&[".EPriceBarometer", "[class*=\"EPriceBarometer\"]"]),
            favicon: chain(&[".Favicon", "[class*=\"Favicon\"]"]),
        }
    }
}

impl FieldSelectors {
    /// Every chain paired with its field name, for validation.
    #[must_use]
    pub fn chains(&self) -> [(&'static str, &[String]); 24] {
        [
            ("title", self.title.as_slice()),
            ("price_value", self.price_value.as_slice()),
            ("currency", self.currency.as_slice()),
            ("discount_label", self.discount_label.as_slice()),
            ("discount_content", self.discount_content.as_slice()),
            ("shop_name", self.shop_name.as_slice()),
            ("official_shop", self.official_shop.as_slice()),
            ("path", self.path.as_slice()),
            ("product_rating", self.product_rating.as_slice()),
            ("shop_rating", self.shop_rating.as_slice()),
            ("reviews", self.reviews.as_slice()),
            ("description", self.description.as_slice()),
            ("host_link", self.host_link.as_slice()),
            ("host_text", self.host_text.as_slice()),
            ("external_link", self.external_link.as_slice()),
            ("verified", self.verified.as_slice()),
            ("checkout", self.checkout.as_slice()),
            ("delivery_group", self.delivery_group.as_slice()),
            ("delivery_item", self.delivery_item.as_slice()),
            ("image", self.image.as_slice()),
            ("product_link", self.product_link.as_slice()),
            ("fintech", self.fintech.as_slice()),
            ("barometer", self.barometer.as_slice()),
            ("favicon", self.favicon.as_slice()),
        ]
    }
}

/// Class-name markers that modify how a matched element is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassMarkers {
    /// Block names of price-group containers (token or `_modifier` match).
    pub price_group: Vec<String>,
    /// Substrings marking a price group as old/historical.
    pub old_price: Vec<String>,
    /// Substrings marking an ancestor as visually hidden.
    pub hidden: Vec<String>,
    /// Suffix of icon-only fintech sub-elements.
    pub fintech_icon_suffix: String,
    /// Prefix of the fintech type modifier class.
    pub fintech_type_prefix: String,
    /// Prefix of the fintech view modifier class.
    pub fintech_view_prefix: String,
    /// Substrings identifying a below-market barometer.
    pub barometer_below: Vec<String>,
    /// Substrings identifying an in-market barometer.
    pub barometer_in: Vec<String>,
    /// Substrings identifying an above-market barometer.
    pub barometer_above: Vec<String>,
}

impl Default for ClassMarkers {
    fn default() -> Self {
        Self {
            price_group: chain(&["EPrice", "EPriceGroup-Price", "Price"]),
            old_price: chain(&["EPrice_view_old", "Price_old", "OldPrice"]),
            hidden: chain(&["A11yHidden"]),
            fintech_icon_suffix: "Icon".to_string(),
            fintech_type_prefix: "Fintech_type_".to_string(),
            fintech_view_prefix: "Fintech_view_".to_string(),
            barometer_below: chain(&["below-market", "EPriceBarometer-Cheap"]),
            barometer_in: chain(&["in-market", "EPriceBarometer-Average"]),
            barometer_above: chain(&["above-market", "EPriceBarometer-Expensive"]),
        }
    }
}

/// Markers used by the advertisement filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdMarkers {
    /// Substrings of the snippet's own class attribute that flag it.
    pub own_class: Vec<String>,
    /// Exact class tokens that flag the snippet when found on a descendant.
    pub descendant_class: Vec<String>,
    /// Promotional gallery card signature, matched on descendants.
    pub gallery_card: String,
    /// Substrings of an ancestor's class attribute that flag the snippet.
    pub gallery_ancestor: Vec<String>,
}

impl Default for AdMarkers {
    fn default() -> Self {
        Self {
            own_class: chain(&["_withAdvLabel", "_withPromoOffer", "AdvProductGalleryCard"]),
            descendant_class: chain(&[
                "Organic-Label_type_advertisement",
                "Organic-Subtitle_type_advertisement",
                "AdvLabel",
                "OrganicAdvLabel",
            ]),
            gallery_card: "AdvProductGalleryCard".to_string(),
            gallery_ancestor: chain(&["AdvProductGallery"]),
        }
    }
}

/// Pattern reading a sprite position from a favicon class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantIndexPattern {
    /// Regex whose capture group 1 holds the decimal number.
    pub pattern: String,

    /// Whether the captured number counts from 1, as in `Favicon-Entry1`.
    #[serde(default)]
    pub one_based: bool,
}

impl VariantIndexPattern {
    /// Pattern whose number is already a sprite position.
    #[must_use]
    pub fn zero_based(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            one_based: false,
        }
    }

    /// Pattern whose number counts icons from 1.
    #[must_use]
    pub fn one_based(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            one_based: true,
        }
    }
}

/// Favicon sprite service layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaviconOptions {
    /// Host and path preceding the semicolon-delimited address list.
    pub service_prefix: String,

    /// Patterns extracting the positional index from a favicon class.
    ///
    /// Tried in order. `_pos_N` is a 0-based position, `Favicon-EntryN` a
    /// 1-based one.
    pub variant_index_patterns: Vec<VariantIndexPattern>,

    /// Icon size used when building single-domain icon URLs.
    pub icon_size: u32,
}

impl Default for FaviconOptions {
    fn default() -> Self {
        Self {
            service_prefix: "favicon.yandex.net/favicon/v2/".to_string(),
            variant_index_patterns: vec![
                VariantIndexPattern::zero_based(r"_pos_(\d+)\b"),
                VariantIndexPattern::one_based(r"(?i)favicon[-_]entry[-_]?(\d+)\b"),
            ],
            icon_size: 32,
        }
    }
}

/// Configuration options for snippet extraction.
///
/// # Example
///
/// ```rust
/// use serp_offers::{ContainerKind, ContainerSignature, MatchMode, Options};
///
/// let options = Options {
///     signatures: vec![ContainerSignature::new(
///         "OfferCard",
///         ContainerKind::Generic,
///         MatchMode::ExactPrefix,
///         1,
///     )],
///     ..Options::default()
/// };
/// assert_eq!(options.max_ancestor_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Container signature registry.
    pub signatures: Vec<ContainerSignature>,

    /// Per-field selector fallback chains.
    pub fields: FieldSelectors,

    /// Class markers used while reading fields.
    pub markers: ClassMarkers,

    /// Advertisement markers.
    pub ads: AdMarkers,

    /// Favicon sprite layout.
    pub favicon: FaviconOptions,

    /// Host fragments of the result page itself. Links to these hosts never
    /// name the result's host.
    pub internal_hosts: Vec<String>,

    /// Maximum levels walked upward from a node.
    ///
    /// Default: `64`
    pub max_ancestor_depth: usize,

    /// Maximum levels walked downward from a root.
    ///
    /// Default: `512`
    pub max_tree_depth: usize,

    /// Worker threads for batch extraction over independent pages.
    ///
    /// Default: `1`
    pub parallel_workers: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            signatures: vec![
                ContainerSignature::new("EOfferItem", ContainerKind::OfferItem, MatchMode::ExactPrefix, 10),
                ContainerSignature::new(
                    "EProductSnippet2",
                    ContainerKind::ProductSnippet,
                    MatchMode::ExactPrefix,
                    20,
                ),
                ContainerSignature::new("EShopItem", ContainerKind::ShopItem, MatchMode::ExactPrefix, 30),
                ContainerSignature::new(
                    "ProductTile-Item",
                    ContainerKind::ProductTile,
                    MatchMode::ExactPrefix,
                    40,
                ),
                ContainerSignature::new(
                    "Organic_withOfferInfo",
                    ContainerKind::Organic,
                    MatchMode::Substring,
                    50,
                ),
            ],
            fields: FieldSelectors::default(),
            markers: ClassMarkers::default(),
            ads: AdMarkers::default(),
            favicon: FaviconOptions::default(),
            internal_hosts: chain(&["yandex", "yastatic"]),
            max_ancestor_depth: 64,
            max_tree_depth: 512,
            parallel_workers: 1,
        }
    }
}

impl Options {
    /// Load options from JSON. Missing sections fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`](crate::Error::ConfigParse) on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Signatures ordered by priority, registry order breaking ties.
    #[must_use]
    pub fn signatures_by_priority(&self) -> Vec<&ContainerSignature> {
        let mut ordered: Vec<_> = self.signatures.iter().collect();
        ordered.sort_by_key(|sig| sig.priority);
        ordered
    }

    /// Whether any registered signature matches `class_attr` in its declared mode.
    #[must_use]
    pub fn matches_any_signature(&self, class_attr: &str) -> bool {
        self.signatures.iter().any(|sig| sig.matches(class_attr))
    }
}
