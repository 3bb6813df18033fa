//! # serp-offers
//!
//! Product-offer extraction from marketplace search-result pages.
//!
//! Result pages mix several snippet layouts, nest containers inside one
//! another, and sprinkle advertisements between organic offers. This crate
//! finds the top-level offer containers, drops the advertisements and reads a
//! normalized [`ExtractedRecord`] from each one.
//!
//! ## Quick Start
//!
//! ```rust
//! use serp_offers::extract;
//!
//! let html = r#"<html><body>
//!   <div class="EProductSnippet2">
//!     <div class="EProductSnippet2-Title">Наушники</div>
//!     <div class="EPrice EPrice_view_old"><span class="EPrice-Value">5 990</span></div>
//!     <div class="EPrice"><span class="EPrice-Value">4 490</span> ₽</div>
//!     <div class="LabelDiscount"><span class="Label-Content">−25%</span></div>
//!   </div>
//! </body></html>"#;
//!
//! let records = extract(html)?;
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].discount_percent, Some(25));
//! # Ok::<(), serp_offers::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! - **Locate**: every element whose class matches a registered container
//!   signature becomes a candidate, tagged with the highest-priority match
//! - **Resolve**: duplicates and candidates nested in another container are
//!   dropped
//! - **Filter**: advertisement containers are dropped
//! - **Extract**: each remaining container is read field by field through
//!   selector fallback chains, including the favicon sprite lookup
//!
//! Everything markup-specific lives in [`Options`] and can be loaded from
//! JSON.

mod error;
mod extract;
mod options;
mod patterns;
mod result;

/// Document tree adapter over `dom_query`.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Container location.
pub mod locator;

/// Nesting and duplicate resolution.
pub mod resolver;

/// Advertisement filtering.
pub mod ad_filter;

/// Per-field extraction.
pub mod extractor;

/// Favicon sprite decoding.
pub mod favicon;

// Public API - re-exports
pub use ad_filter::filter_ads;
pub use error::{Error, Result};
pub use extract::Engine;
pub use favicon::resolve_sprite;
pub use locator::{locate_candidates, Candidate, Confidence};
pub use options::{
    AdMarkers, ClassMarkers, ContainerKind, ContainerSignature, FaviconOptions, FieldSelectors, MatchMode,
    Options, VariantIndexPattern,
};
pub use resolver::{resolve_nesting, CanonicalSnippet};
pub use result::{
    Currency, ExtractedRecord, FaviconResolution, FintechBadge, FintechCompactness, FintechKind, PriceBarometer,
};

/// Extracts offer records from an HTML page using default options.
///
/// # Example
///
/// ```rust
/// use serp_offers::extract;
///
/// let records = extract("<html><body><p>no offers here</p></body></html>")?;
/// assert!(records.is_empty());
/// # Ok::<(), serp_offers::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract(html: &str) -> Result<Vec<ExtractedRecord>> {
    extract_with_options(html, &Options::default())
}

/// Extracts offer records from an HTML page with custom options.
///
/// The options are validated first; see [`Engine::new`].
///
/// # Example
///
/// ```rust
/// use serp_offers::{extract_with_options, ContainerKind, ContainerSignature, MatchMode, Options};
///
/// let options = Options {
///     signatures: vec![ContainerSignature::new("OfferCard", ContainerKind::Generic, MatchMode::ExactPrefix, 1)],
///     ..Options::default()
/// };
/// let html = r#"<div class="OfferCard"><h3 class="OrganicTitle">Чайник</h3></div>"#;
/// let records = extract_with_options(html, &options)?;
/// assert_eq!(records[0].snippet_type, "OfferCard");
/// # Ok::<(), serp_offers::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract_with_options(html: &str, options: &Options) -> Result<Vec<ExtractedRecord>> {
    let engine = Engine::new(options.clone())?;
    Ok(engine.extract_html(html))
}

/// Extracts offer records from raw page bytes, detecting the charset.
///
/// # Example
///
/// ```rust
/// use serp_offers::extract_bytes;
///
/// // "Чайник" in windows-1251
/// let page = b"<meta charset=\"windows-1251\"><div class=\"EShopItem\"><div class=\"EShopItem-Title\">\xd7\xe0\xe9\xed\xe8\xea</div></div>";
/// let records = extract_bytes(page)?;
/// assert_eq!(records[0].title.as_deref(), Some("Чайник"));
/// # Ok::<(), serp_offers::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract_bytes(html: &[u8]) -> Result<Vec<ExtractedRecord>> {
    extract_bytes_with_options(html, &Options::default())
}

/// Extracts offer records from raw page bytes with custom options.
#[allow(clippy::missing_errors_doc)]
pub fn extract_bytes_with_options(html: &[u8], options: &Options) -> Result<Vec<ExtractedRecord>> {
    let html_str = encoding::transcode_to_utf8(html);
    extract_with_options(&html_str, options)
}
