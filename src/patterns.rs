//! Compiled regex patterns for field parsing.
//!
//! All patterns are compiled once at first use using `LazyLock`.
//! Patterns are organized by the field they parse.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Prices
// =============================================================================

/// A price amount: digits joined by single spaces (ordinary, no-break, thin),
/// commas or dots. Which separator is decimal is decided when parsing.
pub static PRICE_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d(?:[\s\u{00A0}\u{2009}\u{202F}.,]?\d)*").expect("PRICE_AMOUNT regex")
});

/// Rouble sign or abbreviation.
pub static CURRENCY_RUB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)₽|руб").expect("CURRENCY_RUB regex"));

// =============================================================================
// Discounts
// =============================================================================

/// Discount value preceded by a minus sign (hyphen-minus, U+2212 minus,
/// en dash, em dash), or followed by a percent sign.
///
/// Requiring one of the two keeps bare prices from parsing as discounts.
pub static DISCOUNT_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\u{2212}\u{002D}\u{2013}\u{2014}]\s*(\d[\d\s\u{00A0}\u{2009}]*)\s*%?|(\d[\d\s\u{00A0}\u{2009}]*)\s*%",
    )
    .expect("DISCOUNT_VALUE regex")
});

// =============================================================================
// Ratings
// =============================================================================

/// A rating such as `4.8` or `4,8`.
pub static RATING_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("RATING_VALUE regex"));

/// Review count before the word "отзыв"/"review", with an optional
/// thousands suffix (`1,2К отзывов`).
pub static REVIEWS_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,3}(?:[\s\u{00A0}\u{2009}]\d{3})+|\d+(?:[.,]\d+)?)\s*([кk])?\s*(?:отзыв|review)")
        .expect("REVIEWS_COUNT regex")
});

// =============================================================================
// Style declarations
// =============================================================================

/// URL inside an image-reference function of a background or mask declaration.
pub static STYLE_IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?:-webkit-)?(?:background|mask)(?:-image)?\s*:[^;{}]*?url\(\s*(?:"([^"]*)"|'([^']*)'|([^)]*?))\s*\)"#,
    )
    .expect("STYLE_IMAGE_URL regex")
});

/// `background-position` / `background-position-y` value.
pub static STYLE_BG_POSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)background-position(?:-y)?\s*:\s*([^;]+)").expect("STYLE_BG_POSITION regex")
});

/// `background-size` value.
pub static STYLE_BG_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)background-size\s*:\s*([^;]+)").expect("STYLE_BG_SIZE regex")
});

/// A signed pixel length.
pub static PX_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-?\d+(?:\.\d+)?)px").expect("PX_VALUE regex"));

/// One CSS rule: selector list and declaration block.
pub static CSS_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^{}]+)\{([^{}]*)\}").expect("CSS_RULE regex"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_amount_with_thin_space() {
        let m = PRICE_AMOUNT.find("от 12\u{2009}990 ₽").map(|m| m.as_str());
        assert_eq!(m, Some("12\u{2009}990"));
    }

    #[test]
    fn test_price_amount_keeps_group_commas() {
        let m = PRICE_AMOUNT.find("$1,299").map(|m| m.as_str());
        assert_eq!(m, Some("1,299"));
        let m = PRICE_AMOUNT.find("990, 1 490").map(|m| m.as_str());
        assert_eq!(m, Some("990"));
    }

    #[test]
    fn test_price_amount_with_fraction() {
        let m = PRICE_AMOUNT.find("$1 299,50").map(|m| m.as_str());
        assert_eq!(m, Some("1 299,50"));
    }

    #[test]
    fn test_discount_requires_sign_or_percent() {
        assert!(DISCOUNT_VALUE.is_match("−15%"));
        assert!(DISCOUNT_VALUE.is_match("-7"));
        assert!(DISCOUNT_VALUE.is_match("20 %"));
        assert!(!DISCOUNT_VALUE.is_match("12 990"));
    }

    #[test]
    fn test_reviews_count() {
        let caps = REVIEWS_COUNT.captures("4.8 · 1 200 отзывов").unwrap();
        assert_eq!(&caps[1], "1 200");
        let caps = REVIEWS_COUNT.captures("1,2К отзывов").unwrap();
        assert_eq!(&caps[1], "1,2");
        assert!(caps.get(2).is_some());
        assert!(REVIEWS_COUNT.captures("4.8").is_none());
    }

    #[test]
    fn test_style_image_url_variants() {
        let caps = STYLE_IMAGE_URL
            .captures("background-image: url(\"//x.net/a.png\")")
            .unwrap();
        assert_eq!(caps.get(1).map(|m| m.as_str()), Some("//x.net/a.png"));

        let caps = STYLE_IMAGE_URL.captures("mask-image:url(//x.net/b.png)").unwrap();
        assert_eq!(caps.get(3).map(|m| m.as_str()), Some("//x.net/b.png"));

        assert!(STYLE_IMAGE_URL.captures("color: red").is_none());
    }

    #[test]
    fn test_css_rule_split() {
        let caps = CSS_RULE.captures(".a.b{background-size:16px}").unwrap();
        assert_eq!(&caps[1], ".a.b");
        assert_eq!(&caps[2], "background-size:16px");
    }
}
