//! Favicon sprite resolution.
//!
//! Result pages draw shop icons from one composite sprite image whose URL
//! lists every domain on the page:
//!
//! ```text
//! //favicon.yandex.net/favicon/v2/a.com;b.com;c.com?size=32&stub=1
//! ```
//!
//! A snippet's favicon element picks its entry through a variant class such
//! as `Favicon-Page0_pos_3` (0-based) or `Favicon-Entry4` (1-based). Resolution decodes the address list and selects
//! the entry at that position. Every failure mode yields `None`.

use regex::Regex;

use crate::dom::{self, Document, NodeRef};
use crate::options::FaviconOptions;
use crate::patterns::{CSS_RULE, PX_VALUE, STYLE_BG_POSITION, STYLE_BG_SIZE, STYLE_IMAGE_URL};
use crate::result::FaviconResolution;

/// Resolve a sprite reference embedded in a style declaration.
///
/// Returns `None` when the style holds no image reference, the reference is
/// not behind the sprite service prefix, or the address list is empty. An
/// out-of-range `index` still yields the decoded list, with no resolved
/// domain. Without an index, a single-address list resolves to that address.
///
/// # Example
///
/// ```rust
/// use serp_offers::{favicon::resolve_sprite, FaviconOptions};
///
/// let style = "background-image:url(//favicon.yandex.net/favicon/v2/a.com;b.com;c.com?size=32)";
/// let res = resolve_sprite(style, Some(1), &FaviconOptions::default()).unwrap();
/// assert_eq!(res.resolved_domain.as_deref(), Some("b.com"));
///
/// let res = resolve_sprite(style, Some(5), &FaviconOptions::default()).unwrap();
/// assert_eq!(res.resolved_domain, None);
/// ```
#[must_use]
pub fn resolve_sprite(
    style: &str,
    index: Option<usize>,
    options: &FaviconOptions,
) -> Option<FaviconResolution> {
    let raw_url = image_url(style)?;
    decode_sprite_url(&raw_url, index, options)
}

/// Decode a sprite URL into its address list and select `index`.
#[must_use]
pub fn decode_sprite_url(
    raw_url: &str,
    index: Option<usize>,
    options: &FaviconOptions,
) -> Option<FaviconResolution> {
    let prefix = options.service_prefix.as_str();
    if prefix.is_empty() {
        return None;
    }
    let start = raw_url.find(prefix)? + prefix.len();
    let tail = &raw_url[start..];
    let path = tail.split(['?', '#']).next().unwrap_or_default();

    let address_list: Vec<String> = path
        .split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();
    if address_list.is_empty() {
        return None;
    }

    let requested = index.or((address_list.len() == 1).then_some(0));
    let resolved_index = requested.filter(|&i| i < address_list.len());
    let resolved_domain = resolved_index.map(|i| address_list[i].clone());

    if requested.is_some() && resolved_index.is_none() {
        tracing::debug!(?requested, len = address_list.len(), "sprite index out of range");
    }

    Some(FaviconResolution {
        raw_sprite_url: raw_url.to_string(),
        address_list,
        resolved_index,
        resolved_domain,
        service_prefix: prefix.to_string(),
        icon_size: options.icon_size,
    })
}

/// URL inside the first background/mask image reference of a declaration.
#[must_use]
pub fn image_url(style: &str) -> Option<String> {
    let caps = STYLE_IMAGE_URL.captures(style)?;
    let url = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?.as_str();
    let url = url
        .trim()
        .replace("&amp;", "&")
        .replace("&quot;", "")
        .replace("&#39;", "");
    (!url.is_empty()).then_some(url)
}

/// Compiled variant-class pattern.
#[derive(Debug, Clone)]
pub struct VariantMatcher {
    regex: Regex,
    one_based: bool,
}

impl VariantMatcher {
    /// Wrap a compiled pattern whose capture group 1 holds the number.
    #[must_use]
    pub fn new(regex: Regex, one_based: bool) -> Self {
        Self { regex, one_based }
    }

    /// 0-based sprite position named by `class_attr`.
    ///
    /// A 1-based `0` is read as the first position.
    #[must_use]
    pub fn index(&self, class_attr: &str) -> Option<usize> {
        let number: usize = self.regex.captures(class_attr)?.get(1)?.as_str().parse().ok()?;
        Some(if self.one_based {
            number.saturating_sub(1)
        } else {
            number
        })
    }
}

/// Positional index from a favicon variant class, first pattern wins.
#[must_use]
pub fn variant_index(class_attr: &str, patterns: &[VariantMatcher]) -> Option<usize> {
    patterns.iter().find_map(|matcher| matcher.index(class_attr))
}

/// Positional index from a vertical sprite offset and the icon stride.
///
/// `background-position: 0 -40px` with `background-size: 20px` is index 2.
/// A zero offset is index 0 even without a stride.
#[must_use]
pub fn position_index(style: &str) -> Option<usize> {
    let position = STYLE_BG_POSITION.captures(style)?.get(1)?.as_str();
    let offsets: Vec<f64> = PX_VALUE
        .captures_iter(position)
        .filter_map(|caps| caps[1].parse().ok())
        .collect();
    // The last pixel length is the vertical one for both `x y` and `-y` forms.
    let offset = offsets.last().map_or(0.0, |y: &f64| y.abs());
    if offset == 0.0 {
        return Some(0);
    }

    let size = STYLE_BG_SIZE.captures(style)?.get(1)?.as_str();
    let stride: f64 = PX_VALUE.captures(size)?[1].parse().ok()?;
    if stride <= 0.0 {
        return None;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = (offset / stride).round() as usize;
    Some(index)
}

/// Stylesheet rules that can supply a favicon sprite.
///
/// Built once per pass from the document's `<style>` elements; only rules
/// carrying an image reference or sprite geometry are kept.
#[derive(Debug, Clone, Default)]
pub struct SpriteStyleIndex {
    rules: Vec<(String, String)>,
}

impl SpriteStyleIndex {
    /// Collect candidate rules from every `<style>` element.
    #[must_use]
    pub fn build(doc: &Document) -> Self {
        let mut rules = Vec::new();
        for node in doc.select("style").nodes() {
            let css = dom::text_content(node);
            for caps in CSS_RULE.captures_iter(&css) {
                let body = caps[2].to_string();
                let lower = body.to_ascii_lowercase();
                if lower.contains("url(") || lower.contains("background-position") {
                    rules.push((caps[1].trim().to_string(), body));
                }
            }
        }
        tracing::debug!(rules = rules.len(), "indexed sprite style rules");
        Self { rules }
    }

    /// Number of indexed rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Declaration block of the image rule naming most of `classes`.
    ///
    /// Ties keep stylesheet order. Rules naming none of the classes never
    /// match.
    #[must_use]
    pub fn image_rule(&self, classes: &[&str]) -> Option<&str> {
        self.best_rule(classes, |body| image_url(body).is_some())
    }

    /// Declaration block of the positioning rule naming most of `classes`.
    #[must_use]
    pub fn position_rule(&self, classes: &[&str]) -> Option<&str> {
        self.best_rule(classes, |body| STYLE_BG_POSITION.is_match(body))
    }

    fn best_rule(&self, classes: &[&str], accept: impl Fn(&str) -> bool) -> Option<&str> {
        let mut best: Option<(usize, &str)> = None;
        for (selector, body) in &self.rules {
            let score = classes
                .iter()
                .filter(|class| selector_mentions_class(selector, class))
                .count();
            if score == 0 || !accept(body) {
                continue;
            }
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, body.as_str()));
            }
        }
        best.map(|(_, body)| body)
    }
}

/// Whether a selector list names `.class` as a whole class.
fn selector_mentions_class(selector: &str, class: &str) -> bool {
    let needle = format!(".{class}");
    selector.match_indices(&needle).any(|(pos, _)| {
        selector[pos + needle.len()..]
            .chars()
            .next()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '-' || c == '_'))
    })
}

/// Resolve the favicon of one snippet from its favicon elements.
///
/// Inline style wins over stylesheet rules. The index comes from the variant
/// class, then from sprite geometry.
pub(crate) fn resolve_snippet_favicon(
    candidates: &[NodeRef],
    styles: &SpriteStyleIndex,
    patterns: &[VariantMatcher],
    options: &FaviconOptions,
) -> Option<FaviconResolution> {
    for node in candidates {
        let class_attr = dom::class_name(node).unwrap_or_default();
        let inline = dom::get_attribute(node, "style").unwrap_or_default();
        let classes: Vec<&str> = class_attr.split_whitespace().collect();

        let index = variant_index(&class_attr, patterns)
            .or_else(|| position_index(&inline))
            .or_else(|| styles.position_rule(&classes).and_then(position_index));

        if let Some(res) = resolve_sprite(&inline, index, options) {
            return Some(res);
        }
        if let Some(res) = styles
            .image_rule(&classes)
            .and_then(|body| resolve_sprite(body, index, options))
        {
            return Some(res);
        }
    }
    None
}
