//! Extraction pipeline.
//!
//! An [`Engine`] holds validated, compiled configuration and runs the four
//! stages over a borrowed document:
//!
//! ```text
//! locate_candidates -> resolve_nesting -> filter_ads -> extract_record
//! ```
//!
//! A pass never mutates the document and never fails. One document is
//! always processed on one thread; [`Engine::extract_many`] spreads
//! independent pages over scoped worker threads.

use std::thread;

use regex::Regex;

use crate::ad_filter::filter_ads;
use crate::dom::{self, Document};
use crate::error::{Error, Result};
use crate::extractor::{self, FieldContext};
use crate::favicon::{SpriteStyleIndex, VariantMatcher};
use crate::locator::locate_candidates;
use crate::options::Options;
use crate::resolver::{resolve_nesting, CanonicalSnippet};
use crate::result::ExtractedRecord;

/// Validated extraction engine.
///
/// Construction checks every selector and pattern once; afterwards the
/// engine is immutable and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use serp_offers::{Engine, Options};
///
/// let engine = Engine::new(Options::default())?;
/// let records = engine.extract_html(r#"
///     <div class="EShopItem">
///       <div class="EShopItem-Title">Смартфон</div>
///       <div class="EPrice"><span class="EPrice-Value">12 990</span> ₽</div>
///     </div>"#);
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].title.as_deref(), Some("Смартфон"));
/// # Ok::<(), serp_offers::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    options: Options,
    variant_patterns: Vec<VariantMatcher>,
}

impl Engine {
    /// Validate `options` and build an engine.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`] for an empty registry, an unnamed
    ///   signature, an empty sprite prefix or a zero tree depth
    /// - [`Error::InvalidSelector`] for a selector that does not parse
    /// - [`Error::InvalidPattern`] for a variant pattern that does not compile
    pub fn new(options: Options) -> Result<Self> {
        if options.signatures.is_empty() {
            return Err(Error::InvalidConfig("signature registry is empty".into()));
        }
        if let Some(pos) = options.signatures.iter().position(|sig| sig.name.trim().is_empty()) {
            return Err(Error::InvalidConfig(format!("signature #{pos} has an empty name")));
        }
        if options.favicon.service_prefix.is_empty() {
            return Err(Error::InvalidConfig("favicon service prefix is empty".into()));
        }
        if options.max_tree_depth == 0 {
            return Err(Error::InvalidConfig("max_tree_depth must be positive".into()));
        }

        for (field, chain) in options.fields.chains() {
            for selector in chain {
                if dom_query::Matcher::new(selector).is_err() {
                    return Err(Error::InvalidSelector {
                        field,
                        selector: selector.clone(),
                    });
                }
            }
        }

        let variant_patterns = options
            .favicon
            .variant_index_patterns
            .iter()
            .map(|variant| {
                let pattern = &variant.pattern;
                let re = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
                if re.captures_len() < 2 {
                    return Err(Error::InvalidConfig(format!(
                        "variant pattern {pattern:?} has no capture group"
                    )));
                }
                Ok(VariantMatcher::new(re, variant.one_based))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            options,
            variant_patterns,
        })
    }

    /// Engine configuration.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Canonical, non-advertisement containers of `doc`, in document order.
    #[must_use]
    pub fn canonical_snippets(&self, doc: &Document) -> Vec<CanonicalSnippet> {
        let candidates = locate_candidates(doc, &self.options);
        let snippets = resolve_nesting(doc, candidates, &self.options);
        filter_ads(doc, snippets, &self.options)
    }

    /// One record per canonical, non-advertisement container, in document order.
    #[must_use]
    pub fn extract(&self, doc: &Document) -> Vec<ExtractedRecord> {
        let snippets = self.canonical_snippets(doc);
        let sprite_styles = SpriteStyleIndex::build(doc);
        let ctx = FieldContext {
            options: &self.options,
            variant_patterns: &self.variant_patterns,
            sprite_styles: &sprite_styles,
        };

        let records: Vec<ExtractedRecord> = snippets
            .iter()
            .filter_map(|snippet| {
                dom::node_by_id(doc, snippet.node).map(|node| extractor::extract_record(&node, snippet, &ctx))
            })
            .collect();

        tracing::debug!(records = records.len(), "extracted records");
        records
    }

    /// Parse `html` and extract its records.
    #[must_use]
    pub fn extract_html(&self, html: &str) -> Vec<ExtractedRecord> {
        let doc = dom::parse(html);
        self.extract(&doc)
    }

    /// Extract several independent pages.
    ///
    /// Pages are spread over `parallel_workers` scoped threads, each parsing
    /// its own documents. Output order equals input order.
    #[must_use]
    pub fn extract_many(&self, pages: &[&str]) -> Vec<Vec<ExtractedRecord>> {
        let workers = self.options.parallel_workers.clamp(1, pages.len().max(1));
        if workers == 1 {
            return pages.iter().map(|html| self.extract_html(html)).collect();
        }

        let chunk_size = pages.len().div_ceil(workers);
        tracing::debug!(pages = pages.len(), workers, "extracting pages in parallel");

        thread::scope(|scope| {
            let handles: Vec<_> = pages
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|html| self.extract_html(html))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ContainerKind, ContainerSignature, MatchMode, VariantIndexPattern};

    #[test]
    fn test_rejects_empty_registry() {
        let options = Options {
            signatures: Vec::new(),
            ..Options::default()
        };
        assert!(matches!(Engine::new(options), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_unnamed_signature() {
        let options = Options {
            signatures: vec![ContainerSignature::new(" ", ContainerKind::Generic, MatchMode::Substring, 1)],
            ..Options::default()
        };
        assert!(matches!(Engine::new(options), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_bad_selector() {
        let mut options = Options::default();
        options.fields.shop_rating.push("div[[".to_string());
        match Engine::new(options) {
            Err(Error::InvalidSelector { field, selector }) => {
                assert_eq!(field, "shop_rating");
                assert_eq!(selector, "div[[");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_pattern() {
        let mut options = Options::default();
        options.favicon.variant_index_patterns = vec![VariantIndexPattern::zero_based("_pos_(\\d+")];
        assert!(matches!(Engine::new(options), Err(Error::InvalidPattern { .. })));

        let mut options = Options::default();
        options.favicon.variant_index_patterns = vec![VariantIndexPattern::zero_based("_pos_\\d+")];
        assert!(matches!(Engine::new(options), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_extract_many_keeps_input_order() {
        let engine = Engine::new(Options {
            parallel_workers: 3,
            ..Options::default()
        })
        .unwrap();
        let pages: Vec<String> = (0..7)
            .map(|i| {
                format!(
                    r#"<div class="EShopItem"><div class="EShopItem-Title">Item {i}</div></div>"#
                )
            })
            .collect();
        let refs: Vec<&str> = pages.iter().map(String::as_str).collect();

        let results = engine.extract_many(&refs);
        assert_eq!(results.len(), 7);
        for (i, records) in results.iter().enumerate() {
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].title.as_deref(), Some(format!("Item {i}").as_str()));
        }
        assert!(engine.extract_many(&[]).is_empty());
    }
}
