//! Image, product link and delivery options.

use super::{first_matching_selector, first_value};
use crate::dom::{self, NodeRef};
use crate::options::Options;

/// Product image URL.
///
/// Tries `src`, then `data-src`, then the first `srcset` candidate, on the
/// matched element or else on its first `img` descendant.
#[must_use]
pub fn extract_image(node: &NodeRef, options: &Options) -> Option<String> {
    first_value(node, &options.fields.image, |el| {
        image_source(el).or_else(|| {
            dom::query_all(el, "img")
                .first()
                .and_then(image_source)
        })
    })
}

fn image_source(el: &NodeRef) -> Option<String> {
    let src = dom::get_attribute(el, "src")
        .and_then(|v| normalize_url(&v))
        .or_else(|| dom::get_attribute(el, "data-src").and_then(|v| normalize_url(&v)));
    src.or_else(|| {
        let srcset = dom::get_attribute(el, "srcset")?;
        let first = srcset.split(',').next()?.split_whitespace().next()?;
        normalize_url(first)
    })
}

/// Product link from the first matched `href` or `data-href`.
#[must_use]
pub fn extract_product_url(node: &NodeRef, options: &Options) -> Option<String> {
    first_value(node, &options.fields.product_link, |el| {
        dom::get_attribute(el, "href")
            .and_then(|v| normalize_url(&v))
            .or_else(|| dom::get_attribute(el, "data-href").and_then(|v| normalize_url(&v)))
    })
}

/// Trimmed URL with protocol-relative references made `https:`.
///
/// Inline data, fragment-only and script links are rejected.
pub(crate) fn normalize_url(raw: &str) -> Option<String> {
    let url = raw.trim();
    let lower = url.to_ascii_lowercase();
    if url.is_empty() || url.starts_with('#') || lower.starts_with("data:") || lower.starts_with("javascript:") {
        return None;
    }
    if url.starts_with("//") {
        Some(format!("https:{url}"))
    } else {
        Some(url.to_string())
    }
}

/// Delivery option texts of the first delivery group, in document order.
///
/// Hidden items, items nested in another item and repeated texts are
/// skipped.
#[must_use]
pub fn extract_delivery(node: &NodeRef, options: &Options) -> Vec<String> {
    let fields = &options.fields;
    let Some(group) = first_matching_selector(node, &fields.delivery_group).first().copied() else {
        return Vec::new();
    };

    let mut accepted: Vec<NodeRef> = Vec::new();
    let mut texts: Vec<String> = Vec::new();

    for item in first_matching_selector(&group, &fields.delivery_item) {
        if accepted
            .iter()
            .any(|outer| dom::is_descendant_of(&item, outer, options.max_ancestor_depth))
        {
            continue;
        }
        if is_hidden_within(&item, &group, options) {
            continue;
        }
        accepted.push(item);

        let text = dom::normalized_text(&item);
        if !text.is_empty() && !texts.contains(&text) {
            texts.push(text);
        }
    }

    texts
}

/// Whether `item` or an ancestor below `group` carries a hidden marker.
fn is_hidden_within(item: &NodeRef, group: &NodeRef, options: &Options) -> bool {
    let hidden = |el: &NodeRef| {
        dom::class_name(el).is_some_and(|class| {
            options
                .markers
                .hidden
                .iter()
                .any(|marker| !marker.is_empty() && class.contains(marker.as_str()))
        })
    };
    if hidden(item) {
        return true;
    }

    let mut current = dom::parent_element(item);
    let mut depth = 0;
    while let Some(ancestor) = current {
        if ancestor.id == group.id {
            return false;
        }
        if depth >= options.max_ancestor_depth {
            tracing::warn!(node = ?item.id, max_depth = options.max_ancestor_depth, "hidden check hit depth cap");
            return false;
        }
        if hidden(&ancestor) {
            return true;
        }
        current = dom::parent_element(&ancestor);
        depth += 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_root<T>(html: &str, f: impl FnOnce(&NodeRef) -> T) -> T {
        let doc = dom::parse(html);
        let root = doc.select("#s").nodes()[0];
        f(&root)
    }

    #[test]
    fn test_image_fallbacks() {
        let cases = [
            (r#"<img class="EThumb-Image" src="//avatars.example.net/a.jpg">"#, "https://avatars.example.net/a.jpg"),
            (r#"<img class="EThumb-Image" data-src="https://cdn.example.net/b.jpg">"#, "https://cdn.example.net/b.jpg"),
            (
                r#"<img class="EThumb-Image" srcset="//cdn.example.net/c.jpg 1x, //cdn.example.net/c2.jpg 2x">"#,
                "https://cdn.example.net/c.jpg",
            ),
            (
                r#"<div class="Organic-OfferThumbImage"><img src="https://cdn.example.net/d.jpg"></div>"#,
                "https://cdn.example.net/d.jpg",
            ),
        ];
        for (markup, expected) in cases {
            let html = format!(r#"<div id="s">{markup}</div>"#);
            let got = with_root(&html, |root| extract_image(root, &Options::default()));
            assert_eq!(got.as_deref(), Some(expected), "{markup}");
        }
    }

    #[test]
    fn test_data_uri_image_skipped() {
        let got = with_root(
            r#"<div id="s"><img src="data:image/gif;base64,R0lGOD"><img src="https://cdn.example.net/real.jpg"></div>"#,
            |root| extract_image(root, &Options::default()),
        );
        assert_eq!(got.as_deref(), Some("https://cdn.example.net/real.jpg"));
    }

    #[test]
    fn test_product_url() {
        let got = with_root(
            r##"<div id="s"><a href="#">more</a><a class="EProductSnippet2-Overlay" href="//market.example.ru/p/1"></a></div>"##,
            |root| extract_product_url(root, &Options::default()),
        );
        assert_eq!(got.as_deref(), Some("https://market.example.ru/p/1"));
    }

    #[test]
    fn test_delivery_items() {
        let got = with_root(
            r#"<div id="s"><div class="EDeliveryGroup">
                 <span class="EDeliveryGroup-Item">Курьером, завтра</span>
                 <span class="A11yHidden"><span class="EDeliveryGroup-Item">скрыто</span></span>
                 <span class="EDeliveryGroup-Item">Самовывоз</span>
                 <span class="EDeliveryGroup-Item">Курьером, завтра</span>
                 <span class="EDeliveryGroup-Item"> </span>
               </div></div>"#,
            |root| extract_delivery(root, &Options::default()),
        );
        assert_eq!(got, vec!["Курьером, завтра", "Самовывоз"]);
    }

    #[test]
    fn test_no_delivery_group() {
        let got = with_root(r#"<div id="s"><span>Доставка</span></div>"#, |root| {
            extract_delivery(root, &Options::default())
        });
        assert!(got.is_empty());
    }
}
