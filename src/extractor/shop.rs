//! Shop name, official-shop flag and site host.

use url::Url;

use super::{first_text, first_value, matches_in_chain};
use crate::dom::{self, NodeId, NodeRef};
use crate::options::{ContainerKind, Options};

/// Shop attribution of one container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopInfo {
    /// Shop name without the official-shop marker text.
    pub name: Option<String>,
    /// Whether an official-shop marker sits inside the shop name.
    pub official: bool,
}

/// Read the shop name and official flag.
///
/// The flag is set when any shop-name element holds an official marker,
/// whether or not a name is left once the marker is removed. Organic results
/// without a shop element fall back to the host shown in their breadcrumb
/// path.
#[must_use]
pub fn extract_shop(node: &NodeRef, kind: ContainerKind, options: &Options) -> ShopInfo {
    let fields = &options.fields;
    let mut info = ShopInfo::default();

    for el in matches_in_chain(node, &fields.shop_name) {
        let markers: Vec<NodeId> = matches_in_chain(&el, &fields.official_shop)
            .iter()
            .map(|m| m.id)
            .collect();
        info.official |= !markers.is_empty();
        if info.name.is_none() {
            info.name = clean_name(&el, &markers, options.max_tree_depth);
        }
    }

    if info.name.is_none() && kind == ContainerKind::Organic {
        info.name = first_text(node, &fields.path).and_then(|path| host_from_path(&path));
    }
    info
}

/// Shop-name text without the official markers.
///
/// With markers present, the first child carrying text outside them is the
/// name. Subtracting the markers from the whole text is the fallback.
fn clean_name(el: &NodeRef, markers: &[NodeId], max_depth: usize) -> Option<String> {
    if markers.is_empty() {
        let text = dom::normalized_text(el);
        return (!text.is_empty()).then_some(text);
    }

    let structural = el.children().into_iter().find_map(|child| {
        let text = if child.is_text() {
            dom::normalize_whitespace(&child.text())
        } else if child.is_element() && !markers.contains(&child.id) {
            dom::text_without(&child, markers, max_depth)
        } else {
            return None;
        };
        (!text.is_empty()).then_some(text)
    });

    structural.or_else(|| {
        let text = dom::text_without(el, markers, max_depth);
        (!text.is_empty()).then_some(text)
    })
}

/// Host of the result's site, without `www.`.
///
/// Sources in order: the breadcrumb path of an organic result, a breadcrumb
/// link's `href`, bare host text in the breadcrumb, the first absolute link
/// outside the result page's own hosts, and a domain-like shop name.
#[must_use]
pub fn extract_host(node: &NodeRef, kind: ContainerKind, shop_name: Option<&str>, options: &Options) -> Option<String> {
    let fields = &options.fields;

    let from_path = || {
        (kind == ContainerKind::Organic)
            .then(|| first_text(node, &fields.path))
            .flatten()
            .and_then(|path| host_from_path(&path))
    };
    let from_link = || {
        first_value(node, &fields.host_link, |el| {
            dom::get_attribute(el, "href").and_then(|href| host_from_url(&href))
        })
    };
    let from_text = || {
        first_value(node, &fields.host_text, |el| {
            domain_like(&dom::normalized_text(el))
        })
    };
    let from_external = || {
        first_value(node, &fields.external_link, |el| {
            dom::get_attribute(el, "href")
                .and_then(|href| host_from_url(&href))
                .filter(|host| !options.internal_hosts.iter().any(|own| host.contains(own.as_str())))
        })
    };

    from_path()
        .or_else(from_link)
        .or_else(from_text)
        .or_else(from_external)
        .or_else(|| shop_name.and_then(domain_like))
}

fn host_from_url(href: &str) -> Option<String> {
    let url = Url::parse(href.trim()).ok()?;
    let host = url.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    (!host.is_empty()).then(|| host.to_string())
}

/// `text` as a host when it looks like one: a dot and no spaces.
fn domain_like(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() || !text.contains('.') || text.contains(char::is_whitespace) {
        return None;
    }
    let host = text.strip_prefix("www.").unwrap_or(text).to_lowercase();
    (!host.is_empty()).then_some(host)
}

/// Host shown before the first `›` of a breadcrumb path, without `www.`.
fn host_from_path(path: &str) -> Option<String> {
    let head = path.split('›').next()?.trim();
    if head.is_empty() {
        return None;
    }
    // IDN hosts stay readable instead of going through punycode.
    let host = if !head.is_ascii() {
        head.to_lowercase()
    } else if head.contains("://") {
        Url::parse(head).ok()?.host_str()?.to_string()
    } else {
        Url::parse(&format!("https://{head}"))
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| head.to_lowercase())
    };
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    (!host.is_empty()).then_some(host)
}
