//! Heuristic extraction of store details from fetched pages.
//!
//! All heuristics are substring/regex matches over the page's visible text —
//! candidate pages come from a general web search and guarantee nothing about
//! structure, language, or even being HTML.

use regex::Regex;

use crate::html::{og_site_name, title_text, url_host, visible_text};
use crate::types::StoreCandidate;

/// Keywords that mark a page as paint/automotive related. Product presence
/// requires at least one of these in addition to a color or model mention.
const PRODUCT_KEYWORDS: [&str; 6] = ["tinta", "automotiva", "pintura", "cor", "color", "verniz"];

/// Keywords signalling the store ships orders (nationwide or otherwise).
const SHIPPING_KEYWORDS: [&str; 9] = [
    "entregamos",
    "frete",
    "envio",
    "entrega",
    "shipping",
    "enviamos",
    "todo brasil",
    "todo o país",
    "nacional",
];

/// Extracts a physical-store candidate from a page.
///
/// Returns `Some` iff a store name could be derived. `has_product` is carried
/// either way (possibly false); coordinates and distance are attached later by
/// the pipeline.
#[must_use]
pub fn extract_store(
    html: &str,
    url: &str,
    color_term: &str,
    model_term: &str,
) -> Option<StoreCandidate> {
    let name = extract_store_name(html, url)?;
    let text = visible_text(html);

    Some(StoreCandidate {
        name,
        url: url.to_owned(),
        address: extract_address(&text),
        phone: extract_phone(&text),
        lat: None,
        lng: None,
        has_product: check_product_availability(&text, color_term, model_term),
        product_match: format!("{color_term} - {model_term}"),
        ships_to_cep: false,
        distance_km: None,
        time_min: None,
    })
}

/// Extracts an online-store candidate from a page.
///
/// Returns `Some` iff a store name could be derived AND the page shows either
/// a product signal or a shipping signal — pages with neither are discarded.
#[must_use]
pub fn extract_online_store(
    html: &str,
    url: &str,
    color_term: &str,
    model_term: &str,
) -> Option<StoreCandidate> {
    let name = extract_store_name(html, url)?;
    let text = visible_text(html);

    let has_product = check_product_availability(&text, color_term, model_term);
    let ships_to_cep = check_shipping(&text);
    if !has_product && !ships_to_cep {
        return None;
    }

    Some(StoreCandidate {
        name,
        url: url.to_owned(),
        address: String::new(),
        phone: String::new(),
        lat: None,
        lng: None,
        has_product,
        product_match: format!("{color_term} - {model_term}"),
        ships_to_cep,
        distance_km: None,
        time_min: None,
    })
}

/// Derives the store's display name.
///
/// Preference order: page title text before the first `" - "` or `" | "`
/// separator (kept only when strictly between 3 and 50 characters), then the
/// `og:site_name` meta tag, then the URL host with `www.` and the domain
/// suffix stripped, title-cased.
pub(crate) fn extract_store_name(html: &str, url: &str) -> Option<String> {
    if let Some(title) = title_text(html) {
        let head = title
            .split(" - ")
            .next()
            .unwrap_or(&title)
            .split(" | ")
            .next()
            .unwrap_or(&title)
            .trim()
            .to_owned();
        let len = head.chars().count();
        if len > 3 && len < 50 {
            return Some(head);
        }
    }

    if let Some(site_name) = og_site_name(html) {
        return Some(site_name);
    }

    let host = url_host(url);
    let label = host
        .strip_prefix("www.")
        .unwrap_or(host)
        .split('.')
        .next()
        .unwrap_or(host);
    if label.is_empty() {
        return None;
    }
    Some(title_case(label))
}

/// First match of a Brazilian street-address pattern ("Rua ..." / "Av. ...",
/// number, neighbourhood, city and CEP), or empty string.
pub(crate) fn extract_address(text: &str) -> String {
    let patterns = [
        r"(?i)Rua\s+[\w\s]+,\s*\d+[\s\w]*,\s*[\w\s]+-\s*[\w\s]+,?\s*CEP?\s*\d{5}-?\d{3}",
        r"(?i)Av\.?\s+[\w\s]+,\s*\d+[\s\w]*,\s*[\w\s]+-\s*[\w\s]+,?\s*CEP?\s*\d{5}-?\d{3}",
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid regex");
        if let Some(found) = re.find(text) {
            return found.as_str().trim().to_owned();
        }
    }
    String::new()
}

/// First match of a Brazilian phone format `(DD) NNNN-NNNN` or
/// `(DD) NNNNN-NNNN` (parentheses and space optional), or empty string.
pub(crate) fn extract_phone(text: &str) -> String {
    let re = Regex::new(r"\(?\d{2}\)?\s?\d{4,5}-\d{4}").expect("valid regex");
    re.find(text)
        .map(|m| m.as_str().to_owned())
        .unwrap_or_default()
}

/// True iff the text mentions the color OR the model (case-insensitive) AND
/// contains at least one paint-domain keyword.
pub(crate) fn check_product_availability(text: &str, color_term: &str, model_term: &str) -> bool {
    let lower = text.to_lowercase();
    let color_mentioned = lower.contains(&color_term.to_lowercase());
    let model_mentioned = lower.contains(&model_term.to_lowercase());
    let has_keyword = PRODUCT_KEYWORDS.iter().any(|k| lower.contains(k));

    (color_mentioned || model_mentioned) && has_keyword
}

/// True iff the text contains any shipping/delivery keyword.
pub(crate) fn check_shipping(text: &str) -> bool {
    let lower = text.to_lowercase();
    SHIPPING_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
