//! Helpers for reading infobox values out of MediaWiki article source.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static REF_SELF_CLOSING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<ref\b[^>]*/>").unwrap());
static REF_BLOCK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<ref\b[^>]*>.*?</ref\s*>").unwrap());
static COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static INNER_TEMPLATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]*)\}\}").unwrap());
static WIKILINK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\[([^\[\]]*)\]\]").unwrap());
static EXTERNAL_LINK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(?:https?:)?//[^\s\]]+(?:\s+([^\]]*))?\]").unwrap());
static QUOTES_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"'{2,}").unwrap());
static BREAK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[a-zA-Z][^>]*>").unwrap());
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static START_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\{\{\s*start date(?: and age)?\s*(?:\|\s*[a-z]+\s*=\s*[^|}]*)*\|\s*(\d{4})\s*\|\s*(\d{1,2})\s*\|\s*(\d{1,2})",
    )
    .unwrap()
});

/// Templates that only decorate their argument; their text is kept.
const DISPLAY_TEMPLATES: &[&str] = &["nowrap", "nobr", "small", "version"];

const LINK_NAMESPACES_TO_DROP: &[&str] = &["file:", "image:", "category:"];

/// Returns the value of the first infobox field in `keys` present in `wikitext`.
///
/// Fields are matched on lines of the form `| key = value`; empty values do
/// not count as a match.
pub fn extract_field<S: AsRef<str>>(wikitext: &str, keys: &[S]) -> Option<String> {
    keys.iter().find_map(|key| {
        let pattern = format!(
            r"(?m)^\|[ \t]*{}[ \t]*=[ \t]*(.+)$",
            regex::escape(key.as_ref())
        );
        let re = Regex::new(&pattern).ok()?;
        re.captures(wikitext)
            .map(|caps| caps[1].trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

/// Removes `<ref>` citations, both paired and self-closing.
pub fn strip_refs(value: &str) -> String {
    let value = REF_SELF_CLOSING_REGEX.replace_all(value, "");
    REF_BLOCK_REGEX.replace_all(&value, "").into_owned()
}

fn template_text(caps: &Captures) -> String {
    let mut params = caps[1].split('|');
    let name = params.next().unwrap_or_default().trim().to_lowercase();
    if !DISPLAY_TEMPLATES.contains(&name.as_str()) {
        return String::new();
    }
    params
        .filter(|p| !p.contains('='))
        .last()
        .map(|p| p.trim().to_string())
        .unwrap_or_default()
}

fn link_text(caps: &Captures) -> String {
    let mut parts = caps[1].splitn(2, '|');
    let target = parts.next().unwrap_or_default().trim();
    let lower = target.to_lowercase();
    if LINK_NAMESPACES_TO_DROP.iter().any(|ns| lower.starts_with(ns)) {
        return String::new();
    }
    parts.next().unwrap_or(target).to_string()
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&nbsp;", " ")
        .replace("&ndash;", "\u{2013}")
        .replace("&mdash;", "\u{2014}")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Strips wiki markup from `value`, leaving the text a reader would see.
pub fn strip_markup(value: &str) -> String {
    let text = COMMENT_REGEX.replace_all(value, "");
    // links go first, their `|` would otherwise split template params
    let mut text = WIKILINK_REGEX.replace_all(&text, link_text).into_owned();
    // innermost templates first so nested ones collapse outward
    loop {
        let replaced = INNER_TEMPLATE_REGEX.replace_all(&text, template_text);
        if replaced == text {
            break;
        }
        text = replaced.into_owned();
    }
    let text = EXTERNAL_LINK_REGEX.replace_all(&text, |caps: &Captures| {
        caps.get(1).map_or(String::new(), |m| m.as_str().to_string())
    });
    let text = QUOTES_REGEX.replace_all(&text, "");
    let text = BREAK_REGEX.replace_all(&text, " ");
    let text = TAG_REGEX.replace_all(&text, "");
    let text = decode_entities(&text);
    WHITESPACE_REGEX.replace_all(&text, " ").trim().to_string()
}

/// Reduces a raw field value to plain text, or `None` if nothing is left.
pub fn clean_wikitext(value: &str) -> Option<String> {
    let cleaned = strip_markup(&strip_refs(value));
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Reads a release date field.
///
/// A `{{Start date|YYYY|M|D}}` template becomes `YYYY-MM-DD`; anything else is
/// cleaned like any other field.
pub fn parse_wiki_date(value: &str) -> Option<String> {
    if let Some(caps) = START_DATE_REGEX.captures(value) {
        let year = &caps[1];
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return Some(format!("{}-{:02}-{:02}", year, month, day));
    }
    clean_wikitext(value)
}
