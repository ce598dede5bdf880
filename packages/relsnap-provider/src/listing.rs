//! Parser for web-server directory listings whose entries are release folders.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use relsnap_utils::Version;

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static VERSION_HREF_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+){1,3})/?").unwrap());
static ISO_DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap());

const ROW_ELEMENTS: &[&str] = &["tr", "li"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub version: String,
    pub date: Option<String>,
}

/// Text belonging to the listing row of `link`.
///
/// Table and list rows are used whole. When the parent holds several links
/// (a `<pre>` autoindex), only the text between this link and the next one
/// belongs to the row.
fn row_text(link: ElementRef) -> String {
    let row = link
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| ROW_ELEMENTS.contains(&el.value().name()));
    if let Some(row) = row {
        return join_text(row);
    }
    let Some(parent) = link.parent().and_then(ElementRef::wrap) else {
        return join_text(link);
    };
    if parent.select(&LINK_SELECTOR).count() <= 1 {
        return join_text(parent);
    }

    let mut text = join_text(link);
    for sibling in link.next_siblings() {
        match sibling.value() {
            Node::Text(t) => {
                text.push(' ');
                text.push_str(t);
            }
            Node::Element(el) if el.name() == "a" => break,
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(sibling) {
                    text.push(' ');
                    text.push_str(&join_text(el));
                }
            }
            _ => (),
        }
    }
    text
}

fn join_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First `YYYY-MM-DD` in the row; other date styles leave the entry undated.
fn find_date(text: &str) -> Option<String> {
    ISO_DATE_REGEX.find(text).map(|m| m.as_str().to_string())
}

/// Collects every version-named link in `html`, in page order.
pub fn parse_listing(html: &str) -> Vec<ListingEntry> {
    let document = Html::parse_document(html);
    document
        .select(&LINK_SELECTOR)
        .filter_map(|link| {
            let href = link.value().attr("href").unwrap_or("");
            let caps = VERSION_HREF_REGEX.captures(href)?;
            Some(ListingEntry {
                version: caps[1].to_string(),
                date: find_date(&row_text(link)),
            })
        })
        .collect()
}

/// Returns the highest version in the listing and its date.
///
/// Versions compare numerically per component, shorter ones padded with
/// zeros; on a tie the entry listed first wins.
pub fn latest_from_listing(html: &str) -> (Option<String>, Option<String>) {
    let mut entries = parse_listing(html);
    entries.sort_by(|a, b| {
        Version::new(b.version.as_str()).cmp_lossy(&Version::new(a.version.as_str()))
    });
    match entries.into_iter().next() {
        Some(entry) => (Some(entry.version), entry.date),
        None => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE_LISTING: &str = r#"<html><body><table>
<tr><th>Name</th><th>Last modified</th></tr>
<tr><td><a href="../">Parent Directory</a></td><td></td></tr>
<tr><td><a href="90.0.4480.84/">90.0.4480.84/</a></td><td>2023-08-01 10:12</td></tr>
<tr><td><a href="91.0.4516.20/">91.0.4516.20/</a></td><td>2023-09-10 08:00</td></tr>
</table></body></html>"#;

    const PRE_LISTING: &str = "<html><head><title>Index of /pub/opera/desktop/</title></head><body>\n\
<h1>Index of /pub/opera/desktop/</h1><hr><pre><a href=\"../\">../</a>\n\
<a href=\"100.0.4815.21/\">100.0.4815.21/</a>                                     30-Jun-2023 12:01       -\n\
<a href=\"104.0.4944.54/\">104.0.4944.54/</a>                                     05-Nov-2023 09:41       -\n\
<a href=\"99.0.4788.13/\">99.0.4788.13/</a>                                      12-Jun-2023 07:30       -\n\
</pre><hr></body></html>";

    #[test]
    fn test_latest_from_table_listing() {
        assert_eq!(
            latest_from_listing(TABLE_LISTING),
            (
                Some("91.0.4516.20".to_string()),
                Some("2023-09-10".to_string())
            )
        );
    }

    #[test]
    fn test_parse_table_listing_entries() {
        let entries = parse_listing(TABLE_LISTING);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].version, "90.0.4480.84");
        assert_eq!(entries[0].date.as_deref(), Some("2023-08-01"));
    }

    #[test]
    fn test_pre_listing_without_iso_dates() {
        let entries = parse_listing(PRE_LISTING);
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|entry| entry.date.is_none()));
        assert_eq!(
            latest_from_listing(PRE_LISTING),
            (Some("104.0.4944.54".to_string()), None)
        );

        let html = "<pre><a href=\"90.0.1.2/\">90.0.1.2/</a> 05-Sep-2023\n\
<a href=\"91.0.1.2/\">91.0.1.2/</a> 06-Sep-2023\n</pre>";
        assert_eq!(
            latest_from_listing(html),
            (Some("91.0.1.2".to_string()), None)
        );
    }

    #[test]
    fn test_pre_listing_dates_stay_on_their_row() {
        let html = "<pre><a href=\"../\">../</a>\n\
<a href=\"100.0.4815.21/\">100.0.4815.21/</a>   2023-06-30 12:01   -\n\
<a href=\"104.0.4944.54/\">104.0.4944.54/</a>   2023-11-05 09:41   -\n\
<a href=\"99.0.4788.13/\">99.0.4788.13/</a>   2023-06-12 07:30   -\n</pre>";
        let entries = parse_listing(html);
        assert_eq!(entries[0].date.as_deref(), Some("2023-06-30"));
        assert_eq!(entries[2].date.as_deref(), Some("2023-06-12"));
        assert_eq!(
            latest_from_listing(html),
            (
                Some("104.0.4944.54".to_string()),
                Some("2023-11-05".to_string())
            )
        );
    }

    #[test]
    fn test_row_per_div() {
        let html = r#"<div><a href="12.1/">12.1/</a> 2022-01-05</div>
<div><a href="12.1.3/">12.1.3/</a></div>"#;
        assert_eq!(
            latest_from_listing(html),
            (Some("12.1.3".to_string()), None)
        );
    }

    #[test]
    fn test_padded_tie_keeps_first() {
        let html = r#"<ul><li><a href="90.0.1/">a</a> 2023-01-01</li>
<li><a href="90.0.1.0/">b</a> 2023-02-02</li></ul>"#;
        assert_eq!(
            latest_from_listing(html),
            (Some("90.0.1".to_string()), Some("2023-01-01".to_string()))
        );
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(latest_from_listing(""), (None, None));
        assert_eq!(
            latest_from_listing(r#"<a href="../">up</a><a href="latest/">latest</a>"#),
            (None, None)
        );
    }
}
