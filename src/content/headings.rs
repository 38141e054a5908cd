use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// A heading surfaced in a post's table of contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub id: String,
    pub text: String,
    pub level: u8,
}

const MAX_ID_LEN: usize = 50;

/// Turns heading text into a URL-safe anchor identifier: lowercase,
/// whitespace runs become `-`, everything that is not an ASCII word
/// character, a CJK character or `-` is dropped, capped at 50 characters.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let dashed = lowered.split_whitespace().collect::<Vec<_>>().join("-");

    dashed
        .chars()
        .filter(|&c| {
            c.is_ascii_alphanumeric() || c == '_' || c == '-' || ('\u{4e00}'..='\u{9fa5}').contains(&c)
        })
        .take(MAX_ID_LEN)
        .collect()
}

fn strip_tags(html: &str) -> String {
    lazy_static! {
        static ref TAG_REGEX: Regex = Regex::new(r"<[^>]*>").unwrap();
    }
    TAG_REGEX.replace_all(html, "").into_owned()
}

/// Assigns an `id` to every heading element that does not have attributes
/// yet, so in-page anchors and the table of contents can link to it.
pub fn assign_ids(html: &str) -> String {
    lazy_static! {
        static ref BARE_HEADING_REGEX: Regex =
            Regex::new(r"(?s)<h([1-6])>(.*?)</h([1-6])>").unwrap();
    }

    BARE_HEADING_REGEX
        .replace_all(html, |caps: &Captures| {
            let (open, close) = (&caps[1], &caps[3]);
            if open != close {
                return caps[0].to_string();
            }
            let text = &caps[2];
            let id = slugify(&strip_tags(text));
            if id.is_empty() {
                return caps[0].to_string();
            }
            format!("<h{} id=\"{}\">{}</h{}>", open, id, text, close)
        })
        .into_owned()
}

/// Extracts the `h2`/`h3` headings of the final HTML for TOC rendering.
/// An existing `id` attribute wins; otherwise one is derived from the text.
pub fn extract(html: &str) -> Vec<Heading> {
    lazy_static! {
        static ref HEADING_REGEX: Regex =
            Regex::new(r#"(?s)<h([23])([^>]*)>(.*?)</h([23])>"#).unwrap();
        static ref ID_ATTR_REGEX: Regex = Regex::new(r#"id="([^"]*)""#).unwrap();
    }

    let mut headings = vec![];
    for caps in HEADING_REGEX.captures_iter(html) {
        if caps[1] != caps[4] {
            continue;
        }
        let level: u8 = match caps[1].parse() {
            Ok(level) => level,
            Err(_) => continue,
        };
        let text = strip_tags(&caps[3]);

        let id = ID_ATTR_REGEX
            .captures(&caps[2])
            .map(|id_caps| id_caps[1].to_string())
            .unwrap_or_else(|| slugify(&text));

        if !text.is_empty() && !id.is_empty() {
            headings.push(Heading { id, text, level });
        }
    }

    headings
}
