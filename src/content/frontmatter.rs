use std::io;
use std::io::ErrorKind;

use crate::content::PostMeta;

const DELIMITER: &str = "---";

/// Splits a raw post file into its YAML frontmatter block and the markdown
/// body. A file without a leading `---` line has no metadata and the whole
/// input is the body.
pub fn split(raw: &str) -> io::Result<(Option<&str>, &str)> {
    let Some(rest) = raw.strip_prefix(DELIMITER) else {
        return Ok((None, raw));
    };

    // The opening delimiter must be a line of its own
    let rest = match rest.strip_prefix('\n') {
        Some(rest) => rest,
        None => match rest.strip_prefix("\r\n") {
            Some(rest) => rest,
            None => return Ok((None, raw)),
        },
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((Some(block), body));
        }
        offset += line.len();
    }

    Err(io::Error::new(
        ErrorKind::InvalidData,
        "Unterminated frontmatter block: closing --- is missing",
    ))
}

/// Parses the frontmatter of a raw post file into typed metadata, returning
/// the metadata and the remaining body. Missing required keys or malformed
/// YAML are reported as errors; callers skip the offending file.
pub fn parse(raw: &str) -> io::Result<(PostMeta, &str)> {
    let (block, body) = split(raw)?;
    let block = match block {
        Some(block) => block,
        None => {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                "Post has no frontmatter block",
            ))
        }
    };

    let meta: PostMeta = match serde_yaml::from_str(block) {
        Ok(meta) => meta,
        Err(e) => {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!("Error parsing frontmatter: {}", e),
            ))
        }
    };

    Ok((meta, body))
}

/// Serializes metadata back into a frontmatter block. Used by tooling and
/// tests; `parse(serialize(meta) + body)` round-trips the supported fields.
pub fn serialize(meta: &PostMeta) -> io::Result<String> {
    let yaml = match serde_yaml::to_string(meta) {
        Ok(yaml) => yaml,
        Err(e) => {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!("Error serializing frontmatter: {}", e),
            ))
        }
    };
    Ok(format!("{}\n{}{}\n", DELIMITER, yaml, DELIMITER))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::content::Author;

    use super::*;

    #[test]
    fn test_split_with_block() {
        let raw = "---\ntitle: Hello\n---\n# Body\n";
        let (block, body) = split(raw).unwrap();
        assert_eq!(block, Some("title: Hello\n"));
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn test_split_without_block() {
        let raw = "# Just a body\n\nNo metadata here.\n";
        let (block, body) = split(raw).unwrap();
        assert_eq!(block, None);
        assert_eq!(body, raw);
    }

    #[test]
    fn test_split_dashes_not_on_own_line() {
        let raw = "--- not a delimiter\nbody\n";
        let (block, body) = split(raw).unwrap();
        assert_eq!(block, None);
        assert_eq!(body, raw);
    }

    #[test]
    fn test_split_unterminated() {
        let raw = "---\ntitle: Hello\nbody without closing delimiter\n";
        assert!(split(raw).is_err());
    }

    #[test]
    fn test_parse_full_metadata() {
        let raw = r#"---
title: Hello
excerpt: A greeting
date: 2024-01-01
tags:
  - test
  - intro
author:
  name: jane
  avatar: /images/jane.png
featured: true
views: 42
---
# Hi

Some text.
"#;
        let (meta, body) = parse(raw).unwrap();
        assert_eq!(meta.title, "Hello");
        assert_eq!(meta.excerpt, "A greeting");
        assert_eq!(meta.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(meta.tags, ["test", "intro"]);
        assert_eq!(
            meta.author,
            Some(Author {
                name: "jane".to_string(),
                avatar: Some("/images/jane.png".to_string()),
            })
        );
        assert!(meta.featured);
        assert_eq!(meta.views, Some(42));
        assert_eq!(body, "# Hi\n\nSome text.\n");
    }

    #[test]
    fn test_parse_optional_fields_default() {
        let raw = "---\ntitle: T\nexcerpt: E\ndate: 2023-05-06\ntags: [a]\n---\nbody\n";
        let (meta, _body) = parse(raw).unwrap();
        assert_eq!(meta.author, None);
        assert!(!meta.featured);
        assert_eq!(meta.views, None);
    }

    #[test]
    fn test_parse_missing_required_key() {
        let raw = "---\ntitle: T\ndate: 2023-05-06\ntags: [a]\n---\nbody\n";
        assert!(parse(raw).is_err());
    }

    #[test]
    fn test_tags_order_preserved_not_deduplicated() {
        let raw = "---\ntitle: T\nexcerpt: E\ndate: 2023-05-06\ntags: [b, a, b]\n---\n";
        let (meta, _body) = parse(raw).unwrap();
        assert_eq!(meta.tags, ["b", "a", "b"]);
    }

    #[test]
    fn test_round_trip() {
        let meta = PostMeta {
            title: "Round trip".to_string(),
            excerpt: "All supported fields survive".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 11, 30).unwrap(),
            tags: vec!["rust".to_string(), "blog".to_string()],
            author: Some(Author {
                name: "jane".to_string(),
                avatar: None,
            }),
            featured: true,
            views: Some(7),
        };

        let raw = serialize(&meta).unwrap() + "# Body\n";
        let (parsed, body) = parse(&raw).unwrap();
        assert_eq!(parsed, meta);
        assert_eq!(body, "# Body\n");
    }
}
