use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod diagram;
pub mod frontmatter;
pub mod headings;
pub mod image_path;
pub mod pipeline;
pub mod table_wrap;

/// A fully converted post, ready for the view layer. Built fresh on every
/// repository read and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub slug: String,
    pub meta: PostMeta,
    /// Markdown body as written, frontmatter stripped.
    pub raw_body: String,
    /// Final HTML after the conversion pipeline.
    pub html: String,
    /// Estimated minutes to read, at 200 words per minute.
    pub read_time: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMeta {
    pub title: String,
    pub excerpt: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}
