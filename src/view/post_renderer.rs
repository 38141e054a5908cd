use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::content::headings;
use crate::content::Post;
use crate::text_utils::format_date;

#[derive(ramhorns::Content)]
struct ViewItem<'a> {
    title: &'a str,
    excerpt: &'a str,
    author: &'a str,
    avatar: &'a str,
    date: String,
    read_time: u32,
    tags: Vec<ViewTag<'a>>,
    toc: Vec<TocEntry>,
    has_toc: bool,
    post_content: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewTag<'a> {
    tag: &'a str,
}

#[derive(ramhorns::Content)]
struct TocEntry {
    id: String,
    text: String,
    level: u8,
}

pub struct PostRenderer<'a> {
    template: Template<'a>,
}

impl PostRenderer<'_> {
    pub fn new(view_tpl_src: &str) -> io::Result<PostRenderer> {
        let template = match Template::new(view_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("Error parsing post view template: {}", e),
                ));
            }
        };

        Ok(PostRenderer { template })
    }

    pub fn render(&self, post: &Post) -> String {
        let tags: Vec<ViewTag> = post
            .meta
            .tags
            .iter()
            .map(|t| ViewTag { tag: t.as_str() })
            .collect();

        let toc: Vec<TocEntry> = headings::extract(&post.html)
            .into_iter()
            .map(|h| TocEntry {
                id: h.id,
                text: h.text,
                level: h.level,
            })
            .collect();

        let (author, avatar) = match post.meta.author {
            Some(ref author) => (
                author.name.as_str(),
                author.avatar.as_deref().unwrap_or(""),
            ),
            None => ("", ""),
        };

        self.template.render(&ViewItem {
            title: post.meta.title.as_str(),
            excerpt: post.meta.excerpt.as_str(),
            author,
            avatar,
            date: format_date(&post.meta.date),
            read_time: post.read_time,
            tags,
            has_toc: !toc.is_empty(),
            toc,
            post_content: post.html.as_str(),
        })
    }
}
