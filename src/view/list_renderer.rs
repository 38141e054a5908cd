use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::content::Post;
use crate::text_utils::format_date;

#[derive(ramhorns::Content)]
struct ListPage<'a> {
    site_title: &'a str,
    post_list: Vec<PostItem>,
    recommended: Vec<PostItem>,
    tags: Vec<ViewTag<'a>>,
    page_list: Vec<ViewPagination>,
    show_pagination: bool,
    searching: bool,
    query: &'a str,
    result_count: usize,
}

#[derive(ramhorns::Content)]
struct PostItem {
    date: String,
    link: String,
    title: String,
    excerpt: String,
    read_time: u32,
}

#[derive(ramhorns::Content)]
struct ViewTag<'a> {
    tag: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewPagination {
    current: bool,
    number: u32,
}

/// Everything the list page shows besides the posts themselves.
pub struct ListContext<'a> {
    pub site_title: &'a str,
    pub tags: &'a [String],
    pub cur_page: u32,
    pub searching: bool,
    pub query: &'a str,
}

pub struct ListRenderer<'a> {
    template: Template<'a>,
    page_count: u32,
}

fn post_item(post: &Post) -> PostItem {
    PostItem {
        date: format_date(&post.meta.date),
        link: format!("/view/{}", post.slug),
        title: post.meta.title.clone(),
        excerpt: post.meta.excerpt.clone(),
        read_time: post.read_time,
    }
}

impl ListRenderer<'_> {
    pub fn new(list_tpl_src: &str, page_count: u32) -> io::Result<ListRenderer> {
        let template = match Template::new(list_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("Error parsing list template: {}", e),
                ));
            }
        };

        Ok(ListRenderer {
            template,
            page_count,
        })
    }

    pub fn render(
        &self,
        posts: &[&Post],
        recommended: &[Post],
        ctx: &ListContext,
    ) -> String {
        let post_list: Vec<PostItem> = posts.iter().map(|post| post_item(post)).collect();
        let recommended: Vec<PostItem> = recommended.iter().map(post_item).collect();

        let mut page_list: Vec<ViewPagination> = Vec::with_capacity(self.page_count as usize);
        for number in 1..=self.page_count {
            page_list.push(ViewPagination {
                current: number == ctx.cur_page,
                number,
            });
        }

        let result_count = post_list.len();
        let tags: Vec<_> = ctx.tags.iter().map(|t| ViewTag { tag: t.as_str() }).collect();

        self.template.render(&ListPage {
            site_title: ctx.site_title,
            post_list,
            recommended,
            tags,
            show_pagination: self.page_count > 1 && !ctx.searching,
            page_list,
            searching: ctx.searching,
            query: ctx.query,
            result_count,
        })
    }
}
