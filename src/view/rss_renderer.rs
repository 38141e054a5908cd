use std::io::Cursor;

use chrono::{TimeZone, Utc};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::config::Site;
use crate::content::Post;

/// RSS 2.0 feed for the newest posts, built straight from the sorted list.
pub struct RssChannel<'a> {
    pub site: &'a Site,
}

impl RssChannel<'_> {
    pub fn render(&self, posts: &[Post]) -> quick_xml::Result<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        writer.write_event(Event::Start(rss))?;

        writer.write_event(Event::Start(BytesStart::new("channel")))?;
        push_text(&mut writer, "title", &self.site.title)?;
        push_text(&mut writer, "link", &self.site.url)?;
        push_text(&mut writer, "description", &self.site.description)?;

        for post in posts {
            writer.write_event(Event::Start(BytesStart::new("item")))?;

            push_text(&mut writer, "title", &post.meta.title)?;

            let link = post_link(&self.site.url, &post.slug);
            push_text(&mut writer, "link", &link)?;

            let mut guid_elem = BytesStart::new("guid");
            guid_elem.push_attribute(("isPermaLink", "true"));
            writer.write_event(Event::Start(guid_elem))?;
            writer.write_event(Event::Text(BytesText::new(&link)))?;
            writer.write_event(Event::End(BytesEnd::new("guid")))?;

            push_cdata(&mut writer, "description", &post.meta.excerpt)?;

            let midnight = post.meta.date.and_hms_opt(0, 0, 0).unwrap_or_default();
            let published = Utc.from_utc_datetime(&midnight);
            push_text(&mut writer, "pubDate", &published.to_rfc2822())?;

            writer.write_event(Event::End(BytesEnd::new("item")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        Ok(writer.into_inner().into_inner())
    }
}

fn post_link(base_url: &str, slug: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    format!("{}/view/{}/", base_url, slug)
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn push_cdata(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    if text.contains("]]>") {
        let new_text = text.replace("]]>", "]] >");
        writer.write_event(Event::CData(BytesCData::new(&new_text)))?;
    } else {
        writer.write_event(Event::CData(BytesCData::new(text)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str;

    use chrono::NaiveDate;

    use crate::content::PostMeta;

    use super::*;

    fn create_post(n: u32) -> Post {
        Post {
            slug: format!("post-{}", n),
            meta: PostMeta {
                title: format!("title-of-post-{}", n),
                excerpt: format!("summary-of-post-{}", n),
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                tags: vec!["rust".to_string()],
                author: None,
                featured: false,
                views: None,
            },
            raw_body: String::new(),
            html: String::new(),
            read_time: 1,
        }
    }

    #[test]
    fn render_xml() {
        let site = Site {
            title: "my feed".to_string(),
            url: "https://blog.example.com".to_string(),
            description: "My blog feed".to_string(),
        };
        let posts = vec![create_post(1), create_post(2)];

        let xml = RssChannel { site: &site }.render(&posts).unwrap();
        assert_eq!(str::from_utf8(&xml).unwrap(), EXPECTED);
    }

    const EXPECTED: &str = r##"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>my feed</title><link>https://blog.example.com</link><description>My blog feed</description><item><title>title-of-post-1</title><link>https://blog.example.com/view/post-1/</link><guid isPermaLink="true">https://blog.example.com/view/post-1/</guid><description><![CDATA[summary-of-post-1]]></description><pubDate>Tue, 2 Jan 2024 00:00:00 +0000</pubDate></item><item><title>title-of-post-2</title><link>https://blog.example.com/view/post-2/</link><guid isPermaLink="true">https://blog.example.com/view/post-2/</guid><description><![CDATA[summary-of-post-2]]></description><pubDate>Tue, 2 Jan 2024 00:00:00 +0000</pubDate></item></channel></rss>"##;
}
