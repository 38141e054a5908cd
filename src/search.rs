use crate::content::Post;

/// Result of filtering a post collection against a free-text query.
pub struct SearchOutcome<'a> {
    pub results: Vec<&'a Post>,
    /// False only for an empty or whitespace-only query. Zero results with a
    /// real query is still "searching" and rendered as such.
    pub searching: bool,
}

impl SearchOutcome<'_> {
    pub fn result_count(&self) -> usize {
        self.results.len()
    }
}

/// Case-insensitive substring search over title, excerpt, raw body and tags.
/// The filter is stable: matching posts keep their input order. An empty
/// query returns the whole collection unchanged.
pub fn filter_posts<'a>(posts: &'a [Post], query: &str) -> SearchOutcome<'a> {
    if query.trim().is_empty() {
        return SearchOutcome {
            results: posts.iter().collect(),
            searching: false,
        };
    }

    let needle = query.to_lowercase();
    let results = posts
        .iter()
        .filter(|post| {
            post.meta.title.to_lowercase().contains(&needle)
                || post.meta.excerpt.to_lowercase().contains(&needle)
                || post.raw_body.to_lowercase().contains(&needle)
                || post
                    .meta
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&needle))
        })
        .collect();

    SearchOutcome {
        results,
        searching: true,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::content::PostMeta;

    use super::*;

    fn post(slug: &str, title: &str, excerpt: &str, body: &str, tags: &[&str]) -> Post {
        Post {
            slug: slug.to_string(),
            meta: PostMeta {
                title: title.to_string(),
                excerpt: excerpt.to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                author: None,
                featured: false,
                views: None,
            },
            raw_body: body.to_string(),
            html: String::new(),
            read_time: 1,
        }
    }

    fn fixture() -> Vec<Post> {
        vec![
            post("a", "Rust ownership", "borrow checker", "moves and copies", &["rust"]),
            post("b", "Gardening", "tomatoes", "soil and water", &["hobby"]),
            post("c", "Web servers", "http", "learning Rust for the backend", &["rust", "web"]),
        ]
    }

    #[test]
    fn test_empty_query_returns_everything_not_searching() {
        let posts = fixture();
        let outcome = filter_posts(&posts, "");
        assert!(!outcome.searching);
        assert_eq!(outcome.result_count(), 3);

        let outcome = filter_posts(&posts, "   \t ");
        assert!(!outcome.searching);
        assert_eq!(outcome.result_count(), 3);
    }

    #[test]
    fn test_case_insensitive_title_and_body_match() {
        let posts = fixture();
        let outcome = filter_posts(&posts, "RUST");
        assert!(outcome.searching);
        let slugs: Vec<&str> = outcome.results.iter().map(|p| p.slug.as_str()).collect();
        // Stable: input order preserved, no re-ranking
        assert_eq!(slugs, ["a", "c"]);
    }

    #[test]
    fn test_tag_match() {
        let posts = fixture();
        let outcome = filter_posts(&posts, "hobby");
        let slugs: Vec<&str> = outcome.results.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["b"]);
    }

    #[test]
    fn test_excerpt_match() {
        let posts = fixture();
        let outcome = filter_posts(&posts, "tomato");
        assert_eq!(outcome.result_count(), 1);
    }

    #[test]
    fn test_no_match_is_searching_with_zero_results() {
        let posts = fixture();
        let outcome = filter_posts(&posts, "quantum");
        assert!(outcome.searching);
        assert_eq!(outcome.result_count(), 0);
    }
}
