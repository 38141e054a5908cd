use std::path::PathBuf;
use std::{fs, io};

use spdlog::warn;

use crate::content::pipeline::Converter;
use crate::content::Post;
use crate::text_utils::read_time;

/// How many posts the recommended strip holds.
const RECOMMENDED_COUNT: usize = 3;

/// Reads posts from a flat directory of `*.md` files. Stateless: every call
/// scans the directory and converts from scratch, so edited files show up on
/// the next request without any invalidation logic.
pub struct PostRepository {
    posts_dir: PathBuf,
    converter: Converter,
}

impl PostRepository {
    pub fn new(posts_dir: PathBuf, diagram_base_url: impl Into<String>) -> Self {
        PostRepository {
            posts_dir,
            converter: Converter::new(diagram_base_url),
        }
    }

    /// Every convertible post, in filename order. Files that fail to read or
    /// convert are logged and skipped; a missing directory means zero posts.
    pub fn list_all(&self) -> Vec<Post> {
        let entries = match fs::read_dir(&self.posts_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Posts directory {} not readable, treating as empty: {}",
                    self.posts_dir.display(),
                    e
                );
                return vec![];
            }
        };

        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().map(|ext| ext == "md").unwrap_or(false)
            })
            .collect();
        // read_dir order is platform-dependent; filename order is the
        // enumeration order every other operation builds on
        files.sort();

        let mut posts = vec![];
        for path in files {
            match self.load_post(&path) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    warn!("Skipping post {}: {}", path.display(), e);
                }
            }
        }
        posts
    }

    /// The post whose slug matches, or `None` for unknown slugs and files
    /// that no longer convert. Not-found is an outcome, not an error.
    pub fn get_by_slug(&self, slug: &str) -> Option<Post> {
        if slug.contains('/') || slug.contains("..") {
            return None;
        }

        let path = self.posts_dir.join(format!("{}.md", slug));
        if !path.exists() {
            return None;
        }

        match self.load_post(&path) {
            Ok(post) => Some(post),
            Err(e) => {
                warn!("Error reading post {}: {}", path.display(), e);
                None
            }
        }
    }

    /// All posts, newest first. The sort is stable: posts sharing a date
    /// keep their enumeration order.
    pub fn list_sorted(&self) -> Vec<Post> {
        let mut posts = self.list_all();
        posts.sort_by(|a, b| b.meta.date.cmp(&a.meta.date));
        posts
    }

    /// Deduplicated, alphabetically sorted union of all tags.
    pub fn list_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .list_all()
            .into_iter()
            .flat_map(|post| post.meta.tags)
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// Up to three featured posts, padded from the front of the input when
    /// fewer are featured. Padding does not deduplicate, so a featured post
    /// near the front can appear twice; that matches the page this feeds.
    pub fn recommended(posts: &[Post]) -> Vec<Post> {
        if posts.len() <= RECOMMENDED_COUNT {
            return posts.to_vec();
        }

        let mut picked: Vec<Post> = posts
            .iter()
            .filter(|post| post.meta.featured)
            .take(RECOMMENDED_COUNT)
            .cloned()
            .collect();

        if picked.len() < RECOMMENDED_COUNT {
            let missing = RECOMMENDED_COUNT - picked.len();
            picked.extend(posts.iter().take(missing).cloned());
        }

        picked
    }

    fn load_post(&self, path: &PathBuf) -> io::Result<Post> {
        let raw = fs::read_to_string(path)?;
        let converted = self.converter.convert(&raw)?;

        let slug = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();
        if slug.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Cannot derive a slug from {}", path.display()),
            ));
        }

        Ok(Post {
            slug,
            read_time: read_time(&converted.raw_body),
            meta: converted.meta,
            raw_body: converted.raw_body,
            html: converted.html,
        })
    }
}
