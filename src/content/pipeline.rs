//! Markdown-to-HTML conversion pipeline.
//!
//! Stages run in a fixed order, split into two phases:
//!
//! 1. `frontmatter`      text       -> metadata + markdown body
//! 2. `diagram`          markdown   -> markdown (syntax-tree pass)
//! 3. `gfm-to-html`      markdown   -> HTML (raw HTML passes through)
//! 4. `heading-ids`      HTML       -> HTML
//! 5. `image-path`       HTML       -> HTML
//! 6. `table-wrap`       HTML       -> HTML
//!
//! The diagram stage must stay in the markdown phase: it matches fenced code
//! nodes, which no longer exist once the body is serialized to HTML. The
//! HTML-phase stages conversely rely on serialized `<img>`/`<table>`/`<h*>`
//! elements and cannot run earlier.

use std::io;
use std::io::ErrorKind;

use markdown::{CompileOptions, Options, ParseOptions};

use crate::content::{diagram, frontmatter, headings, image_path, table_wrap, PostMeta};

/// Output of the conversion pipeline for one content file.
#[derive(Debug, Clone)]
pub struct Converted {
    pub meta: PostMeta,
    pub raw_body: String,
    pub html: String,
}

pub struct Converter {
    diagram_base_url: String,
}

impl Converter {
    pub fn new(diagram_base_url: impl Into<String>) -> Self {
        Converter {
            diagram_base_url: diagram_base_url.into(),
        }
    }

    /// Runs the full pipeline over a raw content file. Errors propagate;
    /// the repository is the boundary that catches and skips bad files.
    pub fn convert(&self, raw: &str) -> io::Result<Converted> {
        let (meta, body) = frontmatter::parse(raw)?;

        // Markdown phase
        let body_with_diagrams = diagram::transform(body, &self.diagram_base_url)?;
        let html = Self::to_html(&body_with_diagrams)?;

        // HTML phase
        let html = headings::assign_ids(&html);
        let html = image_path::transform(&html);
        let html = table_wrap::transform(&html);

        Ok(Converted {
            meta,
            raw_body: body.to_string(),
            html,
        })
    }

    fn to_html(body: &str) -> io::Result<String> {
        // allow_dangerous_html keeps the <img> tags the diagram stage
        // injected instead of escaping them
        let options = Options {
            parse: ParseOptions::gfm(),
            compile: CompileOptions {
                allow_dangerous_html: true,
                ..CompileOptions::gfm()
            },
        };

        match markdown::to_html_with_options(body, &options) {
            Ok(html) => Ok(html),
            Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, e.reason.as_str())),
        }
    }
}
