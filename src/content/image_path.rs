use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Where the serving layer actually exposes image assets.
const PUBLIC_PREFIX: &str = "/images/";

/// Rewrites a single image source from an editor-staging path to the served
/// path. Markdown editors preview images from `public/images/` in the
/// repository checkout; the server exposes that folder as `/images/`.
///
/// Recognized forms: `/public/images/…`, `../../public/images/…` (any number
/// of leading `../`), and `public/images/…`. Everything else is returned
/// unchanged.
pub fn rewrite_src(src: &str) -> String {
    if let Some(rest) = src.strip_prefix("/public/images/") {
        return format!("{}{}", PUBLIC_PREFIX, rest);
    }

    let mut stripped = src;
    while let Some(rest) = stripped.strip_prefix("../") {
        stripped = rest;
    }
    if let Some(rest) = stripped.strip_prefix("public/images/") {
        return format!("{}{}", PUBLIC_PREFIX, rest);
    }

    src.to_string()
}

/// Applies [`rewrite_src`] to the `src` attribute of every image element in
/// the converted HTML.
pub fn transform(html: &str) -> String {
    lazy_static! {
        static ref IMG_SRC_REGEX: Regex = Regex::new(r#"(<img[^>]*?\bsrc=")([^"]*)(")"#).unwrap();
    }

    IMG_SRC_REGEX
        .replace_all(html, |caps: &Captures| {
            format!("{}{}{}", &caps[1], rewrite_src(&caps[2]), &caps[3])
        })
        .into_owned()
}
