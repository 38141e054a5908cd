use std::io;
use std::io::{ErrorKind, Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use markdown::mdast::Node;
use markdown::ParseOptions;
use spdlog::warn;

/// Fenced code blocks with this language tag are diagrams, not code.
pub const DIAGRAM_LANG: &str = "plantuml";

pub const DEFAULT_BASE_URL: &str = "https://www.plantuml.com/plantuml/svg";

// PlantUML's own base64 variant: not the RFC ordering, and URL-safe
const ALPHABET: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_";

/// Encodes diagram source into the URL-safe token a PlantUML server accepts:
/// raw DEFLATE, then 6-bit packing over the PlantUML alphabet.
pub fn encode(source: &str) -> io::Result<String> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(source.as_bytes())?;
    let deflated = encoder.finish()?;
    Ok(encode64(&deflated))
}

/// Inverse of [`encode`]. `decode(encode(x)) == x`.
pub fn decode(token: &str) -> io::Result<String> {
    let deflated = decode64(token)?;
    let mut out = String::new();
    DeflateDecoder::new(deflated.as_slice()).read_to_string(&mut out)?;
    Ok(out)
}

fn encode64(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);
    for chunk in data.chunks(3) {
        let b1 = chunk[0];
        let b2 = chunk.get(1).copied().unwrap_or(0);
        let b3 = chunk.get(2).copied().unwrap_or(0);

        out.push(ALPHABET[(b1 >> 2) as usize] as char);
        out.push(ALPHABET[(((b1 & 0x03) << 4) | (b2 >> 4)) as usize] as char);
        out.push(ALPHABET[(((b2 & 0x0f) << 2) | (b3 >> 6)) as usize] as char);
        out.push(ALPHABET[(b3 & 0x3f) as usize] as char);
    }
    out
}

fn decode64(token: &str) -> io::Result<Vec<u8>> {
    let mut values = Vec::with_capacity(token.len());
    for c in token.bytes() {
        match ALPHABET.iter().position(|&a| a == c) {
            Some(v) => values.push(v as u8),
            None => {
                return Err(io::Error::new(
                    ErrorKind::InvalidData,
                    format!("Invalid character in diagram token: {}", c as char),
                ))
            }
        }
    }

    // Trailing zero bytes from padding are ignored by the inflater
    let mut out = Vec::with_capacity(values.len() / 4 * 3);
    for chunk in values.chunks(4) {
        let c1 = chunk[0];
        let c2 = chunk.get(1).copied().unwrap_or(0);
        let c3 = chunk.get(2).copied().unwrap_or(0);
        let c4 = chunk.get(3).copied().unwrap_or(0);

        out.push((c1 << 2) | (c2 >> 4));
        out.push(((c2 & 0x0f) << 4) | (c3 >> 2));
        out.push(((c3 & 0x03) << 6) | c4);
    }
    Ok(out)
}

/// Replaces every ` ```plantuml ` fenced block in the markdown body with an
/// inline HTML image pointing at the rendering server. Blocks are located by
/// walking the markdown syntax tree, so fences inside block quotes or lists
/// are found and indented "fences" inside code are not.
///
/// A block that fails to encode is logged and left as a plain code block;
/// the rest of the document still converts.
pub fn transform(body: &str, base_url: &str) -> io::Result<String> {
    let tree = match markdown::to_mdast(body, &ParseOptions::gfm()) {
        Ok(tree) => tree,
        Err(e) => {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                e.reason.as_str(),
            ))
        }
    };

    let mut blocks = vec![];
    collect_diagram_blocks(&tree, &mut blocks);

    if blocks.is_empty() {
        return Ok(body.to_string());
    }

    let mut out = String::with_capacity(body.len());
    let mut cursor = 0usize;
    for (start, end, value) in blocks {
        out.push_str(&body[cursor..start]);
        match encode(&value) {
            Ok(token) => {
                out.push_str(&image_tag(base_url, &token));
            }
            Err(e) => {
                warn!("Failed to encode diagram block: {}", e);
                out.push_str(&body[start..end]);
            }
        }
        cursor = end;
    }
    out.push_str(&body[cursor..]);

    Ok(out)
}

fn image_tag(base_url: &str, token: &str) -> String {
    format!(
        "<img src=\"{}/{}\" alt=\"PlantUML Diagram\" style=\"max-width:100%\" loading=\"lazy\" />",
        base_url, token
    )
}

fn collect_diagram_blocks(node: &Node, blocks: &mut Vec<(usize, usize, String)>) {
    if let Node::Code(code) = node {
        let is_diagram = code.lang.as_deref() == Some(DIAGRAM_LANG);
        if is_diagram {
            if let Some(ref position) = code.position {
                blocks.push((
                    position.start.offset,
                    position.end.offset,
                    code.value.clone(),
                ));
            }
            return;
        }
    }

    if let Some(children) = node.children() {
        for child in children {
            collect_diagram_blocks(child, blocks);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIAGRAM: &str = "@startuml\nAlice -> Bob: hello\n@enduml";

    #[test]
    fn test_encode_decode_round_trip() {
        let token = encode(DIAGRAM).unwrap();
        assert!(!token.is_empty());
        assert_eq!(decode(&token).unwrap(), DIAGRAM);
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = encode("a -> b: αβγ, quotes \"x\" and <tags>").unwrap();
        assert!(token
            .bytes()
            .all(|c| c.is_ascii_alphanumeric() || c == b'-' || c == b'_'));
    }

    #[test]
    fn test_decode_rejects_invalid_characters() {
        assert!(decode("abc+def").is_err());
    }

    #[test]
    fn test_transform_replaces_diagram_block() {
        let body = "Intro.\n\n```plantuml\nAlice -> Bob\n```\n\nOutro.\n";
        let out = transform(body, DEFAULT_BASE_URL).unwrap();
        let token = encode("Alice -> Bob").unwrap();
        assert!(out.contains(&format!(
            "<img src=\"{}/{}\" alt=\"PlantUML Diagram\"",
            DEFAULT_BASE_URL, token
        )));
        assert!(!out.contains("```plantuml"));
        assert!(out.starts_with("Intro.\n"));
        assert!(out.ends_with("Outro.\n"));
    }

    #[test]
    fn test_transform_leaves_other_code_blocks() {
        let body = "```rust\nfn main() {}\n```\n";
        let out = transform(body, DEFAULT_BASE_URL).unwrap();
        assert_eq!(out, body);
    }

    #[test]
    fn test_transform_finds_block_inside_quote() {
        let body = "> quoted\n>\n> ```plantuml\n> A -> B\n> ```\n";
        let out = transform(body, DEFAULT_BASE_URL).unwrap();
        assert!(out.contains("<img src="));
    }

    #[test]
    fn test_transform_multiple_blocks() {
        let body = "```plantuml\nA -> B\n```\n\ntext\n\n```plantuml\nB -> C\n```\n";
        let out = transform(body, DEFAULT_BASE_URL).unwrap();
        assert_eq!(out.matches("<img src=").count(), 2);
        assert!(out.contains("\n\ntext\n\n"));
    }
}
