/// Inline span parser: emphasis delimiters, code spans, images and links
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::span::{SpanKind, TextSpan};

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[([^\[\]]*)\]\(([^\(\)]*)\)").expect("image pattern is valid")
});

// The regex crate has no lookbehind, so links preceded by `!` are filtered after matching.
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\[\]]*)\]\(([^\(\)]*)\)").expect("link pattern is valid")
});

/// A `[text](url)` style reference found in plain text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
    pub url: &'a str,
}

/// Parse a run of inline Markdown into typed spans.
///
/// Passes run in a fixed order: bold, italic, code, images, links. Each pass
/// only touches spans that are still plain.
pub fn parse_inline(text: &str) -> Result<Vec<TextSpan>> {
    let spans = vec![TextSpan::plain(text)];
    let spans = split_delimiter(spans, "**", SpanKind::Bold)?;
    let spans = split_delimiter(spans, "_", SpanKind::Italic)?;
    let spans = split_delimiter(spans, "`", SpanKind::Code)?;
    let spans = split_images(spans)?;
    split_links(spans)
}

/// Split every plain span on `delimiter`, typing the enclosed segments as `kind`
pub fn split_delimiter(
    spans: Vec<TextSpan>,
    delimiter: &str,
    kind: SpanKind,
) -> Result<Vec<TextSpan>> {
    let mut result = Vec::with_capacity(spans.len());

    for span in spans {
        if span.kind != SpanKind::Plain {
            result.push(span);
            continue;
        }

        let parts: Vec<&str> = span.text.split(delimiter).collect();
        // Balanced delimiters always leave an odd number of segments
        if parts.len() % 2 == 0 {
            return Err(Error::UnbalancedDelimiter {
                delimiter: delimiter.to_string(),
            });
        }

        for (i, part) in parts.into_iter().enumerate() {
            if part.is_empty() {
                continue;
            }
            if i % 2 == 0 {
                result.push(TextSpan::plain(part));
            } else {
                result.push(TextSpan::new(part, kind));
            }
        }
    }

    Ok(result)
}

/// Find all `![alt](url)` images in `text`, in order
pub fn extract_images(text: &str) -> Vec<Reference<'_>> {
    IMAGE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Reference {
                start: whole.start(),
                end: whole.end(),
                text: caps.get(1)?.as_str(),
                url: caps.get(2)?.as_str(),
            })
        })
        .collect()
}

/// Find all `[text](url)` links in `text` that are not images, in order
pub fn extract_links(text: &str) -> Vec<Reference<'_>> {
    LINK_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if text[..whole.start()].ends_with('!') {
                return None;
            }
            Some(Reference {
                start: whole.start(),
                end: whole.end(),
                text: caps.get(1)?.as_str(),
                url: caps.get(2)?.as_str(),
            })
        })
        .collect()
}

pub fn split_images(spans: Vec<TextSpan>) -> Result<Vec<TextSpan>> {
    split_references(spans, extract_images, |alt, url| TextSpan::image(alt, url))
}

pub fn split_links(spans: Vec<TextSpan>) -> Result<Vec<TextSpan>> {
    split_references(spans, extract_links, |text, url| TextSpan::link(text, url))
}

/// Walk each plain span with a byte cursor, emitting the text between
/// references as plain spans and each reference through `make`.
fn split_references(
    spans: Vec<TextSpan>,
    extract: fn(&str) -> Vec<Reference<'_>>,
    make: fn(&str, &str) -> TextSpan,
) -> Result<Vec<TextSpan>> {
    let mut result = Vec::with_capacity(spans.len());

    for span in spans {
        if span.kind != SpanKind::Plain {
            result.push(span);
            continue;
        }

        let text = span.text.as_str();
        let mut cursor = 0;
        for reference in extract(text) {
            let prefix = text.get(cursor..reference.start).ok_or_else(|| {
                Error::MalformedReference {
                    markup: text[reference.start..reference.end].to_string(),
                }
            })?;
            if !prefix.is_empty() {
                result.push(TextSpan::plain(prefix));
            }
            result.push(make(reference.text, reference.url));
            cursor = reference.end;
        }

        let rest = &text[cursor..];
        if !rest.is_empty() {
            result.push(TextSpan::plain(rest));
        }
    }

    Ok(result)
}
