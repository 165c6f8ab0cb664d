/// A small, flat Markdown to HTML tree converter for static site pipelines
pub mod ast;
pub mod config;
pub mod error;
pub mod inline;
pub mod page;
pub mod parser;
pub mod renderer;
pub mod span;

pub use ast::{Attributes, HtmlNode};
pub use error::{Error, Result};
pub use inline::parse_inline;
pub use parser::{BlockType, Parser, parse_document};
pub use span::{SpanKind, TextSpan, span_to_leaf};

use renderer::HtmlRenderer;

/// Parse markdown text and render to HTML
pub fn markdown_to_html(markdown: &str) -> Result<String> {
    let parser = Parser::new();
    let tree = parser.parse(markdown)?;
    let renderer = HtmlRenderer::new();
    renderer.render(&tree)
}

/// Convert CRLF line endings to LF so blank lines separate blocks
pub fn normalize_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n")
}
