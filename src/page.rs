/// Full-page assembly from a template and a Markdown document
use tracing::debug;

use crate::error::{Error, Result};
use crate::parser::{BlockType, block_to_block_type, markdown_to_blocks, parse_document};

pub const TITLE_PLACEHOLDER: &str = "{{ Title }}";
pub const CONTENT_PLACEHOLDER: &str = "{{ Content }}";

pub const DEFAULT_TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>{{ Title }}</title>
</head>
<body>
<article>
{{ Content }}
</article>
</body>
</html>
"#;

/// Text of the first level-1 header in the document, taken from its first line
pub fn extract_title(markdown: &str) -> Result<String> {
    for block in markdown_to_blocks(markdown) {
        if block_to_block_type(block)? == BlockType::Header(1) {
            let first_line = block.lines().next().unwrap_or_default();
            return Ok(first_line[2..].trim().to_string());
        }
    }
    Err(Error::MissingTitle)
}

/// Render `markdown` and substitute it, with its title, into `template`
pub fn render_page(template: &str, markdown: &str) -> Result<String> {
    let title = extract_title(markdown)?;
    let content = parse_document(markdown)?.to_html()?;
    debug!(%title, bytes = content.len(), "rendering page");

    Ok(template
        .replace(TITLE_PLACEHOLDER, &title)
        .replace(CONTENT_PLACEHOLDER, &content))
}
