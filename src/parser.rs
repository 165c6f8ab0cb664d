/// Block-level Markdown parser
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::ast::HtmlNode;
use crate::error::{Error, Result};
use crate::inline::parse_inline;
use crate::span::TextSpan;

const MAX_HEADER_LEVEL: usize = 6;
const CODE_FENCE: &str = "```";

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("blank line pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Paragraph,
    Header(u8),
    Code,
    Quote,
    UnorderedList,
    OrderedList,
}

pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Parser
    }

    /// Parse a whole document into a `div` containing one node per block.
    ///
    /// Any failure aborts the whole document; no partial tree is returned.
    pub fn parse(&self, markdown: &str) -> Result<HtmlNode> {
        let blocks = markdown_to_blocks(markdown);
        debug!(blocks = blocks.len(), "parsing markdown document");

        let children = blocks
            .into_iter()
            .map(|block| self.parse_block(block))
            .collect::<Result<Vec<_>>>()?;

        Ok(HtmlNode::parent("div", children))
    }

    fn parse_block(&self, block: &str) -> Result<HtmlNode> {
        let block_type = block_to_block_type(block)?;
        trace!(?block_type, "classified block");

        match block_type {
            BlockType::Paragraph => self.parse_paragraph(block),
            BlockType::Header(level) => self.parse_header(block, level),
            BlockType::Code => self.parse_code_block(block),
            BlockType::Quote => self.parse_quote(block),
            BlockType::UnorderedList => self.parse_unordered_list(block),
            BlockType::OrderedList => self.parse_ordered_list(block),
        }
    }

    fn parse_paragraph(&self, block: &str) -> Result<HtmlNode> {
        let text = block.lines().collect::<Vec<_>>().join(" ");
        Ok(HtmlNode::parent("p", text_to_children(&text)?))
    }

    fn parse_header(&self, block: &str, level: u8) -> Result<HtmlNode> {
        // Skip the hashes and the single space after them
        let text = &block[level as usize + 1..];
        Ok(HtmlNode::parent(format!("h{}", level), text_to_children(text)?))
    }

    /// Code blocks keep their content literal; no inline parsing happens here
    fn parse_code_block(&self, block: &str) -> Result<HtmlNode> {
        let body = block
            .find('\n')
            .and_then(|newline| block.get(newline + 1..block.len() - CODE_FENCE.len()))
            .unwrap_or_default();

        let code = HtmlNode::parent("code", vec![TextSpan::plain(body).to_leaf()?]);
        Ok(HtmlNode::parent("pre", vec![code]))
    }

    fn parse_quote(&self, block: &str) -> Result<HtmlNode> {
        let mut stripped = Vec::new();
        for line in block.lines() {
            if !line.starts_with('>') {
                return Err(Error::InvalidQuoteSyntax {
                    line: line.to_string(),
                });
            }
            stripped.push(line.trim_start_matches('>').trim());
        }

        let text = stripped.join(" ");
        Ok(HtmlNode::parent("blockquote", text_to_children(&text)?))
    }

    fn parse_unordered_list(&self, block: &str) -> Result<HtmlNode> {
        let items = block
            .lines()
            .map(|line| {
                let text = line
                    .strip_prefix("- ")
                    .ok_or_else(|| Error::InvalidListSyntax {
                        line: line.to_string(),
                    })?;
                Ok(HtmlNode::parent("li", text_to_children(text)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(HtmlNode::parent("ul", items))
    }

    fn parse_ordered_list(&self, block: &str) -> Result<HtmlNode> {
        let items = block
            .lines()
            .map(|line| {
                // Numbering was already checked during classification
                let (_, text) = line
                    .split_once(". ")
                    .ok_or_else(|| Error::InvalidListSyntax {
                        line: line.to_string(),
                    })?;
                Ok(HtmlNode::parent("li", text_to_children(text)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(HtmlNode::parent("ol", items))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a Markdown document into a `div` rooted HTML tree
pub fn parse_document(markdown: &str) -> Result<HtmlNode> {
    Parser::new().parse(markdown)
}

/// Split a document into trimmed, non-empty blocks separated by blank lines
pub fn markdown_to_blocks(markdown: &str) -> Vec<&str> {
    BLANK_LINES
        .split(markdown)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect()
}

/// Classify a block; the first matching rule wins.
///
/// Quote and list blocks whose later lines break the pattern degrade to
/// paragraphs. A header marker with more than six `#` is an error.
pub fn block_to_block_type(block: &str) -> Result<BlockType> {
    if let Some(level) = header_level(block)? {
        return Ok(BlockType::Header(level));
    }

    if block.starts_with(CODE_FENCE)
        && block.ends_with(&format!("\n{}", CODE_FENCE))
        && block.lines().count() > 1
    {
        return Ok(BlockType::Code);
    }

    if block.starts_with('>') {
        if block.lines().all(|line| line.starts_with('>')) {
            return Ok(BlockType::Quote);
        }
        trace!("quote block has unmarked lines, treating as paragraph");
        return Ok(BlockType::Paragraph);
    }

    if block.starts_with("- ") {
        if block.lines().all(|line| line.starts_with("- ")) {
            return Ok(BlockType::UnorderedList);
        }
        trace!("unordered list has unmarked lines, treating as paragraph");
        return Ok(BlockType::Paragraph);
    }

    if block.starts_with("1. ") {
        let sequential = block
            .lines()
            .enumerate()
            .all(|(i, line)| line.starts_with(&format!("{}. ", i + 1)));
        if sequential {
            return Ok(BlockType::OrderedList);
        }
        trace!("ordered list is not numbered sequentially, treating as paragraph");
        return Ok(BlockType::Paragraph);
    }

    Ok(BlockType::Paragraph)
}

/// Returns the header level when the block opens with `#`s followed by a space
fn header_level(block: &str) -> Result<Option<u8>> {
    let hashes = block.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || !block[hashes..].starts_with(' ') {
        return Ok(None);
    }
    if hashes > MAX_HEADER_LEVEL {
        return Err(Error::InvalidHeaderSyntax { hashes });
    }
    Ok(Some(hashes as u8))
}

/// Run inline parsing over `text` and convert each span to a leaf node
fn text_to_children(text: &str) -> Result<Vec<HtmlNode>> {
    parse_inline(text)?
        .iter()
        .map(TextSpan::to_leaf)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn render(markdown: &str) -> String {
        parse_document(markdown).unwrap().to_html().unwrap()
    }

    #[test]
    fn test_markdown_to_blocks() {
        let md = "
This is **bolded** paragraph

This is another paragraph with _italic_ text and `code` here
This is the same paragraph on a new line

- This is a list
- with items
";
        assert_eq!(
            markdown_to_blocks(md),
            vec![
                "This is **bolded** paragraph",
                "This is another paragraph with _italic_ text and `code` here\nThis is the same paragraph on a new line",
                "- This is a list\n- with items",
            ]
        );
    }

    #[test]
    fn test_blank_line_runs_collapse() {
        assert_eq!(markdown_to_blocks("A\n\n\nB"), vec!["A", "B"]);
        assert_eq!(markdown_to_blocks("A\n\n\n\n\nB\n\n"), vec!["A", "B"]);
    }

    #[test]
    fn test_whitespace_only_document_has_no_blocks() {
        assert!(markdown_to_blocks("\n        \n\n        \n        ").is_empty());
    }

    #[rstest]
    #[case("# This is a header", BlockType::Header(1))]
    #[case("###### Six", BlockType::Header(6))]
    #[case("#NoSpace", BlockType::Paragraph)]
    #[case("```\nThis is code\n```", BlockType::Code)]
    #[case("```rust\nlet x = 1;\n```", BlockType::Code)]
    #[case("```not closed", BlockType::Paragraph)]
    #[case("> This is a quote", BlockType::Quote)]
    #[case(">one\n> two", BlockType::Quote)]
    #[case("> one\ntwo", BlockType::Paragraph)]
    #[case("- This is an unordered list item", BlockType::UnorderedList)]
    #[case("- a\n-b", BlockType::Paragraph)]
    #[case("1. This is an ordered list item", BlockType::OrderedList)]
    #[case("1. a\n2. b\n3. c", BlockType::OrderedList)]
    #[case("1. a\n3. b", BlockType::Paragraph)]
    #[case("2. starts late", BlockType::Paragraph)]
    #[case("This is a paragraph", BlockType::Paragraph)]
    fn test_block_to_block_type(#[case] block: &str, #[case] expected: BlockType) {
        assert_eq!(block_to_block_type(block), Ok(expected));
    }

    #[test]
    fn test_too_many_hashes_fails() {
        assert_eq!(
            block_to_block_type("####### Seven"),
            Err(Error::InvalidHeaderSyntax { hashes: 7 })
        );
        assert_eq!(
            parse_document("# ok\n\n####### Seven"),
            Err(Error::InvalidHeaderSyntax { hashes: 7 })
        );
    }

    #[test]
    fn test_paragraphs() {
        let md = "
This is **bolded** paragraph
text in a p
tag here

This is another paragraph with _italic_ text and `code` here

";
        assert_eq!(
            render(md),
            "<div><p>This is <b>bolded</b> paragraph text in a p tag here</p><p>This is another paragraph with <i>italic</i> text and <code>code</code> here</p></div>"
        );
    }

    #[test]
    fn test_headers() {
        assert_eq!(
            render("# Title\n\n### Sub **title**"),
            "<div><h1>Title</h1><h3>Sub <b>title</b></h3></div>"
        );
    }

    #[test]
    fn test_codeblock() {
        let md = "
```
This is text that _should_ remain
the **same** even with inline stuff
```
";
        assert_eq!(
            render(md),
            "<div><pre><code>This is text that _should_ remain\nthe **same** even with inline stuff\n</code></pre></div>"
        );
    }

    #[test]
    fn test_codeblock_with_info_string() {
        assert_eq!(
            render("```rust\nlet x = 1;\n```"),
            "<div><pre><code>let x = 1;\n</code></pre></div>"
        );
    }

    #[test]
    fn test_empty_codeblock_fails_on_serialize() {
        let tree = parse_document("```\n```").unwrap();
        assert_eq!(tree.to_html(), Err(Error::EmptyLeafContent));
    }

    #[test]
    fn test_quote() {
        assert_eq!(
            render("> This is a quote with **bold** text\n>and _italic_ text"),
            "<div><blockquote>This is a quote with <b>bold</b> text and <i>italic</i> text</blockquote></div>"
        );
    }

    #[test]
    fn test_unordered_list() {
        let md = "
- Item 1 with **bold** text
- Item 2 with _italic_ text
- Item 3 with `code` text
";
        assert_eq!(
            render(md),
            "<div><ul><li>Item 1 with <b>bold</b> text</li><li>Item 2 with <i>italic</i> text</li><li>Item 3 with <code>code</code> text</li></ul></div>"
        );
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(
            render("1. first\n2. second [link](/a)"),
            "<div><ol><li>first</li><li>second <a href=\"/a\">link</a></li></ol></div>"
        );
    }

    #[test]
    fn test_ordered_list_splits_on_first_marker() {
        assert_eq!(
            render("1. Mr. Smith\n2. b"),
            "<div><ol><li>Mr. Smith</li><li>b</li></ol></div>"
        );
    }

    #[test]
    fn test_non_sequential_list_degrades_to_paragraph() {
        assert_eq!(render("1. a\n3. b"), "<div><p>1. a 3. b</p></div>");
    }

    #[test]
    fn test_inline_error_aborts_document() {
        assert_eq!(
            parse_document("fine paragraph\n\n- item with **broken bold"),
            Err(Error::UnbalancedDelimiter {
                delimiter: "**".to_string()
            })
        );
    }

    #[test]
    fn test_unordered_list_rejects_unmarked_line() {
        assert_eq!(
            Parser::new().parse_unordered_list("- a\nb"),
            Err(Error::InvalidListSyntax {
                line: "b".to_string()
            })
        );
    }

    #[test]
    fn test_quote_rejects_unmarked_line() {
        assert_eq!(
            Parser::new().parse_quote("> a\nb"),
            Err(Error::InvalidQuoteSyntax {
                line: "b".to_string()
            })
        );
    }

    #[test]
    fn test_ordered_list_rejects_line_without_marker() {
        assert_eq!(
            Parser::new().parse_ordered_list("1. a\nno marker"),
            Err(Error::InvalidListSyntax {
                line: "no marker".to_string()
            })
        );
    }
}
