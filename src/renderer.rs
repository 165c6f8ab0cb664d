/// HTML renderer for the node tree
use crate::ast::HtmlNode;
use crate::error::{Error, Result};

pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        HtmlRenderer
    }

    pub fn render(&self, node: &HtmlNode) -> Result<String> {
        let mut out = String::new();
        render_node(node, &mut out)?;
        Ok(out)
    }

    /// Dump the tree itself as pretty-printed JSON
    pub fn render_json(&self, node: &HtmlNode) -> serde_json::Result<String> {
        serde_json::to_string_pretty(node)
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_node(node: &HtmlNode, out: &mut String) -> Result<()> {
    match node {
        HtmlNode::Leaf {
            tag,
            content,
            attributes,
        } => {
            if content.is_empty() {
                return Err(Error::EmptyLeafContent);
            }
            match tag {
                None => out.push_str(content),
                Some(tag) => {
                    out.push_str(&format!(
                        "<{}{}>{}</{}>",
                        tag,
                        attributes.to_html(),
                        content,
                        tag
                    ));
                }
            }
        }
        HtmlNode::Parent {
            tag,
            children,
            attributes,
        } => {
            if tag.is_empty() {
                return Err(Error::MissingParentTag);
            }
            if children.is_empty() {
                return Err(Error::NoChildren { tag: tag.clone() });
            }
            out.push_str(&format!("<{}{}>", tag, attributes.to_html()));
            for child in children {
                render_node(child, out)?;
            }
            out.push_str(&format!("</{}>", tag));
        }
    }
    Ok(())
}
