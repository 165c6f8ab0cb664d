/// HTML node tree produced by the block parser
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::renderer::HtmlRenderer;

/// Ordered attribute list; rendered in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Attributes(Vec::new())
    }

    /// Set an attribute, replacing the value in place if the key already exists
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as ` key="value"` pairs, or nothing when empty
    pub fn to_html(&self) -> String {
        self.iter()
            .map(|(key, value)| format!(" {}=\"{}\"", key, value))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (key, value) in iter {
            attributes.insert(key, value);
        }
        attributes
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HtmlNode {
    /// Childless node; no tag means the content is emitted as raw text
    Leaf {
        tag: Option<String>,
        content: String,
        #[serde(default, skip_serializing_if = "Attributes::is_empty")]
        attributes: Attributes,
    },
    Parent {
        tag: String,
        children: Vec<HtmlNode>,
        #[serde(default, skip_serializing_if = "Attributes::is_empty")]
        attributes: Attributes,
    },
}

impl HtmlNode {
    pub fn leaf(tag: impl Into<String>, content: impl Into<String>) -> Self {
        HtmlNode::Leaf {
            tag: Some(tag.into()),
            content: content.into(),
            attributes: Attributes::new(),
        }
    }

    /// Raw text leaf without a surrounding tag
    pub fn text(content: impl Into<String>) -> Self {
        HtmlNode::Leaf {
            tag: None,
            content: content.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn parent(tag: impl Into<String>, children: Vec<HtmlNode>) -> Self {
        HtmlNode::Parent {
            tag: tag.into(),
            children,
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match &mut self {
            HtmlNode::Leaf { attributes, .. } | HtmlNode::Parent { attributes, .. } => {
                attributes.insert(key, value)
            }
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            HtmlNode::Leaf { tag, .. } => tag.as_deref(),
            HtmlNode::Parent { tag, .. } => Some(tag),
        }
    }

    pub fn attributes(&self) -> &Attributes {
        match self {
            HtmlNode::Leaf { attributes, .. } | HtmlNode::Parent { attributes, .. } => attributes,
        }
    }

    pub fn children(&self) -> &[HtmlNode] {
        match self {
            HtmlNode::Leaf { .. } => &[],
            HtmlNode::Parent { children, .. } => children,
        }
    }

    /// Serialize this node and all of its descendants.
    ///
    /// Fails if any leaf is empty, or any parent lacks a tag or children.
    pub fn to_html(&self) -> Result<String> {
        HtmlRenderer::new().render(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_attributes_render_in_insertion_order() {
        let attributes: Attributes = [
            ("href", "https://www.google.com"),
            ("target", "_blank"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            attributes.to_html(),
            " href=\"https://www.google.com\" target=\"_blank\""
        );
    }

    #[test]
    fn test_attributes_insert_replaces_existing_key() {
        let mut attributes = Attributes::new();
        attributes.insert("class", "a");
        attributes.insert("id", "x");
        attributes.insert("class", "b");
        assert_eq!(attributes.to_html(), " class=\"b\" id=\"x\"");
        assert_eq!(attributes.get("class"), Some("b"));
    }

    #[test]
    fn test_empty_attributes_render_nothing() {
        assert_eq!(Attributes::new().to_html(), "");
    }

    #[test]
    fn test_leaf_to_html_p() {
        let node = HtmlNode::leaf("p", "Hello, world!");
        assert_eq!(node.to_html().unwrap(), "<p>Hello, world!</p>");
    }

    #[test]
    fn test_leaf_without_tag_is_raw_text() {
        let node = HtmlNode::text("Just text");
        assert_eq!(node.to_html().unwrap(), "Just text");
    }

    #[test]
    fn test_leaf_with_attributes() {
        let node =
            HtmlNode::leaf("a", "Click me!").with_attribute("href", "https://www.google.com");
        assert_eq!(
            node.to_html().unwrap(),
            "<a href=\"https://www.google.com\">Click me!</a>"
        );
    }

    #[test]
    fn test_empty_leaf_fails() {
        assert_eq!(HtmlNode::leaf("b", "").to_html(), Err(Error::EmptyLeafContent));
    }

    #[test]
    fn test_to_html_with_grandchildren() {
        let grandchild = HtmlNode::leaf("b", "grandchild");
        let child = HtmlNode::parent("span", vec![grandchild]);
        let parent = HtmlNode::parent("div", vec![child]);
        assert_eq!(
            parent.to_html().unwrap(),
            "<div><span><b>grandchild</b></span></div>"
        );
    }

    #[test]
    fn test_to_html_with_multiple_children() {
        let node = HtmlNode::parent(
            "p",
            vec![
                HtmlNode::leaf("b", "Bold text"),
                HtmlNode::text("Normal text"),
                HtmlNode::leaf("i", "italic text"),
                HtmlNode::text("Normal text"),
            ],
        );
        assert_eq!(
            node.to_html().unwrap(),
            "<p><b>Bold text</b>Normal text<i>italic text</i>Normal text</p>"
        );
    }

    #[test]
    fn test_parent_with_props() {
        let node =
            HtmlNode::parent("div", vec![HtmlNode::text("x")]).with_attribute("class", "note");
        assert_eq!(node.to_html().unwrap(), "<div class=\"note\">x</div>");
    }

    #[test]
    fn test_parent_without_children_fails() {
        let node = HtmlNode::parent("ul", vec![]);
        assert_eq!(
            node.to_html(),
            Err(Error::NoChildren {
                tag: "ul".to_string()
            })
        );
    }

    #[test]
    fn test_parent_without_tag_fails() {
        let node = HtmlNode::parent("", vec![HtmlNode::text("x")]);
        assert_eq!(node.to_html(), Err(Error::MissingParentTag));
    }

    #[test]
    fn test_invalid_descendant_fails_whole_tree() {
        let node = HtmlNode::parent(
            "div",
            vec![
                HtmlNode::leaf("b", "fine"),
                HtmlNode::parent("p", vec![HtmlNode::text("")]),
            ],
        );
        assert_eq!(node.to_html(), Err(Error::EmptyLeafContent));
    }
}
