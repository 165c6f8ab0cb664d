/// Typed inline text spans and their conversion to leaf nodes
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ast::HtmlNode;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Plain,
    Bold,
    Italic,
    Code,
    Link,
    Image,
}

impl SpanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanKind::Plain => "plain",
            SpanKind::Bold => "bold",
            SpanKind::Italic => "italic",
            SpanKind::Code => "code",
            SpanKind::Link => "link",
            SpanKind::Image => "image",
        }
    }
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpanKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "plain" | "text" => Ok(SpanKind::Plain),
            "bold" => Ok(SpanKind::Bold),
            "italic" => Ok(SpanKind::Italic),
            "code" => Ok(SpanKind::Code),
            "link" => Ok(SpanKind::Link),
            "image" => Ok(SpanKind::Image),
            other => Err(Error::UnknownSpanKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
    pub kind: SpanKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, kind: SpanKind) -> Self {
        TextSpan {
            text: text.into(),
            kind,
            target: None,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, SpanKind::Plain)
    }

    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        TextSpan {
            text: text.into(),
            kind: SpanKind::Link,
            target: Some(url.into()),
        }
    }

    pub fn image(alt: impl Into<String>, url: impl Into<String>) -> Self {
        TextSpan {
            text: alt.into(),
            kind: SpanKind::Image,
            target: Some(url.into()),
        }
    }

    fn target_url(&self) -> Result<&str> {
        match self.target.as_deref() {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(Error::MissingTarget { kind: self.kind }),
        }
    }

    /// Convert this span into a single leaf node
    pub fn to_leaf(&self) -> Result<HtmlNode> {
        let node = match self.kind {
            SpanKind::Plain => HtmlNode::text(&self.text),
            SpanKind::Bold => HtmlNode::leaf("b", &self.text),
            SpanKind::Italic => HtmlNode::leaf("i", &self.text),
            SpanKind::Code => HtmlNode::leaf("code", &self.text),
            SpanKind::Link => {
                HtmlNode::leaf("a", &self.text).with_attribute("href", self.target_url()?)
            }
            SpanKind::Image => {
                HtmlNode::leaf("img", &self.text).with_attribute("src", self.target_url()?)
            }
        };
        Ok(node)
    }
}

/// Convert a span into its leaf node
pub fn span_to_leaf(span: &TextSpan) -> Result<HtmlNode> {
    span.to_leaf()
}
