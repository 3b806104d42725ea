//! Comment model - a closed tagged union over comment kinds
//!
//! Each kind carries its own payload and validation. New kinds plug in by
//! adding a variant plus an arm in [`Comment::new`]; call sites dispatch
//! through the shared accessors and never match on kinds directly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{BarrageError, BarrageResult};

/// A validated, immutable user-submitted comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Comment {
    Text(TextComment),
    // Picture kind reserved; needs an upload story first
}

impl Comment {
    /// Build a comment from a kind tag and raw attributes.
    ///
    /// Fails with [`BarrageError::IllFormat`] when the kind is unknown or
    /// the attributes do not satisfy that kind's validation.
    pub fn new(kind: &str, attributes: &HashMap<String, String>) -> BarrageResult<Self> {
        match kind {
            "text" => TextComment::from_attributes(attributes).map(Comment::Text),
            _ => Err(BarrageError::IllFormat),
        }
    }

    /// Kind tag, e.g. `"text"`
    pub fn kind(&self) -> &'static str {
        match self {
            Comment::Text(_) => "text",
        }
    }

    /// Primary content of the comment
    pub fn content(&self) -> &str {
        match self {
            Comment::Text(c) => &c.text,
        }
    }

    /// Kind-specific presentation attributes
    pub fn attributes(&self) -> HashMap<String, String> {
        match self {
            Comment::Text(c) => {
                let mut attrs = HashMap::with_capacity(1);
                attrs.insert("color".to_string(), c.color.clone());
                attrs
            }
        }
    }
}

/// Plain text comment with a display color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextComment {
    pub text: String,
    pub color: String,
}

impl TextComment {
    pub fn new(text: impl Into<String>, color: impl Into<String>) -> Self {
        TextComment {
            text: text.into(),
            color: color.into(),
        }
    }

    /// Validate raw attributes: requires a non-empty `text` and a `color`.
    pub fn from_attributes(attributes: &HashMap<String, String>) -> BarrageResult<Self> {
        let text = attributes.get("text").ok_or(BarrageError::IllFormat)?;
        let color = attributes.get("color").ok_or(BarrageError::IllFormat)?;
        if text.is_empty() {
            return Err(BarrageError::IllFormat);
        }
        Ok(TextComment::new(text, color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_text_comment_ok() {
        let c = Comment::new("text", &attrs(&[("text", "hi"), ("color", "red")])).unwrap();
        assert_eq!(c.kind(), "text");
        assert_eq!(c.content(), "hi");
        assert_eq!(c.attributes().get("color").unwrap(), "red");
    }

    #[test]
    fn test_text_comment_missing_color() {
        let err = Comment::new("text", &attrs(&[("text", "hi")])).unwrap_err();
        assert_eq!(err, BarrageError::IllFormat);
    }

    #[test]
    fn test_text_comment_missing_text() {
        let err = Comment::new("text", &attrs(&[("color", "red")])).unwrap_err();
        assert_eq!(err, BarrageError::IllFormat);
    }

    #[test]
    fn test_text_comment_empty_text() {
        let err = Comment::new("text", &attrs(&[("text", ""), ("color", "red")])).unwrap_err();
        assert_eq!(err, BarrageError::IllFormat);
    }

    #[test]
    fn test_unknown_kind() {
        let err = Comment::new("hologram", &attrs(&[("text", "hi")])).unwrap_err();
        assert_eq!(err, BarrageError::IllFormat);
    }

    // Extra attributes beyond the required set are ignored, not rejected
    #[test]
    fn test_extra_attributes_ignored() {
        let c = Comment::new(
            "text",
            &attrs(&[("text", "hi"), ("color", "red"), ("size", "12")]),
        )
        .unwrap();
        assert_eq!(c.attributes().len(), 1);
    }
}
