//! Rich text blocks as authored in the CMS

use serde::{Deserialize, Deserializer, Serialize};

/// One structural block of rich text (paragraph, heading, list item, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichTextBlock {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub block_type: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,

    /// Inline formatting ranges, kept as authored
    #[serde(default, deserialize_with = "null_as_default")]
    pub spans: Vec<serde_json::Value>,
}

impl RichTextBlock {
    /// A plain paragraph block
    pub fn paragraph(text: &str) -> Self {
        Self {
            block_type: "paragraph".to_string(),
            text: text.to_string(),
            spans: Vec::new(),
        }
    }

    /// HTML element used to render this block
    pub fn tag(&self) -> &'static str {
        match self.block_type.as_str() {
            "heading1" => "h1",
            "heading2" => "h2",
            "heading3" => "h3",
            "heading4" => "h4",
            "heading5" => "h5",
            "heading6" => "h6",
            "list-item" | "o-list-item" => "li",
            "preformatted" => "pre",
            _ => "p",
        }
    }
}

/// Parse a rich text field.
///
/// Accepts the usual array of block objects; a bare string becomes a single
/// paragraph. Entries that are not objects are skipped.
pub fn parse_blocks(value: &serde_json::Value) -> Vec<RichTextBlock> {
    match value {
        serde_json::Value::Array(items) => items
            .iter()
            .filter(|item| item.is_object())
            .filter_map(|item| match serde_json::from_value(item.clone()) {
                Ok(block) => Some(block),
                Err(e) => {
                    tracing::warn!("Skipping malformed rich text block {}: {}", item, e);
                    None
                }
            })
            .collect(),
        serde_json::Value::String(text) if !text.trim().is_empty() => {
            vec![RichTextBlock::paragraph(text)]
        }
        _ => Vec::new(),
    }
}

/// Flatten rich text to plain words.
///
/// Every block contributes its text with whitespace runs collapsed; blocks
/// are joined by a single space and empty blocks are dropped.
pub fn as_text(blocks: &[RichTextBlock]) -> String {
    blocks
        .iter()
        .map(|block| collapse_whitespace(&block.text))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain text of a field that may be either a string or rich text
pub fn field_text(value: &serde_json::Value) -> Option<String> {
    let text = match value {
        serde_json::Value::String(s) => collapse_whitespace(s),
        serde_json::Value::Array(_) => as_text(&parse_blocks(value)),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// CMS fields left blank arrive as `null`
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_blocks() {
        let value = json!([
            { "type": "paragraph", "text": "Lorem ipsum", "spans": [{ "start": 0, "end": 5, "type": "strong" }] },
            "stray string",
            { "type": "list-item", "text": "item" }
        ]);
        let blocks = parse_blocks(&value);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].spans.len(), 1);
        assert_eq!(blocks[1].tag(), "li");

        assert_eq!(parse_blocks(&json!("just text")), vec![RichTextBlock::paragraph("just text")]);
        assert!(parse_blocks(&json!(null)).is_empty());
    }

    #[test]
    fn test_null_fields_keep_the_block() {
        let value = json!([
            { "type": null, "text": "kept words", "spans": null },
            { "type": "paragraph", "text": null },
            { "type": "paragraph", "text": 42 }
        ]);
        let blocks = parse_blocks(&value);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].tag(), "p");
        assert_eq!(blocks[0].text, "kept words");
        assert_eq!(blocks[1].text, "");
        assert_eq!(as_text(&blocks), "kept words");
    }

    #[test]
    fn test_as_text_flattens_blocks() {
        let blocks = vec![
            RichTextBlock::paragraph("  Lorem\n ipsum  "),
            RichTextBlock::paragraph(""),
            RichTextBlock {
                block_type: "heading2".to_string(),
                text: "dolor\tsit".to_string(),
                spans: Vec::new(),
            },
        ];
        assert_eq!(as_text(&blocks), "Lorem ipsum dolor sit");
        assert_eq!(as_text(&[]), "");
    }

    #[test]
    fn test_field_text() {
        assert_eq!(field_text(&json!("Hooks")), Some("Hooks".to_string()));
        assert_eq!(
            field_text(&json!([{ "type": "heading1", "text": "Hooks" }])),
            Some("Hooks".to_string())
        );
        assert_eq!(field_text(&json!("   ")), None);
        assert_eq!(field_text(&json!(42)), None);
    }
}
