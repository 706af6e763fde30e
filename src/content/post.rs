//! Post records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rich_text::{self, RichTextBlock};
use crate::cms::Document;

/// A titled section of a post
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub heading: String,
    pub body: Vec<RichTextBlock>,
}

/// A blog post, normalized from a CMS document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Identifier used in the post route
    pub uid: String,

    pub first_publication_date: Option<DateTime<Utc>>,

    pub last_publication_date: Option<DateTime<Utc>>,

    pub title: String,

    pub subtitle: Option<String>,

    pub author: String,

    pub banner_url: Option<String>,

    /// Sections in authoring order
    pub content: Vec<ContentBlock>,
}

impl Post {
    /// Project a document onto the fields the blog displays.
    ///
    /// Never fails: absent or mistyped fields become `None`, empty strings
    /// or an empty content list.
    pub fn from_document(document: &Document) -> Self {
        let data = &document.data;

        let content = data
            .get("content")
            .and_then(|v| v.as_array())
            .map(|blocks| {
                blocks
                    .iter()
                    .filter(|block| block.is_object())
                    .map(|block| ContentBlock {
                        heading: block
                            .get("heading")
                            .and_then(rich_text::field_text)
                            .unwrap_or_default(),
                        body: block
                            .get("body")
                            .map(rich_text::parse_blocks)
                            .unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            uid: document.uid.clone().unwrap_or_default(),
            first_publication_date: document.first_publication_date,
            last_publication_date: document.last_publication_date,
            title: text(data, "title").unwrap_or_default(),
            subtitle: text(data, "subtitle"),
            author: text(data, "author").unwrap_or_default(),
            banner_url: data
                .get("banner")
                .and_then(|banner| banner.get("url"))
                .and_then(|url| url.as_str())
                .filter(|url| !url.is_empty())
                .map(str::to_string),
            content,
        }
    }

    /// Whether the post was republished after its first publication
    pub fn was_edited(&self) -> bool {
        match (self.first_publication_date, self.last_publication_date) {
            (Some(first), Some(last)) => last > first,
            _ => false,
        }
    }
}

fn text(data: &serde_json::Value, key: &str) -> Option<String> {
    data.get(key).and_then(rich_text::field_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::parse_timestamp;
    use serde_json::json;

    fn document(data: serde_json::Value) -> Document {
        Document {
            id: "YF0".to_string(),
            uid: Some("como-utilizar-hooks".to_string()),
            doc_type: "posts".to_string(),
            first_publication_date: parse_timestamp("2021-03-15T19:25:28+0000").ok(),
            last_publication_date: parse_timestamp("2021-03-25T19:25:28+0000").ok(),
            data,
        }
    }

    #[test]
    fn test_from_full_document() {
        let doc = document(json!({
            "title": "Como utilizar Hooks",
            "subtitle": "Pensando em sincronização em vez de ciclos de vida",
            "author": "Joseph Oliveira",
            "banner": { "url": "https://images.prismic.io/banner.png" },
            "content": [
                {
                    "heading": "Proin et varius",
                    "body": [
                        { "type": "paragraph", "text": "Nullam dolor sapien", "spans": [] },
                        { "type": "list-item", "text": "Ut venenatis", "spans": [] }
                    ]
                },
                { "heading": "Cras laoreet", "body": [] }
            ]
        }));

        let post = Post::from_document(&doc);
        assert_eq!(post.uid, "como-utilizar-hooks");
        assert_eq!(post.title, "Como utilizar Hooks");
        assert_eq!(post.author, "Joseph Oliveira");
        assert_eq!(post.banner_url.as_deref(), Some("https://images.prismic.io/banner.png"));
        assert_eq!(post.content.len(), 2);
        assert_eq!(post.content[0].heading, "Proin et varius");
        assert_eq!(post.content[0].body.len(), 2);
        assert_eq!(post.content[1].heading, "Cras laoreet");
        assert!(post.was_edited());
    }

    #[test]
    fn test_missing_banner_and_subtitle() {
        let doc = document(json!({ "title": "Hooks", "author": "Joseph" }));
        let post = Post::from_document(&doc);
        assert_eq!(post.title, "Hooks");
        assert!(post.subtitle.is_none());
        assert!(post.banner_url.is_none());
        assert!(post.content.is_empty());
    }

    #[test]
    fn test_malformed_fields_default() {
        let doc = Document {
            uid: None,
            data: json!({
                "title": 7,
                "banner": "not-an-object",
                "subtitle": "",
                "content": [ "oops", { "heading": null, "body": "plain body" } ]
            }),
            ..Default::default()
        };

        let post = Post::from_document(&doc);
        assert_eq!(post.uid, "");
        assert_eq!(post.title, "");
        assert!(post.subtitle.is_none());
        assert!(post.banner_url.is_none());
        assert_eq!(post.content.len(), 1);
        assert_eq!(post.content[0].heading, "");
        assert_eq!(post.content[0].body, vec![RichTextBlock::paragraph("plain body")]);
        assert!(!post.was_edited());
    }

    #[test]
    fn test_null_data() {
        let post = Post::from_document(&Document::default());
        assert_eq!(post, Post::default());
    }
}
