//! Content module - post records assembled from CMS documents

mod post;
pub mod reading_time;
pub mod rich_text;

pub use post::{ContentBlock, Post};
pub use rich_text::RichTextBlock;
