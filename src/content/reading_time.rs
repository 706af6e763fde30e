//! Reading time estimation

use super::rich_text;
use super::Post;

/// Reading speed used for every estimate
pub const WORDS_PER_MINUTE: usize = 200;

/// Number of words in a post's headings and bodies
pub fn word_count(post: &Post) -> usize {
    let text = post
        .content
        .iter()
        .flat_map(|block| [block.heading.clone(), rich_text::as_text(&block.body)])
        .collect::<Vec<_>>()
        .join(" ");

    text.split_whitespace().count()
}

/// Estimated reading time in whole minutes, rounded up. An empty post reads in 0 minutes.
pub fn estimate(post: &Post) -> u32 {
    word_count(post).div_ceil(WORDS_PER_MINUTE) as u32
}
