//! List posts in the content repository

use anyhow::{Context, Result};

use crate::generator::load_first_page;
use crate::helpers::site_date;
use crate::pagination::PostPagination;
use crate::Blog;

/// Print the post list as the first list page sees it, or every post
/// when `all` is set
pub async fn run(blog: &Blog, all: bool) -> Result<()> {
    let repo = blog.repository()?;
    let mut pagination = load_first_page(repo.as_ref(), &blog.config.cms)
        .await
        .context("Failed to query the post list")?;
    if all {
        pagination
            .load_all(repo.as_ref())
            .await
            .context("Failed to load more posts")?;
    }

    for line in format_listing(blog, &pagination) {
        println!("{}", line);
    }
    Ok(())
}

fn format_listing(blog: &Blog, pagination: &PostPagination) -> Vec<String> {
    let mut lines = vec![format!("Posts ({}):", pagination.results.len())];
    for post in &pagination.results {
        let date = post
            .first_publication_date
            .map(|d| site_date(&blog.config, &d, "YYYY-MM-DD"))
            .unwrap_or_else(|| "unpublished".to_string());
        lines.push(format!("  {} - {} [{}]", date, post.title, post.uid));
    }
    if pagination.has_more() {
        lines.push("  ... more posts available (use --all)".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::Post;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_format_listing() {
        let blog = Blog::with_config("/tmp/site".into(), SiteConfig::default());
        let pagination = PostPagination {
            next_page: Some("cursor".to_string()),
            results: vec![
                Post {
                    uid: "hooks".to_string(),
                    title: "Como utilizar Hooks".to_string(),
                    first_publication_date: Some(
                        Utc.with_ymd_and_hms(2021, 3, 15, 19, 25, 28).unwrap(),
                    ),
                    ..Default::default()
                },
                Post {
                    uid: "draft".to_string(),
                    title: "Draft".to_string(),
                    ..Default::default()
                },
            ],
        };

        assert_eq!(
            format_listing(&blog, &pagination),
            [
                "Posts (2):",
                "  2021-03-15 - Como utilizar Hooks [hooks]",
                "  unpublished - Draft [draft]",
                "  ... more posts available (use --all)",
            ]
        );
    }
}
