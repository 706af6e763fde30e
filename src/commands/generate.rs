//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Fetch every post from the content repository and render the site
pub async fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let repo = blog.repository()?;
    let generator = Generator::new(blog)?;
    let summary = generator.generate(repo.as_ref()).await?;

    if summary.skipped > 0 {
        tracing::warn!("Skipped {} posts", summary.skipped);
    }
    tracing::info!(
        "Generated {} list pages and {} posts in {:.2}s",
        summary.list_pages,
        summary.posts,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_generate_from_fixtures() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "cms:\n  fixtures: posts.json\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("posts.json"),
            r#"{
              "results": [{
                "id": "1",
                "uid": "hello",
                "type": "posts",
                "first_publication_date": "2021-03-15T19:25:28+0000",
                "last_publication_date": "2021-03-15T19:25:28+0000",
                "data": { "title": "Hello", "author": "Joseph", "content": [] }
              }]
            }"#,
        )
        .unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        run(&blog).await.unwrap();

        let index = fs::read_to_string(blog.public_dir.join("index.html")).unwrap();
        assert!(index.contains("Hello"));
        assert!(blog.public_dir.join("post/hello/index.html").exists());
        assert!(blog.public_dir.join("404.html").exists());
    }
}
