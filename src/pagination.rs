//! "Load more" pagination over the post list

use serde::Serialize;

use crate::cms::{ContentRepository, Result, SearchResponse};
use crate::content::Post;

/// Posts loaded so far for one list view, plus the cursor to the next page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostPagination {
    /// `None` once the last page has been fetched
    pub next_page: Option<String>,

    /// Posts in fetch order: first page first, later pages appended
    pub results: Vec<Post>,
}

impl PostPagination {
    /// Build the initial state from the first page of a query
    pub fn from_response(response: SearchResponse) -> Self {
        Self {
            next_page: response.next_page,
            results: response.results.iter().map(Post::from_document).collect(),
        }
    }

    /// Whether another page can be loaded
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    /// Fetch the page behind `next_page` and append its posts.
    ///
    /// Returns the number of posts appended. Without a cursor this does
    /// nothing and returns 0. A failed fetch leaves the state untouched.
    pub async fn load_next_page<R>(&mut self, repo: &R) -> Result<usize>
    where
        R: ContentRepository + ?Sized,
    {
        let Some(cursor) = self.next_page.as_deref() else {
            tracing::debug!("No next page to load");
            return Ok(0);
        };

        let response = repo.fetch_page(cursor).await?;
        let appended = response.results.len();

        self.results
            .extend(response.results.iter().map(Post::from_document));
        self.next_page = response.next_page;

        tracing::debug!(
            "Loaded {} more posts ({} total, more: {})",
            appended,
            self.results.len(),
            self.has_more()
        );
        Ok(appended)
    }

    /// Follow cursors until the final page has been loaded
    pub async fn load_all<R>(&mut self, repo: &R) -> Result<()>
    where
        R: ContentRepository + ?Sized,
    {
        while self.has_more() {
            self.load_next_page(repo).await?;
        }
        Ok(())
    }
}

/// Load the next page into `current` and return the resulting state
pub async fn load_next_page<R>(repo: &R, mut current: PostPagination) -> Result<PostPagination>
where
    R: ContentRepository + ?Sized,
{
    current.load_next_page(repo).await?;
    Ok(current)
}
