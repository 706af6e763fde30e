//! Previous/next post lookup by publication date

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cms::{ContentRepository, Document, Ordering, Predicate, QueryOptions, Result};
use crate::content::Post;

const PUBLICATION_DATE: &str = "document.first_publication_date";

/// Reference to a neighbouring post. An absent uid means there is none.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdjacentPostRef {
    pub uid: Option<String>,
    pub title: Option<String>,
}

impl AdjacentPostRef {
    /// The "no such post" reference
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.uid.is_none()
    }

    fn from_document(document: &Document) -> Self {
        let post = Post::from_document(document);
        if post.uid.is_empty() {
            return Self::empty();
        }
        Self {
            uid: Some(post.uid),
            title: Some(post.title),
        }
    }
}

/// The chronological neighbours of a post
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdjacentPosts {
    pub prev: AdjacentPostRef,
    pub next: AdjacentPostRef,
}

/// Find the posts published just before and just after `publication_date`.
///
/// Nothing is queried in preview mode or for a post that was never
/// published; both references are empty then.
pub async fn resolve<R>(
    repo: &R,
    doc_type: &str,
    publication_date: Option<DateTime<Utc>>,
    preview: bool,
) -> Result<AdjacentPosts>
where
    R: ContentRepository + ?Sized,
{
    let date = match publication_date {
        Some(date) if !preview => date,
        _ => return Ok(AdjacentPosts::default()),
    };
    let of_type = Predicate::at("document.type", doc_type);

    let before = repo
        .query(
            &[of_type.clone(), Predicate::date_before(PUBLICATION_DATE, date)],
            &QueryOptions::new()
                .page_size(1)
                .order_by(Ordering::desc(PUBLICATION_DATE)),
        )
        .await?;
    let prev = before
        .results
        .first()
        .map(AdjacentPostRef::from_document)
        .unwrap_or_default();

    let after = repo
        .query(
            &[of_type, Predicate::date_after(PUBLICATION_DATE, date)],
            &QueryOptions::new()
                .page_size(2)
                .order_by(Ordering::asc(PUBLICATION_DATE)),
        )
        .await?;
    // The second match wins when present; the repository may report the
    // current post itself as the nearest later document on timestamp ties.
    let next = after
        .results
        .get(1)
        .or_else(|| after.results.first())
        .map(AdjacentPostRef::from_document)
        .unwrap_or_default();

    tracing::debug!(
        "Adjacent posts for {}: prev={:?} next={:?}",
        date,
        prev.uid,
        next.uid
    );
    Ok(AdjacentPosts { prev, next })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::MemoryRepository;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, d, 12, 0, 0).unwrap()
    }

    fn post(uid: &str, d: u32) -> Document {
        Document {
            id: format!("id-{}", uid),
            uid: Some(uid.to_string()),
            doc_type: "posts".to_string(),
            first_publication_date: Some(day(d)),
            last_publication_date: None,
            data: serde_json::json!({ "title": format!("Title {}", uid) }),
        }
    }

    fn uid(r: &AdjacentPostRef) -> Option<&str> {
        r.uid.as_deref()
    }

    #[tokio::test]
    async fn test_prev_is_closest_earlier_post() {
        let repo = MemoryRepository::new(vec![post("a", 1), post("b", 5), post("c", 10)]);
        let nav = resolve(&repo, "posts", Some(day(10)), false).await.unwrap();
        assert_eq!(uid(&nav.prev), Some("b"));
        assert_eq!(nav.prev.title.as_deref(), Some("Title b"));
        assert!(nav.next.is_empty());
    }

    #[tokio::test]
    async fn test_first_post_has_no_prev() {
        let repo = MemoryRepository::new(vec![post("a", 1), post("b", 5)]);
        let nav = resolve(&repo, "posts", Some(day(1)), false).await.unwrap();
        assert!(nav.prev.is_empty());
        assert!(nav.prev.title.is_none());
        assert_eq!(uid(&nav.next), Some("b"));
    }

    #[tokio::test]
    async fn test_next_prefers_second_later_result() {
        let repo = MemoryRepository::new(vec![post("a", 1), post("b", 5), post("c", 10)]);
        let nav = resolve(&repo, "posts", Some(day(1)), false).await.unwrap();
        assert_eq!(uid(&nav.next), Some("c"));
    }

    #[tokio::test]
    async fn test_other_document_types_are_ignored() {
        let mut page = post("about", 3);
        page.doc_type = "pages".to_string();
        let repo = MemoryRepository::new(vec![post("a", 1), page, post("b", 5)]);
        let nav = resolve(&repo, "posts", Some(day(5)), false).await.unwrap();
        assert_eq!(uid(&nav.prev), Some("a"));
    }

    #[tokio::test]
    async fn test_preview_skips_queries() {
        let repo = MemoryRepository::new(vec![post("a", 1), post("b", 5), post("c", 10)]);
        let nav = resolve(&repo, "posts", Some(day(5)), true).await.unwrap();
        assert_eq!(nav, AdjacentPosts::default());
        assert_eq!(repo.query_count(), 0);
    }

    #[tokio::test]
    async fn test_unpublished_post_has_no_neighbours() {
        let repo = MemoryRepository::new(vec![post("a", 1)]);
        let nav = resolve(&repo, "posts", None, false).await.unwrap();
        assert!(nav.prev.is_empty() && nav.next.is_empty());
        assert_eq!(repo.query_count(), 0);
    }
}
