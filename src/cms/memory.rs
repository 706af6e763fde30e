//! In-memory content repository loaded from a fixture file

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use super::{CmsError, ContentRepository, Document, Predicate, QueryOptions, Result, SearchResponse};

const CURSOR_PREFIX: &str = "memory://search/";
const DEFAULT_PAGE_SIZE: usize = 20;

/// Fixture layout: a search-response-shaped `results` list plus optional
/// draft documents keyed by preview ref
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Fixture {
    results: Vec<Document>,
    drafts: HashMap<String, Vec<Document>>,
}

/// A content repository answering queries from documents held in memory.
///
/// Cursors have the form `memory://search/<query>?page=<n>` and refer to
/// queries previously issued against the same repository.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    documents: Vec<Document>,
    drafts: HashMap<String, Vec<Document>>,
    queries: Mutex<Vec<(Vec<Predicate>, QueryOptions)>>,
}

impl MemoryRepository {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            ..Default::default()
        }
    }

    /// Load documents from a JSON fixture file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let fixture: Fixture = serde_json::from_str(&content)?;
        tracing::debug!(
            "Loaded {} documents from {:?}",
            fixture.results.len(),
            path.as_ref()
        );
        Ok(Self {
            documents: fixture.results,
            drafts: fixture.drafts,
            queries: Mutex::new(Vec::new()),
        })
    }

    /// Register draft revisions visible under a preview ref
    pub fn with_drafts(mut self, reference: &str, documents: Vec<Document>) -> Self {
        self.drafts.insert(reference.to_string(), documents);
        self
    }

    /// Number of predicate queries issued so far
    pub fn query_count(&self) -> usize {
        self.queries.lock().map(|q| q.len()).unwrap_or(0)
    }

    fn run(&self, id: usize, page: usize) -> Result<SearchResponse> {
        let (predicates, options) = {
            let queries = self
                .queries
                .lock()
                .map_err(|_| CmsError::InvalidCursor(format!("query {}", id)))?;
            queries
                .get(id)
                .cloned()
                .ok_or_else(|| CmsError::InvalidCursor(format!("{}{}?page={}", CURSOR_PREFIX, id, page)))?
        };

        let mut matches: Vec<&Document> = self
            .documents
            .iter()
            .filter(|doc| predicates.iter().all(|p| p.matches(doc)))
            .collect();
        for ordering in options.orderings.iter().rev() {
            matches.sort_by(|a, b| ordering.compare(a, b));
        }

        let page_size = options.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let total = matches.len();
        let total_pages = total.div_ceil(page_size);
        let cursor = |n: usize| format!("{}{}?page={}", CURSOR_PREFIX, id, n);
        if page > total_pages.max(1) {
            return Err(CmsError::InvalidCursor(cursor(page)));
        }
        let results: Vec<Document> = matches
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .map(|doc| select_fields(doc, &options.fetch))
            .collect();

        Ok(SearchResponse {
            page: page as u32,
            results_per_page: page_size as u32,
            results_size: results.len() as u32,
            total_results_size: total as u32,
            total_pages: total_pages as u32,
            next_page: (page < total_pages).then(|| cursor(page + 1)),
            prev_page: (page > 1).then(|| cursor(page - 1)),
            results,
        })
    }
}

#[async_trait]
impl ContentRepository for MemoryRepository {
    async fn query(
        &self,
        predicates: &[Predicate],
        options: &QueryOptions,
    ) -> Result<SearchResponse> {
        let id = {
            let mut queries = self
                .queries
                .lock()
                .map_err(|_| CmsError::InvalidCursor("query log poisoned".to_string()))?;
            queries.push((predicates.to_vec(), options.clone()));
            queries.len() - 1
        };
        self.run(id, 1)
    }

    async fn fetch_page(&self, cursor: &str) -> Result<SearchResponse> {
        let invalid = || CmsError::InvalidCursor(cursor.to_string());
        let rest = cursor.strip_prefix(CURSOR_PREFIX).ok_or_else(invalid)?;
        let (id, page) = rest.split_once("?page=").ok_or_else(invalid)?;
        let id: usize = id.parse().map_err(|_| invalid())?;
        let page: usize = page.parse().map_err(|_| invalid())?;
        if page == 0 {
            return Err(invalid());
        }
        self.run(id, page)
    }

    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<Document> {
        let is_match =
            |doc: &&Document| doc.doc_type == doc_type && doc.uid.as_deref() == Some(uid);

        let draft = reference
            .and_then(|r| self.drafts.get(r))
            .and_then(|drafts| drafts.iter().find(is_match));

        draft
            .or_else(|| self.documents.iter().find(is_match))
            .cloned()
            .ok_or_else(|| CmsError::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }
}

/// Keep only the requested `<type>.<field>` data fields
fn select_fields(document: &Document, fetch: &[String]) -> Document {
    let mut document = document.clone();
    if fetch.is_empty() {
        return document;
    }
    if let serde_json::Value::Object(data) = &mut document.data {
        let prefix = format!("{}.", document.doc_type);
        data.retain(|key, _| {
            fetch
                .iter()
                .any(|f| f.strip_prefix(&prefix).is_some_and(|field| field == key))
        });
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::Ordering;
    use chrono::{TimeZone, Utc};
    use std::io::Write;

    fn post(uid: &str, day: u32) -> Document {
        Document {
            id: format!("id-{}", uid),
            uid: Some(uid.to_string()),
            doc_type: "posts".to_string(),
            first_publication_date: Some(Utc.with_ymd_and_hms(2021, 3, day, 12, 0, 0).unwrap()),
            last_publication_date: None,
            data: serde_json::json!({ "title": uid, "author": "Joseph", "content": [] }),
        }
    }

    fn repo() -> MemoryRepository {
        MemoryRepository::new(vec![post("a", 1), post("b", 2), post("c", 3), post("d", 4), post("e", 5)])
    }

    #[tokio::test]
    async fn test_query_pages_follow_cursors() {
        let repo = repo();
        let options = QueryOptions::new().page_size(2);
        let first = repo
            .query(&[Predicate::at("document.type", "posts")], &options)
            .await
            .unwrap();
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.results.len(), 2);
        assert!(first.prev_page.is_none());

        let second = repo.fetch_page(first.next_page.as_deref().unwrap()).await.unwrap();
        assert_eq!(second.page, 2);
        let third = repo.fetch_page(second.next_page.as_deref().unwrap()).await.unwrap();
        assert_eq!(third.results.len(), 1);
        assert!(third.next_page.is_none());
        assert_eq!(third.results[0].uid.as_deref(), Some("e"));
    }

    #[tokio::test]
    async fn test_query_ordering_and_field_selection() {
        let repo = repo();
        let options = QueryOptions::new()
            .fetch(["posts.title"])
            .order_by(Ordering::desc("document.first_publication_date"));
        let response = repo.query(&[], &options).await.unwrap();

        let uids: Vec<_> = response.results.iter().filter_map(|d| d.uid.clone()).collect();
        assert_eq!(uids, ["e", "d", "c", "b", "a"]);
        let data = response.results[0].data.as_object().unwrap();
        assert!(data.contains_key("title"));
        assert!(!data.contains_key("author"));
    }

    #[tokio::test]
    async fn test_get_by_uid_prefers_draft_under_ref() {
        let mut draft = post("b", 2);
        draft.data["title"] = serde_json::json!("b (draft)");
        let repo = repo().with_drafts("preview-ref", vec![draft]);

        let published = repo.get_by_uid("posts", "b", None).await.unwrap();
        assert_eq!(published.data["title"], "b");
        let preview = repo.get_by_uid("posts", "b", Some("preview-ref")).await.unwrap();
        assert_eq!(preview.data["title"], "b (draft)");

        let err = repo.get_by_uid("posts", "zzz", None).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_invalid_cursors() {
        let repo = repo();
        repo.query(&[], &QueryOptions::new().page_size(2)).await.unwrap();
        for cursor in [
            "https://example.com",
            "memory://search/7?page=1",
            "memory://search/x?page=1",
            "memory://search/0?page=0",
            "memory://search/0?page=18446744073709551615",
            "memory://search/0?page=99",
        ] {
            assert!(matches!(
                repo.fetch_page(cursor).await,
                Err(CmsError::InvalidCursor(_))
            ));
        }
    }

    #[test]
    fn test_load_fixture_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "results": [
                    {{ "id": "1", "uid": "hello", "type": "posts",
                       "first_publication_date": "2021-03-25T19:25:28+0000",
                       "data": {{ "title": "Hello" }} }}
                ],
                "drafts": {{ "draft-ref": [] }}
            }}"#
        )
        .unwrap();

        let repo = MemoryRepository::load(file.path()).unwrap();
        assert_eq!(repo.documents.len(), 1);
        assert!(repo.drafts.contains_key("draft-ref"));
        assert_eq!(repo.query_count(), 0);
    }
}
