//! Content repository access
//!
//! The blog never stores posts itself: every list and post page is built
//! from documents returned by a headless CMS. [`ContentRepository`] is the
//! seam between the generator and the CMS; [`PrismicClient`] talks to a
//! Prismic-compatible REST API and [`MemoryRepository`] answers the same
//! queries from a local fixture file.

mod client;
mod document;
mod error;
mod memory;
mod predicate;

pub use client::PrismicClient;
pub use document::{parse_timestamp, Document, SearchResponse};
pub use error::{CmsError, Result};
pub use memory::MemoryRepository;
pub use predicate::{Ordering, Predicate, QueryOptions};

use async_trait::async_trait;

/// Query interface of a headless content repository
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Run a predicate query and return the first page of matches
    async fn query(&self, predicates: &[Predicate], options: &QueryOptions)
        -> Result<SearchResponse>;

    /// Follow a `next_page` cursor returned by an earlier response
    async fn fetch_page(&self, cursor: &str) -> Result<SearchResponse>;

    /// Fetch one document of `doc_type` by uid, optionally from a draft ref
    async fn get_by_uid(&self, doc_type: &str, uid: &str, reference: Option<&str>)
        -> Result<Document>;
}
