//! HTTP client for Prismic-compatible content APIs

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::OnceCell;
use url::Url;

use super::predicate::to_query;
use super::{CmsError, ContentRepository, Document, Predicate, QueryOptions, Result, SearchResponse};

/// API root description; only the refs matter here
#[derive(Debug, Deserialize)]
struct ApiInfo {
    #[serde(default)]
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

/// Content repository backed by the Prismic REST API (v2)
pub struct PrismicClient {
    http: Client,
    endpoint: Url,
    access_token: Option<String>,
    master_ref: OnceCell<String>,
}

impl PrismicClient {
    /// Create a client for an API endpoint such as
    /// `https://my-repo.cdn.prismic.io/api/v2`
    pub fn new(endpoint: &str, access_token: Option<String>) -> Result<Self> {
        let endpoint = Url::parse(endpoint.trim_end_matches('/'))?;
        Ok(Self {
            http: Client::new(),
            endpoint,
            access_token: access_token.filter(|t| !t.is_empty()),
            master_ref: OnceCell::new(),
        })
    }

    /// The ref of the currently published content, fetched once per client
    async fn master_ref(&self) -> Result<String> {
        let reference = self
            .master_ref
            .get_or_try_init(|| async {
                let info: ApiInfo = self.get_json(self.with_token(self.endpoint.clone())).await?;
                info.refs
                    .into_iter()
                    .find(|r| r.is_master_ref)
                    .map(|r| r.reference)
                    .ok_or(CmsError::MissingMasterRef)
            })
            .await?;
        Ok(reference.clone())
    }

    async fn search_url(&self, predicates: &[Predicate], options: &QueryOptions) -> Result<Url> {
        let reference = match &options.reference {
            Some(reference) => reference.clone(),
            None => self.master_ref().await?,
        };

        let mut url = Url::parse(&format!(
            "{}/documents/search",
            self.endpoint.as_str().trim_end_matches('/')
        ))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("ref", &reference);
            query.append_pair("q", &to_query(predicates));
            if !options.fetch.is_empty() {
                query.append_pair("fetch", &options.fetch.join(","));
            }
            if let Some(size) = options.page_size {
                query.append_pair("pageSize", &size.to_string());
            }
            if let Some(orderings) = options.orderings_param() {
                query.append_pair("orderings", &orderings);
            }
        }
        Ok(self.with_token(url))
    }

    fn with_token(&self, mut url: Url) -> Url {
        if let Some(token) = &self.access_token {
            if !url.query_pairs().any(|(key, _)| key == "access_token") {
                url.query_pairs_mut().append_pair("access_token", token);
            }
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", url.path());
        let response = self.http.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let mut url = url;
            url.set_query(None);
            return Err(CmsError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ContentRepository for PrismicClient {
    async fn query(
        &self,
        predicates: &[Predicate],
        options: &QueryOptions,
    ) -> Result<SearchResponse> {
        let url = self.search_url(predicates, options).await?;
        self.get_json(url).await
    }

    async fn fetch_page(&self, cursor: &str) -> Result<SearchResponse> {
        let url = Url::parse(cursor).map_err(|_| CmsError::InvalidCursor(cursor.to_string()))?;
        self.get_json(self.with_token(url)).await
    }

    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<Document> {
        let predicates = [Predicate::at(&format!("my.{}.uid", doc_type), uid)];
        let options = QueryOptions::new().page_size(1).reference(reference);

        let response = self.query(&predicates, &options).await?;
        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| CmsError::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }
}
