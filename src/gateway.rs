//! Remote-first search façade.
//!
//! Every request is tried once against the remote search service when one is
//! configured. Any failure (transport, non-success status, undecodable body)
//! is logged and answered from the local index instead, so callers always get
//! a well-formed response.

use std::sync::Arc;

use crate::{
   Result,
   config::Config,
   error::Error,
   index::{IndexStore, RebuildReport},
   search::SearchEngine,
   types::{RepositoryMetadata, SearchFilters, SearchOptions, SearchResponse, SearchResult},
};

pub const SEARCH_PATH: &str = "/api/search";
pub const SUGGESTIONS_PATH: &str = "/api/search/suggestions";

#[async_trait::async_trait]
pub trait RemoteSearch: Send + Sync {
   async fn search(&self, options: &SearchOptions) -> Result<SearchResponse>;

   async fn suggestions(&self, partial: &str) -> Result<Vec<String>>;
}

#[async_trait::async_trait]
impl<T: RemoteSearch + ?Sized> RemoteSearch for Arc<T> {
   async fn search(&self, options: &SearchOptions) -> Result<SearchResponse> {
      (**self).search(options).await
   }

   async fn suggestions(&self, partial: &str) -> Result<Vec<String>> {
      (**self).suggestions(partial).await
   }
}

/// Search service reached over HTTP/JSON.
pub struct HttpRemote {
   client:   reqwest::Client,
   base_url: String,
}

impl HttpRemote {
   pub fn new(base_url: impl Into<String>) -> Self {
      Self::with_client(reqwest::Client::new(), base_url)
   }

   pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
      let base_url = base_url.into().trim_end_matches('/').to_string();
      Self { client, base_url }
   }

   pub fn base_url(&self) -> &str {
      &self.base_url
   }

   async fn decode<T: serde::de::DeserializeOwned>(
      op: &'static str,
      response: reqwest::Response,
   ) -> Result<T> {
      let status = response.status();
      if !status.is_success() {
         return Err(Error::RemoteStatus { op, status: status.as_u16() });
      }

      let body = response.bytes().await?;
      serde_json::from_slice(&body).map_err(|e| Error::RemoteDecode { op, reason: e.to_string() })
   }
}

#[async_trait::async_trait]
impl RemoteSearch for HttpRemote {
   async fn search(&self, options: &SearchOptions) -> Result<SearchResponse> {
      let response = self
         .client
         .post(format!("{}{SEARCH_PATH}", self.base_url))
         .json(options)
         .send()
         .await?;
      Self::decode("search", response).await
   }

   async fn suggestions(&self, partial: &str) -> Result<Vec<String>> {
      let response = self
         .client
         .get(format!("{}{SUGGESTIONS_PATH}", self.base_url))
         .query(&[("q", partial)])
         .send()
         .await?;
      Self::decode("suggestions", response).await
   }
}

pub struct SearchGateway {
   remote: Option<Arc<dyn RemoteSearch>>,
   local:  SearchEngine,
}

impl SearchGateway {
   /// Gateway that only ever answers from the local index.
   pub const fn local_only(local: SearchEngine) -> Self {
      Self { remote: None, local }
   }

   pub fn with_remote(local: SearchEngine, remote: Arc<dyn RemoteSearch>) -> Self {
      Self { remote: Some(remote), local }
   }

   pub fn from_config(config: &Config, index: Arc<IndexStore>) -> Self {
      let local = SearchEngine::new(index);
      match config.remote_url.as_deref().filter(|url| !url.is_empty()) {
         Some(url) => {
            tracing::debug!(remote = url, "remote search enabled");
            Self::with_remote(local, Arc::new(HttpRemote::new(url)))
         },
         None => Self::local_only(local),
      }
   }

   pub const fn local(&self) -> &SearchEngine {
      &self.local
   }

   pub fn has_remote(&self) -> bool {
      self.remote.is_some()
   }

   pub async fn search(&self, options: &SearchOptions) -> SearchResponse {
      if let Some(remote) = &self.remote {
         match remote.search(options).await {
            Ok(response) => return response,
            Err(e) => tracing::warn!(error = %e, "remote search failed, using local index"),
         }
      }
      self.local.search(options)
   }

   /// Remote suggestions are returned as the service sent them; local ones
   /// are capped at `limit`.
   pub async fn suggestions(&self, partial: &str, limit: usize) -> Vec<String> {
      if let Some(remote) = &self.remote {
         match remote.suggestions(partial).await {
            Ok(suggestions) => return suggestions,
            Err(e) => tracing::warn!(error = %e, "remote suggestions failed, using local index"),
         }
      }
      self.local.suggest(partial, limit)
   }

   pub async fn search_in_repository(&self, repository: &str, query: &str) -> Vec<SearchResult> {
      let options = SearchOptions::new(query).filters(SearchFilters {
         repositories: vec![repository.to_string()],
         ..Default::default()
      });
      self.search(&options).await.results
   }

   pub fn popular_terms(&self, limit: usize) -> Vec<String> {
      self.local.popular_terms(limit)
   }

   /// Entry point for the sync collaborator; the latest call wins.
   pub fn build_index(&self, repositories: &[RepositoryMetadata]) -> RebuildReport {
      self.local.index().rebuild(repositories)
   }
}
