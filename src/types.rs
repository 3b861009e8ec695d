use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
   Repository,
   File,
   Api,
   Content,
}

impl EntryKind {
   pub const fn as_str(self) -> &'static str {
      match self {
         Self::Repository => "repository",
         Self::File => "file",
         Self::Api => "api",
         Self::Content => "content",
      }
   }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiType {
   Rest,
   Graphql,
   Grpc,
}

impl ApiType {
   pub const fn as_str(self) -> &'static str {
      match self {
         Self::Rest => "rest",
         Self::Graphql => "graphql",
         Self::Grpc => "grpc",
      }
   }
}

/// An API specification file found in a repository checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSpec {
   pub path:     String,
   pub api_type: ApiType,
}

/// Repository record handed over by the sync collaborator.
///
/// Fields the engine does not index (marketing copy and the like) are
/// accepted on input and dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryMetadata {
   pub name:          String,
   #[serde(default)]
   pub description:   String,
   #[serde(default)]
   pub owner:         String,
   #[serde(default)]
   pub url:           String,
   #[serde(default)]
   pub is_private:    bool,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub language:      Option<String>,
   #[serde(default)]
   pub topics:        Vec<String>,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub last_updated:  Option<DateTime<Utc>>,
   #[serde(default)]
   pub has_api_docs:  bool,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub sync_status:   Option<String>,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub readme:        Option<String>,
   #[serde(default, skip_serializing_if = "Vec::is_empty")]
   pub api_specs:     Vec<ApiSpec>,
}

/// Kind-specific attributes of an index entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryAttrs {
   Repository {
      language:     Option<String>,
      topics:       Vec<String>,
      has_api_docs: bool,
      last_updated: Option<DateTime<Utc>>,
      description:  Option<String>,
   },
   File {
      path:         String,
      last_updated: Option<DateTime<Utc>>,
   },
   Api {
      path:         String,
      api_type:     ApiType,
      last_updated: Option<DateTime<Utc>>,
   },
   Content {
      path: Option<String>,
   },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
   pub id:         String,
   pub repository: String,
   pub title:      String,
   pub content:    String,
   pub tokens:     Vec<String>,
   pub attrs:      EntryAttrs,
}

impl IndexEntry {
   pub const fn kind(&self) -> EntryKind {
      match self.attrs {
         EntryAttrs::Repository { .. } => EntryKind::Repository,
         EntryAttrs::File { .. } => EntryKind::File,
         EntryAttrs::Api { .. } => EntryKind::Api,
         EntryAttrs::Content { .. } => EntryKind::Content,
      }
   }

   pub fn path(&self) -> Option<&str> {
      match &self.attrs {
         EntryAttrs::File { path, .. } | EntryAttrs::Api { path, .. } => Some(path),
         EntryAttrs::Content { path } => path.as_deref(),
         EntryAttrs::Repository { .. } => None,
      }
   }

   pub fn language(&self) -> Option<&str> {
      match &self.attrs {
         EntryAttrs::Repository { language, .. } => language.as_deref(),
         _ => None,
      }
   }

   pub fn topics(&self) -> &[String] {
      match &self.attrs {
         EntryAttrs::Repository { topics, .. } => topics,
         _ => &[],
      }
   }

   pub fn has_api_docs(&self) -> Option<bool> {
      match self.attrs {
         EntryAttrs::Repository { has_api_docs, .. } => Some(has_api_docs),
         _ => None,
      }
   }

   pub fn api_type(&self) -> Option<ApiType> {
      match self.attrs {
         EntryAttrs::Api { api_type, .. } => Some(api_type),
         _ => None,
      }
   }

   pub fn last_updated(&self) -> Option<DateTime<Utc>> {
      match self.attrs {
         EntryAttrs::Repository { last_updated, .. }
         | EntryAttrs::File { last_updated, .. }
         | EntryAttrs::Api { last_updated, .. } => last_updated,
         EntryAttrs::Content { .. } => None,
      }
   }

   pub fn description(&self) -> Option<&str> {
      match &self.attrs {
         EntryAttrs::Repository { description, .. } => description.as_deref(),
         _ => None,
      }
   }

   /// Lower-cased extension of a file entry's path.
   pub fn file_type(&self) -> Option<String> {
      let EntryAttrs::File { path, .. } = &self.attrs else {
         return None;
      };
      Path::new(path)
         .extension()
         .and_then(|ext| ext.to_str())
         .map(str::to_ascii_lowercase)
   }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
   #[default]
   All,
   Repositories,
   Documentation,
   Apis,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
   #[default]
   Relevance,
   Name,
   Updated,
   Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
   Asc,
   Desc,
}

/// Attribute filters; an empty list means the filter was not supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
   #[serde(default, skip_serializing_if = "Vec::is_empty")]
   pub repositories:   Vec<String>,
   #[serde(default, skip_serializing_if = "Vec::is_empty")]
   pub languages:      Vec<String>,
   #[serde(default, deserialize_with = "known_api_types", skip_serializing_if = "Vec::is_empty")]
   pub api_types:      Vec<ApiType>,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub has_api_docs:   Option<bool>,
   #[serde(default, skip_serializing_if = "Vec::is_empty")]
   pub topics:         Vec<String>,
   #[serde(default, skip_serializing_if = "Vec::is_empty")]
   pub file_types:     Vec<String>,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub updated_after:  Option<DateTime<Utc>>,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub updated_before: Option<DateTime<Utc>>,
}

/// Decodes `T`, falling back to its default when the value is not one `T`
/// understands.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
   D: Deserializer<'de>,
   T: DeserializeOwned + Default,
{
   let value = Value::deserialize(deserializer)?;
   Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Api types the engine knows; anything else is dropped from the filter.
fn known_api_types<'de, D>(deserializer: D) -> Result<Vec<ApiType>, D::Error>
where
   D: Deserializer<'de>,
{
   let values: Vec<Value> = or_default(deserializer)?;
   Ok(values
      .into_iter()
      .filter_map(|value| serde_json::from_value(value).ok())
      .collect())
}

pub const DEFAULT_LIMIT: usize = 20;

const fn default_limit() -> usize {
   DEFAULT_LIMIT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
   #[serde(default)]
   pub query:      String,
   #[serde(default, deserialize_with = "or_default")]
   pub scope:      Scope,
   #[serde(default, deserialize_with = "or_default")]
   pub filters:    SearchFilters,
   #[serde(default = "default_limit")]
   pub limit:      usize,
   #[serde(default)]
   pub offset:     usize,
   #[serde(default, deserialize_with = "or_default")]
   pub sort_by:    SortBy,
   #[serde(default, deserialize_with = "or_default", skip_serializing_if = "Option::is_none")]
   pub sort_order: Option<SortOrder>,
}

impl Default for SearchOptions {
   fn default() -> Self {
      Self::new("")
   }
}

impl SearchOptions {
   pub fn new(query: impl Into<String>) -> Self {
      Self {
         query:      query.into(),
         scope:      Scope::All,
         filters:    SearchFilters::default(),
         limit:      DEFAULT_LIMIT,
         offset:     0,
         sort_by:    SortBy::Relevance,
         sort_order: None,
      }
   }

   pub const fn scope(mut self, scope: Scope) -> Self {
      self.scope = scope;
      self
   }

   pub fn filters(mut self, filters: SearchFilters) -> Self {
      self.filters = filters;
      self
   }

   pub const fn sort(mut self, sort_by: SortBy, order: Option<SortOrder>) -> Self {
      self.sort_by = sort_by;
      self.sort_order = order;
      self
   }

   pub const fn page(mut self, offset: usize, limit: usize) -> Self {
      self.offset = offset;
      self.limit = limit;
      self
   }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHighlight {
   pub field:          String,
   pub snippet:        String,
   pub matched_tokens: Vec<String>,
}

/// Per-result attributes as an open JSON object, so whatever a remote
/// service attaches survives a round trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultMetadata(Map<String, Value>);

impl ResultMetadata {
   pub fn get(&self, key: &str) -> Option<&Value> {
      self.0.get(key)
   }

   pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
      self.0.insert(key.into(), value.into());
   }

   pub fn language(&self) -> Option<&str> {
      self.get("language")?.as_str()
   }

   /// `lastUpdated` as RFC 3339 or a bare `YYYY-MM-DD` date.
   pub fn last_updated(&self) -> Option<DateTime<Utc>> {
      parse_timestamp(self.get("lastUpdated")?.as_str()?)
   }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
   if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
      return Some(at.with_timezone(&Utc));
   }
   let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
   Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

impl From<&IndexEntry> for ResultMetadata {
   fn from(entry: &IndexEntry) -> Self {
      let mut metadata = Self::default();
      if let Some(language) = entry.language() {
         metadata.insert("language", language);
      }
      if let EntryAttrs::Repository { topics, .. } = &entry.attrs {
         metadata.insert("topics", topics.clone());
      }
      if let Some(has_api_docs) = entry.has_api_docs() {
         metadata.insert("hasApiDocs", has_api_docs);
      }
      if let Some(updated) = entry.last_updated() {
         metadata.insert("lastUpdated", updated.to_rfc3339_opts(SecondsFormat::Millis, true));
      }
      if let Some(api_type) = entry.api_type() {
         metadata.insert("apiType", api_type.as_str());
      }
      if let Some(description) = entry.description() {
         metadata.insert("description", description);
      }
      metadata
   }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
   pub id:          String,
   #[serde(rename = "type")]
   pub kind:        EntryKind,
   pub title:       String,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub description: Option<String>,
   pub repository:  String,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub path:        Option<String>,
   pub score:       f64,
   #[serde(default)]
   pub highlights:  Vec<SearchHighlight>,
   #[serde(default)]
   pub metadata:    ResultMetadata,
   #[serde(flatten)]
   pub extra:       Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetValue {
   pub value: String,
   pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFacets {
   #[serde(default)]
   pub repositories: Vec<FacetValue>,
   #[serde(default)]
   pub languages:    Vec<FacetValue>,
   #[serde(default)]
   pub api_types:    Vec<FacetValue>,
   #[serde(default)]
   pub file_types:   Vec<FacetValue>,
   #[serde(default)]
   pub topics:       Vec<FacetValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
   pub query:          String,
   pub results:        Vec<SearchResult>,
   pub total_count:    usize,
   #[serde(default)]
   pub facets:         SearchFacets,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub suggestions:    Option<Vec<String>>,
   #[serde(default)]
   pub execution_time: u64,
   /// Fields a remote service adds beyond the shared contract, passed
   /// through untouched.
   #[serde(flatten)]
   pub extra:          Map<String, Value>,
}

impl SearchResponse {
   pub fn empty(query: impl Into<String>) -> Self {
      Self {
         query:          query.into(),
         results:        Vec::new(),
         total_count:    0,
         facets:         SearchFacets::default(),
         suggestions:    None,
         execution_time: 0,
         extra:          Map::new(),
      }
   }
}
