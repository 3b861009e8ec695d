pub mod facets;
pub mod filter;
pub mod highlight;
pub mod ranking;
pub mod suggest;

use std::{sync::Arc, time::Instant};

use chrono::{DateTime, Utc};

use crate::{
   index::IndexStore,
   tokenize::tokenize,
   types::{ResultMetadata, SearchFilters, SearchOptions, SearchResponse, SearchResult},
};

/// Local query pipeline over the current index generation.
#[derive(Clone)]
pub struct SearchEngine {
   index: Arc<IndexStore>,
}

impl SearchEngine {
   pub fn new(index: Arc<IndexStore>) -> Self {
      Self { index }
   }

   pub const fn index(&self) -> &Arc<IndexStore> {
      &self.index
   }

   pub fn search(&self, options: &SearchOptions) -> SearchResponse {
      self.search_at(options, Utc::now())
   }

   /// Runs a query with `now` as the reference time for recency boosts.
   pub fn search_at(&self, options: &SearchOptions, now: DateTime<Utc>) -> SearchResponse {
      let started = Instant::now();
      let snapshot = self.index.snapshot();
      let query_tokens = tokenize(&options.query.to_lowercase());

      let mut results = Vec::new();
      let mut facets = facets::FacetAggregator::new();

      for entry in snapshot.entries() {
         if !filter::matches_scope(entry, options.scope)
            || !filter::matches_filters(entry, &options.filters)
         {
            continue;
         }

         let score = ranking::score(&query_tokens, entry, now);
         if score <= 0.0 {
            continue;
         }

         facets.record(entry);
         results.push(SearchResult {
            id: entry.id.clone(),
            kind: entry.kind(),
            title: entry.title.clone(),
            description: entry.description().map(str::to_string),
            repository: entry.repository.clone(),
            path: entry.path().map(str::to_string),
            score,
            highlights: highlight::highlights(&entry.content, &query_tokens),
            metadata: ResultMetadata::from(entry),
            extra: serde_json::Map::new(),
         });
      }

      ranking::sort_results(&mut results, options.sort_by, options.sort_order);

      let total_count = results.len();
      let suggestions = suggest::from_results(&options.query, &results);
      let results = ranking::paginate(results, options.offset, options.limit);

      tracing::debug!(
         query = %options.query,
         generation = snapshot.number(),
         total_count,
         "local search"
      );

      SearchResponse {
         query: options.query.clone(),
         results,
         total_count,
         facets: facets.finalize(),
         suggestions: Some(suggestions),
         execution_time: started.elapsed().as_millis() as u64,
         extra: serde_json::Map::new(),
      }
   }

   /// Every result for `query` inside one repository, first page only.
   pub fn search_in_repository(&self, repository: &str, query: &str) -> Vec<SearchResult> {
      let options = SearchOptions::new(query).filters(SearchFilters {
         repositories: vec![repository.to_string()],
         ..Default::default()
      });
      self.search(&options).results
   }

   pub fn suggest(&self, partial: &str, limit: usize) -> Vec<String> {
      suggest::suggest(&self.index.snapshot(), partial, limit)
   }

   pub fn popular_terms(&self, limit: usize) -> Vec<String> {
      suggest::popular_terms(&self.index.snapshot(), limit)
   }
}
