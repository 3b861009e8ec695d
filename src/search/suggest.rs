//! Autocomplete, did-you-mean and popular-term generation.

use std::collections::{HashMap, HashSet};

use crate::{index::Generation, tokenize::tokenize, types::SearchResult};

/// Results whose titles seed "did you mean" suggestions.
pub const SUGGESTION_SOURCE_RESULTS: usize = 10;
pub const MAX_RESULT_SUGGESTIONS: usize = 5;

/// Up to `limit` distinct index tokens extending the first token of
/// `partial`, in index order.
pub fn suggest(generation: &Generation, partial: &str, limit: usize) -> Vec<String> {
   let Some(prefix) = tokenize(partial).into_iter().next() else {
      return Vec::new();
   };

   let mut seen = HashSet::new();
   let mut suggestions = Vec::new();

   for token in generation.entries().iter().flat_map(|e| &e.tokens) {
      if suggestions.len() >= limit {
         break;
      }
      if token.starts_with(prefix.as_str()) && *token != prefix && seen.insert(token.as_str()) {
         suggestions.push(token.clone());
      }
   }

   suggestions
}

/// The `limit` most frequent tokens across the index. Ties keep the order in
/// which the tokens were first seen.
pub fn popular_terms(generation: &Generation, limit: usize) -> Vec<String> {
   let mut counts: Vec<(&str, usize)> = Vec::new();
   let mut positions: HashMap<&str, usize> = HashMap::new();

   for token in generation.entries().iter().flat_map(|e| &e.tokens) {
      match positions.get(token.as_str()) {
         Some(&pos) => counts[pos].1 += 1,
         None => {
            positions.insert(token.as_str(), counts.len());
            counts.push((token.as_str(), 1));
         },
      }
   }

   counts.sort_by(|a, b| b.1.cmp(&a.1));
   counts
      .into_iter()
      .take(limit)
      .map(|(term, _)| term.to_string())
      .collect()
}

/// Title tokens of the leading results that contain the query without
/// being equal to it.
pub fn from_results(query: &str, results: &[SearchResult]) -> Vec<String> {
   let query = query.to_lowercase();
   let mut seen = HashSet::new();

   results
      .iter()
      .take(SUGGESTION_SOURCE_RESULTS)
      .flat_map(|r| tokenize(&r.title))
      .filter(|token| token.contains(query.as_str()) && *token != query)
      .filter(|token| seen.insert(token.clone()))
      .take(MAX_RESULT_SUGGESTIONS)
      .collect()
}
