//! Facet counting over the entries matched by one query.

use std::collections::HashMap;

use crate::types::{FacetValue, IndexEntry, SearchFacets};

/// Counts of distinct values for one attribute, kept in first-seen order.
#[derive(Debug, Default)]
struct FacetCounter {
   values:    Vec<FacetValue>,
   positions: HashMap<String, usize>,
}

impl FacetCounter {
   fn add(&mut self, value: &str) {
      if let Some(&pos) = self.positions.get(value) {
         self.values[pos].count += 1;
      } else {
         self.positions.insert(value.to_string(), self.values.len());
         self.values.push(FacetValue { value: value.to_string(), count: 1 });
      }
   }

   /// Values by descending count; ties keep first-seen order.
   fn finish(mut self) -> Vec<FacetValue> {
      self.values.sort_by(|a, b| b.count.cmp(&a.count));
      self.values
   }
}

/// Accumulates facets for a single query execution.
#[derive(Debug, Default)]
pub struct FacetAggregator {
   repositories: FacetCounter,
   languages:    FacetCounter,
   api_types:    FacetCounter,
   file_types:   FacetCounter,
   topics:       FacetCounter,
}

impl FacetAggregator {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn record(&mut self, entry: &IndexEntry) {
      self.repositories.add(&entry.repository);

      if let Some(language) = entry.language() {
         self.languages.add(language);
      }
      if let Some(api_type) = entry.api_type() {
         self.api_types.add(api_type.as_str());
      }
      if let Some(file_type) = entry.file_type() {
         self.file_types.add(&file_type);
      }
      for topic in entry.topics() {
         self.topics.add(topic);
      }
   }

   pub fn finalize(self) -> SearchFacets {
      SearchFacets {
         repositories: self.repositories.finish(),
         languages:    self.languages.finish(),
         api_types:    self.api_types.finish(),
         file_types:   self.file_types.finish(),
         topics:       self.topics.finish(),
      }
   }
}
