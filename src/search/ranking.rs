//! Relevance scoring and result ordering.
//!
//! Term matches are additive; entry kind and freshness are multiplicative
//! boosts applied on top.

use std::cmp::{Ordering, Reverse};

use chrono::{DateTime, Duration, Utc};

use crate::types::{EntryKind, IndexEntry, SearchResult, SortBy, SortOrder};

pub const EXACT_MATCH: f64 = 10.0;
pub const PREFIX_MATCH: f64 = 5.0;
pub const FUZZY_MATCH: f64 = 2.0;

/// Largest edit distance still counted as a fuzzy match.
pub const MAX_EDIT_DISTANCE: usize = 2;

/// Entries updated within this many days get [`RECENCY_BOOST`].
pub const RECENT_DAYS: i64 = 30;
pub const RECENCY_BOOST: f64 = 1.2;

/// Scores `entry` against already tokenized query terms.
///
/// Every (query token, entry token) pair is checked for an exact match, a
/// prefix match and a fuzzy match independently, so an identical pair earns
/// all three.
pub fn score(query_tokens: &[String], entry: &IndexEntry, now: DateTime<Utc>) -> f64 {
   let mut score = 0.0;

   for query in query_tokens {
      for token in &entry.tokens {
         if token == query {
            score += EXACT_MATCH;
         }
         if token.starts_with(query.as_str()) {
            score += PREFIX_MATCH;
         }
         if within_edit_distance(query, token, MAX_EDIT_DISTANCE) {
            score += FUZZY_MATCH;
         }
      }
   }

   score * type_boost(entry.kind()) * recency_boost(entry.last_updated(), now)
}

pub const fn type_boost(kind: EntryKind) -> f64 {
   match kind {
      EntryKind::Repository => 1.5,
      EntryKind::Api => 1.3,
      EntryKind::File | EntryKind::Content => 1.0,
   }
}

pub fn recency_boost(last_updated: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
   match last_updated {
      Some(updated) if now.signed_duration_since(updated) < Duration::days(RECENT_DAYS) => {
         RECENCY_BOOST
      },
      _ => 1.0,
   }
}

fn within_edit_distance(a: &str, b: &str, max: usize) -> bool {
   // The length gap alone is a lower bound on the distance.
   if a.chars().count().abs_diff(b.chars().count()) > max {
      return false;
   }
   levenshtein(a, b) <= max
}

/// Edit distance with unit cost for insertion, deletion and substitution.
pub fn levenshtein(a: &str, b: &str) -> usize {
   let a: Vec<char> = a.chars().collect();
   let b: Vec<char> = b.chars().collect();

   if a.is_empty() {
      return b.len();
   }
   if b.is_empty() {
      return a.len();
   }

   let mut prev: Vec<usize> = (0..=b.len()).collect();
   let mut curr = vec![0; b.len() + 1];

   for (i, ca) in a.iter().enumerate() {
      curr[0] = i + 1;
      for (j, cb) in b.iter().enumerate() {
         let substitution = prev[j] + usize::from(ca != cb);
         curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
      }
      std::mem::swap(&mut prev, &mut curr);
   }

   prev[b.len()]
}

fn updated_millis(result: &SearchResult) -> i64 {
   result
      .metadata
      .last_updated()
      .map_or(0, |updated| updated.timestamp_millis())
}

/// Orders results in place.
///
/// Relevance sorts by score descending, name by title ascending, updated by
/// last update descending (missing dates count as the epoch) and type by kind
/// name ascending. `Asc` on anything but relevance reverses the sorted list,
/// which turns the name and type orders descending.
pub fn sort_results(results: &mut [SearchResult], sort_by: SortBy, order: Option<SortOrder>) {
   match sort_by {
      SortBy::Relevance => {
         results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
      },
      SortBy::Name => results.sort_by(|a, b| a.title.cmp(&b.title)),
      SortBy::Updated => results.sort_by_cached_key(|r| Reverse(updated_millis(r))),
      SortBy::Type => results.sort_by(|a, b| a.kind.as_str().cmp(b.kind.as_str())),
   }

   if order == Some(SortOrder::Asc) && sort_by != SortBy::Relevance {
      results.reverse();
   }
}

/// Returns the `[offset, offset + limit)` window of `results`.
pub fn paginate(results: Vec<SearchResult>, offset: usize, limit: usize) -> Vec<SearchResult> {
   results.into_iter().skip(offset).take(limit).collect()
}

#[cfg(test)]
mod tests {
   use chrono::TimeZone;

   use super::*;
   use crate::{
      tokenize::tokenize,
      types::{EntryAttrs, ResultMetadata},
   };

   fn entry(tokens: &[&str], attrs: EntryAttrs) -> IndexEntry {
      IndexEntry {
         id: "x".into(),
         repository: "r".into(),
         title: "t".into(),
         content: String::new(),
         tokens: tokens.iter().map(|t| (*t).to_string()).collect(),
         attrs,
      }
   }

   fn repo_attrs(last_updated: Option<DateTime<Utc>>) -> EntryAttrs {
      EntryAttrs::Repository {
         language: None,
         topics: vec![],
         has_api_docs: false,
         last_updated,
         description: None,
      }
   }

   fn now() -> DateTime<Utc> {
      Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
   }

   fn make_result(title: &str, score: f64, kind: EntryKind, updated: Option<i32>) -> SearchResult {
      SearchResult {
         id: title.to_string(),
         kind,
         title: title.to_string(),
         description: None,
         repository: "r".into(),
         path: None,
         score,
         highlights: vec![],
         metadata: {
            let mut metadata = ResultMetadata::default();
            if let Some(year) = updated {
               metadata.insert("lastUpdated", format!("{year}-01-01"));
            }
            metadata
         },
         extra: serde_json::Map::new(),
      }
   }

   fn titles(results: &[SearchResult]) -> Vec<&str> {
      results.iter().map(|r| r.title.as_str()).collect()
   }

   #[test]
   fn test_levenshtein() {
      assert_eq!(levenshtein("test", "test"), 0);
      assert_eq!(levenshtein("test", "tests"), 1);
      assert_eq!(levenshtein("test", "best"), 1);
      assert_eq!(levenshtein("test", "toast"), 2);
      assert_eq!(levenshtein("", "abc"), 3);
      assert_eq!(levenshtein("kitten", "sitting"), 3);
   }

   #[test]
   fn test_exact_match_earns_all_three_components() {
      let e = entry(&["test"], EntryAttrs::Content { path: None });
      let s = score(&tokenize("test"), &e, now());
      assert!((s - (EXACT_MATCH + PREFIX_MATCH + FUZZY_MATCH)).abs() < 1e-9);
   }

   #[test]
   fn test_prefix_and_fuzzy_components() {
      let e = entry(&["testing", "best"], EntryAttrs::Content { path: None });
      // "testing" is a prefix hit but 3 edits away; "best" is a fuzzy hit only.
      let s = score(&tokenize("test"), &e, now());
      assert!((s - (PREFIX_MATCH + FUZZY_MATCH)).abs() < 1e-9);
   }

   #[test]
   fn test_unrelated_tokens_score_zero() {
      let e = entry(&["graphql", "service"], repo_attrs(Some(now())));
      assert!(score(&tokenize("kubernetes"), &e, now()).abs() < f64::EPSILON);
      assert!(score(&[], &e, now()).abs() < f64::EPSILON);
   }

   #[test]
   fn test_repository_outranks_file_with_same_tokens() {
      let old = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
      let repo = entry(&["payments"], repo_attrs(Some(old)));
      let file = entry(
         &["payments"],
         EntryAttrs::File { path: "README.md".into(), last_updated: Some(old) },
      );
      let q = tokenize("payments");
      assert!(score(&q, &repo, now()) > score(&q, &file, now()));
   }

   #[test]
   fn test_recent_update_outranks_old_update() {
      let q = tokenize("payments");
      let fresh = entry(&["payments"], repo_attrs(Some(now())));
      let stale =
         entry(&["payments"], repo_attrs(Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap())));
      let undated = entry(&["payments"], repo_attrs(None));

      assert!(score(&q, &fresh, now()) > score(&q, &stale, now()));
      assert!((score(&q, &stale, now()) - score(&q, &undated, now())).abs() < 1e-9);
   }

   #[test]
   fn test_recency_window_edge() {
      let just_inside = now() - Duration::days(29);
      let just_outside = now() - Duration::days(30);
      assert!((recency_boost(Some(just_inside), now()) - RECENCY_BOOST).abs() < 1e-9);
      assert!((recency_boost(Some(just_outside), now()) - 1.0).abs() < 1e-9);
   }

   #[test]
   fn test_api_boost() {
      assert!((type_boost(EntryKind::Api) - 1.3).abs() < 1e-9);
      assert!((type_boost(EntryKind::Content) - 1.0).abs() < 1e-9);
   }

   #[test]
   fn test_sort_by_relevance_descending() {
      let mut results = vec![
         make_result("b", 1.0, EntryKind::File, None),
         make_result("a", 3.0, EntryKind::File, None),
         make_result("c", 2.0, EntryKind::File, None),
      ];
      sort_results(&mut results, SortBy::Relevance, Some(SortOrder::Asc));
      assert_eq!(titles(&results), ["a", "c", "b"]);
   }

   #[test]
   fn test_sort_by_name() {
      let mut results = vec![
         make_result("beta", 1.0, EntryKind::File, None),
         make_result("alpha", 1.0, EntryKind::File, None),
         make_result("gamma", 1.0, EntryKind::File, None),
      ];
      sort_results(&mut results, SortBy::Name, None);
      assert_eq!(titles(&results), ["alpha", "beta", "gamma"]);

      // Asking for "asc" reverses the already ascending order. This is the
      // long-standing behavior of the catalog and is kept as is.
      sort_results(&mut results, SortBy::Name, Some(SortOrder::Asc));
      assert_eq!(titles(&results), ["gamma", "beta", "alpha"]);
   }

   #[test]
   fn test_sort_by_updated() {
      let mut results = vec![
         make_result("old", 1.0, EntryKind::File, Some(2020)),
         make_result("undated", 1.0, EntryKind::File, None),
         make_result("new", 1.0, EntryKind::File, Some(2024)),
      ];
      sort_results(&mut results, SortBy::Updated, Some(SortOrder::Desc));
      assert_eq!(titles(&results), ["new", "old", "undated"]);

      sort_results(&mut results, SortBy::Updated, Some(SortOrder::Asc));
      assert_eq!(titles(&results), ["undated", "old", "new"]);
   }

   #[test]
   fn test_sort_by_type() {
      let mut results = vec![
         make_result("r", 1.0, EntryKind::Repository, None),
         make_result("a", 1.0, EntryKind::Api, None),
         make_result("f", 1.0, EntryKind::File, None),
      ];
      sort_results(&mut results, SortBy::Type, None);
      assert_eq!(titles(&results), ["a", "f", "r"]);
   }

   #[test]
   fn test_paginate() {
      let results: Vec<_> = ["a", "b", "c", "d"]
         .iter()
         .map(|t| make_result(t, 1.0, EntryKind::File, None))
         .collect();
      assert_eq!(titles(&paginate(results.clone(), 1, 2)), ["b", "c"]);
      assert_eq!(titles(&paginate(results.clone(), 3, 10)), ["d"]);
      assert!(paginate(results, 10, 5).is_empty());
   }
}
