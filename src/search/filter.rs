//! Scope and attribute filters applied before scoring.
//!
//! A filter that was supplied is never satisfied by an entry lacking the
//! attribute it inspects.

use crate::types::{EntryKind, IndexEntry, Scope, SearchFilters};

pub fn matches_scope(entry: &IndexEntry, scope: Scope) -> bool {
   match scope {
      Scope::All => true,
      Scope::Repositories => entry.kind() == EntryKind::Repository,
      Scope::Documentation => {
         entry.kind() == EntryKind::File && entry.path().is_some_and(|p| p.ends_with(".md"))
      },
      Scope::Apis => entry.kind() == EntryKind::Api,
   }
}

pub fn matches_filters(entry: &IndexEntry, filters: &SearchFilters) -> bool {
   if !filters.repositories.is_empty() && !filters.repositories.contains(&entry.repository) {
      return false;
   }

   if !filters.languages.is_empty()
      && !entry
         .language()
         .is_some_and(|lang| filters.languages.iter().any(|l| l == lang))
   {
      return false;
   }

   if !filters.api_types.is_empty()
      && entry.kind() == EntryKind::Api
      && !entry
         .api_type()
         .is_some_and(|api_type| filters.api_types.contains(&api_type))
   {
      return false;
   }

   if let Some(wanted) = filters.has_api_docs
      && entry.has_api_docs() != Some(wanted)
   {
      return false;
   }

   if !filters.topics.is_empty()
      && !entry
         .topics()
         .iter()
         .any(|topic| filters.topics.contains(topic))
   {
      return false;
   }

   if !filters.file_types.is_empty() {
      let Some(ext) = entry
         .path()
         .and_then(|p| std::path::Path::new(p).extension())
         .and_then(|ext| ext.to_str())
      else {
         return false;
      };
      if !filters
         .file_types
         .iter()
         .any(|ft| ft.trim_start_matches('.').eq_ignore_ascii_case(ext))
      {
         return false;
      }
   }

   if let Some(after) = filters.updated_after
      && !entry.last_updated().is_some_and(|updated| updated >= after)
   {
      return false;
   }

   if let Some(before) = filters.updated_before
      && !entry.last_updated().is_some_and(|updated| updated <= before)
   {
      return false;
   }

   true
}

#[cfg(test)]
mod tests {
   use chrono::{TimeZone, Utc};

   use super::*;
   use crate::types::{ApiType, EntryAttrs};

   fn repository(topics: &[&str], language: Option<&str>) -> IndexEntry {
      IndexEntry {
         id:         "repo:test-repo-1".into(),
         repository: "test-repo-1".into(),
         title:      "test-repo-1".into(),
         content:    String::new(),
         tokens:     vec![],
         attrs:      EntryAttrs::Repository {
            language:     language.map(str::to_string),
            topics:       topics.iter().map(|t| (*t).to_string()).collect(),
            has_api_docs: true,
            last_updated: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            description:  None,
         },
      }
   }

   fn file(path: &str) -> IndexEntry {
      IndexEntry {
         id:         format!("file:test-repo-1/{path}"),
         repository: "test-repo-1".into(),
         title:      path.into(),
         content:    String::new(),
         tokens:     vec![],
         attrs:      EntryAttrs::File { path: path.into(), last_updated: None },
      }
   }

   fn api(api_type: ApiType) -> IndexEntry {
      IndexEntry {
         id:         "api:svc/schema.graphql".into(),
         repository: "svc".into(),
         title:      "schema.graphql".into(),
         content:    String::new(),
         tokens:     vec![],
         attrs:      EntryAttrs::Api { path: "schema.graphql".into(), api_type, last_updated: None },
      }
   }

   fn strings(values: &[&str]) -> Vec<String> {
      values.iter().map(|v| (*v).to_string()).collect()
   }

   #[test]
   fn test_scope_repository() {
      let entry = repository(&[], None);
      assert!(matches_scope(&entry, Scope::Repositories));
      assert!(matches_scope(&entry, Scope::All));
      assert!(!matches_scope(&entry, Scope::Documentation));
      assert!(!matches_scope(&entry, Scope::Apis));
   }

   #[test]
   fn test_scope_documentation_requires_markdown() {
      assert!(matches_scope(&file("README.md"), Scope::Documentation));
      assert!(!matches_scope(&file("openapi.yaml"), Scope::Documentation));
      assert!(matches_scope(&api(ApiType::Rest), Scope::Apis));
      assert!(!matches_scope(&api(ApiType::Rest), Scope::Documentation));
   }

   #[test]
   fn test_topics_any_overlap() {
      let entry = repository(&["testing", "jest"], None);
      let overlap = SearchFilters { topics: strings(&["testing", "unit-test"]), ..Default::default() };
      let disjoint = SearchFilters { topics: strings(&["graphql", "api"]), ..Default::default() };
      assert!(matches_filters(&entry, &overlap));
      assert!(!matches_filters(&entry, &disjoint));
   }

   #[test]
   fn test_repository_filter() {
      let entry = repository(&[], None);
      let hit = SearchFilters { repositories: strings(&["test-repo-1"]), ..Default::default() };
      let miss = SearchFilters { repositories: strings(&["other"]), ..Default::default() };
      assert!(matches_filters(&entry, &hit));
      assert!(!matches_filters(&entry, &miss));
      assert!(matches_filters(&entry, &SearchFilters::default()));
   }

   #[test]
   fn test_language_filter_rejects_missing_language() {
      let filters = SearchFilters { languages: strings(&["TypeScript"]), ..Default::default() };
      assert!(matches_filters(&repository(&[], Some("TypeScript")), &filters));
      assert!(!matches_filters(&repository(&[], Some("Go")), &filters));
      assert!(!matches_filters(&repository(&[], None), &filters));
   }

   #[test]
   fn test_api_type_filter_only_applies_to_apis() {
      let filters = SearchFilters { api_types: vec![ApiType::Graphql], ..Default::default() };
      assert!(matches_filters(&api(ApiType::Graphql), &filters));
      assert!(!matches_filters(&api(ApiType::Grpc), &filters));
      assert!(matches_filters(&repository(&[], None), &filters));
   }

   #[test]
   fn test_has_api_docs_exact_equality() {
      let yes = SearchFilters { has_api_docs: Some(true), ..Default::default() };
      let no = SearchFilters { has_api_docs: Some(false), ..Default::default() };
      assert!(matches_filters(&repository(&[], None), &yes));
      assert!(!matches_filters(&repository(&[], None), &no));
      assert!(!matches_filters(&file("README.md"), &no));
   }

   #[test]
   fn test_file_type_filter() {
      let filters = SearchFilters { file_types: strings(&[".md"]), ..Default::default() };
      assert!(matches_filters(&file("docs/Guide.MD"), &filters));
      assert!(!matches_filters(&file("openapi.yaml"), &filters));
      assert!(!matches_filters(&repository(&[], None), &filters));
   }

   #[test]
   fn test_updated_range_filters() {
      let entry = repository(&[], None);
      let after = SearchFilters {
         updated_after: Some(Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap()),
         ..Default::default()
      };
      let before = SearchFilters {
         updated_before: Some(Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap()),
         ..Default::default()
      };
      assert!(matches_filters(&entry, &after));
      assert!(!matches_filters(&entry, &before));
      assert!(!matches_filters(&file("README.md"), &after));
   }
}
