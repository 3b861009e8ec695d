//! In-memory index generations.
//!
//! A [`Generation`] is built off to the side from a full set of repositories
//! and then published with a single pointer swap. Readers hold an
//! `Arc<Generation>` for as long as they need it; a concurrent rebuild never
//! touches a generation that has already been published.

pub mod ingest;

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use serde::Serialize;

use crate::types::{IndexEntry, RepositoryMetadata};

/// One immutable build of the index.
#[derive(Debug)]
pub struct Generation {
   number:    u64,
   built_at:  DateTime<Utc>,
   entries:   Vec<IndexEntry>,
   positions: HashMap<String, usize>,
}

impl Generation {
   fn empty() -> Self {
      Self { number: 0, built_at: Utc::now(), entries: Vec::new(), positions: HashMap::new() }
   }

   /// Entries in insertion order.
   pub fn entries(&self) -> &[IndexEntry] {
      &self.entries
   }

   pub fn get(&self, id: &str) -> Option<&IndexEntry> {
      self.positions.get(id).map(|&pos| &self.entries[pos])
   }

   pub fn len(&self) -> usize {
      self.entries.len()
   }

   pub fn is_empty(&self) -> bool {
      self.entries.is_empty()
   }

   /// Monotonic build counter; 0 is the empty index created at startup.
   pub const fn number(&self) -> u64 {
      self.number
   }

   pub const fn built_at(&self) -> DateTime<Utc> {
      self.built_at
   }

   /// Inserts an entry, replacing any entry with the same id in place.
   fn insert(&mut self, entry: IndexEntry) {
      if let Some(&pos) = self.positions.get(&entry.id) {
         self.entries[pos] = entry;
      } else {
         self.positions.insert(entry.id.clone(), self.entries.len());
         self.entries.push(entry);
      }
   }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RebuildReport {
   pub generation:   u64,
   pub repositories: usize,
   pub entries:      usize,
   pub skipped:      usize,
}

pub struct IndexStore {
   current: RwLock<Arc<Generation>>,
   writer:  Mutex<()>,
}

impl Default for IndexStore {
   fn default() -> Self {
      Self::new()
   }
}

impl IndexStore {
   pub fn new() -> Self {
      Self { current: RwLock::new(Arc::new(Generation::empty())), writer: Mutex::new(()) }
   }

   /// Current generation. The handle stays valid and unchanged across later
   /// rebuilds.
   pub fn snapshot(&self) -> Arc<Generation> {
      Arc::clone(&self.current.read())
   }

   /// Replaces the index with a generation derived from `repositories`.
   ///
   /// Repositories that fail ingestion are logged and left out; they never
   /// abort the rebuild.
   pub fn rebuild(&self, repositories: &[RepositoryMetadata]) -> RebuildReport {
      let _writer = self.writer.lock();
      let number = self.current.read().number + 1;

      tracing::info!(repositories = repositories.len(), "building search index");

      let ingested: Vec<_> = repositories
         .par_iter()
         .map(ingest::entries_for)
         .collect();

      let mut generation = Generation {
         number,
         built_at: Utc::now(),
         entries: Vec::with_capacity(repositories.len()),
         positions: HashMap::with_capacity(repositories.len()),
      };
      let mut skipped = 0;

      for result in ingested {
         match result {
            Ok(entries) => entries.into_iter().for_each(|e| generation.insert(e)),
            Err(e) => {
               skipped += 1;
               tracing::warn!("{e}");
            },
         }
      }

      let report = RebuildReport {
         generation: number,
         repositories: repositories.len() - skipped,
         entries: generation.len(),
         skipped,
      };

      *self.current.write() = Arc::new(generation);

      tracing::info!(
         generation = report.generation,
         entries = report.entries,
         skipped = report.skipped,
         "search index built"
      );

      report
   }
}

#[cfg(test)]
mod tests {
   use std::thread;

   use super::*;
   use crate::types::ApiSpec;

   fn repo(name: &str) -> RepositoryMetadata {
      RepositoryMetadata {
         name: name.to_string(),
         description: format!("{name} service"),
         ..Default::default()
      }
   }

   #[test]
   fn test_new_store_is_empty() {
      let store = IndexStore::new();
      let snapshot = store.snapshot();
      assert!(snapshot.is_empty());
      assert_eq!(snapshot.number(), 0);
   }

   #[test]
   fn test_rebuild_replaces_previous_generation() {
      let store = IndexStore::new();
      store.rebuild(&[repo("alpha"), repo("beta")]);
      let first = store.snapshot();
      assert_eq!(first.len(), 2);

      let report = store.rebuild(&[repo("gamma")]);
      assert_eq!(report.generation, 2);
      assert_eq!(report.entries, 1);

      let second = store.snapshot();
      assert!(second.get("repo:alpha").is_none());
      assert!(second.get("repo:gamma").is_some());

      // The old handle still sees the generation it was taken from.
      assert_eq!(first.len(), 2);
      assert!(first.get("repo:alpha").is_some());
   }

   #[test]
   fn test_duplicate_ids_overwrite_in_place() {
      let store = IndexStore::new();
      let mut second = repo("alpha");
      second.description = "replacement".to_string();

      store.rebuild(&[repo("alpha"), repo("beta"), second]);
      let snapshot = store.snapshot();

      assert_eq!(snapshot.len(), 2);
      assert_eq!(snapshot.entries()[0].id, "repo:alpha");
      assert!(snapshot.entries()[0].content.contains("replacement"));
   }

   #[test]
   fn test_bad_repository_does_not_abort_rebuild() {
      let store = IndexStore::new();
      let report = store.rebuild(&[repo("alpha"), repo(""), repo("beta")]);

      assert_eq!(report.skipped, 1);
      assert_eq!(report.repositories, 2);
      assert_eq!(store.snapshot().len(), 2);
   }

   #[test]
   fn test_rebuild_counts_all_entry_kinds() {
      let mut r = repo("docs");
      r.readme = Some("Getting started".to_string());
      r.api_specs = vec![ApiSpec {
         path:     "api/service.proto".to_string(),
         api_type: crate::types::ApiType::Grpc,
      }];

      let report = IndexStore::new().rebuild(&[r]);
      assert_eq!(report.entries, 3);
   }

   #[test]
   fn test_readers_see_whole_generations_during_rebuilds() {
      let store = IndexStore::new();
      let small: Vec<_> = (0..10).map(|i| repo(&format!("small-{i}"))).collect();
      let large: Vec<_> = (0..200).map(|i| repo(&format!("large-{i}"))).collect();
      store.rebuild(&small);

      thread::scope(|s| {
         s.spawn(|| {
            for round in 0..20 {
               store.rebuild(if round % 2 == 0 { &large } else { &small });
            }
         });
         for _ in 0..4 {
            s.spawn(|| {
               for _ in 0..200 {
                  let snapshot = store.snapshot();
                  assert!(snapshot.len() == 10 || snapshot.len() == 200);
               }
            });
         }
      });
   }
}
