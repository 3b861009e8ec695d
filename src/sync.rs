//! Loading the repository catalog handed over by the sync job.
//!
//! The manifest is a JSON array of repository records. When a clones
//! directory is configured, each repository's checkout fills in what the
//! manifest leaves out: README text and the API specifications found in the
//! tree.

use std::{
   fs, io,
   path::{Path, PathBuf},
   sync::LazyLock,
};

use rayon::prelude::*;
use regex::Regex;
use walkdir::{DirEntry, WalkDir};

use crate::{
   Result,
   error::Error,
   index::{IndexStore, RebuildReport, ingest::README_PATH},
   types::{ApiSpec, ApiType, RepositoryMetadata},
};

static SPEC_PATTERNS: LazyLock<Vec<(Regex, ApiType)>> = LazyLock::new(|| {
   [
      (r"(?i)\.(yaml|yml|json)$", ApiType::Rest),
      (r"(?i)\.(graphql|gql)$", ApiType::Graphql),
      (r"(?i)\.proto$", ApiType::Grpc),
   ]
   .into_iter()
   .filter_map(|(pattern, api_type)| Regex::new(pattern).ok().map(|re| (re, api_type)))
   .collect()
});

pub struct CatalogLoader {
   manifest:   PathBuf,
   clones_dir: Option<PathBuf>,
}

impl CatalogLoader {
   pub fn new(manifest: impl Into<PathBuf>) -> Self {
      Self { manifest: manifest.into(), clones_dir: None }
   }

   pub fn with_clones_dir(mut self, clones_dir: Option<PathBuf>) -> Self {
      self.clones_dir = clones_dir;
      self
   }

   pub fn manifest(&self) -> &Path {
      &self.manifest
   }

   pub fn load(&self) -> Result<Vec<RepositoryMetadata>> {
      let manifest_error = |reason: String| Error::Manifest { path: self.manifest.clone(), reason };

      let raw = fs::read_to_string(&self.manifest).map_err(|e| manifest_error(e.to_string()))?;
      let mut repositories: Vec<RepositoryMetadata> =
         serde_json::from_str(&raw).map_err(|e| manifest_error(e.to_string()))?;

      if let Some(clones_dir) = &self.clones_dir {
         repositories
            .par_iter_mut()
            .for_each(|repo| enrich_from_checkout(repo, clones_dir));
      }

      tracing::debug!(
         manifest = %self.manifest.display(),
         repositories = repositories.len(),
         "catalog loaded"
      );

      Ok(repositories)
   }

   /// Loads the catalog and publishes it as a new index generation.
   pub fn rebuild(&self, index: &IndexStore) -> Result<RebuildReport> {
      let repositories = self.load()?;
      Ok(index.rebuild(&repositories))
   }
}

fn enrich_from_checkout(repo: &mut RepositoryMetadata, clones_dir: &Path) {
   if repo.name.is_empty() {
      return;
   }
   let checkout = clones_dir.join(&repo.name);
   if !checkout.is_dir() {
      return;
   }

   if repo.readme.as_deref().is_none_or(str::is_empty) {
      match fs::read_to_string(checkout.join(README_PATH)) {
         Ok(text) => repo.readme = Some(text),
         Err(e) if e.kind() == io::ErrorKind::NotFound => {},
         Err(e) => tracing::warn!(repository = %repo.name, error = %e, "cannot read README"),
      }
   }

   if repo.api_specs.is_empty() {
      repo.api_specs = discover_api_specs(&checkout);
   }
}

pub fn api_type_for(file_name: &str) -> Option<ApiType> {
   SPEC_PATTERNS
      .iter()
      .find(|(pattern, _)| pattern.is_match(file_name))
      .map(|(_, api_type)| *api_type)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
   entry.depth() > 0
      && entry.file_type().is_dir()
      && entry
         .file_name()
         .to_str()
         .is_some_and(|name| name.starts_with('.') || name == "node_modules")
}

/// API specification files under `root`, as `/`-separated relative paths.
///
/// Hidden directories and `node_modules` are not descended into.
pub fn discover_api_specs(root: &Path) -> Vec<ApiSpec> {
   WalkDir::new(root)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|entry| !is_skipped_dir(entry))
      .filter_map(|entry| match entry {
         Ok(entry) => Some(entry),
         Err(e) => {
            tracing::warn!(root = %root.display(), error = %e, "skipping unreadable path");
            None
         },
      })
      .filter(|entry| entry.file_type().is_file())
      .filter_map(|entry| {
         let api_type = api_type_for(entry.file_name().to_str()?)?;
         let relative = entry.path().strip_prefix(root).ok()?;
         let path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
         Some(ApiSpec { path, api_type })
      })
      .collect()
}
