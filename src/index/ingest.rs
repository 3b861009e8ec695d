//! Derivation of index entries from repository records.

use std::path::Path;

use crate::{
   Result,
   error::Error,
   tokenize::unique_tokens,
   types::{ApiSpec, EntryAttrs, IndexEntry, RepositoryMetadata},
};

/// Characters of README text kept for searching and snippets.
pub const README_PREVIEW_CHARS: usize = 1000;

pub const README_PATH: &str = "README.md";

/// Builds every entry a repository contributes to a generation: the
/// repository itself, its README and one entry per API specification.
///
/// Fails only when the record cannot identify its repository; individual
/// malformed API specs are skipped.
pub fn entries_for(repo: &RepositoryMetadata) -> Result<Vec<IndexEntry>> {
   if repo.name.trim().is_empty() {
      return Err(Error::ingest(&repo.name, "repository name is empty"));
   }

   let mut entries = Vec::with_capacity(2 + repo.api_specs.len());
   entries.push(repository_entry(repo));

   if let Some(readme) = repo.readme.as_deref()
      && !readme.trim().is_empty()
   {
      entries.push(readme_entry(repo, readme));
   }

   for spec in &repo.api_specs {
      match api_entry(repo, spec) {
         Some(entry) => entries.push(entry),
         None => tracing::warn!(repository = %repo.name, path = %spec.path, "skipping api spec without file name"),
      }
   }

   Ok(entries)
}

fn tokens_for(title: &str, content: &str) -> Vec<String> {
   unique_tokens(&format!("{title} {content}"))
}

fn repository_entry(repo: &RepositoryMetadata) -> IndexEntry {
   let content = format!("{} {} {}", repo.name, repo.description, repo.topics.join(" "));
   IndexEntry {
      id:         format!("repo:{}", repo.name),
      repository: repo.name.clone(),
      title:      repo.name.clone(),
      tokens:     tokens_for(&repo.name, &content),
      content,
      attrs:      EntryAttrs::Repository {
         language:     repo.language.clone().filter(|l| !l.is_empty()),
         topics:       repo.topics.clone(),
         has_api_docs: repo.has_api_docs,
         last_updated: repo.last_updated,
         description:  Some(repo.description.clone()).filter(|d| !d.is_empty()),
      },
   }
}

fn readme_entry(repo: &RepositoryMetadata, readme: &str) -> IndexEntry {
   let content: String = readme.chars().take(README_PREVIEW_CHARS).collect();
   IndexEntry {
      id:         format!("file:{}/{README_PATH}", repo.name),
      repository: repo.name.clone(),
      title:      README_PATH.to_string(),
      tokens:     tokens_for(README_PATH, &content),
      content,
      attrs:      EntryAttrs::File {
         path:         README_PATH.to_string(),
         last_updated: repo.last_updated,
      },
   }
}

fn api_entry(repo: &RepositoryMetadata, spec: &ApiSpec) -> Option<IndexEntry> {
   let title = Path::new(&spec.path).file_name()?.to_str()?.to_string();
   Some(IndexEntry {
      id:         format!("api:{}/{}", repo.name, spec.path),
      repository: repo.name.clone(),
      tokens:     tokens_for(&title, &spec.path),
      title,
      content:    spec.path.clone(),
      attrs:      EntryAttrs::Api {
         path:         spec.path.clone(),
         api_type:     spec.api_type,
         last_updated: repo.last_updated,
      },
   })
}
