use anyhow::{Result, bail};
use console::style;
use portal_search::types::EntryKind;

use crate::CatalogArgs;

pub fn execute(catalog: &CatalogArgs, json: bool) -> Result<()> {
   let prepared = super::prepare(catalog, json)?;
   let Some(loader) = &prepared.loader else {
      bail!("no manifest configured; pass --manifest or set PORTAL_SEARCH_MANIFEST");
   };
   let snapshot = prepared.index.snapshot();

   let count = |kind: EntryKind| snapshot.entries().iter().filter(|e| e.kind() == kind).count();

   if json {
      #[derive(serde::Serialize)]
      struct IndexSummary {
         generation:   u64,
         built_at:     chrono::DateTime<chrono::Utc>,
         entries:      usize,
         repositories: usize,
         files:        usize,
         apis:         usize,
      }

      println!(
         "{}",
         serde_json::to_string(&IndexSummary {
            generation:   snapshot.number(),
            built_at:     snapshot.built_at(),
            entries:      snapshot.len(),
            repositories: count(EntryKind::Repository),
            files:        count(EntryKind::File),
            apis:         count(EntryKind::Api),
         })?
      );
      return Ok(());
   }

   println!("{}", style(format!("Indexed {}", loader.manifest().display())).bold());
   println!("  {:<14}{}", "generation", snapshot.number());
   println!("  {:<14}{}", "built at", snapshot.built_at().to_rfc3339());
   println!("  {:<14}{}", "repositories", count(EntryKind::Repository));
   println!("  {:<14}{}", "files", count(EntryKind::File));
   println!("  {:<14}{}", "apis", count(EntryKind::Api));
   println!("  {:<14}{}", style("total").dim(), snapshot.len());
   Ok(())
}
