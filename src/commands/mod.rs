pub mod index;
pub mod popular;
pub mod search;
pub mod serve;
pub mod suggest;

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use portal_search::{Config, IndexStore, RebuildReport, SearchGateway, sync::CatalogLoader};

use crate::CatalogArgs;

/// Everything a command needs after config and CLI overrides are merged.
pub struct Prepared {
   pub config:  Config,
   pub index:   Arc<IndexStore>,
   pub loader:  Option<Arc<CatalogLoader>>,
   pub gateway: SearchGateway,
}

fn load_config(args: &CatalogArgs) -> Result<Config> {
   let mut config = Config::load().context("failed to load configuration")?;

   if let Some(manifest) = &args.manifest {
      config.manifest = Some(manifest.clone());
   }
   if let Some(clones_dir) = &args.clones_dir {
      config.clones_dir = Some(clones_dir.clone());
   }
   if let Some(remote) = &args.remote {
      config.remote_url = Some(remote.clone());
   }
   if args.local {
      config.remote_url = None;
   }

   Ok(config)
}

/// Loads config, builds the local index from the manifest (if any) and wires
/// the gateway. `quiet` suppresses the spinner for machine-readable output.
pub fn prepare(args: &CatalogArgs, quiet: bool) -> Result<Prepared> {
   let config = load_config(args)?;
   let index = Arc::new(IndexStore::new());

   let loader = config.manifest.as_ref().map(|manifest| {
      Arc::new(CatalogLoader::new(manifest).with_clones_dir(config.clones_dir.clone()))
   });

   if let Some(loader) = &loader {
      build_index(loader, &index, quiet)?;
   }

   let gateway = SearchGateway::from_config(&config, Arc::clone(&index));
   Ok(Prepared { config, index, loader, gateway })
}

fn build_index(
   loader: &CatalogLoader,
   index: &IndexStore,
   quiet: bool,
) -> Result<RebuildReport> {
   let spinner = (!quiet).then(|| {
      let spinner = ProgressBar::new_spinner();
      if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
         spinner.set_style(template);
      }
      spinner.enable_steady_tick(Duration::from_millis(100));
      spinner.set_message(format!("Indexing {}...", loader.manifest().display()));
      spinner
   });

   let outcome = loader.rebuild(index);
   if let Some(spinner) = spinner {
      spinner.finish_and_clear();
   }

   let report =
      outcome.with_context(|| format!("failed to index {}", loader.manifest().display()))?;
   tracing::debug!(
      generation = report.generation,
      entries = report.entries,
      skipped = report.skipped,
      "index ready"
   );
   Ok(report)
}
