use std::net::SocketAddr;

use anyhow::{Context, Result};
use console::style;
use portal_search::{SearchEngine, server};

use crate::CatalogArgs;

pub async fn execute(catalog: &CatalogArgs, host: &str, port: Option<u16>) -> Result<()> {
   let prepared = super::prepare(catalog, true)?;
   let port = port.unwrap_or(prepared.config.port);
   let addr: SocketAddr = format!("{host}:{port}")
      .parse()
      .with_context(|| format!("invalid listen address {host}:{port}"))?;

   println!(
      "{} {} {}",
      style("Serving").green().bold(),
      addr,
      style(format!("({} entries)", prepared.index.snapshot().len())).dim()
   );

   let state = server::AppState {
      engine:           SearchEngine::new(prepared.index),
      loader:           prepared.loader,
      suggestion_limit: prepared.config.suggestion_limit,
   };
   server::serve(state, addr).await?;
   Ok(())
}
