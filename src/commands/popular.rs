use anyhow::Result;
use console::style;

use crate::CatalogArgs;

/// Popular terms always come from the local index; the remote service does
/// not expose them.
pub fn execute(catalog: &CatalogArgs, limit: usize, json: bool) -> Result<()> {
   let prepared = super::prepare(catalog, json)?;
   let terms = prepared.gateway.popular_terms(limit);

   if json {
      println!("{}", serde_json::to_string(&terms)?);
      return Ok(());
   }

   if terms.is_empty() {
      println!("{}", style("Index is empty").dim());
      return Ok(());
   }

   for (i, term) in terms.iter().enumerate() {
      println!("{} {term}", style(format!("{:>2}.", i + 1)).cyan());
   }
   Ok(())
}
