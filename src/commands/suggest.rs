use anyhow::Result;
use console::style;

use crate::CatalogArgs;

pub async fn execute(
   catalog: &CatalogArgs,
   partial: &str,
   limit: Option<usize>,
   json: bool,
) -> Result<()> {
   let prepared = super::prepare(catalog, json)?;
   let limit = limit.unwrap_or(prepared.config.suggestion_limit);
   let suggestions = prepared.gateway.suggestions(partial, limit).await;

   if json {
      println!("{}", serde_json::to_string(&suggestions)?);
   } else if suggestions.is_empty() {
      println!("{}", style(format!("No suggestions for '{partial}'")).dim());
   } else {
      for suggestion in &suggestions {
         println!("{suggestion}");
      }
   }

   Ok(())
}
