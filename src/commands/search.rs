use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use console::style;
use portal_search::types::{
   ApiType, Scope, SearchFilters, SearchOptions, SearchResponse, SearchResult, SortBy, SortOrder,
};

use crate::CatalogArgs;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScopeArg {
   All,
   Repositories,
   Documentation,
   Apis,
}

impl From<ScopeArg> for Scope {
   fn from(arg: ScopeArg) -> Self {
      match arg {
         ScopeArg::All => Self::All,
         ScopeArg::Repositories => Self::Repositories,
         ScopeArg::Documentation => Self::Documentation,
         ScopeArg::Apis => Self::Apis,
      }
   }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ApiTypeArg {
   Rest,
   Graphql,
   Grpc,
}

impl From<ApiTypeArg> for ApiType {
   fn from(arg: ApiTypeArg) -> Self {
      match arg {
         ApiTypeArg::Rest => Self::Rest,
         ApiTypeArg::Graphql => Self::Graphql,
         ApiTypeArg::Grpc => Self::Grpc,
      }
   }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
   Relevance,
   Updated,
   Name,
   Type,
}

impl From<SortArg> for SortBy {
   fn from(arg: SortArg) -> Self {
      match arg {
         SortArg::Relevance => Self::Relevance,
         SortArg::Updated => Self::Updated,
         SortArg::Name => Self::Name,
         SortArg::Type => Self::Type,
      }
   }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrderArg {
   Asc,
   Desc,
}

impl From<OrderArg> for SortOrder {
   fn from(arg: OrderArg) -> Self {
      match arg {
         OrderArg::Asc => Self::Asc,
         OrderArg::Desc => Self::Desc,
      }
   }
}

#[derive(Debug, Args)]
pub struct SearchArgs {
   /// Free-text query
   pub query: String,

   #[arg(long, value_enum, default_value = "all")]
   pub scope: ScopeArg,

   /// Restrict to these repositories
   #[arg(long = "repo")]
   pub repositories: Vec<String>,

   #[arg(long = "language")]
   pub languages: Vec<String>,

   #[arg(long = "api-type", value_enum)]
   pub api_types: Vec<ApiTypeArg>,

   #[arg(long = "topic")]
   pub topics: Vec<String>,

   /// File extensions, with or without the leading dot
   #[arg(long = "file-type")]
   pub file_types: Vec<String>,

   #[arg(long)]
   pub has_api_docs: Option<bool>,

   /// RFC 3339 timestamp, inclusive
   #[arg(long)]
   pub updated_after: Option<DateTime<Utc>>,

   /// RFC 3339 timestamp, inclusive
   #[arg(long)]
   pub updated_before: Option<DateTime<Utc>>,

   #[arg(long, value_enum, default_value = "relevance")]
   pub sort: SortArg,

   #[arg(long, value_enum)]
   pub order: Option<OrderArg>,

   /// Page size; defaults to the configured limit
   #[arg(short, long)]
   pub max: Option<usize>,

   #[arg(long, default_value_t = 0)]
   pub offset: usize,

   /// Print the raw response as JSON
   #[arg(long)]
   pub json: bool,

   #[arg(long)]
   pub scores: bool,

   /// Disable colors
   #[arg(long)]
   pub plain: bool,
}

impl SearchArgs {
   fn options(&self, default_limit: usize) -> SearchOptions {
      let filters = SearchFilters {
         repositories:   self.repositories.clone(),
         languages:      self.languages.clone(),
         api_types:      self.api_types.iter().copied().map(Into::into).collect(),
         has_api_docs:   self.has_api_docs,
         topics:         self.topics.clone(),
         file_types:     self.file_types.clone(),
         updated_after:  self.updated_after,
         updated_before: self.updated_before,
      };

      SearchOptions::new(self.query.clone())
         .scope(self.scope.into())
         .filters(filters)
         .sort(self.sort.into(), self.order.map(Into::into))
         .page(self.offset, self.max.unwrap_or(default_limit))
   }
}

pub async fn execute(catalog: &CatalogArgs, args: SearchArgs) -> Result<()> {
   let prepared = super::prepare(catalog, args.json)?;
   let options = args.options(prepared.config.default_limit);
   let response = prepared.gateway.search(&options).await;

   if args.json {
      println!("{}", serde_json::to_string(&response)?);
      return Ok(());
   }

   if response.results.is_empty() {
      println!("No results found for '{}'", response.query);
      if let Some(suggestion) = response.suggestions.as_ref().and_then(|s| s.first()) {
         println!("\nDid you mean: {suggestion}");
      }
      if prepared.loader.is_none() && !prepared.gateway.has_remote() {
         println!("\nTip: pass --manifest or set PORTAL_SEARCH_MANIFEST to index a catalog");
      }
      return Ok(());
   }

   format_results(&response, args.scores, args.plain);
   Ok(())
}

fn format_results(response: &SearchResponse, scores: bool, plain: bool) {
   let header = format!(
      "{} of {} results for: {} ({} ms)",
      response.results.len(),
      response.total_count,
      response.query,
      response.execution_time
   );
   if plain {
      println!("\n{header}\n");
   } else {
      println!("\n{}\n", style(header).bold());
   }

   for (i, result) in response.results.iter().enumerate() {
      print_result(i + 1, result, scores, plain);
      println!();
   }
}

fn print_result(rank: usize, result: &SearchResult, scores: bool, plain: bool) {
   let location = match &result.path {
      Some(path) => format!("{}/{path}", result.repository),
      None => result.repository.clone(),
   };

   if plain {
      print!("{rank}. {} [{}] {location}", result.title, result.kind.as_str());
      if scores {
         print!(" (score: {:.3})", result.score);
      }
      println!();
   } else {
      print!("{} ", style(format!("{rank}.")).bold().cyan());
      print!("{}", style(&result.title).green());
      print!(" {}", style(format!("[{}]", result.kind.as_str())).yellow());
      print!(" {}", style(location).dim());
      if scores {
         print!(" {}", style(format!("(score: {:.3})", result.score)).dim());
      }
      println!();
   }

   if let Some(description) = result.description.as_deref().filter(|d| !d.is_empty()) {
      println!("  {description}");
   }
   for highlight in &result.highlights {
      if plain {
         println!("  {}", highlight.snippet);
      } else {
         println!("  {}", style(&highlight.snippet).dim());
      }
   }
}
