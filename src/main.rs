use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "portal-search", version, about = "Search the developer-portal catalog")]
struct Cli {
   #[command(flatten)]
   catalog: CatalogArgs,

   #[command(subcommand)]
   command: Command,
}

/// Where the catalog comes from and where queries go.
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArgs {
   /// Repository manifest (JSON array) to index
   #[arg(long, global = true, env = "PORTAL_SEARCH_MANIFEST")]
   pub manifest: Option<PathBuf>,

   /// Directory containing one checkout per repository
   #[arg(long, global = true, env = "PORTAL_SEARCH_CLONES_DIR")]
   pub clones_dir: Option<PathBuf>,

   /// Remote search service base URL
   #[arg(long, global = true, env = "PORTAL_SEARCH_REMOTE_URL")]
   pub remote: Option<String>,

   /// Never contact the remote search service
   #[arg(long, global = true)]
   pub local: bool,
}

#[derive(Subcommand)]
enum Command {
   /// Run a search query
   Search(commands::search::SearchArgs),
   /// Complete a partial query
   Suggest {
      partial: String,
      #[arg(short, long)]
      limit:   Option<usize>,
      #[arg(long)]
      json:    bool,
   },
   /// Most frequent terms in the index
   Popular {
      #[arg(short, long, default_value_t = portal_search::config::DEFAULT_POPULAR_LIMIT)]
      limit: usize,
      #[arg(long)]
      json:  bool,
   },
   /// Build the index from the manifest and report what it holds
   Index {
      #[arg(long)]
      json: bool,
   },
   /// Serve the search API over HTTP
   Serve {
      #[arg(short, long)]
      port: Option<u16>,
      #[arg(long, default_value = "127.0.0.1")]
      host: String,
   },
}

fn init_tracing(default_level: &str) {
   let filter =
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
   tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(std::io::stderr)
      .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
   let cli = Cli::parse();

   init_tracing(if matches!(cli.command, Command::Serve { .. }) { "info" } else { "warn" });

   match cli.command {
      Command::Search(args) => commands::search::execute(&cli.catalog, args).await,
      Command::Suggest { partial, limit, json } => {
         commands::suggest::execute(&cli.catalog, &partial, limit, json).await
      },
      Command::Popular { limit, json } => commands::popular::execute(&cli.catalog, limit, json),
      Command::Index { json } => commands::index::execute(&cli.catalog, json),
      Command::Serve { port, host } => commands::serve::execute(&cli.catalog, &host, port).await,
   }
}
