//! Search and indexing engine for a developer-portal repository catalog.
//!
//! The index is rebuilt wholesale from repository records
//! ([`index::IndexStore::rebuild`]) and queried through
//! [`gateway::SearchGateway`], which prefers a remote search service and falls
//! back to the local [`search::SearchEngine`].

pub mod config;
pub mod error;
pub mod gateway;
pub mod index;
pub mod search;
pub mod server;
pub mod sync;
pub mod tokenize;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use gateway::{HttpRemote, RemoteSearch, SearchGateway};
pub use index::{IndexStore, RebuildReport};
pub use search::SearchEngine;
