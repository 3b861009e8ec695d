use std::path::PathBuf;

use directories::BaseDirs;
use figment::{
   Figment,
   providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::Result;

pub const ENV_PREFIX: &str = "PORTAL_SEARCH_";
pub const DEFAULT_PORT: u16 = 4444;
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;
pub const DEFAULT_POPULAR_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
   /// Base URL of the remote search service; local-only when unset.
   pub remote_url:       Option<String>,
   /// JSON array of repository records written by the sync job.
   pub manifest:         Option<PathBuf>,
   /// Directory holding one checkout per repository, named after it.
   pub clones_dir:       Option<PathBuf>,
   pub port:             u16,
   pub default_limit:    usize,
   pub suggestion_limit: usize,
}

impl Default for Config {
   fn default() -> Self {
      Self {
         remote_url:       None,
         manifest:         None,
         clones_dir:       None,
         port:             DEFAULT_PORT,
         default_limit:    crate::types::DEFAULT_LIMIT,
         suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
      }
   }
}

impl Config {
   /// Defaults, then `config.toml` in the data directory, then
   /// `PORTAL_SEARCH_*` environment variables.
   pub fn load() -> Result<Self> {
      Self::figment(config_path()).extract().map_err(Into::into)
   }

   pub fn figment(path: Option<PathBuf>) -> Figment {
      let mut figment = Figment::from(Serialized::defaults(Self::default()));
      if let Some(path) = path {
         figment = figment.merge(Toml::file(path));
      }
      figment.merge(Env::prefixed(ENV_PREFIX))
   }
}

pub fn data_dir() -> Option<PathBuf> {
   BaseDirs::new().map(|dirs| dirs.home_dir().join(".portal-search"))
}

pub fn config_path() -> Option<PathBuf> {
   data_dir().map(|dir| dir.join("config.toml"))
}
