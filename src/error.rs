use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
   #[error("remote search request failed: {0}")]
   Remote(#[from] reqwest::Error),

   #[error("remote {op} returned status {status}")]
   RemoteStatus { op: &'static str, status: u16 },

   #[error("remote {op} returned malformed payload: {reason}")]
   RemoteDecode { op: &'static str, reason: String },

   #[error("cannot index repository {repository:?}: {reason}")]
   Ingest { repository: String, reason: String },

   #[error("failed to read catalog manifest {path}: {reason}")]
   Manifest { path: PathBuf, reason: String },

   #[error("invalid configuration: {0}")]
   Config(#[from] Box<figment::Error>),

   #[error(transparent)]
   Io(#[from] std::io::Error),
}

impl Error {
   pub(crate) fn ingest(repository: impl Into<String>, reason: impl Into<String>) -> Self {
      Self::Ingest { repository: repository.into(), reason: reason.into() }
   }
}

impl From<figment::Error> for Error {
   fn from(err: figment::Error) -> Self {
      Self::Config(Box::new(err))
   }
}
