//! Error type for `docket-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] docket_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sql error: {0}")]
  Sql(#[from] rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("decode error: {0}")]
  Decode(String),
}

/// Domain failures cross the store boundary typed, so the API layer can map
/// them to precise statuses; everything else collapses into an opaque
/// storage error.
impl From<Error> for docket_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(core) => core,
      other => docket_core::Error::Storage(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
