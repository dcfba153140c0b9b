// src/error.rs
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures surfaced by connecting to and writing into MongoDB.
///
/// Driver errors are carried untouched as the source of the variant that
/// names the stage they happened in.
#[derive(Debug, Error)]
pub enum Error {
    /// Building client options or creating the client failed.
    #[error("failed to connect to MongoDB: {0}")]
    Connection(#[source] mongodb::error::Error),

    /// The client was created but the ping did not succeed.
    #[error("MongoDB server is unreachable: {0}")]
    Unreachable(#[source] mongodb::error::Error),

    #[error("bulk insert failed: {0}")]
    Write(#[source] mongodb::error::Error),

    #[error("not connected to MongoDB; call connect before inserting")]
    NotConnected,

    #[error("invalid settings: {0}")]
    Settings(#[from] serde_yaml::Error),

    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}
