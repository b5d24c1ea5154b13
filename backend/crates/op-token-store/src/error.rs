use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenStoreError {
    #[error("SQLx error: {source} {location}")]
    Sqlx {
        #[source]
        source: sqlx::Error,
        location: ErrorLocation,
    },

    #[error("Failed to create token store directory {path}: {source} {location}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Token store not populated within {timeout_secs:.2}s {location}")]
    NotPopulated {
        timeout_secs: f64,
        location: ErrorLocation,
    },
}

impl TokenStoreError {
    /// Whether the store was reachable but simply had no tokens yet
    pub fn is_not_populated(&self) -> bool {
        matches!(self, Self::NotPopulated { .. })
    }
}

impl From<sqlx::Error> for TokenStoreError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        Self::Sqlx {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TokenStoreError>;
