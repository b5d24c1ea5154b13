//! Shared SQLite token store.
//!
//! The token manager writes the single token row; other processes read it.
//! The supervisor only needs [`TokenStore::wait_for_tokens`] to decide
//! whether the service may start.

mod error;
mod token_record;
mod token_store;


pub use error::{Result as TokenStoreResult, TokenStoreError};
pub use token_record::TokenRecord;
pub use token_store::TokenStore;

use std::time::Duration;

/// SQLite busy timeout, shared with the token manager's own connection
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Default interval between reads while waiting for the row
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);
