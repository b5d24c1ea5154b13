use crate::readiness::{ReadinessOutcome, ReadinessProbe};

use op_token_store::{DEFAULT_POLL_INTERVAL, TokenStore};

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;

/// Waits for the token manager to write the token row.
pub struct TokenStoreProbe {
    path: PathBuf,
    poll_interval: Duration,
}

impl TokenStoreProbe {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

#[async_trait]
impl ReadinessProbe for TokenStoreProbe {
    fn describe(&self) -> String {
        format!("token store {}", self.path.display())
    }

    async fn wait_ready(&self, timeout: Duration) -> ReadinessOutcome {
        let store = match TokenStore::open(&self.path).await {
            Ok(store) => store,
            Err(e) => return ReadinessOutcome::Error(e.to_string()),
        };

        let outcome = match store.wait_for_tokens(timeout, self.poll_interval).await {
            Ok(record) => {
                debug!(
                    "Token store populated; access token expires in {}s",
                    record.seconds_until_expiry()
                );
                ReadinessOutcome::Ready
            }
            Err(e) if e.is_not_populated() => ReadinessOutcome::TimedOut,
            Err(e) => ReadinessOutcome::Error(e.to_string()),
        };

        store.close().await;
        outcome
    }
}
