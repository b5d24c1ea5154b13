use crate::{BUSY_TIMEOUT, TokenRecord, TokenStoreError, TokenStoreResult};

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use error_location::ErrorLocation;
use log::debug;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tokio::time::Instant;

const CREATE_TOKENS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS tokens (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        access_token TEXT NOT NULL,
        refresh_token TEXT NOT NULL,
        expires_at INTEGER NOT NULL,
        updated_at REAL NOT NULL
    )
"#;

/// SQLite-backed token store shared across processes.
pub struct TokenStore {
    pool: SqlitePool,
    path: PathBuf,
}

impl TokenStore {
    /// Open (creating if needed) the store at `path`.
    ///
    /// The schema is created idempotently so readers and the writer can
    /// start in either order.
    pub async fn open(path: &Path) -> TokenStoreResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| TokenStoreError::Directory {
                path: parent.to_path_buf(),
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .synchronous(SqliteSynchronous::Normal)
                    .busy_timeout(BUSY_TIMEOUT),
            )
            .await?;

        sqlx::query(CREATE_TOKENS_TABLE).execute(&pool).await?;

        debug!("Token store opened at {}", path.display());

        Ok(Self {
            pool,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or replace the token row.
    pub async fn set_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
        expires_at: i64,
    ) -> TokenStoreResult<()> {
        let updated_at = Utc::now().timestamp_millis() as f64 / 1000.0;

        sqlx::query(
            r#"
            INSERT INTO tokens (id, access_token, refresh_token, expires_at, updated_at)
            VALUES (1, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                access_token = excluded.access_token,
                refresh_token = excluded.refresh_token,
                expires_at = excluded.expires_at,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(access_token)
        .bind(refresh_token)
        .bind(expires_at)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        debug!("Token store updated; expires_at={expires_at}");
        Ok(())
    }

    /// Read the token row, if the token manager has written one.
    pub async fn get_tokens(&self) -> TokenStoreResult<Option<TokenRecord>> {
        let row: Option<(String, String, i64, f64)> = sqlx::query_as(
            "SELECT access_token, refresh_token, expires_at, updated_at FROM tokens WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(access_token, refresh_token, expires_at, updated_at)| TokenRecord {
                access_token,
                refresh_token,
                expires_at,
                updated_at,
            },
        ))
    }

    pub async fn clear(&self) -> TokenStoreResult<()> {
        sqlx::query("DELETE FROM tokens WHERE id = 1")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Poll until the token row exists or `timeout` has elapsed.
    ///
    /// The store is always read at least once, so a zero timeout still
    /// succeeds when the row is already there. Database errors end the
    /// wait immediately.
    pub async fn wait_for_tokens(
        &self,
        timeout: Duration,
        poll_interval: Duration,
    ) -> TokenStoreResult<TokenRecord> {
        // None: the timeout is too large to represent, wait indefinitely
        let deadline = Instant::now().checked_add(timeout);

        loop {
            if let Some(record) = self.get_tokens().await? {
                return Ok(record);
            }

            let now = Instant::now();
            let pause = match deadline {
                Some(deadline) if now >= deadline => {
                    return Err(TokenStoreError::NotPopulated {
                        timeout_secs: timeout.as_secs_f64(),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
                Some(deadline) => poll_interval.min(deadline - now),
                None => poll_interval,
            };

            tokio::time::sleep(pause).await;
        }
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
