use chrono::Utc;

/// The single row of the `tokens` table.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) at which the access token expires
    pub expires_at: i64,
    /// Unix timestamp (fractional seconds) of the last write
    pub updated_at: f64,
}

impl TokenRecord {
    /// Seconds left before the access token expires; negative once expired.
    pub fn seconds_until_expiry(&self) -> i64 {
        self.expires_at - Utc::now().timestamp()
    }
}
