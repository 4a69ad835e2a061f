use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the service's `email_verifications` table.
///
/// Written by the service when a verification code is requested; the harness
/// only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmailVerification {
    pub id: i64,
    pub email: String,
    pub verification_code: String,
    pub expired_at: DateTime<Utc>,
}

impl EmailVerification {
    /// Code without the blank padding of the fixed-width column
    pub fn code(&self) -> &str {
        self.verification_code.trim()
    }
}
