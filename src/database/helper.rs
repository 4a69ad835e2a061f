use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::database::models::EmailVerification;

/// Errors from DbHelper
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    ConnectionError(#[source] sqlx::Error),

    #[error("No unexpired verification code for {0}")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Source of out-of-band email verification codes
#[async_trait]
pub trait VerificationCodes: Send + Sync {
    /// Most recent unexpired code issued for `email`
    async fn fetch_verification_code(&self, email: &str) -> Result<String, DatabaseError>;
}

/// Direct access to the service's database for resetting state and reading
/// rows the service does not expose over HTTP
pub struct DbHelper {
    pool: PgPool,
}

impl DbHelper {
    const RESET_STATEMENTS: [&'static str; 4] = [
        "DROP SCHEMA public CASCADE",
        "CREATE SCHEMA public",
        "GRANT ALL ON SCHEMA public TO postgres",
        "GRANT ALL ON SCHEMA public TO public",
    ];

    pub async fn connect(connection_string: &str) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(connection_string)
            .await
            .map_err(DatabaseError::ConnectionError)?;

        Ok(Self { pool })
    }

    /// Drop and recreate the public schema, then restore its default grants.
    ///
    /// Destroys every table and row in the database. Only point this at a
    /// disposable test database.
    pub async fn reset_schema(&self) -> Result<(), DatabaseError> {
        info!("Dropping all tables");

        let mut tx = self.pool.begin().await?;
        for statement in Self::RESET_STATEMENTS {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;

        Ok(())
    }

    /// Latest verification row for `email` whose expiry is still in the future
    pub async fn find_verification(
        &self,
        email: &str,
    ) -> Result<Option<EmailVerification>, DatabaseError> {
        let row = sqlx::query_as::<_, EmailVerification>(
            "SELECT id, email, verification_code, expired_at
             FROM email_verifications
             WHERE email = $1 AND expired_at > now()
             ORDER BY id DESC
             LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Underlying pool, for queries the helper does not wrap
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database connection");
    }
}

#[async_trait]
impl VerificationCodes for DbHelper {
    async fn fetch_verification_code(&self, email: &str) -> Result<String, DatabaseError> {
        match self.find_verification(email).await? {
            Some(row) => {
                tracing::debug!(email, expired_at = %row.expired_at, "Found verification code");
                Ok(row.code().to_string())
            }
            None => Err(DatabaseError::NotFound(email.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_recreates_schema_before_granting() {
        let statements = DbHelper::RESET_STATEMENTS;
        assert!(statements[0].starts_with("DROP SCHEMA public"));
        assert_eq!(statements[1], "CREATE SCHEMA public");
        assert!(statements[2..].iter().all(|s| s.starts_with("GRANT ALL ON SCHEMA public")));
    }

    #[test]
    fn not_found_names_the_email() {
        let err = DatabaseError::NotFound("test@test.com".to_string());
        assert_eq!(err.to_string(), "No unexpired verification code for test@test.com");
    }
}
