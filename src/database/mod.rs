pub mod helper;
pub mod models;

pub use helper::{DatabaseError, DbHelper, VerificationCodes};
pub use models::EmailVerification;
