pub mod client;
pub mod response;

pub use client::{ServiceClient, USER_TOKEN_HEADER};
pub use response::ApiResponse;
