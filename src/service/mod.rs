pub mod health;
pub mod process;

pub use health::wait_for_service;
pub use process::{LogBuffer, ServiceProcess};
