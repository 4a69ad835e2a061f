pub mod api;
pub mod cases;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod runner;
pub mod service;

pub use error::HarnessError;
