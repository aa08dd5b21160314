// Library root - exports for the binary and the integration tests

pub mod config;
pub mod datauri;
pub mod dispatcher;
pub mod metadata;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use dispatcher::{Dispatcher, RunSummary};
