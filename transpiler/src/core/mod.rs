//! Core application infrastructure

pub(crate) mod banner;
pub mod cli;
pub mod config;
pub mod constants;

pub use crate::app::CliApp;
pub use cli::{CliConfig, Commands};
pub use config::AppConfig;
