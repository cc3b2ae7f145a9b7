pub mod config;
pub mod errors;
pub mod logging;

pub use config::{AppConfig, AppPaths};
pub use errors::AssistantError;
