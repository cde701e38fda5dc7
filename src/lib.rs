pub mod aws;
pub mod billing;
pub mod commands;
pub mod config;
pub mod error;
pub mod handler;
pub mod notifier;
pub mod report;

pub use config::Config;
pub use error::{AppError, Result};
pub use handler::{InvocationContext, handle};
