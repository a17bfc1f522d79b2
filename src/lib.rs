pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::CsvStore;
pub use api::{create_router, AppState};
pub use config::ServiceConfig;
pub use crate::core::{Recommender, RecordService};
pub use utils::error::{RecommenderError, Result};
