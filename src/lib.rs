pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use core::{engine::MergeEngine, pipeline::AmalgamationPipeline};
pub use utils::error::{MergeError, Result};
