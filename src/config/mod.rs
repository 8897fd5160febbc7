pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "cpp-merge")]
#[command(about = "Flattens a C++ project into a single self-contained source file")]
pub struct CliConfig {
    #[arg(long, default_value = ".")]
    pub project_root: String,

    #[arg(long, default_value = "src/main.cpp")]
    pub entry: String,

    #[arg(long, default_value = "merged.cpp")]
    pub output: String,

    #[arg(long, default_value = "include")]
    pub include_dir: String,

    #[arg(long, default_value = "src")]
    pub source_dir: String,

    #[arg(long, help = "Write a JSON merge report next to the output")]
    pub report: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Load settings from a TOML config file instead of flags")]
    pub config: Option<String>,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn project_root(&self) -> &str {
        &self.project_root
    }

    fn entry_file(&self) -> &str {
        &self.entry
    }

    fn output_file(&self) -> &str {
        &self.output
    }

    fn include_dir(&self) -> &str {
        &self.include_dir
    }

    fn source_dir(&self) -> &str {
        &self.source_dir
    }

    fn write_report(&self) -> bool {
        self.report
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("project_root", &self.project_root)?;
        validation::validate_path("entry", &self.entry)?;
        validation::validate_file_extension("entry", &self.entry, &["cpp", "cc", "cxx"])?;
        validation::validate_path("output", &self.output)?;
        validation::validate_non_empty_string("include_dir", &self.include_dir)?;
        validation::validate_non_empty_string("source_dir", &self.source_dir)?;
        Ok(())
    }
}
