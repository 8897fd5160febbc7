use crate::core::ConfigProvider;
use crate::utils::error::{MergeError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub project: ProjectConfig,
    pub source: SourceConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub root: String,
    pub entry: String,
    pub include_dir: Option<String>,
    pub source_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub report: Option<bool>,
}

impl TomlConfig {
    /// Loads a config from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MergeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses a config from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MergeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Substitutes environment variables of the form `${VAR_NAME}`.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("project.name", &self.project.name)?;
        validation::validate_path("source.root", &self.source.root)?;
        validation::validate_path("source.entry", &self.source.entry)?;
        validation::validate_file_extension(
            "source.entry",
            &self.source.entry,
            &["cpp", "cc", "cxx"],
        )?;
        validation::validate_path("load.output_path", &self.load.output_path)?;

        if let Some(include_dir) = &self.source.include_dir {
            validation::validate_non_empty_string("source.include_dir", include_dir)?;
        }
        if let Some(source_dir) = &self.source.source_dir {
            validation::validate_non_empty_string("source.source_dir", source_dir)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn project_root(&self) -> &str {
        &self.source.root
    }

    fn entry_file(&self) -> &str {
        &self.source.entry
    }

    fn output_file(&self) -> &str {
        &self.load.output_path
    }

    fn include_dir(&self) -> &str {
        self.source.include_dir.as_deref().unwrap_or("include")
    }

    fn source_dir(&self) -> &str {
        self.source.source_dir.as_deref().unwrap_or("src")
    }

    fn write_report(&self) -> bool {
        self.load.report.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[project]
name = "external-sort"

[source]
root = "."
entry = "src/external_sort_task.cpp"

[load]
output_path = "external_sort_merged.cpp"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.project.name, "external-sort");
        assert_eq!(config.entry_file(), "src/external_sort_task.cpp");
        assert_eq!(config.include_dir(), "include");
        assert_eq!(config.source_dir(), "src");
        assert!(!config.write_report());
    }

    #[test]
    fn test_directory_overrides() {
        let toml_content = r#"
[project]
name = "custom-layout"

[source]
root = "."
entry = "sources/main.cpp"
include_dir = "headers"
source_dir = "sources"

[load]
output_path = "merged.cpp"
report = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.include_dir(), "headers");
        assert_eq!(config.source_dir(), "sources");
        assert!(config.write_report());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_MERGE_ROOT", "/tmp/project");

        let toml_content = r#"
[project]
name = "test"

[source]
root = "${TEST_MERGE_ROOT}"
entry = "src/main.cpp"

[load]
output_path = "merged.cpp"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.project_root(), "/tmp/project");

        std::env::remove_var("TEST_MERGE_ROOT");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[project]
name = ""

[source]
root = "."
entry = "src/main.cpp"

[load]
output_path = "merged.cpp"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_cpp_entry_rejected() {
        let toml_content = r#"
[project]
name = "wrong-entry"

[source]
root = "."
entry = "src/main.py"

[load]
output_path = "merged.cpp"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[project]
name = "file-test"

[source]
root = "."
entry = "src/main.cpp"

[load]
output_path = "merged.cpp"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.project.name, "file-test");
    }
}
