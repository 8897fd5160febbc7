use crate::core::expander::Expander;
use crate::core::resolver;
use crate::core::{ConfigProvider, MergeReport, MergeResult, Pipeline, SourceUnit, Storage, UnitRole};
use crate::utils::error::{MergeError, Result};
use std::fs;
use std::path::Path;

/// The merge pipeline: extract reads the entry translation unit, transform
/// expands the inclusion graph into the final document, load performs the
/// single write. The document is assembled fully in memory; nothing touches
/// the output path on a failed run.
pub struct AmalgamationPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> AmalgamationPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn assemble_document(externals: &[String], body: &[String]) -> String {
        let mut lines = Vec::with_capacity(externals.len() + body.len() + 4);
        lines.push("// Amalgamated single-file build".to_string());
        lines.push("// Generated by cpp-merge".to_string());
        lines.push(String::new());
        lines.extend(externals.iter().cloned());
        lines.push(String::new());
        lines.extend(body.iter().cloned());
        lines.join("\n")
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for AmalgamationPipeline<S, C> {
    async fn extract(&self) -> Result<SourceUnit> {
        let entry_abs = Path::new(self.config.project_root()).join(self.config.entry_file());
        if !entry_abs.exists() {
            return Err(MergeError::MissingEntryFile {
                path: entry_abs.display().to_string(),
            });
        }

        tracing::debug!("Reading entry unit: {}", self.config.entry_file());
        let bytes = self.storage.read_file(self.config.entry_file()).await?;
        let content = String::from_utf8(bytes)?;

        let root = fs::canonicalize(self.config.project_root())?;
        let path = fs::canonicalize(entry_abs)?;
        let relative_path = resolver::relative_display(&path, &root);

        Ok(SourceUnit {
            path,
            relative_path,
            content,
            role: UnitRole::Entry,
        })
    }

    async fn transform(&self, entry: SourceUnit) -> Result<MergeResult> {
        let root = fs::canonicalize(self.config.project_root())?;

        let mut expander = Expander::new(
            &root,
            self.config.include_dir(),
            self.config.source_dir(),
        );
        expander.mark_visited(entry.path.clone());
        let body = expander.expand(&entry.content, &entry.path)?;
        let (external_includes, processed_files) = expander.finish();

        tracing::debug!(
            "Expansion finished: {} units, {} external includes",
            processed_files.len(),
            external_includes.len()
        );

        let document = Self::assemble_document(&external_includes, &body);

        Ok(MergeResult {
            document,
            processed_files,
            external_includes,
        })
    }

    async fn load(&self, result: MergeResult) -> Result<String> {
        self.storage
            .write_file(self.config.output_file(), result.document.as_bytes())
            .await?;

        if self.config.write_report() {
            let report = MergeReport::from_result(&result);
            let json = serde_json::to_string_pretty(&report)?;
            let report_path = format!("{}.report.json", self.config.output_file());
            tracing::debug!("Writing merge report: {}", report_path);
            self.storage.write_file(&report_path, json.as_bytes()).await?;
        }

        Ok(format!(
            "{}/{}",
            self.config.project_root(),
            self.config.output_file()
        ))
    }
}
