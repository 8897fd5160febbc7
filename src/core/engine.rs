use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct MergeEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> MergeEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        println!("Starting merge...");

        // Extract
        let entry = self.pipeline.extract().await?;
        println!("Processing main file: {}", entry.relative_path);

        // Transform
        let result = self.pipeline.transform(entry).await?;
        println!(
            "Processed {} unique files (headers and sources).",
            result.processed_files.len()
        );

        // Load
        let output_path = self.pipeline.load(result.clone()).await?;
        println!("Merged file created: {}", output_path);

        println!("Processed files (relative to project root):");
        for relative_path in &result.processed_files {
            println!("  {}", relative_path);
        }

        Ok(output_path)
    }
}
