use crate::domain::model::{MergeResult, SourceUnit};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn project_root(&self) -> &str;
    fn entry_file(&self) -> &str;
    fn output_file(&self) -> &str;
    fn include_dir(&self) -> &str;
    fn source_dir(&self) -> &str;
    fn write_report(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SourceUnit>;
    async fn transform(&self, entry: SourceUnit) -> Result<MergeResult>;
    async fn load(&self, result: MergeResult) -> Result<String>;
}
