use crate::domain::model::TransformResult;
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
    fn guide_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn state_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn bundle_output(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<String>;
    async fn transform(&self, raw: String) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
