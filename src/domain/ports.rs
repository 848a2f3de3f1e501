use crate::utils::error::Result;
use async_trait::async_trait;

/// Text-in, text-out access to a hosted model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

pub trait ModelSettings: Send + Sync {
    fn api_key(&self) -> Option<&str>;
    fn model(&self) -> &str;
    fn endpoint(&self) -> &str;
}
