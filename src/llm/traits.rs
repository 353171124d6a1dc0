use crate::model::LlmError;

/// Black-box text completion. Returns the raw assistant text, uninterpreted.
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
}
