use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::InferenceError;

/// A generative-language endpoint: one prompt in, the model's text out.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError>;

    /// Model identifier, reported by the health endpoint
    fn model_name(&self) -> String;
}

#[async_trait]
impl<T> InferenceClient for Arc<T>
where
    T: InferenceClient + ?Sized,
{
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        (**self).generate(prompt).await
    }

    fn model_name(&self) -> String {
        (**self).model_name()
    }
}
