//! Scripted generation client for tests and offline runs.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use docqa_core::{AppError, AppResult};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

type Responder = Box<dyn Fn(&LlmRequest) -> AppResult<String> + Send + Sync>;

/// Mock client with scripted replies.
///
/// Queued replies are consumed first, in order. Once the queue is empty the
/// responder function answers. Every prompt is recorded so tests can assert
/// what the pipeline sent.
pub struct MockClient {
    responder: Responder,
    queue: Mutex<VecDeque<AppResult<String>>>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl MockClient {
    /// Mock that echoes the prompt back.
    pub fn new() -> Self {
        Self::from_fn(|request| Ok(request.prompt.clone()))
    }

    /// Mock that answers every prompt with the given function.
    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(&LlmRequest) -> AppResult<String> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            queue: Mutex::new(VecDeque::new()),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Mock whose every call fails with a collaborator error.
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::from_fn(move |_| Err(AppError::Collaborator(message.clone())))
    }

    /// Queue a successful reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.lock_queue().push_back(Ok(text.into()));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, error: AppError) -> Self {
        self.lock_queue().push_back(Err(error));
        self
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, VecDeque<AppResult<String>>> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.prompt.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let queued = self.lock_queue().pop_front();
        let content = match queued {
            Some(reply) => reply?,
            None => (self.responder)(request)?,
        };

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_echoes_by_default() {
        let client = MockClient::new();
        let text = client.generate("hello").await.unwrap();
        assert_eq!(text, "hello");
        assert_eq!(client.prompts(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn test_queued_replies_come_first() {
        let client = MockClient::from_fn(|_| Ok("fallback".to_string()))
            .with_reply("first")
            .with_error(AppError::RateLimited("quota".to_string()));

        assert_eq!(client.generate("a").await.unwrap(), "first");
        assert!(matches!(
            client.generate("b").await,
            Err(AppError::RateLimited(_))
        ));
        assert_eq!(client.generate("c").await.unwrap(), "fallback");
        assert_eq!(client.call_count(), 3);
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let client = MockClient::failing("offline");
        let err = client.generate("x").await.unwrap_err();
        assert!(err.is_collaborator_error());
        assert!(err.to_string().contains("offline"));
    }
}
