//! Cloud generation collaborator shared by refine, decompose and synthesize.

use docqa_core::{AppError, AppResult};
use docqa_llm::{LlmClient, LlmRequest};
use docqa_prompt::{build_prompt, PromptDefinition, PromptSet};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// LLM client plus the prompts and deadline every call site uses.
#[derive(Clone)]
pub struct Collaborator {
    client: Arc<dyn LlmClient>,
    prompts: PromptSet,
    timeout_secs: u64,
}

impl std::fmt::Debug for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborator")
            .field("provider", &self.client.provider_name())
            .field("model", &self.client.model_name())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Collaborator {
    pub fn new(client: Arc<dyn LlmClient>, prompts: PromptSet, timeout_secs: u64) -> Self {
        Self {
            client,
            prompts,
            timeout_secs,
        }
    }

    pub fn prompts(&self) -> &PromptSet {
        &self.prompts
    }

    /// Render `definition` and return the collaborator's trimmed reply.
    ///
    /// Expiry of the deadline is `CollaboratorTimeout`; a blank reply is a
    /// collaborator error.
    pub async fn run(
        &self,
        definition: &PromptDefinition,
        variables: HashMap<String, String>,
    ) -> AppResult<String> {
        let built = build_prompt(definition, variables)?;

        let mut request = LlmRequest::new(built.user, self.client.model_name());
        if let Some(system) = built.system {
            request = request.with_system(system);
        }
        if let Some(temperature) = built.temperature {
            request = request.with_temperature(temperature);
        }

        tracing::debug!(
            prompt = %definition.id,
            provider = %self.client.provider_name(),
            "Calling generation collaborator"
        );

        let response = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            self.client.complete(&request),
        )
        .await
        .map_err(|_| AppError::CollaboratorTimeout(self.timeout_secs))??;

        let text = response.content.trim();
        if text.is_empty() {
            return Err(AppError::Collaborator(format!(
                "Empty reply for prompt {}",
                definition.id
            )));
        }

        Ok(text.to_string())
    }
}

/// Build a variables map from string pairs.
pub(crate) fn vars<const N: usize>(pairs: [(&str, &str); N]) -> HashMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_llm::MockClient;

    fn collaborator(client: MockClient, timeout_secs: u64) -> Collaborator {
        Collaborator::new(Arc::new(client), PromptSet::builtin(), timeout_secs)
    }

    #[tokio::test]
    async fn test_run_renders_prompt() {
        let client = Arc::new(MockClient::from_fn(|_| Ok("  sub answer \n".to_string())));
        let collab = Collaborator::new(client.clone(), PromptSet::builtin(), 5);

        let text = collab
            .run(
                &collab.prompts().decompose.clone(),
                vars([("question", "Who and when?")]),
            )
            .await
            .unwrap();

        assert_eq!(text, "sub answer");
        assert!(client.prompts()[0].contains("Question: Who and when?"));
    }

    #[tokio::test]
    async fn test_timeout_is_collaborator_timeout() {
        let client = MockClient::new().with_delay(Duration::from_secs(5));
        let collab = collaborator(client, 1);
        let def = collab.prompts().decompose.clone();

        let err = collab.run(&def, vars([("question", "q")])).await.unwrap_err();
        assert!(matches!(err, AppError::CollaboratorTimeout(1)));
    }

    #[tokio::test]
    async fn test_blank_reply_is_error() {
        let collab = collaborator(MockClient::new().with_reply("   "), 5);
        let def = collab.prompts().decompose.clone();
        let err = collab.run(&def, vars([("question", "q")])).await.unwrap_err();
        assert!(err.is_collaborator_error());
    }
}
