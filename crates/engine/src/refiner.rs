//! Fluent rewrite of an extracted answer.

use crate::collaborator::{vars, Collaborator};
use crate::types::AggregatedAnswer;
use docqa_core::AppResult;

/// Ask the collaborator to rephrase an aggregated answer.
pub async fn refine(
    collaborator: &Collaborator,
    question: &str,
    answer: &AggregatedAnswer,
) -> AppResult<String> {
    refine_text(
        collaborator,
        question,
        &answer.raw_span,
        &answer.expanded_sentence,
    )
    .await
}

/// Rephrase `answer` given its supporting `context`.
pub async fn refine_text(
    collaborator: &Collaborator,
    question: &str,
    answer: &str,
    context: &str,
) -> AppResult<String> {
    let definition = &collaborator.prompts().refine;
    let refined = collaborator
        .run(
            definition,
            vars([
                ("question", question),
                ("answer", answer),
                ("context", context),
            ]),
        )
        .await?;

    tracing::debug!("Refined answer: {} chars", refined.len());
    Ok(refined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Confidence;
    use docqa_llm::MockClient;
    use docqa_prompt::PromptSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_refine_sends_span_and_sentence() {
        let client = Arc::new(MockClient::new().with_reply("The capital of France is Paris."));
        let collab = Collaborator::new(client.clone(), PromptSet::builtin(), 5);
        let answer = AggregatedAnswer {
            raw_span: "Paris".to_string(),
            expanded_sentence: "Paris is the capital of France.".to_string(),
            score: 0.95,
            confidence: Confidence::High,
            source_chunk_index: Some(0),
        };

        let refined = refine(&collab, "What is the capital of France?", &answer)
            .await
            .unwrap();

        assert_eq!(refined, "The capital of France is Paris.");
        let prompt = &client.prompts()[0];
        assert!(prompt.contains("What is the capital of France?"));
        assert!(prompt.contains("Extracted answer: Paris"));
        assert!(prompt.contains("Paris is the capital of France."));
    }
}
