//! Merge sub-answers into one final answer.

use crate::collaborator::{vars, Collaborator};
use crate::types::{AggregatedAnswer, SubQuestion};
use docqa_core::AppResult;

/// Ask the collaborator to compose one answer from the sub-answers.
pub async fn synthesize(
    collaborator: &Collaborator,
    question: &str,
    pairs: &[(SubQuestion, AggregatedAnswer)],
) -> AppResult<String> {
    let definition = &collaborator.prompts().synthesize;
    let evidence = format_evidence(pairs);

    collaborator
        .run(
            definition,
            vars([("question", question), ("evidence", evidence.as_str())]),
        )
        .await
}

/// Evidence block listing every sub-question in order.
pub fn format_evidence(pairs: &[(SubQuestion, AggregatedAnswer)]) -> String {
    pairs
        .iter()
        .map(|(sub, answer)| {
            format!(
                "{}. Sub-question: {}\n   Answer: {}\n   Evidence: {} (confidence: {})",
                sub.order_index + 1,
                sub.text,
                answer.raw_span,
                answer.expanded_sentence,
                answer.confidence
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fallback answer: each sub-question followed by its sentence.
pub fn concatenate(pairs: &[(SubQuestion, AggregatedAnswer)]) -> String {
    pairs
        .iter()
        .map(|(sub, answer)| format!("{} {}", sub.text, answer.expanded_sentence))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Confidence;
    use docqa_llm::MockClient;
    use docqa_prompt::PromptSet;
    use std::sync::Arc;

    fn pairs() -> Vec<(SubQuestion, AggregatedAnswer)> {
        vec![
            (
                SubQuestion::new("What is the capital of France?", 0),
                AggregatedAnswer {
                    raw_span: "Paris".into(),
                    expanded_sentence: "Paris is the capital of France.".into(),
                    score: 0.9,
                    confidence: Confidence::High,
                    source_chunk_index: Some(0),
                },
            ),
            (
                SubQuestion::new("What is France known for?", 1),
                AggregatedAnswer {
                    raw_span: "Eiffel Tower".into(),
                    expanded_sentence: "It is known for the Eiffel Tower.".into(),
                    score: 0.6,
                    confidence: Confidence::Medium,
                    source_chunk_index: Some(0),
                },
            ),
        ]
    }

    #[test]
    fn test_evidence_keeps_order() {
        let evidence = format_evidence(&pairs());
        let first = evidence.find("capital").unwrap();
        let second = evidence.find("Eiffel").unwrap();
        assert!(first < second);
        assert!(evidence.starts_with("1. Sub-question:"));
        assert!(evidence.contains("(confidence: medium)"));
    }

    #[test]
    fn test_concatenate() {
        assert_eq!(
            concatenate(&pairs()),
            "What is the capital of France? Paris is the capital of France.\n\nWhat is France known for? It is known for the Eiffel Tower."
        );
    }

    #[tokio::test]
    async fn test_synthesize_prompt_lists_evidence() {
        let client = Arc::new(MockClient::new().with_reply("Paris, home of the Eiffel Tower."));
        let collab = Collaborator::new(client.clone(), PromptSet::builtin(), 5);

        let text = synthesize(&collab, "Tell me about France", &pairs())
            .await
            .unwrap();

        assert_eq!(text, "Paris, home of the Eiffel Tower.");
        let prompt = &client.prompts()[0];
        assert!(prompt.contains("User question: Tell me about France"));
        assert!(prompt.contains("It is known for the Eiffel Tower."));
    }
}
