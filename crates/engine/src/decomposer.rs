//! Question decomposition for recursive mode.

use crate::collaborator::{vars, Collaborator};
use crate::types::{PipelineWarning, SubQuestion};

/// Split `question` into ordered sub-questions.
///
/// Always returns at least one sub-question. When the collaborator fails or
/// judges the question atomic, the only element is the question itself; a
/// failure also yields a `DecomposeFailed` warning.
pub async fn decompose(
    collaborator: &Collaborator,
    question: &str,
    max_sub_questions: usize,
) -> (Vec<SubQuestion>, Option<PipelineWarning>) {
    let definition = &collaborator.prompts().decompose;

    match collaborator
        .run(definition, vars([("question", question)]))
        .await
    {
        Ok(reply) => {
            let parsed = parse_sub_questions(&reply, max_sub_questions);
            tracing::info!("Decomposed into {} sub-questions", parsed.len());

            if parsed.len() <= 1 {
                (single(question), None)
            } else {
                let subs = parsed
                    .into_iter()
                    .enumerate()
                    .map(|(i, text)| SubQuestion::new(text, i))
                    .collect();
                (subs, None)
            }
        }
        Err(e) => {
            tracing::warn!("Decomposition failed, answering as one question: {}", e);
            (
                single(question),
                Some(PipelineWarning::DecomposeFailed(e.to_string())),
            )
        }
    }
}

fn single(question: &str) -> Vec<SubQuestion> {
    vec![SubQuestion::new(question, 0)]
}

/// Parse one sub-question per line.
///
/// List markers are stripped, blank lines, preamble lines ending in `:` and
/// exact duplicates are dropped, and at most `max` lines are kept.
pub fn parse_sub_questions(reply: &str, max: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    for line in reply.lines() {
        let text = strip_marker(line.trim()).trim();
        if text.is_empty() || text.ends_with(':') {
            continue;
        }
        if out.iter().any(|existing| existing == text) {
            continue;
        }
        out.push(text.to_string());
        if out.len() == max {
            break;
        }
    }

    out
}

fn strip_marker(line: &str) -> &str {
    if let Some(rest) = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('*'))
        .or_else(|| line.strip_prefix('•'))
    {
        return rest;
    }

    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest;
        }
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_core::AppError;
    use docqa_llm::MockClient;
    use docqa_prompt::PromptSet;
    use std::sync::Arc;

    fn collab(client: MockClient) -> Collaborator {
        Collaborator::new(Arc::new(client), PromptSet::builtin(), 5)
    }

    #[test]
    fn test_parse_strips_markers() {
        let reply = "Here are the sub-questions:\n1. What is X?\n2) Who made X?\n- When?\n* Where?\n• Why?";
        let parsed = parse_sub_questions(reply, 10);
        assert_eq!(
            parsed,
            vec!["What is X?", "Who made X?", "When?", "Where?", "Why?"]
        );
    }

    #[test]
    fn test_parse_drops_duplicates_and_caps() {
        let reply = "A?\n\nA?\nB?\nC?\nD?\nE?";
        assert_eq!(parse_sub_questions(reply, 4), vec!["A?", "B?", "C?", "D?"]);
    }

    #[test]
    fn test_year_is_not_a_marker() {
        assert_eq!(
            parse_sub_questions("2024 revenue?", 4),
            vec!["2024 revenue?"]
        );
    }

    #[tokio::test]
    async fn test_decompose_orders_sub_questions() {
        let client = MockClient::new()
            .with_reply("- What is the capital of France?\n- What is France known for?");
        let (subs, warning) = decompose(&collab(client), "Tell me about France", 4).await;

        assert!(warning.is_none());
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].text, "What is the capital of France?");
        assert_eq!(subs[1].order_index, 1);
    }

    #[tokio::test]
    async fn test_atomic_question() {
        let client = MockClient::new().with_reply("What is the capital of France?");
        let (subs, warning) = decompose(&collab(client), "Capital?", 4).await;

        assert!(warning.is_none());
        assert_eq!(subs, vec![SubQuestion::new("Capital?", 0)]);
    }

    #[tokio::test]
    async fn test_failure_falls_back_with_warning() {
        let client = MockClient::new().with_error(AppError::RateLimited("quota".into()));
        let (subs, warning) = decompose(&collab(client), "Capital?", 4).await;

        assert_eq!(subs, vec![SubQuestion::new("Capital?", 0)]);
        assert!(matches!(warning, Some(PipelineWarning::DecomposeFailed(_))));
    }
}
