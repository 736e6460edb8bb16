//! Built-in prompt definitions.

use crate::types::{PromptBehavior, PromptDefinition, PromptOutputSpec};

pub const REFINE_PROMPT_ID: &str = "qa.refine";
pub const DECOMPOSE_PROMPT_ID: &str = "qa.decompose";
pub const SYNTHESIZE_PROMPT_ID: &str = "qa.synthesize";

/// Every built-in prompt id, in pipeline order.
pub const BUILTIN_PROMPT_IDS: [&str; 3] =
    [DECOMPOSE_PROMPT_ID, REFINE_PROMPT_ID, SYNTHESIZE_PROMPT_ID];

const REFINE_SYSTEM: &str = "You help refine answers that were extracted from a document. \
Never add facts that are not in the extracted answer or its supporting sentence.";

const REFINE_TEMPLATE: &str = "Question: {{question}}

Extracted answer: {{answer}}

Supporting sentence from the document: {{context}}

Rewrite the extracted answer as a complete, natural reply to the question. \
If the supporting sentence does not fully answer the question, only improve the \
phrasing of the extracted answer. Be concise but thorough.";

const DECOMPOSE_TEMPLATE: &str = "Break the question below into 2 to 4 simple, \
self-contained sub-questions that can each be answered from a single document. \
Order them so that earlier answers help with later ones.
Return ONLY the sub-questions, one per line.

Question: {{question}}";

const SYNTHESIZE_SYSTEM: &str =
    "Compose the final answer using only the evidence provided by the user.";

const SYNTHESIZE_TEMPLATE: &str = "User question: {{question}}

Evidence collected from the document:
{{evidence}}

Write one coherent answer to the user question based ONLY on the evidence above. \
Refer to each piece of evidence that is relevant.

Final answer:";

fn definition(
    id: &str,
    title: &str,
    system: Option<&str>,
    template: &str,
    variables: &[&str],
    temperature: f32,
    format: &str,
) -> PromptDefinition {
    PromptDefinition {
        id: id.to_string(),
        title: title.to_string(),
        api_version: "1.0".to_string(),
        created_by: "docqa".to_string(),
        behavior: PromptBehavior {
            tone: "neutral".to_string(),
            style: "concise".to_string(),
            temperature: Some(temperature),
        },
        system: system.map(str::to_string),
        template: template.to_string(),
        variables: variables.iter().map(|v| v.to_string()).collect(),
        output: PromptOutputSpec {
            format: format.to_string(),
        },
    }
}

/// Rephrase an extracted answer without changing its facts.
pub fn refine() -> PromptDefinition {
    definition(
        REFINE_PROMPT_ID,
        "Refine extracted answer",
        Some(REFINE_SYSTEM),
        REFINE_TEMPLATE,
        &["question", "answer", "context"],
        0.3,
        "text",
    )
}

/// Split a complex question into ordered sub-questions.
pub fn decompose() -> PromptDefinition {
    definition(
        DECOMPOSE_PROMPT_ID,
        "Decompose question",
        None,
        DECOMPOSE_TEMPLATE,
        &["question"],
        0.2,
        "lines",
    )
}

/// Merge sub-answers into one final answer.
pub fn synthesize() -> PromptDefinition {
    definition(
        SYNTHESIZE_PROMPT_ID,
        "Synthesize final answer",
        Some(SYNTHESIZE_SYSTEM),
        SYNTHESIZE_TEMPLATE,
        &["question", "evidence"],
        0.3,
        "text",
    )
}

/// Look up a built-in definition by id.
pub fn by_id(id: &str) -> Option<PromptDefinition> {
    match id {
        REFINE_PROMPT_ID => Some(refine()),
        DECOMPOSE_PROMPT_ID => Some(decompose()),
        SYNTHESIZE_PROMPT_ID => Some(synthesize()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_reference_their_variables() {
        for id in BUILTIN_PROMPT_IDS {
            let def = by_id(id).unwrap();
            for var in &def.variables {
                assert!(
                    def.template.contains(&format!("{{{{{}}}}}", var)),
                    "{} does not use {}",
                    id,
                    var
                );
            }
        }
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(by_id("qa.unknown").is_none());
    }
}
