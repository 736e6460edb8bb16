//! Prompt types for docqa.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::builtin;

/// A prompt definition, built in or loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Behavioral settings
    pub behavior: PromptBehavior,

    /// Optional system instruction (Handlebars)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Template string with Handlebars syntax
    pub template: String,

    /// Variables the template requires
    #[serde(default)]
    pub variables: Vec<String>,

    /// Output specification
    pub output: PromptOutputSpec,
}

/// Behavioral settings for prompt execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptBehavior {
    /// Tone (e.g., "neutral", "professional")
    pub tone: String,

    /// Style (e.g., "concise", "detailed")
    pub style: String,

    /// Sampling temperature passed to the collaborator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Output specification for the prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptOutputSpec {
    /// Output format (e.g., "text", "lines")
    pub format: String,
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message (optional)
    pub system: Option<String>,

    /// User message (required)
    pub user: String,

    /// Sampling temperature from the definition
    pub temperature: Option<f32>,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Template variables that were resolved
    #[serde(rename = "resolvedVariables")]
    pub resolved_variables: HashMap<String, String>,
}

impl BuiltPrompt {
    /// Create a new built prompt.
    pub fn new(
        system: Option<String>,
        user: String,
        temperature: Option<f32>,
        source_prompt_id: String,
        resolved_variables: HashMap<String, String>,
    ) -> Self {
        Self {
            system,
            user,
            temperature,
            metadata: BuiltPromptMetadata {
                source_prompt_id,
                resolved_variables,
            },
        }
    }
}

/// The three prompts the answer pipeline sends to the collaborator.
#[derive(Debug, Clone)]
pub struct PromptSet {
    pub refine: PromptDefinition,
    pub decompose: PromptDefinition,
    pub synthesize: PromptDefinition,
}

impl PromptSet {
    /// Built-in prompts, no workspace overrides.
    pub fn builtin() -> Self {
        Self {
            refine: builtin::refine(),
            decompose: builtin::decompose(),
            synthesize: builtin::synthesize(),
        }
    }
}

impl Default for PromptSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: qa.refine
title: Custom refine
apiVersion: "1.0"
createdBy: test
behavior:
  tone: professional
  style: concise
  temperature: 0.1
system: "You rewrite answers."
template: "{{question}} -> {{answer}}"
variables: [question, answer]
output:
  format: text
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "qa.refine");
        assert_eq!(def.behavior.tone, "professional");
        assert_eq!(def.behavior.temperature, Some(0.1));
        assert_eq!(def.system.as_deref(), Some("You rewrite answers."));
        assert_eq!(def.variables, vec!["question", "answer"]);
    }

    #[test]
    fn test_built_prompt_creation() {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "test".to_string());

        let built = BuiltPrompt::new(
            Some("System message".to_string()),
            "User message".to_string(),
            Some(0.3),
            "qa.refine".to_string(),
            vars,
        );

        assert_eq!(built.system, Some("System message".to_string()));
        assert_eq!(built.user, "User message");
        assert_eq!(built.metadata.source_prompt_id, "qa.refine");
        assert_eq!(built.metadata.resolved_variables.len(), 1);
    }

    #[test]
    fn test_builtin_prompt_set_ids() {
        let set = PromptSet::builtin();
        assert_eq!(set.refine.id, builtin::REFINE_PROMPT_ID);
        assert_eq!(set.decompose.id, builtin::DECOMPOSE_PROMPT_ID);
        assert_eq!(set.synthesize.id, builtin::SYNTHESIZE_PROMPT_ID);
    }
}
