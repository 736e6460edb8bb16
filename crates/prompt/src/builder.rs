//! Prompt builder for rendering templates.

use crate::types::{BuiltPrompt, PromptDefinition};
use docqa_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build a prompt from a definition and input variables.
///
/// Every variable the definition declares must be present. Both the system
/// instruction and the user template are rendered without HTML escaping.
///
/// # Example
/// ```no_run
/// use docqa_prompt::{build_prompt, builtin};
/// use std::collections::HashMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut vars = HashMap::new();
/// vars.insert("question".to_string(), "Who founded the company?".to_string());
///
/// let built = build_prompt(&builtin::decompose(), vars)?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    for var in &definition.variables {
        if !variables.contains_key(var) {
            return Err(AppError::Prompt(format!(
                "Missing variable '{}' for prompt {}",
                var, definition.id
            )));
        }
    }

    let user = render_template(&definition.template, &variables)?;
    let system = definition
        .system
        .as_deref()
        .map(|s| render_template(s, &variables))
        .transpose()?;

    Ok(BuiltPrompt::new(
        system,
        user,
        definition.behavior.temperature,
        definition.id.clone(),
        variables,
    ))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Document text must reach the model verbatim.
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_simple_template() {
        let result = render_template("Question: {{question}}", &vars(&[("question", "Hi")]));
        assert_eq!(result.unwrap(), "Question: Hi");
    }

    #[test]
    fn test_no_html_escaping() {
        let result = render_template("{{answer}}", &vars(&[("answer", "a < b & \"c\"")]));
        assert_eq!(result.unwrap(), "a < b & \"c\"");
    }

    #[test]
    fn test_build_refine_prompt() {
        let built = build_prompt(
            &builtin::refine(),
            vars(&[
                ("question", "What is the capital of France?"),
                ("answer", "Paris"),
                ("context", "The capital of France is Paris."),
            ]),
        )
        .unwrap();

        assert!(built.user.contains("Extracted answer: Paris"));
        assert!(built.user.contains("The capital of France is Paris."));
        assert!(built.system.is_some());
        assert_eq!(built.temperature, Some(0.3));
        assert_eq!(built.metadata.source_prompt_id, "qa.refine");
    }

    #[test]
    fn test_missing_variable_is_error() {
        let result = build_prompt(&builtin::refine(), vars(&[("question", "q")]));
        match result {
            Err(AppError::Prompt(msg)) => assert!(msg.contains("answer")),
            other => panic!("Expected prompt error, got {:?}", other),
        }
    }

    #[test]
    fn test_decompose_has_no_system() {
        let built = build_prompt(&builtin::decompose(), vars(&[("question", "q")])).unwrap();
        assert!(built.system.is_none());
        assert!(built.user.ends_with("Question: q"));
    }
}
