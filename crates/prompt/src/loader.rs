//! Prompt loader for workspace overrides.

use crate::builtin::{self, BUILTIN_PROMPT_IDS};
use crate::types::{PromptDefinition, PromptSet};
use docqa_core::config::STATE_DIR;
use docqa_core::{AppError, AppResult};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where a prompt definition comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptOrigin {
    Builtin,
    Workspace,
}

/// One entry of `list_prompts`.
#[derive(Debug, Clone, Serialize)]
pub struct PromptListing {
    pub id: String,
    pub origin: PromptOrigin,
}

fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(STATE_DIR).join("prompts")
}

/// Load a prompt definition by ID.
///
/// A file named `<id>.yml` under `.docqa/prompts/` wins over the built-in
/// definition of the same id. A present but invalid file is an error, it is
/// never silently replaced by the built-in.
///
/// # Example
/// ```no_run
/// use docqa_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "qa.refine")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    if !prompt_file.exists() {
        return builtin::by_id(prompt_id)
            .ok_or_else(|| AppError::Prompt(format!("Unknown prompt: {}", prompt_id)));
    }

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    if definition.id != prompt_id {
        return Err(AppError::Prompt(format!(
            "Prompt file {:?} declares id '{}'",
            prompt_file, definition.id
        )));
    }

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt override: {} ({})", definition.id, definition.title);

    Ok(definition)
}

impl PromptSet {
    /// Built-in prompts with any workspace overrides applied.
    pub fn load(workspace_path: &Path) -> AppResult<Self> {
        Ok(Self {
            refine: load_prompt(workspace_path, builtin::REFINE_PROMPT_ID)?,
            decompose: load_prompt(workspace_path, builtin::DECOMPOSE_PROMPT_ID)?,
            synthesize: load_prompt(workspace_path, builtin::SYNTHESIZE_PROMPT_ID)?,
        })
    }
}

/// List built-in prompts plus any workspace prompt files.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<PromptListing>> {
    let mut workspace_ids = Vec::new();
    let dir = prompts_dir(workspace_path);

    if dir.exists() {
        for entry in walkdir::WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    workspace_ids.push(stem.to_string());
                }
            }
        }
    }

    let mut listings: Vec<PromptListing> = BUILTIN_PROMPT_IDS
        .iter()
        .map(|id| PromptListing {
            id: id.to_string(),
            origin: if workspace_ids.iter().any(|w| w == id) {
                PromptOrigin::Workspace
            } else {
                PromptOrigin::Builtin
            },
        })
        .collect();

    workspace_ids.sort();
    for id in workspace_ids {
        if !BUILTIN_PROMPT_IDS.contains(&id.as_str()) {
            listings.push(PromptListing {
                id,
                origin: PromptOrigin::Workspace,
            });
        }
    }

    Ok(listings)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    // An override must still accept everything the pipeline passes in.
    if let Some(builtin) = builtin::by_id(&def.id) {
        for var in &builtin.variables {
            if !def.variables.contains(var) {
                return Err(AppError::Prompt(format!(
                    "Prompt {} must declare variable '{}'",
                    def.id, var
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_prompt(dir: &Path, id: &str, content: &str) {
        let prompts_dir = dir.join(".docqa/prompts");
        fs::create_dir_all(&prompts_dir).unwrap();
        fs::write(prompts_dir.join(format!("{}.yml", id)), content).unwrap();
    }

    fn refine_override() -> String {
        r#"
id: qa.refine
title: "Terse refine"
apiVersion: "1.0"
createdBy: test
behavior:
  tone: neutral
  style: terse
template: "Q: {{question}} A: {{answer}} C: {{context}}"
variables: [question, answer, context]
output:
  format: text
"#
        .to_string()
    }

    #[test]
    fn test_builtin_when_no_override() {
        let temp_dir = TempDir::new().unwrap();
        let prompt = load_prompt(temp_dir.path(), "qa.decompose").unwrap();
        assert_eq!(prompt.id, "qa.decompose");
        assert_eq!(prompt.created_by, "docqa");
    }

    #[test]
    fn test_workspace_override_wins() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "qa.refine", &refine_override());

        let set = PromptSet::load(temp_dir.path()).unwrap();
        assert_eq!(set.refine.title, "Terse refine");
        assert_eq!(set.synthesize.id, "qa.synthesize");
    }

    #[test]
    fn test_override_missing_variable_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let content = refine_override().replace("[question, answer, context]", "[question]");
        write_prompt(temp_dir.path(), "qa.refine", &content);

        let err = load_prompt(temp_dir.path(), "qa.refine").unwrap_err();
        assert!(err.to_string().contains("context"));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "qa.refine", "invalid: yaml: content:");
        assert!(load_prompt(temp_dir.path(), "qa.refine").is_err());
    }

    #[test]
    fn test_unknown_prompt() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_prompt(temp_dir.path(), "nonexistent").is_err());
    }

    #[test]
    fn test_list_prompts() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "qa.refine", &refine_override());
        write_prompt(temp_dir.path(), "custom.notes", "id: custom.notes");

        let listings = list_prompts(temp_dir.path()).unwrap();
        assert_eq!(listings.len(), 4);

        let refine = listings.iter().find(|l| l.id == "qa.refine").unwrap();
        assert_eq!(refine.origin, PromptOrigin::Workspace);
        let decompose = listings.iter().find(|l| l.id == "qa.decompose").unwrap();
        assert_eq!(decompose.origin, PromptOrigin::Builtin);
        assert_eq!(listings[3].id, "custom.notes");
    }
}
