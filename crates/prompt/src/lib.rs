//! Prompt system for docqa.
//!
//! The three collaborator call sites (refine, decompose, synthesize) each use
//! a prompt definition. Built-in definitions ship with the crate; a workspace
//! can override any of them with `.docqa/prompts/<id>.yml`. Templates are
//! rendered with Handlebars.

pub mod builder;
pub mod builtin;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use builtin::{DECOMPOSE_PROMPT_ID, REFINE_PROMPT_ID, SYNTHESIZE_PROMPT_ID};
pub use loader::{list_prompts, load_prompt, PromptListing, PromptOrigin};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptBehavior, PromptDefinition, PromptOutputSpec, PromptSet};
