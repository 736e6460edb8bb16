//! Prompts command handler.

use clap::Args;
use docqa_core::{config::AppConfig, AppResult};
use docqa_prompt::{list_prompts, PromptOrigin};

/// List prompt definitions and their origin
#[derive(Args, Debug)]
pub struct PromptsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PromptsCommand {
    /// Execute the prompts command.
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let listings = list_prompts(&config.workspace)?;

        if self.json {
            println!("{}", super::to_json(&listings)?);
            return Ok(());
        }

        for listing in listings {
            let origin = match listing.origin {
                PromptOrigin::Builtin => "built-in",
                PromptOrigin::Workspace => "workspace override",
            };
            println!("{:<16} {}", listing.id, origin);
        }

        Ok(())
    }
}
