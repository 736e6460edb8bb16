//! Cloud generation collaborator for docqa.
//!
//! The pipeline talks to a text-generation model through one narrow trait,
//! [`LlmClient`], so the refine, decompose and synthesize stages do not care
//! which provider answers.
//!
//! # Providers
//! - **Gemini**: Google Generative Language API (default, needs an API key)
//! - **Ollama**: local LLM runtime
//! - **Mock**: scripted client for tests
//!
//! # Example
//! ```no_run
//! use docqa_llm::{LlmClient, providers::GeminiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new("api-key", "gemini-flash-latest")?;
//! let text = client.generate("Say hello").await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::{client_from_config, create_client};
pub use providers::{GeminiClient, MockClient, OllamaClient};
pub use types::ProviderType;
