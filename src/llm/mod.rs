pub mod openai;
pub mod provider;
pub mod types;

pub use openai::OpenAiProvider;
pub use provider::{CompletionClient, EmbeddingClient};
pub use types::{ChatMessage, ChatRequest};
