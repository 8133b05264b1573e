//! Prompt assembly from retrieved chunks.
//!
//! The retrieved texts are joined with newlines in ranked order and appended
//! to the persona instruction as the system turn; the user turn carries the
//! query verbatim. No truncation happens here, oversized prompts are left for
//! the completion provider to reject.

use super::store::ScoredChunk;
use crate::llm::types::{ChatMessage, ChatRequest};

/// The assembled two-turn conversation for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptContext {
    /// Retrieved texts joined by `\n`, empty when nothing was retrieved.
    pub context: String,
    pub messages: Vec<ChatMessage>,
}

impl PromptContext {
    pub fn into_request(self) -> ChatRequest {
        ChatRequest::new(self.messages)
    }
}

pub struct ContextAssembler {
    persona: String,
}

impl ContextAssembler {
    pub fn new(persona: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
        }
    }

    pub fn assemble(&self, chunks: &[ScoredChunk], query: &str) -> PromptContext {
        let context = chunks
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let system = format!("{}\n\n{}", self.persona, context);

        PromptContext {
            context,
            messages: vec![ChatMessage::system(system), ChatMessage::user(query)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(text: &str, score: f32) -> ScoredChunk {
        ScoredChunk {
            text: text.to_string(),
            score,
        }
    }

    #[test]
    fn joins_chunks_in_ranked_order() {
        let assembler = ContextAssembler::new("You are an assistant for Base blockchain. Use this context:");
        let chunks = vec![
            scored("Base is a blockchain.", 0.9),
            scored("Base is built on the OP Stack.", 0.7),
        ];

        let prompt = assembler.assemble(&chunks, "What is Base?");

        assert_eq!(
            prompt.context,
            "Base is a blockchain.\nBase is built on the OP Stack."
        );
        assert_eq!(prompt.messages.len(), 2);
        assert_eq!(prompt.messages[0].role, "system");
        assert_eq!(
            prompt.messages[0].content,
            "You are an assistant for Base blockchain. Use this context:\n\nBase is a blockchain.\nBase is built on the OP Stack."
        );
        assert_eq!(prompt.messages[1], ChatMessage::user("What is Base?"));
    }

    #[test]
    fn empty_retrieval_gives_context_free_prompt() {
        let assembler = ContextAssembler::new("Persona:");
        let prompt = assembler.assemble(&[], "hi");

        assert_eq!(prompt.context, "");
        assert_eq!(prompt.messages[0].content, "Persona:\n\n");
        assert_eq!(prompt.messages[1].content, "hi");
    }

    #[test]
    fn query_is_passed_verbatim() {
        let assembler = ContextAssembler::new("Persona:");
        let query = "  spaced\nmulti-line  ";
        let request = assembler.assemble(&[scored("x", 1.0)], query).into_request();

        assert_eq!(request.messages[1].content, query);
        assert!(request.temperature.is_none());
    }
}
