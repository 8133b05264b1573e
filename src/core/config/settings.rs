//! Typed view over the merged YAML config.
//!
//! Every key is optional; missing keys fall back to the defaults below, which
//! reproduce the single-node deployment the service was first built for.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;

use super::paths::AppPaths;

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an assistant for Base blockchain. Use this context:";
pub const DEFAULT_VECTOR_STORE_PATH: &str = "public/embeddings/vector_store.json";
pub const DEFAULT_CORPUS_PATH: &str = "public/data/base_knowledge.txt";

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub rag: RagSettings,
    pub llm: LlmSettings,
    pub chat: ChatSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub public_dir: Option<PathBuf>,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RagSettings {
    pub vector_store_path: PathBuf,
    pub corpus_path: PathBuf,
    pub top_k: usize,
    pub ingest_concurrency: usize,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub embedding_model: String,
    pub chat_model: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub system_prompt: String,
    pub max_input_length: usize,
}

impl Settings {
    pub fn from_config(config: &Value, paths: &AppPaths) -> Self {
        let server = config.get("server");
        let rag = config.get("rag");
        let llm = config.get("llm");
        let chat = config.get("chat");
        let app = config.get("app");

        let public_dir = match server.and_then(|v| v.get("public_dir")) {
            Some(Value::Null) => None,
            Some(value) => value.as_str().map(|dir| paths.resolve(dir)),
            None => Some(paths.resolve("public")),
        };

        Settings {
            server: ServerSettings {
                host: str_or(server, "host", "127.0.0.1"),
                port: u64_or(server, "port", 3000) as u16,
                public_dir,
                cors_allowed_origins: server
                    .and_then(|v| v.get("cors_allowed_origins"))
                    .and_then(|v| v.as_array())
                    .map(|list| {
                        list.iter()
                            .filter_map(|item| item.as_str())
                            .map(str::trim)
                            .filter(|item| !item.is_empty())
                            .map(|item| item.to_string())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            rag: RagSettings {
                vector_store_path: paths.resolve(&str_or(
                    rag,
                    "vector_store_path",
                    DEFAULT_VECTOR_STORE_PATH,
                )),
                corpus_path: paths.resolve(&str_or(rag, "corpus_path", DEFAULT_CORPUS_PATH)),
                top_k: u64_or(rag, "top_k", 3) as usize,
                ingest_concurrency: u64_or(rag, "ingest_concurrency", 8) as usize,
            },
            llm: LlmSettings {
                base_url: str_or(llm, "base_url", "https://api.openai.com/v1"),
                api_key: llm
                    .and_then(|v| v.get("api_key"))
                    .and_then(|v| v.as_str())
                    .map(str::trim)
                    .filter(|key| !key.is_empty())
                    .map(|key| key.to_string()),
                embedding_model: str_or(llm, "embedding_model", "text-embedding-3-small"),
                chat_model: str_or(llm, "chat_model", "gpt-4o"),
                request_timeout: Duration::from_secs(u64_or(llm, "request_timeout_secs", 60)),
                connect_timeout: Duration::from_secs(u64_or(llm, "connect_timeout_secs", 10)),
                temperature: llm
                    .and_then(|v| v.get("temperature"))
                    .and_then(|v| v.as_f64()),
                max_tokens: llm
                    .and_then(|v| v.get("max_tokens"))
                    .and_then(|v| v.as_u64())
                    .map(|v| v as u32),
            },
            chat: ChatSettings {
                system_prompt: str_or(chat, "system_prompt", DEFAULT_SYSTEM_PROMPT),
                max_input_length: u64_or(app, "max_input_length", 4000) as usize,
            },
        }
    }

    /// `PORT` and `OPENAI_API_KEY` take precedence over the files.
    pub fn apply_env_overrides(&mut self) {
        if let Some(port) = env::var("PORT").ok().and_then(|val| val.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Ok(key) = env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.llm.api_key = Some(key.trim().to_string());
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn str_or(section: Option<&Value>, key: &str, default: &str) -> String {
    section
        .and_then(|v| v.get(key))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| default.to_string())
}

fn u64_or(section: Option<&Value>, key: &str, default: u64) -> u64 {
    section
        .and_then(|v| v.get(key))
        .and_then(|v| v.as_u64())
        .unwrap_or(default)
}
