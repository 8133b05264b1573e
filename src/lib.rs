pub mod core;
pub mod llm;
pub mod rag;
pub mod server;
pub mod state;

#[cfg(test)]
mod testing;
