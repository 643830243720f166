//! Classification oracle adapters
//!
//! Implementations of the ClassificationOracle trait:
//! - Groq (OpenAI-compatible chat completions API)

pub mod groq;
pub mod prompts;

pub use groq::{GroqOracle, GroqOracleConfig};
