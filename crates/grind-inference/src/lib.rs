//! # grind-inference
//!
//! LLM inference backend abstraction for grind.
//!
//! This crate provides:
//! - Google Gemini implementation (default, feature `gemini`)
//! - Z.AI OpenAI-compatible implementation (feature `zai`)
//! - Provider registry with environment-driven configuration
//! - Prompt building and reply parsing for problem enhancement
//!
//! # Feature Flags
//!
//! - `gemini` (default): Enable the Gemini backend
//! - `zai`: Enable the Z.AI backend
//!
//! # Example
//!
//! ```rust,no_run
//! use grind_inference::{enhance_problem, ProviderRegistry};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = ProviderRegistry::from_env();
//!     let backend = registry.resolve(None).unwrap();
//!     let enhanced = enhance_problem(backend.as_ref(), "Two Sum").await.unwrap();
//!     println!("{}", enhanced.description);
//! }
//! ```

pub mod enhance;
pub mod provider;

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "zai")]
pub mod zai;

// Mock generation backend for testing
pub mod mock;

// Re-export core types
pub use grind_core::*;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiBackend, GeminiConfig};

#[cfg(feature = "zai")]
pub use zai::{ZaiBackend, ZaiConfig};

pub use enhance::{
    build_enhance_prompt, enhance_problem, extract_json_object, parse_enhanced,
    ENHANCE_SYSTEM_PROMPT,
};
pub use provider::{ProviderConfig, ProviderRegistry};
