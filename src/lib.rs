//! `TripAI` - travel destination recommendations from a free-text query
//!
//! This library provides the backend for a small recommendation chat:
//! it forwards the user's query to the Gemini API, extracts the JSON
//! array of destinations from the model's free-form reply, validates it
//! and serves the sanitized result over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod gemini;
pub mod models;
pub mod recommend;
pub mod web;

// Re-export core types for public API
pub use config::Settings;
pub use error::{ProviderError, ProviderErrorKind, RecommendError};
pub use gemini::{GeminiClient, TextGenerator};
pub use models::Destination;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, RecommendError>;
