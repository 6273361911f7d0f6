//! Top-level module for story generation.
//!
//! - Request validation and user settings (`request`)
//! - The `StoryModel` trait and one-time model loading (`provider`)
//! - HTTP backends for text-generation-inference (`tgi`) and Ollama (`ollama`)

/// Validated generation requests and clamped user settings.
pub mod request;

/// `StoryModel` trait and the one-time model acquisition.
pub mod provider;

/// Hugging Face text-generation-inference backend.
pub mod tgi;

/// Ollama backend, pulls the model when missing.
pub mod ollama;

#[cfg(test)]
pub(crate) mod test_server;
