//! Prompt-to-story generation library.
//!
//! This crate provides everything behind the story maker window:
//! - Validated generation requests and slider-backed settings
//! - A `StoryModel` trait with text-generation-inference and Ollama backends
//! - A session controller that turns submissions into displayed stories
//! - Provider configuration and the error taxonomy
//!
//! The model is acquired once with [`model::provider::load_model`] and
//! injected into a [`session::StoryController`].

/// Generation requests, settings and model backends.
pub mod model;

/// Interaction state machine and controller.
pub mod session;

/// Provider configuration read from the environment.
pub mod config;

/// Validation, generation and startup errors.
pub mod error;
