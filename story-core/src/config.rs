use std::fmt;

use crate::error::StartupError;

/// Hugging Face model served by text-generation-inference.
pub const DEFAULT_TGI_MODEL: &str = "roneneldan/TinyStories-Instruct-33M";
/// Ollama library tag used with the Ollama backend.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:1b";
/// Base URL of the local text-generation-inference server.
pub const DEFAULT_TGI_ENDPOINT: &str = "http://127.0.0.1:8080";
/// Base URL of the local Ollama server.
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://127.0.0.1:11434";

/// Kind of model server the provider talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
	/// Hugging Face text-generation-inference.
	Tgi,
	/// Ollama.
	Ollama,
}

impl Backend {
	/// Base URL of the local server for this backend.
	pub fn default_endpoint(self) -> &'static str {
		match self {
			Backend::Tgi => DEFAULT_TGI_ENDPOINT,
			Backend::Ollama => DEFAULT_OLLAMA_ENDPOINT,
		}
	}

	/// Model identifier in the naming scheme this backend understands.
	pub fn default_model(self) -> &'static str {
		match self {
			Backend::Tgi => DEFAULT_TGI_MODEL,
			Backend::Ollama => DEFAULT_OLLAMA_MODEL,
		}
	}
}

impl fmt::Display for Backend {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Backend::Tgi => write!(f, "tgi"),
			Backend::Ollama => write!(f, "ollama"),
		}
	}
}

/// Where and what the model provider loads.
///
/// Fixed at build time: the binaries use [`ProviderConfig::default`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
	pub backend: Backend,
	/// Base URL without trailing slash.
	pub endpoint: String,
	pub model: String,
}

impl Default for ProviderConfig {
	fn default() -> Self {
		Self::for_backend(Backend::Tgi)
	}
}

impl ProviderConfig {
	/// Local server and default model of `backend`.
	pub fn for_backend(backend: Backend) -> Self {
		Self {
			backend,
			endpoint: backend.default_endpoint().to_owned(),
			model: backend.default_model().to_owned(),
		}
	}

	/// Points `backend` at another server and model.
	///
	/// # Errors
	/// Returns [`StartupError::Config`] when the endpoint is not an http(s)
	/// URL or the model name is blank.
	pub fn new(backend: Backend, endpoint: &str, model: &str) -> Result<Self, StartupError> {
		let endpoint = endpoint.trim().trim_end_matches('/');
		if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
			return Err(StartupError::Config(format!(
				"endpoint must be an http(s) URL, got '{endpoint}'"
			)));
		}
		let model = model.trim();
		if model.is_empty() {
			return Err(StartupError::Config("model name is empty".to_owned()));
		}

		Ok(Self { backend, endpoint: endpoint.to_owned(), model: model.to_owned() })
	}
}
