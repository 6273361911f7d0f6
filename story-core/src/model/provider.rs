use std::time::Duration;

use log::info;
use reqwest::blocking::{Client, Response};

use crate::config::{Backend, ProviderConfig};
use crate::error::{GenerationError, StartupError};
use crate::model::ollama::OllamaModel;
use crate::model::request::GenerationRequest;
use crate::model::tgi::TgiModel;

/// A text-generation capability that writes stories.
///
/// Implementations are built once per process and reused for every
/// submission. Generation is sampling-based: two calls with the same
/// request may return different stories.
pub trait StoryModel {
	/// Identifier of the model answering the requests.
	fn name(&self) -> &str;

	/// Writes a story for `request`.
	///
	/// Returns the prompt followed by its continuation. Blocks until the
	/// model answers; there is no timeout.
	///
	/// # Errors
	/// Returns a [`GenerationError`] when the model is unavailable, rejects
	/// the request, or answers with nothing usable.
	fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

impl<M: StoryModel + ?Sized> StoryModel for Box<M> {
	fn name(&self) -> &str {
		(**self).name()
	}

	fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
		(**self).generate(request)
	}
}

/// Acquires the configured model. Call once at process start.
///
/// # Errors
/// Returns a [`StartupError`] when the client cannot be built or the model
/// server cannot provide the model.
pub fn load_model(config: &ProviderConfig) -> Result<Box<dyn StoryModel>, StartupError> {
	info!(
		"Loading story engine '{}' from {} backend at {}",
		config.model, config.backend, config.endpoint
	);
	let client = http_client()?;

	let model: Box<dyn StoryModel> = match config.backend {
		Backend::Tgi => Box::new(TgiModel::connect(client, config)?),
		Backend::Ollama => Box::new(OllamaModel::connect(client, config)?),
	};

	info!("Story engine ready: {}", model.name());
	Ok(model)
}

/// Builds the blocking client shared by a backend for its whole lifetime.
///
/// No request timeout: a slow model keeps the caller waiting.
fn http_client() -> Result<Client, StartupError> {
	Client::builder()
		.timeout(None::<Duration>)
		.build()
		.map_err(StartupError::Client)
}

/// Turns a non-success response into [`GenerationError::Status`].
pub(crate) fn check_status(response: Response) -> Result<Response, GenerationError> {
	let status = response.status();
	if status.is_success() {
		return Ok(response);
	}
	let body = response.text().unwrap_or_default();
	Err(GenerationError::Status { status, body })
}

/// Joins the prompt and the model's continuation into the displayed story.
///
/// # Errors
/// Returns [`GenerationError::EmptyOutput`] when the continuation is blank.
pub(crate) fn compose_story(prompt: &str, continuation: &str) -> Result<String, GenerationError> {
	if continuation.trim().is_empty() {
		return Err(GenerationError::EmptyOutput);
	}
	Ok(format!("{prompt}{continuation}"))
}
