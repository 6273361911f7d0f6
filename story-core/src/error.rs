use reqwest::StatusCode;
use thiserror::Error;

/// A submission rejected before any model call was made.
///
/// These are shown to the user as warnings. The session keeps whatever
/// result it was already displaying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
	/// The prompt was empty or contained only whitespace.
	#[error("Please enter your story idea first!")]
	EmptyPrompt,
	/// The requested length is outside the supported range.
	#[error("Story length must be between {min} and {max}, got {value}")]
	MaxLengthOutOfRange { value: u32, min: u32, max: u32 },
	/// The requested temperature is outside the supported range.
	#[error("Temperature must be between {min} and {max}, got {value}")]
	TemperatureOutOfRange { value: f32, min: f32, max: f32 },
	/// A story is already being written.
	#[error("A story is already being written, please wait")]
	GenerationInFlight,
}

/// A failure of the model provider while writing a story.
///
/// The controller stores the rendered message in place of the story text.
#[derive(Error, Debug)]
pub enum GenerationError {
	/// The model server could not be reached or the exchange broke off.
	#[error("Request to the model server failed: {0}")]
	Http(#[from] reqwest::Error),
	/// The model server answered with a non-success status.
	#[error("Model server returned {status}: {body}")]
	Status { status: StatusCode, body: String },
	/// The reply did not have the expected shape.
	#[error("Failed to decode the model server reply: {0}")]
	Decode(#[from] serde_json::Error),
	/// The reply contained no text.
	#[error("The model returned no text")]
	EmptyOutput,
}

/// A failure to bring the model provider up at process start.
///
/// Fatal for the session: no interaction surface is offered.
#[derive(Error, Debug)]
pub enum StartupError {
	/// A configuration value could not be understood.
	#[error("Invalid configuration: {0}")]
	Config(String),
	/// The HTTP client could not be built.
	#[error("Failed to build the HTTP client: {0}")]
	Client(#[source] reqwest::Error),
	/// The model server is not reachable or refused the startup query.
	#[error("Model server at {endpoint} is unavailable: {reason}")]
	Unreachable { endpoint: String, reason: String },
	/// The model could not be fetched from its registry.
	#[error("Could not acquire model '{model}': {reason}")]
	Acquisition { model: String, reason: String },
}
