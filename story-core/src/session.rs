use log::{error, info, warn};

use crate::error::ValidationError;
use crate::model::provider::StoryModel;
use crate::model::request::{GenerationRequest, StorySettings};

/// Where the interaction currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	/// Nothing generated yet.
	Idle,
	/// A request is waiting for the model.
	Generating,
	/// A story or an error is stored for display.
	Displaying,
}

/// Outcome of the latest submission.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
	/// Text written by the model.
	Story(String),
	/// Message describing why the model failed.
	Failed(String),
}

impl GenerationResult {
	pub fn is_story(&self) -> bool {
		matches!(self, GenerationResult::Story(_))
	}
}

/// Everything the display needs between two refreshes.
///
/// Only the latest result is kept. There is no way to clear it short of
/// dropping the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
	phase: Phase,
	settings: StorySettings,
	last_prompt: Option<String>,
	pending: Option<GenerationRequest>,
	result: Option<GenerationResult>,
	warning: Option<ValidationError>,
}

impl Default for SessionState {
	fn default() -> Self {
		Self {
			phase: Phase::Idle,
			settings: StorySettings::default(),
			last_prompt: None,
			pending: None,
			result: None,
			warning: None,
		}
	}
}

impl SessionState {
	pub fn phase(&self) -> Phase {
		self.phase
	}

	pub fn settings(&self) -> &StorySettings {
		&self.settings
	}

	pub fn settings_mut(&mut self) -> &mut StorySettings {
		&mut self.settings
	}

	/// Prompt of the latest accepted submission.
	pub fn last_prompt(&self) -> Option<&str> {
		self.last_prompt.as_deref()
	}

	pub fn result(&self) -> Option<&GenerationResult> {
		self.result.as_ref()
	}

	/// Warning left by the latest rejected submission.
	pub fn warning(&self) -> Option<&ValidationError> {
		self.warning.as_ref()
	}

	/// Idle/Displaying -> Generating, guarded by a non-blank prompt.
	///
	/// On rejection the warning is recorded and nothing else changes.
	pub fn begin(&mut self, prompt: &str) -> Result<&GenerationRequest, ValidationError> {
		if self.phase == Phase::Generating {
			return Err(self.reject(ValidationError::GenerationInFlight));
		}
		let request = match GenerationRequest::from_settings(prompt, &self.settings) {
			Ok(request) => request,
			Err(e) => return Err(self.reject(e)),
		};

		self.warning = None;
		self.last_prompt = Some(request.prompt().to_owned());
		self.phase = Phase::Generating;
		Ok(&*self.pending.insert(request))
	}

	/// Hands the pending request to the caller for the model call.
	///
	/// Returns `None` when nothing is pending.
	pub fn take_pending(&mut self) -> Option<GenerationRequest> {
		self.pending.take()
	}

	/// Generating -> Displaying: stores the result of the request taken with
	/// [`Self::take_pending`], replacing any earlier one.
	pub fn complete(&mut self, result: GenerationResult) -> &GenerationResult {
		self.phase = Phase::Displaying;
		self.result.insert(result)
	}

	fn reject(&mut self, error: ValidationError) -> ValidationError {
		warn!("Submission rejected: {error}");
		self.warning = Some(error.clone());
		error
	}
}

/// Drives one [`StoryModel`] from user submissions.
///
/// The model is injected once and reused. Generation only happens on an
/// explicit [`submit`](Self::submit) or [`begin`](Self::begin) +
/// [`finish`](Self::finish); the controller never regenerates on its own.
pub struct StoryController<M: StoryModel> {
	model: M,
	session: SessionState,
}

impl<M: StoryModel> StoryController<M> {
	pub fn new(model: M) -> Self {
		Self { model, session: SessionState::default() }
	}

	pub fn model(&self) -> &M {
		&self.model
	}

	pub fn phase(&self) -> Phase {
		self.session.phase()
	}

	pub fn settings(&self) -> &StorySettings {
		self.session.settings()
	}

	/// Clamped into the supported range.
	pub fn set_max_length(&mut self, max_length: u32) {
		self.session.settings_mut().set_max_length(max_length);
	}

	/// Clamped into the supported range.
	pub fn set_temperature(&mut self, temperature: f32) {
		self.session.settings_mut().set_temperature(temperature);
	}

	pub fn result(&self) -> Option<&GenerationResult> {
		self.session.result()
	}

	pub fn warning(&self) -> Option<&ValidationError> {
		self.session.warning()
	}

	pub fn last_prompt(&self) -> Option<&str> {
		self.session.last_prompt()
	}

	/// Accepts a submission and moves to [`Phase::Generating`].
	///
	/// The model is not called yet; see [`Self::finish`].
	///
	/// # Errors
	/// Returns the [`ValidationError`] that was also recorded as the session
	/// warning. No model call happens in that case.
	pub fn begin(&mut self, prompt: &str) -> Result<(), ValidationError> {
		self.session.begin(prompt).map(|_| ())
	}

	/// Runs the pending request through the model and stores the outcome.
	///
	/// Blocks until the model answers. Model failures become
	/// [`GenerationResult::Failed`]; they never escape as errors.
	pub fn finish(&mut self) -> Option<&GenerationResult> {
		let request = self.session.take_pending()?;
		let result = match self.model.generate(&request) {
			Ok(story) => {
				info!("Story written by {} ({} chars)", self.model.name(), story.len());
				GenerationResult::Story(story)
			}
			Err(e) => {
				error!("Story generation failed: {e}");
				GenerationResult::Failed(e.to_string())
			}
		};
		Some(self.session.complete(result))
	}

	/// One full, blocking submission cycle.
	///
	/// # Errors
	/// Returns a [`ValidationError`] when the prompt is blank or a request is
	/// already pending.
	pub fn submit(&mut self, prompt: &str) -> Result<&GenerationResult, ValidationError> {
		self.begin(prompt)?;
		// begin just stored a pending request
		self.finish().ok_or(ValidationError::GenerationInFlight)
	}
}
