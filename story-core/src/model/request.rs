use std::ops::RangeInclusive;

use crate::error::ValidationError;

/// Smallest story length accepted, in tokens.
pub const MIN_LENGTH: u32 = 50;
/// Largest story length accepted, in tokens.
pub const MAX_LENGTH: u32 = 300;
/// Slider increment for the story length.
pub const LENGTH_STEP: u32 = 10;
/// Story length used until the user moves the slider.
pub const DEFAULT_LENGTH: u32 = 150;

/// Lowest sampling temperature accepted.
pub const MIN_TEMPERATURE: f32 = 0.5;
/// Highest sampling temperature accepted.
pub const MAX_TEMPERATURE: f32 = 1.5;
/// Slider increment for the temperature.
pub const TEMPERATURE_STEP: f32 = 0.1;
/// Temperature used until the user moves the slider.
pub const DEFAULT_TEMPERATURE: f32 = 0.9;

/// Inclusive range of story lengths.
pub const LENGTH_RANGE: RangeInclusive<u32> = MIN_LENGTH..=MAX_LENGTH;
/// Inclusive range of temperatures.
pub const TEMPERATURE_RANGE: RangeInclusive<f32> = MIN_TEMPERATURE..=MAX_TEMPERATURE;

/// The two user-adjustable generation parameters.
///
/// # Invariants
/// - `max_length` is always within [`LENGTH_RANGE`]
/// - `temperature` is always finite and within [`TEMPERATURE_RANGE`]
///
/// Setters clamp instead of failing, the way a slider does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorySettings {
	max_length: u32,
	temperature: f32,
}

impl Default for StorySettings {
	fn default() -> Self {
		Self { max_length: DEFAULT_LENGTH, temperature: DEFAULT_TEMPERATURE }
	}
}

impl StorySettings {
	/// Upper bound on newly generated tokens.
	pub fn max_length(&self) -> u32 {
		self.max_length
	}

	/// Sampling temperature.
	pub fn temperature(&self) -> f32 {
		self.temperature
	}

	/// Sets the story length, clamped into [`LENGTH_RANGE`].
	pub fn set_max_length(&mut self, max_length: u32) {
		self.max_length = max_length.clamp(MIN_LENGTH, MAX_LENGTH);
	}

	/// Sets the temperature, clamped into [`TEMPERATURE_RANGE`].
	///
	/// NaN and infinities reset the value to [`DEFAULT_TEMPERATURE`].
	pub fn set_temperature(&mut self, temperature: f32) {
		self.temperature = if temperature.is_finite() {
			temperature.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE)
		} else {
			DEFAULT_TEMPERATURE
		};
	}
}

/// A validated request for one story.
///
/// Can only be built through [`GenerationRequest::new`], so every value that
/// reaches a model has a non-empty prompt and in-range parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
	prompt: String,
	max_length: u32,
	temperature: f32,
}

impl GenerationRequest {
	/// Validates and builds a request.
	///
	/// The prompt is kept as written; it is only considered empty when it
	/// holds nothing but whitespace.
	///
	/// # Errors
	/// - [`ValidationError::EmptyPrompt`] for blank prompts
	/// - [`ValidationError::MaxLengthOutOfRange`] / [`ValidationError::TemperatureOutOfRange`]
	///   when a parameter is outside its range
	pub fn new(prompt: &str, max_length: u32, temperature: f32) -> Result<Self, ValidationError> {
		if prompt.trim().is_empty() {
			return Err(ValidationError::EmptyPrompt);
		}
		if !LENGTH_RANGE.contains(&max_length) {
			return Err(ValidationError::MaxLengthOutOfRange {
				value: max_length,
				min: MIN_LENGTH,
				max: MAX_LENGTH,
			});
		}
		// `contains` is false for NaN
		if !TEMPERATURE_RANGE.contains(&temperature) {
			return Err(ValidationError::TemperatureOutOfRange {
				value: temperature,
				min: MIN_TEMPERATURE,
				max: MAX_TEMPERATURE,
			});
		}

		Ok(Self { prompt: prompt.to_owned(), max_length, temperature })
	}

	/// Builds a request from a prompt and the current settings.
	pub fn from_settings(prompt: &str, settings: &StorySettings) -> Result<Self, ValidationError> {
		Self::new(prompt, settings.max_length(), settings.temperature())
	}

	pub fn prompt(&self) -> &str {
		&self.prompt
	}

	pub fn max_length(&self) -> u32 {
		self.max_length
	}

	pub fn temperature(&self) -> f32 {
		self.temperature
	}
}
