use log::{debug, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::provider::{check_status, compose_story, StoryModel};
use super::request::GenerationRequest;
use crate::config::ProviderConfig;
use crate::error::{GenerationError, StartupError};

/// Body of `POST /generate`.
#[derive(Serialize, Debug)]
struct GenerateBody<'a> {
	inputs: &'a str,
	parameters: GenerateParameters,
}

#[derive(Serialize, Debug)]
struct GenerateParameters {
	max_new_tokens: u32,
	temperature: f32,
	do_sample: bool,
	return_full_text: bool,
}

/// `/generate` answers with one object, some deployments wrap it in an array.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum GenerateReply {
	Single(GeneratedText),
	Batch(Vec<GeneratedText>),
}

#[derive(Deserialize, Debug)]
struct GeneratedText {
	generated_text: String,
}

/// Subset of `GET /info`.
#[derive(Deserialize, Debug)]
struct ServerInfo {
	model_id: String,
}

/// Story model served by Hugging Face text-generation-inference.
#[derive(Debug)]
pub struct TgiModel {
	client: Client,
	endpoint: String,
	model_id: String,
}

impl TgiModel {
	/// Queries `/info` and records the model the server hosts.
	///
	/// A server hosting a different model than configured is accepted with a
	/// warning; the server decides what is loaded.
	///
	/// # Errors
	/// Returns [`StartupError::Unreachable`] if `/info` cannot be fetched.
	pub fn connect(client: Client, config: &ProviderConfig) -> Result<Self, StartupError> {
		let unreachable = |reason: String| StartupError::Unreachable {
			endpoint: config.endpoint.clone(),
			reason,
		};

		let info: ServerInfo = client
			.get(format!("{}/info", config.endpoint))
			.send()
			.and_then(|r| r.error_for_status())
			.and_then(|r| r.json())
			.map_err(|e| unreachable(e.to_string()))?;

		if info.model_id != config.model {
			warn!(
				"Configured model '{}' but the server hosts '{}'",
				config.model, info.model_id
			);
		}

		Ok(Self {
			client,
			endpoint: config.endpoint.clone(),
			model_id: info.model_id,
		})
	}

	fn body(request: &GenerationRequest) -> GenerateBody<'_> {
		GenerateBody {
			inputs: request.prompt(),
			parameters: GenerateParameters {
				max_new_tokens: request.max_length(),
				temperature: request.temperature(),
				do_sample: true,
				return_full_text: false,
			},
		}
	}

	fn parse_reply(raw: &str) -> Result<String, GenerationError> {
		match serde_json::from_str::<GenerateReply>(raw)? {
			GenerateReply::Single(output) => Ok(output.generated_text),
			GenerateReply::Batch(outputs) => outputs
				.into_iter()
				.next()
				.map(|o| o.generated_text)
				.ok_or(GenerationError::EmptyOutput),
		}
	}
}

impl StoryModel for TgiModel {
	fn name(&self) -> &str {
		&self.model_id
	}

	fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
		debug!(
			"TGI generate: max_new_tokens={} temperature={}",
			request.max_length(),
			request.temperature()
		);
		let response = self
			.client
			.post(format!("{}/generate", self.endpoint))
			.json(&Self::body(request))
			.send()?;
		let raw = check_status(response)?.text()?;
		let continuation = Self::parse_reply(&raw)?;
		compose_story(request.prompt(), &continuation)
	}
}
