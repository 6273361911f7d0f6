use log::{debug, info};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::provider::{check_status, compose_story, StoryModel};
use super::request::GenerationRequest;
use crate::config::ProviderConfig;
use crate::error::{GenerationError, StartupError};

#[derive(Serialize, Debug)]
struct ModelBody<'a> {
	model: &'a str,
}

#[derive(Serialize, Debug)]
struct PullBody<'a> {
	model: &'a str,
	stream: bool,
}

#[derive(Deserialize, Debug)]
struct PullReply {
	status: String,
}

/// Body of `POST /api/generate`.
///
/// `raw` skips the chat template so the model continues the prompt.
#[derive(Serialize, Debug)]
struct GenerateBody<'a> {
	model: &'a str,
	prompt: &'a str,
	raw: bool,
	stream: bool,
	options: GenerateOptions,
}

#[derive(Serialize, Debug)]
struct GenerateOptions {
	num_predict: u32,
	temperature: f32,
}

#[derive(Deserialize, Debug)]
struct GenerateReply {
	response: String,
}

/// Story model served by an Ollama instance.
#[derive(Debug)]
pub struct OllamaModel {
	client: Client,
	endpoint: String,
	model: String,
}

impl OllamaModel {
	/// Makes sure the configured model is present, pulling it if needed.
	///
	/// # Errors
	/// - [`StartupError::Unreachable`] when the server cannot be queried
	/// - [`StartupError::Acquisition`] when the pull fails
	pub fn connect(client: Client, config: &ProviderConfig) -> Result<Self, StartupError> {
		let model = Self {
			client,
			endpoint: config.endpoint.clone(),
			model: config.model.clone(),
		};

		if !model.is_present()? {
			model.pull()?;
		}

		Ok(model)
	}

	fn unreachable(&self, reason: String) -> StartupError {
		StartupError::Unreachable { endpoint: self.endpoint.clone(), reason }
	}

	fn acquisition(&self, reason: String) -> StartupError {
		StartupError::Acquisition { model: self.model.clone(), reason }
	}

	/// `true` if the server already has the model, `false` on 404.
	fn is_present(&self) -> Result<bool, StartupError> {
		let response = self
			.client
			.post(format!("{}/api/show", self.endpoint))
			.json(&ModelBody { model: &self.model })
			.send()
			.map_err(|e| self.unreachable(e.to_string()))?;

		match response.status() {
			s if s.is_success() => Ok(true),
			StatusCode::NOT_FOUND => Ok(false),
			s => Err(self.unreachable(format!("/api/show returned {s}"))),
		}
	}

	fn pull(&self) -> Result<(), StartupError> {
		info!("Model '{}' not found locally, pulling it", self.model);
		let response = self
			.client
			.post(format!("{}/api/pull", self.endpoint))
			.json(&PullBody { model: &self.model, stream: false })
			.send()
			.map_err(|e| self.acquisition(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().unwrap_or_default();
			return Err(self.acquisition(format!("{status}: {body}")));
		}

		let reply: PullReply = response.json().map_err(|e| self.acquisition(e.to_string()))?;
		if reply.status != "success" {
			return Err(self.acquisition(format!("pull ended with status '{}'", reply.status)));
		}

		info!("Model '{}' pulled", self.model);
		Ok(())
	}

	fn body<'a>(&'a self, request: &'a GenerationRequest) -> GenerateBody<'a> {
		GenerateBody {
			model: &self.model,
			prompt: request.prompt(),
			raw: true,
			stream: false,
			options: GenerateOptions {
				num_predict: request.max_length(),
				temperature: request.temperature(),
			},
		}
	}
}

impl StoryModel for OllamaModel {
	fn name(&self) -> &str {
		&self.model
	}

	fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
		debug!(
			"Ollama generate: num_predict={} temperature={}",
			request.max_length(),
			request.temperature()
		);
		let response = self
			.client
			.post(format!("{}/api/generate", self.endpoint))
			.json(&self.body(request))
			.send()?;
		let raw = check_status(response)?.text()?;
		let reply: GenerateReply = serde_json::from_str(&raw)?;
		compose_story(request.prompt(), &reply.response)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;
	use crate::config::Backend;
	use crate::model::test_server::{closed_endpoint, serve};

	fn config(endpoint: &str) -> ProviderConfig {
		ProviderConfig::new(Backend::Ollama, endpoint, "llama3.2:1b").unwrap()
	}

	fn offline_model() -> OllamaModel {
		OllamaModel {
			client: Client::new(),
			endpoint: "http://127.0.0.1:11434".to_owned(),
			model: "tinystories".to_owned(),
		}
	}

	#[test]
	fn body_continues_raw_prompt() {
		let model = offline_model();
		let request = GenerationRequest::new("A friendly robot that likes to garden.", 200, 1.5).unwrap();
		let body = serde_json::to_value(model.body(&request)).unwrap();
		assert_eq!(
			body,
			json!({
				"model": "tinystories",
				"prompt": "A friendly robot that likes to garden.",
				"raw": true,
				"stream": false,
				"options": {
					"num_predict": 200,
					"temperature": 1.5
				}
			})
		);
	}

	#[test]
	fn reply_ignores_extra_fields() {
		let reply: GenerateReply = serde_json::from_str(
			r#"{"model":"tinystories","response":" The robot smiled.","done":true,"eval_count":7}"#,
		)
		.unwrap();
		assert_eq!(reply.response, " The robot smiled.");
	}

	#[test]
	fn present_model_is_not_pulled() {
		let (endpoint, server) = serve(vec![(200, r#"{"modelfile":""}"#)]);
		let model = OllamaModel::connect(Client::new(), &config(&endpoint)).unwrap();
		assert_eq!(model.name(), "llama3.2:1b");

		let seen = server.join().unwrap();
		assert_eq!(seen.len(), 1);
		assert_eq!(seen[0].path, "/api/show");
		assert_eq!(serde_json::from_str::<serde_json::Value>(&seen[0].body).unwrap(), json!({"model": "llama3.2:1b"}));
	}

	#[test]
	fn missing_model_is_pulled() {
		let (endpoint, server) = serve(vec![
			(404, r#"{"error":"model 'llama3.2:1b' not found"}"#),
			(200, r#"{"status":"success"}"#),
		]);
		OllamaModel::connect(Client::new(), &config(&endpoint)).unwrap();

		let seen = server.join().unwrap();
		let paths: Vec<&str> = seen.iter().map(|s| s.path.as_str()).collect();
		assert_eq!(paths, vec!["/api/show", "/api/pull"]);
		assert_eq!(seen[1].method, "POST");
		assert_eq!(
			serde_json::from_str::<serde_json::Value>(&seen[1].body).unwrap(),
			json!({"model": "llama3.2:1b", "stream": false})
		);
	}

	#[test]
	fn unfinished_pull_is_an_acquisition_error() {
		let (endpoint, server) = serve(vec![(404, "{}"), (200, r#"{"status":"failed"}"#)]);
		let err = OllamaModel::connect(Client::new(), &config(&endpoint)).unwrap_err();
		server.join().unwrap();
		match err {
			StartupError::Acquisition { model, reason } => {
				assert_eq!(model, "llama3.2:1b");
				assert!(reason.contains("failed"), "{reason}");
			}
			other => panic!("expected Acquisition, got {other:?}"),
		}
	}

	#[test]
	fn rejected_pull_is_an_acquisition_error() {
		let (endpoint, server) = serve(vec![(404, "{}"), (500, r#"{"error":"pull model manifest: file does not exist"}"#)]);
		let err = OllamaModel::connect(Client::new(), &config(&endpoint)).unwrap_err();
		server.join().unwrap();
		assert!(matches!(err, StartupError::Acquisition { .. }), "{err:?}");
	}

	#[test]
	fn show_server_error_is_unreachable() {
		let (endpoint, server) = serve(vec![(500, r#"{"error":"internal"}"#)]);
		let err = OllamaModel::connect(Client::new(), &config(&endpoint)).unwrap_err();
		// no pull attempted
		assert_eq!(server.join().unwrap().len(), 1);
		match err {
			StartupError::Unreachable { endpoint: reported, reason } => {
				assert_eq!(reported, endpoint);
				assert!(reason.contains("500"), "{reason}");
			}
			other => panic!("expected Unreachable, got {other:?}"),
		}
	}

	#[test]
	fn closed_port_is_unreachable() {
		let err = OllamaModel::connect(Client::new(), &config(&closed_endpoint())).unwrap_err();
		assert!(matches!(err, StartupError::Unreachable { .. }), "{err:?}");
	}

	#[test]
	fn generate_returns_prompt_and_continuation() {
		let (endpoint, server) = serve(vec![
			(200, "{}"),
			(200, r#"{"model":"llama3.2:1b","response":" It grew tomatoes.","done":true}"#),
		]);
		let model = OllamaModel::connect(Client::new(), &config(&endpoint)).unwrap();
		let request = GenerationRequest::new("A friendly robot.", 50, 0.5).unwrap();
		assert_eq!(model.generate(&request).unwrap(), "A friendly robot. It grew tomatoes.");

		let seen = server.join().unwrap();
		assert_eq!(seen[1].path, "/api/generate");
	}

	#[test]
	fn generate_server_error_keeps_status_and_body() {
		let (endpoint, server) = serve(vec![(200, "{}"), (500, r#"{"error":"out of memory"}"#)]);
		let model = OllamaModel::connect(Client::new(), &config(&endpoint)).unwrap();
		let request = GenerationRequest::new("A friendly robot.", 50, 0.5).unwrap();
		let err = model.generate(&request).unwrap_err();
		server.join().unwrap();
		match err {
			GenerationError::Status { status, body } => {
				assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
				assert_eq!(body, r#"{"error":"out of memory"}"#);
			}
			other => panic!("expected Status, got {other:?}"),
		}
	}
}
