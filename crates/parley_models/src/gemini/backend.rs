//! [`GenerativeBackend`] over the `gemini-rust` SDK.

use async_trait::async_trait;
use gemini_rust::generation::model::GenerationResponse;
use gemini_rust::{Gemini, client::Model};
use parley_core::{RawResponse, Role, Turn};
use parley_error::{GeminiError, GeminiErrorKind, ParleyResult};
use parley_interface::GenerativeBackend;
use std::env;
use tracing::{debug, instrument};

use super::GeminiResult;

/// One model, one system instruction, one API key.
///
/// The REST API is stateless: conversation history is replayed on every call
/// as alternating user and model messages.
#[derive(Clone)]
pub struct GeminiBackend {
    client: Gemini,
    model_name: String,
    system_instruction: String,
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("model_name", &self.model_name)
            .field("system_instruction", &self.system_instruction)
            .finish_non_exhaustive()
    }
}

impl GeminiBackend {
    /// Create a backend with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiErrorKind::ClientCreation`] if the SDK rejects the
    /// model or key.
    pub fn new(
        api_key: impl Into<String>,
        model_name: impl Into<String>,
        system_instruction: impl Into<String>,
    ) -> ParleyResult<Self> {
        let model_name = model_name.into();
        let client = Gemini::with_model(api_key.into(), Self::model_name_to_enum(&model_name))
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;

        debug!(model = %model_name, "Created Gemini client");

        Ok(Self {
            client,
            model_name,
            system_instruction: system_instruction.into(),
        })
    }

    /// Create a backend with the key from `GEMINI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiErrorKind::MissingApiKey`] if the variable is unset.
    pub fn from_env(
        model_name: impl Into<String>,
        system_instruction: impl Into<String>,
    ) -> ParleyResult<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| GeminiError::new(GeminiErrorKind::MissingApiKey))?;
        Self::new(api_key, model_name, system_instruction)
    }

    /// The fixed system instruction.
    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Convert a model name to the SDK's model identifier.
    ///
    /// - "gemini-1.5-pro" → `Model::Custom("models/gemini-1.5-pro")`
    /// - "models/gemini-1.5-pro" → preserved
    fn model_name_to_enum(name: &str) -> Model {
        if name.starts_with("models/") {
            Model::Custom(name.to_string())
        } else {
            Model::Custom(format!("models/{}", name))
        }
    }

    async fn generate_internal(&self, prompt: &str, history: &[Turn]) -> GeminiResult<RawResponse> {
        let mut builder = self
            .client
            .generate_content()
            .with_system_prompt(&self.system_instruction);

        for turn in history {
            builder = match turn.role {
                Role::User => builder.with_user_message(&turn.text),
                Role::Model => builder.with_model_message(&turn.text),
            };
        }
        builder = builder.with_user_message(prompt);

        let response = builder.execute().await.map_err(Self::parse_gemini_error)?;
        Self::to_raw_response(&response)
    }

    /// Pull the text and total token count out of an SDK response.
    fn to_raw_response(response: &GenerationResponse) -> GeminiResult<RawResponse> {
        let text = response.text();
        let text = (!text.is_empty()).then_some(text);

        // Read usage through the wire representation so the field shape of the
        // SDK's metadata struct does not matter here.
        let wire = serde_json::to_value(response).map_err(|e| {
            GeminiError::new(GeminiErrorKind::MalformedResponse(format!(
                "Failed to serialize response: {}",
                e
            )))
        })?;
        let total_token_count = wire
            .pointer("/usageMetadata/totalTokenCount")
            .and_then(serde_json::Value::as_u64);

        debug!(
            has_text = text.is_some(),
            total_token_count, "Received Gemini response"
        );

        Ok(RawResponse {
            text,
            total_token_count,
        })
    }

    /// Parse gemini-rust errors to extract HTTP status codes.
    ///
    /// Errors that never reached the server carry no status code and are
    /// treated as transport failures.
    fn parse_gemini_error(err: impl std::fmt::Display) -> GeminiError {
        let err_msg = err.to_string();

        // Example: "bad response from server; code 503; description: ..."
        if let Some(status_code) = Self::extract_status_code(&err_msg) {
            GeminiError::new(GeminiErrorKind::HttpError {
                status_code,
                message: err_msg,
            })
        } else {
            GeminiError::new(GeminiErrorKind::Transport(err_msg))
        }
    }

    /// Extract HTTP status code from error message string.
    fn extract_status_code(error_msg: &str) -> Option<u16> {
        let code_start = error_msg.find("code ")?;
        let code_str = &error_msg[code_start + 5..];
        let end = code_str
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(code_str.len());
        code_str[..end].parse().ok()
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    #[instrument(skip(self, prompt, history), fields(model = %self.model_name, history_len = history.len()))]
    async fn generate(&self, prompt: &str, history: &[Turn]) -> ParleyResult<RawResponse> {
        self.generate_internal(prompt, history)
            .await
            .map_err(Into::into)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_is_extracted_from_sdk_message() {
        let msg = "bad response from server; code 503; description: overloaded";
        assert_eq!(GeminiBackend::extract_status_code(msg), Some(503));
        assert_eq!(GeminiBackend::extract_status_code("code 429"), Some(429));
        assert_eq!(GeminiBackend::extract_status_code("connection refused"), None);
    }

    #[test]
    fn errors_without_status_are_transport_failures() {
        let err = GeminiBackend::parse_gemini_error("error sending request: timed out");
        assert!(matches!(err.kind, GeminiErrorKind::Transport(_)));

        let err = GeminiBackend::parse_gemini_error("bad response from server; code 401; bad key");
        assert!(matches!(
            err.kind,
            GeminiErrorKind::HttpError {
                status_code: 401,
                ..
            }
        ));
    }

    #[test]
    fn model_names_get_models_prefix_once() {
        assert!(matches!(
            GeminiBackend::model_name_to_enum("gemini-1.5-pro"),
            Model::Custom(name) if name == "models/gemini-1.5-pro"
        ));
        assert!(matches!(
            GeminiBackend::model_name_to_enum("models/gemini-1.5-flash"),
            Model::Custom(name) if name == "models/gemini-1.5-flash"
        ));
    }
}
