use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::application::TextGenerator;
use crate::domain::{
    ClientConfig, GenerationError, GenerationRequest, GenerationResult, ModelInfo, API_KEY_ENV,
};

const API_VERSION_PATH: &str = "/v1beta/models";
const GENERATE_CONTENT_ACTION: &str = "generateContent";

/// Returned as a successful reply when the first part carries no text.
pub const NO_TEXT_FALLBACK: &str = "No text was generated";
const UNKNOWN_ERROR: &str = "Unknown error";

/// `generateContent` request payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    contents: Vec<ApiContent<'a>>,
    generation_config: ApiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct ApiContent<'a> {
    parts: Vec<ApiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct ApiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

impl<'a> From<&'a GenerationRequest> for ApiRequest<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        Self {
            contents: vec![ApiContent {
                parts: vec![ApiPart {
                    text: request.prompt(),
                }],
            }],
            generation_config: ApiGenerationConfig {
                max_output_tokens: request.max_output_tokens(),
                temperature: request.temperature(),
                top_p: request.top_p(),
                top_k: request.top_k(),
            },
        }
    }
}

/// The parts of a `generateContent` response we read. Every level is optional
/// so that shape problems are reported as our own errors, not serde's.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Option<Vec<ApiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct ApiCandidate {
    #[serde(default)]
    content: Option<ApiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct ApiCandidateContent {
    #[serde(default)]
    parts: Option<Vec<ApiCandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct ApiCandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

/// HTTP client for the Gemini `generateContent` API.
///
/// Implements [`TextGenerator`]. One call to [`TextGenerator::generate`] is
/// exactly one POST; nothing is retried and no state survives between calls.
///
/// The API key travels as the `key` query parameter. It is checked before any
/// request is built, so a missing or placeholder key never reaches the
/// network. URLs are logged without the key.
pub struct GeminiClient {
    client: reqwest::Client,
    config: ClientConfig,
    /// `<base>/v1beta/models/<model>:generateContent`
    generate_url: String,
    /// `<base>/v1beta/models`
    models_url: String,
}

impl GeminiClient {
    pub fn new(config: ClientConfig) -> Self {
        let base = config.base_url.trim_end_matches('/');
        let models_url = format!("{base}{API_VERSION_PATH}");
        let generate_url = format!("{models_url}/{}:{GENERATE_CONTENT_ACTION}", config.model);

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Self {
            client: builder.build().unwrap_or_default(),
            config,
            generate_url,
            models_url,
        }
    }

    pub fn generate_url(&self) -> &str {
        &self.generate_url
    }

    fn api_key(&self) -> Result<&str, GenerationError> {
        self.config.usable_api_key().ok_or_else(|| {
            GenerationError::configuration(format!(
                "no API key configured (set {API_KEY_ENV} or pass --api-key)"
            ))
        })
    }

    /// Read a non-success response into an [`GenerationError::Api`].
    async fn api_error(response: reqwest::Response) -> GenerationError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        debug!("Gemini API error response ({status}): {body}");
        GenerationError::api(status.as_u16(), api_error_message(&body))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> GenerationResult {
        let api_key = self.api_key()?;
        let request = GenerationRequest::new(prompt)?.with_max_output_tokens(max_tokens)?;
        let body = ApiRequest::from(&request);

        info!("Sending request to Gemini API at {}", self.generate_url);

        let response = self
            .client
            .post(&self.generate_url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let text = response.text().await.map_err(transport_error)?;
        debug!("Gemini API response: {text}");

        extract_text(&text)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, GenerationError> {
        let api_key = self.api_key()?;

        info!("Listing models at {}", self.models_url);

        let response = self
            .client
            .get(&self.models_url)
            .query(&[("key", api_key)])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let text = response.text().await.map_err(transport_error)?;
        debug!("Gemini model listing: {text}");

        let list: ApiModelList =
            serde_json::from_str(&text).map_err(|e| GenerationError::decode(e.to_string()))?;
        Ok(list.models)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// Pull the first candidate's first text part out of a success body.
fn extract_text(body: &str) -> GenerationResult {
    let response: ApiResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::decode(e.to_string()))?;

    let candidate = response
        .candidates
        .and_then(|c| c.into_iter().next())
        .ok_or(GenerationError::EmptyResponse)?;

    let part = candidate
        .content
        .and_then(|content| content.parts)
        .and_then(|parts| parts.into_iter().next())
        .ok_or(GenerationError::MalformedResponse)?;

    Ok(part
        .text
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NO_TEXT_FALLBACK.to_string()))
}

/// Best-effort provider message from an error body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}

/// Describe a reqwest failure with its full source chain, minus the URL
/// (which carries the API key).
fn transport_error(e: reqwest::Error) -> GenerationError {
    let e = e.without_url();
    let mut description = e.to_string();
    let mut source = std::error::Error::source(&e);
    while let Some(cause) = source {
        description.push_str(": ");
        description.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    debug!("Gemini API request failed: {description}");
    GenerationError::transport(description)
}
