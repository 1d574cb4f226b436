use crate::domain::GenerationError;

pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.95;
pub const DEFAULT_TOP_K: u32 = 40;

/// A single prompt together with the sampling parameters sent alongside it.
///
/// Only `max_output_tokens` is caller-controlled; the sampling knobs are
/// always the defaults above.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    prompt: String,
    max_output_tokens: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

impl GenerationRequest {
    /// Build a request for `prompt`, rejecting blank prompts.
    ///
    /// The prompt is kept verbatim; length limits are the provider's call.
    pub fn new(prompt: impl Into<String>) -> Result<Self, GenerationError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(GenerationError::invalid_request("prompt must not be empty"));
        }

        Ok(Self {
            prompt,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            top_k: DEFAULT_TOP_K,
        })
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Result<Self, GenerationError> {
        if max_output_tokens == 0 {
            return Err(GenerationError::invalid_request(
                "max output tokens must be positive",
            ));
        }
        self.max_output_tokens = max_output_tokens;
        Ok(self)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn max_output_tokens(&self) -> u32 {
        self.max_output_tokens
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn top_p(&self) -> f32 {
        self.top_p
    }

    pub fn top_k(&self) -> u32 {
        self.top_k
    }
}
