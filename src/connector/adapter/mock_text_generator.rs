use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::application::TextGenerator;
use crate::domain::{GenerationError, GenerationResult, GenerationRequest, ModelInfo};

const MOCK_MODEL: &str = "mock-generator";

enum Reply {
    Echo,
    Fixed(String),
    Fail(GenerationError),
}

/// Offline [`TextGenerator`] used by `--mock` and by tests.
///
/// By default it echoes the prompt back. Prompts are validated the same way
/// as the real client, so blank input still fails.
pub struct MockTextGenerator {
    reply: Reply,
    calls: AtomicUsize,
    last_call: Mutex<Option<(String, u32)>>,
}

impl MockTextGenerator {
    pub fn new() -> Self {
        Self::with(Reply::Echo)
    }

    pub fn with_reply(text: impl Into<String>) -> Self {
        Self::with(Reply::Fixed(text.into()))
    }

    pub fn with_error(error: GenerationError) -> Self {
        Self::with(Reply::Fail(error))
    }

    fn with(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_call
            .lock()
            .ok()
            .and_then(|call| call.as_ref().map(|(prompt, _)| prompt.clone()))
    }

    pub fn last_max_tokens(&self) -> Option<u32> {
        self.last_call
            .lock()
            .ok()
            .and_then(|call| call.as_ref().map(|(_, max_tokens)| *max_tokens))
    }
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> GenerationResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_call.lock() {
            *last = Some((prompt.to_string(), max_tokens));
        }

        let request = GenerationRequest::new(prompt)?.with_max_output_tokens(max_tokens)?;
        debug!("Mock generation for {} chars", request.prompt().len());

        match &self.reply {
            Reply::Echo => Ok(format!("You said: **{}**", request.prompt())),
            Reply::Fixed(text) => Ok(text.clone()),
            Reply::Fail(e) => Err(e.clone()),
        }
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, GenerationError> {
        Ok(vec![ModelInfo {
            name: format!("models/{MOCK_MODEL}"),
            display_name: Some("Mock Generator".to_string()),
            description: Some("Echoes prompts back without calling any API".to_string()),
            input_token_limit: None,
            output_token_limit: None,
            supported_generation_methods: vec!["generateContent".to_string()],
        }])
    }

    fn model(&self) -> &str {
        MOCK_MODEL
    }
}
