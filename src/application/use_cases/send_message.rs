use std::sync::Arc;

use tracing::debug;

use crate::application::{MessageRenderer, TextGenerator};
use crate::domain::GenerationError;

/// Prefix shown in front of any failure delivered to the user.
pub const ERROR_REPLY_PREFIX: &str = "Sorry, I encountered an error: ";

/// What happened to one line of user input.
#[derive(Debug, Clone)]
pub enum SendOutcome {
    /// Input was blank; nothing was sent or rendered.
    Ignored,
    Replied(String),
    Failed(GenerationError),
}

impl SendOutcome {
    pub fn is_reply(&self) -> bool {
        matches!(self, Self::Replied(_))
    }

    pub fn error(&self) -> Option<&GenerationError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Use case for sending one user message and rendering whatever comes back.
///
/// The call is awaited to completion, so a caller driving a session from a
/// single loop never has more than one request outstanding.
pub struct SendMessageUseCase {
    generator: Arc<dyn TextGenerator>,
    renderer: Arc<dyn MessageRenderer>,
    max_tokens: u32,
}

impl SendMessageUseCase {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        renderer: Arc<dyn MessageRenderer>,
        max_tokens: u32,
    ) -> Self {
        Self {
            generator,
            renderer,
            max_tokens,
        }
    }

    pub async fn execute(&self, input: &str) -> SendOutcome {
        let message = input.trim();
        if message.is_empty() {
            return SendOutcome::Ignored;
        }

        self.renderer.render_user(message);
        debug!("Sending user message to {}", self.generator.model());

        match self.generator.generate(message, self.max_tokens).await {
            Ok(reply) => {
                self.renderer.render(&reply);
                SendOutcome::Replied(reply)
            }
            Err(e) => {
                debug!("Generation failed ({}): {}", e.kind(), e);
                self.renderer.render_error(&format!("{ERROR_REPLY_PREFIX}{e}"));
                SendOutcome::Failed(e)
            }
        }
    }
}
