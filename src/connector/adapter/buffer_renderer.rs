use std::sync::Mutex;

use crate::application::MessageRenderer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedMessage {
    User(String),
    Reply(String),
    Error(String),
}

/// [`MessageRenderer`] that keeps everything it is given, in order.
#[derive(Default)]
pub struct BufferRenderer {
    messages: Mutex<Vec<RenderedMessage>>,
}

impl BufferRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<RenderedMessage> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    fn push(&self, message: RenderedMessage) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message);
        }
    }
}

impl MessageRenderer for BufferRenderer {
    fn render_user(&self, text: &str) {
        self.push(RenderedMessage::User(text.to_string()));
    }

    fn render(&self, text: &str) {
        self.push(RenderedMessage::Reply(text.to_string()));
    }

    fn render_error(&self, message: &str) {
        self.push(RenderedMessage::Error(message.to_string()));
    }
}
