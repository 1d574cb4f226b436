use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::application::MessageRenderer;

use super::super::Container;

pub const WELCOME_MESSAGE: &str = "Hello! I'm CodeMate. How can I help you today?";
const INPUT_PROMPT: &str = "you> ";

#[derive(Debug, PartialEq, Eq)]
pub enum ChatCommand<'a> {
    Quit,
    ToggleTheme,
    Help,
    Message(&'a str),
}

impl<'a> ChatCommand<'a> {
    pub fn parse(line: &'a str) -> Self {
        match line.trim() {
            "/quit" | "/exit" => ChatCommand::Quit,
            "/theme" => ChatCommand::ToggleTheme,
            "/help" => ChatCommand::Help,
            _ => ChatCommand::Message(line),
        }
    }
}

/// Shows a "Thinking..." spinner from the moment a message is sent until
/// its reply or error is rendered. The typed line is already on screen, so
/// user messages are not echoed again.
struct ThinkingRenderer {
    inner: Arc<dyn MessageRenderer>,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ThinkingRenderer {
    fn new(inner: Arc<dyn MessageRenderer>) -> Self {
        Self {
            inner,
            spinner: Mutex::new(None),
        }
    }

    fn stop(&self) {
        if let Some(spinner) = self.spinner.lock().ok().and_then(|mut s| s.take()) {
            spinner.finish_and_clear();
        }
    }
}

impl MessageRenderer for ThinkingRenderer {
    fn render_user(&self, _text: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("Invalid spinner template"),
        );
        spinner.set_message("Thinking...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(spinner);
        }
    }

    fn render(&self, text: &str) {
        self.stop();
        self.inner.render(text);
    }

    fn render_error(&self, message: &str) {
        self.stop();
        self.inner.render_error(message);
    }
}

pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Interactive session over stdin. Each message is awaited before the
    /// next line is read.
    pub async fn run(&self) -> Result<()> {
        let renderer = self.container.renderer();
        let thinking = Arc::new(ThinkingRenderer::new(renderer.clone()));
        let use_case = self.container.send_message_use_case(thinking);

        debug!("Starting chat session with {}", self.container.model());
        renderer.render(WELCOME_MESSAGE);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("{INPUT_PROMPT}");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                println!();
                break;
            };

            match ChatCommand::parse(&line) {
                ChatCommand::Quit => break,
                ChatCommand::ToggleTheme => {
                    let theme = renderer.toggle_theme();
                    println!("Switched to {} theme.\n", theme.as_str());
                }
                ChatCommand::Help => {
                    println!("Commands: /theme toggles dark/light, /quit or /exit leaves.\n");
                }
                ChatCommand::Message(text) => {
                    use_case.execute(text).await;
                }
            }
        }

        Ok(())
    }
}
