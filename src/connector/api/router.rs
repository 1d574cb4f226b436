use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, ChatController, ModelsController};

pub struct Router<'a> {
    ask_controller: AskController<'a>,
    chat_controller: ChatController<'a>,
    models_controller: ModelsController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            ask_controller: AskController::new(container),
            chat_controller: ChatController::new(container),
            models_controller: ModelsController::new(container),
        }
    }

    /// Run a command and return whatever should be printed afterwards.
    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Ask { prompt } => self.ask_controller.ask(prompt).await,
            Commands::Chat => {
                self.chat_controller.run().await?;
                Ok(String::new())
            }
            Commands::Models { all } => self.models_controller.list(all).await,
        }
    }
}
