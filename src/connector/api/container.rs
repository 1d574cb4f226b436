use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{ListModelsUseCase, MessageRenderer, SendMessageUseCase, TextGenerator};
use crate::connector::{GeminiClient, MockTextGenerator, TerminalRenderer, Theme};
use crate::domain::ClientConfig;

pub struct ContainerConfig {
    pub client: ClientConfig,
    /// Answer locally instead of calling the API.
    pub mock: bool,
    pub theme: Theme,
    pub color: bool,
}

pub struct Container {
    generator: Arc<dyn TextGenerator>,
    renderer: Arc<TerminalRenderer>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Self {
        let generator: Arc<dyn TextGenerator> = if config.mock {
            debug!("Using mock text generator");
            Arc::new(MockTextGenerator::new())
        } else {
            if config.client.usable_api_key().is_none() {
                warn!("No API key configured; generation requests will fail until one is set");
            }
            debug!(
                "Using Gemini model {} at {}",
                config.client.model, config.client.base_url
            );
            Arc::new(GeminiClient::new(config.client.clone()))
        };

        let renderer = Arc::new(TerminalRenderer::new(config.theme, config.color));

        Self {
            generator,
            renderer,
            config,
        }
    }

    /// Build with an explicit generator, bypassing client construction.
    pub fn with_generator(config: ContainerConfig, generator: Arc<dyn TextGenerator>) -> Self {
        let renderer = Arc::new(TerminalRenderer::new(config.theme, config.color));
        Self {
            generator,
            renderer,
            config,
        }
    }

    pub fn send_message_use_case(&self, renderer: Arc<dyn MessageRenderer>) -> SendMessageUseCase {
        SendMessageUseCase::new(
            self.generator.clone(),
            renderer,
            self.config.client.max_output_tokens,
        )
    }

    pub fn list_models_use_case(&self) -> ListModelsUseCase {
        ListModelsUseCase::new(self.generator.clone())
    }

    pub fn generator(&self) -> Arc<dyn TextGenerator> {
        self.generator.clone()
    }

    pub fn renderer(&self) -> Arc<TerminalRenderer> {
        self.renderer.clone()
    }

    pub fn max_output_tokens(&self) -> u32 {
        self.config.client.max_output_tokens
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }
}
