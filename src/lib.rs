pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    ListModelsUseCase, MessageRenderer, SendMessageUseCase, SendOutcome, TextGenerator,
};

pub use cli::Commands;

pub use connector::{
    BufferRenderer, GeminiClient, MockTextGenerator, RenderedMessage, TerminalRenderer, Theme,
};

pub use domain::{
    render_result_text, ChatMessage, ClientConfig, GenerationError, GenerationRequest,
    GenerationResult, ModelInfo, Role,
};
