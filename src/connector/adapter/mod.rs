mod buffer_renderer;
mod gemini_client;
mod mock_text_generator;
mod terminal_renderer;

pub use buffer_renderer::*;
pub use gemini_client::*;
pub use mock_text_generator::*;
pub use terminal_renderer::*;
