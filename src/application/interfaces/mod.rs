mod message_renderer;
mod text_generator;

pub use message_renderer::*;
pub use text_generator::*;
