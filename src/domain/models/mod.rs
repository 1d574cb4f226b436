mod chat_message;
mod client_config;
mod generation_request;
mod model_info;

pub use chat_message::*;
pub use client_config::*;
pub use generation_request::*;
pub use model_info::*;
