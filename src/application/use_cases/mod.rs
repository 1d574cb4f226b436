mod list_models;
mod send_message;

pub use list_models::*;
pub use send_message::*;
