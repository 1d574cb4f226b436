//! # Domain Layer
//!
//! Request and response models, client configuration, and the generation
//! error taxonomy. Nothing here knows about HTTP or the terminal.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
