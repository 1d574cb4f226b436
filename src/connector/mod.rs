//! # Connector Layer
//!
//! External integrations implementing application ports:
//! - Text generation (Gemini over HTTP, plus an offline mock)
//! - Presentation (terminal renderer, in-memory buffer)
//! - CLI wiring (container, router, controllers)

pub mod adapter;
pub mod api;

pub use adapter::*;
