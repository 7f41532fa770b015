//! # Image-Model API
//!
//! Thin blocking client for an OpenAI-compatible chat-completions endpoint
//! that returns images: listing image-capable models and generating the
//! marketing illustration set with per-model fallback.

pub mod client;
pub mod prompts;
pub mod types;

pub use client::{filter_image_models, ModelApiClient};
pub use prompts::{default_prompts, PromptItem};
pub use types::{ImageRef, ModelInfo};
