//! # Brand-Compositor
//!
//! Produce branded marketing assets from pre-rendered images.
//!
//! This library layers a consistent brand overlay (gradient band, captions,
//! logo) onto marketing images, renders a standalone launch graphic, and
//! talks to an image-generation model API to produce source illustrations.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use brand_compositor::{config::Config, overlay::OverlayCompositor};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let registry = config.variant_registry();
//! let leaderboard = registry.get("leaderboard").unwrap();
//!
//! let compositor = OverlayCompositor::from_config(&config);
//! compositor.compose(
//!     &leaderboard.source,
//!     &leaderboard.overlay_spec(Some(&config.paths.logo)),
//!     &leaderboard.output,
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`canvas`] - RGBA drawing surface, shape primitives and encoding
//! - [`text`] - Font resolution with a built-in bitmap fallback
//! - [`overlay`] - Branded overlay compositor and variant registry
//! - [`launch`] - Launch announcement graphic
//! - [`api`] - Image-model listing and generation client
//! - [`config`] - Configuration management

pub mod api;
pub mod canvas;
pub mod config;
pub mod error;
pub mod launch;
pub mod overlay;
pub mod palette;
pub mod text;

// Re-export commonly used types for convenience
pub use crate::{
    canvas::Canvas,
    config::Config,
    error::{CompositorError, Result},
    overlay::{OverlayCompositor, OverlaySpec, VariantRegistry},
};
