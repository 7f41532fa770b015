//! # Branded Overlays
//!
//! Layers the brand graphic onto a pre-rendered marketing image:
//!
//! 1. a dark-navy gradient band along the bottom edge,
//! 2. a centred white headline with a drop shadow,
//! 3. a centred amber subtitle with a drop shadow,
//! 4. the logo, resized to a fixed square, in the top-left corner.
//!
//! The per-image inputs are an [`OverlaySpec`]; the shared geometry is an
//! [`OverlayLayout`]. Named marketing images live in the [`VariantRegistry`].
//!
//! ```rust,no_run
//! use brand_compositor::overlay::{OverlayCompositor, OverlayLayout, OverlaySpec};
//! use brand_compositor::text::FontResolver;
//!
//! let compositor = OverlayCompositor::new(OverlayLayout::default(), FontResolver::new("fonts", vec![]));
//! let spec = OverlaySpec::new("CHORES MADE FUN", "Gamified tasks for the whole family")
//!     .with_logo("assets/daily-bag-icon-transparent.png");
//! compositor.compose("family.png", &spec, "family_branded.jpg")?;
//! # Ok::<(), brand_compositor::CompositorError>(())
//! ```

pub mod compositor;
pub mod layout;
pub mod variants;

pub use compositor::{run_batch, OverlayCompositor, OverlayPlacement, TextPlacement};
pub use layout::{band_alpha, gradient_band, OverlayLayout};
pub use variants::{OverlaySpec, Variant, VariantRegistry};
