//! # Canvas
//!
//! RGBA drawing surface shared by the overlay compositor and the launch
//! graphic: alpha blending, masked paste, shape primitives, text, and
//! flattening to an opaque RGB file.

pub mod encode;
mod shapes;
pub mod types;

pub use encode::OutputFormat;
pub use types::{blend_over, Canvas, Rect};
