//! Adaptive octree color quantization.
//!
//! Pixels are fed one at a time into a depth- and size-bounded octree over
//! the RGB cube. Whenever the tree holds more leaves than the palette size
//! allows, one of its deepest branches is collapsed into a leaf holding the
//! pixel-weighted average of its colors. The leaves left at the end, in
//! traversal order, form the palette.

pub mod node;

pub use node::*;
pub use node::error::ConfigError;
pub use node::merge::Strategy;
pub use node::quantize::{quantize, quantize_colors, quantize_to_palette, remap};
pub use node::quantize::options::QuantizeOptions;
pub use node::quantize::palette::{Color, Palette};
