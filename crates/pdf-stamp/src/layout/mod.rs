//! Layout calculation modules for stamping
//!
//! This module handles all the geometric calculations:
//! - Stacking elements into a block (alignment, gaps, block size)
//! - Anchoring the block on a page (presets and custom positions)
//! - Mapping visual coordinates to native PDF coordinates per rotation

mod anchor;
mod stack;
mod transform;
mod types;

pub use anchor::*;
pub use stack::*;
pub use transform::*;
pub use types::*;
