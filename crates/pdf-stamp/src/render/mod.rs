//! PDF rendering modules for stamping
//!
//! This module handles all PDF-specific operations:
//! - Reading page geometry (inherited MediaBox and /Rotate)
//! - Embedding bitmaps as image XObjects
//! - Generating content stream operators
//! - Appending stamp content without disturbing existing page content

mod ops;
mod surface;
mod xobject;

pub use surface::PdfSurface;
