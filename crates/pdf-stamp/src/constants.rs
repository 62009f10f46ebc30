//! Shared constants for PDF stamping
//!
//! This module centralizes the magic numbers used by the layout engine,
//! the content preparer and the PDF surface.

// =============================================================================
// Stack Layout
// =============================================================================

/// Line height multiplier applied to a text line's font size.
/// Must match the height model of the preview renderer.
pub const LINE_HEIGHT: f32 = 1.2;

/// Gap after image elements and before the QR code (points)
pub const ELEMENT_GAP: f32 = 5.0;

/// Default distance between a preset-positioned block and the page edges (points)
pub const DEFAULT_MARGIN_PT: f32 = 36.0;

// =============================================================================
// Text
// =============================================================================

/// Company name is drawn at the base size; other body lines one point smaller
pub const BODY_SIZE_DELTA: f32 = 1.0;

/// Date and filename lines are two points smaller than the base size
pub const DYNAMIC_SIZE_DELTA: f32 = 2.0;

/// Default chrono format for the date line
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

// =============================================================================
// Calibration
// =============================================================================

/// Fraction of a line's leading used to lift the text baseline off the
/// bottom of its line box. Tuned against the rasterized preview.
pub const BASELINE_CORRECTION_FACTOR: f32 = 0.3;

/// Rasterized text signatures carry vertical padding equal to this multiple
/// of the font size; the bitmap is scaled so its height is
/// `signature_size * TEXT_SIGNATURE_PADDING`.
pub const TEXT_SIGNATURE_PADDING: f32 = 2.0;

/// Horizontal padding of rasterized text, as a fraction of the font size
pub const TEXT_SIGNATURE_H_PADDING: f32 = 0.5;

/// Supersampling factor used when rasterizing text signatures
pub const TEXT_RASTER_SCALE: f32 = 3.0;

/// Signature font family given to settings that predate signature types
pub const DEFAULT_SIGNATURE_FONT: &str = "Great Vibes";

/// Signature text for legacy settings without a company name
pub const DEFAULT_SIGNATURE_TEXT: &str = "Sign Here";

// =============================================================================
// QR Code
// =============================================================================

/// On-page size of the QR code (points, square)
pub const QR_SIZE_PT: f32 = 60.0;

/// Pixel size the QR bitmap is generated at before scaling
pub const QR_BASE_RESOLUTION_PX: u32 = 200;

/// Quiet zone around the QR symbol, in modules
pub const QR_QUIET_ZONE_MODULES: u32 = 4;

/// Placeholder payload used when no QR data is configured
pub const DEFAULT_QR_DATA: &str = "https://example.com/";

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Maximum depth followed when looking up inherited page attributes
pub const MAX_PAGE_TREE_DEPTH: usize = 32;
