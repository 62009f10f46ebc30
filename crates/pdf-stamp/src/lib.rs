mod assets;
mod constants;
mod content;
mod fonts;
mod layout;
mod metrics;
mod options;
mod pages;
mod preview;
mod qr;
mod raster;
mod render;
pub mod stamp;
mod surface;
mod types;

pub use assets::{StampAssets, decode_data_uri, load_asset};
pub use constants::*;
pub use content::{PreparedContent, StampContext, StampResources, prepare_content};
pub use fonts::{FontData, find_system_font, is_font_path};
pub use layout::*;
pub use metrics::text_width;
pub use options::*;
pub use pages::{parse_page_range, resolve_target_pages};
pub use preview::{PageLayout, PlacedItem, layout_page};
pub use qr::{QrCodeGenerator, QrGenerator};
pub use raster::{FontFileRasterizer, TextRasterizer};
pub use render::PdfSurface;
pub use stamp::{BatchInput, Stamper, load_pdf, save_pdf};
pub use surface::{ImageDraw, StampSurface, TextDraw};
pub use types::*;
