//! Building the ordered list of stamp elements
//!
//! Order is fixed: logo, signature (unless it is positioned on its own),
//! body lines, dynamic lines, QR code. Every optional element is skipped
//! with a warning when its asset cannot be produced.

use crate::assets::StampAssets;
use crate::constants::*;
use crate::layout::{ImageRole, LayoutElement, TextLine};
use crate::options::{CompanySettings, StampOptions};
use crate::qr::{QrCodeGenerator, QrGenerator};
use crate::raster::{FontFileRasterizer, TextRasterizer};
use crate::surface::StampSurface;
use crate::types::*;
use chrono::{Local, NaiveDate};
use std::fmt::Write;
use std::sync::Arc;

/// Per-document values that end up in the dynamic lines
#[derive(Debug, Clone, PartialEq)]
pub struct StampContext {
    /// Name of the source file, shown when filename stamping is enabled
    pub filename: Option<String>,
    pub date: NaiveDate,
}

impl StampContext {
    /// Context dated today
    pub fn new(filename: Option<String>) -> Self {
        Self {
            filename,
            date: Local::now().date_naive(),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }
}

/// Loaded assets plus the collaborators that turn them into bitmaps.
/// One instance is shared by every document of a batch.
#[derive(Clone)]
pub struct StampResources {
    pub assets: StampAssets,
    pub qr: Arc<dyn QrGenerator>,
    pub rasterizer: Option<Arc<dyn TextRasterizer>>,
}

impl StampResources {
    pub fn new(assets: StampAssets) -> Self {
        let rasterizer = assets.signature_font.clone().and_then(|font| {
            match FontFileRasterizer::from_font_data(font) {
                Ok(r) => Some(Arc::new(r) as Arc<dyn TextRasterizer>),
                Err(e) => {
                    log::warn!("Signature font unusable: {}", e);
                    None
                }
            }
        });

        Self {
            assets,
            qr: Arc::new(QrCodeGenerator),
            rasterizer,
        }
    }

    /// Load assets for `settings`/`options` and set up default collaborators
    pub async fn load(settings: &CompanySettings, options: &StampOptions) -> Self {
        Self::new(StampAssets::load(settings, options).await)
    }

    pub fn with_qr_generator(mut self, qr: Arc<dyn QrGenerator>) -> Self {
        self.qr = qr;
        self
    }

    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn TextRasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }
}

impl Default for StampResources {
    fn default() -> Self {
        Self::new(StampAssets::default())
    }
}

/// Output of content preparation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreparedContent {
    /// Elements of the stacked block, in stacking order
    pub elements: Vec<LayoutElement>,
    /// Signature placed at its own position (custom placement only)
    pub detached_signature: Option<LayoutElement>,
}

/// Resolve every element of the stamp with its final size.
///
/// Images are embedded into `surface` once here and reused on every page.
pub fn prepare_content(
    surface: &mut dyn StampSurface,
    settings: &CompanySettings,
    options: &StampOptions,
    resources: &StampResources,
    context: &StampContext,
) -> PreparedContent {
    let mut content = PreparedContent::default();

    if options.include_logo {
        if let Some(bytes) = resources.assets.logo.as_deref() {
            content.elements.extend(embed_scaled(
                surface,
                ImageRole::Logo,
                bytes,
                options.logo_size,
            ));
        }
    }

    if options.include_signature {
        let signature = prepare_signature(surface, settings, options, resources);
        if options.placement().is_custom() {
            content.detached_signature = signature;
        } else {
            content.elements.extend(signature);
        }
    }

    let base = options.font_size;
    let body_size = base - BODY_SIZE_DELTA;
    let mut body = vec![(settings.name.as_str(), FontWeight::Bold, base)];
    body.push((settings.reg_no.as_str(), FontWeight::Regular, body_size));
    body.extend(
        settings
            .address_lines()
            .map(|line| (line, FontWeight::Regular, body_size)),
    );
    body.push((settings.phone.as_str(), FontWeight::Regular, body_size));

    for (text, weight, size) in body {
        content.elements.extend(text_line(&*surface, text, weight, size));
    }

    let dynamic_size = base - DYNAMIC_SIZE_DELTA;
    if options.include_date {
        match format_date(context.date, &options.date_format) {
            Some(date) => content
                .elements
                .extend(text_line(&*surface, &date, FontWeight::Regular, dynamic_size)),
            None => log::warn!("Skipping date: bad format '{}'", options.date_format),
        }
    }
    if options.include_filename {
        if let Some(filename) = context.filename.as_deref() {
            content
                .elements
                .extend(text_line(&*surface, filename, FontWeight::Regular, dynamic_size));
        }
    }

    if options.include_qr_code {
        match resources.qr.generate(options.qr_payload(), QR_BASE_RESOLUTION_PX) {
            Ok(png) => match surface.embed_image(&png) {
                Ok(image) => content.elements.push(LayoutElement::Image {
                    role: ImageRole::QrCode,
                    image,
                    width: QR_SIZE_PT,
                    height: QR_SIZE_PT,
                }),
                Err(e) => log::warn!("Skipping QR code: {}", e),
            },
            Err(e) => log::warn!("Skipping QR code: {}", e),
        }
    }

    log::debug!(
        "Prepared {} block elements{}",
        content.elements.len(),
        if content.detached_signature.is_some() {
            " and a detached signature"
        } else {
            ""
        }
    );
    content
}

fn prepare_signature(
    surface: &mut dyn StampSurface,
    settings: &CompanySettings,
    options: &StampOptions,
    resources: &StampResources,
) -> Option<LayoutElement> {
    match settings.signature_type {
        SignatureType::Image => {
            let bytes = resources.assets.signature_image.as_deref()?;
            embed_scaled(surface, ImageRole::Signature, bytes, options.signature_size)
        }
        SignatureType::Text => {
            let text = settings
                .signature_text
                .as_deref()
                .filter(|t| !t.is_empty())?;
            let Some(rasterizer) = resources.rasterizer.as_ref() else {
                log::warn!("Skipping text signature: no signature font available");
                return None;
            };

            let padding = options.calibration.text_signature_padding;
            match rasterizer.rasterize(text, options.signature_size, options.text_color(), padding) {
                Ok(png) => embed_scaled(
                    surface,
                    ImageRole::Signature,
                    &png,
                    options.signature_size * padding,
                ),
                Err(e) => {
                    log::warn!("Skipping text signature: {}", e);
                    None
                }
            }
        }
    }
}

/// Embed `bytes` and scale the image to `target_height`, keeping its aspect
fn embed_scaled(
    surface: &mut dyn StampSurface,
    role: ImageRole,
    bytes: &[u8],
    target_height: f32,
) -> Option<LayoutElement> {
    match surface.embed_image(bytes) {
        Ok(image) => {
            let (width, height) = image.scaled_to_height(target_height);
            Some(LayoutElement::Image {
                role,
                image,
                width,
                height,
            })
        }
        Err(e) => {
            log::warn!("Skipping {:?}: {}", role, e);
            None
        }
    }
}

/// Format `date`, or `None` if the format asks for something a date lacks
fn format_date(date: NaiveDate, format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(format)).ok()?;
    Some(out)
}

fn text_line(
    surface: &dyn StampSurface,
    text: &str,
    weight: FontWeight,
    font_size: f32,
) -> Option<LayoutElement> {
    if text.is_empty() || !(font_size > 0.0) {
        return None;
    }
    Some(LayoutElement::Text(TextLine {
        text: text.to_string(),
        weight,
        font_size,
        width: surface.text_width(text, weight, font_size),
        height: font_size * LINE_HEIGHT,
    }))
}
