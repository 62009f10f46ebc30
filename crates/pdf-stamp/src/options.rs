use crate::constants::*;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Company details and signature assets, shared by every stamp
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct CompanySettings {
    pub name: String,
    pub reg_no: String,
    /// Newline-separated address lines
    pub address: String,
    pub phone: String,
    /// Logo image: a `data:` URI or a file path
    pub logo: Option<String>,

    pub signature_type: SignatureType,
    /// Signature image (for [`SignatureType::Image`]): a `data:` URI or a file path
    pub signature: Option<String>,
    /// Text to render as the signature (for [`SignatureType::Text`])
    pub signature_text: Option<String>,
    /// Font used for text signatures: a family name such as `Great Vibes`,
    /// a TrueType/OpenType file path or a `data:` URI
    pub signature_font: Option<String>,
}

/// Stored position of the stamp block
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StampPosition {
    pub preset: PositionPreset,
    /// Relative x, only used with [`PositionPreset::Custom`]
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub x: Option<f32>,
    /// Relative y, only used with [`PositionPreset::Custom`]
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub y: Option<f32>,
}

/// Empirical constants that keep the PDF output in line with the preview
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Calibration {
    /// Fraction of a text line's leading that lifts the baseline
    pub baseline_factor: f32,
    /// Height of a rasterized text signature as a multiple of the signature size
    pub text_signature_padding: f32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            baseline_factor: BASELINE_CORRECTION_FACTOR,
            text_signature_padding: TEXT_SIGNATURE_PADDING,
        }
    }
}

/// Per-run stamp configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct StampOptions {
    pub position: StampPosition,
    /// Independent signature position, used when the block is custom-placed
    pub signature_position: Option<RelativePosition>,
    /// Hex text color, e.g. `#003399`
    pub color: String,
    /// Base font size (points) of the company name
    pub font_size: f32,
    pub pages: StampPages,
    /// Page-range expression used with [`StampPages::Custom`]
    pub page_range: String,
    pub opacity: f32,
    /// Logo height (points)
    pub logo_size: f32,
    /// Signature height (points)
    pub signature_size: f32,
    pub include_logo: bool,
    pub include_signature: bool,
    pub alignment: Alignment,
    pub include_date: bool,
    pub include_filename: bool,
    #[cfg_attr(feature = "serde", serde(rename = "includeQRCode"))]
    pub include_qr_code: bool,
    pub qr_code_data: String,

    /// Distance from the page edges for preset positions (points)
    pub margin: f32,
    /// chrono format string for the date line
    pub date_format: String,
    pub calibration: Calibration,
}

impl Default for StampOptions {
    fn default() -> Self {
        Self {
            position: StampPosition::default(),
            signature_position: Some(RelativePosition::new(0.1, 0.3)),
            color: "#003399".to_string(),
            font_size: 10.0,
            pages: StampPages::First,
            page_range: String::new(),
            opacity: 1.0,
            logo_size: 40.0,
            signature_size: 30.0,
            include_logo: true,
            include_signature: true,
            alignment: Alignment::Left,
            include_date: false,
            include_filename: false,
            include_qr_code: false,
            qr_code_data: String::new(),
            margin: DEFAULT_MARGIN_PT,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            calibration: Calibration::default(),
        }
    }
}

impl StampOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| StampError::Config(format!("Failed to parse options: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| StampError::Config(format!("Failed to serialize options: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(StampError::Config(format!(
                "Opacity must be between 0 and 1, got {}",
                self.opacity
            )));
        }

        for (label, value) in [
            ("Font size", self.font_size),
            ("Logo size", self.logo_size),
            ("Signature size", self.signature_size),
        ] {
            if !(value > 0.0) {
                return Err(StampError::Config(format!(
                    "{} must be positive, got {}",
                    label, value
                )));
            }
        }

        if chrono::format::StrftimeItems::new(&self.date_format)
            .any(|item| matches!(item, chrono::format::Item::Error))
        {
            return Err(StampError::Config(format!(
                "Invalid date format '{}'",
                self.date_format
            )));
        }

        if !(self.calibration.text_signature_padding > 0.0) {
            return Err(StampError::Config(format!(
                "Text signature padding must be positive, got {}",
                self.calibration.text_signature_padding
            )));
        }
        if !self.calibration.baseline_factor.is_finite() {
            return Err(StampError::Config(format!(
                "Baseline factor must be a finite number, got {}",
                self.calibration.baseline_factor
            )));
        }

        if self.margin < 0.0 {
            return Err(StampError::Config("Margin cannot be negative".to_string()));
        }

        if let Placement::Custom(position) = self.placement() {
            if !position.is_normalized() {
                return Err(StampError::Config(
                    "Custom stamp position must be within 0..1".to_string(),
                ));
            }
        }

        if let Some(position) = self.signature_position {
            if !position.is_normalized() {
                return Err(StampError::Config(
                    "Signature position must be within 0..1".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Where the stamp block goes. A custom position with a missing
    /// coordinate uses 0 for it.
    pub fn placement(&self) -> Placement {
        match self.position.preset.corner() {
            Some(corner) => Placement::Preset {
                corner,
                margin: self.margin,
            },
            None => Placement::Custom(RelativePosition::new(
                self.position.x.unwrap_or(0.0),
                self.position.y.unwrap_or(0.0),
            )),
        }
    }

    /// Position of the independent signature in custom mode
    pub fn signature_placement(&self) -> RelativePosition {
        self.signature_position.unwrap_or_default()
    }

    pub fn page_selection(&self) -> PageSelection {
        match self.pages {
            StampPages::First => PageSelection::First,
            StampPages::Last => PageSelection::Last,
            StampPages::All => PageSelection::All,
            StampPages::Custom => PageSelection::Range(self.page_range.clone()),
        }
    }

    pub fn text_color(&self) -> Rgb {
        Rgb::from_hex(&self.color)
    }

    /// QR payload, falling back to a placeholder when none is configured
    pub fn qr_payload(&self) -> &str {
        if self.qr_code_data.trim().is_empty() {
            DEFAULT_QR_DATA
        } else {
            &self.qr_code_data
        }
    }
}

impl CompanySettings {
    /// Load settings from JSON file.
    ///
    /// Files written before signature types existed get one inferred: an
    /// image signature if one is stored, otherwise text. Either way the text
    /// signature is reset to the company name in the default font.
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| StampError::Config(format!("Failed to parse settings: {}", e)))?;
        let needs_migration = value.get("signatureType").is_none();

        let mut settings: CompanySettings = serde_json::from_value(value)
            .map_err(|e| StampError::Config(format!("Failed to parse settings: {}", e)))?;
        if needs_migration {
            settings.infer_signature_type();
        }
        Ok(settings)
    }

    /// Save settings to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| StampError::Config(format!("Failed to serialize settings: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    fn infer_signature_type(&mut self) {
        self.signature_type = if self.signature.as_deref().is_some_and(|s| !s.is_empty()) {
            SignatureType::Image
        } else {
            SignatureType::Text
        };
        self.signature_text = Some(if self.name.is_empty() {
            DEFAULT_SIGNATURE_TEXT.to_string()
        } else {
            self.name.clone()
        });
        self.signature_font = Some(DEFAULT_SIGNATURE_FONT.to_string());
    }

    /// Non-empty, trimmed address lines
    pub fn address_lines(&self) -> impl Iterator<Item = &str> {
        self.address
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}
