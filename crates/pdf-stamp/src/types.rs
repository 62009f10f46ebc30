use thiserror::Error;

#[derive(Error, Debug)]
pub enum StampError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Asset error: {0}")]
    Asset(String),
    #[error("QR code error: {0}")]
    Qr(String),
    #[error("Text rasterization error: {0}")]
    Raster(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Document has no pages")]
    NoPages,
    #[error("Page index {0} is out of range")]
    PageOutOfRange(usize),
}

pub type Result<T> = std::result::Result<T, StampError>;

/// Page rotation as stored in the page's `/Rotate` entry.
///
/// A viewer turns the page clockwise by this amount before display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageRotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl PageRotation {
    pub fn degrees(self) -> i32 {
        match self {
            PageRotation::None => 0,
            PageRotation::Clockwise90 => 90,
            PageRotation::Clockwise180 => 180,
            PageRotation::Clockwise270 => 270,
        }
    }

    /// Normalize a raw `/Rotate` value. Negative values wrap (`-90` is `270`).
    /// Returns `None` for angles that are not a multiple of 90.
    pub fn from_degrees(degrees: i64) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(PageRotation::None),
            90 => Some(PageRotation::Clockwise90),
            180 => Some(PageRotation::Clockwise180),
            270 => Some(PageRotation::Clockwise270),
            _ => None,
        }
    }

    /// True when the visual page is the native page turned on its side
    pub fn is_sideways(self) -> bool {
        matches!(
            self,
            PageRotation::Clockwise90 | PageRotation::Clockwise270
        )
    }
}

/// Weight of a stamped text line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Horizontal alignment of every element inside the stamp block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Offset of an item of `item_width` inside a block of `block_width`
    pub fn offset(self, block_width: f32, item_width: f32) -> f32 {
        match self {
            Alignment::Left => 0.0,
            Alignment::Center => (block_width - item_width) / 2.0,
            Alignment::Right => block_width - item_width,
        }
    }
}

/// Page corner used by preset placements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub fn is_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    pub fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

/// Stored position choice, as persisted in the options file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PositionPreset {
    #[default]
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
    Custom,
}

impl PositionPreset {
    /// The page corner for preset positions, `None` for custom
    pub fn corner(self) -> Option<Corner> {
        match self {
            PositionPreset::BottomLeft => Some(Corner::BottomLeft),
            PositionPreset::BottomRight => Some(Corner::BottomRight),
            PositionPreset::TopLeft => Some(Corner::TopLeft),
            PositionPreset::TopRight => Some(Corner::TopRight),
            PositionPreset::Custom => None,
        }
    }
}

/// A point expressed as fractions of the visual page size.
///
/// Both coordinates are in `[0, 1]`, measured from the visual top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelativePosition {
    pub x: f32,
    pub y: f32,
}

impl RelativePosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Convert a dragged item's top-left pixel position inside a preview
    /// container into fractions. The item is kept fully inside the container.
    pub fn from_drag(
        left: f32,
        top: f32,
        item_width: f32,
        item_height: f32,
        container_width: f32,
        container_height: f32,
    ) -> Self {
        if container_width <= 0.0 || container_height <= 0.0 {
            return Self::default();
        }
        let max_left = (container_width - item_width).max(0.0);
        let max_top = (container_height - item_height).max(0.0);
        Self {
            x: left.clamp(0.0, max_left) / container_width,
            y: top.clamp(0.0, max_top) / container_height,
        }
    }

    pub fn is_normalized(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// Where the stamp block goes on each page
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Fixed page corner plus margin (points)
    Preset { corner: Corner, margin: f32 },
    /// User-chosen fraction of the visual page
    Custom(RelativePosition),
}

impl Placement {
    pub fn is_custom(&self) -> bool {
        matches!(self, Placement::Custom(_))
    }
}

/// Which pages of a document receive the stamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSelection {
    First,
    Last,
    All,
    /// 1-based page-range expression such as `"1-3,5,8-"`
    Range(String),
}

/// Stored page-selection mode, as persisted in the options file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum StampPages {
    #[default]
    First,
    Last,
    All,
    Custom,
}

/// How the signature is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SignatureType {
    Image,
    #[default]
    Text,
}

/// RGB color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Parse `#rrggbb` (leading `#` optional). Anything else is black.
    pub fn from_hex(hex: &str) -> Self {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Self::BLACK;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .ok()
                .map(|v| f32::from(v) / 255.0)
        };
        match (channel(0..2), channel(2..4), channel(4..6)) {
            (Some(r), Some(g), Some(b)) => Self { r, g, b },
            _ => Self::BLACK,
        }
    }

    /// 8-bit RGBA with full alpha
    pub fn to_rgba8(self) -> [u8; 4] {
        let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), 255]
    }
}

/// Per-document outcome of a batch run
#[derive(Debug)]
pub struct BatchOutcome {
    /// Name of the input as supplied by the caller
    pub name: String,
    /// Serialized stamped document, or the error that stopped it
    pub result: Result<Vec<u8>>,
}
