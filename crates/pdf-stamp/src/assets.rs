//! Loading logo, signature and font sources
//!
//! A source is either a `data:` URI carrying a base64 payload or a path on
//! the local filesystem. Signature fonts may also be a font family name.

use crate::fonts::{FontData, find_system_font, is_font_path};
use crate::options::{CompanySettings, StampOptions};
use crate::types::*;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Raw asset bytes for one stamping run. Anything missing is simply absent.
#[derive(Debug, Clone, Default)]
pub struct StampAssets {
    pub logo: Option<Vec<u8>>,
    pub signature_image: Option<Vec<u8>>,
    pub signature_font: Option<FontData>,
}

impl StampAssets {
    /// Load every source the settings and options actually need.
    ///
    /// A source that cannot be read is logged and left out, so the stamp is
    /// still produced without that element.
    pub async fn load(settings: &CompanySettings, options: &StampOptions) -> Self {
        let mut assets = StampAssets::default();

        if options.include_logo {
            assets.logo = load_optional("logo", settings.logo.as_deref()).await;
        }

        if options.include_signature {
            match settings.signature_type {
                SignatureType::Image => {
                    assets.signature_image =
                        load_optional("signature", settings.signature.as_deref()).await;
                }
                SignatureType::Text => {
                    assets.signature_font =
                        load_signature_font(settings.signature_font.as_deref()).await;
                }
            }
        }

        assets
    }
}

async fn load_optional(label: &str, source: Option<&str>) -> Option<Vec<u8>> {
    let source = source.map(str::trim).filter(|s| !s.is_empty())?;
    match load_asset(source).await {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::warn!("Skipping {}: {}", label, e);
            None
        }
    }
}

/// Resolve the signature font setting. Font files and data URIs are read
/// directly; anything else is a family name looked up among system fonts.
/// A file that cannot be read falls back to a system font.
async fn load_signature_font(source: Option<&str>) -> Option<FontData> {
    let source = source.map(str::trim).filter(|s| !s.is_empty());

    let family = match source {
        Some(source) if is_data_uri(source) || is_font_path(source) => {
            if let Some(bytes) = load_optional("signature font", Some(source)).await {
                return Some(FontData::new(bytes));
            }
            None
        }
        other => other.map(str::to_string),
    };

    let found = tokio::task::spawn_blocking(move || find_system_font(family.as_deref())).await;
    match found {
        Ok(Some(font)) => Some(font),
        Ok(None) => {
            log::warn!("Skipping signature font: no system fonts found");
            None
        }
        Err(e) => {
            log::warn!("Skipping signature font: {}", e);
            None
        }
    }
}

/// Read an asset from a data URI or a file path
pub async fn load_asset(source: &str) -> Result<Vec<u8>> {
    if is_data_uri(source) {
        return decode_data_uri(source);
    }
    tokio::fs::read(source)
        .await
        .map_err(|e| StampError::Asset(format!("Failed to read '{}': {}", source, e)))
}

pub fn is_data_uri(source: &str) -> bool {
    source
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Decode the payload of a base64 `data:` URI
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let (header, payload) = uri
        .split_once(',')
        .ok_or_else(|| StampError::Asset("Data URI has no payload".to_string()))?;

    if !header.ends_with(";base64") {
        return Err(StampError::Asset(
            "Only base64 data URIs are supported".to_string(),
        ));
    }

    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(payload)
        .map_err(|e| StampError::Asset(format!("Invalid base64 payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_data_uri() {
        let bytes = decode_data_uri("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_data_uri_errors() {
        assert!(decode_data_uri("data:image/png;base64").is_err());
        assert!(decode_data_uri("data:text/plain,hello").is_err());
        assert!(decode_data_uri("data:image/png;base64,!!!").is_err());
    }

    #[test]
    fn test_data_uri_detection() {
        assert!(is_data_uri("data:image/png;base64,AAAA"));
        assert!(is_data_uri("DATA:image/png;base64,AAAA"));
        assert!(!is_data_uri("/tmp/logo.png"));
        assert!(!is_data_uri("dat"));
    }

    #[tokio::test]
    async fn test_missing_file_is_skipped() {
        let settings = CompanySettings {
            logo: Some("/definitely/not/here.png".to_string()),
            ..Default::default()
        };
        let assets = StampAssets::load(&settings, &StampOptions::default()).await;
        assert!(assets.logo.is_none());
    }

    #[tokio::test]
    async fn test_signature_font_from_data_uri() {
        let settings = CompanySettings {
            signature_type: SignatureType::Text,
            signature_font: Some("data:font/ttf;base64,aGVsbG8=".to_string()),
            ..Default::default()
        };
        let assets = StampAssets::load(&settings, &StampOptions::default()).await;
        assert_eq!(assets.signature_font, Some(FontData::new(b"hello".to_vec())));
    }

    #[tokio::test]
    async fn test_signature_font_family_name_uses_system_fonts() {
        if find_system_font(None).is_none() {
            eprintln!("Skipping test: no system fonts installed");
            return;
        }
        let settings = CompanySettings {
            signature_type: SignatureType::Text,
            signature_text: Some("Director Name".to_string()),
            signature_font: Some("Great Vibes".to_string()),
            ..Default::default()
        };
        let assets = StampAssets::load(&settings, &StampOptions::default()).await;
        assert!(assets.signature_font.is_some_and(|font| !font.bytes.is_empty()));
    }

    #[tokio::test]
    async fn test_disabled_assets_are_not_loaded() {
        let settings = CompanySettings {
            logo: Some("data:image/png;base64,aGVsbG8=".to_string()),
            ..Default::default()
        };
        let options = StampOptions {
            include_logo: false,
            ..Default::default()
        };
        let assets = StampAssets::load(&settings, &options).await;
        assert!(assets.logo.is_none());
    }
}
