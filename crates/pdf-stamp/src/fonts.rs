//! Finding a font for text signatures
//!
//! Settings name the signature font either by family ("Great Vibes") or by
//! a font file. Family names are looked up among the installed system fonts,
//! falling back to a generic cursive face and then to anything usable.

use fontdb::{Database, Family, Query};

/// Font program bytes and the face index inside them (non-zero for collections)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontData {
    pub bytes: Vec<u8>,
    pub index: u32,
}

impl FontData {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, index: 0 }
    }
}

/// Whether a signature font setting refers to a file rather than a family name
pub fn is_font_path(source: &str) -> bool {
    if source.contains(['/', '\\']) {
        return true;
    }
    std::path::Path::new(source)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ["ttf", "otf", "ttc", "otc"]
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Look up `family` among the system fonts.
///
/// When it is not installed, the generic cursive, sans-serif and serif
/// families are tried in turn, then the first installed face. Returns `None`
/// only when no fonts are installed at all. Scans the system font
/// directories, so call it off the async runtime.
pub fn find_system_font(family: Option<&str>) -> Option<FontData> {
    let mut db = Database::new();
    db.load_system_fonts();
    find_font(&db, family)
}

fn find_font(db: &Database, family: Option<&str>) -> Option<FontData> {
    let mut families = Vec::with_capacity(4);
    if let Some(name) = family {
        families.push(Family::Name(name));
    }
    families.extend([Family::Cursive, Family::SansSerif, Family::Serif]);

    let id = db
        .query(&Query {
            families: &families,
            ..Query::default()
        })
        .or_else(|| db.faces().next().map(|face| face.id))?;

    if let (Some(wanted), Some(face)) = (family, db.face(id)) {
        let found = face.families.first().map(|(name, _)| name.as_str());
        if found != Some(wanted) {
            log::warn!(
                "Font family '{}' is not installed, using '{}'",
                wanted,
                found.unwrap_or(face.post_script_name.as_str())
            );
        }
    }

    db.with_face_data(id, |data, index| FontData {
        bytes: data.to_vec(),
        index,
    })
}
