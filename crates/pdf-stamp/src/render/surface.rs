//! lopdf-backed stamp surface
//!
//! Draw calls are buffered per page and written out when the document is
//! serialized. Each stamped page gets:
//! - its existing content wrapped in `q ... Q` so leftover graphics state
//!   cannot shift the stamp
//! - one new content stream holding every primitive of this pass
//! - new, uniquely named resources (`StampIm1`, `StampF1`, `StampGs1`, ...)
//!
//! Nothing already on the page is removed, so stamping the same page twice
//! layers the second stamp on top of the first.

use super::xobject::{add_image_xobject, decode_image};
use super::ops::{image_ops, text_ops};
use crate::constants::{DEFAULT_PAGE_HEIGHT_PT, DEFAULT_PAGE_WIDTH_PT, MAX_PAGE_TREE_DEPTH};
use crate::layout::{ImageHandle, PageGeometry};
use crate::metrics::{base_font_name, encode_win_ansi, text_width};
use crate::surface::{ImageDraw, StampSurface, TextDraw};
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::{BTreeMap, HashMap};

const XOBJECT: &[u8] = b"XObject";
const FONT: &[u8] = b"Font";
const EXT_G_STATE: &[u8] = b"ExtGState";

/// A resource a pending page needs in its `/Resources` dictionary
struct PendingResource {
    category: &'static [u8],
    name: String,
    id: ObjectId,
}

/// Buffered output for one page
#[derive(Default)]
struct PendingPage {
    content: Vec<u8>,
    resources: Vec<PendingResource>,
}

impl PendingPage {
    fn name_for(&self, category: &[u8], id: ObjectId) -> Option<&str> {
        self.resources
            .iter()
            .find(|r| r.category == category && r.id == id)
            .map(|r| r.name.as_str())
    }

    fn has_name(&self, category: &[u8], name: &str) -> bool {
        self.resources
            .iter()
            .any(|r| r.category == category && r.name == name)
    }
}

/// A loaded PDF document that stamps can be drawn onto
pub struct PdfSurface {
    doc: Document,
    page_ids: Vec<ObjectId>,
    images: Vec<ObjectId>,
    fonts: HashMap<FontWeight, ObjectId>,
    graphics_states: HashMap<u32, ObjectId>,
    pending: BTreeMap<usize, PendingPage>,
}

impl PdfSurface {
    /// Parse a PDF from memory
    pub fn load(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(Document::load_mem(bytes)?))
    }

    pub fn new(doc: Document) -> Self {
        let page_ids = doc.get_pages().into_values().collect();
        Self {
            doc,
            page_ids,
            images: Vec::new(),
            fonts: HashMap::new(),
            graphics_states: HashMap::new(),
            pending: BTreeMap::new(),
        }
    }

    /// Finish drawing and hand back the underlying document
    pub fn into_document(mut self) -> Result<Document> {
        self.flush()?;
        Ok(self.doc)
    }

    fn page_id(&self, page_index: usize) -> Result<ObjectId> {
        self.page_ids
            .get(page_index)
            .copied()
            .ok_or(StampError::PageOutOfRange(page_index))
    }

    // =========================================================================
    // Page attributes
    // =========================================================================

    /// Look up a page attribute, walking up the page tree for inherited ones
    fn inherited_attribute(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut current = page_id;
        for _ in 0..MAX_PAGE_TREE_DEPTH {
            let dict = self.doc.get_dictionary(current).ok()?;
            if let Ok(value) = dict.get(key) {
                return Some(value);
            }
            match dict.get(b"Parent") {
                Ok(Object::Reference(parent)) => current = *parent,
                _ => return None,
            }
        }
        None
    }

    /// Follow indirect references to the object they point at
    fn resolve<'a>(&'a self, obj: &'a Object) -> Result<&'a Object> {
        let mut current = obj;
        for _ in 0..MAX_PAGE_TREE_DEPTH {
            match current {
                Object::Reference(id) => current = self.doc.get_object(*id)?,
                _ => break,
            }
        }
        Ok(current)
    }

    /// Normalized MediaBox as `(llx, lly, urx, ury)`
    fn media_box(&self, page_id: ObjectId) -> Result<(f32, f32, f32, f32)> {
        let default = (0.0, 0.0, DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);
        let Some(obj) = self.inherited_attribute(page_id, b"MediaBox") else {
            return Ok(default);
        };
        let values = self.resolve(obj)?.as_array()?;
        if values.len() != 4 {
            log::warn!("Malformed MediaBox on page {:?}, assuming US Letter", page_id);
            return Ok(default);
        }

        let mut coords = [0.0_f32; 4];
        for (slot, value) in coords.iter_mut().zip(values) {
            match extract_number(self.resolve(value)?) {
                Some(n) => *slot = n,
                None => return Ok(default),
            }
        }
        let [x0, y0, x1, y1] = coords;
        Ok((x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)))
    }

    fn rotation(&self, page_id: ObjectId) -> PageRotation {
        let degrees = self
            .inherited_attribute(page_id, b"Rotate")
            .and_then(|obj| self.resolve(obj).ok())
            .and_then(|obj| obj.as_i64().ok())
            .unwrap_or(0);
        PageRotation::from_degrees(degrees).unwrap_or_else(|| {
            log::warn!("Ignoring /Rotate {} on page {:?}", degrees, page_id);
            PageRotation::None
        })
    }

    fn origin(&self, page_id: ObjectId) -> Result<(f32, f32)> {
        let (llx, lly, _, _) = self.media_box(page_id)?;
        Ok((llx, lly))
    }

    // =========================================================================
    // Shared resources
    // =========================================================================

    fn font(&mut self, weight: FontWeight) -> ObjectId {
        let doc = &mut self.doc;
        *self.fonts.entry(weight).or_insert_with(|| {
            let mut font_dict = Dictionary::new();
            font_dict.set("Type", Object::Name(b"Font".to_vec()));
            font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
            font_dict.set(
                "BaseFont",
                Object::Name(base_font_name(weight).as_bytes().to_vec()),
            );
            font_dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
            doc.add_object(font_dict)
        })
    }

    fn graphics_state(&mut self, opacity: f32) -> ObjectId {
        let opacity = opacity.clamp(0.0, 1.0);
        let doc = &mut self.doc;
        *self
            .graphics_states
            .entry(opacity.to_bits())
            .or_insert_with(|| {
                let mut gs = Dictionary::new();
                gs.set("Type", Object::Name(b"ExtGState".to_vec()));
                gs.set("ca", Object::Real(opacity));
                gs.set("CA", Object::Real(opacity));
                doc.add_object(gs)
            })
    }

    /// Names already used in one category of the page's resources
    fn existing_resource_names(&self, page_id: ObjectId, category: &[u8]) -> Result<Vec<Vec<u8>>> {
        let Some(resources) = self.inherited_attribute(page_id, b"Resources") else {
            return Ok(Vec::new());
        };
        let resources = self.resolve(resources)?.as_dict()?;
        let Ok(entries) = resources.get(category) else {
            return Ok(Vec::new());
        };
        let entries = self.resolve(entries)?.as_dict()?;
        Ok(entries.iter().map(|(name, _)| name.clone()).collect())
    }

    /// Name under which `id` is referenced from the page's content stream.
    /// New names never collide with resources the page already has.
    fn resource_name(
        &mut self,
        page_index: usize,
        category: &'static [u8],
        prefix: &str,
        id: ObjectId,
    ) -> Result<String> {
        let pending = self.pending.entry(page_index).or_default();
        if let Some(name) = pending.name_for(category, id) {
            return Ok(name.to_string());
        }

        let page_id = self.page_id(page_index)?;
        let existing = self.existing_resource_names(page_id, category)?;
        let pending = self.pending.entry(page_index).or_default();

        let mut counter = 1;
        let name = loop {
            let candidate = format!("{}{}", prefix, counter);
            let taken = existing.iter().any(|n| n == candidate.as_bytes())
                || pending.has_name(category, &candidate);
            if !taken {
                break candidate;
            }
            counter += 1;
        };

        pending.resources.push(PendingResource {
            category,
            name: name.clone(),
            id,
        });
        Ok(name)
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Write buffered content streams and resources into the page objects
    fn flush(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending);
        for (page_index, page) in pending {
            if page.content.is_empty() {
                continue;
            }
            let page_id = self.page_id(page_index)?;
            let resources = self.merged_resources(page_id, &page.resources)?;
            let contents = self.wrapped_contents(page_id, page.content)?;

            let page_dict = self.doc.get_dictionary_mut(page_id)?;
            page_dict.set("Resources", Object::Dictionary(resources));
            page_dict.set("Contents", Object::Array(contents));
            log::debug!("Flushed stamp content for page {}", page_index + 1);
        }
        Ok(())
    }

    /// The page's effective resources with the pending entries added.
    /// Inherited and indirect dictionaries are copied inline into the page.
    fn merged_resources(&self, page_id: ObjectId, additions: &[PendingResource]) -> Result<Dictionary> {
        let mut resources = match self.inherited_attribute(page_id, b"Resources") {
            Some(obj) => self.resolve(obj)?.as_dict()?.clone(),
            None => Dictionary::new(),
        };

        for category in [XOBJECT, FONT, EXT_G_STATE] {
            let mut entries = additions.iter().filter(|r| r.category == category).peekable();
            if entries.peek().is_none() {
                continue;
            }
            let mut sub = match resources.get(category) {
                Ok(obj) => self.resolve(obj)?.as_dict()?.clone(),
                Err(_) => Dictionary::new(),
            };
            for entry in entries {
                sub.set(entry.name.as_bytes().to_vec(), Object::Reference(entry.id));
            }
            resources.set(category.to_vec(), Object::Dictionary(sub));
        }

        Ok(resources)
    }

    /// New `/Contents` array: `q`, the original streams, then `Q` plus the stamp
    fn wrapped_contents(&mut self, page_id: ObjectId, stamp: Vec<u8>) -> Result<Vec<Object>> {
        let existing: Vec<Object> = match self.doc.get_dictionary(page_id)?.get(b"Contents") {
            Ok(Object::Array(items)) => items.clone(),
            Ok(Object::Reference(id)) => match self.doc.get_object(*id)? {
                Object::Array(items) => items.clone(),
                _ => vec![Object::Reference(*id)],
            },
            _ => Vec::new(),
        };

        let mut contents = Vec::with_capacity(existing.len() + 2);
        let stamp = if existing.is_empty() {
            stamp
        } else {
            let open_id = self
                .doc
                .add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
            contents.push(Object::Reference(open_id));
            contents.extend(existing);

            let mut closed = b"\nQ\n".to_vec();
            closed.extend(stamp);
            closed
        };

        let stamp_id = self.doc.add_object(Stream::new(Dictionary::new(), stamp));
        contents.push(Object::Reference(stamp_id));
        Ok(contents)
    }
}

impl StampSurface for PdfSurface {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page_geometry(&self, page_index: usize) -> Result<PageGeometry> {
        let page_id = self.page_id(page_index)?;
        let (llx, lly, urx, ury) = self.media_box(page_id)?;
        Ok(PageGeometry::new(urx - llx, ury - lly, self.rotation(page_id)))
    }

    fn embed_image(&mut self, bytes: &[u8]) -> Result<ImageHandle> {
        let decoded = decode_image(bytes)?;
        let object_id = add_image_xobject(&mut self.doc, &decoded)?;
        self.images.push(object_id);
        Ok(ImageHandle {
            id: self.images.len() - 1,
            width: decoded.width,
            height: decoded.height,
        })
    }

    fn text_width(&self, text: &str, weight: FontWeight, font_size: f32) -> f32 {
        text_width(text, weight, font_size)
    }

    fn draw_image(&mut self, page_index: usize, image: &ImageHandle, draw: ImageDraw) -> Result<()> {
        let xobject_id = *self
            .images
            .get(image.id)
            .ok_or_else(|| StampError::Asset(format!("Unknown image handle {}", image.id)))?;
        let origin = self.origin(self.page_id(page_index)?)?;
        let gs_id = self.graphics_state(draw.opacity);

        let image_name = self.resource_name(page_index, XOBJECT, "StampIm", xobject_id)?;
        let gs_name = self.resource_name(page_index, EXT_G_STATE, "StampGs", gs_id)?;

        let ops = image_ops(&image_name, &gs_name, &draw.anchor, origin, draw.width, draw.height);
        self.pending.entry(page_index).or_default().content.extend(ops);
        Ok(())
    }

    fn draw_text(&mut self, page_index: usize, draw: TextDraw<'_>) -> Result<()> {
        let origin = self.origin(self.page_id(page_index)?)?;
        let font_id = self.font(draw.weight);
        let gs_id = self.graphics_state(draw.opacity);

        let font_name = self.resource_name(page_index, FONT, "StampF", font_id)?;
        let gs_name = self.resource_name(page_index, EXT_G_STATE, "StampGs", gs_id)?;

        let ops = text_ops(
            &font_name,
            &gs_name,
            &encode_win_ansi(draw.text),
            draw.font_size,
            &draw.anchor,
            origin,
            draw.color,
        );
        self.pending.entry(page_index).or_default().content.extend(ops);
        Ok(())
    }

    fn serialize(&mut self) -> Result<Vec<u8>> {
        self.flush()?;
        let mut writer = Vec::new();
        self.doc.save_to(&mut writer)?;
        Ok(writer)
    }
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
