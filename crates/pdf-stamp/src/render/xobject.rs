//! Image XObject creation for stamping
//!
//! Decodes an encoded bitmap with the `image` crate and stores it as a
//! Flate-compressed DeviceRGB image. Transparency is kept as a separate
//! DeviceGray soft mask.

use crate::types::Result;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;

/// Raw pixel planes of a decoded bitmap
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
    /// Alpha plane, present only when some pixel is not fully opaque
    pub alpha: Option<Vec<u8>>,
}

/// Decode PNG, JPEG or any other format the `image` crate understands
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixel_count = (width as usize) * (height as usize);
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }

    let translucent = alpha.iter().any(|&a| a < u8::MAX);
    Ok(DecodedImage {
        width,
        height,
        rgb,
        alpha: translucent.then_some(alpha),
    })
}

/// Add an image XObject (and its soft mask) to `doc`
pub fn add_image_xobject(doc: &mut Document, image: &DecodedImage) -> Result<ObjectId> {
    let smask_id = match &image.alpha {
        Some(alpha) => {
            let dict = image_dictionary(image.width, image.height, "DeviceGray");
            Some(doc.add_object(Stream::new(dict, deflate(alpha)?)))
        }
        None => None,
    };

    let mut dict = image_dictionary(image.width, image.height, "DeviceRGB");
    if let Some(id) = smask_id {
        dict.set("SMask", Object::Reference(id));
    }
    Ok(doc.add_object(Stream::new(dict, deflate(&image.rgb)?)))
}

fn image_dictionary(width: u32, height: u32, color_space: &str) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(i64::from(width)));
    dict.set("Height", Object::Integer(i64::from(height)));
    dict.set("ColorSpace", Object::Name(color_space.as_bytes().to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
    dict
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
