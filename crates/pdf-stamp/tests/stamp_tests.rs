use lopdf::{Dictionary, Document, Object, Stream};
use pdf_stamp::*;
use std::io::Cursor;

/// Build a document of `num_pages` US Letter pages. `rotate` goes on the page
/// tree root so every page inherits it along with the MediaBox.
fn create_test_pdf(num_pages: usize, rotate: Option<i64>) -> Document {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"0 0 m 10 10 l S".to_vec()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let mut pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        ),
    ]);
    if let Some(degrees) = rotate {
        pages_dict.set("Rotate", Object::Integer(degrees));
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}

fn to_bytes(mut doc: Document) -> Vec<u8> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    writer
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image::DynamicImage::new_rgba8(width, height)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

fn page_content(bytes: &[u8], page_index: usize) -> String {
    let doc = Document::load_mem(bytes).unwrap();
    let page_id = doc.get_pages().into_values().nth(page_index).unwrap();
    String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
}

fn settings() -> CompanySettings {
    CompanySettings {
        name: "Acme Corp".to_string(),
        reg_no: "202401001234".to_string(),
        address: "1 Main Street\nSpringfield".to_string(),
        phone: "+1 555 0100".to_string(),
        ..Default::default()
    }
}

fn stamper(options: StampOptions, assets: StampAssets) -> Stamper {
    Stamper::new(settings(), options, StampResources::new(assets)).unwrap()
}

#[tokio::test]
async fn test_load_and_save_pdf() {
    use tempfile::NamedTempFile;

    let temp = NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), to_bytes(create_test_pdf(3, None))).unwrap();

    let surface = load_pdf(temp.path()).await.unwrap();
    assert_eq!(surface.page_count(), 3);

    let stamped = stamper(StampOptions::default(), StampAssets::default())
        .stamp_pdf(surface, Some("in.pdf".to_string()))
        .await
        .unwrap();

    let out = NamedTempFile::new().unwrap();
    save_pdf(stamped, out.path()).await.unwrap();

    let bytes = std::fs::read(out.path()).unwrap();
    assert!(page_content(&bytes, 0).contains("(Acme Corp) Tj"));
    assert!(!page_content(&bytes, 1).contains("Tj"));
}

#[tokio::test]
async fn test_stamp_file_uses_input_name() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("invoice-42.pdf");
    let output = dir.path().join("out.pdf");
    std::fs::write(&input, to_bytes(create_test_pdf(2, None))).unwrap();

    let options = StampOptions {
        include_filename: true,
        pages: StampPages::All,
        ..Default::default()
    };
    let pages = stamper(options, StampAssets::default())
        .stamp_file(&input, &output)
        .await
        .unwrap();
    assert_eq!(pages, vec![0, 1]);

    let bytes = std::fs::read(&output).unwrap();
    assert!(page_content(&bytes, 1).contains("(invoice-42.pdf) Tj"));
}

#[tokio::test]
async fn test_stamp_file_reports_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let result = stamper(StampOptions::default(), StampAssets::default())
        .stamp_file(dir.path().join("missing.pdf"), dir.path().join("out.pdf"))
        .await;
    assert!(matches!(result, Err(StampError::Io(_))));
    assert!(!dir.path().join("out.pdf").exists());
}

#[tokio::test]
async fn test_family_name_signature_font_is_drawn() {
    if find_system_font(None).is_none() {
        eprintln!("Skipping test: no system fonts installed");
        return;
    }

    let temp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(
        temp.path(),
        r#"{
            "name": "Acme Corp",
            "regNo": "202401001234",
            "address": "1 Main Street",
            "phone": "+1 555 0100",
            "signatureType": "text",
            "signatureText": "Director Name",
            "signatureFont": "Great Vibes"
        }"#,
    )
    .unwrap();
    let settings = CompanySettings::load(temp.path()).await.unwrap();
    let s = Stamper::load(settings, StampOptions::default()).await.unwrap();

    let mut surface = PdfSurface::new(create_test_pdf(1, None));
    let layouts = s.plan(&mut surface, &StampContext::new(None)).unwrap();
    let roles: Vec<_> = layouts[0].items.iter().filter_map(|item| item.element.role()).collect();
    assert_eq!(roles, vec![ImageRole::Signature]);

    // Drawn at twice the signature size
    let signature = &layouts[0].items[0];
    assert!((signature.element.height() - 60.0).abs() < 1e-3);
}

#[test]
fn test_stamp_keeps_existing_content() {
    let bytes = to_bytes(create_test_pdf(1, None));
    let out = stamper(StampOptions::default(), StampAssets::default())
        .stamp_bytes(&bytes, &StampContext::new(None))
        .unwrap();

    let content = page_content(&out, 0);
    assert!(content.contains("0 0 m 10 10 l S"));
    assert!(content.contains("(Acme Corp) Tj"));
    assert!(content.contains("(Springfield) Tj"));
    // Existing content is wrapped so the stamp starts from a clean state
    let original = content.find("0 0 m").unwrap();
    let stamp = content.find("BT").unwrap();
    assert!(content[original..stamp].contains('Q'));
}

#[test]
fn test_page_selection() {
    let bytes = to_bytes(create_test_pdf(5, None));
    let options = StampOptions {
        pages: StampPages::Custom,
        page_range: "2, 4-".to_string(),
        ..Default::default()
    };
    let out = stamper(options, StampAssets::default())
        .stamp_bytes(&bytes, &StampContext::new(None))
        .unwrap();

    let stamped: Vec<bool> = (0..5)
        .map(|i| page_content(&out, i).contains("(Acme Corp) Tj"))
        .collect();
    assert_eq!(stamped, vec![false, true, false, true, true]);
}

#[test]
fn test_last_page_only() {
    let bytes = to_bytes(create_test_pdf(3, None));
    let options = StampOptions {
        pages: StampPages::Last,
        ..Default::default()
    };
    let out = stamper(options, StampAssets::default())
        .stamp_bytes(&bytes, &StampContext::new(None))
        .unwrap();
    assert!(!page_content(&out, 0).contains("Tj"));
    assert!(page_content(&out, 2).contains("(Acme Corp) Tj"));
}

#[test]
fn test_empty_document_is_an_error() {
    let bytes = to_bytes(create_test_pdf(0, None));
    let result = stamper(StampOptions::default(), StampAssets::default())
        .stamp_bytes(&bytes, &StampContext::new(None));
    assert!(matches!(result, Err(StampError::NoPages)));
}

#[test]
fn test_invalid_options_are_rejected() {
    let options = StampOptions {
        opacity: 1.5,
        ..Default::default()
    };
    let result = Stamper::new(settings(), options, StampResources::default());
    assert!(matches!(result, Err(StampError::Config(_))));
}

#[test]
fn test_plan_on_rotated_page() {
    let mut surface = PdfSurface::new(create_test_pdf(1, Some(90)));
    let layouts = stamper(StampOptions::default(), StampAssets::default())
        .plan(&mut surface, &StampContext::new(None))
        .unwrap();

    assert_eq!(layouts.len(), 1);
    let layout = &layouts[0];
    assert_eq!(layout.geometry.rotation, PageRotation::Clockwise90);
    assert_eq!(layout.geometry.visual_width(), 792.0);

    // Bottom-left of the visual page, which is 612pt tall
    assert_eq!(layout.block_origin.x, 36.0);
    assert!((layout.block_origin.y - (612.0 - 36.0 - layout.block_height)).abs() < 1e-3);

    for item in &layout.items {
        assert_eq!(item.anchor.rotation_degrees, 90);
        let back = map_native_to_visual(&item.anchor, item.element.height(), &layout.geometry);
        assert!((back.x - item.visual.x).abs() < 1e-3);
        assert!((back.y - item.visual.y).abs() < 1e-3);
    }
}

#[test]
fn test_rotated_text_matrix() {
    let bytes = to_bytes(create_test_pdf(1, Some(-90)));
    let out = stamper(StampOptions::default(), StampAssets::default())
        .stamp_bytes(&bytes, &StampContext::new(None))
        .unwrap();
    // -90 is treated as 270: text runs downwards in native space
    assert!(page_content(&out, 0).contains("0 -1 1 0 "));
}

#[test]
fn test_restamp_keeps_first_stamp() {
    let bytes = to_bytes(create_test_pdf(1, None));
    let with_logo = stamper(
        StampOptions::default(),
        StampAssets {
            logo: Some(png(80, 40)),
            ..Default::default()
        },
    );
    let first = with_logo.stamp_bytes(&bytes, &StampContext::new(None)).unwrap();
    assert!(page_content(&first, 0).contains("/StampIm1 Do"));

    let without_logo = stamper(
        StampOptions {
            include_logo: false,
            include_date: true,
            ..Default::default()
        },
        StampAssets::default(),
    );
    let second = without_logo
        .stamp_bytes(&first, &StampContext::new(None))
        .unwrap();

    let content = page_content(&second, 0);
    assert!(content.contains("/StampIm1 Do"));
    assert_eq!(content.matches("(Acme Corp) Tj").count(), 2);
}

#[test]
fn test_restamp_uses_fresh_resource_names() {
    let bytes = to_bytes(create_test_pdf(1, None));
    let s = stamper(
        StampOptions::default(),
        StampAssets {
            logo: Some(png(80, 40)),
            ..Default::default()
        },
    );
    let first = s.stamp_bytes(&bytes, &StampContext::new(None)).unwrap();
    let second = s.stamp_bytes(&first, &StampContext::new(None)).unwrap();

    let content = page_content(&second, 0);
    assert!(content.contains("/StampIm1 Do"));
    assert!(content.contains("/StampIm2 Do"));
}

#[test]
fn test_corrupt_logo_does_not_block_the_rest() {
    let bytes = to_bytes(create_test_pdf(1, None));
    let settings = CompanySettings {
        signature_type: SignatureType::Image,
        ..settings()
    };
    let options = StampOptions {
        include_qr_code: true,
        ..Default::default()
    };
    let assets = StampAssets {
        logo: Some(b"not a png".to_vec()),
        signature_image: Some(png(120, 40)),
        ..Default::default()
    };
    let s = Stamper::new(settings, options, StampResources::new(assets)).unwrap();

    let mut surface = PdfSurface::load(&bytes).unwrap();
    let layouts = s.plan(&mut surface, &StampContext::new(None)).unwrap();
    let roles: Vec<_> = layouts[0]
        .items
        .iter()
        .filter_map(|item| item.element.role())
        .collect();
    assert_eq!(roles, vec![ImageRole::Signature, ImageRole::QrCode]);

    let out = s.stamp_bytes(&bytes, &StampContext::new(None)).unwrap();
    let content = page_content(&out, 0);
    assert_eq!(content.matches(" Do Q").count(), 2);
    assert!(content.contains("(Acme Corp) Tj"));
}

#[test]
fn test_custom_signature_is_drawn_separately() {
    let bytes = to_bytes(create_test_pdf(1, None));
    let settings = CompanySettings {
        signature_type: SignatureType::Image,
        ..settings()
    };
    let options = StampOptions {
        position: StampPosition {
            preset: PositionPreset::Custom,
            x: Some(0.5),
            y: Some(0.5),
        },
        signature_position: Some(RelativePosition::new(0.1, 0.1)),
        ..Default::default()
    };
    let assets = StampAssets {
        signature_image: Some(png(120, 40)),
        ..Default::default()
    };
    let s = Stamper::new(settings, options, StampResources::new(assets)).unwrap();

    let mut surface = PdfSurface::load(&bytes).unwrap();
    let layouts = s.plan(&mut surface, &StampContext::new(None)).unwrap();
    let layout = &layouts[0];

    assert_eq!(layout.block_origin, VisualPoint::new(306.0, 396.0));
    let signature = layout.items.iter().find(|item| item.detached).unwrap();
    assert!((signature.visual.x - 61.2).abs() < 1e-3);
    assert!((signature.visual.y - 79.2).abs() < 1e-3);
    assert_eq!(signature.element.height(), 30.0);
    assert!(layout.items.iter().filter(|item| !item.detached).all(|item| item.element.is_text()));
}

#[test]
fn test_opacity_and_color_reach_the_page() {
    let bytes = to_bytes(create_test_pdf(1, None));
    let options = StampOptions {
        opacity: 0.5,
        color: "#ff0000".to_string(),
        ..Default::default()
    };
    let out = stamper(options, StampAssets::default())
        .stamp_bytes(&bytes, &StampContext::new(None))
        .unwrap();

    assert!(page_content(&out, 0).contains("1 0 0 rg"));

    let doc = Document::load_mem(&out).unwrap();
    let has_half_opacity = doc.objects.values().any(|obj| match obj {
        Object::Dictionary(dict) => matches!(dict.get(b"ca"), Ok(Object::Real(v)) if (*v - 0.5).abs() < 1e-6),
        _ => false,
    });
    assert!(has_half_opacity);
}

#[tokio::test]
async fn test_batch_isolates_failures() {
    let good = to_bytes(create_test_pdf(2, None));
    let options = StampOptions {
        include_filename: true,
        ..Default::default()
    };
    let s = stamper(options, StampAssets::default());

    let outcomes = s
        .stamp_batch(vec![
            BatchInput {
                name: "first.pdf".to_string(),
                bytes: good.clone(),
            },
            BatchInput {
                name: "broken.pdf".to_string(),
                bytes: b"%PDF-1.7 garbage".to_vec(),
            },
            BatchInput {
                name: "third.pdf".to_string(),
                bytes: good,
            },
        ])
        .await;

    let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["first.pdf", "broken.pdf", "third.pdf"]);

    assert!(outcomes[1].result.is_err());
    let third = outcomes[2].result.as_ref().unwrap();
    assert!(page_content(third, 0).contains("(third.pdf) Tj"));
    assert!(outcomes[0].result.is_ok());
}
