//! PDF assembly.
//!
//! The bitmap is embedded once as an RGB image XObject. Each page references
//! it and draws it at full page width, translated by the page's offset; the
//! MediaBox clips everything outside the page.

use image::RgbImage;
use lopdf::{
    Document, Object, Stream,
    content::{Content, Operation},
    dictionary,
};

use super::ExportError;
use super::pagination::PagePlacement;
use super::params::{PageGeometry, mm_to_pt};

const IMAGE_NAME: &str = "Im0";

/// Build a PDF with one page per placement.
pub fn assemble(
    bitmap: &RgbImage,
    image_height_mm: f64,
    placements: &[PagePlacement],
    page: PageGeometry,
    title: &str,
) -> Result<Vec<u8>, ExportError> {
    if bitmap.width() == 0 || bitmap.height() == 0 {
        return Err(ExportError::EmptyDocument);
    }

    let mut doc = Document::with_version("1.4");
    let id_pages = doc.new_object_id();

    let id_image = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => bitmap.width() as i64,
            "Height" => bitmap.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        bitmap.as_raw().clone(),
    ));

    let id_resources = doc.add_object(dictionary! {
        "XObject" => dictionary! {
            IMAGE_NAME => id_image,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(placements.len());
    for placement in placements {
        let content = Content {
            operations: page_operations(placement, image_height_mm, page),
        };
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let id_content = doc.add_object(Stream::new(dictionary! {}, encoded));
        let id_page = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => id_pages,
            "Contents" => id_content,
            "Resources" => id_resources,
        });
        kids.push(id_page.into());
    }

    let pdf_pages = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            (page.width_pt() as f32).into(),
            (page.height_pt() as f32).into(),
        ],
    };
    doc.set_object(id_pages, pdf_pages);

    let id_catalog = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => id_pages,
    });
    doc.trailer.set("Root", id_catalog);

    let id_info = doc.add_object(dictionary! {
        "Title" => Object::string_literal(title),
        "Creator" => Object::string_literal(concat!("cvpress ", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => Object::string_literal(
            chrono::Utc::now().format("D:%Y%m%d%H%M%SZ").to_string()
        ),
    });
    doc.trailer.set("Info", id_info);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(buffer)
}

/// `q  w 0 0 h x y cm  /Im0 Do  Q` with PDF's bottom-left origin.
fn page_operations(
    placement: &PagePlacement,
    image_height_mm: f64,
    page: PageGeometry,
) -> Vec<Operation> {
    let width = page.width_pt() as f32;
    let height = mm_to_pt(image_height_mm) as f32;
    let y = mm_to_pt(page.height_mm - (placement.offset_mm + image_height_mm)) as f32;
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                width.into(),
                0.into(),
                0.into(),
                height.into(),
                0.into(),
                y.into(),
            ],
        ),
        Operation::new("Do", vec![IMAGE_NAME.into()]),
        Operation::new("Q", vec![]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::pagination::{PageBreakRule, paginate};

    fn bitmap(height: u32) -> RgbImage {
        RgbImage::from_pixel(21, height, image::Rgb([200, 10, 10]))
    }

    #[test]
    fn one_page_per_placement() {
        let placements = paginate(594.0, 297.0, PageBreakRule::Inclusive);
        let bytes = assemble(&bitmap(59), 594.0, &placements, PageGeometry::A4, "Jane").unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn exclusive_rule_drops_trailing_page() {
        let placements = paginate(594.0, 297.0, PageBreakRule::Exclusive);
        let bytes = assemble(&bitmap(59), 594.0, &placements, PageGeometry::A4, "Jane").unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn empty_bitmap_is_rejected() {
        let placements = paginate(0.0, 297.0, PageBreakRule::Inclusive);
        let result = assemble(
            &RgbImage::new(0, 0),
            0.0,
            &placements,
            PageGeometry::A4,
            "x",
        );
        assert!(matches!(result, Err(ExportError::EmptyDocument)));
    }

    #[test]
    fn first_page_aligns_image_top_with_page_top() {
        let placement = PagePlacement {
            index: 0,
            offset_mm: 0.0,
        };
        let ops = page_operations(&placement, 400.0, PageGeometry::A4);
        let cm = &ops[1];
        assert_eq!(cm.operator, "cm");
        let y = cm.operands[5].as_float().unwrap();
        // Image top at page top means its bottom sits 103mm below the page.
        assert!((y as f64 - mm_to_pt(297.0 - 400.0)).abs() < 0.01);
    }

    #[test]
    fn later_pages_shift_image_up() {
        let first = page_operations(
            &PagePlacement {
                index: 0,
                offset_mm: 0.0,
            },
            594.0,
            PageGeometry::A4,
        );
        let second = page_operations(
            &PagePlacement {
                index: 1,
                offset_mm: -297.0,
            },
            594.0,
            PageGeometry::A4,
        );
        let y0 = first[1].operands[5].as_float().unwrap() as f64;
        let y1 = second[1].operands[5].as_float().unwrap() as f64;
        assert!((y1 - y0 - mm_to_pt(297.0)).abs() < 0.01);
    }
}
