//! PDF export: render → rasterize → paginate → assemble.
//!
//! | Step | Where |
//! |---|---|
//! | **Rasterize** | [`Rasterizer`] / [`ChromeRasterizer`] (headless Chrome screenshot) |
//! | **Scale** | [`scaled_image_height`]: bitmap height in mm at page width |
//! | **Paginate** | [`paginate`]: one placement per page, pure arithmetic |
//! | **Assemble** | [`pdf::assemble`]: lopdf, one shared image XObject |
//! | **Write** | [`write_export`]: temp file + rename, never a partial file |
//!
//! The module is split into:
//! - **Pagination**: pure functions for page math (unit testable)
//! - **Parameters**: page geometry and resolved export settings
//! - **Rasterizer**: [`Rasterizer`] trait + [`ChromeRasterizer`]
//! - **PDF**: serialization with lopdf
//!
//! An export either produces a complete file or nothing. Errors carry detail
//! for the log; the user only ever sees a single generic failure message.

mod pagination;
mod params;
pub mod pdf;
pub mod rasterizer;

use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use pagination::{PageBreakRule, PagePlacement, paginate, scaled_image_height};
pub use params::{ExportSettings, PageGeometry, mm_to_pt};
pub use rasterizer::{ChromeRasterizer, Rasterizer};

/// Message shown to the user for any export failure.
pub const EXPORT_FAILED: &str = "Failed to generate PDF";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Rasterization failed: {0}")]
    Rasterize(String),
    #[error("PDF serialization failed: {0}")]
    Pdf(String),
    #[error("Rendered document is empty")]
    EmptyDocument,
}

/// A finished export held in memory.
#[derive(Debug, Clone)]
pub struct ExportedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Height of the rendered document at page width, in mm.
    pub image_height_mm: f64,
}

/// Run the whole pipeline on an already rendered HTML document.
pub fn export_document<R: Rasterizer + ?Sized>(
    html: &str,
    rasterizer: &R,
    settings: &ExportSettings,
    title: &str,
) -> Result<ExportedPdf, ExportError> {
    let bitmap = rasterizer.rasterize(html, settings.css_width_px, settings.scale)?;
    if bitmap.width() == 0 || bitmap.height() == 0 {
        return Err(ExportError::EmptyDocument);
    }

    let image_height_mm =
        scaled_image_height(bitmap.width(), bitmap.height(), settings.page.width_mm);
    let placements = paginate(image_height_mm, settings.page.height_mm, settings.rule);
    tracing::debug!(
        image_height_mm,
        pages = placements.len(),
        rule = ?settings.rule,
        "paginated document"
    );

    let bytes = pdf::assemble(&bitmap, image_height_mm, &placements, settings.page, title)?;
    Ok(ExportedPdf {
        bytes,
        page_count: placements.len(),
        image_height_mm,
    })
}

/// Download name for a CV: each non-alphanumeric ASCII character becomes `_`.
///
/// ```
/// # use cvpress::export::export_filename;
/// assert_eq!(export_filename("My/Resume 2024!"), "My_Resume_2024__CV.pdf");
/// ```
pub fn export_filename(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{stem}_CV.pdf")
}

/// Write `bytes` to `dir/filename` atomically. Returns the final path.
pub fn write_export(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let target = dir.join(filename);
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(&target).map_err(|e| ExportError::Io(e.error))?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::rasterizer::tests::FakeRasterizer;
    use super::*;
    use tempfile::TempDir;

    fn settings(rule: PageBreakRule) -> ExportSettings {
        ExportSettings {
            rule,
            ..ExportSettings::default()
        }
    }

    // =========================================================================
    // export_document
    // =========================================================================

    fn two_page_settings(rule: PageBreakRule) -> ExportSettings {
        ExportSettings {
            css_width_px: 500,
            page: PageGeometry {
                width_mm: 100.0,
                height_mm: 100.0,
            },
            ..settings(rule)
        }
    }

    #[test]
    fn exact_two_page_document_inclusive() {
        // 500 × 1000 css px at 100mm wide is exactly two 100mm pages.
        let fake = FakeRasterizer::with_height(1000);
        let s = two_page_settings(PageBreakRule::Inclusive);
        let exported = export_document("<html></html>", &fake, &s, "t").unwrap();
        assert_eq!(exported.image_height_mm, 200.0);
        assert_eq!(exported.page_count, 3);
    }

    #[test]
    fn exact_two_page_document_exclusive() {
        let fake = FakeRasterizer::with_height(1000);
        let s = two_page_settings(PageBreakRule::Exclusive);
        let exported = export_document("<html></html>", &fake, &s, "t").unwrap();
        assert_eq!(exported.image_height_mm, 200.0);
        assert_eq!(exported.page_count, 2);
    }

    #[test]
    fn short_document_is_single_page() {
        let fake = FakeRasterizer::with_height(400);
        let exported =
            export_document("<html></html>", &fake, &ExportSettings::default(), "t").unwrap();
        assert_eq!(exported.page_count, 1);
        assert!(exported.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn rasterizer_receives_width_and_scale() {
        let fake = FakeRasterizer::with_height(10);
        export_document("<html></html>", &fake, &ExportSettings::default(), "t").unwrap();
        assert_eq!(fake.calls.lock().unwrap().as_slice(), &[(794, 2.0)]);
    }

    #[test]
    fn rasterize_failure_propagates() {
        let fake = FakeRasterizer::failing();
        let result = export_document("<html></html>", &fake, &ExportSettings::default(), "t");
        assert!(matches!(result, Err(ExportError::Rasterize(_))));
    }

    #[test]
    fn zero_height_render_is_empty_document() {
        let fake = FakeRasterizer::with_height(0);
        let result = export_document("<html></html>", &fake, &ExportSettings::default(), "t");
        assert!(matches!(result, Err(ExportError::EmptyDocument)));
    }

    // =========================================================================
    // Filenames and writing
    // =========================================================================

    #[test]
    fn filename_replaces_each_unsafe_char() {
        assert_eq!(export_filename("My/Resume 2024!"), "My_Resume_2024__CV.pdf");
        assert_eq!(export_filename("plain"), "plain_CV.pdf");
        assert_eq!(export_filename("김민수 CV"), "____CV_CV.pdf");
        assert_eq!(export_filename(""), "_CV.pdf");
    }

    #[test]
    fn write_export_creates_file() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("out");
        let path = write_export(&dir, "a_CV.pdf", b"%PDF-1.4 test").unwrap();
        assert_eq!(path, dir.join("a_CV.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4 test");
        // Only the final file is left behind.
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);
    }
}
