//! Rasterizer trait and the headless Chrome implementation.
//!
//! A [`Rasterizer`] turns a complete HTML document into one RGB bitmap of the
//! `.cv-page` container. The production implementation drives headless
//! Chrome; tests substitute a fake that returns a blank bitmap of a chosen
//! height.

use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions, Tab};
use image::RgbImage;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use super::ExportError;

/// Render HTML offscreen and capture it as pixels.
pub trait Rasterizer {
    /// Rasterize `html` in a container `width_px` CSS pixels wide, at `scale`
    /// device pixels per CSS pixel.
    fn rasterize(&self, html: &str, width_px: u32, scale: f64) -> Result<RgbImage, ExportError>;
}

/// Element whose box is captured.
pub const PAGE_SELECTOR: &str = ".cv-page";

/// Initial window height used only while measuring.
const MEASURE_HEIGHT: u32 = 1200;

/// Headless Chrome rasterizer.
///
/// The document is written to a temporary `.html` file and loaded over
/// `file://`. A first browser at the target width measures the page; a second
/// browser sized to the full page height takes the screenshot, so the whole
/// document is inside the viewport.
#[derive(Debug, Clone, Default)]
pub struct ChromeRasterizer;

impl ChromeRasterizer {
    pub fn new() -> Self {
        Self
    }

    fn open(path: &Path, width: u32, height: u32) -> Result<(Browser, Arc<Tab>), ExportError> {
        let browser = Browser::new(LaunchOptions {
            window_size: Some((width, height)),
            ..Default::default()
        })
        .map_err(|e| ExportError::Rasterize(format!("failed to launch Chrome: {e}")))?;
        let tab = browser.new_tab().map_err(rasterize_err)?;
        tab.navigate_to(&format!("file://{}", path.display()))
            .map_err(rasterize_err)?
            .wait_until_navigated()
            .map_err(rasterize_err)?;
        Ok((browser, tab))
    }

    fn measure(tab: &Tab) -> Result<u32, ExportError> {
        let script = format!(
            "Math.ceil(document.querySelector('{PAGE_SELECTOR}').getBoundingClientRect().height)"
        );
        let height = tab
            .evaluate(&script, false)
            .map_err(rasterize_err)?
            .value
            .and_then(|v| v.as_f64())
            .ok_or_else(|| ExportError::Rasterize(format!("no {PAGE_SELECTOR} element to measure")))?;
        if height < 1.0 {
            return Err(ExportError::EmptyDocument);
        }
        Ok(height as u32)
    }
}

impl Rasterizer for ChromeRasterizer {
    fn rasterize(&self, html: &str, width_px: u32, scale: f64) -> Result<RgbImage, ExportError> {
        let mut file = tempfile::Builder::new()
            .prefix("cvpress-")
            .suffix(".html")
            .tempfile()?;
        file.write_all(html.as_bytes())?;
        file.flush()?;

        let height_px = {
            let (_browser, tab) = Self::open(file.path(), width_px, MEASURE_HEIGHT)?;
            Self::measure(&tab)?
        };
        tracing::debug!(width_px, height_px, scale, "measured document");

        let (_browser, tab) = Self::open(file.path(), width_px, height_px)?;
        let png = tab
            .capture_screenshot(
                Page::CaptureScreenshotFormatOption::Png,
                None,
                Some(Page::Viewport {
                    x: 0.0,
                    y: 0.0,
                    width: width_px as f64,
                    height: height_px as f64,
                    scale,
                }),
                true,
            )
            .map_err(rasterize_err)?;

        let bitmap = image::load_from_memory(&png)
            .map_err(|e| ExportError::Rasterize(format!("screenshot decode failed: {e}")))?
            .to_rgb8();
        tracing::debug!(
            width = bitmap.width(),
            height = bitmap.height(),
            "captured bitmap"
        );
        Ok(bitmap)
    }
}

fn rasterize_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Rasterize(e.to_string())
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Fake rasterizer: records calls and returns a white bitmap whose height
    /// in CSS pixels is fixed up front.
    pub struct FakeRasterizer {
        pub height_px: u32,
        pub fail: bool,
        pub calls: Mutex<Vec<(u32, f64)>>,
    }

    impl FakeRasterizer {
        pub fn with_height(height_px: u32) -> Self {
            Self {
                height_px,
                fail: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::with_height(0)
            }
        }
    }

    impl Rasterizer for FakeRasterizer {
        fn rasterize(
            &self,
            _html: &str,
            width_px: u32,
            scale: f64,
        ) -> Result<RgbImage, ExportError> {
            self.calls.lock().unwrap().push((width_px, scale));
            if self.fail {
                return Err(ExportError::Rasterize("simulated failure".into()));
            }
            let w = (width_px as f64 * scale).round() as u32;
            let h = (self.height_px as f64 * scale).round() as u32;
            Ok(RgbImage::from_pixel(w, h, image::Rgb([255, 255, 255])))
        }
    }

    #[test]
    fn fake_scales_dimensions() {
        let fake = FakeRasterizer::with_height(100);
        let bitmap = fake.rasterize("<html></html>", 794, 2.0).unwrap();
        assert_eq!(bitmap.dimensions(), (1588, 200));
        assert_eq!(fake.calls.lock().unwrap().as_slice(), &[(794, 2.0)]);
    }
}
