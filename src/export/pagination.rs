//! Pure pagination arithmetic.
//!
//! The rendered document is one tall image. It is scaled to the page width,
//! and every page draws the *whole* image shifted up by a multiple of the page
//! height; the page box clips what falls outside. Nothing here touches pixels.

/// Height in mm of an image of `px_width × px_height` scaled to `page_width_mm`.
///
/// ```
/// # use cvpress::export::scaled_image_height;
/// // 1588 × 2246 px at A4 width → 297 mm
/// assert!((scaled_image_height(1588, 2246, 210.0) - 297.0).abs() < 0.01);
/// ```
pub fn scaled_image_height(px_width: u32, px_height: u32, page_width_mm: f64) -> f64 {
    if px_width == 0 {
        return 0.0;
    }
    px_height as f64 * page_width_mm / px_width as f64
}

/// When another page is started after the remaining height has been reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageBreakRule {
    /// Continue while `height_left >= 0`. An image that is an exact multiple
    /// of the page height gets one extra, blank trailing page.
    #[default]
    Inclusive,
    /// Continue while `height_left > 0`. No trailing blank page.
    Exclusive,
}

impl PageBreakRule {
    fn continues(self, height_left: f64) -> bool {
        match self {
            PageBreakRule::Inclusive => height_left >= 0.0,
            PageBreakRule::Exclusive => height_left > 0.0,
        }
    }
}

/// Where the image is drawn on one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    /// Zero-based page number.
    pub index: usize,
    /// Vertical position of the image's top edge relative to the page's top
    /// edge, in mm. Zero on the first page, negative afterwards.
    pub offset_mm: f64,
}

/// Slice an image of `image_height_mm` into pages of `page_height_mm`.
///
/// The first page always exists and shows the image at offset zero. After
/// each page the remaining height drops by one page; while `rule` accepts the
/// remainder, another page is added at `remaining - image_height`.
pub fn paginate(image_height_mm: f64, page_height_mm: f64, rule: PageBreakRule) -> Vec<PagePlacement> {
    let mut pages = vec![PagePlacement {
        index: 0,
        offset_mm: 0.0,
    }];
    if !(page_height_mm > 0.0) || !image_height_mm.is_finite() {
        return pages;
    }

    let mut height_left = image_height_mm - page_height_mm;
    while rule.continues(height_left) {
        pages.push(PagePlacement {
            index: pages.len(),
            offset_mm: height_left - image_height_mm,
        });
        height_left -= page_height_mm;
    }
    pages
}
