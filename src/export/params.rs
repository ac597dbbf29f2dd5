//! Parameter types for the export pipeline.
//!
//! - [`PageGeometry`]: physical page size in millimetres, with PDF point conversion.
//! - [`ExportSettings`]: everything one export run needs, resolved from config.

use super::pagination::PageBreakRule;
use crate::config::ExportConfig;

/// PDF user-space units (points) per millimetre.
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageGeometry {
    pub const A4: PageGeometry = PageGeometry {
        width_mm: 210.0,
        height_mm: 297.0,
    };

    pub fn width_pt(self) -> f64 {
        mm_to_pt(self.width_mm)
    }

    pub fn height_pt(self) -> f64 {
        mm_to_pt(self.height_mm)
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportSettings {
    /// Device pixels per CSS pixel when rasterizing.
    pub scale: f64,
    /// Width of the offscreen render container.
    pub css_width_px: u32,
    pub page: PageGeometry,
    pub rule: PageBreakRule,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self::from(&ExportConfig::default())
    }
}

impl From<&ExportConfig> for ExportSettings {
    fn from(config: &ExportConfig) -> Self {
        Self {
            scale: config.scale,
            css_width_px: config.css_width_px,
            page: PageGeometry {
                width_mm: config.page_width_mm,
                height_mm: config.page_height_mm,
            },
            rule: config.trailing_page.into(),
        }
    }
}
