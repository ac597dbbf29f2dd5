//! Crop rectangle geometry and drag interaction.
//!
//! Coordinates are in *displayed* image pixels: the size the image is shown
//! at, not its natural size. [`source_region`] maps a displayed rectangle
//! back onto the natural image.

/// Crop rectangle in displayed-image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for CropRect {
    fn default() -> Self {
        Self {
            x: 50.0,
            y: 50.0,
            width: 200.0,
            height: 200.0,
        }
    }
}

impl CropRect {
    pub fn square(x: f64, y: f64, size: f64) -> Self {
        Self {
            x,
            y,
            width: size,
            height: size,
        }
    }
}

/// Size the image is displayed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Pointer position relative to the displayed image's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One crop interaction: the current rectangle and any drag in progress.
#[derive(Debug, Clone)]
pub struct CropSession {
    rect: CropRect,
    display: DisplaySize,
    /// Pointer offset from the rectangle origin while dragging.
    grab: Option<Point>,
}

impl CropSession {
    pub fn new(display: DisplaySize) -> Self {
        Self::with_rect(display, CropRect::default())
    }

    pub fn with_rect(display: DisplaySize, rect: CropRect) -> Self {
        Self {
            rect,
            display,
            grab: None,
        }
    }

    pub fn rect(&self) -> CropRect {
        self.rect
    }

    pub fn display(&self) -> DisplaySize {
        self.display
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    pub fn begin_drag(&mut self, pointer: Point) {
        self.grab = Some(Point::new(pointer.x - self.rect.x, pointer.y - self.rect.y));
    }

    /// Move the rectangle with the pointer, keeping its origin inside
    /// `[0, display - rect]` on both axes. Ignored when not dragging.
    pub fn drag_to(&mut self, pointer: Point) {
        let Some(grab) = self.grab else {
            return;
        };
        self.rect.x = clamp_origin(pointer.x - grab.x, self.display.width - self.rect.width);
        self.rect.y = clamp_origin(pointer.y - grab.y, self.display.height - self.rect.height);
    }

    pub fn end_drag(&mut self) {
        self.grab = None;
    }
}

/// `max(0, min(value, limit))`: a rectangle larger than the display pins to 0.
fn clamp_origin(value: f64, limit: f64) -> f64 {
    value.min(limit).max(0.0)
}

/// Natural-image pixel region `(x, y, width, height)` for a displayed rect.
///
/// Scales by `natural / display` per axis and clips to the image. Returns
/// `None` when nothing of the image is left inside the region.
pub fn source_region(
    rect: CropRect,
    display: DisplaySize,
    natural: (u32, u32),
) -> Option<(u32, u32, u32, u32)> {
    if !(display.width > 0.0 && display.height > 0.0) {
        return None;
    }
    let (nat_w, nat_h) = (natural.0 as f64, natural.1 as f64);
    let scale_x = nat_w / display.width;
    let scale_y = nat_h / display.height;

    let x0 = (rect.x * scale_x).clamp(0.0, nat_w);
    let y0 = (rect.y * scale_y).clamp(0.0, nat_h);
    let x1 = ((rect.x + rect.width) * scale_x).clamp(0.0, nat_w);
    let y1 = ((rect.y + rect.height) * scale_y).clamp(0.0, nat_h);

    let (x, y) = (x0.round() as u32, y0.round() as u32);
    let w = (x1.round() as u32).saturating_sub(x);
    let h = (y1.round() as u32).saturating_sub(y);
    if w == 0 || h == 0 {
        return None;
    }
    Some((x, y, w, h))
}

/// Where the visible part of `rect` lands in an `output_size` square,
/// as `(x, y, width, height)`.
///
/// The parts of the selection hanging past the displayed image stay empty
/// instead of being filled by stretching, so the photo keeps its aspect
/// ratio. Returns `None` when the selection misses the image.
pub fn output_placement(
    rect: CropRect,
    display: DisplaySize,
    output_size: u32,
) -> Option<(u32, u32, u32, u32)> {
    if output_size == 0 || !(rect.width > 0.0 && rect.height > 0.0) {
        return None;
    }
    let x0 = rect.x.max(0.0);
    let y0 = rect.y.max(0.0);
    let x1 = (rect.x + rect.width).min(display.width);
    let y1 = (rect.y + rect.height).min(display.height);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let out = output_size as f64;
    let to_out_x = |v: f64| ((v - rect.x) / rect.width * out).round().clamp(0.0, out) as u32;
    let to_out_y = |v: f64| ((v - rect.y) / rect.height * out).round().clamp(0.0, out) as u32;
    let (left, top) = (to_out_x(x0), to_out_y(y0));
    let width = to_out_x(x1).saturating_sub(left).max(1);
    let height = to_out_y(y1).saturating_sub(top).max(1);
    Some((
        left.min(output_size - 1),
        top.min(output_size - 1),
        width,
        height,
    ))
}
