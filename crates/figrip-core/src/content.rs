use serde::Serialize;

use crate::geometry::Rect;

/// A color value reported by the PDF backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Color {
    Gray(f64),
    Rgb(f64, f64, f64),
    Cmyk(f64, f64, f64, f64),
}

impl Color {
    /// Pure white, the color that never makes a path visible.
    pub fn is_white(&self) -> bool {
        const EPS: f64 = 1e-3;
        match *self {
            Color::Gray(v) => v >= 1.0 - EPS,
            Color::Rgb(r, g, b) => r >= 1.0 - EPS && g >= 1.0 - EPS && b >= 1.0 - EPS,
            Color::Cmyk(c, m, y, k) => c <= EPS && m <= EPS && y <= EPS && k <= EPS,
        }
    }
}

/// A vector drawing on the page, reduced to its bounding rect and paint.
#[derive(Debug, Clone, Serialize)]
pub struct VectorPath {
    pub rect: Rect,
    pub stroke: Option<Color>,
    pub fill: Option<Color>,
}

impl VectorPath {
    /// A path counts as visible when it has real extent on both axes and at
    /// least one defined, non-white paint.
    pub fn is_visible(&self) -> bool {
        if self.rect.width() < 0.5 || self.rect.height() < 0.5 {
            return false;
        }
        let stroked = self.stroke.map(|c| !c.is_white()).unwrap_or(false);
        let filled = self.fill.map(|c| !c.is_white()).unwrap_or(false);
        stroked || filled
    }
}

/// An embedded raster image placed on the page. `id` is the backend's
/// page-local identifier used to re-extract the original bitmap.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRect {
    pub rect: Rect,
    pub id: usize,
}

/// A run of text on a single line.
#[derive(Debug, Clone, Serialize)]
pub struct TextSpan {
    pub rect: Rect,
    pub text: String,
}

/// One line of text: span rects unioned, text concatenated.
#[derive(Debug, Clone, Serialize)]
pub struct TextLine {
    pub rect: Rect,
    pub spans: Vec<TextSpan>,
}

impl TextLine {
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// A paragraph-level block of lines, the granularity used for body-text
/// detection and caption matching.
#[derive(Debug, Clone, Serialize)]
pub struct TextBlock {
    pub rect: Rect,
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    /// Concatenated text of all lines, space-joined.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Everything harvested from one page. Immutable once collected; the whole
/// pipeline derives per-page state from this and discards it afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct PageContent {
    pub rect: Rect,
    pub drawings: Vec<VectorPath>,
    pub images: Vec<ImageRect>,
    pub blocks: Vec<TextBlock>,
}

impl PageContent {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            drawings: Vec::new(),
            images: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Iterate all text lines across blocks.
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.blocks.iter().flat_map(|b| b.lines.iter())
    }
}
