use image::{DynamicImage, RgbImage};

use crate::content::PageContent;
use crate::error::Result;
use crate::geometry::Rect;

/// The seam between the segmentation pipeline and the PDF library.
///
/// A backend harvests page content into the pipeline's data model and
/// provides the two rendering primitives: a clipped rasterization with white
/// mask rects painted over it, and raw re-extraction of an embedded image.
pub trait DocumentSource {
    fn page_count(&self) -> usize;

    /// Harvest drawings, images, and text for one page, in top-left-origin
    /// page coordinates.
    fn page_content(&mut self, index: usize) -> Result<PageContent>;

    /// Rasterize `region` of a page at `dpi`, with every `masks` rect
    /// (page coordinates) painted pure white.
    fn render_region(
        &mut self,
        index: usize,
        region: &Rect,
        masks: &[Rect],
        dpi: f32,
    ) -> Result<RgbImage>;

    /// Re-extract the original bitmap of an embedded image by the id
    /// reported in `PageContent::images`.
    fn raw_image(&mut self, index: usize, id: usize) -> Result<DynamicImage>;
}
