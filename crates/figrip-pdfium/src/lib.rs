//! `DocumentSource` backend over pdfium.
//!
//! Pdfium works in bottom-up page coordinates and renders whole pages; this
//! crate flips harvested geometry into the pipeline's top-left-origin space
//! and implements clipped rendering as render-page-then-crop, with mask
//! rects painted white directly on the cropped pixels. The full-page raster
//! is cached so the regions of one page share a single render.

mod text;

use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage};
use pdfium_render::prelude::*;

use figrip_core::{
    Color, DocumentSource, Error, ImageRect, PageContent, Rect, Result, TextSpan, VectorPath,
};

pub use pdfium_render::prelude::Pdfium;

/// Bind the pdfium dynamic library, looking next to the executable first
/// and falling back to the system library path.
pub fn bind_pdfium() -> Result<Pdfium> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Error::Source(format!("failed to bind pdfium: {e}")))?;
    Ok(Pdfium::new(bindings))
}

struct PageRaster {
    index: usize,
    scale: f32,
    image: RgbImage,
}

/// A PDF opened through pdfium.
pub struct PdfiumSource<'a> {
    document: PdfDocument<'a>,
    raster: Option<PageRaster>,
}

impl<'a> PdfiumSource<'a> {
    pub fn open(pdfium: &'a Pdfium, path: &Path) -> Result<Self> {
        let document = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| Error::Source(format!("{}: {e}", path.display())))?;
        Ok(Self {
            document,
            raster: None,
        })
    }

    fn page(&self, index: usize) -> Result<PdfPage<'_>> {
        self.document
            .pages()
            .get(index as u16)
            .map_err(|_| Error::PageNotFound(index))
    }

    /// Render a full page at `scale`, reusing the cached raster when the
    /// previous call was for the same page and scale.
    fn page_raster(&mut self, index: usize, scale: f32) -> Result<&RgbImage> {
        let stale = !matches!(
            &self.raster,
            Some(r) if r.index == index && (r.scale - scale).abs() < f32::EPSILON
        );
        if stale {
            let page = self
                .document
                .pages()
                .get(index as u16)
                .map_err(|_| Error::PageNotFound(index))?;
            let bitmap = page
                .render_with_config(&PdfRenderConfig::default().scale_page_by_factor(scale))
                .map_err(|e| Error::Render(format!("page {}: {e}", index + 1)))?;
            let image = bitmap.as_image().to_rgb8();
            self.raster = Some(PageRaster {
                index,
                scale,
                image,
            });
        }
        Ok(&self.raster.as_ref().expect("raster just populated").image)
    }
}

/// Flip a pdfium quad-points bound into top-left-origin page space.
fn to_rect(bounds: &PdfQuadPoints, page_height: f64) -> Rect {
    let left = bounds.left().value as f64;
    let right = bounds.right().value as f64;
    let top = bounds.top().value as f64;
    let bottom = bounds.bottom().value as f64;
    Rect::new(
        left.min(right),
        page_height - top.max(bottom),
        left.max(right),
        page_height - top.min(bottom),
    )
}

fn to_color(color: PdfColor) -> Option<Color> {
    if color.alpha() == 0 {
        return None;
    }
    Some(Color::Rgb(
        color.red() as f64 / 255.0,
        color.green() as f64 / 255.0,
        color.blue() as f64 / 255.0,
    ))
}

impl DocumentSource for PdfiumSource<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_content(&mut self, index: usize) -> Result<PageContent> {
        let page = self.page(index)?;
        let width = page.width().value as f64;
        let height = page.height().value as f64;
        let mut content = PageContent::new(Rect::new(0.0, 0.0, width, height));

        let mut image_count = 0usize;
        for object in page.objects().iter() {
            match &object {
                PdfPageObject::Path(path_object) => {
                    let Ok(bounds) = object.bounds() else { continue };
                    content.drawings.push(VectorPath {
                        rect: to_rect(&bounds, height),
                        stroke: path_object.stroke_color().ok().and_then(to_color),
                        fill: path_object.fill_color().ok().and_then(to_color),
                    });
                }
                PdfPageObject::Image(_) => {
                    if let Ok(bounds) = object.bounds() {
                        content.images.push(ImageRect {
                            rect: to_rect(&bounds, height),
                            id: image_count,
                        });
                    }
                    image_count += 1;
                }
                _ => {}
            }
        }

        // Text harvest degrades silently: a page with a broken text layer
        // still yields its drawings.
        match page.text() {
            Ok(page_text) => {
                let segments = page_text.segments();
                let mut spans: Vec<TextSpan> = Vec::with_capacity(segments.len());
                for i in 0..segments.len() {
                    let Ok(segment) = segments.get(i) else { continue };
                    let seg_text = segment.text();
                    if seg_text.trim().is_empty() {
                        continue;
                    }
                    let b = segment.bounds();
                    let rect = Rect::new(
                        b.left().value as f64,
                        height - b.top().value as f64,
                        b.right().value as f64,
                        height - b.bottom().value as f64,
                    );
                    spans.push(TextSpan {
                        rect,
                        text: seg_text,
                    });
                }
                let lines = text::spans_to_lines(spans);
                content.blocks = text::lines_to_blocks(lines);
            }
            Err(e) => {
                log::debug!("page {}: no text layer ({e})", index + 1);
            }
        }

        Ok(content)
    }

    fn render_region(
        &mut self,
        index: usize,
        region: &Rect,
        masks: &[Rect],
        dpi: f32,
    ) -> Result<RgbImage> {
        let scale = dpi / 72.0;
        let raster = self.page_raster(index, scale)?;
        let (full_w, full_h) = raster.dimensions();
        let s = scale as f64;

        let px0 = ((region.x0 * s).floor().max(0.0) as u32).min(full_w.saturating_sub(1));
        let py0 = ((region.y0 * s).floor().max(0.0) as u32).min(full_h.saturating_sub(1));
        let px1 = ((region.x1 * s).ceil() as u32).clamp(px0 + 1, full_w);
        let py1 = ((region.y1 * s).ceil() as u32).clamp(py0 + 1, full_h);

        let mut crop =
            image::imageops::crop_imm(raster, px0, py0, px1 - px0, py1 - py0).to_image();

        for mask in masks {
            let Some(overlap) = mask.intersection(region) else {
                continue;
            };
            let mx0 = ((overlap.x0 - region.x0) * s).floor().max(0.0) as u32;
            let my0 = ((overlap.y0 - region.y0) * s).floor().max(0.0) as u32;
            let mx1 = (((overlap.x1 - region.x0) * s).ceil() as u32).min(crop.width());
            let my1 = (((overlap.y1 - region.y0) * s).ceil() as u32).min(crop.height());
            for y in my0..my1 {
                for x in mx0..mx1 {
                    crop.put_pixel(x, y, Rgb([255, 255, 255]));
                }
            }
        }

        Ok(crop)
    }

    fn raw_image(&mut self, index: usize, id: usize) -> Result<DynamicImage> {
        let page = self.page(index)?;
        let mut image_count = 0usize;
        for object in page.objects().iter() {
            if let Some(image_object) = object.as_image_object() {
                if image_count == id {
                    return image_object
                        .get_raw_image()
                        .map_err(|e| Error::Render(format!("image {id} on page {}: {e}", index + 1)));
                }
                image_count += 1;
            }
        }
        Err(Error::Render(format!(
            "image {id} not found on page {}",
            index + 1
        )))
    }
}
