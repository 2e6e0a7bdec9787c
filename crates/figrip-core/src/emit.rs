use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::erase::plan_erasure;
use crate::error::Result;
use crate::geometry::Rect;
use crate::pipeline::PageAnalysis;
use crate::settings::FigureSettings;
use crate::source::DocumentSource;
use crate::trim::trim_whitespace;

/// File name for a figure, 1-based page and figure numbers.
/// `suffix` distinguishes the hybrid pair ("_v" / "_i").
pub fn figure_filename(page_no: usize, fig_no: usize, suffix: &str) -> String {
    format!("Page{page_no}_Fig{fig_no}{suffix}.png")
}

/// Render, clean, trim, and save one figure region.
///
/// Returns the paths written: one PNG normally, the rendered-composite and
/// raw-image pair when the region overlaps an embedded image. The rendered
/// pixmap is dropped before this function returns, so peak memory stays at
/// one region.
pub fn emit_region<S: DocumentSource>(
    source: &mut S,
    page_index: usize,
    analysis: &PageAnalysis,
    region_index: usize,
    out_dir: &Path,
    settings: &FigureSettings,
) -> Result<Vec<PathBuf>> {
    let region = &analysis.regions[region_index];
    let zone = analysis.layout.zone_of(&region.rect);

    let marks = plan_erasure(
        &region.rect,
        zone,
        &analysis.visual_objects,
        &analysis.text.lines,
        &analysis.layout,
    );
    let masks: Vec<Rect> = marks.iter().map(|m| m.rect).collect();

    let pixmap = source.render_region(page_index, &region.rect, &masks, settings.dpi)?;
    let trimmed = trim_whitespace(&pixmap, settings.trim_threshold, settings.trim_margin);
    drop(pixmap);

    let page_no = page_index + 1;
    let fig_no = region_index + 1;
    let mut written = Vec::new();

    let embedded = analysis
        .images
        .iter()
        .find(|img| img.rect.intersects(&region.rect));

    match embedded {
        Some(img) => {
            let v_path = out_dir.join(figure_filename(page_no, fig_no, "_v"));
            trimmed.save(&v_path)?;
            written.push(v_path);

            let raw = source.raw_image(page_index, img.id)?;
            let i_path = out_dir.join(figure_filename(page_no, fig_no, "_i"));
            save_raw(raw, &i_path)?;
            written.push(i_path);
        }
        None => {
            let path = out_dir.join(figure_filename(page_no, fig_no, ""));
            trimmed.save(&path)?;
            written.push(path);
        }
    }

    Ok(written)
}

/// Save a re-extracted embedded image. Only formats with more than three
/// color channels (alpha excluded) are reduced to plain RGB; grayscale and
/// RGB keep their encoding and RGBA keeps its alpha.
fn save_raw(img: DynamicImage, path: &Path) -> Result<()> {
    let color = img.color();
    let color_channels = color.channel_count() - color.has_alpha() as u8;
    let img = if color_channels > 3 {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };
    img.save(path)?;
    Ok(())
}
