use serde::Serialize;

use crate::associate::associate_captions;
use crate::captions::{detect_captions, Caption, CaptionKind};
use crate::cluster::build_visual_objects;
use crate::content::{ImageRect, PageContent};
use crate::geometry::Rect;
use crate::harvest::{harvest_drawings, harvest_text, TextIndex};
use crate::layout::{analyze_columns, ColumnLayout};
use crate::orphans::resolve_orphans;
use crate::settings::FigureSettings;

/// One figure to emit: a crop rect on the page and the caption text it was
/// associated with, if any.
#[derive(Debug, Clone, Serialize)]
pub struct FigureRegion {
    pub rect: Rect,
    pub caption: Option<String>,
}

/// Everything the segmentation derived from one page. Regions are ordered
/// caption-associated figures first (caption order), then orphans; region
/// indices are page-local and 1-based in filenames.
#[derive(Debug, Clone, Serialize)]
pub struct PageAnalysis {
    pub layout: ColumnLayout,
    pub captions: Vec<Caption>,
    pub visual_objects: Vec<Rect>,
    pub images: Vec<ImageRect>,
    pub text: TextIndex,
    pub regions: Vec<FigureRegion>,
}

/// Run the full segmentation pipeline on one page.
pub fn segment_page(page: &PageContent, settings: &FigureSettings) -> PageAnalysis {
    let captions = detect_captions(&page.blocks);
    let layout = analyze_columns(page, &captions);
    let text = harvest_text(page, &captions, settings);

    let drawing_rects = harvest_drawings(page);
    let label_rects: Vec<Rect> = captions
        .iter()
        .filter(|c| c.kind == CaptionKind::Label)
        .map(|c| c.rect)
        .collect();
    let objects = build_visual_objects(
        &drawing_rects,
        &text.text_rects,
        &label_rects,
        &text.strict_blocks,
        &layout,
        settings,
    );

    let assoc = associate_captions(&objects, &captions, &layout, &text, &page.rect, settings);
    let orphans = resolve_orphans(
        &objects,
        &assoc.used,
        &captions,
        &assoc.filled,
        &layout,
        &page.rect,
    );

    let mut regions: Vec<FigureRegion> = Vec::new();
    for group in &assoc.groups {
        regions.push(FigureRegion {
            rect: group.region,
            caption: Some(captions[group.caption].text.clone()),
        });
    }
    for orphan in orphans {
        regions.push(FigureRegion {
            rect: orphan.region,
            caption: orphan.caption.map(|ci| captions[ci].text.clone()),
        });
    }

    // Degenerate or off-page regions are never emitted.
    regions.retain(|r| {
        r.rect
            .intersection(&page.rect)
            .map(|c| c.width() > 0.0 && c.height() > 0.0)
            .unwrap_or(false)
    });
    for region in &mut regions {
        if let Some(clipped) = region.rect.intersection(&page.rect) {
            region.rect = clipped;
        }
    }

    PageAnalysis {
        layout,
        captions,
        visual_objects: objects,
        images: page.images.clone(),
        text,
        regions,
    }
}
