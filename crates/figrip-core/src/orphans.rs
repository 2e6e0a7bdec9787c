use std::collections::HashSet;

use serde::Serialize;

use crate::captions::{Caption, CaptionKind};
use crate::geometry::Rect;
use crate::layout::ColumnLayout;

/// A figure emitted without (or with late-bound) caption association.
#[derive(Debug, Clone, Serialize)]
pub struct OrphanRegion {
    pub region: Rect,
    /// Caption index claimed during re-association, if any.
    pub caption: Option<usize>,
}

/// Handle visual objects no caption claimed.
///
/// An orphan straddling an active gutter is split into its column halves.
/// Each orphan then gets one more chance to find a caption below it; the
/// rest are emitted as standalone figures.
pub fn resolve_orphans(
    objects: &[Rect],
    used: &HashSet<usize>,
    captions: &[Caption],
    filled: &HashSet<usize>,
    layout: &ColumnLayout,
    page: &Rect,
) -> Vec<OrphanRegion> {
    let mut consumed: HashSet<usize> = HashSet::new();
    let mut out = Vec::new();
    let page_area = page.area();

    for (i, obj) in objects.iter().enumerate() {
        if used.contains(&i) {
            continue;
        }
        if obj.width() <= 20.0 || obj.height() <= 20.0 {
            continue;
        }
        // A cluster covering essentially the whole page is a border or
        // background artifact, not a figure.
        if page_area > 0.0 && obj.area() > 0.95 * page_area {
            continue;
        }

        for orphan in split_across_gutter(obj, layout) {
            if let Some(ci) = find_caption(&orphan, captions, filled, &consumed, layout) {
                let cropped = Rect::new(
                    orphan.x0,
                    orphan.y0,
                    orphan.x1,
                    orphan.y1.min(captions[ci].rect.y0 - 5.0),
                );
                if cropped.height() > 20.0 {
                    consumed.insert(ci);
                    out.push(OrphanRegion {
                        region: cropped,
                        caption: Some(ci),
                    });
                }
                continue;
            }

            if layout.guard && orphan.width() < 15.0 {
                continue;
            }
            out.push(OrphanRegion {
                region: orphan,
                caption: None,
            });
        }
    }

    out
}

/// Split an orphan that reaches at least 10 pt into both columns of a
/// guarded page; otherwise return it whole.
fn split_across_gutter(obj: &Rect, layout: &ColumnLayout) -> Vec<Rect> {
    let mid = layout.mid_x;
    if layout.guard && obj.x0 <= mid - 10.0 && obj.x1 >= mid + 10.0 {
        let left = Rect::new(obj.x0, obj.y0, mid - 5.0, obj.y1);
        let right = Rect::new(mid + 5.0, obj.y0, obj.x1, obj.y1);
        [left, right]
            .into_iter()
            .filter(|half| half.width() > 20.0)
            .collect()
    } else {
        vec![*obj]
    }
}

fn find_caption(
    orphan: &Rect,
    captions: &[Caption],
    filled: &HashSet<usize>,
    consumed: &HashSet<usize>,
    layout: &ColumnLayout,
) -> Option<usize> {
    for (ci, cap) in captions.iter().enumerate() {
        if cap.kind != CaptionKind::Caption || filled.contains(&ci) || consumed.contains(&ci) {
            continue;
        }

        let same_column = if layout.guard {
            layout.zone_of(orphan) == layout.caption_zone(&cap.rect)
        } else {
            (orphan.center_x() - cap.rect.center_x()).abs() < 100.0
        };
        if !same_column {
            continue;
        }

        let top = cap.rect.y0;
        if top < orphan.y1 - 150.0 || top > orphan.y1 + 400.0 {
            continue;
        }

        // Horizontal alignment with slack.
        if orphan.x1 <= cap.rect.x0 - 50.0 || orphan.x0 >= cap.rect.x1 + 50.0 {
            continue;
        }

        return Some(ci);
    }
    None
}
