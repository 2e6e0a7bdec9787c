use serde::Serialize;

use crate::captions::starts_like_caption;
use crate::geometry::{union_of, Rect};
use crate::harvest::LineInfo;
use crate::layout::{ColumnLayout, ColumnZone};

/// Why a text line inside a crop gets painted over.
///
/// The caption-override check is by tag: positional (top) reasons spare
/// "Figure N" lines, side reasons do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EraseReason {
    /// Line sits across the gutter from a non-full-width figure.
    OppositeColumn,
    /// Line ends more than 10 pt above the visual core.
    TopStrict,
    /// Line ends within the 10 pt buffer above the visual core.
    TopBuffer,
    /// Line starts in the top fringe of the visual core.
    TopInner,
    /// Line lies right of the core's right safety edge.
    RightSide,
    /// Line lies far left of the core's left safety edge.
    LeftSide,
}

impl EraseReason {
    /// Side reasons defeat the caption-override: a neighbouring figure's
    /// caption must go even though it reads "Figure N".
    pub fn is_side(&self) -> bool {
        matches!(
            self,
            EraseReason::OppositeColumn | EraseReason::RightSide | EraseReason::LeftSide
        )
    }
}

/// A line rect to paint white, in page coordinates.
#[derive(Debug, Clone, Serialize)]
pub struct EraseMark {
    pub rect: Rect,
    pub reason: EraseReason,
}

/// Union of the visual objects that materially intersect the crop: the
/// region the eraser must never touch.
pub fn visual_core(region: &Rect, objects: &[Rect]) -> Option<Rect> {
    let members: Vec<Rect> = objects
        .iter()
        .filter(|o| o.intersects(region) && o.width() > 5.0 && o.height() > 5.0)
        .copied()
        .collect();
    union_of(&members)
}

/// Decide which text lines to erase from a crop region.
///
/// Returns marks in page coordinates; the renderer translates them into the
/// clip's local space. With no visual core there are no safety zones and
/// nothing is erased.
pub fn plan_erasure(
    region: &Rect,
    zone: ColumnZone,
    objects: &[Rect],
    lines: &[LineInfo],
    layout: &ColumnLayout,
) -> Vec<EraseMark> {
    let core = match visual_core(region, objects) {
        Some(core) => core,
        None => return Vec::new(),
    };

    let top_strict_y = core.y0 - 10.0;
    let top_buffer_y = core.y0;
    let right_safe_x = core.x1 + 8.0;
    let left_safe_x = core.x0 - 50.0;

    // Any non-full figure has a side of the gutter it belongs to; a mixed
    // region takes the side of its own centroid.
    let figure_left = match zone {
        ColumnZone::Full => None,
        ColumnZone::Left => Some(true),
        ColumnZone::Right => Some(false),
        ColumnZone::Mixed => Some(region.center_x() < layout.mid_x),
    };

    let mut marks = Vec::new();

    for line in lines {
        if !line.rect.intersects(region) || line.rect.y0 > core.y1 {
            continue;
        }

        let reason = decide(
            line,
            figure_left,
            layout.mid_x,
            top_strict_y,
            top_buffer_y,
            right_safe_x,
            left_safe_x,
            &core,
        );
        let Some(reason) = reason else { continue };

        // Keep this figure's own caption text when the line merely sits in
        // a top zone; spatial side hits still erase.
        if !reason.is_side() && starts_like_caption(&line.text) {
            continue;
        }

        marks.push(EraseMark {
            rect: line.rect,
            reason,
        });
    }

    marks
}

#[allow(clippy::too_many_arguments)]
fn decide(
    line: &LineInfo,
    figure_left: Option<bool>,
    mid_x: f64,
    top_strict_y: f64,
    top_buffer_y: f64,
    right_safe_x: f64,
    left_safe_x: f64,
    core: &Rect,
) -> Option<EraseReason> {
    let r = &line.rect;

    if let Some(figure_left) = figure_left {
        let line_left = r.center_x() < mid_x;
        if line_left != figure_left {
            return Some(EraseReason::OppositeColumn);
        }
    }

    if r.y1 < top_strict_y && line.len > 5 {
        return Some(EraseReason::TopStrict);
    }
    if r.y1 < top_buffer_y && line.len > 15 {
        return Some(EraseReason::TopBuffer);
    }
    if r.y0 < core.y0 + 10.0 && line.len > 25 {
        return Some(EraseReason::TopInner);
    }
    if r.x0 > right_safe_x {
        return Some(EraseReason::RightSide);
    }
    if r.x1 < left_safe_x && line.len > 25 {
        return Some(EraseReason::LeftSide);
    }

    None
}
