use serde::Serialize;

use crate::captions::{Caption, CaptionKind};
use crate::content::PageContent;
use crate::geometry::Rect;

/// Which column of the page a rect occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnZone {
    Left,
    Right,
    /// Wider than 60% of the page.
    Full,
    /// Straddles the gutter without being full-width.
    Mixed,
}

/// Inferred column geometry of a page.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ColumnLayout {
    /// X coordinate of the gutter midline.
    pub mid_x: f64,
    /// True when the page shows solid two-column evidence; merges and
    /// associations crossing `mid_x` are then forbidden.
    pub guard: bool,
    pub page_width: f64,
}

impl ColumnLayout {
    /// Classify a rect into a column zone.
    ///
    /// The decision order matters: downstream strict-mode and extension
    /// rules depend on exactly this tree.
    pub fn zone_of(&self, rect: &Rect) -> ColumnZone {
        if rect.width() > 0.6 * self.page_width {
            return ColumnZone::Full;
        }
        if rect.x0 < self.mid_x - 10.0 && rect.x1 > self.mid_x + 10.0 {
            return ColumnZone::Mixed;
        }
        if rect.x1 < self.mid_x {
            return ColumnZone::Left;
        }
        if rect.x0 > self.mid_x {
            return ColumnZone::Right;
        }
        if rect.center_x() < self.mid_x {
            ColumnZone::Left
        } else {
            ColumnZone::Right
        }
    }

    /// Caption zone, with left/right forced to the centroid side when the
    /// gutter guard is up. Full and mixed captions keep their zone.
    pub fn caption_zone(&self, rect: &Rect) -> ColumnZone {
        let zone = self.zone_of(rect);
        if self.guard && matches!(zone, ColumnZone::Left | ColumnZone::Right) {
            if rect.center_x() < self.mid_x {
                ColumnZone::Left
            } else {
                ColumnZone::Right
            }
        } else {
            zone
        }
    }
}

fn stripped_len(text: &str) -> usize {
    text.trim().chars().count()
}

/// Infer the gutter midline and whether the gutter guard is active.
pub fn analyze_columns(page: &PageContent, captions: &[Caption]) -> ColumnLayout {
    let page_w = page.rect.x1 - page.rect.x0;
    let mid_x = infer_mid_x(page, page_w);
    let guard = guard_active(page, captions, mid_x);

    ColumnLayout {
        mid_x,
        guard,
        page_width: page_w,
    }
}

/// Midline from the text-block silhouette: rightmost extent of left-column
/// blocks vs leftmost extent of right-column blocks. Falls back to the page
/// center when either side lacks evidence.
fn infer_mid_x(page: &PageContent, page_w: f64) -> f64 {
    let mut left_edges: Vec<f64> = Vec::new();
    let mut right_edges: Vec<f64> = Vec::new();

    for block in &page.blocks {
        if stripped_len(&block.text()) <= 30 {
            continue;
        }
        if block.rect.x1 < 0.55 * page_w {
            left_edges.push(block.rect.x1);
        }
        if block.rect.x0 > 0.45 * page_w {
            right_edges.push(block.rect.x0);
        }
    }

    if left_edges.len() > 2 && right_edges.len() > 2 {
        let left_max = left_edges.iter().copied().fold(f64::MIN, f64::max);
        let right_min = right_edges.iter().copied().fold(f64::MAX, f64::min);
        (left_max + right_min) / 2.0
    } else {
        page_w / 2.0
    }
}

fn guard_active(page: &PageContent, captions: &[Caption], mid_x: f64) -> bool {
    // Primary signal: substantial body text strictly on both sides.
    let mut left_count = 0usize;
    let mut right_count = 0usize;
    for block in &page.blocks {
        if stripped_len(&block.text()) <= 50 {
            continue;
        }
        if block.rect.x1 < mid_x {
            left_count += 1;
        } else if block.rect.x0 > mid_x {
            right_count += 1;
        }
    }
    if left_count > 1 && right_count > 1 {
        return true;
    }

    // Secondary signal: a caption in each column at roughly the same height
    // (two side-by-side figures).
    let full_captions: Vec<&Caption> = captions
        .iter()
        .filter(|c| c.kind == CaptionKind::Caption)
        .collect();
    for a in &full_captions {
        if a.rect.x1 >= mid_x {
            continue;
        }
        for b in &full_captions {
            if b.rect.x0 <= mid_x {
                continue;
            }
            if (a.rect.y0 - b.rect.y0).abs() < 300.0 {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{TextBlock, TextLine, TextSpan};

    fn make_block(text: &str, rect: Rect) -> TextBlock {
        TextBlock {
            rect,
            lines: vec![TextLine {
                rect,
                spans: vec![TextSpan {
                    rect,
                    text: text.to_string(),
                }],
            }],
        }
    }

    fn two_column_page() -> PageContent {
        let mut page = PageContent::new(Rect::new(0.0, 0.0, 612.0, 792.0));
        let body = "m".repeat(120);
        for i in 0..3 {
            let y = 400.0 + 80.0 * i as f64;
            page.blocks
                .push(make_block(&body, Rect::new(50.0, y, 290.0, y + 60.0)));
            page.blocks
                .push(make_block(&body, Rect::new(322.0, y, 562.0, y + 60.0)));
        }
        page
    }

    #[test]
    fn test_mid_x_from_columns() {
        let page = two_column_page();
        let layout = analyze_columns(&page, &[]);
        assert!((layout.mid_x - 306.0).abs() < 1.0);
        assert!(layout.guard);
    }

    #[test]
    fn test_mid_x_default_single_column() {
        let mut page = PageContent::new(Rect::new(0.0, 0.0, 612.0, 792.0));
        let body = "m".repeat(120);
        page.blocks
            .push(make_block(&body, Rect::new(72.0, 100.0, 540.0, 400.0)));
        let layout = analyze_columns(&page, &[]);
        assert_eq!(layout.mid_x, 306.0);
        assert!(!layout.guard);
    }

    #[test]
    fn test_guard_from_caption_pair() {
        let mut page = PageContent::new(Rect::new(0.0, 0.0, 612.0, 792.0));
        let captions = vec![
            Caption {
                block: 0,
                text: "Figure 1: a".into(),
                rect: Rect::new(50.0, 310.0, 200.0, 325.0),
                kind: CaptionKind::Caption,
            },
            Caption {
                block: 1,
                text: "Figure 2: b".into(),
                rect: Rect::new(340.0, 310.0, 490.0, 325.0),
                kind: CaptionKind::Caption,
            },
        ];
        page.blocks.push(make_block("Figure 1: a", captions[0].rect));
        page.blocks.push(make_block("Figure 2: b", captions[1].rect));

        let layout = analyze_columns(&page, &captions);
        assert!(layout.guard);
    }

    #[test]
    fn test_zone_classification() {
        let layout = ColumnLayout {
            mid_x: 306.0,
            guard: false,
            page_width: 612.0,
        };
        assert_eq!(layout.zone_of(&Rect::new(50.0, 0.0, 280.0, 10.0)), ColumnZone::Left);
        assert_eq!(layout.zone_of(&Rect::new(340.0, 0.0, 560.0, 10.0)), ColumnZone::Right);
        assert_eq!(layout.zone_of(&Rect::new(50.0, 0.0, 560.0, 10.0)), ColumnZone::Full);
        assert_eq!(layout.zone_of(&Rect::new(200.0, 0.0, 400.0, 10.0)), ColumnZone::Mixed);
        // Touching the midline without straddling by 10: centroid decides
        assert_eq!(layout.zone_of(&Rect::new(298.0, 0.0, 310.0, 10.0)), ColumnZone::Left);
    }
}
