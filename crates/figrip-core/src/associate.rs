use std::collections::HashSet;

use serde::Serialize;

use crate::captions::{Caption, CaptionKind};
use crate::geometry::{union_of, Rect};
use crate::harvest::TextIndex;
use crate::layout::{ColumnLayout, ColumnZone};
use crate::settings::FigureSettings;

/// A caption together with its assigned visual objects and the final padded
/// crop region.
#[derive(Debug, Clone, Serialize)]
pub struct CaptionGroup {
    /// Index into the caption list handed to `associate_captions`.
    pub caption: usize,
    pub region: Rect,
    /// Indices into the visual-object list.
    pub objects: Vec<usize>,
}

/// Result of caption association for one page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Association {
    pub groups: Vec<CaptionGroup>,
    /// Visual objects claimed by some caption.
    pub used: HashSet<usize>,
    /// Captions that captured at least one object.
    pub filled: HashSet<usize>,
}

/// Per-column ceilings: the y coordinate above which the current figure may
/// not reach. Each caption seals its zone for the captions below it.
#[derive(Debug, Clone, Copy)]
struct Ceilings {
    left: f64,
    right: f64,
    full: f64,
    mixed: f64,
}

impl Ceilings {
    fn new(top: f64) -> Self {
        Self {
            left: top,
            right: top,
            full: top,
            mixed: top,
        }
    }

    /// Base ceiling for a caption zone. Full-width history always applies;
    /// a mixed caption additionally respects both column histories.
    fn base_for(&self, zone: ColumnZone) -> f64 {
        match zone {
            ColumnZone::Left => self.left.max(self.full),
            ColumnZone::Right => self.right.max(self.full),
            ColumnZone::Full => self.full,
            ColumnZone::Mixed => self.mixed.max(self.full).max(self.left).max(self.right),
        }
    }

    fn update(&mut self, zone: ColumnZone, y: f64) {
        match zone {
            ColumnZone::Left => self.left = y,
            ColumnZone::Right => self.right = y,
            ColumnZone::Full => self.full = y,
            ColumnZone::Mixed => {
                self.left = y;
                self.right = y;
                self.mixed = y;
            }
        }
    }
}

/// May an object in `object` zone belong to a caption in `caption` zone?
/// Strict mode (gutter guard, single-column caption) accepts only the exact
/// column; otherwise full/mixed objects are acceptable everywhere.
fn zone_compatible(object: ColumnZone, caption: ColumnZone, strict: bool) -> bool {
    match caption {
        ColumnZone::Full | ColumnZone::Mixed => true,
        ColumnZone::Left => {
            if strict {
                object == ColumnZone::Left
            } else {
                matches!(object, ColumnZone::Left | ColumnZone::Full | ColumnZone::Mixed)
            }
        }
        ColumnZone::Right => {
            if strict {
                object == ColumnZone::Right
            } else {
                matches!(object, ColumnZone::Right | ColumnZone::Full | ColumnZone::Mixed)
            }
        }
    }
}

/// Signed directional distance on the x axis: positive gap when disjoint,
/// negative overlap depth otherwise.
fn x_dist(a: &Rect, b: &Rect) -> f64 {
    (b.x0 - a.x1).max(a.x0 - b.x1)
}

fn y_dist(a: &Rect, b: &Rect) -> f64 {
    (b.y0 - a.y1).max(a.y0 - b.y1)
}

/// The corridor a merge of `a` and `b` would sweep across: per axis, the
/// open interval between the rects when disjoint, their overlap otherwise.
fn gap_box(a: &Rect, b: &Rect) -> Rect {
    let (gx0, gx1) = if x_dist(a, b) > 0.0 {
        (a.x1.min(b.x1), a.x0.max(b.x0))
    } else {
        (a.x0.max(b.x0), a.x1.min(b.x1))
    };
    let (gy0, gy1) = if y_dist(a, b) > 0.0 {
        (a.y1.min(b.y1), a.y0.max(b.y0))
    } else {
        (a.y0.max(b.y0), a.y1.min(b.y1))
    };
    Rect::new(gx0, gy0, gx1, gy1)
}

/// Assign visual objects to captions by vertical partitioning.
///
/// Captions are visited top to bottom; each claims the unused objects whose
/// centroid falls between its column ceiling and its own top edge, grows the
/// claim through aligned expansion, and then seals its column for the
/// captions below. The iteration order encodes the ceiling semantics and
/// must not change.
pub fn associate_captions(
    objects: &[Rect],
    captions: &[Caption],
    layout: &ColumnLayout,
    text: &TextIndex,
    page: &Rect,
    settings: &FigureSettings,
) -> Association {
    let mut assoc = Association::default();
    let mut ceilings = Ceilings::new(settings.margin_exclude);

    let label_rects: Vec<Rect> = captions
        .iter()
        .filter(|c| c.kind == CaptionKind::Label)
        .map(|c| c.rect)
        .collect();

    let mut main_order: Vec<usize> = (0..captions.len())
        .filter(|&i| captions[i].kind == CaptionKind::Caption)
        .collect();
    main_order.sort_by(|&a, &b| captions[a].rect.y0.total_cmp(&captions[b].rect.y0));

    for ci in main_order {
        let cap = &captions[ci];
        let czone = layout.caption_zone(&cap.rect);
        let strict = layout.guard && matches!(czone, ColumnZone::Left | ColumnZone::Right);

        let floor_y = cap.rect.y0;
        let mut ceiling_y = ceilings.base_for(czone);

        // Paragraphs sitting between the ceiling and this caption push the
        // ceiling down: a figure never reaches up across body text.
        for obs in &text.obstacles {
            if !zone_compatible(layout.zone_of(obs), czone, false) {
                continue;
            }
            if obs.y1 < floor_y && obs.y1 > ceiling_y {
                ceiling_y = obs.y1;
            }
        }

        // Primary pick: unused objects whose centroid is inside the zone.
        let mut members: Vec<usize> = Vec::new();
        for (i, obj) in objects.iter().enumerate() {
            if assoc.used.contains(&i) {
                continue;
            }
            let cy = obj.center_y();
            if cy <= ceiling_y || cy >= floor_y {
                continue;
            }
            if !zone_compatible(layout.zone_of(obj), czone, strict) {
                continue;
            }
            members.push(i);
        }

        if members.is_empty() {
            ceilings.update(czone, cap.rect.y1);
            continue;
        }
        for &i in &members {
            assoc.used.insert(i);
        }
        let mut union = union_of(&members.iter().map(|&i| objects[i]).collect::<Vec<_>>())
            .expect("members is non-empty");

        // Aligned expansion: absorb y-aligned unused objects (side panels of
        // the same figure) until stable.
        loop {
            let mut changed = false;
            for (i, obj) in objects.iter().enumerate() {
                if assoc.used.contains(&i) {
                    continue;
                }
                if obj.y_overlap(&union) < 0.5 * obj.height() {
                    continue;
                }

                let dx = x_dist(&union, obj);
                let dy = y_dist(&union, obj);
                let dist = dx.max(dy);

                let labels_near = label_rects.iter().any(|l| {
                    l.gap(&union) <= settings.label_radius || l.gap(obj) <= settings.label_radius
                });
                let reach = if labels_near {
                    settings.expand_labelled
                } else {
                    settings.expand_near
                };

                let qualifies = if dx > 0.0 && dy <= 0.0 {
                    dx < reach
                } else if dy > 0.0 && dx <= 0.0 {
                    dy < settings.expand_vertical
                } else if dx > 0.0 && dy > 0.0 {
                    dist < reach
                } else {
                    false
                };
                if !qualifies {
                    continue;
                }

                // Hard veto: never merge across an active gutter.
                if layout.guard
                    && (union.center_x() < layout.mid_x) != (obj.center_x() < layout.mid_x)
                {
                    continue;
                }
                // Soft veto: a long reach may not sweep across body text.
                if dist > 25.0 {
                    let corridor = gap_box(&union, obj);
                    if !corridor.is_empty()
                        && text.strict_blocks.iter().any(|s| corridor.intersects(s))
                    {
                        continue;
                    }
                }

                union = union | *obj;
                assoc.used.insert(i);
                members.push(i);
                changed = true;
            }
            if !changed {
                break;
            }
        }

        // Pad, trim against caption and ceiling, clip to the page.
        let mut pad_right = settings.pad_x;
        if layout.guard && layout.zone_of(&union) == ColumnZone::Left {
            let reaches_edge = members.iter().any(|&i| objects[i].x1 >= union.x1 - 30.0);
            if reaches_edge {
                let ext = layout.mid_x - union.x1 - 10.0;
                if ext > pad_right {
                    pad_right = ext;
                }
            }
        }

        let mut region = Rect::new(
            union.x0 - settings.pad_x,
            union.y0 - settings.pad_y,
            union.x1 + pad_right,
            union.y1 + settings.pad_y,
        );
        region.y1 = region.y1.min(floor_y - 5.0);
        region.y0 = region.y0.max((ceiling_y - 10.0).max(settings.margin_exclude));

        match region.intersection(page) {
            Some(clipped) => {
                assoc.groups.push(CaptionGroup {
                    caption: ci,
                    region: clipped,
                    objects: members,
                });
                assoc.filled.insert(ci);
            }
            None => {
                log::debug!("caption group for caption {ci} collapsed to an empty region");
            }
        }

        ceilings.update(czone, cap.rect.y1);
    }

    assoc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caption(text: &str, rect: Rect) -> Caption {
        Caption {
            block: 0,
            text: text.into(),
            rect,
            kind: CaptionKind::Caption,
        }
    }

    fn label(rect: Rect) -> Caption {
        Caption {
            block: 0,
            text: "(a)".into(),
            rect,
            kind: CaptionKind::Label,
        }
    }

    fn layout(mid_x: f64, guard: bool) -> ColumnLayout {
        ColumnLayout {
            mid_x,
            guard,
            page_width: 612.0,
        }
    }

    const PAGE: Rect = Rect {
        x0: 0.0,
        y0: 0.0,
        x1: 612.0,
        y1: 792.0,
    };

    #[test]
    fn test_single_caption_claims_object_above() {
        let objects = vec![Rect::new(100.0, 100.0, 300.0, 300.0)];
        let captions = vec![caption("Figure 1: foo", Rect::new(100.0, 310.0, 250.0, 325.0))];
        let assoc = associate_captions(
            &objects,
            &captions,
            &layout(306.0, false),
            &TextIndex::default(),
            &PAGE,
            &FigureSettings::default(),
        );

        assert_eq!(assoc.groups.len(), 1);
        let region = assoc.groups[0].region;
        assert!(region.contains(&objects[0]));
        assert!(region.y1 <= 305.0);
        assert!(assoc.used.contains(&0));
    }

    #[test]
    fn test_guard_keeps_columns_separate() {
        let objects = vec![
            Rect::new(50.0, 100.0, 280.0, 300.0),
            Rect::new(340.0, 100.0, 560.0, 300.0),
        ];
        let captions = vec![
            caption("Figure 1: a", Rect::new(50.0, 310.0, 200.0, 325.0)),
            caption("Figure 2: b", Rect::new(340.0, 310.0, 490.0, 325.0)),
        ];
        let assoc = associate_captions(
            &objects,
            &captions,
            &layout(306.0, true),
            &TextIndex::default(),
            &PAGE,
            &FigureSettings::default(),
        );

        assert_eq!(assoc.groups.len(), 2);
        for group in &assoc.groups {
            assert_eq!(group.objects.len(), 1);
            let r = group.region;
            assert!(r.x1 <= 306.0 || r.x0 >= 306.0, "region crosses gutter: {r:?}");
        }
    }

    #[test]
    fn test_obstacle_raises_ceiling() {
        let objects = vec![Rect::new(50.0, 300.0, 400.0, 500.0)];
        let captions = vec![caption("Figure 1: x", Rect::new(50.0, 510.0, 250.0, 525.0))];
        let mut text = TextIndex::default();
        text.obstacles.push(Rect::new(50.0, 260.0, 400.0, 295.0));

        let assoc = associate_captions(
            &objects,
            &captions,
            &layout(306.0, false),
            &text,
            &PAGE,
            &FigureSettings::default(),
        );

        assert_eq!(assoc.groups.len(), 1);
        // Padding would reach 276; the obstacle pins the top to 295 - 10.
        assert_eq!(assoc.groups[0].region.y0, 285.0);
    }

    #[test]
    fn test_multi_panel_expansion_with_labels() {
        // The right panel sits in the right column (never a primary pick for
        // a left caption) 140 pt away: too far for the bare 40 pt reach, but
        // the nearby label widens it to 150.
        let objects = vec![
            Rect::new(50.0, 100.0, 180.0, 220.0),
            Rect::new(320.0, 100.0, 450.0, 220.0),
        ];
        let captions = vec![
            caption("Figure 3: panels", Rect::new(50.0, 235.0, 300.0, 250.0)),
            label(Rect::new(100.0, 222.0, 115.0, 232.0)),
        ];
        let assoc = associate_captions(
            &objects,
            &captions,
            &layout(306.0, false),
            &TextIndex::default(),
            &PAGE,
            &FigureSettings::default(),
        );

        assert_eq!(assoc.groups.len(), 1);
        assert_eq!(assoc.groups[0].objects.len(), 2);
    }

    #[test]
    fn test_expansion_without_labels_is_short_reach() {
        let objects = vec![
            Rect::new(50.0, 100.0, 180.0, 220.0),
            Rect::new(320.0, 100.0, 450.0, 220.0),
        ];
        let captions = vec![caption("Figure 3: panels", Rect::new(50.0, 235.0, 300.0, 250.0))];
        let assoc = associate_captions(
            &objects,
            &captions,
            &layout(306.0, false),
            &TextIndex::default(),
            &PAGE,
            &FigureSettings::default(),
        );

        // Same geometry, no labels anywhere: the 140 pt gap beats the 40 pt
        // reach and the right panel stays unclaimed.
        assert_eq!(assoc.groups.len(), 1);
        assert_eq!(assoc.groups[0].objects, vec![0]);
    }

    #[test]
    fn test_strict_block_vetoes_long_reach() {
        let objects = vec![
            Rect::new(50.0, 100.0, 180.0, 220.0),
            Rect::new(320.0, 100.0, 450.0, 220.0),
        ];
        let captions = vec![
            caption("Figure 3: panels", Rect::new(50.0, 235.0, 160.0, 250.0)),
            label(Rect::new(100.0, 222.0, 115.0, 232.0)),
        ];
        let mut text = TextIndex::default();
        // Body text fills the corridor between the panels.
        text.strict_blocks.push(Rect::new(200.0, 90.0, 300.0, 230.0));

        let assoc = associate_captions(
            &objects,
            &captions,
            &layout(306.0, false),
            &text,
            &PAGE,
            &FigureSettings::default(),
        );

        let group = &assoc.groups[0];
        assert!(
            !group.objects.contains(&1),
            "expansion crossed a strict block"
        );
    }

    #[test]
    fn test_empty_caption_still_seals_zone() {
        // First caption has nothing above it; second caption must not reach
        // above the first one's bottom edge.
        let objects = vec![Rect::new(50.0, 100.0, 280.0, 150.0)];
        let captions = vec![
            caption("Figure 1: empty", Rect::new(50.0, 60.0, 250.0, 80.0)),
            caption("Figure 2: real", Rect::new(50.0, 400.0, 250.0, 415.0)),
        ];
        let assoc = associate_captions(
            &objects,
            &captions,
            &layout(306.0, false),
            &TextIndex::default(),
            &PAGE,
            &FigureSettings::default(),
        );

        // Figure 1 at y0=60 has ceiling 40, floor 60: no centroid fits.
        // Figure 2 claims the object; its ceiling is 80 (caption 1 bottom).
        assert_eq!(assoc.groups.len(), 1);
        assert_eq!(assoc.groups[0].caption, 1);
        assert!(assoc.groups[0].region.y0 >= 70.0);
    }

    #[test]
    fn test_single_column_extension_under_guard() {
        let objects = vec![Rect::new(50.0, 100.0, 240.0, 300.0)];
        let captions = vec![caption("Figure 1: left", Rect::new(50.0, 310.0, 200.0, 325.0))];
        let assoc = associate_captions(
            &objects,
            &captions,
            &layout(306.0, true),
            &TextIndex::default(),
            &PAGE,
            &FigureSettings::default(),
        );

        // mid_x - u.x1 - 10 = 56 > pad_x: the crop runs out to the gutter.
        let region = assoc.groups[0].region;
        assert!((region.x1 - 296.0).abs() < 1e-9);
    }
}
