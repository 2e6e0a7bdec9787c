use crate::geometry::Rect;
use crate::layout::ColumnLayout;
use crate::settings::FigureSettings;

/// Two rects are close when they overlap or sit within `threshold` points
/// on both axes.
pub fn rects_are_close(a: &Rect, b: &Rect, threshold: f64) -> bool {
    a.x_gap(b) <= threshold && a.y_gap(b) <= threshold
}

/// Merge rects into proximity clusters.
///
/// Greedy union to a fixpoint: pick a rect, absorb everything close to the
/// growing union, repeat until a full pass changes nothing. The fixpoint
/// makes the result independent of input order and idempotent.
pub fn merge_rects(rects: &[Rect], threshold: f64) -> Vec<Rect> {
    merge_rects_with(rects, threshold, |_, _| false)
}

/// `merge_rects` with a veto predicate; a pair for which the veto returns
/// true is never unioned directly (it may still end up in one cluster via
/// an intermediate rect).
pub fn merge_rects_with<F>(rects: &[Rect], threshold: f64, veto: F) -> Vec<Rect>
where
    F: Fn(&Rect, &Rect) -> bool,
{
    let mut clusters: Vec<Rect> = rects.to_vec();
    let mut changed = true;

    while changed {
        changed = false;
        let mut pending = std::mem::take(&mut clusters);
        while !pending.is_empty() {
            let mut current = pending.remove(0);
            let mut i = 0;
            while i < pending.len() {
                let candidate = pending[i];
                if rects_are_close(&current, &candidate, threshold)
                    && !veto(&current, &candidate)
                {
                    current = current | candidate;
                    pending.remove(i);
                    changed = true;
                } else {
                    i += 1;
                }
            }
            clusters.push(current);
        }
    }

    clusters
}

/// The gutter veto: centroids on opposite sides of the midline may not merge
/// while the guard is up.
pub fn gutter_veto(layout: &ColumnLayout) -> impl Fn(&Rect, &Rect) -> bool + '_ {
    move |a: &Rect, b: &Rect| {
        layout.guard && (a.center_x() < layout.mid_x) != (b.center_x() < layout.mid_x)
    }
}

/// Build the page's visual objects.
///
/// Pass A clusters the drawing rects tightly. Pass B grows each cluster with
/// nearby label material (span rects and label captions, each consumed at
/// most once, never across a strict body-text block), then re-clusters
/// permissively under the gutter veto.
pub fn build_visual_objects(
    drawing_rects: &[Rect],
    text_rects: &[Rect],
    label_rects: &[Rect],
    strict_blocks: &[Rect],
    layout: &ColumnLayout,
    settings: &FigureSettings,
) -> Vec<Rect> {
    if drawing_rects.is_empty() {
        return Vec::new();
    }

    let clusters = merge_rects(drawing_rects, settings.cluster_tight);

    let absorbable: Vec<Rect> = text_rects
        .iter()
        .chain(label_rects.iter())
        .copied()
        .collect();
    let blocked: Vec<bool> = absorbable
        .iter()
        .map(|r| strict_blocks.iter().any(|s| r.intersects(s)))
        .collect();
    let mut consumed = vec![false; absorbable.len()];

    let mut grown = Vec::with_capacity(clusters.len());
    for cluster in clusters {
        let mut current = cluster;
        for (i, t) in absorbable.iter().enumerate() {
            if consumed[i] || blocked[i] {
                continue;
            }
            if rects_are_close(&current, t, settings.label_absorb) {
                current = current | *t;
                consumed[i] = true;
            }
        }
        grown.push(current);
    }

    merge_rects_with(&grown, settings.cluster_loose, gutter_veto(layout))
}
