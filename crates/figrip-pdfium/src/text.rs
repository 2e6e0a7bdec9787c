//! Grouping of pdfium text segments into lines and blocks.
//!
//! Pdfium reports baseline-merged segments but no paragraph structure, so
//! the block tree the pipeline expects is rebuilt geometrically: segments
//! sharing a vertical band form a line, vertically adjacent lines with
//! overlapping x-extents form a block. Two-column pages produce separate
//! blocks per column because cross-column lines never overlap horizontally.

use figrip_core::{TextBlock, TextLine, TextSpan};

/// Group spans into lines by vertical-band overlap.
pub fn spans_to_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    if spans.is_empty() {
        return Vec::new();
    }

    spans.sort_by(|a, b| {
        a.rect
            .y0
            .total_cmp(&b.rect.y0)
            .then_with(|| a.rect.x0.total_cmp(&b.rect.x0))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    for span in spans {
        // Only the most recent lines can still be on this span's row.
        let target = lines
            .iter()
            .enumerate()
            .rev()
            .take(8)
            .find(|(_, line)| {
                let min_h = line.rect.height().min(span.rect.height()).max(1.0);
                // Same vertical band, and horizontally adjacent (a couple of
                // em-widths): a column gutter never qualifies.
                line.rect.y_overlap(&span.rect) >= 0.5 * min_h
                    && line.rect.x_gap(&span.rect) <= 2.0 * min_h
            })
            .map(|(i, _)| i);

        match target {
            Some(i) => {
                lines[i].rect = lines[i].rect | span.rect;
                lines[i].spans.push(span);
            }
            None => {
                lines.push(TextLine {
                    rect: span.rect,
                    spans: vec![span],
                });
            }
        }
    }

    for line in &mut lines {
        line.spans
            .sort_by(|a, b| a.rect.x0.total_cmp(&b.rect.x0));
    }
    lines
}

/// Group lines into paragraph blocks by vertical adjacency.
pub fn lines_to_blocks(mut lines: Vec<TextLine>) -> Vec<TextBlock> {
    if lines.is_empty() {
        return Vec::new();
    }

    lines.sort_by(|a, b| {
        a.rect
            .y0
            .total_cmp(&b.rect.y0)
            .then_with(|| a.rect.x0.total_cmp(&b.rect.x0))
    });

    let mut blocks: Vec<TextBlock> = Vec::new();
    for line in lines {
        // Scan open blocks for one this line continues: x-extents must
        // overlap (same column) and the vertical gap must look like leading,
        // not a paragraph break.
        let mut target: Option<usize> = None;
        for (i, block) in blocks.iter().enumerate() {
            let last = block.lines.last().expect("blocks are never empty");
            let gap = line.rect.y0 - last.rect.y1;
            let leading = (0.75 * line.rect.height()).max(4.0);
            let x_overlap = line.rect.x0 < block.rect.x1 && line.rect.x1 > block.rect.x0;
            if x_overlap && gap <= leading {
                target = Some(i);
            }
        }

        match target {
            Some(i) => {
                blocks[i].rect = blocks[i].rect | line.rect;
                blocks[i].lines.push(line);
            }
            None => {
                blocks.push(TextBlock {
                    rect: line.rect,
                    lines: vec![line],
                });
            }
        }
    }

    blocks
}
