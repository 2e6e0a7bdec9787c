use serde::Serialize;

use crate::captions::{starts_like_caption, Caption};
use crate::content::PageContent;
use crate::geometry::Rect;
use crate::settings::FigureSettings;

/// One text line flattened out of the block tree, the granularity at which
/// the eraser works.
#[derive(Debug, Clone, Serialize)]
pub struct LineInfo {
    pub rect: Rect,
    pub text: String,
    /// Stripped character count.
    pub len: usize,
}

/// The text-derived views consumed by the rest of the pipeline.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TextIndex {
    /// Span rects that may be sub-figure labels or axis annotations.
    pub text_rects: Vec<Rect>,
    /// Every line on the page, for erasure decisions.
    pub lines: Vec<LineInfo>,
    /// Long paragraph blocks that push figure ceilings down.
    pub obstacles: Vec<Rect>,
    /// Blocks confidently classified as body text; merges may not cross them.
    pub strict_blocks: Vec<Rect>,
}

/// Collect the rects the clusterer runs on: visible vector paths first, then
/// embedded images larger than 1x1 pt. Input order is preserved and nothing
/// is deduplicated.
pub fn harvest_drawings(page: &PageContent) -> Vec<Rect> {
    let mut rects: Vec<Rect> = page
        .drawings
        .iter()
        .filter(|p| p.is_visible())
        .map(|p| p.rect)
        .collect();

    rects.extend(
        page.images
            .iter()
            .filter(|i| i.rect.width() > 1.0 && i.rect.height() > 1.0)
            .map(|i| i.rect),
    );

    rects
}

fn stripped_len(text: &str) -> usize {
    text.trim().chars().count()
}

/// Build the text views of the page.
///
/// `captions` must be the full detection result for the same page: span rects
/// overlapping a caption are not label candidates, and caption blocks are
/// exempt from obstacle promotion.
pub fn harvest_text(
    page: &PageContent,
    captions: &[Caption],
    settings: &FigureSettings,
) -> TextIndex {
    let mut index = TextIndex::default();

    let caption_blocks: Vec<usize> = captions.iter().map(|c| c.block).collect();
    let page_h = page.rect.y1;

    for (bi, block) in page.blocks.iter().enumerate() {
        let block_text = block.text();
        let block_len = stripped_len(&block_text);

        for line in &block.lines {
            let text = line.text();
            index.lines.push(LineInfo {
                rect: line.rect,
                len: stripped_len(&text),
                text,
            });

            for span in &line.spans {
                // Not a label candidate if it sits inside a caption or in
                // the running header/footer margins.
                if captions.iter().any(|c| span.rect.intersects(&c.rect)) {
                    continue;
                }
                if span.rect.y0 < settings.margin_exclude
                    || span.rect.y1 > page_h - settings.margin_exclude
                {
                    continue;
                }
                index.text_rects.push(span.rect);
            }
        }

        // Blocks that open like "Figure N" are never treated as body text,
        // however long the caption runs.
        if starts_like_caption(&block_text) {
            continue;
        }

        if block_len > settings.obstacle_min_len {
            index.obstacles.push(block.rect);
            index.strict_blocks.push(block.rect);
        } else if block_len > settings.strict_min_len && !caption_blocks.contains(&bi) {
            index.strict_blocks.push(block.rect);
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captions::detect_captions;
    use crate::content::{Color, ImageRect, TextBlock, TextLine, TextSpan, VectorPath};

    fn page_with_blocks(blocks: Vec<TextBlock>) -> PageContent {
        let mut page = PageContent::new(Rect::new(0.0, 0.0, 612.0, 792.0));
        page.blocks = blocks;
        page
    }

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

    #[test]
    fn test_harvest_drawings_filters() {
        let mut page = PageContent::new(Rect::new(0.0, 0.0, 612.0, 792.0));
        page.drawings = vec![
            VectorPath {
                rect: Rect::new(10.0, 10.0, 100.0, 100.0),
                stroke: Some(Color::Gray(0.0)),
                fill: None,
            },
            // white-only: dropped
            VectorPath {
                rect: Rect::new(10.0, 10.0, 100.0, 100.0),
                stroke: None,
                fill: Some(Color::Rgb(1.0, 1.0, 1.0)),
            },
        ];
        page.images = vec![
            ImageRect {
                rect: Rect::new(200.0, 200.0, 300.0, 300.0),
                id: 0,
            },
            // degenerate sliver: dropped
            ImageRect {
                rect: Rect::new(0.0, 0.0, 0.5, 50.0),
                id: 1,
            },
        ];

        let rects = harvest_drawings(&page);
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0], Rect::new(10.0, 10.0, 100.0, 100.0));
        assert_eq!(rects[1], Rect::new(200.0, 200.0, 300.0, 300.0));
    }

    #[test]
    fn test_obstacle_and_strict_classification() {
        let long_text = "x".repeat(200);
        let medium_text = "y".repeat(80);
        let caption_text = format!("Figure 4: {}", "z".repeat(180));

        let page = page_with_blocks(vec![
            make_block(&long_text, Rect::new(50.0, 100.0, 300.0, 160.0)),
            make_block(&medium_text, Rect::new(50.0, 200.0, 300.0, 230.0)),
            make_block(&caption_text, Rect::new(50.0, 400.0, 300.0, 440.0)),
            make_block("short", Rect::new(50.0, 500.0, 90.0, 512.0)),
        ]);
        let captions = detect_captions(&page.blocks);
        let index = harvest_text(&page, &captions, &FigureSettings::default());

        // Paragraph is both obstacle and strict; medium block strict only;
        // the long caption is exempt despite its length.
        assert_eq!(index.obstacles, vec![Rect::new(50.0, 100.0, 300.0, 160.0)]);
        assert_eq!(
            index.strict_blocks,
            vec![
                Rect::new(50.0, 100.0, 300.0, 160.0),
                Rect::new(50.0, 200.0, 300.0, 230.0),
            ]
        );
    }

    #[test]
    fn test_text_rect_exclusions() {
        let page = page_with_blocks(vec![
            // In the top margin: excluded
            make_block("hdr", Rect::new(50.0, 20.0, 90.0, 32.0)),
            // Body span: kept
            make_block("(a)", Rect::new(80.0, 220.0, 95.0, 232.0)),
            // Caption block: its own span intersects the caption rect
            make_block("Figure 1: overview", Rect::new(50.0, 320.0, 250.0, 335.0)),
        ]);
        let captions = detect_captions(&page.blocks);
        let index = harvest_text(&page, &captions, &FigureSettings::default());

        // "(a)" is itself a detected label caption, so its span is excluded
        // too; only spans clear of captions and margins survive.
        assert!(index.text_rects.is_empty());

        // Lines view keeps everything
        assert_eq!(index.lines.len(), 3);
    }
}
