//! Run the segmentation pipeline on a synthetic two-column page and print
//! the analysis. Useful for eyeballing the associator without a PDF.

use figrip_core::{
    segment_page, Color, FigureSettings, PageContent, Rect, TextBlock, TextLine, TextSpan,
    VectorPath,
};

fn block(text: &str, rect: Rect) -> TextBlock {
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

fn main() {
    let mut page = PageContent::new(Rect::new(0.0, 0.0, 612.0, 792.0));

    // Two figures side by side, one caption each.
    page.drawings.push(VectorPath {
        rect: Rect::new(50.0, 100.0, 280.0, 300.0),
        stroke: Some(Color::Gray(0.0)),
        fill: None,
    });
    page.drawings.push(VectorPath {
        rect: Rect::new(340.0, 100.0, 560.0, 300.0),
        stroke: Some(Color::Gray(0.0)),
        fill: None,
    });
    page.blocks
        .push(block("Figure 1: left panel", Rect::new(50.0, 310.0, 200.0, 325.0)));
    page.blocks
        .push(block("Figure 2: right panel", Rect::new(340.0, 310.0, 490.0, 325.0)));

    // Body text in both columns so the gutter guard engages.
    let body = "lorem ".repeat(30);
    for i in 0..3 {
        let y = 420.0 + 90.0 * i as f64;
        page.blocks.push(block(&body, Rect::new(50.0, y, 280.0, y + 70.0)));
        page.blocks.push(block(&body, Rect::new(332.0, y, 562.0, y + 70.0)));
    }

    let analysis = segment_page(&page, &FigureSettings::default());

    println!(
        "layout: mid_x = {:.1}, guard = {}",
        analysis.layout.mid_x, analysis.layout.guard
    );
    println!("captions: {}", analysis.captions.len());
    for caption in &analysis.captions {
        println!("  {:?} {:?}", caption.kind, caption.text);
    }
    println!("visual objects: {}", analysis.visual_objects.len());
    println!("regions: {}", analysis.regions.len());
    for (k, region) in analysis.regions.iter().enumerate() {
        println!(
            "  Fig {}: ({:.0},{:.0})-({:.0},{:.0}) {}",
            k + 1,
            region.rect.x0,
            region.rect.y0,
            region.rect.x1,
            region.rect.y1,
            region.caption.as_deref().unwrap_or("uncaptioned")
        );
    }
}
