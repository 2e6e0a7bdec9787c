use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::content::TextBlock;
use crate::geometry::Rect;

/// Patterns that flag a text block as a figure caption candidate.
static FIGURE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)figure\s+\d+").unwrap(),
        Regex::new(r"(?i)fig\.?\s+\d+").unwrap(),
        Regex::new(r"\([a-z]\)").unwrap(),
        Regex::new(r"\b[a-z]\)").unwrap(),
    ]
});

/// Matches text that is nothing but panel markers: "(a)", "(b) (c)", ...
static PURE_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\([a-z0-9]+\)\s*)+$").unwrap());

/// Matches the start of a full figure caption: "Figure 3", "Fig. 2", ...
static CAPTION_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(Figure|Fig)\.?\s*\d+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CaptionKind {
    /// A full descriptive caption ("Figure 3: ...") that partitions the page.
    Caption,
    /// A short sub-figure marker ("(a)", "b)") absorbed into visual objects.
    Label,
}

/// A detected caption or sub-figure label.
#[derive(Debug, Clone, Serialize)]
pub struct Caption {
    /// Index of the source block in `PageContent::blocks`.
    pub block: usize,
    pub text: String,
    pub rect: Rect,
    pub kind: CaptionKind,
}

/// Does this text begin like a figure caption ("Figure N", "Fig. N")?
///
/// Shared by the obstacle safety exception and the erasure caption-override.
pub fn starts_like_caption(text: &str) -> bool {
    CAPTION_START.is_match(text.trim_start())
}

fn classify(text: &str) -> CaptionKind {
    let stripped = text.trim();
    if stripped.chars().count() <= 5 || PURE_LABEL.is_match(stripped) {
        CaptionKind::Label
    } else {
        CaptionKind::Caption
    }
}

/// Scan text blocks for figure captions and sub-figure labels.
pub fn detect_captions(blocks: &[TextBlock]) -> Vec<Caption> {
    let mut captions = Vec::new();

    for (i, block) in blocks.iter().enumerate() {
        let text = block.text();
        let stripped = text.trim();
        if stripped.is_empty() {
            continue;
        }
        if FIGURE_PATTERNS.iter().any(|p| p.is_match(stripped)) {
            captions.push(Caption {
                block: i,
                text: stripped.to_string(),
                rect: block.rect,
                kind: classify(stripped),
            });
        }
    }

    captions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{TextLine, TextSpan};

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
    fn test_detects_full_captions() {
        let blocks = vec![
            make_block("Figure 1: The pipeline overview.", Rect::new(50.0, 300.0, 250.0, 315.0)),
            make_block("fig. 2 shows the decay rate", Rect::new(50.0, 500.0, 250.0, 515.0)),
            make_block("Unrelated paragraph about methods.", Rect::new(50.0, 100.0, 250.0, 160.0)),
        ];
        let captions = detect_captions(&blocks);
        assert_eq!(captions.len(), 2);
        assert!(captions.iter().all(|c| c.kind == CaptionKind::Caption));
        assert_eq!(captions[0].block, 0);
    }

    #[test]
    fn test_detects_labels() {
        let blocks = vec![
            make_block("(a)", Rect::new(80.0, 220.0, 95.0, 232.0)),
            make_block("(b) (c)", Rect::new(200.0, 220.0, 240.0, 232.0)),
            make_block("(a1)", Rect::new(300.0, 220.0, 320.0, 232.0)),
        ];
        let captions = detect_captions(&blocks);
        assert_eq!(captions.len(), 3);
        assert!(captions.iter().all(|c| c.kind == CaptionKind::Label));
    }

    #[test]
    fn test_short_caption_is_label_by_length() {
        // <= 5 stripped chars is a label even with a caption-ish shape
        let blocks = vec![make_block("a)", Rect::new(0.0, 0.0, 10.0, 10.0))];
        let captions = detect_captions(&blocks);
        assert_eq!(captions[0].kind, CaptionKind::Label);
    }

    #[test]
    fn test_starts_like_caption() {
        assert!(starts_like_caption("Figure 12: something"));
        assert!(starts_like_caption("Fig. 3 shows"));
        assert!(starts_like_caption("  fig 4"));
        assert!(!starts_like_caption("See Figure 12 for details"));
        assert!(!starts_like_caption("Configure 3 things"));
    }
}
