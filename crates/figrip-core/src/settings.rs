use serde::{Deserialize, Serialize};

/// Configuration for figure segmentation and emission.
///
/// The defaults are the canonical values of the pipeline; they were tuned on
/// two-column academic papers and rarely need changing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureSettings {
    /// Proximity threshold for the tight clustering pass (default 15.0).
    pub cluster_tight: f64,
    /// Proximity threshold for the permissive re-cluster pass (default 30.0).
    pub cluster_loose: f64,
    /// Distance within which labels and text rects are absorbed (default 15.0).
    pub label_absorb: f64,

    /// Top/bottom page margin excluded from label harvesting (default 40.0).
    pub margin_exclude: f64,
    /// Stripped length above which a block is a paragraph obstacle (default 150).
    pub obstacle_min_len: usize,
    /// Stripped length above which a non-caption block is strict body text (default 50).
    pub strict_min_len: usize,

    /// Horizontal padding applied around an associated group (default 20.0).
    pub pad_x: f64,
    /// Vertical padding applied around an associated group (default 24.0).
    pub pad_y: f64,

    /// Expansion reach without nearby panel labels (default 40.0).
    pub expand_near: f64,
    /// Expansion reach when panel labels are nearby (default 150.0).
    pub expand_labelled: f64,
    /// Vertical expansion reach (default 150.0).
    pub expand_vertical: f64,
    /// Radius within which a label counts as nearby (default 200.0).
    pub label_radius: f64,

    /// Render resolution for emitted figures (default 300).
    pub dpi: f32,
    /// Grayscale threshold under which a pixel counts as content (default 250).
    pub trim_threshold: u8,
    /// Aesthetic pixel margin kept around trimmed content (default 8).
    pub trim_margin: u32,
}

impl Default for FigureSettings {
    fn default() -> Self {
        Self {
            cluster_tight: 15.0,
            cluster_loose: 30.0,
            label_absorb: 15.0,
            margin_exclude: 40.0,
            obstacle_min_len: 150,
            strict_min_len: 50,
            pad_x: 20.0,
            pad_y: 24.0,
            expand_near: 40.0,
            expand_labelled: 150.0,
            expand_vertical: 150.0,
            label_radius: 200.0,
            dpi: 300.0,
            trim_threshold: 250,
            trim_margin: 8,
        }
    }
}
