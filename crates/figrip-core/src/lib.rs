pub mod associate;
pub mod captions;
pub mod cluster;
pub mod content;
pub mod emit;
pub mod erase;
pub mod error;
pub mod geometry;
pub mod harvest;
pub mod layout;
pub mod orphans;
pub mod pipeline;
pub mod settings;
pub mod source;
pub mod trim;

pub use content::{Color, ImageRect, PageContent, TextBlock, TextLine, TextSpan, VectorPath};
pub use error::{Error, Result};
pub use geometry::Rect;
pub use layout::{ColumnLayout, ColumnZone};
pub use pipeline::{segment_page, FigureRegion, PageAnalysis};
pub use settings::FigureSettings;
pub use source::DocumentSource;
