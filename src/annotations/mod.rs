//! Chart annotations: highlight/text/arrow/freehand/rectangle markers positioned in
//! percentage space over the plot area.
//!
//! - [`model`]: the tagged-union annotation types and partial updates
//! - [`geometry`]: pointer mapping, drags and frame clamping
//! - [`engine`]: the mutable list with selection and one-shot tools

pub mod engine;
pub mod geometry;
pub mod model;

pub use engine::{AnnotationEngine, ToolDefaults};
pub use geometry::{
    ArrowGesture, ClampPolicy, DragHandle, OverlayRect, POSITION_MAX, POSITION_MIN,
};
pub use model::{
    Annotation, AnnotationPatch, AnnotationShape, AnnotationSize, AnnotationTool,
    ArrowheadStyle, LineStyle, PercentPoint, ShapePatch, parse_annotations,
};
