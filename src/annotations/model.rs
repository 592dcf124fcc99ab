//! Annotation data model: markers anchored in percentage space over a chart.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl AnnotationSize {
    /// Marker radius / font size in pixels at 1x.
    pub fn pixels(&self) -> u32 {
        match self {
            AnnotationSize::Small => 8,
            AnnotationSize::Medium => 12,
            AnnotationSize::Large => 18,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowheadStyle {
    #[default]
    Filled,
    Outline,
    None,
}

/// Tool that places the next annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationTool {
    Highlight,
    Text,
    Arrow,
    Freehand,
    Rectangle,
}

/// Point in percentage coordinates (0..100 of the overlay).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentPoint {
    pub x: f64,
    pub y: f64,
}

impl PercentPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &PercentPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Variant-specific geometry. Serialized with a `type` discriminant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum AnnotationShape {
    Highlight {
        x: f64,
        y: f64,
        size: AnnotationSize,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        size: AnnotationSize,
        has_background: bool,
    },
    Arrow {
        start_x: f64,
        start_y: f64,
        end_x: f64,
        end_y: f64,
        size: AnnotationSize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line_style: Option<LineStyle>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        arrowhead_style: Option<ArrowheadStyle>,
    },
    Freehand {
        points: Vec<PercentPoint>,
        stroke_width: f64,
    },
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        stroke_width: f64,
    },
}

impl AnnotationShape {
    pub fn kind(&self) -> AnnotationTool {
        match self {
            AnnotationShape::Highlight { .. } => AnnotationTool::Highlight,
            AnnotationShape::Text { .. } => AnnotationTool::Text,
            AnnotationShape::Arrow { .. } => AnnotationTool::Arrow,
            AnnotationShape::Freehand { .. } => AnnotationTool::Freehand,
            AnnotationShape::Rectangle { .. } => AnnotationTool::Rectangle,
        }
    }
}

/// A marker drawn over the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    /// `#rrggbb`
    pub color: String,
    /// 0..=100
    pub opacity: u8,
    #[serde(flatten)]
    pub shape: AnnotationShape,
}

/// Partial update for one annotation. Fields left `None` keep their value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationPatch {
    pub color: Option<String>,
    pub opacity: Option<u8>,
    pub shape: Option<ShapePatch>,
}

/// Variant-specific partial update. Applied only when it matches the target's variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapePatch {
    Highlight {
        x: Option<f64>,
        y: Option<f64>,
        size: Option<AnnotationSize>,
    },
    Text {
        text: Option<String>,
        x: Option<f64>,
        y: Option<f64>,
        size: Option<AnnotationSize>,
        has_background: Option<bool>,
    },
    Arrow {
        start: Option<PercentPoint>,
        end: Option<PercentPoint>,
        size: Option<AnnotationSize>,
        line_style: Option<LineStyle>,
        arrowhead_style: Option<ArrowheadStyle>,
    },
    Freehand {
        points: Option<Vec<PercentPoint>>,
        stroke_width: Option<f64>,
    },
    Rectangle {
        x: Option<f64>,
        y: Option<f64>,
        width: Option<f64>,
        height: Option<f64>,
        stroke_width: Option<f64>,
    },
}

impl AnnotationPatch {
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Default::default()
        }
    }

    pub fn opacity(opacity: u8) -> Self {
        Self {
            opacity: Some(opacity),
            ..Default::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            shape: Some(ShapePatch::Text {
                text: Some(text.into()),
                x: None,
                y: None,
                size: None,
                has_background: None,
            }),
            ..Default::default()
        }
    }

    /// Merge into `target`. The variant of `target` never changes.
    pub fn apply_to(&self, target: &mut Annotation) {
        if let Some(c) = &self.color {
            target.color = c.clone();
        }
        if let Some(o) = self.opacity {
            target.opacity = o.min(100);
        }
        let Some(patch) = &self.shape else {
            return;
        };
        match (&mut target.shape, patch) {
            (
                AnnotationShape::Highlight { x, y, size },
                ShapePatch::Highlight {
                    x: px,
                    y: py,
                    size: ps,
                },
            ) => {
                set(x, *px);
                set(y, *py);
                set(size, *ps);
            }
            (
                AnnotationShape::Text {
                    text,
                    x,
                    y,
                    size,
                    has_background,
                },
                ShapePatch::Text {
                    text: pt,
                    x: px,
                    y: py,
                    size: ps,
                    has_background: pb,
                },
            ) => {
                if let Some(t) = pt {
                    *text = t.clone();
                }
                set(x, *px);
                set(y, *py);
                set(size, *ps);
                set(has_background, *pb);
            }
            (
                AnnotationShape::Arrow {
                    start_x,
                    start_y,
                    end_x,
                    end_y,
                    size,
                    line_style,
                    arrowhead_style,
                },
                ShapePatch::Arrow {
                    start,
                    end,
                    size: ps,
                    line_style: pl,
                    arrowhead_style: pa,
                },
            ) => {
                if let Some(s) = start {
                    *start_x = s.x;
                    *start_y = s.y;
                }
                if let Some(e) = end {
                    *end_x = e.x;
                    *end_y = e.y;
                }
                set(size, *ps);
                if pl.is_some() {
                    *line_style = *pl;
                }
                if pa.is_some() {
                    *arrowhead_style = *pa;
                }
            }
            (
                AnnotationShape::Freehand {
                    points,
                    stroke_width,
                },
                ShapePatch::Freehand {
                    points: pp,
                    stroke_width: pw,
                },
            ) => {
                if let Some(p) = pp {
                    *points = p.clone();
                }
                set(stroke_width, *pw);
            }
            (
                AnnotationShape::Rectangle {
                    x,
                    y,
                    width,
                    height,
                    stroke_width,
                },
                ShapePatch::Rectangle {
                    x: px,
                    y: py,
                    width: pw,
                    height: ph,
                    stroke_width: ps,
                },
            ) => {
                set(x, *px);
                set(y, *py);
                set(width, *pw);
                set(height, *ph);
                set(stroke_width, *ps);
            }
            (shape, _) => {
                log::debug!("ignoring shape patch for mismatched {:?} annotation", shape.kind());
            }
        }
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// Load annotations from a JSON array (as saved by the overlay).
pub fn parse_annotations(json: &str) -> serde_json::Result<Vec<Annotation>> {
    serde_json::from_str(json)
}
