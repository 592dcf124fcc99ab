use super::geometry::{ClampPolicy, DragHandle, DragSession, clamp_position, translate};
use super::model::{
    Annotation, AnnotationPatch, AnnotationShape, AnnotationSize, AnnotationTool, ArrowheadStyle,
    LineStyle, PercentPoint,
};
use crate::ids::generate_id;

/// Style applied to newly placed annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefaults {
    pub color: String,
    pub size: AnnotationSize,
    pub opacity: u8,
    pub stroke_width: f64,
    pub line_style: LineStyle,
    pub arrowhead_style: ArrowheadStyle,
    pub text_background: bool,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            color: "#e84142".into(),
            size: AnnotationSize::Medium,
            opacity: 100,
            stroke_width: 2.0,
            line_style: LineStyle::Solid,
            arrowhead_style: ArrowheadStyle::Filled,
            text_background: true,
        }
    }
}

/// Owns the annotation list, the selection and the active tool.
#[derive(Debug, Clone, Default)]
pub struct AnnotationEngine {
    annotations: Vec<Annotation>,
    selected: Option<String>,
    active_tool: Option<AnnotationTool>,
    defaults: ToolDefaults,
    clamp: ClampPolicy,
    drag: Option<DragSession>,
}

impl AnnotationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clamp_policy(mut self, policy: ClampPolicy) -> Self {
        self.clamp = policy;
        self
    }

    /// Seed the engine with annotations loaded elsewhere (e.g. a JSON file).
    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn get(&self, id: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn active_tool(&self) -> Option<AnnotationTool> {
        self.active_tool
    }

    pub fn defaults(&self) -> &ToolDefaults {
        &self.defaults
    }

    pub fn set_defaults(&mut self, defaults: ToolDefaults) {
        self.defaults = defaults;
    }

    pub fn set_active_tool(&mut self, tool: Option<AnnotationTool>) {
        self.active_tool = tool;
    }

    /// Select an annotation; unknown ids clear the selection.
    pub fn select(&mut self, id: Option<&str>) {
        self.selected = id
            .filter(|id| self.annotations.iter().any(|a| a.id == *id))
            .map(str::to_string);
    }

    fn place(&mut self, shape: AnnotationShape) -> &Annotation {
        let annotation = Annotation {
            id: generate_id("annotation"),
            color: self.defaults.color.clone(),
            opacity: self.defaults.opacity.min(100),
            shape,
        };
        log::debug!("placed {:?} annotation {}", annotation.shape.kind(), annotation.id);
        self.selected = Some(annotation.id.clone());
        // Placement is one-shot.
        self.active_tool = None;
        self.annotations.push(annotation);
        let last = self.annotations.len() - 1;
        &self.annotations[last]
    }

    pub fn add_highlight(&mut self, x: f64, y: f64) -> &Annotation {
        let shape = AnnotationShape::Highlight {
            x: clamp_position(x),
            y: clamp_position(y),
            size: self.defaults.size,
        };
        self.place(shape)
    }

    pub fn add_text(&mut self, x: f64, y: f64, text: Option<&str>) -> &Annotation {
        let shape = AnnotationShape::Text {
            text: text.unwrap_or("Text").to_string(),
            x: clamp_position(x),
            y: clamp_position(y),
            size: self.defaults.size,
            has_background: self.defaults.text_background,
        };
        self.place(shape)
    }

    pub fn add_arrow(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> &Annotation {
        let shape = AnnotationShape::Arrow {
            start_x: clamp_position(x1),
            start_y: clamp_position(y1),
            end_x: clamp_position(x2),
            end_y: clamp_position(y2),
            size: self.defaults.size,
            line_style: Some(self.defaults.line_style),
            arrowhead_style: Some(self.defaults.arrowhead_style),
        };
        self.place(shape)
    }

    /// Freehand stroke. `None` for strokes with fewer than two points.
    pub fn add_freehand(&mut self, points: Vec<PercentPoint>) -> Option<&Annotation> {
        if points.len() < 2 {
            return None;
        }
        let points = if self.clamp.clamp_freeform {
            points
                .into_iter()
                .map(|p| PercentPoint::new(clamp_position(p.x), clamp_position(p.y)))
                .collect()
        } else {
            points
        };
        let shape = AnnotationShape::Freehand {
            points,
            stroke_width: self.defaults.stroke_width,
        };
        Some(self.place(shape))
    }

    pub fn add_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) -> &Annotation {
        let (x, y) = (clamp_position(x), clamp_position(y));
        let (width, height) = if self.clamp.clamp_freeform {
            (width.clamp(0.0, 98.0 - x), height.clamp(0.0, 98.0 - y))
        } else {
            (width.abs(), height.abs())
        };
        let shape = AnnotationShape::Rectangle {
            x,
            y,
            width,
            height,
            stroke_width: self.defaults.stroke_width,
        };
        self.place(shape)
    }

    /// Merge `patch` into the annotation with `id`. Returns false if no entry matched.
    pub fn update_annotation(&mut self, id: &str, patch: &AnnotationPatch) -> bool {
        match self.annotations.iter_mut().find(|a| a.id == id) {
            Some(a) => {
                patch.apply_to(a);
                true
            }
            None => false,
        }
    }

    pub fn delete_annotation(&mut self, id: &str) -> bool {
        let before = self.annotations.len();
        self.annotations.retain(|a| a.id != id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        if self.drag.as_ref().is_some_and(|d| d.annotation_id == id) {
            self.drag = None;
        }
        self.annotations.len() != before
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selected.clone() {
            Some(id) => self.delete_annotation(&id),
            None => false,
        }
    }

    pub fn clear_all_annotations(&mut self) {
        self.annotations.clear();
        self.selected = None;
        self.active_tool = None;
        self.drag = None;
    }

    /// Start dragging `id` from pointer position `pointer`. Selects it.
    pub fn begin_drag(&mut self, id: &str, handle: DragHandle, pointer: PercentPoint) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.selected = Some(id.to_string());
        self.drag = Some(DragSession::start(id, handle, pointer));
        true
    }

    /// Move the dragged annotation by the pointer delta since the last call.
    pub fn drag_to(&mut self, pointer: PercentPoint) -> Option<&Annotation> {
        let drag = self.drag.as_mut()?;
        let (dx, dy) = drag.advance(pointer);
        let (id, handle) = (drag.annotation_id.clone(), drag.handle);
        let policy = self.clamp;
        let a = self.annotations.iter_mut().find(|a| a.id == id)?;
        translate(a, handle, dx, dy, policy);
        Some(&*a)
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Keyboard nudge of the selected annotation.
    pub fn nudge_selected(&mut self, dx: f64, dy: f64) -> bool {
        let Some(id) = self.selected.clone() else {
            return false;
        };
        let policy = self.clamp;
        match self.annotations.iter_mut().find(|a| a.id == id) {
            Some(a) => {
                translate(a, DragHandle::Body, dx, dy, policy);
                true
            }
            None => false,
        }
    }
}
