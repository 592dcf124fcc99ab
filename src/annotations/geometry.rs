//! Pointer-to-percentage mapping, drag handling and frame clamping.

use super::model::{Annotation, AnnotationShape, PercentPoint};

/// Positional fields stay inside `[POSITION_MIN, POSITION_MAX]` so markers remain visible.
pub const POSITION_MIN: f64 = 2.0;
pub const POSITION_MAX: f64 = 98.0;

/// A drag shorter than this (in percentage units) is a click, not an arrow.
pub const MIN_ARROW_LENGTH: f64 = 3.0;

pub fn clamp_position(v: f64) -> f64 {
    v.clamp(POSITION_MIN, POSITION_MAX)
}

/// Whether freeform geometry (freehand points, rectangle extent) is clamped like
/// point positions. Off by default: freeform shapes may leave the frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClampPolicy {
    pub clamp_freeform: bool,
}

/// Screen-space bounds of the overlay element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl OverlayRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Map client coordinates to clamped percentages.
    pub fn to_percent(&self, client_x: f64, client_y: f64) -> PercentPoint {
        if self.width <= 0.0 || self.height <= 0.0 {
            return PercentPoint::new(50.0, 50.0);
        }
        let x = (client_x - self.left) / self.width * 100.0;
        let y = (client_y - self.top) / self.height * 100.0;
        PercentPoint::new(clamp_position(x), clamp_position(y))
    }

    /// Map percentages back into this rectangle's coordinate space.
    pub fn to_client(&self, p: PercentPoint) -> (f64, f64) {
        (
            self.left + p.x / 100.0 * self.width,
            self.top + p.y / 100.0 * self.height,
        )
    }
}

/// Which part of an annotation is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragHandle {
    Body,
    ArrowStart,
    ArrowEnd,
}

/// An in-progress drag. Movement is applied as deltas from the previous pointer
/// position so grabbing a marker off-center does not snap it to the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub annotation_id: String,
    pub handle: DragHandle,
    last: PercentPoint,
}

impl DragSession {
    pub fn start(
        annotation_id: impl Into<String>,
        handle: DragHandle,
        pointer: PercentPoint,
    ) -> Self {
        Self {
            annotation_id: annotation_id.into(),
            handle,
            last: pointer,
        }
    }

    /// Advance to `pointer`, returning the delta since the previous position.
    pub fn advance(&mut self, pointer: PercentPoint) -> (f64, f64) {
        let delta = (pointer.x - self.last.x, pointer.y - self.last.y);
        self.last = pointer;
        delta
    }
}

/// Arrow being drawn with the arrow tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowGesture {
    pub start: PercentPoint,
}

impl ArrowGesture {
    pub fn begin(start: PercentPoint) -> Self {
        Self { start }
    }

    /// End point if the gesture is long enough to be an arrow, `None` for a click.
    pub fn finish(&self, end: PercentPoint) -> Option<(PercentPoint, PercentPoint)> {
        (self.start.distance_to(&end) > MIN_ARROW_LENGTH).then_some((self.start, end))
    }
}

/// Limit `d` so that both `a + d` and `b + d` stay in the position range.
fn rigid_delta(d: f64, a: f64, b: f64) -> f64 {
    let lo = POSITION_MIN - a.min(b);
    let hi = POSITION_MAX - a.max(b);
    if lo <= hi { d.clamp(lo, hi) } else { d }
}

/// Move `annotation` by `(dx, dy)` percentage units and re-clamp.
pub fn translate(
    annotation: &mut Annotation,
    handle: DragHandle,
    dx: f64,
    dy: f64,
    policy: ClampPolicy,
) {
    match &mut annotation.shape {
        AnnotationShape::Highlight { x, y, .. } | AnnotationShape::Text { x, y, .. } => {
            *x = clamp_position(*x + dx);
            *y = clamp_position(*y + dy);
        }
        AnnotationShape::Arrow {
            start_x,
            start_y,
            end_x,
            end_y,
            ..
        } => {
            // A body drag moves the arrow as a whole; it stops at the edge instead
            // of shortening.
            let (dx, dy) = if handle == DragHandle::Body {
                (
                    rigid_delta(dx, *start_x, *end_x),
                    rigid_delta(dy, *start_y, *end_y),
                )
            } else {
                (dx, dy)
            };
            if matches!(handle, DragHandle::Body | DragHandle::ArrowStart) {
                *start_x = clamp_position(*start_x + dx);
                *start_y = clamp_position(*start_y + dy);
            }
            if matches!(handle, DragHandle::Body | DragHandle::ArrowEnd) {
                *end_x = clamp_position(*end_x + dx);
                *end_y = clamp_position(*end_y + dy);
            }
        }
        AnnotationShape::Freehand { points, .. } => {
            for p in points.iter_mut() {
                p.x += dx;
                p.y += dy;
                if policy.clamp_freeform {
                    p.x = clamp_position(p.x);
                    p.y = clamp_position(p.y);
                }
            }
        }
        AnnotationShape::Rectangle {
            x, y, width, height, ..
        } => {
            *x = clamp_position(*x + dx);
            *y = clamp_position(*y + dy);
            if policy.clamp_freeform {
                *width = width.clamp(0.0, POSITION_MAX - *x);
                *height = height.clamp(0.0, POSITION_MAX - *y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_mapping_clamps() {
        let r = OverlayRect::new(100.0, 50.0, 400.0, 200.0);
        assert_eq!(r.to_percent(300.0, 150.0), PercentPoint::new(50.0, 50.0));
        assert_eq!(r.to_percent(0.0, 1000.0), PercentPoint::new(2.0, 98.0));
    }

    #[test]
    fn degenerate_overlay_maps_to_center() {
        let r = OverlayRect::new(0.0, 0.0, 0.0, 10.0);
        assert_eq!(r.to_percent(5.0, 5.0), PercentPoint::new(50.0, 50.0));
    }

    #[test]
    fn short_arrow_gesture_is_a_click() {
        let g = ArrowGesture::begin(PercentPoint::new(10.0, 10.0));
        assert!(g.finish(PercentPoint::new(12.0, 11.0)).is_none());
        assert!(g.finish(PercentPoint::new(20.0, 10.0)).is_some());
    }
}
