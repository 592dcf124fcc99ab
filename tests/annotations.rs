use chart_studio::annotations::{
    AnnotationEngine, AnnotationPatch, AnnotationShape, AnnotationSize, AnnotationTool,
    ArrowGesture, ClampPolicy, DragHandle, LineStyle, OverlayRect, POSITION_MAX, POSITION_MIN,
    PercentPoint, ToolDefaults, parse_annotations,
};

fn position(shape: &AnnotationShape) -> (f64, f64) {
    match shape {
        AnnotationShape::Highlight { x, y, .. } | AnnotationShape::Text { x, y, .. } => (*x, *y),
        AnnotationShape::Rectangle { x, y, .. } => (*x, *y),
        AnnotationShape::Arrow { start_x, start_y, .. } => (*start_x, *start_y),
        AnnotationShape::Freehand { points, .. } => (points[0].x, points[0].y),
    }
}

#[test]
fn placement_clamps_and_selects() {
    let mut engine = AnnotationEngine::new();
    engine.set_active_tool(Some(AnnotationTool::Highlight));
    let a = engine.add_highlight(-10.0, 150.0).clone();
    assert_eq!(position(&a.shape), (POSITION_MIN, POSITION_MAX));
    assert_eq!(engine.selected_id(), Some(a.id.as_str()));
    assert_eq!(engine.active_tool(), None);
    assert!(a.id.starts_with("annotation"));
}

#[test]
fn tool_defaults_style_new_annotations() {
    let mut engine = AnnotationEngine::new();
    engine.set_defaults(ToolDefaults {
        color: "#3752ac".into(),
        size: AnnotationSize::Large,
        opacity: 150,
        line_style: LineStyle::Dashed,
        ..Default::default()
    });
    assert_eq!(engine.defaults().size, AnnotationSize::Large);

    let arrow = engine.add_arrow(10.0, 10.0, 40.0, 40.0).clone();
    assert_eq!(arrow.color, "#3752ac");
    assert_eq!(arrow.opacity, 100);
    match arrow.shape {
        AnnotationShape::Arrow { size, line_style, .. } => {
            assert_eq!(size, AnnotationSize::Large);
            assert_eq!(line_style, Some(LineStyle::Dashed));
        }
        other => panic!("expected an arrow, got {other:?}"),
    }
}

#[test]
fn pointer_mapping_uses_the_overlay_bounds() {
    let rect = OverlayRect::new(100.0, 50.0, 400.0, 200.0);
    let p = rect.to_percent(300.0, 150.0);
    assert_eq!(p, PercentPoint::new(50.0, 50.0));
    let outside = rect.to_percent(0.0, 1000.0);
    assert_eq!(outside, PercentPoint::new(POSITION_MIN, POSITION_MAX));
    assert_eq!(rect.to_client(PercentPoint::new(25.0, 100.0)), (200.0, 250.0));
}

#[test]
fn drag_moves_by_pointer_delta() {
    let mut engine = AnnotationEngine::new();
    let id = engine.add_text(40.0, 40.0, Some("Peak")).id.clone();
    engine.select(None);
    assert!(engine.begin_drag(&id, DragHandle::Body, PercentPoint::new(45.0, 42.0)));
    assert_eq!(engine.selected_id(), Some(id.as_str()));
    engine.drag_to(PercentPoint::new(50.0, 52.0));
    let moved = engine.drag_to(PercentPoint::new(55.0, 52.0)).unwrap();
    assert_eq!(position(&moved.shape), (50.0, 50.0));
    engine.end_drag();
    assert!(engine.drag_to(PercentPoint::new(90.0, 90.0)).is_none());
}

#[test]
fn arrow_handles_move_independently() {
    let mut engine = AnnotationEngine::new();
    let id = engine.add_arrow(10.0, 10.0, 50.0, 50.0).id.clone();
    engine.begin_drag(&id, DragHandle::ArrowEnd, PercentPoint::new(50.0, 50.0));
    let a = engine.drag_to(PercentPoint::new(60.0, 40.0)).unwrap();
    let AnnotationShape::Arrow { start_x, start_y, end_x, end_y, .. } = a.shape else {
        panic!("expected an arrow");
    };
    assert_eq!((start_x, start_y, end_x, end_y), (10.0, 10.0, 60.0, 40.0));
}

#[test]
fn arrow_body_drag_keeps_its_length_at_the_edge() {
    let mut engine = AnnotationEngine::new();
    let id = engine.add_arrow(10.0, 10.0, 50.0, 50.0).id.clone();
    engine.begin_drag(&id, DragHandle::Body, PercentPoint::new(30.0, 30.0));
    let a = engine.drag_to(PercentPoint::new(10.0, 10.0)).unwrap();
    let AnnotationShape::Arrow { start_x, start_y, end_x, end_y, .. } = a.shape else {
        panic!("expected an arrow");
    };
    assert_eq!((start_x, start_y, end_x, end_y), (2.0, 2.0, 42.0, 42.0));
}

#[test]
fn short_drags_are_clicks() {
    let g = ArrowGesture::begin(PercentPoint::new(20.0, 20.0));
    assert!(g.finish(PercentPoint::new(21.0, 21.0)).is_none());
    assert!(g.finish(PercentPoint::new(30.0, 20.0)).is_some());
}

#[test]
fn freehand_needs_two_points_and_is_not_clamped_by_default() {
    let mut engine = AnnotationEngine::new();
    assert!(engine.add_freehand(vec![PercentPoint::new(1.0, 1.0)]).is_none());
    let stroke = vec![PercentPoint::new(-5.0, 0.0), PercentPoint::new(120.0, 50.0)];
    let a = engine.add_freehand(stroke.clone()).unwrap();
    assert!(matches!(&a.shape, AnnotationShape::Freehand { points, .. } if *points == stroke));

    let mut clamped = AnnotationEngine::new().with_clamp_policy(ClampPolicy {
        clamp_freeform: true,
    });
    let a = clamped.add_freehand(stroke).unwrap();
    assert_eq!(position(&a.shape), (POSITION_MIN, POSITION_MIN));
}

#[test]
fn patches_keep_the_variant() {
    let mut engine = AnnotationEngine::new();
    let id = engine.add_highlight(30.0, 30.0).id.clone();
    assert!(engine.update_annotation(&id, &AnnotationPatch::text("ignored")));
    assert!(engine.update_annotation(&id, &AnnotationPatch::color("#00ff00")));
    assert!(engine.update_annotation(&id, &AnnotationPatch::opacity(250)));
    let a = engine.get(&id).unwrap();
    assert_eq!(a.shape.kind(), AnnotationTool::Highlight);
    assert_eq!(a.color, "#00ff00");
    assert_eq!(a.opacity, 100);
    assert!(!engine.update_annotation("missing", &AnnotationPatch::opacity(10)));
}

#[test]
fn deleting_and_clearing() {
    let mut engine = AnnotationEngine::new();
    let first = engine.add_highlight(10.0, 10.0).id.clone();
    engine.add_rectangle(20.0, 20.0, 30.0, 10.0);
    assert!(engine.delete_selected());
    assert_eq!(engine.annotations().len(), 1);
    assert_eq!(engine.selected_id(), None);

    engine.select(Some(&first));
    assert!(engine.nudge_selected(5.0, -1.0));
    assert_eq!(position(&engine.get(&first).unwrap().shape), (15.0, 9.0));

    engine.set_active_tool(Some(AnnotationTool::Text));
    engine.clear_all_annotations();
    assert!(engine.annotations().is_empty());
    assert_eq!(engine.active_tool(), None);
    assert!(!engine.delete_selected());
}

#[test]
fn json_uses_type_tag_and_camel_case() {
    let json = r##"[
        {"id":"a1","type":"arrow","color":"#ff0000","opacity":80,
         "startX":10,"startY":20,"endX":30,"endY":40,"size":"large","lineStyle":"dashed"},
        {"id":"t1","type":"text","color":"#000000","opacity":100,
         "text":"ATH","x":50,"y":10,"size":"small","hasBackground":false}
    ]"##;
    let list = parse_annotations(json).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].shape.kind(), AnnotationTool::Arrow);
    let v = serde_json::to_value(&list[1]).unwrap();
    assert_eq!(v["type"], "text");
    assert_eq!(v["hasBackground"], false);
    assert!(parse_annotations(r#"[{"id":"x","type":"circle"}]"#).is_err());
}
