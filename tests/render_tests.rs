// Integration tests for the incremental diagram renderer

use heapview::render::{
    CanvasCommand, CellRef, Container, DiagramRenderer, Diagnostic, RecordingCanvas, RenderPhase,
    SceneValue,
};
use heapview::snapshot::{Frame, HeapObject, ObjectId, Snapshot, Variable};
use heapview::RenderError;

fn int(name: &str, value: &str) -> Variable {
    Variable::primitive("int", name, value)
}

fn foo(id: &str, fields: Vec<Variable>) -> HeapObject {
    HeapObject::new(id, "Foo", fields)
}

fn titles(renderer: &DiagramRenderer<RecordingCanvas>, container: Container) -> Vec<String> {
    let canvas = renderer.canvas();
    canvas
        .children(container)
        .iter()
        .map(|id| canvas.node(*id).unwrap().header.title.clone())
        .collect()
}

#[test]
fn test_unchanged_entities_keep_their_nodes() {
    let mut renderer = DiagramRenderer::new(RecordingCanvas::new());
    renderer
        .render_snapshot(Snapshot::new(
            vec![Frame::new("main", vec![int("x", "1")])],
            vec![foo("1", vec![]), foo("2", vec![])],
        ))
        .unwrap();

    let main = renderer.frame_node(0).unwrap();
    let first = renderer.object_node(&ObjectId::new("1")).unwrap();
    let second = renderer.object_node(&ObjectId::new("2")).unwrap();
    renderer.canvas_mut().tag(main, "main");
    renderer.canvas_mut().tag(first, "first");
    renderer.canvas_mut().tag(second, "second");

    let report = renderer
        .render_snapshot(Snapshot::new(
            vec![Frame::new("main", vec![int("x", "2")])],
            vec![foo("1", vec![int("n", "7")]), foo("2", vec![])],
        ))
        .unwrap();

    let canvas = renderer.canvas();
    assert_eq!(canvas.created(), 3);
    assert_eq!(canvas.tag_of(main), Some("main"));
    assert_eq!(canvas.tag_of(first), Some("first"));
    assert_eq!(canvas.tag_of(second), Some("second"));
    assert_eq!(canvas.node(main).unwrap().rows[0].value, SceneValue::Text("2".into()));
    assert_eq!(canvas.node(first).unwrap().rows.len(), 1);
    assert_eq!(report.stack.updated, 1);
    assert_eq!(report.heap.updated, 2);
    assert!(report.heap.entered.is_empty());
}

#[test]
fn test_frames_follow_push_and_pop() {
    let mut renderer = DiagramRenderer::new(RecordingCanvas::new());
    let frames = |names: &[&str]| {
        Snapshot::new(
            names.iter().map(|name| Frame::new(*name, vec![])).collect(),
            vec![],
        )
    };

    renderer.render_snapshot(frames(&["main", "a"])).unwrap();
    let main = renderer.frame_node(0).unwrap();
    let a = renderer.frame_node(1).unwrap();

    renderer.render_snapshot(frames(&["main", "a", "b"])).unwrap();
    assert_eq!(titles(&renderer, Container::Stack), vec!["main", "a", "b"]);
    assert_eq!(renderer.frame_node(1), Some(a));

    let report = renderer.render_snapshot(frames(&["main"])).unwrap();
    assert_eq!(titles(&renderer, Container::Stack), vec!["main"]);
    assert_eq!(renderer.frame_node(0), Some(main));
    assert_eq!(report.stack.exited, vec![1, 2]);
    assert!(renderer.canvas().node(a).is_none());

    // A different call at the same depth reuses the node with a new header
    renderer.render_snapshot(frames(&["main", "a"])).unwrap();
    let reused = renderer.frame_node(1).unwrap();
    renderer.render_snapshot(frames(&["main", "c"])).unwrap();
    assert_eq!(renderer.frame_node(1), Some(reused));
    assert_eq!(titles(&renderer, Container::Stack), vec!["main", "c"]);
}

#[test]
fn test_heap_order_matches_snapshot_and_exits_are_removed() {
    let mut renderer = DiagramRenderer::new(RecordingCanvas::new());
    renderer
        .render_snapshot(Snapshot::new(
            vec![],
            vec![foo("1", vec![]), foo("2", vec![]), foo("3", vec![])],
        ))
        .unwrap();
    let one = renderer.object_node(&ObjectId::new("1")).unwrap();
    let two = renderer.object_node(&ObjectId::new("2")).unwrap();
    let three = renderer.object_node(&ObjectId::new("3")).unwrap();

    let report = renderer
        .render_snapshot(Snapshot::new(vec![], vec![foo("3", vec![]), foo("1", vec![])]))
        .unwrap();

    assert_eq!(renderer.canvas().children(Container::Heap), &[three, one]);
    assert_eq!(renderer.object_nodes(), vec![three, one]);
    assert_eq!(report.heap.exited, vec![ObjectId::new("2")]);
    assert!(renderer.canvas().node(two).is_none());
    assert!(renderer.canvas().log().contains(&CanvasCommand::RemoveNode(two)));
}

#[test]
fn test_mutual_references_resolve_in_either_order() {
    for order in [["1", "2"], ["2", "1"]] {
        let mut renderer = DiagramRenderer::new(RecordingCanvas::new());
        let heap = order
            .iter()
            .map(|id| {
                let other = if *id == "1" { "2" } else { "1" };
                foo(id, vec![Variable::reference("Foo", "next", other)])
            })
            .collect();

        let report = renderer.render_snapshot(Snapshot::new(vec![], heap)).unwrap();

        let one = renderer.object_node(&ObjectId::new("1")).unwrap();
        let two = renderer.object_node(&ObjectId::new("2")).unwrap();
        let scene = renderer.canvas().scene();
        assert_eq!(report.connectors, 2);
        assert!(report.is_clean());
        assert_eq!(scene.connector_from(CellRef { node: one, row: 0 }), Some(two));
        assert_eq!(scene.connector_from(CellRef { node: two, row: 0 }), Some(one));
    }
}

#[test]
fn test_null_reference_is_text_and_missing_target_is_dangling() {
    heapview::logging::init_test_logging();
    let mut renderer = DiagramRenderer::new(RecordingCanvas::new());
    let report = renderer
        .render_snapshot(Snapshot::new(
            vec![Frame::new(
                "main",
                vec![
                    Variable::null_reference("Foo", "f"),
                    Variable::reference("Foo", "g", "99"),
                ],
            )],
            vec![],
        ))
        .unwrap();

    let main = renderer.frame_node(0).unwrap();
    let rows = &renderer.canvas().node(main).unwrap().rows;
    assert_eq!(rows[0].value, SceneValue::Text("null".into()));
    assert_eq!(rows[1].value, SceneValue::Connector);

    assert_eq!(report.connectors, 0);
    assert!(renderer.canvas().connectors().is_empty());
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::DanglingReference {
            origin: CellRef { node: main, row: 1 },
            target: ObjectId::new("99"),
        }]
    );
    assert_eq!(report.dangling().count(), 1);
}

#[test]
fn test_primitive_row_becomes_connector_to_new_object() {
    let first: Snapshot = serde_json::from_str(
        r#"{
            "stack": [{ "function": "main", "variables": [
                { "type": "int", "name": "x", "value": "3", "isReference": false }
            ] }],
            "heap": []
        }"#,
    )
    .unwrap();
    let second: Snapshot = serde_json::from_str(
        r#"{
            "stack": [{ "function": "main", "variables": [
                { "type": "Foo", "name": "f", "value": "1", "isReference": true }
            ] }],
            "heap": [{ "id": "1", "klass": "Foo", "fields": [] }]
        }"#,
    )
    .unwrap();

    let mut renderer = DiagramRenderer::new(RecordingCanvas::new());
    renderer.render_snapshot(first).unwrap();
    let main = renderer.frame_node(0).unwrap();
    let row = &renderer.canvas().node(main).unwrap().rows[0];
    assert_eq!((row.ty.as_str(), row.name.as_str()), ("int", "x"));
    assert_eq!(row.value, SceneValue::Text("3".into()));

    let report = renderer.render_snapshot(second).unwrap();
    let object = renderer.object_node(&ObjectId::new("1")).unwrap();

    assert_eq!(renderer.frame_node(0), Some(main));
    assert_eq!(report.stack.updated, 1);
    assert_eq!(report.heap.entered, vec![ObjectId::new("1")]);
    assert_eq!(report.connectors, 1);

    let canvas = renderer.canvas();
    let rows = &canvas.node(main).unwrap().rows;
    assert_eq!(rows.len(), 1);
    assert_eq!((rows[0].ty.as_str(), rows[0].name.as_str()), ("Foo", "f"));
    assert_eq!(rows[0].value, SceneValue::Connector);
    assert_eq!(canvas.connectors().len(), 1);
    assert_eq!(canvas.connectors()[0].origin, CellRef { node: main, row: 0 });
    assert_eq!(canvas.connectors()[0].target, object);
    assert_eq!(canvas.node(object).unwrap().header.subtitle.as_deref(), Some("(id=1)"));
}

#[test]
fn test_connectors_are_recomputed_every_pass() {
    let mut renderer = DiagramRenderer::new(RecordingCanvas::new());
    renderer
        .render_snapshot(Snapshot::new(
            vec![Frame::new("main", vec![Variable::reference("Foo", "f", "1")])],
            vec![foo("1", vec![])],
        ))
        .unwrap();
    assert_eq!(renderer.canvas().connectors().len(), 1);
    renderer.canvas_mut().take_log();

    renderer
        .render_snapshot(Snapshot::new(
            vec![Frame::new("main", vec![Variable::null_reference("Foo", "f")])],
            vec![foo("1", vec![])],
        ))
        .unwrap();

    let log = renderer.canvas().log();
    assert!(renderer.canvas().connectors().is_empty());
    assert!(log.contains(&CanvasCommand::ClearConnectors));
    assert!(!log.iter().any(|command| matches!(command, CanvasCommand::Connect(_))));
}

#[test]
fn test_rows_are_truncated_and_appended_in_place() {
    let mut renderer = DiagramRenderer::new(RecordingCanvas::new());
    renderer
        .render_snapshot(Snapshot::new(
            vec![Frame::new("main", vec![int("x", "1"), int("y", "2"), int("z", "3")])],
            vec![],
        ))
        .unwrap();
    let main = renderer.frame_node(0).unwrap();
    renderer.canvas_mut().take_log();

    renderer
        .render_snapshot(Snapshot::new(vec![Frame::new("main", vec![int("x", "1")])], vec![]))
        .unwrap();
    assert_eq!(renderer.canvas().node(main).unwrap().rows.len(), 1);
    assert!(renderer
        .canvas()
        .log()
        .contains(&CanvasCommand::TruncateRows { node: main, len: 1 }));

    renderer
        .render_snapshot(Snapshot::new(
            vec![Frame::new("main", vec![int("x", "1"), int("w", "4")])],
            vec![],
        ))
        .unwrap();
    let rows = &renderer.canvas().node(main).unwrap().rows;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].name, "w");
}

#[test]
fn test_duplicate_object_ids_render_first_occurrence() {
    let mut renderer = DiagramRenderer::new(RecordingCanvas::new());
    let report = renderer
        .render_snapshot(Snapshot::new(
            vec![],
            vec![foo("1", vec![]), HeapObject::new("1", "Bar", vec![])],
        ))
        .unwrap();

    assert_eq!(titles(&renderer, Container::Heap), vec!["Foo"]);
    assert_eq!(report.heap.duplicates, vec![ObjectId::new("1")]);
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::DuplicateKey {
            container: Container::Heap,
            key: "1".to_string(),
        }]
    );
}

#[test]
fn test_failed_initialization_disables_until_reinitialized() {
    heapview::logging::init_test_logging();
    let mut renderer = DiagramRenderer::new(RecordingCanvas::failing("no display"));
    let step = |name: &str| Snapshot::new(vec![Frame::new(name, vec![])], vec![]);

    assert_eq!(
        renderer.render_snapshot(step("main")),
        Err(RenderError::Initialization("no display".to_string()))
    );
    assert!(!renderer.is_enabled());
    assert_eq!(renderer.render_snapshot(step("run")), Err(RenderError::Disabled));
    assert_eq!(renderer.render_snapshot(step("stop")), Err(RenderError::Disabled));
    assert_eq!(renderer.canvas().initializations(), 1);
    assert_eq!(renderer.canvas().scene().node_count(), 0);
    // Only the newest step is kept while disabled
    assert_eq!(renderer.pending(), 1);

    assert!(renderer.reinitialize().is_err());
    renderer.canvas_mut().set_initialization_failure(None);
    renderer.reinitialize().unwrap();
    assert!(renderer.is_enabled());

    let reports = renderer.drain().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(renderer.passes(), 1);
    assert_eq!(renderer.canvas().initializations(), 3);
    assert_eq!(titles(&renderer, Container::Stack), vec!["stop"]);
}

#[test]
fn test_queued_snapshots_render_in_submission_order() {
    let mut renderer = DiagramRenderer::new(RecordingCanvas::new());
    for name in ["main", "run", "stop"] {
        renderer.submit(Snapshot::new(vec![Frame::new(name, vec![])], vec![]));
    }
    assert_eq!(renderer.pending(), 3);

    let reports = renderer.drain().unwrap();
    let passes: Vec<u64> = reports.iter().map(|report| report.pass).collect();
    assert_eq!(passes, vec![1, 2, 3]);
    assert_eq!(reports[0].stack.entered, vec![0]);
    assert_eq!(reports[1].stack.updated, 1);
    assert_eq!(titles(&renderer, Container::Stack), vec!["stop"]);
    assert_eq!(renderer.pending(), 0);
    assert_eq!(renderer.phase(), RenderPhase::Idle);
    assert!(renderer.drain().unwrap().is_empty());
}
