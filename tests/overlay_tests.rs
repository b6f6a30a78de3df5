// Integration tests for the breakpoint and current-line overlay

use heapview::config::OverlayConfig;
use heapview::overlay::{Glyph, MarkerOutcome, MarkerOverlay, MemorySourceView, OverlayEvent};

fn source(lines: usize) -> String {
    (1..=lines).map(|n| format!("stmt{};\n", n)).collect()
}

fn overlay(lines: usize) -> MarkerOverlay<MemorySourceView> {
    MarkerOverlay::attached(MemorySourceView::new(&source(lines), 10), &OverlayConfig::default())
}

fn events(overlay: &mut MarkerOverlay<MemorySourceView>) -> Vec<OverlayEvent> {
    std::iter::from_fn(|| overlay.poll_event()).collect()
}

#[test]
fn test_marker_commands_are_idempotent() {
    let mut overlay = overlay(20);
    let glyph = Glyph::new("●");

    assert_eq!(overlay.set_breakpoint_marker(5, glyph.clone()), MarkerOutcome::Applied);
    assert_eq!(overlay.set_breakpoint_marker(5, glyph.clone()), MarkerOutcome::Unchanged);
    assert_eq!(overlay.view().unwrap().marker_count(), 1);
    assert_eq!(overlay.view().unwrap().marker(5), Some(&glyph));

    assert_eq!(overlay.clear_breakpoint_marker(5), MarkerOutcome::Applied);
    assert_eq!(overlay.clear_breakpoint_marker(5), MarkerOutcome::Unchanged);
    assert_eq!(overlay.view().unwrap().marker_count(), 0);
}

#[test]
fn test_clearing_an_unmarked_line_does_nothing() {
    let mut overlay = overlay(20);
    overlay.mark_breakpoint(3);

    assert_eq!(overlay.clear_breakpoint_marker(4), MarkerOutcome::Unchanged);
    assert!(overlay.has_marker(3));
    assert_eq!(overlay.marked_lines().collect::<Vec<_>>(), vec![3]);
}

#[test]
fn test_toggle_reports_resulting_state() {
    let mut overlay = overlay(20);
    events(&mut overlay);

    overlay.toggle_breakpoint(7);
    overlay.toggle_breakpoint(7);

    assert_eq!(
        events(&mut overlay),
        vec![
            OverlayEvent::BreakpointToggled { line: 7, set: true },
            OverlayEvent::BreakpointToggled { line: 7, set: false },
        ]
    );
    assert!(!overlay.has_marker(7));
}

#[test]
fn test_out_of_range_lines_are_ignored() {
    let mut overlay = overlay(20);
    events(&mut overlay);

    let outcome = overlay.toggle_breakpoint(21);
    assert_eq!(outcome, MarkerOutcome::OutOfRange { line: 21, line_count: 20 });
    assert!(outcome.diagnostic().is_some());
    assert_eq!(
        overlay.set_breakpoint_marker(0, Glyph::new("●")),
        MarkerOutcome::OutOfRange { line: 0, line_count: 20 }
    );
    assert!(matches!(overlay.set_current_line(40), MarkerOutcome::OutOfRange { .. }));
    assert!(matches!(overlay.scroll_line_into_view(40), MarkerOutcome::OutOfRange { .. }));

    assert!(events(&mut overlay).is_empty());
    assert_eq!(overlay.view().unwrap().marker_count(), 0);
    assert_eq!(overlay.current_line(), None);
}

#[test]
fn test_single_current_line() {
    let mut overlay = overlay(20);

    overlay.set_current_line(3);
    overlay.set_current_line(9);
    assert_eq!(overlay.current_line(), Some(9));
    assert_eq!(overlay.view().unwrap().highlighted().collect::<Vec<_>>(), vec![9]);

    assert_eq!(overlay.clear_current_line(), MarkerOutcome::Applied);
    assert_eq!(overlay.view().unwrap().highlighted().count(), 0);
    assert_eq!(overlay.clear_current_line(), MarkerOutcome::Unchanged);
}

#[test]
fn test_breakpoint_and_current_line_coexist() {
    let mut overlay = overlay(20);
    overlay.mark_breakpoint(4);
    overlay.set_current_line(4);

    assert!(overlay.has_marker(4));
    assert_eq!(overlay.view().unwrap().highlighted().collect::<Vec<_>>(), vec![4]);
}

#[test]
fn test_scroll_centers_line() {
    let mut overlay = overlay(100);
    assert_eq!(overlay.scroll_line_into_view(30), MarkerOutcome::Applied);
    // Line 30 is index 29; half of the 10-row viewport above it
    assert_eq!(overlay.view().unwrap().offset(), 24);
}

#[test]
fn test_gutter_click_is_forwarded_not_applied() {
    let mut overlay = overlay(20);
    events(&mut overlay);

    assert_eq!(overlay.gutter_click(0), MarkerOutcome::Applied);
    assert_eq!(overlay.gutter_click(11), MarkerOutcome::Applied);
    assert!(matches!(overlay.gutter_click(20), MarkerOutcome::OutOfRange { .. }));

    assert_eq!(
        events(&mut overlay),
        vec![OverlayEvent::GutterClick(1), OverlayEvent::GutterClick(12)]
    );
    assert_eq!(overlay.view().unwrap().marker_count(), 0);
}

#[test]
fn test_commands_before_ready_are_replayed() {
    let mut overlay: MarkerOverlay<MemorySourceView> = MarkerOverlay::new(&OverlayConfig::default());
    assert!(!overlay.is_ready());

    overlay.replace_text(&source(10));
    overlay.mark_breakpoint(2);
    overlay.mark_breakpoint(50);
    overlay.set_current_line(6);
    assert!(overlay.poll_event().is_none());

    overlay.editor_ready(MemorySourceView::new("", 10));

    let view = overlay.view().unwrap();
    assert_eq!(view.line(1), Some("stmt1;"));
    assert!(view.marker(2).is_some());
    assert!(view.marker(50).is_none());
    assert_eq!(view.highlighted().collect::<Vec<_>>(), vec![6]);
    assert!(!overlay.has_marker(50));
    assert_eq!(events(&mut overlay), vec![OverlayEvent::Ready]);
}

#[test]
fn test_replacing_text_drops_lines_that_no_longer_exist() {
    let mut overlay = overlay(20);
    overlay.mark_breakpoint(2);
    overlay.mark_breakpoint(15);
    overlay.set_current_line(18);

    overlay.replace_text(&source(10));

    let view = overlay.view().unwrap();
    assert!(view.marker(2).is_some());
    assert_eq!(view.marker_count(), 1);
    assert_eq!(view.highlighted().count(), 0);
    assert_eq!(overlay.current_line(), None);
    assert_eq!(overlay.marked_lines().collect::<Vec<_>>(), vec![2]);
}

#[test]
fn test_configured_glyph_is_used_for_toggles() {
    let config = OverlayConfig {
        breakpoint_glyph: "B".to_string(),
        ..OverlayConfig::default()
    };
    let mut overlay = MarkerOverlay::attached(MemorySourceView::new(&source(5), 5), &config);

    overlay.toggle_breakpoint(1);
    assert_eq!(overlay.view().unwrap().marker(1), Some(&Glyph::new("B")));
}

#[test]
fn test_failed_load_is_reported_and_commands_survive() {
    heapview::logging::init_test_logging();
    let mut overlay: MarkerOverlay<MemorySourceView> = MarkerOverlay::new(&OverlayConfig::default());
    overlay.replace_text(&source(10));
    overlay.mark_breakpoint(3);

    overlay.editor_failed("highlighter bundle missing");
    overlay.set_current_line(7);

    assert!(!overlay.is_ready());
    assert_eq!(
        events(&mut overlay),
        vec![OverlayEvent::InitializationFailed("highlighter bundle missing".to_string())]
    );

    overlay.editor_ready(MemorySourceView::new("", 10));
    let view = overlay.view().unwrap();
    assert!(view.marker(3).is_some());
    assert_eq!(view.highlighted().collect::<Vec<_>>(), vec![7]);
    assert_eq!(events(&mut overlay), vec![OverlayEvent::Ready]);
}
