use itrack::selection::{normalized, Phase, Selection, SelectionEvent};
use opencv::core::Rect;

fn rect_tuple(rect: Rect) -> (i32, i32, i32, i32) {
    (rect.x, rect.y, rect.width, rect.height)
}

#[test]
fn test_full_selection_cycle() {
    let mut selection = Selection::new();
    assert_eq!(selection.phase(), Phase::Idle);

    // Press anchors a zero-sized box.
    selection.handle(SelectionEvent::Down { x: 100, y: 120 });
    assert_eq!(selection.phase(), Phase::Drawing);
    assert!(selection.preview().is_none());

    // Dragging grows the box, preview becomes available.
    selection.handle(SelectionEvent::Move { x: 180, y: 200 });
    assert_eq!(rect_tuple(selection.preview().unwrap()), (100, 120, 80, 80));

    // Release commits, the loop consumes the box and starts tracking.
    selection.handle(SelectionEvent::Up { x: 180, y: 200 });
    assert_eq!(selection.phase(), Phase::Committed);
    let bbox = selection.take_committed().unwrap();
    assert_eq!(rect_tuple(bbox), (100, 120, 80, 80));
    assert_eq!(selection.phase(), Phase::Tracking);
    assert!(selection.is_tracking());

    // Reset drops back to selection mode.
    selection.reset();
    assert_eq!(selection.phase(), Phase::Idle);
}

#[test]
fn test_commit_iff_nonzero_after_normalization() {
    // Exhaustive over a small grid of drag end points: committed
    // exactly when both spans are nonzero.
    for dx in -3..=3 {
        for dy in -3..=3 {
            let mut selection = Selection::new();
            selection.handle(SelectionEvent::Down { x: 10, y: 10 });
            selection.handle(SelectionEvent::Move {
                x: 10 + dx,
                y: 10 + dy,
            });
            selection.handle(SelectionEvent::Up {
                x: 10 + dx,
                y: 10 + dy,
            });
            let committed = selection.take_committed();
            if dx != 0 && dy != 0 {
                let bbox = committed.expect("nonzero drag must commit");
                assert!(bbox.width > 0 && bbox.height > 0);
                assert_eq!((bbox.width, bbox.height), (dx.abs(), dy.abs()));
            } else {
                assert!(committed.is_none(), "degenerate drag must not commit");
            }
        }
    }
}

#[test]
fn test_normalization_property() {
    // origin' = origin + min(0, size), size' = |size|
    for (x, y, w, h) in [
        (10, 10, -5, -5),
        (0, 0, -7, 3),
        (50, 40, 12, -9),
        (5, 5, 5, 5),
        (3, 3, 0, -4),
    ] {
        let rect = normalized(Rect::new(x, y, w, h));
        assert_eq!(rect.x, x + w.min(0));
        assert_eq!(rect.y, y + h.min(0));
        assert_eq!(rect.width, w.abs());
        assert_eq!(rect.height, h.abs());
    }
}

#[test]
fn test_backward_drag_commits_normalized_box() {
    let mut selection = Selection::new();
    selection.handle(SelectionEvent::Down { x: 10, y: 10 });
    selection.handle(SelectionEvent::Move { x: 5, y: 5 });
    selection.handle(SelectionEvent::Up { x: 5, y: 5 });
    let bbox = selection.take_committed().unwrap();
    assert_eq!(rect_tuple(bbox), (5, 5, 5, 5));
}

#[test]
fn test_new_drag_interrupts_tracking() {
    let mut selection = Selection::new();
    selection.handle(SelectionEvent::Down { x: 0, y: 0 });
    selection.handle(SelectionEvent::Up { x: 20, y: 20 });
    selection.take_committed().unwrap();
    assert!(selection.is_tracking());

    // A fresh press while tracking starts a new selection.
    selection.handle(SelectionEvent::Down { x: 30, y: 30 });
    assert!(!selection.is_tracking());
    assert!(selection.is_drawing());
    selection.handle(SelectionEvent::Up { x: 60, y: 70 });
    let bbox = selection.take_committed().unwrap();
    assert_eq!(rect_tuple(bbox), (30, 30, 30, 40));
}

#[test]
fn test_stray_events_are_ignored() {
    let mut selection = Selection::new();
    // An up or move without a press leaves the machine idle.
    selection.handle(SelectionEvent::Up { x: 10, y: 10 });
    selection.handle(SelectionEvent::Move { x: 20, y: 20 });
    assert_eq!(selection.phase(), Phase::Idle);
    assert!(selection.take_committed().is_none());

    // Unknown raw highgui events do not map to selection events.
    assert!(SelectionEvent::from_highgui(-1, 0, 0).is_none());
    assert!(SelectionEvent::from_highgui(1000, 0, 0).is_none());
}
