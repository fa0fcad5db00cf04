//! Integration tests: whole-point drag sessions (dp-editor ↔ dp-core).
//!
//! Drives `DragController` with pointer events against a recording host and
//! checks the chart data, the host calls and the emitted events.

mod common;

use common::*;
use dp_core::model::{Chart, Point, Series};
use dp_core::options::{ChartOptions, DragDropOptions};
use dp_editor::events::{DragEvent, DragListener, DragStartEvent, Propagation};
use dp_editor::host::Animation;
use dp_editor::input::{InputEvent, Modifiers, PointerTarget};
use dp_editor::session::{DragController, Outcome, SessionState};
use kurbo::{Point as Pos, Rect};
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

fn line_options() -> DragDropOptions {
    DragDropOptions::from_json(include_str!("fixtures/line_drag.json")).unwrap()
}

/// `p` and `q` share group `g1`; `r` is alone in `g2`.
fn line_chart(options: ChartOptions, drag: DragDropOptions) -> Chart {
    let (mut chart, x, y) = chart_with_y(options, Doubling);
    chart
        .add_series(
            Series::new("temps", "line").on_axes(x, y).with_drag_drop(drag).with_points([
                Point::new("p").with("x", 5.0).with("y", 10.0).with_custom("groupId", "g1"),
                Point::new("q").with("x", 6.0).with("y", 30.0).with_custom("groupId", "g1"),
                Point::new("r").with("x", 7.0).with("y", 40.0).with_custom("groupId", "g2"),
            ]),
        )
        .unwrap();
    chart
}

fn controller(options: ChartOptions, drag: DragDropOptions) -> DragController<RecordingHost> {
    init_logging();
    let host = RecordingHost::new()
        .with_bounds("p", Rect::new(45.0, 15.0, 55.0, 25.0))
        .with_bounds("q", Rect::new(55.0, 55.0, 65.0, 65.0))
        .with_bounds("r", Rect::new(65.0, 75.0, 75.0, 85.0));
    DragController::new(line_chart(options, drag), host)
}

fn preview_only() -> DragDropOptions {
    DragDropOptions { live_redraw: Some(false), ..line_options() }
}

fn y_of(ctl: &DragController<RecordingHost>, point: &str) -> f64 {
    ctl.chart.point(id(point)).and_then(|p| p.get("y")).unwrap()
}

fn down_on(ctl: &mut DragController<RecordingHost>, point: &str, x: f64, y: f64) -> Outcome {
    ctl.handle(&InputEvent::down(x, y, PointerTarget::Point(id(point))))
}

// ─── Live redraw ────────────────────────────────────────────────────────

#[test]
fn live_drag_moves_group_and_commits() {
    let mut ctl = controller(chart_options(), line_options());

    assert_eq!(down_on(&mut ctl, "p", 50.0, 20.0), Outcome::Armed { resizing: false });
    assert_eq!(ctl.state(), SessionState::Armed);

    // Within the 2 px sensitivity: nothing is computed or redrawn.
    assert_eq!(ctl.handle(&InputEvent::moved(51.0, 21.0)), Outcome::Pending);
    assert_eq!(y_of(&ctl, "p"), 10.0);
    assert!(ctl.host.redraws().is_empty());

    // 6 px down on a `to_pixels(v) = 2v` axis is +3.
    assert_eq!(ctl.handle(&InputEvent::moved(50.0, 26.0)), Outcome::Moved);
    assert_eq!(ctl.state(), SessionState::Dragging);
    assert_eq!(y_of(&ctl, "p"), 13.0);
    assert_eq!(y_of(&ctl, "q"), 33.0, "grouped point moves by the same delta");
    assert_eq!(y_of(&ctl, "r"), 40.0, "other group untouched");
    assert_eq!(ctl.chart.point(id("p")).unwrap().get("x"), Some(5.0), "x drag disabled");

    let up = ctl.handle(&InputEvent::up(50.0, 26.0));
    assert_eq!(up, Outcome::Dropped { committed: true });
    assert!(up.click_suppressed());
    assert_eq!(ctl.state(), SessionState::Idle);
    assert_eq!(
        ctl.host.redraws(),
        vec![Animation::NONE, Animation::over(Duration::from_millis(500))]
    );
}

#[test]
fn animating_flag_is_time_based() {
    let mut ctl = controller(chart_options(), line_options());
    down_on(&mut ctl, "p", 50.0, 20.0);
    ctl.handle(&InputEvent::moved(50.0, 26.0));
    ctl.handle(&InputEvent::up(50.0, 26.0));

    assert!(ctl.is_animating());
    ctl.host.advance(Duration::from_millis(499));
    assert!(ctl.is_animating());
    ctl.host.advance(Duration::from_millis(1));
    assert!(!ctl.is_animating());
}

#[test]
fn down_during_drop_animation_is_ignored() {
    let mut ctl = controller(chart_options(), line_options());
    down_on(&mut ctl, "p", 50.0, 20.0);
    ctl.handle(&InputEvent::moved(50.0, 26.0));
    ctl.handle(&InputEvent::up(50.0, 26.0));

    assert_eq!(down_on(&mut ctl, "r", 70.0, 80.0), Outcome::Ignored);
    ctl.animation_finished();
    assert_eq!(down_on(&mut ctl, "r", 70.0, 80.0), Outcome::Armed { resizing: false });
}

#[test]
fn click_without_drag_is_not_suppressed() {
    let mut ctl = controller(chart_options(), line_options());
    down_on(&mut ctl, "p", 50.0, 20.0);
    ctl.handle(&InputEvent::moved(51.0, 20.0));
    let up = ctl.handle(&InputEvent::up(51.0, 20.0));
    assert_eq!(up, Outcome::Clicked);
    assert!(!up.click_suppressed());
    assert_eq!(y_of(&ctl, "p"), 10.0);
    assert!(ctl.host.redraws().is_empty());
    assert!(!ctl.is_animating());
}

#[test]
fn pointer_leave_reverts_live_changes() {
    let mut ctl = controller(chart_options(), line_options());
    down_on(&mut ctl, "p", 50.0, 20.0);
    ctl.handle(&InputEvent::moved(50.0, 30.0));
    assert_eq!(y_of(&ctl, "p"), 15.0);

    assert_eq!(ctl.handle(&InputEvent::PointerLeave), Outcome::Cancelled);
    assert_eq!(y_of(&ctl, "p"), 10.0);
    assert_eq!(y_of(&ctl, "q"), 30.0);
    assert_eq!(ctl.host.redraws().last(), Some(&Animation::NONE));
    assert_eq!(ctl.state(), SessionState::Idle);
    assert!(!ctl.is_animating());
}

// ─── Guide-box preview ──────────────────────────────────────────────────

#[test]
fn preview_moves_guide_box_and_leaves_data_until_drop() {
    let mut ctl = controller(chart_options(), preview_only());
    down_on(&mut ctl, "p", 50.0, 20.0);
    ctl.handle(&InputEvent::moved(60.0, 26.0));

    // Union of p and q; the x component is masked out.
    assert_eq!(
        ctl.host.guide_rects(),
        vec![Rect::new(45.0, 15.0, 65.0, 65.0), Rect::new(45.0, 21.0, 65.0, 71.0)]
    );
    assert_eq!(y_of(&ctl, "p"), 10.0);

    let pending = serde_json::to_value(&ctl.session().unwrap().pending).unwrap();
    assert_eq!(
        pending,
        serde_json::json!([
            { "id": "p", "values": { "y": 13.0 } },
            { "id": "q", "values": { "y": 33.0 } }
        ])
    );

    assert_eq!(ctl.handle(&InputEvent::up(60.0, 26.0)), Outcome::Dropped { committed: true });
    assert_eq!(y_of(&ctl, "p"), 13.0);
    assert_eq!(y_of(&ctl, "q"), 33.0);
    assert_eq!(ctl.host.count(&Call::RemoveGuide), 1);
    assert_eq!(ctl.host.redraws(), vec![Animation::over(Duration::from_millis(500))]);
}

#[test]
fn guide_box_never_drifts() {
    let mut ctl = controller(chart_options(), preview_only());
    down_on(&mut ctl, "r", 70.0, 80.0);
    for step in 1..=20 {
        ctl.handle(&InputEvent::moved(70.0, 80.0 + step as f64 * 0.7));
    }
    ctl.handle(&InputEvent::moved(70.0, 90.0));
    assert_eq!(ctl.host.guide_rects().last(), Some(&Rect::new(65.0, 85.0, 75.0, 95.0)));
}

// ─── Cancellation & gating ──────────────────────────────────────────────

#[test]
fn zoom_and_pan_keys_gate_the_session() {
    let mut ctl = controller(chart_options(), preview_only());
    let shifted = InputEvent::PointerDown {
        x: 50.0,
        y: 20.0,
        modifiers: Modifiers::SHIFT,
        target: PointerTarget::Point(id("p")),
    };
    assert_eq!(ctl.handle(&shifted), Outcome::Ignored);

    down_on(&mut ctl, "p", 50.0, 20.0);
    ctl.handle(&InputEvent::moved(50.0, 30.0));
    let panning = InputEvent::PointerMove { x: 50.0, y: 34.0, modifiers: Modifiers::ALT };
    assert_eq!(ctl.handle(&panning), Outcome::Cancelled);
    assert_eq!(y_of(&ctl, "p"), 10.0);
    assert_eq!(ctl.host.count(&Call::RemoveGuide), 1);
    assert!(ctl.host.redraws().is_empty());
}

#[test]
fn second_down_closes_the_open_session() {
    let mut ctl = controller(chart_options(), preview_only());
    down_on(&mut ctl, "p", 50.0, 20.0);
    ctl.handle(&InputEvent::moved(50.0, 26.0));

    // The drop animation started by the close does not swallow this down.
    assert_eq!(down_on(&mut ctl, "r", 70.0, 80.0), Outcome::Armed { resizing: false });
    assert_eq!(y_of(&ctl, "p"), 13.0, "first session committed");
    assert!(ctl.is_animating());
    assert_eq!(ctl.session().map(|s| s.anchor), Some(id("r")));
    assert_eq!(ctl.host.redraws(), vec![Animation::over(Duration::from_millis(500))]);

    ctl.handle(&InputEvent::moved(70.0, 84.0));
    assert_eq!(ctl.handle(&InputEvent::up(70.0, 84.0)), Outcome::Dropped { committed: true });
    assert_eq!(y_of(&ctl, "r"), 42.0);
}

#[test]
fn second_down_without_drag_is_a_click_then_arms() {
    let mut ctl = controller(chart_options(), preview_only());
    down_on(&mut ctl, "p", 50.0, 20.0);

    assert_eq!(down_on(&mut ctl, "r", 70.0, 80.0), Outcome::Armed { resizing: false });
    assert!(!ctl.is_animating());
    assert!(ctl.host.redraws().is_empty());
    assert_eq!(ctl.session().map(|s| s.anchor), Some(id("r")));
}

fn shifted_down(point: &str, x: f64, y: f64) -> InputEvent {
    InputEvent::PointerDown { x, y, modifiers: Modifiers::SHIFT, target: PointerTarget::Point(id(point)) }
}

#[test]
fn zoom_key_on_second_down_cancels_preview_drag() {
    let mut ctl = controller(chart_options(), preview_only());
    down_on(&mut ctl, "p", 50.0, 20.0);
    ctl.handle(&InputEvent::moved(50.0, 26.0));
    assert_eq!(ctl.session().map(|s| s.pending.len()), Some(2));

    assert_eq!(ctl.handle(&shifted_down("r", 70.0, 80.0)), Outcome::Cancelled);
    assert_eq!(y_of(&ctl, "p"), 10.0);
    assert_eq!(y_of(&ctl, "q"), 30.0);
    assert_eq!(ctl.state(), SessionState::Idle);
    assert!(ctl.host.redraws().is_empty());
    assert!(!ctl.is_animating());
    assert_eq!(ctl.host.count(&Call::RemoveGuide), 1);
}

#[test]
fn zoom_key_on_second_down_reverts_live_drag() {
    let mut ctl = controller(chart_options(), line_options());
    down_on(&mut ctl, "p", 50.0, 20.0);
    ctl.handle(&InputEvent::moved(50.0, 26.0));
    assert_eq!(y_of(&ctl, "p"), 13.0);

    assert_eq!(ctl.handle(&shifted_down("p", 50.0, 26.0)), Outcome::Cancelled);
    assert_eq!(y_of(&ctl, "p"), 10.0);
    assert_eq!(y_of(&ctl, "q"), 30.0);
    assert_eq!(ctl.host.redraws(), vec![Animation::NONE, Animation::NONE]);
    assert!(!ctl.is_animating());
}

#[test]
fn points_that_cannot_move_do_not_arm() {
    init_logging();
    let (mut chart, x, y) = chart_with_y(chart_options(), Doubling);
    let mut gap = Point::new("gap");
    gap.is_null = true;
    chart
        .add_series(Series::new("s", "scatter").on_axes(x, y).with_drag_drop(line_options()).with_points([
            Point::new("pinned")
                .with("x", 1.0)
                .with("y", 1.0)
                .with_drag_drop(DragDropOptions::draggable(false, false)),
            gap,
        ]))
        .unwrap();
    let mut ctl = DragController::new(chart, RecordingHost::new());

    assert_eq!(down_on(&mut ctl, "pinned", 10.0, 2.0), Outcome::Ignored);
    assert_eq!(down_on(&mut ctl, "gap", 0.0, 0.0), Outcome::Ignored);
    assert_eq!(ctl.handle(&InputEvent::down(5.0, 5.0, PointerTarget::None)), Outcome::Ignored);
    assert_eq!(ctl.handle(&InputEvent::up(5.0, 5.0)), Outcome::Ignored);
}

#[test]
fn polar_chart_is_not_draggable() {
    let options = ChartOptions { polar: true, ..chart_options() };
    let mut ctl = controller(options, line_options());
    assert_eq!(down_on(&mut ctl, "p", 50.0, 20.0), Outcome::Ignored);
}

// ─── Events ─────────────────────────────────────────────────────────────

#[derive(Default, Clone)]
struct Counter {
    starts: Rc<Cell<usize>>,
    drags: Rc<Cell<usize>>,
    drops: Rc<Cell<usize>>,
    veto_drag: bool,
    veto_drop: bool,
}

impl DragListener for Counter {
    fn on_drag_start(&mut self, event: &DragStartEvent<'_>) {
        assert_eq!(event.origin.pointer, Pos::new(50.0, 20.0));
        self.starts.set(self.starts.get() + 1);
    }

    fn on_drag(&mut self, _event: &DragEvent<'_>) -> Propagation {
        self.drags.set(self.drags.get() + 1);
        if self.veto_drag { Propagation::Prevent } else { Propagation::Continue }
    }

    fn on_drop(&mut self, event: &DragEvent<'_>) -> Propagation {
        assert_eq!(event.point, id("p"));
        self.drops.set(self.drops.get() + 1);
        if self.veto_drop { Propagation::Prevent } else { Propagation::Continue }
    }
}

#[test]
fn drag_start_fires_once_per_gesture() {
    let mut ctl = controller(chart_options(), line_options());
    let counter = Counter::default();
    ctl.events_mut().subscribe(counter.clone());

    down_on(&mut ctl, "p", 50.0, 20.0);
    ctl.handle(&InputEvent::moved(51.0, 21.0));
    ctl.handle(&InputEvent::moved(50.0, 26.0));
    ctl.handle(&InputEvent::moved(50.0, 30.0));
    ctl.handle(&InputEvent::up(50.0, 30.0));

    assert_eq!((counter.starts.get(), counter.drags.get(), counter.drops.get()), (1, 2, 1));
}

#[test]
fn prevented_drag_skips_live_update() {
    let mut ctl = controller(chart_options(), line_options());
    ctl.events_mut().subscribe(Counter { veto_drag: true, ..Counter::default() });

    down_on(&mut ctl, "p", 50.0, 20.0);
    assert_eq!(ctl.handle(&InputEvent::moved(50.0, 26.0)), Outcome::Moved);
    assert_eq!(y_of(&ctl, "p"), 10.0);
    assert!(ctl.host.redraws().is_empty());
}

#[test]
fn prevented_drop_does_not_commit() {
    let mut ctl = controller(chart_options(), preview_only());
    ctl.events_mut().subscribe(Counter { veto_drop: true, ..Counter::default() });

    down_on(&mut ctl, "p", 50.0, 20.0);
    ctl.handle(&InputEvent::moved(50.0, 26.0));
    assert_eq!(ctl.handle(&InputEvent::up(50.0, 26.0)), Outcome::Dropped { committed: false });
    assert_eq!(y_of(&ctl, "p"), 10.0);
    assert!(ctl.host.redraws().is_empty());
    assert!(!ctl.is_animating());
    assert_eq!(ctl.host.count(&Call::RemoveGuide), 1);
}
