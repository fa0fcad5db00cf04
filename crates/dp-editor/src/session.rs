//! Drag session state machine.
//!
//! One [`DragController`] per chart. It owns the chart, the host, the
//! optional active [`DragSession`] and the drop-animation gate, and exposes
//! explicit hooks the host's event dispatch calls directly.
//!
//! ```text
//!   Idle ──down on movable point / handle──▶ Armed
//!   Armed ──move past sensitivity──▶ Dragging
//!   Armed ──up──▶ Idle (click)
//!   Dragging ──up──▶ Idle (drop → commit)
//!   Armed / Dragging ──down──▶ close as up, then evaluate the down
//!   any ──leave / zoom-pan modifier──▶ Idle (cancel)
//! ```
//!
//! ## Modifier behaviors
//!
//! | Modifier            | Pointer down                | Pointer move      |
//! |---------------------|-----------------------------|-------------------|
//! | chart `zoomKey`     | cancels session, no new one | cancels session   |
//! | chart `panKey`      | cancels session, no new one | cancels session   |

use crate::commit::{AnimationGate, apply_updates, commit, restore_origin};
use crate::events::{DragEvent, DragStartEvent, EventBus, Propagation};
use crate::host::{Animation, ChartHost, DragHandle};
use crate::input::{InputEvent, Modifiers, PointerTarget};
use dp_core::guide::{GuideBox, resize_side, resized_box, translated_box};
use dp_core::id::PointId;
use dp_core::model::{Chart, FieldValues};
use dp_core::options::{DEFAULT_GUIDE_STATE, ResolvedDragOptions};
use dp_core::predicates::{FieldSet, is_chart_draggable, is_point_movable, movable_fields, point_resizable_fields};
use dp_core::registry::FieldDescriptor;
use dp_core::translate::{PendingUpdates, PositionSnapshot, compute_updates};
use kurbo::{Point, Rect};
use smallvec::{SmallVec, smallvec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// Pointer is down but has not yet travelled past the sensitivity.
    Armed,
    Dragging,
}

/// What a hook call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing happened.
    Ignored,
    Armed { resizing: bool },
    /// Moved, but still within the sensitivity threshold.
    Pending,
    Moved,
    Dropped { committed: bool },
    /// Released without dragging.
    Clicked,
    Cancelled,
}

impl Outcome {
    /// The host should not run its click handler for this pointer-up.
    pub fn click_suppressed(&self) -> bool {
        matches!(self, Self::Dropped { .. })
    }
}

/// State of one gesture, discarded when the gesture ends.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub anchor: PointId,
    /// Anchor plus every point sharing its grouping key, in series order.
    pub group: SmallVec<[PointId; 4]>,
    pub origin: PositionSnapshot,
    /// Set when the gesture started on a resize handle.
    pub resizing: Option<FieldDescriptor>,
    /// Fields updated by this gesture.
    pub fields: FieldSet,
    pub past_sensitivity: bool,
    pub pending: PendingUpdates,
    pub guide: Option<GuideBox>,
    pub options: ResolvedDragOptions,
    live_applied: bool,
}

impl DragSession {
    pub fn state(&self) -> SessionState {
        if self.past_sensitivity { SessionState::Dragging } else { SessionState::Armed }
    }

    fn drag_event(&self, pointer: Point) -> DragEvent<'_> {
        DragEvent {
            point: self.anchor,
            origin: &self.origin,
            updates: &self.pending,
            pointer,
            resizing: self.resizing.map(|d| d.field()),
        }
    }
}

pub struct DragController<H: ChartHost> {
    pub chart: Chart,
    pub host: H,
    session: Option<DragSession>,
    gate: AnimationGate,
    events: EventBus,
}

impl<H: ChartHost> DragController<H> {
    pub fn new(chart: Chart, host: H) -> Self {
        Self { chart, host, session: None, gate: AnimationGate::default(), events: EventBus::new() }
    }

    pub fn state(&self) -> SessionState {
        self.session.as_ref().map_or(SessionState::Idle, DragSession::state)
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// A drop animation is still running.
    pub fn is_animating(&self) -> bool {
        self.gate.is_active(self.host.now())
    }

    /// The host finished the drop animation before the deadline.
    pub fn animation_finished(&mut self) {
        self.gate.finish();
    }

    /// Dispatch a raw input event to the matching hook.
    pub fn handle(&mut self, event: &InputEvent) -> Outcome {
        match *event {
            InputEvent::PointerDown { x, y, modifiers, target } => {
                self.on_pointer_down(Point::new(x, y), modifiers, target)
            }
            InputEvent::PointerMove { x, y, modifiers } => self.on_pointer_move(Point::new(x, y), modifiers),
            InputEvent::PointerUp { x, y, .. } => self.on_pointer_up(Point::new(x, y)),
            InputEvent::PointerLeave => self.on_pointer_leave(),
        }
    }

    // ─── Pointer hooks ───────────────────────────────────────────────────

    pub fn on_pointer_down(&mut self, pos: Point, modifiers: Modifiers, target: PointerTarget) -> Outcome {
        if self.zoom_or_pan_held(modifiers) {
            return if self.session.is_some() { self.cancel() } else { Outcome::Ignored };
        }
        if self.session.is_some() {
            // The drop animation this close may start does not gate the new down.
            log::debug!("pointer down during a session; closing it first");
            self.on_pointer_up(pos);
        } else if self.is_animating() {
            log::trace!("pointer down ignored while the drop animation runs");
            return Outcome::Ignored;
        }
        if !is_chart_draggable(&self.chart) {
            return Outcome::Ignored;
        }
        let Some(anchor) = target.point() else {
            return Outcome::Ignored;
        };
        match self.open_session(anchor, pos, target) {
            Some(session) => {
                let resizing = session.resizing.is_some();
                log::debug!(
                    "armed {anchor:?} ({} point(s), {})",
                    session.group.len(),
                    session.resizing.map_or("move".to_string(), |d| format!("resize .{}", d.name)),
                );
                self.session = Some(session);
                Outcome::Armed { resizing }
            }
            None => Outcome::Ignored,
        }
    }

    pub fn on_pointer_move(&mut self, pos: Point, modifiers: Modifiers) -> Outcome {
        if self.session.is_none() {
            return Outcome::Ignored;
        }
        if self.zoom_or_pan_held(modifiers) {
            return self.cancel();
        }
        let Self { chart, host, session, events, .. } = self;
        let Some(session) = session.as_mut() else {
            return Outcome::Ignored;
        };

        if !session.past_sensitivity {
            if (pos - session.origin.pointer).hypot() <= session.options.sensitivity {
                return Outcome::Pending;
            }
            session.past_sensitivity = true;
            log::debug!("dragging {:?}", session.anchor);
            events.drag_start(&DragStartEvent {
                point: session.anchor,
                origin: &session.origin,
                pointer: pos,
                resizing: session.resizing.map(|d| d.field()),
            });
            if !session.options.live_redraw {
                host.hide_handles();
            }
            if let Some(rect) = session.origin.guide_box {
                let state = DEFAULT_GUIDE_STATE.to_string();
                host.show_guide_box(rect, &session.options.guide_box_style(&state));
                session.guide = Some(GuideBox { rect, state });
            }
        }

        session.pending = compute_updates(chart, &session.origin, pos, &session.fields, &session.group);
        log::trace!("{:?} → {:?}", session.anchor, session.pending);

        if events.drag(&session.drag_event(pos)) == Propagation::Prevent {
            return Outcome::Moved;
        }

        if session.options.live_redraw {
            apply_updates(chart, &session.pending);
            session.live_applied = true;
            host.redraw(Animation::NONE);
            host.hide_handles();
            show_handles(chart, host, session.anchor);
        } else if let (Some(guide), Some(origin_rect)) = (session.guide.as_mut(), session.origin.guide_box) {
            let delta = session.origin.delta(pos);
            guide.rect = match &session.resizing {
                Some(d) => {
                    let empty = FieldValues::new();
                    let proposed = session.pending.get(session.anchor).unwrap_or(&empty);
                    resized_box(chart, session.anchor, d, origin_rect, proposed, delta)
                }
                None => translated_box(chart, session.anchor, origin_rect, delta),
            };
            host.update_guide_box(guide.rect);
        }
        Outcome::Moved
    }

    pub fn on_pointer_up(&mut self, pos: Point) -> Outcome {
        let Some(session) = self.session.take() else {
            return Outcome::Ignored;
        };
        let outcome = if session.past_sensitivity {
            let committed = self.events.drop(&session.drag_event(pos)) == Propagation::Continue;
            if committed {
                commit(&mut self.chart, &mut self.host, &session.pending, &mut self.gate);
            } else {
                log::debug!("drop of {:?} prevented by a listener", session.anchor);
            }
            Outcome::Dropped { committed }
        } else {
            Outcome::Clicked
        };
        self.release(&session);
        outcome
    }

    pub fn on_pointer_leave(&mut self) -> Outcome {
        if self.session.is_some() { self.cancel() } else { Outcome::Ignored }
    }

    // ─── Hover hooks ─────────────────────────────────────────────────────

    /// Show resize handles for `point`. Returns how many were shown.
    pub fn on_point_hover(&mut self, point: PointId) -> usize {
        if self.session.is_some() || self.is_animating() || !is_chart_draggable(&self.chart) {
            return 0;
        }
        self.host.hide_handles();
        show_handles(&self.chart, &mut self.host, point)
    }

    pub fn on_point_leave(&mut self, _point: PointId) {
        if self.session.is_none() {
            self.host.hide_handles();
        }
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn zoom_or_pan_held(&self, modifiers: Modifiers) -> bool {
        modifiers.holds_any(&[self.chart.options.zoom_key, self.chart.options.pan_key])
    }

    fn open_session(&self, anchor: PointId, pos: Point, target: PointerTarget) -> Option<DragSession> {
        let chart = &self.chart;
        let point = chart.point(anchor)?;
        if point.is_null {
            return None;
        }
        let series = chart.series_of(anchor)?;
        let options = chart.resolved_options(anchor)?;

        let (resizing, fields): (Option<FieldDescriptor>, FieldSet) = match target {
            PointerTarget::Handle { field, .. } => {
                let d = point_resizable_fields(chart, anchor).into_iter().find(|d| d.field() == field)?;
                (Some(d), smallvec![d])
            }
            PointerTarget::Point(_) if is_point_movable(chart, anchor) => {
                (None, movable_fields(chart.descriptors(series), &options))
            }
            _ => return None,
        };
        if fields.is_empty() {
            return None;
        }

        let group = group_of(chart, anchor, options.group_by.as_deref());
        let guide_box = if options.live_redraw {
            None
        } else {
            GuideBox::around(group.iter().map(|id| self.host.point_bounds(*id))).map(|g| g.rect)
        };
        let origin = PositionSnapshot::capture(chart, pos, &group, guide_box);

        Some(DragSession {
            anchor,
            group,
            origin,
            resizing,
            fields,
            past_sensitivity: false,
            pending: PendingUpdates::default(),
            guide: None,
            options,
            live_applied: false,
        })
    }

    /// End the session without committing.
    fn cancel(&mut self) -> Outcome {
        let Some(session) = self.session.take() else {
            return Outcome::Ignored;
        };
        if session.live_applied {
            restore_origin(&mut self.chart, &session.origin);
            self.host.redraw(Animation::NONE);
        }
        log::debug!("cancelled drag of {:?}", session.anchor);
        self.release(&session);
        Outcome::Cancelled
    }

    fn release(&mut self, session: &DragSession) {
        if session.guide.is_some() {
            self.host.remove_guide_box();
        }
        self.host.hide_handles();
    }
}

/// The anchor and every point of its series with the same grouping value.
fn group_of(chart: &Chart, anchor: PointId, key: Option<&str>) -> SmallVec<[PointId; 4]> {
    let value = key.zip(chart.point(anchor)).and_then(|(k, p)| p.group_value(k).map(|v| (k, v)));
    match (value, chart.series_of(anchor)) {
        (Some((key, value)), Some(series)) => series
            .points
            .iter()
            .filter(|p| p.group_value(key) == Some(value))
            .map(|p| p.id)
            .collect(),
        _ => smallvec![anchor],
    }
}

/// Place one handle per resizable field of `point`, on the edge it moves.
fn show_handles<H: ChartHost + ?Sized>(chart: &Chart, host: &mut H, point: PointId) -> usize {
    let fields = point_resizable_fields(chart, point);
    if fields.is_empty() {
        return 0;
    }
    let bounds = host.point_bounds(point);
    if bounds == Rect::ZERO {
        return 0;
    }
    let Some(style) = chart.resolved_options(point).map(|o| o.drag_handle) else {
        return 0;
    };
    let current = FieldValues::new();
    let mut shown = 0;
    for d in &fields {
        let Some(side) = resize_side(chart, point, d, &current) else {
            continue;
        };
        let handle = DragHandle { point, field: d.field(), side, anchor: side.anchor_on(bounds.abs()) };
        host.show_handle(&handle, &style);
        shown += 1;
    }
    shown
}
