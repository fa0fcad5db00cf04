//! Point-level drag events.
//!
//! Listeners observe `dragStart`, `drag` and `drop`. `drag` and `drop` have a
//! default action (preview update and commit respectively) that any single
//! listener can suppress.

use dp_core::id::{FieldName, PointId};
use dp_core::translate::{PendingUpdates, PositionSnapshot};
use kurbo::Point;

/// Whether the default action of an event still runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Propagation {
    #[default]
    Continue,
    Prevent,
}

/// Fired once, when the pointer first travels past the sensitivity threshold.
#[derive(Debug, Clone, Copy)]
pub struct DragStartEvent<'a> {
    /// The point the gesture started on.
    pub point: PointId,
    pub origin: &'a PositionSnapshot,
    pub pointer: Point,
    pub resizing: Option<FieldName>,
}

/// Fired on every dragging move and once on drop.
#[derive(Debug, Clone, Copy)]
pub struct DragEvent<'a> {
    pub point: PointId,
    pub origin: &'a PositionSnapshot,
    pub updates: &'a PendingUpdates,
    pub pointer: Point,
    pub resizing: Option<FieldName>,
}

pub trait DragListener {
    fn on_drag_start(&mut self, _event: &DragStartEvent<'_>) {}

    fn on_drag(&mut self, _event: &DragEvent<'_>) -> Propagation {
        Propagation::Continue
    }

    fn on_drop(&mut self, _event: &DragEvent<'_>) -> Propagation {
        Propagation::Continue
    }
}

/// Ordered listener list. Every listener sees every event.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn DragListener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl DragListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn drag_start(&mut self, event: &DragStartEvent<'_>) {
        for l in &mut self.listeners {
            l.on_drag_start(event);
        }
    }

    pub fn drag(&mut self, event: &DragEvent<'_>) -> Propagation {
        self.fold(|l| l.on_drag(event))
    }

    pub fn drop(&mut self, event: &DragEvent<'_>) -> Propagation {
        self.fold(|l| l.on_drop(event))
    }

    fn fold(&mut self, mut f: impl FnMut(&mut dyn DragListener) -> Propagation) -> Propagation {
        let mut result = Propagation::Continue;
        for l in &mut self.listeners {
            if f(l.as_mut()) == Propagation::Prevent {
                result = Propagation::Prevent;
            }
        }
        result
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus").field("listeners", &self.listeners.len()).finish()
    }
}
