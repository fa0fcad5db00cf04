//! Pointer input as delivered by the host chart.
//!
//! Coordinates are chart pixels. The host performs hit testing and tells
//! the engine what sits under the pointer through [`PointerTarget`].

use dp_core::ModifierKey;
use dp_core::id::{FieldName, PointId};
use kurbo::Point;

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false, meta: false };
    pub const SHIFT: Self = Self { shift: true, ..Self::NONE };
    pub const CTRL: Self = Self { ctrl: true, ..Self::NONE };
    pub const ALT: Self = Self { alt: true, ..Self::NONE };

    pub fn is_held(&self, key: ModifierKey) -> bool {
        match key {
            ModifierKey::Shift => self.shift,
            ModifierKey::Ctrl => self.ctrl,
            ModifierKey::Alt => self.alt,
            ModifierKey::Meta => self.meta,
        }
    }

    /// Any of the given (optional) keys is held.
    pub fn holds_any(&self, keys: &[Option<ModifierKey>]) -> bool {
        keys.iter().flatten().any(|k| self.is_held(*k))
    }
}

/// What the pointer is over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerTarget {
    #[default]
    None,
    /// The body of a point's shape.
    Point(PointId),
    /// A resize handle of one field of a point.
    Handle { point: PointId, field: FieldName },
}

impl PointerTarget {
    pub fn point(&self) -> Option<PointId> {
        match self {
            Self::None => None,
            Self::Point(id) | Self::Handle { point: id, .. } => Some(*id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64, modifiers: Modifiers, target: PointerTarget },
    PointerMove { x: f64, y: f64, modifiers: Modifiers },
    PointerUp { x: f64, y: f64, modifiers: Modifiers },
    /// The pointer left the chart area.
    PointerLeave,
}

impl InputEvent {
    pub fn down(x: f64, y: f64, target: PointerTarget) -> Self {
        Self::PointerDown { x, y, modifiers: Modifiers::NONE, target }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y, modifiers: Modifiers::NONE }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::PointerUp { x, y, modifiers: Modifiers::NONE }
    }

    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. } | Self::PointerMove { x, y, .. } | Self::PointerUp { x, y, .. } => {
                Some(Point::new(*x, *y))
            }
            Self::PointerLeave => None,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            Self::PointerDown { modifiers, .. }
            | Self::PointerMove { modifiers, .. }
            | Self::PointerUp { modifiers, .. } => *modifiers,
            Self::PointerLeave => Modifiers::NONE,
        }
    }
}
