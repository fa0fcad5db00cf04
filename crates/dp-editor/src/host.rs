//! Collaborator contracts implemented by the host chart.
//!
//! The engine never draws, animates or reads a clock on its own. It asks the
//! host through these traits, which keeps every effect observable in tests.

use dp_core::geometry::ResizeSide;
use dp_core::id::{FieldName, PointId};
use dp_core::options::{GuideBoxStyle, HandleStyle};
use kurbo::{Point, Rect};
use std::time::{Duration, Instant};

/// Animation settings for a redraw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Animation {
    pub duration: Duration,
}

impl Animation {
    pub const NONE: Self = Self { duration: Duration::ZERO };

    pub fn over(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn is_animated(&self) -> bool {
        !self.duration.is_zero()
    }
}

/// A resize handle placed on the edge of a point's shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragHandle {
    pub point: PointId,
    pub field: FieldName,
    pub side: ResizeSide,
    /// Middle of the edge, in chart pixels.
    pub anchor: Point,
}

/// Shape queries and preview primitives.
pub trait Renderer {
    /// Current screen bounds of a point's shape. `Rect::ZERO` when the point
    /// is not drawn.
    fn point_bounds(&self, point: PointId) -> Rect;

    fn show_guide_box(&mut self, rect: Rect, style: &GuideBoxStyle);
    fn update_guide_box(&mut self, rect: Rect);
    fn remove_guide_box(&mut self);

    fn show_handle(&mut self, handle: &DragHandle, style: &HandleStyle);
    fn hide_handles(&mut self);
}

pub trait Redraw {
    /// Fire-and-forget redraw of the chart.
    fn redraw(&mut self, animation: Animation);
}

/// Everything the engine needs from its host.
pub trait ChartHost: Renderer + Redraw {
    fn now(&self) -> Instant;
}
