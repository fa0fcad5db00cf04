//! Guide-box geometry.
//!
//! The guide box is the translucent rectangle shown while dragging. Its
//! position is always derived from the rectangle captured at gesture start,
//! never from the previous frame.

use crate::geometry::{ResizeSide, resize_rect, union_bounds};
use crate::id::PointId;
use crate::model::{Chart, FieldValues};
use crate::options::DEFAULT_GUIDE_STATE;
use crate::registry::FieldDescriptor;
use crate::translate::{masked_delta, x_is_horizontal};
use kurbo::{Rect, Vec2};

#[derive(Debug, Clone, PartialEq)]
pub struct GuideBox {
    pub rect: Rect,
    /// Named style state (`default`, ...).
    pub state: String,
}

impl GuideBox {
    /// Box around every drawn shape, `None` if nothing is drawn.
    pub fn around<I: IntoIterator<Item = Rect>>(bounds: I) -> Option<Self> {
        union_bounds(bounds).map(|rect| Self { rect, state: DEFAULT_GUIDE_STATE.to_string() })
    }
}

/// `origin` moved by the pointer delta along the axes `id` may move on.
pub fn translated_box(chart: &Chart, id: PointId, origin: Rect, delta: Vec2) -> Rect {
    let Some(options) = chart.resolved_options(id) else {
        return origin;
    };
    let allowed = masked_delta(
        delta,
        x_is_horizontal(chart, id),
        (options.draggable_x, options.draggable_y),
    );
    origin + allowed
}

/// Screen edge that `descriptor` moves for point `id`.
///
/// Declared sides describe an upright chart with increasing values towards
/// the top and right; reversed axes and inverted charts are mapped here.
pub fn resize_side(
    chart: &Chart,
    id: PointId,
    descriptor: &FieldDescriptor,
    proposed: &FieldValues,
) -> Option<ResizeSide> {
    let series = chart.series_of(id)?;
    let point = chart.point(id)?;
    let rule = descriptor.resize_side?;
    let axis = chart.axis(series, descriptor.axis)?;
    let ctx = chart.field_context(series, point, descriptor);
    let side = rule.resolve(proposed, &ctx);
    let side = if chart.options.inverted { side.transposed() } else { side };
    Some(side.flipped_if(axis.is_reversed()))
}

/// `origin` with the edge for `descriptor` moved by `delta`.
///
/// The descriptor's `before_resize` hook adjusts the box first, knowing the
/// edge that is about to move. When the field has no side or the point is
/// gone, `origin` is returned unchanged.
pub fn resized_box(
    chart: &Chart,
    id: PointId,
    descriptor: &FieldDescriptor,
    origin: Rect,
    proposed: &FieldValues,
    delta: Vec2,
) -> Rect {
    let (Some(series), Some(point)) = (chart.series_of(id), chart.point(id)) else {
        return origin;
    };
    let Some(side) = resize_side(chart, id, descriptor, proposed) else {
        return origin;
    };
    let mut rect = origin;
    if let Some(hook) = descriptor.before_resize {
        hook(&mut rect, side, proposed, &chart.field_context(series, point, descriptor));
    }
    resize_rect(rect, side, delta)
}
