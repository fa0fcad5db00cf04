//! Draggability predicates.
//!
//! Pure functions over the chart's current configuration. Nothing is cached:
//! options may change between redraws, so callers re-evaluate on every event.

use crate::axis::AxisKind;
use crate::id::PointId;
use crate::model::{Chart, Series};
use crate::options::ResolvedDragOptions;
use crate::registry::FieldDescriptor;
use smallvec::SmallVec;

/// Descriptor subset selected for one gesture.
pub type FieldSet = SmallVec<[FieldDescriptor; 4]>;

/// Any axis toggle or per-field toggle is on in the series options.
pub fn is_series_draggable(series: &Series, descriptors: &[FieldDescriptor]) -> bool {
    let Some(options) = &series.drag_drop else {
        return false;
    };
    options.draggable_x == Some(true)
        || options.draggable_y == Some(true)
        || descriptors
            .iter()
            .filter_map(|d| d.option_name)
            .any(|name| options.toggle(name) == Some(true))
}

/// The chart has cartesian series and at least one of them is draggable.
pub fn is_chart_draggable(chart: &Chart) -> bool {
    !chart.options.polar
        && chart.has_cartesian_series()
        && chart
            .series
            .iter()
            .any(|s| is_series_draggable(s, chart.descriptors(s)))
}

/// Whether the whole point may be moved.
///
/// Requires a movable field on an axis enabled at series level, no
/// point-level opt-out of both axes, and resolvable axes.
pub fn is_point_movable(chart: &Chart, id: PointId) -> bool {
    let Some((si, pi)) = chart.locate(id) else {
        return false;
    };
    let series = &chart.series[si];
    let point = &series.points[pi];
    let descriptors = chart.descriptors(series);
    let series_opts = series.drag_drop.clone().unwrap_or_default();

    let has_movable = |axis: AxisKind| descriptors.iter().any(|d| d.axis == axis && d.movable);
    let series_allows = (series_opts.draggable_x == Some(true) && has_movable(AxisKind::X))
        || (series_opts.draggable_y == Some(true) && has_movable(AxisKind::Y));

    let point_opts = point.drag_drop.as_ref();
    let point_opts_out = point_opts
        .is_some_and(|o| o.draggable_x == Some(false) && o.draggable_y == Some(false));

    series_allows && !point_opts_out && chart.has_axes(series)
}

/// Fields that follow a whole-point move under `options`.
pub fn movable_fields(descriptors: &[FieldDescriptor], options: &ResolvedDragOptions) -> FieldSet {
    descriptors
        .iter()
        .filter(|d| d.movable && options.axis_enabled(d.axis))
        .filter(|d| d.option_name.and_then(|n| options.toggle(n)) != Some(false))
        .copied()
        .collect()
}

/// Fields that get a resize handle under `options`.
///
/// A field is resizable when its axis toggle or its own toggle is on, and
/// its own toggle is not explicitly off.
pub fn resizable_fields(descriptors: &[FieldDescriptor], options: &ResolvedDragOptions) -> FieldSet {
    descriptors
        .iter()
        .filter(|d| d.resizable && d.resize_side.is_some())
        .filter(|d| {
            let own = d.option_name.and_then(|n| options.toggle(n));
            own != Some(false) && (options.axis_enabled(d.axis) || own == Some(true))
        })
        .copied()
        .collect()
}

/// Resize handles for a point, empty when the point cannot be resized.
pub fn point_resizable_fields(chart: &Chart, id: PointId) -> FieldSet {
    let Some(series) = chart.series_of(id) else {
        return FieldSet::new();
    };
    let Some(point) = chart.point(id) else {
        return FieldSet::new();
    };
    let Some(options) = chart.resolved_options(id) else {
        return FieldSet::new();
    };
    if point.is_null || !chart.has_axes(series) {
        return FieldSet::new();
    }
    resizable_fields(chart.descriptors(series), &options)
}
