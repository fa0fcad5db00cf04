//! Value translation: pointer deltas → proposed field values.
//!
//! Every computation is relative to a [`PositionSnapshot`] taken once when
//! the gesture starts. Moves never accumulate onto the previous frame, so
//! repeated small rounding errors cannot drift the result.

use crate::axis::AxisKind;
use crate::id::PointId;
use crate::model::{Chart, FieldValues};
use crate::options::AxisLimits;
use crate::registry::FieldDescriptor;
use kurbo::{Point, Rect, Vec2};
use serde::Serialize;

/// Field values of one point at gesture start.
#[derive(Debug, Clone, PartialEq)]
pub struct PointOrigin {
    pub id: PointId,
    pub values: FieldValues,
}

/// Reference frame of a gesture. Immutable once captured.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSnapshot {
    pub pointer: Point,
    pub guide_box: Option<Rect>,
    pub points: Vec<PointOrigin>,
}

impl PositionSnapshot {
    /// Capture the current values of every registry field of `group`.
    pub fn capture(chart: &Chart, pointer: Point, group: &[PointId], guide_box: Option<Rect>) -> Self {
        let points = group
            .iter()
            .filter_map(|&id| {
                let series = chart.series_of(id)?;
                let point = chart.point(id)?;
                let values = chart
                    .descriptors(series)
                    .iter()
                    .filter_map(|d| point.get(d.name).map(|v| (d.field(), v)))
                    .collect();
                Some(PointOrigin { id, values })
            })
            .collect();
        Self { pointer, guide_box, points }
    }

    pub fn origin_of(&self, id: PointId) -> Option<&FieldValues> {
        self.points.iter().find(|p| p.id == id).map(|p| &p.values)
    }

    /// Pointer travel since the snapshot.
    pub fn delta(&self, pointer: Point) -> Vec2 {
        pointer - self.pointer
    }
}

/// Proposed values for one point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointUpdate {
    pub id: PointId,
    pub values: FieldValues,
}

/// Proposed values for every point of a gesture, in group order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PendingUpdates(Vec<PointUpdate>);

impl PendingUpdates {
    pub fn get(&self, id: PointId) -> Option<&FieldValues> {
        self.0.iter().find(|u| u.id == id).map(|u| &u.values)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointUpdate> {
        self.0.iter()
    }

    /// Number of points in the batch (including ones with nothing to change).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The only update when exactly one point is affected.
    pub fn single(&self) -> Option<&PointUpdate> {
        match self.0.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

impl FromIterator<PointUpdate> for PendingUpdates {
    fn from_iter<I: IntoIterator<Item = PointUpdate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Round to the nearest multiple of `precision` (no-op for 0), then clamp.
pub fn limit_to_range(value: f64, limits: &AxisLimits, default_precision: f64) -> f64 {
    let precision = limits.precision.unwrap_or(default_precision);
    let rounded = if precision > 0.0 { (value / precision).round() * precision } else { value };
    // Not `f64::clamp`: a misconfigured min > max must not panic.
    rounded.max(limits.min).min(limits.max)
}

/// Compute proposed values for `points` after the pointer moved to `pointer`.
///
/// `fields` is the whole movable set for a move, or exactly one descriptor
/// for a resize. Only a single-field update consults `validate`; rejected
/// and non-finite values are omitted rather than clamped.
pub fn compute_updates(
    chart: &Chart,
    origin: &PositionSnapshot,
    pointer: Point,
    fields: &[FieldDescriptor],
    points: &[PointId],
) -> PendingUpdates {
    let delta = origin.delta(pointer);
    let single_field = fields.len() == 1;

    points
        .iter()
        .filter_map(|&id| {
            let series = chart.series_of(id)?;
            let point = chart.point(id)?;
            let start = origin.origin_of(id)?;
            let options = chart.resolved_options(id)?;
            let mut values = FieldValues::new();

            for descriptor in fields {
                let Some(from) = start.get(descriptor.name) else {
                    continue;
                };
                let Some(axis) = chart.axis(series, descriptor.axis) else {
                    continue;
                };
                let pixel_delta = if axis.is_horizontal() { delta.x } else { delta.y };
                let proposed = axis.to_value(axis.to_pixels(from, false) + pixel_delta, false);

                let default_precision = if axis.has_categories() { 1.0 } else { 0.0 };
                let limited = limit_to_range(proposed, &options.limits(descriptor.axis), default_precision);
                if !limited.is_finite() {
                    log::trace!("{id:?}{:?}: non-finite value dropped", descriptor.field());
                    continue;
                }
                if single_field
                    && let Some(validate) = descriptor.validate
                    && !validate(limited, &chart.field_context(series, point, descriptor))
                {
                    log::trace!("{id:?}{:?}: {limited} rejected", descriptor.field());
                    continue;
                }
                values.set(descriptor.field(), limited);
            }
            Some(PointUpdate { id, values })
        })
        .collect()
}

/// Screen delta restricted to the axes that may move, in chart pixels.
///
/// `allow` holds the x/y drag toggles; they apply to whichever screen
/// direction each axis is laid out along.
pub fn masked_delta(delta: Vec2, x_horizontal: bool, allow: (bool, bool)) -> Vec2 {
    let (allow_h, allow_v) = if x_horizontal { allow } else { (allow.1, allow.0) };
    Vec2::new(
        if allow_h { delta.x } else { 0.0 },
        if allow_v { delta.y } else { 0.0 },
    )
}

/// The axis laid out along the screen's x direction for this series.
pub fn x_is_horizontal(chart: &Chart, id: PointId) -> bool {
    chart
        .series_of(id)
        .and_then(|s| chart.axis(s, AxisKind::X))
        .is_none_or(|a| a.is_horizontal())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{Axis, LinearAxis};
    use crate::model::{Point as DataPoint, Series};
    use crate::options::DragDropOptions;
    use crate::registry::{RANGE, SIMPLE};
    use pretty_assertions::assert_eq;

    /// `to_pixels(v) = 2v` on a vertical axis.
    struct Doubling;

    impl Axis for Doubling {
        fn to_pixels(&self, value: f64, _: bool) -> f64 {
            value * 2.0
        }
        fn to_value(&self, pixel: f64, _: bool) -> f64 {
            pixel / 2.0
        }
        fn is_reversed(&self) -> bool {
            false
        }
        fn is_horizontal(&self) -> bool {
            false
        }
    }

    fn id(s: &str) -> PointId {
        PointId::intern(s)
    }

    fn close(actual: Option<f64>, expected: f64) -> bool {
        actual.is_some_and(|v| (v - expected).abs() < 1e-9)
    }

    fn y_only() -> Vec<FieldDescriptor> {
        SIMPLE.iter().filter(|d| d.name == "y").copied().collect()
    }

    fn doubling_chart(options: DragDropOptions, points: Vec<DataPoint>) -> Chart {
        let mut chart = Chart::default();
        let x = chart.add_axis(LinearAxis::horizontal(0.0, 100.0, 0.0, 100.0));
        let y = chart.add_axis(Doubling);
        chart
            .add_series(Series::new("s", "line").on_axes(x, y).with_drag_drop(options).with_points(points))
            .unwrap();
        chart
    }

    #[test]
    fn doubling_axis_moves_y_from_10_to_13() {
        let chart = doubling_chart(
            DragDropOptions::draggable(false, true),
            vec![DataPoint::new("p").with("x", 1.0).with("y", 10.0)],
        );
        let origin = PositionSnapshot::capture(&chart, Point::new(50.0, 50.0), &[id("p")], None);
        let updates = compute_updates(&chart, &origin, Point::new(50.0, 56.0), &y_only(), &[id("p")]);
        assert_eq!(updates.get(id("p")).and_then(|v| v.get("y")), Some(13.0));
    }

    #[test]
    fn recomputing_is_idempotent() {
        let chart = doubling_chart(
            DragDropOptions { drag_precision_y: Some(0.5), ..DragDropOptions::draggable(true, true) },
            vec![DataPoint::new("q").with("x", 3.0).with("y", 7.0)],
        );
        let origin = PositionSnapshot::capture(&chart, Point::new(0.0, 0.0), &[id("q")], None);
        let first = compute_updates(&chart, &origin, Point::new(13.3, -4.7), SIMPLE, &[id("q")]);
        let second = compute_updates(&chart, &origin, Point::new(13.3, -4.7), SIMPLE, &[id("q")]);
        assert_eq!(first, second);
    }

    #[test]
    fn precision_and_limits() {
        let limits = AxisLimits { min: -10.0, max: 10.0, precision: Some(2.5) };
        assert_eq!(limit_to_range(3.6, &limits, 0.0), 2.5);
        assert_eq!(limit_to_range(3.8, &limits, 0.0), 5.0);
        assert_eq!(limit_to_range(42.0, &limits, 0.0), 10.0);
        assert_eq!(limit_to_range(-42.0, &limits, 0.0), -10.0);
        let no_rounding = AxisLimits { precision: Some(0.0), ..AxisLimits::default() };
        assert_eq!(limit_to_range(3.14159, &no_rounding, 1.0), 3.14159);
        assert_eq!(limit_to_range(3.6, &AxisLimits::default(), 1.0), 4.0);
    }

    #[test]
    fn precision_grid_stays_inside_limits() {
        let limits = AxisLimits { min: -6.0, max: 9.0, precision: Some(3.0) };
        let mut v = -20.0;
        while v < 20.0 {
            let out = limit_to_range(v, &limits, 0.0);
            assert!((-6.0..=9.0).contains(&out), "{v} → {out}");
            assert!((out / 3.0 - (out / 3.0).round()).abs() < 1e-9, "{v} → {out}");
            v += 0.37;
        }
    }

    #[test]
    fn misconfigured_limits_do_not_panic() {
        let limits = AxisLimits { min: 5.0, max: 1.0, precision: None };
        assert_eq!(limit_to_range(3.0, &limits, 0.0), 1.0);
    }

    #[test]
    fn single_field_resize_rejects_invalid_value() {
        let mut chart = Chart::default();
        let x = chart.add_axis(LinearAxis::horizontal(0.0, 10.0, 0.0, 100.0));
        let y = chart.add_axis(LinearAxis::vertical(0.0, 20.0, 0.0, 200.0));
        chart
            .add_series(
                Series::new("r", "arearange")
                    .on_axes(x, y)
                    .with_drag_drop(DragDropOptions::draggable(false, true))
                    .with_points([DataPoint::new("band").with("x", 1.0).with("low", 5.0).with("high", 15.0)]),
            )
            .unwrap();
        let low: Vec<_> = RANGE.iter().filter(|d| d.name == "low").copied().collect();
        let origin = PositionSnapshot::capture(&chart, Point::new(10.0, 150.0), &[id("band")], None);

        // 10 px per unit, upwards: -110 px proposes low = 16.
        let rejected = compute_updates(&chart, &origin, Point::new(10.0, 40.0), &low, &[id("band")]);
        assert!(rejected.get(id("band")).unwrap().is_empty());

        let accepted = compute_updates(&chart, &origin, Point::new(10.0, 110.0), &low, &[id("band")]);
        assert!(close(accepted.get(id("band")).unwrap().get("low"), 9.0));
    }

    #[test]
    fn whole_point_move_skips_validation() {
        let mut chart = Chart::default();
        let x = chart.add_axis(LinearAxis::horizontal(0.0, 10.0, 0.0, 100.0));
        let y = chart.add_axis(LinearAxis::vertical(0.0, 20.0, 0.0, 200.0));
        chart
            .add_series(
                Series::new("r", "arearange")
                    .on_axes(x, y)
                    .with_points([DataPoint::new("b2").with("x", 1.0).with("low", 5.0).with("high", 15.0)]),
            )
            .unwrap();
        let origin = PositionSnapshot::capture(&chart, Point::new(0.0, 0.0), &[id("b2")], None);
        let updates = compute_updates(&chart, &origin, Point::new(0.0, -20.0), RANGE, &[id("b2")]);
        let values = updates.get(id("b2")).unwrap();
        assert!(close(values.get("x"), 1.0));
        assert!(close(values.get("low"), 7.0));
        assert!(close(values.get("high"), 17.0));
    }

    #[test]
    fn category_axis_snaps_to_whole_values() {
        let mut chart = Chart::default();
        let x = chart.add_axis(LinearAxis::horizontal(0.0, 4.0, 0.0, 400.0).with_categories(["a", "b", "c", "d"]));
        let y = chart.add_axis(LinearAxis::vertical(0.0, 10.0, 0.0, 100.0));
        chart
            .add_series(
                Series::new("s", "line")
                    .on_axes(x, y)
                    .with_drag_drop(DragDropOptions::draggable(true, false))
                    .with_points([DataPoint::new("cat").with("x", 1.0).with("y", 1.0)]),
            )
            .unwrap();
        let x_only: Vec<_> = SIMPLE.iter().filter(|d| d.name == "x").copied().collect();
        let origin = PositionSnapshot::capture(&chart, Point::new(100.0, 0.0), &[id("cat")], None);
        let updates = compute_updates(&chart, &origin, Point::new(237.0, 0.0), &x_only, &[id("cat")]);
        assert_eq!(updates.get(id("cat")).unwrap().get("x"), Some(2.0));
    }

    #[test]
    fn masked_delta_follows_axis_orientation() {
        let d = Vec2::new(4.0, 9.0);
        assert_eq!(masked_delta(d, true, (true, false)), Vec2::new(4.0, 0.0));
        // Inverted chart: x runs vertically.
        assert_eq!(masked_delta(d, false, (true, false)), Vec2::new(0.0, 9.0));
    }

    #[test]
    fn pending_updates_single() {
        let one: PendingUpdates = [PointUpdate { id: id("u1"), values: FieldValues::new() }].into_iter().collect();
        assert_eq!(one.single().map(|u| u.id), Some(id("u1")));
        let two: PendingUpdates = [
            PointUpdate { id: id("u1"), values: FieldValues::new() },
            PointUpdate { id: id("u2"), values: FieldValues::new() },
        ]
        .into_iter()
        .collect();
        assert!(two.single().is_none());
        assert_eq!(two.len(), 2);
    }
}
