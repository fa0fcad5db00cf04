//! Chart data model as seen by the drag engine.
//!
//! A `Chart` owns its axes, its series and a handle to the capability
//! registry. Series reference axes by index; a series whose axis index does
//! not resolve is treated as non-cartesian and its points never move.

use crate::axis::{Axis, AxisKind};
use crate::id::{FieldName, PointId};
use crate::options::{ChartOptions, DragDropOptions, ResolvedDragOptions};
use crate::registry::{FieldContext, FieldDescriptor, Registry};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::sync::Arc;

// ─── Field values ────────────────────────────────────────────────────────

/// Small ordered field → value table. Most points carry 2–5 fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValues(SmallVec<[(FieldName, f64); 4]>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: impl Into<FieldName>) -> Option<f64> {
        let field = field.into();
        self.0.iter().find(|(f, _)| *f == field).map(|(_, v)| *v)
    }

    /// Insert or overwrite, keeping first-insertion order.
    pub fn set(&mut self, field: impl Into<FieldName>, value: f64) {
        let field = field.into();
        match self.0.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = value,
            None => self.0.push((field, value)),
        }
    }

    pub fn remove(&mut self, field: impl Into<FieldName>) -> Option<f64> {
        let field = field.into();
        let pos = self.0.iter().position(|(f, _)| *f == field)?;
        Some(self.0.remove(pos).1)
    }

    pub fn contains(&self, field: impl Into<FieldName>) -> bool {
        self.get(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, f64)> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<F: Into<FieldName>> FromIterator<(F, f64)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (F, f64)>>(iter: I) -> Self {
        let mut values = FieldValues::new();
        for (f, v) in iter {
            values.set(f, v);
        }
        values
    }
}

impl Serialize for FieldValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, value) in &self.0 {
            map.serialize_entry(field.as_str(), value)?;
        }
        map.end()
    }
}

// ─── Points & series ─────────────────────────────────────────────────────

/// A data point with numeric fields and free-form custom attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub id: PointId,
    pub values: FieldValues,
    /// Point-level overrides of the series drag-drop options.
    pub drag_drop: Option<DragDropOptions>,
    /// Custom attributes; the drag `groupBy` key is looked up here.
    pub custom: BTreeMap<String, serde_json::Value>,
    pub is_null: bool,
}

impl Point {
    pub fn new(id: impl Into<PointId>) -> Self {
        Self {
            id: id.into(),
            values: FieldValues::new(),
            drag_drop: None,
            custom: BTreeMap::new(),
            is_null: false,
        }
    }

    pub fn with(mut self, field: &str, value: f64) -> Self {
        self.values.set(field, value);
        self
    }

    pub fn with_custom(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.custom.insert(key.to_string(), value.into());
        self
    }

    pub fn with_drag_drop(mut self, options: DragDropOptions) -> Self {
        self.drag_drop = Some(options);
        self
    }

    pub fn get(&self, field: impl Into<FieldName>) -> Option<f64> {
        self.values.get(field)
    }

    pub fn set(&mut self, field: impl Into<FieldName>, value: f64) {
        self.values.set(field, value);
    }

    /// Grouping key value, ignoring JSON `null`.
    pub fn group_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.custom.get(key).filter(|v| !v.is_null())
    }
}

/// A series: a type tag resolved against the registry plus its points.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    /// Registry tag (`line`, `column`, `arearange`, `xrange`, ...).
    pub kind: String,
    pub x_axis: Option<usize>,
    pub y_axis: Option<usize>,
    /// Baseline value for column-like series.
    pub threshold: f64,
    /// `None` means dragging was never configured for this series.
    pub drag_drop: Option<DragDropOptions>,
    pub points: Vec<Point>,
}

impl Series {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            x_axis: None,
            y_axis: None,
            threshold: 0.0,
            drag_drop: None,
            points: Vec::new(),
        }
    }

    pub fn on_axes(mut self, x_axis: usize, y_axis: usize) -> Self {
        self.x_axis = Some(x_axis);
        self.y_axis = Some(y_axis);
        self
    }

    pub fn with_drag_drop(mut self, options: DragDropOptions) -> Self {
        self.drag_drop = Some(options);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_points<I: IntoIterator<Item = Point>>(mut self, points: I) -> Self {
        self.points.extend(points);
        self
    }

    pub fn axis_index(&self, axis: AxisKind) -> Option<usize> {
        match axis {
            AxisKind::X => self.x_axis,
            AxisKind::Y => self.y_axis,
        }
    }
}

// ─── Chart ───────────────────────────────────────────────────────────────

/// Position of a point inside a chart: `(series index, point index)`.
pub type PointLocation = (usize, usize);

pub struct Chart {
    pub options: ChartOptions,
    pub axes: Vec<Box<dyn Axis>>,
    pub series: Vec<Series>,
    registry: Arc<Registry>,
}

impl Default for Chart {
    fn default() -> Self {
        Self::new(ChartOptions::default())
    }
}

impl Chart {
    /// A chart using the built-in series types.
    pub fn new(options: ChartOptions) -> Self {
        Self::with_registry(options, Registry::builtin())
    }

    pub fn with_registry(options: ChartOptions, registry: Arc<Registry>) -> Self {
        Self { options, axes: Vec::new(), series: Vec::new(), registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Add an axis, returning its index for series to reference.
    pub fn add_axis(&mut self, axis: impl Axis + 'static) -> usize {
        self.axes.push(Box::new(axis));
        self.axes.len() - 1
    }

    /// Add a series. Fails if its type tag is not registered.
    pub fn add_series(&mut self, series: Series) -> Result<usize, String> {
        if self.registry.get(&series.kind).is_none() {
            return Err(format!("unknown series type `{}`", series.kind));
        }
        self.series.push(series);
        Ok(self.series.len() - 1)
    }

    /// Descriptor table for a series; empty for unregistered types.
    pub fn descriptors(&self, series: &Series) -> &[FieldDescriptor] {
        self.registry.get(&series.kind).unwrap_or(&[])
    }

    pub fn locate(&self, id: PointId) -> Option<PointLocation> {
        self.series.iter().enumerate().find_map(|(si, s)| {
            s.points.iter().position(|p| p.id == id).map(|pi| (si, pi))
        })
    }

    pub fn point(&self, id: PointId) -> Option<&Point> {
        let (si, pi) = self.locate(id)?;
        Some(&self.series[si].points[pi])
    }

    pub fn point_mut(&mut self, id: PointId) -> Option<&mut Point> {
        let (si, pi) = self.locate(id)?;
        Some(&mut self.series[si].points[pi])
    }

    pub fn series_of(&self, id: PointId) -> Option<&Series> {
        self.locate(id).map(|(si, _)| &self.series[si])
    }

    /// The axis a series uses for `kind`, if it resolves.
    pub fn axis(&self, series: &Series, kind: AxisKind) -> Option<&dyn Axis> {
        series.axis_index(kind).and_then(|i| self.axes.get(i)).map(|a| &**a)
    }

    /// Both axis references of the series resolve.
    pub fn has_axes(&self, series: &Series) -> bool {
        self.axis(series, AxisKind::X).is_some() && self.axis(series, AxisKind::Y).is_some()
    }

    pub fn has_cartesian_series(&self) -> bool {
        self.series.iter().any(|s| self.has_axes(s))
    }

    /// Point options layered over series options, defaults applied.
    pub fn resolved_options(&self, id: PointId) -> Option<ResolvedDragOptions> {
        let (si, pi) = self.locate(id)?;
        let series = &self.series[si];
        let base = series.drag_drop.clone().unwrap_or_default();
        let merged = match &series.points[pi].drag_drop {
            Some(over) => base.merge(over),
            None => base,
        };
        Some(merged.resolve())
    }

    /// Context handed to descriptor hooks for `point`.
    pub fn field_context<'a>(
        &'a self,
        series: &Series,
        point: &'a Point,
        descriptor: &FieldDescriptor,
    ) -> FieldContext<'a> {
        let threshold_px = self
            .axis(series, AxisKind::Y)
            .map(|axis| axis.to_pixels(series.threshold, false))
            .filter(|px| px.is_finite());
        FieldContext {
            point,
            field: descriptor.field(),
            partner: descriptor.partner_field(),
            threshold: series.threshold,
            threshold_px,
        }
    }
}
