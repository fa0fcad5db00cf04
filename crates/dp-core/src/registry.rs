//! Capability registry: which point fields are draggable, per series type.
//!
//! Each series type maps to an immutable table of [`FieldDescriptor`]s,
//! built once and shared by every chart. The drag engine has no knowledge
//! of series types beyond what these tables declare.
//!
//! | Tags                                 | Fields                              |
//! |--------------------------------------|-------------------------------------|
//! | `line` `spline` `scatter` `area`     | `x`, `y` (move only)                |
//! | `column` `bar`                       | `x`, `y` (y resizes from threshold) |
//! | `arearange` `columnrange` `errorbar` | `x`, `low`, `high`                  |
//! | `xrange`                             | `x`, `x2`, `y`                      |
//! | `gantt`                              | `start`, `end`, `y`                 |
//! | `ohlc` `candlestick`                 | `x`, `open`, `high`, `low`, `close` |
//! | `boxplot`                            | `x`, `low`, `q1`, `median`, `q3`, `high` |

use crate::axis::AxisKind;
use crate::geometry::ResizeSide;
use crate::id::FieldName;
use crate::model::{FieldValues, Point};
use kurbo::Rect;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

/// Everything a descriptor hook may look at.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    /// The point as currently stored (not the proposed values).
    pub point: &'a Point,
    pub field: FieldName,
    /// The field this one is validated against, if any.
    pub partner: Option<FieldName>,
    pub threshold: f64,
    /// Pixel position of the threshold on the series' y axis.
    pub threshold_px: Option<f64>,
}

impl FieldContext<'_> {
    /// Stored value of the partner field.
    pub fn partner_value(&self) -> Option<f64> {
        self.partner.and_then(|p| self.point.get(p))
    }

    /// Proposed value of this field, falling back to the stored one.
    pub fn proposed_or_current(&self, proposed: &FieldValues) -> Option<f64> {
        proposed.get(self.field).or_else(|| self.point.get(self.field))
    }

    fn stored(&self, field: &str) -> Option<f64> {
        self.point.get(field)
    }
}

/// Rejects a proposed value during a single-field resize.
pub type ValidateFn = fn(f64, &FieldContext<'_>) -> bool;
/// Picks the guide-box edge from the proposed values.
pub type ResizeSideFn = fn(&FieldValues, &FieldContext<'_>) -> ResizeSide;
/// Adjusts the guide box before the generic edge move of `side`.
pub type BeforeResizeFn = fn(&mut Rect, ResizeSide, &FieldValues, &FieldContext<'_>);

/// How a resizable field chooses the edge it moves.
#[derive(Debug, Clone, Copy)]
pub enum SideRule {
    Static(ResizeSide),
    Computed(ResizeSideFn),
}

impl SideRule {
    pub fn resolve(&self, proposed: &FieldValues, ctx: &FieldContext<'_>) -> ResizeSide {
        match self {
            Self::Static(side) => *side,
            Self::Computed(f) => f(proposed, ctx),
        }
    }
}

/// Drag capability of one point field.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub axis: AxisKind,
    /// Moves with the whole point.
    pub movable: bool,
    /// Has a resize handle of its own.
    pub resizable: bool,
    pub resize_side: Option<SideRule>,
    /// Toggle key that enables/disables this field alone.
    pub option_name: Option<&'static str>,
    pub partner: Option<&'static str>,
    pub validate: Option<ValidateFn>,
    pub before_resize: Option<BeforeResizeFn>,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, axis: AxisKind) -> Self {
        Self {
            name,
            axis,
            movable: false,
            resizable: false,
            resize_side: None,
            option_name: None,
            partner: None,
            validate: None,
            before_resize: None,
        }
    }

    pub const fn movable(mut self) -> Self {
        self.movable = true;
        self
    }

    pub const fn resizable(mut self, side: SideRule) -> Self {
        self.resizable = true;
        self.resize_side = Some(side);
        self
    }

    pub const fn option(mut self, option_name: &'static str) -> Self {
        self.option_name = Some(option_name);
        self
    }

    pub const fn validated(mut self, partner: Option<&'static str>, validate: ValidateFn) -> Self {
        self.partner = partner;
        self.validate = Some(validate);
        self
    }

    pub const fn before_resize(mut self, hook: BeforeResizeFn) -> Self {
        self.before_resize = Some(hook);
        self
    }

    /// Same capability under another field name (e.g. `x` → `start`).
    pub const fn renamed(
        mut self,
        name: &'static str,
        partner: Option<&'static str>,
        option_name: Option<&'static str>,
    ) -> Self {
        self.name = name;
        self.partner = partner;
        self.option_name = option_name;
        self
    }

    pub fn field(&self) -> FieldName {
        FieldName::intern(self.name)
    }

    pub fn partner_field(&self) -> Option<FieldName> {
        self.partner.map(FieldName::intern)
    }
}

// ─── Validators & hooks ──────────────────────────────────────────────────

fn below_partner(v: f64, ctx: &FieldContext<'_>) -> bool {
    ctx.partner_value().is_none_or(|p| v < p)
}

fn above_partner(v: f64, ctx: &FieldContext<'_>) -> bool {
    ctx.partner_value().is_none_or(|p| v > p)
}

fn not_after_partner(v: f64, ctx: &FieldContext<'_>) -> bool {
    ctx.partner_value().is_none_or(|p| v <= p)
}

fn not_before_partner(v: f64, ctx: &FieldContext<'_>) -> bool {
    ctx.partner_value().is_none_or(|p| v >= p)
}

/// `lo <= v <= hi` against stored neighbours; missing neighbours don't bind.
fn between(v: f64, ctx: &FieldContext<'_>, lo: &[&str], hi: &[&str]) -> bool {
    lo.iter().filter_map(|f| ctx.stored(f)).all(|b| v >= b)
        && hi.iter().filter_map(|f| ctx.stored(f)).all(|b| v <= b)
}

fn column_side(proposed: &FieldValues, ctx: &FieldContext<'_>) -> ResizeSide {
    match ctx.proposed_or_current(proposed) {
        Some(y) if y < ctx.threshold => ResizeSide::Bottom,
        _ => ResizeSide::Top,
    }
}

/// Keep a column's guide box attached to the threshold line.
///
/// The edge farther from the threshold is the value edge. It is placed on
/// the side that moves and the other edge is set to the threshold, so the
/// box stays correct when the value crosses the threshold mid-gesture.
/// The box may come out un-normalized; the edge move normalizes it.
fn pin_to_threshold(rect: &mut Rect, side: ResizeSide, _: &FieldValues, ctx: &FieldContext<'_>) {
    let Some(t_px) = ctx.threshold_px.map(f64::round) else {
        return;
    };
    let (lo, hi) = if side.is_horizontal() { (&mut rect.x0, &mut rect.x1) } else { (&mut rect.y0, &mut rect.y1) };
    let value_edge = if (*lo - t_px).abs() >= (*hi - t_px).abs() { *lo } else { *hi };
    match side {
        ResizeSide::Left | ResizeSide::Top => (*lo, *hi) = (value_edge, t_px),
        ResizeSide::Right | ResizeSide::Bottom => (*lo, *hi) = (t_px, value_edge),
    }
}

fn open_close_side(proposed: &FieldValues, ctx: &FieldContext<'_>) -> ResizeSide {
    match (ctx.proposed_or_current(proposed), ctx.partner_value()) {
        (Some(v), Some(other)) if v < other => ResizeSide::Bottom,
        _ => ResizeSide::Top,
    }
}

fn ohlc_high(v: f64, ctx: &FieldContext<'_>) -> bool {
    between(v, ctx, &["open", "close", "low"], &[])
}

fn ohlc_low(v: f64, ctx: &FieldContext<'_>) -> bool {
    between(v, ctx, &[], &["open", "close", "high"])
}

fn ohlc_body(v: f64, ctx: &FieldContext<'_>) -> bool {
    between(v, ctx, &["low"], &["high"])
}

fn box_low(v: f64, ctx: &FieldContext<'_>) -> bool {
    between(v, ctx, &[], &["q1"])
}

fn box_q1(v: f64, ctx: &FieldContext<'_>) -> bool {
    between(v, ctx, &["low"], &["median"])
}

fn box_median(v: f64, ctx: &FieldContext<'_>) -> bool {
    between(v, ctx, &["q1"], &["q3"])
}

fn box_q3(v: f64, ctx: &FieldContext<'_>) -> bool {
    between(v, ctx, &["median"], &["high"])
}

fn box_high(v: f64, ctx: &FieldContext<'_>) -> bool {
    between(v, ctx, &["q3"], &[])
}

// ─── Built-in tables ─────────────────────────────────────────────────────

use AxisKind::{X, Y};
use ResizeSide::{Bottom, Left, Right, Top};
use SideRule::{Computed, Static};

const MOVE_X: FieldDescriptor = FieldDescriptor::new("x", X).movable();
const MOVE_Y: FieldDescriptor = FieldDescriptor::new("y", Y).movable();

const INTERVAL_START: FieldDescriptor = FieldDescriptor::new("x", X)
    .movable()
    .resizable(Static(Left))
    .option("draggableX1")
    .validated(Some("x2"), not_after_partner);
const INTERVAL_END: FieldDescriptor = FieldDescriptor::new("x2", X)
    .movable()
    .resizable(Static(Right))
    .option("draggableX2")
    .validated(Some("x"), not_before_partner);

/// Move-only series.
pub const SIMPLE: &[FieldDescriptor] = &[MOVE_X, MOVE_Y];

/// Column-like series; `y` resizes away from the threshold.
pub const COLUMN: &[FieldDescriptor] = &[
    MOVE_X,
    FieldDescriptor::new("y", Y)
        .movable()
        .resizable(Computed(column_side))
        .before_resize(pin_to_threshold),
];

/// Dual-field range series (`low < high`).
pub const RANGE: &[FieldDescriptor] = &[
    MOVE_X,
    FieldDescriptor::new("low", Y)
        .movable()
        .resizable(Static(Bottom))
        .option("draggableLow")
        .validated(Some("high"), below_partner),
    FieldDescriptor::new("high", Y)
        .movable()
        .resizable(Static(Top))
        .option("draggableHigh")
        .validated(Some("low"), above_partner),
];

/// Interval series mapping `x`/`x2` to the start/end of a bar.
pub const INTERVAL: &[FieldDescriptor] = &[INTERVAL_START, INTERVAL_END, MOVE_Y];

/// Interval descriptors under the `start`/`end` names.
pub const ALIASED_INTERVAL: &[FieldDescriptor] = &[
    INTERVAL_START.renamed("start", Some("end"), Some("draggableStart")),
    INTERVAL_END.renamed("end", Some("start"), Some("draggableEnd")),
    MOVE_Y,
];

pub const OHLC: &[FieldDescriptor] = &[
    MOVE_X,
    FieldDescriptor::new("open", Y)
        .movable()
        .resizable(Computed(open_close_side))
        .option("draggableOpen")
        .validated(Some("close"), ohlc_body),
    FieldDescriptor::new("high", Y)
        .movable()
        .resizable(Static(Top))
        .option("draggableHigh")
        .validated(None, ohlc_high),
    FieldDescriptor::new("low", Y)
        .movable()
        .resizable(Static(Bottom))
        .option("draggableLow")
        .validated(None, ohlc_low),
    FieldDescriptor::new("close", Y)
        .movable()
        .resizable(Computed(open_close_side))
        .option("draggableClose")
        .validated(Some("open"), ohlc_body),
];

pub const BOXPLOT: &[FieldDescriptor] = &[
    MOVE_X,
    FieldDescriptor::new("low", Y)
        .movable()
        .resizable(Static(Bottom))
        .option("draggableLow")
        .validated(None, box_low),
    FieldDescriptor::new("q1", Y)
        .movable()
        .resizable(Static(Bottom))
        .option("draggableQ1")
        .validated(None, box_q1),
    FieldDescriptor::new("median", Y).movable().validated(None, box_median),
    FieldDescriptor::new("q3", Y)
        .movable()
        .resizable(Static(Top))
        .option("draggableQ3")
        .validated(None, box_q3),
    FieldDescriptor::new("high", Y)
        .movable()
        .resizable(Static(Top))
        .option("draggableHigh")
        .validated(None, box_high),
];

// ─── Registry ────────────────────────────────────────────────────────────

/// Series type tag → descriptor table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    tables: HashMap<String, Arc<[FieldDescriptor]>>,
}

static BUILTIN: LazyLock<Arc<Registry>> = LazyLock::new(|| Arc::new(Registry::with_builtins()));

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared registry holding the built-in series types.
    pub fn builtin() -> Arc<Registry> {
        Arc::clone(&BUILTIN)
    }

    /// A fresh registry pre-filled with the built-in tables, ready for
    /// custom series types to be added.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        let builtins: [(&[&str], &[FieldDescriptor]); 7] = [
            (&["line", "spline", "scatter", "area"], SIMPLE),
            (&["column", "bar"], COLUMN),
            (&["arearange", "columnrange", "errorbar"], RANGE),
            (&["xrange"], INTERVAL),
            (&["gantt"], ALIASED_INTERVAL),
            (&["ohlc", "candlestick"], OHLC),
            (&["boxplot"], BOXPLOT),
        ];
        for (tags, table) in builtins {
            let shared: Arc<[FieldDescriptor]> = Arc::from(table);
            for tag in tags {
                registry.tables.insert((*tag).to_string(), Arc::clone(&shared));
            }
        }
        registry
    }

    /// Register a table for a new series type. Tags are registered once.
    pub fn register(
        &mut self,
        tag: &str,
        table: impl Into<Arc<[FieldDescriptor]>>,
    ) -> Result<(), String> {
        if self.tables.contains_key(tag) {
            return Err(format!("series type `{tag}` is already registered"));
        }
        let table = table.into();
        if let Some(dup) = table
            .iter()
            .enumerate()
            .find(|(i, d)| table[..*i].iter().any(|o| o.name == d.name))
        {
            return Err(format!("series type `{tag}` declares field `{}` twice", dup.1.name));
        }
        log::debug!("registered series type `{tag}` with {} draggable fields", table.len());
        self.tables.insert(tag.to_string(), table);
        Ok(())
    }

    pub fn get(&self, tag: &str) -> Option<&[FieldDescriptor]> {
        self.tables.get(tag).map(|t| &t[..])
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tables.contains_key(tag)
    }
}
