//! Drag-drop configuration.
//!
//! Options come in the host's camelCase vocabulary and are layered:
//! point-level options override series-level ones field by field. All
//! fields are optional so that merging can tell "unset" from "false".

use crate::axis::AxisKind;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::Duration;

/// Pixels the pointer must travel before a press turns into a drag.
pub const DEFAULT_SENSITIVITY: f64 = 2.0;

/// Animation used for the redraw after a drop, unless configured.
pub const DEFAULT_ANIMATION: Duration = Duration::from_millis(500);

/// Name of the guide-box state used while dragging.
pub const DEFAULT_GUIDE_STATE: &str = "default";

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let pair = |i: usize| -> Option<f32> {
            Some((hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?) as f32 / 255.0)
        };
        match bytes.len() {
            3 => {
                let short = |i: usize| -> Option<f32> { Some((hex_val(bytes[i])? * 17) as f32 / 255.0) };
                Some(Self::rgba(short(0)?, short(1)?, short(2)?, 1.0))
            }
            6 => Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, 1.0)),
            8 => Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
            _ => None,
        }
    }

    /// Shortest hex form; alpha is emitted only when not opaque.
    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (byte(self.r), byte(self.g), byte(self.b), byte(self.a));
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color `{s}`")))
    }
}

// ─── Styles ──────────────────────────────────────────────────────────────

/// Presentation of the guide box in one named state. Geometry is unaffected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuideBoxStyle {
    pub class_name: String,
    pub color: Color,
    pub line_color: Color,
    pub line_width: f32,
    pub cursor: String,
    pub z_index: i32,
}

impl Default for GuideBoxStyle {
    fn default() -> Self {
        Self {
            class_name: "drag-box-default".into(),
            color: Color::rgba(0.0, 0.0, 0.0, 0.1),
            line_color: Color::rgba(0.533, 0.533, 0.533, 1.0),
            line_width: 1.0,
            cursor: "move".into(),
            z_index: 900,
        }
    }
}

/// Presentation of resize handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HandleStyle {
    pub class_name: String,
    pub color: Color,
    pub line_color: Color,
    pub line_width: f32,
    pub z_index: i32,
}

impl Default for HandleStyle {
    fn default() -> Self {
        Self {
            class_name: "drag-handle".into(),
            color: Color::rgba(1.0, 1.0, 1.0, 1.0),
            line_color: Color::rgba(0.0, 0.0, 0.0, 0.6),
            line_width: 1.0,
            z_index: 901,
        }
    }
}

// ─── Drag-drop options ───────────────────────────────────────────────────

/// Raw, mergeable drag-drop options (series or point level).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DragDropOptions {
    pub draggable_x: Option<bool>,
    pub draggable_y: Option<bool>,
    pub drag_min_x: Option<f64>,
    pub drag_max_x: Option<f64>,
    pub drag_min_y: Option<f64>,
    pub drag_max_y: Option<f64>,
    pub drag_precision_x: Option<f64>,
    pub drag_precision_y: Option<f64>,
    pub drag_sensitivity: Option<f64>,
    pub group_by: Option<String>,
    pub live_redraw: Option<bool>,
    pub guide_box: BTreeMap<String, GuideBoxStyle>,
    pub drag_handle: Option<HandleStyle>,
    /// Per-field toggles keyed by descriptor option name (`draggableLow`, ...).
    #[serde(flatten)]
    pub field_toggles: BTreeMap<String, bool>,
}

impl DragDropOptions {
    /// Parse an options block from JSON.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid dragDrop options: {e}"))
    }

    /// Parse an options block, falling back to "dragging disabled" on error.
    pub fn from_json_or_disabled(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|err| {
            log::warn!("{err}; dragging disabled for this scope");
            Self::default()
        })
    }

    /// Enable dragging along the given axes.
    pub fn draggable(x: bool, y: bool) -> Self {
        Self { draggable_x: Some(x), draggable_y: Some(y), ..Self::default() }
    }

    pub fn with_toggle(mut self, option_name: &str, enabled: bool) -> Self {
        self.set_toggle(option_name, enabled);
        self
    }

    pub fn set_toggle(&mut self, option_name: &str, enabled: bool) {
        match option_name {
            "draggableX" => self.draggable_x = Some(enabled),
            "draggableY" => self.draggable_y = Some(enabled),
            other => {
                self.field_toggles.insert(other.to_string(), enabled);
            }
        }
    }

    /// Value of a toggle by its option key, `None` when unset.
    pub fn toggle(&self, option_name: &str) -> Option<bool> {
        match option_name {
            "draggableX" => self.draggable_x,
            "draggableY" => self.draggable_y,
            other => self.field_toggles.get(other).copied(),
        }
    }

    pub fn axis_toggle(&self, axis: AxisKind) -> Option<bool> {
        match axis {
            AxisKind::X => self.draggable_x,
            AxisKind::Y => self.draggable_y,
        }
    }

    /// Layer `over` on top of `self`; set fields in `over` win.
    pub fn merge(&self, over: &DragDropOptions) -> DragDropOptions {
        let mut guide_box = self.guide_box.clone();
        guide_box.extend(over.guide_box.iter().map(|(k, v)| (k.clone(), v.clone())));
        let mut field_toggles = self.field_toggles.clone();
        field_toggles.extend(over.field_toggles.iter().map(|(k, v)| (k.clone(), *v)));
        DragDropOptions {
            draggable_x: over.draggable_x.or(self.draggable_x),
            draggable_y: over.draggable_y.or(self.draggable_y),
            drag_min_x: over.drag_min_x.or(self.drag_min_x),
            drag_max_x: over.drag_max_x.or(self.drag_max_x),
            drag_min_y: over.drag_min_y.or(self.drag_min_y),
            drag_max_y: over.drag_max_y.or(self.drag_max_y),
            drag_precision_x: over.drag_precision_x.or(self.drag_precision_x),
            drag_precision_y: over.drag_precision_y.or(self.drag_precision_y),
            drag_sensitivity: over.drag_sensitivity.or(self.drag_sensitivity),
            group_by: over.group_by.clone().or_else(|| self.group_by.clone()),
            live_redraw: over.live_redraw.or(self.live_redraw),
            guide_box,
            drag_handle: over.drag_handle.clone().or_else(|| self.drag_handle.clone()),
            field_toggles,
        }
    }

    /// Apply defaults.
    pub fn resolve(&self) -> ResolvedDragOptions {
        let limits = |min: Option<f64>, max: Option<f64>, precision: Option<f64>| AxisLimits {
            min: min.filter(|v| !v.is_nan()).unwrap_or(f64::NEG_INFINITY),
            max: max.filter(|v| !v.is_nan()).unwrap_or(f64::INFINITY),
            precision: precision.filter(|p| p.is_finite() && *p >= 0.0),
        };
        ResolvedDragOptions {
            draggable_x: self.draggable_x.unwrap_or(false),
            draggable_y: self.draggable_y.unwrap_or(false),
            x: limits(self.drag_min_x, self.drag_max_x, self.drag_precision_x),
            y: limits(self.drag_min_y, self.drag_max_y, self.drag_precision_y),
            sensitivity: self
                .drag_sensitivity
                .filter(|s| s.is_finite() && *s >= 0.0)
                .unwrap_or(DEFAULT_SENSITIVITY),
            group_by: self.group_by.clone().filter(|k| !k.is_empty()),
            live_redraw: self.live_redraw.unwrap_or(true),
            guide_box: self.guide_box.clone(),
            drag_handle: self.drag_handle.clone().unwrap_or_default(),
            raw: self.clone(),
        }
    }
}

/// Value limits for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLimits {
    pub min: f64,
    pub max: f64,
    /// `None` means "not configured"; `Some(0.0)` disables rounding.
    pub precision: Option<f64>,
}

impl Default for AxisLimits {
    fn default() -> Self {
        Self { min: f64::NEG_INFINITY, max: f64::INFINITY, precision: None }
    }
}

/// Options with defaults applied, as consumed by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDragOptions {
    pub draggable_x: bool,
    pub draggable_y: bool,
    pub x: AxisLimits,
    pub y: AxisLimits,
    pub sensitivity: f64,
    pub group_by: Option<String>,
    pub live_redraw: bool,
    pub guide_box: BTreeMap<String, GuideBoxStyle>,
    pub drag_handle: HandleStyle,
    raw: DragDropOptions,
}

impl Default for ResolvedDragOptions {
    fn default() -> Self {
        DragDropOptions::default().resolve()
    }
}

impl ResolvedDragOptions {
    pub fn axis_enabled(&self, axis: AxisKind) -> bool {
        match axis {
            AxisKind::X => self.draggable_x,
            AxisKind::Y => self.draggable_y,
        }
    }

    pub fn limits(&self, axis: AxisKind) -> AxisLimits {
        match axis {
            AxisKind::X => self.x,
            AxisKind::Y => self.y,
        }
    }

    /// Per-field toggle, `None` when unset.
    pub fn toggle(&self, option_name: &str) -> Option<bool> {
        self.raw.toggle(option_name)
    }

    /// Style for a named guide-box state; unknown states use the default look.
    pub fn guide_box_style(&self, state: &str) -> GuideBoxStyle {
        self.guide_box.get(state).cloned().unwrap_or_default()
    }
}

// ─── Chart options ───────────────────────────────────────────────────────

/// A keyboard modifier that can be bound to chart zooming or panning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    Shift,
    Ctrl,
    Alt,
    Meta,
}

/// Chart-wide options the drag engine reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartOptions {
    /// Drop animation duration in milliseconds.
    pub animation: u64,
    pub zoom_key: Option<ModifierKey>,
    pub pan_key: Option<ModifierKey>,
    /// Swap x/y screen orientation.
    pub inverted: bool,
    pub polar: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            animation: DEFAULT_ANIMATION.as_millis() as u64,
            zoom_key: None,
            pan_key: None,
            inverted: false,
            polar: false,
        }
    }
}

impl ChartOptions {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid chart options: {e}"))
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation)
    }
}
