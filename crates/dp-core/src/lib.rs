//! Chart model, drag options and the pure drag/resize geometry.

pub mod axis;
pub mod geometry;
pub mod guide;
pub mod id;
pub mod model;
pub mod options;
pub mod predicates;
pub mod registry;
pub mod translate;

pub use axis::{Axis, AxisKind, AxisPlacement, LinearAxis, LogAxis};
pub use geometry::{MIN_EXTENT, ResizeSide, resize_rect, union_bounds};
pub use guide::{GuideBox, resized_box, translated_box};
pub use id::{FieldName, PointId};
pub use model::*;
pub use options::*;
pub use predicates::{FieldSet, is_chart_draggable, is_point_movable, movable_fields, resizable_fields};
pub use registry::{FieldContext, FieldDescriptor, Registry, SideRule};
pub use translate::{PendingUpdates, PointUpdate, PositionSnapshot, compute_updates};

// Re-export kurbo types so downstream crates don't need a direct dependency
pub use kurbo::{Point as Pos, Rect, Vec2};
