//! Pointer-driven drag sessions over a `dp-core` chart.

pub mod commit;
pub mod events;
pub mod host;
pub mod input;
pub mod session;

pub use commit::{AnimationGate, apply_updates, restore_origin};
pub use events::{DragEvent, DragListener, DragStartEvent, EventBus, Propagation};
pub use host::{Animation, ChartHost, DragHandle, Redraw, Renderer};
pub use input::{InputEvent, Modifiers, PointerTarget};
pub use session::{DragController, DragSession, Outcome, SessionState};
