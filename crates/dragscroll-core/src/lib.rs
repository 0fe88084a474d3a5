//! DragScroll Core Library
//!
//! Platform-agnostic drag-to-scroll behaviour: a scrollable element becomes pannable by
//! pressing on one of its handle descendants and moving the pointer (mouse or touch).
//!
//! The DOM (or any other element tree) is reached only through the [`Host`] trait; the
//! in-memory [`MemoryHost`] implements it for tests and headless replays.

mod adapter;
pub mod binder;
pub mod config;
pub mod host;
pub mod input;
pub mod session;

pub use binder::{Binding, BindingId, BindError, DragScroll};
pub use config::{ConfigError, DragScrollConfig, HandleSelector};
pub use host::{Axis, ElementId, FireResult, Host, ListenTarget, ListenerId, MemoryEvent, MemoryHost, MemoryInput};
pub use input::{EventKind, EventOutcome, Modality, MouseButton, PointerInfo};
pub use session::DragSession;
