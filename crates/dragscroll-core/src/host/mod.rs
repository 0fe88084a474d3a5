//! Element/event host abstraction.
//!
//! Everything platform-specific (element lookup, listener plumbing, scroll offsets and
//! raw event decoding) sits behind [`Host`]. The drag logic never touches a DOM directly.

mod memory;

pub use memory::{ElementId, FireResult, MemoryEvent, MemoryHost, MemoryInput};

use crate::binder::BindingId;
use crate::config::HandleSelector;
use crate::input::{EventKind, PointerInfo};
use kurbo::Point;
use std::fmt;

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// `scrollLeft`
    Horizontal,
    /// `scrollTop`
    Vertical,
}

/// Where a listener is attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListenTarget<E> {
    /// A single element; receives events originating on it or bubbling from its descendants.
    Element(E),
    /// The global scope (the document); receives every event of its kind.
    Global,
}

/// Identity of a registered hook.
///
/// The host stores this alongside its platform callback and hands it back to
/// [`DragScroll::dispatch`](crate::DragScroll::dispatch) when the event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId {
    pub binding: BindingId,
    pub kind: EventKind,
}

impl ListenerId {
    pub fn new(binding: BindingId, kind: EventKind) -> Self {
        Self { binding, kind }
    }
}

/// The element tree and event system drag bindings run against.
///
/// Implementations are single-threaded: hooks run to completion on the host's
/// dispatch thread.
pub trait Host {
    /// Handle to an element.
    type Element: Clone + PartialEq + fmt::Debug;
    /// Raw platform event.
    type Event;

    /// Descendants of `root` matching `selector`, in document order.
    fn find_descendants(&self, root: &Self::Element, selector: &HandleSelector) -> Vec<Self::Element>;

    /// Attach `listener` to `target` for events of `listener.kind`.
    fn add_listener(&mut self, target: &ListenTarget<Self::Element>, listener: ListenerId);

    /// Detach a listener previously attached with [`Host::add_listener`].
    fn remove_listener(&mut self, target: &ListenTarget<Self::Element>, listener: ListenerId);

    /// Current scroll offset of `element` along `axis`.
    fn scroll_offset(&self, element: &Self::Element, axis: Axis) -> f64;

    /// Write a scroll offset. The host may clamp it to the element's scrollable range.
    fn set_scroll_offset(&mut self, element: &Self::Element, axis: Axis, value: f64);

    /// Decode a mouse event. `None` if `event` carries no pointer data.
    fn pointer_info(&self, event: &Self::Event) -> Option<PointerInfo<Self::Element>>;

    /// Client coordinates of a mouse event, without resolving its target.
    fn pointer_position(&self, event: &Self::Event) -> Option<Point> {
        self.pointer_info(event).map(|info| info.position)
    }

    /// Page coordinates of the first touch point. `None` if no touch is present.
    fn touch_info(&self, event: &Self::Event) -> Option<Point>;

    /// Prevent the default action of `event` and stop its propagation.
    fn suppress(&mut self, event: &Self::Event);
}
