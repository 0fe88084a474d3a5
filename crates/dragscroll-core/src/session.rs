//! Drag session state machine.

use crate::host::{Axis, Host};
use kurbo::{Point, Vec2};

/// Drag state for one scrollable target.
///
/// A session is active exactly while it holds a last coordinate, so the
/// "coordinate defined iff active" invariant is carried by the type.
#[derive(Debug, Clone)]
pub struct DragSession<E> {
    /// The scrollable element this session pans.
    target: E,
    /// Last pointer position seen during the active drag.
    last_coordinate: Option<Point>,
}

impl<E> DragSession<E> {
    /// Create an inactive session for a target.
    pub fn new(target: E) -> Self {
        Self {
            target,
            last_coordinate: None,
        }
    }

    pub fn target(&self) -> &E {
        &self.target
    }

    /// Whether a drag is in progress.
    pub fn is_active(&self) -> bool {
        self.last_coordinate.is_some()
    }

    pub fn last_coordinate(&self) -> Option<Point> {
        self.last_coordinate
    }

    /// Begin a drag at `position`.
    ///
    /// Calling this on an active session re-anchors the drag at `position`.
    pub fn start(&mut self, position: Point) {
        self.last_coordinate = Some(position);
    }

    /// Follow the pointer to `position`, scrolling the target by the inverse of the
    /// pointer delta.
    ///
    /// Returns the pointer delta that was applied, or `None` if no drag is active.
    /// Offsets are written relative to the host's current value; whatever clamping the
    /// host applies is never fed back into the next delta.
    pub fn move_to<H>(&mut self, host: &mut H, position: Point, allow_vertical: bool) -> Option<Vec2>
    where
        H: Host<Element = E>,
    {
        let last = self.last_coordinate?;
        let dx = position.x - last.x;
        let dy = if allow_vertical { position.y - last.y } else { 0.0 };

        let left = host.scroll_offset(&self.target, Axis::Horizontal);
        host.set_scroll_offset(&self.target, Axis::Horizontal, left - dx);
        if allow_vertical {
            let top = host.scroll_offset(&self.target, Axis::Vertical);
            host.set_scroll_offset(&self.target, Axis::Vertical, top - dy);
        }

        self.last_coordinate = Some(position);
        Some(Vec2::new(dx, dy))
    }

    /// Finish the drag. Returns whether a drag was active; ending twice is a no-op.
    pub fn end(&mut self) -> bool {
        self.last_coordinate.take().is_some()
    }
}
