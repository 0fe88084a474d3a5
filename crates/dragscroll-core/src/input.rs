//! Input primitives shared by the pointer and touch adapters.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// Any other button, keyed by its raw DOM index.
    Other(i16),
}

impl Default for MouseButton {
    fn default() -> Self {
        Self::Left
    }
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` value (0 = primary, 1 = middle, 2 = secondary).
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => Self::Left,
            1 => Self::Middle,
            2 => Self::Right,
            other => Self::Other(other),
        }
    }

    /// The DOM `MouseEvent.button` value for this button.
    pub fn to_dom(self) -> i16 {
        match self {
            Self::Left => 0,
            Self::Middle => 1,
            Self::Right => 2,
            Self::Other(other) => other,
        }
    }
}

/// The two input modalities a drag can be driven by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    Pointer,
    Touch,
}

impl Modality {
    /// Event that starts a drag for this modality.
    pub fn press_kind(self) -> EventKind {
        match self {
            Self::Pointer => EventKind::MouseDown,
            Self::Touch => EventKind::TouchStart,
        }
    }

    /// Event that continues a drag for this modality.
    pub fn move_kind(self) -> EventKind {
        match self {
            Self::Pointer => EventKind::MouseMove,
            Self::Touch => EventKind::TouchMove,
        }
    }

    /// Event that finishes a drag for this modality.
    pub fn release_kind(self) -> EventKind {
        match self {
            Self::Pointer => EventKind::MouseUp,
            Self::Touch => EventKind::TouchEnd,
        }
    }
}

/// Platform event kinds the adapters listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    MouseDown,
    MouseMove,
    MouseUp,
    TouchStart,
    TouchMove,
    TouchEnd,
}

impl EventKind {
    /// DOM event name.
    pub fn name(self) -> &'static str {
        match self {
            Self::MouseDown => "mousedown",
            Self::MouseMove => "mousemove",
            Self::MouseUp => "mouseup",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
        }
    }

    pub fn modality(self) -> Modality {
        match self {
            Self::MouseDown | Self::MouseMove | Self::MouseUp => Modality::Pointer,
            Self::TouchStart | Self::TouchMove | Self::TouchEnd => Modality::Touch,
        }
    }
}

/// Whether a hook acted on an event.
///
/// `Ignored` leaves the event to the host's default behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Handled,
    Ignored,
}

impl EventOutcome {
    pub fn is_handled(self) -> bool {
        self == Self::Handled
    }
}

/// Pointer data extracted from a raw mouse event by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerInfo<E> {
    /// Client coordinates of the pointer.
    pub position: Point,
    /// Button that changed state.
    pub button: MouseButton,
    /// Element the event originated on, before any bubbling.
    pub original_target: E,
}
