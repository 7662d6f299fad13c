#![forbid(unsafe_code)]

//! Raw input events delivered by the host platform.
//!
//! These are deliberately minimal: the widgets never inspect raw events
//! directly except through the dispatcher in [`crate::intent`], so only
//! the keys the interaction patterns bind are represented as named
//! variants; everything else arrives as [`KeyCode::Char`] or
//! [`KeyCode::Other`].

use crate::bridge::NodeId;
use bitflags::bitflags;

/// A key identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character (space is `Char(' ')`).
    Char(char),
    Enter,
    Tab,
    Escape,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// Any key the interaction core has no binding for.
    Other,
}

bitflags! {
    /// Keyboard modifier state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
    }
}

/// Press or release. The dispatcher only acts on presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEventKind {
    Press,
    Release,
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A plain key press with no modifiers.
    #[must_use]
    pub const fn press(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    /// A key press with the given modifiers.
    #[must_use]
    pub const fn press_with(code: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            code,
            modifiers,
            kind: KeyEventKind::Press,
        }
    }

    /// A key release.
    #[must_use]
    pub const fn release(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Release,
        }
    }
}

/// Pointer press/release phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Down,
    Up,
}

/// A pointer event, already hit-tested by the platform.
///
/// `target` is the node under the pointer, or `None` when the interaction
/// landed on empty page space. Outside-interaction detection for overlays
/// only needs the target identity, never coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerEvent {
    pub target: Option<NodeId>,
    pub kind: PointerEventKind,
}

impl PointerEvent {
    /// A pointer-down on the given node.
    #[must_use]
    pub const fn down(target: NodeId) -> Self {
        Self {
            target: Some(target),
            kind: PointerEventKind::Down,
        }
    }

    /// A pointer-down outside any tracked node.
    #[must_use]
    pub const fn down_outside() -> Self {
        Self {
            target: None,
            kind: PointerEventKind::Down,
        }
    }
}

/// Any input event the interaction core consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Key(KeyEvent),
    Pointer(PointerEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_has_no_modifiers() {
        let ev = KeyEvent::press(KeyCode::Enter);
        assert_eq!(ev.modifiers, Modifiers::empty());
        assert_eq!(ev.kind, KeyEventKind::Press);
    }

    #[test]
    fn press_with_carries_modifiers() {
        let ev = KeyEvent::press_with(KeyCode::Tab, Modifiers::SHIFT);
        assert!(ev.modifiers.contains(Modifiers::SHIFT));
        assert!(!ev.modifiers.contains(Modifiers::CTRL));
    }

    #[test]
    fn pointer_outside_has_no_target() {
        assert_eq!(PointerEvent::down_outside().target, None);
        assert_eq!(PointerEvent::down(7).target, Some(7));
    }

    #[test]
    fn modifiers_combine() {
        let m = Modifiers::SHIFT | Modifiers::ALT;
        assert!(m.contains(Modifiers::SHIFT));
        assert!(m.contains(Modifiers::ALT));
        assert!(!m.contains(Modifiers::CTRL));
    }
}
