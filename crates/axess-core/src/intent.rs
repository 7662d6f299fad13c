#![forbid(unsafe_code)]

//! Keyboard dispatcher: raw key events to semantic navigation intents.
//!
//! [`dispatch`] is a pure function of `(key, modifiers)`; it carries no
//! state and never inspects the widget the event is destined for. The
//! bindings are the WCAG menu/composite-widget set and are fixed:
//!
//! | Key            | Intent        |
//! |----------------|---------------|
//! | Enter, Space   | `Activate`    |
//! | ArrowDown      | `Next`        |
//! | ArrowUp        | `Prev`        |
//! | Home           | `First`       |
//! | End            | `Last`        |
//! | Escape         | `Dismiss`     |
//! | Tab            | `TabForward`  |
//! | Shift+Tab      | `TabBackward` |
//!
//! Release events and modified keys (other than Shift+Tab) dispatch to
//! nothing, so chords like Ctrl+Home stay available to the embedder.

use crate::event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};

/// A semantic navigation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavIntent {
    /// Move to the next item.
    Next,
    /// Move to the previous item.
    Prev,
    /// Jump to the first item.
    First,
    /// Jump to the last item.
    Last,
    /// Activate the current item.
    Activate,
    /// Dismiss the current surface and restore focus.
    Dismiss,
    /// Sequential traversal forward (Tab).
    TabForward,
    /// Sequential traversal backward (Shift+Tab).
    TabBackward,
}

/// Map a raw key event to a navigation intent, if it has one.
#[must_use]
pub fn dispatch(key: &KeyEvent) -> Option<NavIntent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Tab, m) if m == Modifiers::SHIFT => Some(NavIntent::TabBackward),
        (_, m) if !m.is_empty() => None,
        (KeyCode::Enter | KeyCode::Char(' '), _) => Some(NavIntent::Activate),
        (KeyCode::Down, _) => Some(NavIntent::Next),
        (KeyCode::Up, _) => Some(NavIntent::Prev),
        (KeyCode::Home, _) => Some(NavIntent::First),
        (KeyCode::End, _) => Some(NavIntent::Last),
        (KeyCode::Escape, _) => Some(NavIntent::Dismiss),
        (KeyCode::Tab, _) => Some(NavIntent::TabForward),
        _ => None,
    }
}
