#![forbid(unsafe_code)]

//! Platform-independent input model and focus/event bridge.
//!
//! This crate defines the types the interaction state machines in
//! `axess-widgets` are written against:
//!
//! - [`event`] — raw key and pointer events ([`KeyEvent`], [`PointerEvent`]).
//! - [`intent`] — the keyboard dispatcher mapping raw keys to semantic
//!   navigation intents ([`NavIntent`]).
//! - [`bridge`] — the [`FocusBridge`] trait: everything the widgets need
//!   from the host platform (focusable-descendant queries in document
//!   order, focus reads/writes, accessibility attribute writes).
//! - [`tree`] — [`MemoryTree`], an in-memory reference implementation of
//!   the bridge used by the test suites and by embedders that keep their
//!   own element tree.
//!
//! Nothing here touches a real rendering engine; the bridge is the only
//! seam to the platform.

pub mod bridge;
pub mod event;
pub mod intent;
pub mod tree;

pub use bridge::{FocusBridge, NodeId};
pub use event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerEvent, PointerEventKind};
pub use intent::{NavIntent, dispatch};
pub use tree::MemoryTree;
