#![forbid(unsafe_code)]

//! Interaction state machines for keyboard-only and screen-reader use.
//!
//! Everything in this crate is a synchronous, single-threaded state
//! machine driven by the events and intents defined in `axess-core`:
//!
//! - [`focus_scope`] — a stack of focus traps: Tab containment, capture
//!   and restore of the previously focused element, nesting.
//! - [`roving`] — the roving-tabindex selection state machine shared by
//!   menus and table headers.
//! - [`announcer`] — the live-region announcement service with polite
//!   and assertive channels and per-message TTL cancellation.
//! - [`menu`] — the disclosure (dropdown menu) widget composing the
//!   three primitives above.
//! - [`table`] — the searchable, sortable, paginated table interaction
//!   state machine with CSV export.
//!
//! No module here renders anything; the host platform is reached only
//! through the `FocusBridge` trait.

pub mod announcer;
pub mod focus_scope;
pub mod menu;
pub mod roving;
pub mod table;


pub use announcer::{LiveAnnouncer, Politeness};
pub use focus_scope::{ScopeEvent, ScopeId, ScopeStack};
pub use menu::{Menu, MenuEvent};
pub use roving::{RovingSelection, WrapPolicy};
pub use table::{CellValue, Column, SortDirection, SortableTable};
