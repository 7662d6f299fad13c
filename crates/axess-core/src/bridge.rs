#![forbid(unsafe_code)]

//! The focus/event bridge: everything the interaction core needs from
//! the host platform.
//!
//! The widgets never walk a real element tree. They see the platform
//! through [`FocusBridge`]: an ordered focusable-descendant query, focus
//! reads and writes, attachment/containment checks, and accessibility
//! attribute writes. Any embedder (a renderer, a DOM adapter, or the
//! in-memory [`crate::tree::MemoryTree`] used in tests) implements this
//! trait once and every widget works against it.
//!
//! # Invariants
//!
//! 1. `focusable_descendants` returns nodes in document order and never
//!    includes the container itself.
//! 2. `set_focus` on a detached node is a no-op returning `false`; the
//!    bridge never panics on unknown ids.
//! 3. Attribute writes on unknown ids are silently dropped — every
//!    failure in this domain is degraded UX, not a crash.

/// Unique identifier for an element in the host tree.
pub type NodeId = u64;

/// Platform capabilities consumed by the interaction core.
pub trait FocusBridge {
    /// Focusable elements inside `container`, in document order.
    ///
    /// An element qualifies when it can receive input focus and is
    /// currently visible, or when it already holds focus. The result may
    /// be empty.
    fn focusable_descendants(&self, container: NodeId) -> Vec<NodeId>;

    /// The element currently holding input focus, if any.
    fn focused(&self) -> Option<NodeId>;

    /// Move input focus to `id`. Returns `false` if the node is unknown
    /// or detached (focus is left unchanged).
    fn set_focus(&mut self, id: NodeId) -> bool;

    /// Whether `id` is still attached to the document.
    fn is_attached(&self, id: NodeId) -> bool;

    /// Whether `id` is `container` itself or one of its descendants.
    fn contains(&self, container: NodeId, id: NodeId) -> bool;

    /// Write the disclosure state of a trigger (`aria-expanded`).
    fn set_expanded(&mut self, id: NodeId, expanded: bool);

    /// Write the selection state of a composite item (`aria-selected`).
    fn set_selected(&mut self, id: NodeId, selected: bool);

    /// Include or exclude a node from the sequential tab order
    /// (roving tabindex).
    fn set_tab_stop(&mut self, id: NodeId, stop: bool);
}
