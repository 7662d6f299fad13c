#![forbid(unsafe_code)]

//! Focus containment ("focus trap") with stacked nesting.
//!
//! A [`ScopeStack`] coordinates every active focus scope in the process.
//! Activating a scope captures whichever element held focus at that
//! moment; deactivating it restores focus to that element if it is still
//! attached. While a scope is active-on-top, Tab and Shift+Tab cycle
//! through the focusable descendants of its container in a closed loop.
//!
//! # Invariants
//!
//! 1. The previous focus holder is captured exactly once per activation
//!    and consumed exactly once per deactivation.
//! 2. Re-activating the container of the topmost scope is a no-op
//!    returning the existing scope id.
//! 3. Only the topmost scope handles keys; inner scopes restore focus to
//!    wherever it was when *they* activated, which may be inside an
//!    outer scope.
//! 4. An empty focusable set never panics: initial focus falls back to
//!    the container and Tab becomes a no-op.
//!
//! # Failure modes
//!
//! - Previous focus holder detached at deactivation → restoration is
//!   skipped silently, focus left unchanged.
//! - Deactivating an unknown or already-removed scope id → no-op.

use axess_core::bridge::{FocusBridge, NodeId};
use axess_core::event::KeyEvent;
use axess_core::intent::{NavIntent, dispatch};
use tracing::debug;

/// Identifier for an activation of a focus scope.
pub type ScopeId = u64;

/// Outcome of routing a key through the topmost scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeEvent {
    /// Escape was pressed while the scope was topmost. The owner decides
    /// whether to deactivate; the scope never closes itself.
    Escape,
    /// Tab traversal moved focus within the scope.
    FocusMoved { to: NodeId },
}

#[derive(Debug, Clone, Copy)]
struct Scope {
    id: ScopeId,
    container: NodeId,
    /// Focus holder captured at activation, consumed at deactivation.
    previous: Option<NodeId>,
}

/// Process-wide stack of focus traps.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
    next_id: ScopeId,
}

impl ScopeStack {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any scope is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.scopes.is_empty()
    }

    /// The topmost scope id, if any.
    #[must_use]
    pub fn top(&self) -> Option<ScopeId> {
        self.scopes.last().map(|s| s.id)
    }

    /// The container of the topmost scope, if any.
    #[must_use]
    pub fn active_container(&self) -> Option<NodeId> {
        self.scopes.last().map(|s| s.container)
    }

    /// Activate a scope over `container`.
    ///
    /// Captures the current focus holder, then moves focus to `initial`
    /// if it is one of the container's focusable descendants, else to
    /// the first focusable descendant, else to the container itself.
    /// If the topmost scope already covers `container` this is a no-op
    /// returning its id.
    pub fn activate<B: FocusBridge>(
        &mut self,
        bridge: &mut B,
        container: NodeId,
        initial: Option<NodeId>,
    ) -> ScopeId {
        if let Some(top) = self.scopes.last()
            && top.container == container
        {
            return top.id;
        }

        let previous = bridge.focused();
        self.next_id += 1;
        let id = self.next_id;
        self.scopes.push(Scope {
            id,
            container,
            previous,
        });

        let set = bridge.focusable_descendants(container);
        let target = match initial {
            Some(node) if set.contains(&node) => node,
            _ => set.first().copied().unwrap_or(container),
        };
        bridge.set_focus(target);
        debug!(scope = id, container, ?previous, "focus scope activated");
        id
    }

    /// Deactivate the scope with the given id.
    ///
    /// Restores focus to the holder captured at activation, provided it
    /// is still attached. Idempotent: unknown ids return `false`.
    pub fn deactivate<B: FocusBridge>(&mut self, bridge: &mut B, id: ScopeId) -> bool {
        let Some(pos) = self.scopes.iter().position(|s| s.id == id) else {
            return false;
        };
        let scope = self.scopes.remove(pos);
        if let Some(prev) = scope.previous
            && bridge.is_attached(prev)
        {
            bridge.set_focus(prev);
        }
        debug!(scope = id, container = scope.container, "focus scope deactivated");
        true
    }

    /// Route a key press through the topmost scope.
    ///
    /// Handles Tab/Shift+Tab containment and reports Escape. Returns
    /// `None` when no scope is active or the key has no meaning here.
    pub fn handle_key<B: FocusBridge>(
        &mut self,
        bridge: &mut B,
        key: &KeyEvent,
    ) -> Option<ScopeEvent> {
        let container = self.active_container()?;
        match dispatch(key)? {
            NavIntent::Dismiss => Some(ScopeEvent::Escape),
            NavIntent::TabForward => self.cycle(bridge, container, true),
            NavIntent::TabBackward => self.cycle(bridge, container, false),
            _ => None,
        }
    }

    /// Closed-loop Tab traversal within `container`.
    fn cycle<B: FocusBridge>(
        &mut self,
        bridge: &mut B,
        container: NodeId,
        forward: bool,
    ) -> Option<ScopeEvent> {
        let set = bridge.focusable_descendants(container);
        if set.is_empty() {
            return None;
        }
        let pos = bridge.focused().and_then(|f| set.iter().position(|n| *n == f));
        let next = match pos {
            None => set[0],
            Some(idx) if forward => set[(idx + 1) % set.len()],
            Some(idx) => set[(idx + set.len() - 1) % set.len()],
        };
        bridge.set_focus(next);
        Some(ScopeEvent::FocusMoved { to: next })
    }
}
