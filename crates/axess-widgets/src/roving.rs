#![forbid(unsafe_code)]

//! Roving selection: the single active index behind any keyboard list.
//!
//! Backs menus and table-header navigation. The state is just
//! `(active, count)` where `active == None` means no item is active and
//! the trigger owns focus. The wrap-vs-clamp distinction is an explicit
//! per-instance policy: menus wrap at the ends, table headers clamp
//! (deliberate — wrap-around across a wide header row is disorienting).
//!
//! # Invariants
//!
//! 1. `active` is always `None` or `Some(i)` with `i < count`.
//! 2. Transitions never produce an out-of-range index; out-of-range
//!    writes from callers clamp instead of propagating.

use axess_core::intent::NavIntent;

/// End-of-list behavior for next/prev navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapPolicy {
    /// Past the last item lands on the first and vice versa (menus).
    Wrap,
    /// Navigation stops at the ends (table headers).
    Clamp,
}

/// The roving selection state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RovingSelection {
    active: Option<usize>,
    count: usize,
    policy: WrapPolicy,
}

impl RovingSelection {
    /// Create a selection over `count` items with nothing active.
    #[must_use]
    pub fn new(count: usize, policy: WrapPolicy) -> Self {
        Self {
            active: None,
            count,
            policy,
        }
    }

    /// Currently active index, or `None` when the trigger owns focus.
    #[must_use]
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Number of items.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Update the item count, re-clamping the active index if the list
    /// shrank under it.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        if count == 0 {
            self.active = None;
        } else if let Some(i) = self.active
            && i >= count
        {
            self.active = Some(count - 1);
        }
    }

    /// Set the active index directly; out-of-range values clamp to the
    /// last item, `None` returns focus ownership to the trigger.
    pub fn set_active(&mut self, index: Option<usize>) {
        self.active = match index {
            None => None,
            Some(_) if self.count == 0 => None,
            Some(i) => Some(i.min(self.count - 1)),
        };
    }

    /// Deactivate (trigger owns focus again).
    pub fn reset(&mut self) {
        self.active = None;
    }

    /// Apply a navigation intent. Returns `true` when the active index
    /// changed. Activate/Dismiss/Tab intents are not selection moves.
    pub fn apply(&mut self, intent: NavIntent) -> bool {
        if self.count == 0 {
            return false;
        }
        let last = self.count - 1;
        let next = match intent {
            NavIntent::First => Some(0),
            NavIntent::Last => Some(last),
            NavIntent::Next => match (self.active, self.policy) {
                (None, _) => Some(0),
                (Some(i), _) if i < last => Some(i + 1),
                (Some(_), WrapPolicy::Wrap) => Some(0),
                (Some(i), WrapPolicy::Clamp) => Some(i),
            },
            NavIntent::Prev => match (self.active, self.policy) {
                (None, WrapPolicy::Wrap) => Some(last),
                (None, WrapPolicy::Clamp) => Some(0),
                (Some(i), _) if i > 0 => Some(i - 1),
                (Some(_), WrapPolicy::Wrap) => Some(last),
                (Some(i), WrapPolicy::Clamp) => Some(i),
            },
            _ => return false,
        };
        let changed = next != self.active;
        self.active = next;
        changed
    }
}
