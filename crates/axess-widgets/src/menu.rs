#![forbid(unsafe_code)]

//! Roving keyboard menu: the disclosure (dropdown) pattern.
//!
//! Composes the focus scope stack, roving selection, and keyboard
//! dispatcher into a two-state widget: `closed <-> open`, nothing in
//! between — opening and focusing are synchronous from the caller's
//! perspective.
//!
//! # State machine
//!
//! - closed, Activate on trigger → open with no active item
//! - closed, ArrowDown on trigger → open with item 0 active
//! - closed, ArrowUp on trigger → open with the last item active
//! - open, ArrowDown/ArrowUp → move active item, wrapping at both ends
//! - open, Home/End → first/last item
//! - open, Escape / Tab / pointer outside the menu surface → close and
//!   restore focus to the trigger (via scope deactivation)
//! - open, Enter/Space on an item → run the item's action, then close
//!
//! On every transition the bridge attributes stay synchronized:
//! `expanded` on the trigger, `selected` and the single roving tab stop
//! on exactly the active item. While no item is active, no item holds a
//! tab stop. The active item always receives real focus so a screen
//! reader announces it.

use std::fmt;
use std::time::Instant;

use axess_core::bridge::{FocusBridge, NodeId};
use axess_core::event::{Event, PointerEventKind};
use axess_core::intent::{NavIntent, dispatch};
use tracing::debug;

use crate::announcer::{LiveAnnouncer, Politeness};
use crate::focus_scope::{ScopeId, ScopeStack};
use crate::roving::{RovingSelection, WrapPolicy};

/// Outcome of a menu interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    /// The menu opened.
    Opened,
    /// The menu closed without activating an item (Escape, Tab, or an
    /// outside interaction).
    Dismissed,
    /// An item's action ran and the menu closed.
    ItemActivated { index: usize },
}

struct MenuItem {
    node: NodeId,
    disabled: bool,
    action: Option<Box<dyn FnMut()>>,
}

/// A dropdown menu bound to a trigger element and a menu surface.
pub struct Menu {
    trigger: NodeId,
    container: NodeId,
    items: Vec<MenuItem>,
    selection: RovingSelection,
    scope: Option<ScopeId>,
    open: bool,
    on_escape: Option<Box<dyn FnMut()>>,
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("trigger", &self.trigger)
            .field("container", &self.container)
            .field("items", &self.items.len())
            .field("open", &self.open)
            .field("active", &self.selection.active())
            .finish()
    }
}

impl Menu {
    /// Create a menu for the given trigger and menu surface.
    #[must_use]
    pub fn new(trigger: NodeId, container: NodeId) -> Self {
        Self {
            trigger,
            container,
            items: Vec::new(),
            selection: RovingSelection::new(0, WrapPolicy::Wrap),
            scope: None,
            open: false,
            on_escape: None,
        }
    }

    /// Builder: append an item with no action.
    #[must_use]
    pub fn item(mut self, node: NodeId) -> Self {
        self.push_item(node, false, None);
        self
    }

    /// Builder: append an item whose action runs on activation.
    #[must_use]
    pub fn item_with_action(mut self, node: NodeId, action: impl FnMut() + 'static) -> Self {
        self.push_item(node, false, Some(Box::new(action)));
        self
    }

    /// Builder: append a disabled item. It participates in roving
    /// navigation but activating it is a no-op that keeps the menu open.
    #[must_use]
    pub fn disabled_item(mut self, node: NodeId) -> Self {
        self.push_item(node, true, None);
        self
    }

    /// Builder: callback fired once per Escape press while open, before
    /// the menu closes itself.
    #[must_use]
    pub fn on_escape(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_escape = Some(Box::new(callback));
        self
    }

    fn push_item(&mut self, node: NodeId, disabled: bool, action: Option<Box<dyn FnMut()>>) {
        self.items.push(MenuItem {
            node,
            disabled,
            action,
        });
        self.selection.set_count(self.items.len());
    }

    /// Whether the menu is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The currently active item index (`None`: trigger owns focus).
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.selection.active()
    }

    /// Open with no active item (plain activation: mouse or Enter).
    pub fn open<B: FocusBridge>(
        &mut self,
        bridge: &mut B,
        scopes: &mut ScopeStack,
        announcer: &mut LiveAnnouncer,
        now: Instant,
    ) -> Option<MenuEvent> {
        self.open_at(bridge, scopes, announcer, now, None)
    }

    /// Close, restoring focus to the trigger. No-op while closed.
    pub fn close<B: FocusBridge>(
        &mut self,
        bridge: &mut B,
        scopes: &mut ScopeStack,
        announcer: &mut LiveAnnouncer,
        now: Instant,
    ) {
        if !self.open {
            return;
        }
        self.open = false;
        self.selection.reset();
        if let Some(scope) = self.scope.take() {
            scopes.deactivate(bridge, scope);
        }
        self.sync_attributes(bridge);
        announcer.announce("Menu closed", Politeness::Polite, now);
        debug!(trigger = self.trigger, "menu closed");
    }

    /// Route an input event through the menu.
    ///
    /// While closed, only events on the trigger matter (Enter/Space or
    /// an arrow key opens). While open, the menu consumes its keyboard
    /// pattern and watches for outside pointer interactions.
    pub fn handle_event<B: FocusBridge>(
        &mut self,
        bridge: &mut B,
        scopes: &mut ScopeStack,
        announcer: &mut LiveAnnouncer,
        now: Instant,
        event: &Event,
    ) -> Option<MenuEvent> {
        match event {
            Event::Key(key) => {
                let intent = dispatch(key)?;
                if self.open {
                    self.handle_open_intent(bridge, scopes, announcer, now, intent)
                } else {
                    self.handle_closed_intent(bridge, scopes, announcer, now, intent)
                }
            }
            Event::Pointer(pointer) => {
                if pointer.kind != PointerEventKind::Down {
                    return None;
                }
                if !self.open {
                    if pointer.target == Some(self.trigger) {
                        return self.open_at(bridge, scopes, announcer, now, None);
                    }
                    return None;
                }
                if let Some(target) = pointer.target
                    && let Some(index) = self.items.iter().position(|i| i.node == target)
                {
                    return self.activate_item(bridge, scopes, announcer, now, index);
                }
                let inside = pointer
                    .target
                    .is_some_and(|t| bridge.contains(self.container, t));
                if inside {
                    return None;
                }
                self.close(bridge, scopes, announcer, now);
                Some(MenuEvent::Dismissed)
            }
        }
    }

    fn handle_closed_intent<B: FocusBridge>(
        &mut self,
        bridge: &mut B,
        scopes: &mut ScopeStack,
        announcer: &mut LiveAnnouncer,
        now: Instant,
        intent: NavIntent,
    ) -> Option<MenuEvent> {
        let initial = match intent {
            NavIntent::Activate => None,
            NavIntent::Next => Some(0),
            NavIntent::Prev if self.items.is_empty() => None,
            NavIntent::Prev => Some(self.items.len() - 1),
            _ => return None,
        };
        self.open_at(bridge, scopes, announcer, now, initial)
    }

    fn handle_open_intent<B: FocusBridge>(
        &mut self,
        bridge: &mut B,
        scopes: &mut ScopeStack,
        announcer: &mut LiveAnnouncer,
        now: Instant,
        intent: NavIntent,
    ) -> Option<MenuEvent> {
        match intent {
            NavIntent::Next | NavIntent::Prev | NavIntent::First | NavIntent::Last => {
                self.selection.apply(intent);
                self.focus_active(bridge);
                self.sync_attributes(bridge);
                None
            }
            NavIntent::Dismiss => {
                if let Some(callback) = self.on_escape.as_mut() {
                    callback();
                }
                self.close(bridge, scopes, announcer, now);
                Some(MenuEvent::Dismissed)
            }
            NavIntent::TabForward | NavIntent::TabBackward => {
                self.close(bridge, scopes, announcer, now);
                Some(MenuEvent::Dismissed)
            }
            NavIntent::Activate => {
                let index = self.selection.active()?;
                self.activate_item(bridge, scopes, announcer, now, index)
            }
        }
    }

    fn open_at<B: FocusBridge>(
        &mut self,
        bridge: &mut B,
        scopes: &mut ScopeStack,
        announcer: &mut LiveAnnouncer,
        now: Instant,
        initial: Option<usize>,
    ) -> Option<MenuEvent> {
        if self.open {
            return None;
        }
        // A pointer-open can arrive while focus is parked elsewhere.
        // Put focus on the trigger first so the scope captures it and
        // Escape always restores to the trigger.
        if bridge.focused() != Some(self.trigger) {
            bridge.set_focus(self.trigger);
        }
        self.open = true;
        self.selection.set_count(self.items.len());
        self.selection.set_active(initial);

        let initial_node = self
            .selection
            .active()
            .and_then(|i| self.items.get(i))
            .map(|item| item.node);
        self.scope = Some(scopes.activate(bridge, self.container, initial_node));

        self.sync_attributes(bridge);
        announcer.announce("Menu opened", Politeness::Polite, now);
        debug!(trigger = self.trigger, active = ?self.selection.active(), "menu opened");
        Some(MenuEvent::Opened)
    }

    fn activate_item<B: FocusBridge>(
        &mut self,
        bridge: &mut B,
        scopes: &mut ScopeStack,
        announcer: &mut LiveAnnouncer,
        now: Instant,
        index: usize,
    ) -> Option<MenuEvent> {
        let item = self.items.get_mut(index)?;
        if item.disabled {
            // Disabled items keep the menu open; the press goes nowhere.
            self.selection.set_active(Some(index));
            self.focus_active(bridge);
            self.sync_attributes(bridge);
            return None;
        }
        // Action runs before focus is restored to the trigger.
        if let Some(action) = item.action.as_mut() {
            action();
        }
        self.close(bridge, scopes, announcer, now);
        Some(MenuEvent::ItemActivated { index })
    }

    fn focus_active<B: FocusBridge>(&self, bridge: &mut B) {
        if let Some(node) = self
            .selection
            .active()
            .and_then(|i| self.items.get(i))
            .map(|item| item.node)
        {
            bridge.set_focus(node);
        }
    }

    /// Re-write every bridge attribute from the current state: exactly
    /// one item carries `selected` and the roving tab stop (none while
    /// no item is active), and the trigger's `expanded` mirrors `open`.
    fn sync_attributes<B: FocusBridge>(&self, bridge: &mut B) {
        bridge.set_expanded(self.trigger, self.open);
        let active = if self.open { self.selection.active() } else { None };
        for (i, item) in self.items.iter().enumerate() {
            let is_active = active == Some(i);
            bridge.set_selected(item.node, is_active);
            bridge.set_tab_stop(item.node, is_active);
        }
    }
}
