#![forbid(unsafe_code)]

//! In-memory reference implementation of [`FocusBridge`].
//!
//! [`MemoryTree`] holds a forest of nodes with explicit document order
//! (children are kept in insertion order) and tracks focus plus the
//! accessibility attributes the widgets write. It is the traversal
//! provider the widget test suites run against, and doubles as a model
//! for embedders writing a bridge over a real tree.
//!
//! # Invariants
//!
//! 1. Node ids are unique within the tree.
//! 2. Removing a node detaches its entire subtree; detached nodes report
//!    `is_attached() == false` and can no longer receive focus.
//! 3. `focusable_descendants` visits the subtree depth-first in child
//!    insertion order, matching document order.

use std::collections::HashMap;

use tracing::trace;

use crate::bridge::{FocusBridge, NodeId};

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    focusable: bool,
    visible: bool,
    expanded: bool,
    selected: bool,
    tab_stop: bool,
}

impl Node {
    fn new(parent: Option<NodeId>) -> Self {
        Self {
            parent,
            children: Vec::new(),
            focusable: false,
            visible: true,
            expanded: false,
            selected: false,
            tab_stop: false,
        }
    }
}

/// An in-memory element tree implementing [`FocusBridge`].
#[derive(Debug, Default)]
pub struct MemoryTree {
    nodes: HashMap<NodeId, Node>,
    roots: Vec<NodeId>,
    focused: Option<NodeId>,
}

impl MemoryTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root node. Duplicate ids are ignored.
    pub fn add_root(&mut self, id: NodeId) {
        if self.nodes.contains_key(&id) {
            return;
        }
        self.nodes.insert(id, Node::new(None));
        self.roots.push(id);
    }

    /// Add a child under `parent`, appended after existing siblings.
    /// Ignored if the parent is unknown or the id already exists.
    pub fn add_child(&mut self, parent: NodeId, id: NodeId) {
        if self.nodes.contains_key(&id) || !self.nodes.contains_key(&parent) {
            return;
        }
        self.nodes.insert(id, Node::new(Some(parent)));
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
    }

    /// Mark a node focusable (or not).
    pub fn set_focusable(&mut self, id: NodeId, focusable: bool) {
        if let Some(n) = self.nodes.get_mut(&id) {
            n.focusable = focusable;
        }
    }

    /// Mark a node visible (or hidden). Hidden nodes drop out of the
    /// focusable set unless they currently hold focus.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(n) = self.nodes.get_mut(&id) {
            n.visible = visible;
        }
    }

    /// Detach a node and its entire subtree from the document.
    pub fn remove(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(&id) else {
            return;
        };
        if let Some(parent) = node.parent
            && let Some(p) = self.nodes.get_mut(&parent)
        {
            p.children.retain(|c| *c != id);
        }
        self.roots.retain(|r| *r != id);
        for child in node.children {
            self.remove(child);
        }
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    /// Release focus entirely (no element holds it).
    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    /// Read back `aria-expanded` for assertions.
    #[must_use]
    pub fn expanded(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.expanded)
    }

    /// Read back `aria-selected` for assertions.
    #[must_use]
    pub fn selected(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.selected)
    }

    /// Read back tab-stop membership for assertions.
    #[must_use]
    pub fn tab_stop(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.tab_stop)
    }

    fn collect_focusable(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        for child in &node.children {
            if let Some(c) = self.nodes.get(child)
                && c.focusable
                && (c.visible || self.focused == Some(*child))
            {
                out.push(*child);
            }
            self.collect_focusable(*child, out);
        }
    }
}

impl FocusBridge for MemoryTree {
    fn focusable_descendants(&self, container: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_focusable(container, &mut out);
        out
    }

    fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    fn set_focus(&mut self, id: NodeId) -> bool {
        if !self.nodes.contains_key(&id) {
            trace!(id, "focus write on detached node dropped");
            return false;
        }
        trace!(from = ?self.focused, to = id, "focus moved");
        self.focused = Some(id);
        true
    }

    fn is_attached(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn contains(&self, container: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == container {
                return true;
            }
            cursor = self.nodes.get(&current).and_then(|n| n.parent);
        }
        false
    }

    fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        if let Some(n) = self.nodes.get_mut(&id) {
            n.expanded = expanded;
            trace!(id, expanded, "expanded attribute written");
        }
    }

    fn set_selected(&mut self, id: NodeId, selected: bool) {
        if let Some(n) = self.nodes.get_mut(&id) {
            n.selected = selected;
            trace!(id, selected, "selected attribute written");
        }
    }

    fn set_tab_stop(&mut self, id: NodeId, stop: bool) {
        if let Some(n) = self.nodes.get_mut(&id) {
            n.tab_stop = stop;
            trace!(id, stop, "tab stop written");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Container 1 with focusable children 2, 3, 4.
    fn three_item_tree() -> MemoryTree {
        let mut tree = MemoryTree::new();
        tree.add_root(1);
        for id in 2..=4 {
            tree.add_child(1, id);
            tree.set_focusable(id, true);
        }
        tree
    }

    #[test]
    fn descendants_in_document_order() {
        let tree = three_item_tree();
        assert_eq!(tree.focusable_descendants(1), vec![2, 3, 4]);
    }

    #[test]
    fn nested_descendants_depth_first() {
        let mut tree = three_item_tree();
        tree.add_child(3, 30);
        tree.set_focusable(30, true);
        assert_eq!(tree.focusable_descendants(1), vec![2, 3, 30, 4]);
    }

    #[test]
    fn hidden_nodes_excluded_unless_focused() {
        let mut tree = three_item_tree();
        tree.set_visible(3, false);
        assert_eq!(tree.focusable_descendants(1), vec![2, 4]);

        tree.set_focus(3);
        assert_eq!(tree.focusable_descendants(1), vec![2, 3, 4]);
    }

    #[test]
    fn non_focusable_nodes_excluded() {
        let mut tree = three_item_tree();
        tree.set_focusable(3, false);
        assert_eq!(tree.focusable_descendants(1), vec![2, 4]);
    }

    #[test]
    fn container_not_in_own_set() {
        let mut tree = three_item_tree();
        tree.set_focusable(1, true);
        assert!(!tree.focusable_descendants(1).contains(&1));
    }

    #[test]
    fn remove_detaches_subtree() {
        let mut tree = three_item_tree();
        tree.add_child(3, 30);
        tree.remove(3);
        assert!(!tree.is_attached(3));
        assert!(!tree.is_attached(30));
        assert_eq!(tree.focusable_descendants(1), vec![2, 4]);
    }

    #[test]
    fn remove_focused_node_clears_focus() {
        let mut tree = three_item_tree();
        tree.set_focus(3);
        tree.remove(3);
        assert_eq!(tree.focused(), None);
    }

    #[test]
    fn focus_unknown_node_is_rejected() {
        let mut tree = three_item_tree();
        tree.set_focus(2);
        assert!(!tree.set_focus(99));
        assert_eq!(tree.focused(), Some(2));
    }

    #[test]
    fn contains_walks_ancestry() {
        let mut tree = three_item_tree();
        tree.add_child(3, 30);
        assert!(tree.contains(1, 30));
        assert!(tree.contains(1, 1));
        assert!(!tree.contains(2, 30));
        assert!(!tree.contains(1, 99));
    }

    #[test]
    fn attribute_writes_on_unknown_ids_are_dropped() {
        let mut tree = MemoryTree::new();
        tree.set_expanded(5, true);
        tree.set_selected(5, true);
        tree.set_tab_stop(5, true);
        assert!(!tree.expanded(5));
        assert!(!tree.selected(5));
        assert!(!tree.tab_stop(5));
    }

    #[test]
    fn empty_container_yields_empty_set() {
        let mut tree = MemoryTree::new();
        tree.add_root(1);
        assert!(tree.focusable_descendants(1).is_empty());
        assert!(tree.focusable_descendants(99).is_empty());
    }
}
