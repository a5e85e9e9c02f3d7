//! Arena-backed widget tree.
//!
//! Nodes own their widget behaviors; identity is a generational
//! [`WidgetId`], so holding an id never keeps a destroyed widget alive
//! and a stale id simply fails every lookup. Parent links are plain
//! back-references; child order is the order children were attached.
//!
//! Widget coordinates are window-relative: a nested widget's rectangle
//! is expressed in the coordinate space of the top-level window that
//! contains it, not of its parent group.

use std::rc::Rc;

use velum_core::alloc::{Arena, Slot};
use velum_core::geometry::Rect;

use crate::context::Ui;
use crate::damage::Damage;
use crate::widget::{Widget, WidgetFlags};

/// Stable handle to a widget in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetId(pub(crate) Slot);

/// Per-widget "default action" callback, run by [`Ui::do_callback`].
pub type Callback = Rc<dyn Fn(&mut Ui, WidgetId)>;

/// A node in the widget tree.
pub struct WidgetNode {
    pub(crate) behavior: Rc<dyn Widget>,
    pub(crate) rect: Rect,
    pub(crate) flags: WidgetFlags,
    pub(crate) damage: Damage,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<WidgetId>,
    pub(crate) callback: Option<Callback>,
}

/// The widget tree: an arena of nodes plus the structural queries the
/// dispatcher needs (containment, ancestor walks, resolved flags).
#[derive(Default)]
pub struct WidgetTree {
    nodes: Arena<WidgetNode>,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
        }
    }

    pub fn insert(&mut self, behavior: Rc<dyn Widget>, rect: Rect) -> WidgetId {
        WidgetId(self.nodes.insert(WidgetNode {
            behavior,
            rect,
            flags: WidgetFlags::default(),
            damage: Damage::empty(),
            parent: None,
            children: Vec::new(),
            callback: None,
        }))
    }

    pub(crate) fn get(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.nodes.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: WidgetId) -> Option<&mut WidgetNode> {
        self.nodes.get_mut(id.0)
    }

    pub(crate) fn remove(&mut self, id: WidgetId) -> Option<WidgetNode> {
        self.nodes.remove(id.0)
    }

    pub fn exists(&self, id: WidgetId) -> bool {
        self.nodes.contains(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Shared handle to the node's behavior, for calling into user code
    /// without borrowing the tree across the call.
    pub(crate) fn behavior(&self, id: WidgetId) -> Option<Rc<dyn Widget>> {
        self.get(id).map(|n| n.behavior.clone())
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.get(id)?.parent
    }

    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Attach `child` under `parent`, detaching it from any previous
    /// parent first. Attaching a widget to itself is a no-op.
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) {
        if parent == child || !self.exists(parent) || !self.exists(child) {
            return;
        }
        self.remove_from_parent(child);
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
    }

    pub fn remove_from_parent(&mut self, child: WidgetId) {
        let Some(parent) = self.get(child).and_then(|n| n.parent) else {
            return;
        };
        if let Some(node) = self.get_mut(parent) {
            node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
    }

    /// True if `inner` is `outer` or a descendant of `outer`.
    /// False for stale handles and for `inner == None`.
    pub fn contains(&self, outer: WidgetId, inner: Option<WidgetId>) -> bool {
        let mut cursor = inner;
        while let Some(id) = cursor {
            if id == outer {
                return self.exists(id);
            }
            cursor = self.get(id).and_then(|n| n.parent);
        }
        false
    }

    pub fn rect(&self, id: WidgetId) -> Rect {
        self.get(id).map(|n| n.rect).unwrap_or_default()
    }

    pub fn set_rect(&mut self, id: WidgetId, rect: Rect) {
        if let Some(node) = self.get_mut(id) {
            node.rect = rect;
        }
    }

    pub fn is_window(&self, id: WidgetId) -> bool {
        self.get(id).map(|n| n.behavior.is_window()).unwrap_or(false)
    }

    /// Nearest strict ancestor of window kind.
    pub fn window_of(&self, id: WidgetId) -> Option<WidgetId> {
        let mut cursor = self.parent(id);
        while let Some(w) = cursor {
            if self.is_window(w) {
                return Some(w);
            }
            cursor = self.parent(w);
        }
        None
    }

    /// Outermost window containing the widget; the widget itself if it
    /// is a root window.
    pub fn top_window(&self, id: WidgetId) -> Option<WidgetId> {
        let mut found = self.is_window(id).then_some(id);
        let mut cursor = self.parent(id);
        while let Some(w) = cursor {
            if self.is_window(w) {
                found = Some(w);
            }
            cursor = self.parent(w);
        }
        found
    }

    /// Root of the tree the widget belongs to.
    pub fn root_of(&self, id: WidgetId) -> WidgetId {
        let mut cursor = id;
        while let Some(parent) = self.parent(cursor) {
            cursor = parent;
        }
        cursor
    }

    pub fn flags(&self, id: WidgetId) -> WidgetFlags {
        self.get(id).map(|n| n.flags).unwrap_or(WidgetFlags::empty())
    }

    pub fn active(&self, id: WidgetId) -> bool {
        self.get(id)
            .map(|n| !n.flags.contains(WidgetFlags::INACTIVE))
            .unwrap_or(false)
    }

    pub fn visible(&self, id: WidgetId) -> bool {
        self.get(id)
            .map(|n| !n.flags.contains(WidgetFlags::INVISIBLE))
            .unwrap_or(false)
    }

    /// A widget is active as rendered iff it and every ancestor is active.
    pub fn active_r(&self, id: WidgetId) -> bool {
        if !self.exists(id) {
            return false;
        }
        let mut cursor = Some(id);
        while let Some(w) = cursor {
            if !self.active(w) {
                return false;
            }
            cursor = self.parent(w);
        }
        true
    }

    /// Same AND-law as [`active_r`](Self::active_r), for visibility.
    pub fn visible_r(&self, id: WidgetId) -> bool {
        if !self.exists(id) {
            return false;
        }
        let mut cursor = Some(id);
        while let Some(w) = cursor {
            if !self.visible(w) {
                return false;
            }
            cursor = self.parent(w);
        }
        true
    }

    /// Whether event delivery should consider this widget at all.
    pub fn takes_events(&self, id: WidgetId) -> bool {
        self.visible_r(id)
            && self.active_r(id)
            && !self.flags(id).contains(WidgetFlags::OUTPUT)
    }

    pub fn iter(&self) -> impl Iterator<Item = (WidgetId, &WidgetNode)> {
        self.nodes.iter().map(|(slot, node)| (WidgetId(slot), node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Frame;

    fn tree_with_chain() -> (WidgetTree, WidgetId, WidgetId, WidgetId) {
        let mut tree = WidgetTree::new();
        let a = tree.insert(Rc::new(Frame), Rect::new(0, 0, 100, 100));
        let b = tree.insert(Rc::new(Frame), Rect::new(10, 10, 50, 50));
        let c = tree.insert(Rc::new(Frame), Rect::new(20, 20, 10, 10));
        tree.add_child(a, b);
        tree.add_child(b, c);
        (tree, a, b, c)
    }

    #[test]
    fn test_contains_walks_ancestry() {
        let (tree, a, b, c) = tree_with_chain();
        assert!(tree.contains(a, Some(c)));
        assert!(tree.contains(a, Some(a)));
        assert!(tree.contains(b, Some(c)));
        assert!(!tree.contains(c, Some(a)));
        assert!(!tree.contains(a, None));
    }

    #[test]
    fn test_active_r_is_and_of_ancestors() {
        let (mut tree, a, b, c) = tree_with_chain();
        assert!(tree.active_r(c));
        tree.get_mut(b).unwrap().flags |= WidgetFlags::INACTIVE;
        assert!(tree.active_r(a));
        assert!(!tree.active_r(b));
        assert!(!tree.active_r(c));
        tree.get_mut(b).unwrap().flags &= !WidgetFlags::INACTIVE;
        assert!(tree.active_r(c));
    }

    #[test]
    fn test_visible_r_is_and_of_ancestors() {
        let (mut tree, a, _b, c) = tree_with_chain();
        assert!(tree.visible_r(c));
        tree.get_mut(a).unwrap().flags |= WidgetFlags::INVISIBLE;
        assert!(!tree.visible_r(a));
        assert!(!tree.visible_r(c));
    }

    #[test]
    fn test_reparent_detaches_first() {
        let (mut tree, a, b, c) = tree_with_chain();
        tree.add_child(a, c);
        assert_eq!(tree.parent(c), Some(a));
        assert!(!tree.children(b).contains(&c));
        assert!(tree.children(a).contains(&c));
    }

    #[test]
    fn test_stale_id_fails_every_query() {
        let (mut tree, _a, b, c) = tree_with_chain();
        tree.remove_from_parent(c);
        tree.remove(c);
        assert!(!tree.exists(c));
        assert!(!tree.active_r(c));
        assert!(!tree.visible_r(c));
        assert!(!tree.contains(b, Some(c)));
        assert_eq!(tree.parent(c), None);
    }
}
