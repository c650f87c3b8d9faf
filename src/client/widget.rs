//! Widget tree data structures - host-owned UI node hierarchy
//!
//! These are pure data structures with NO rendering logic. The plugin only
//! reads content types and toggles hidden flags; it never creates or
//! destroys nodes.

use std::collections::HashMap;

/// Widget group id of the chat box interface.
pub const CHATBOX_GROUP: u32 = 162;

/// The chat box root widget, (group, child) = (162, 0).
pub const CHATBOX: WidgetId = WidgetId {
    group: CHATBOX_GROUP,
    child: 0,
};

/// Content type of chat box children that must stay visible.
/// Hiding a node with this tag breaks the host's chat viewport rendering.
pub const CONTENT_TYPE_UNHIDEABLE: i32 = 1337;

/// Address of a root widget in the host interface: (groupId, childId).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WidgetId {
    pub group: u32,
    pub child: u32,
}

/// Index of a widget node inside a [`WidgetTree`].
pub type WidgetKey = usize;

/// A single UI node: hidden flag, content-type tag, three child collections.
#[derive(Clone, Debug, Default)]
pub struct Widget {
    hidden: bool,
    content_type: i32,
    dynamic_children: Vec<WidgetKey>,
    nested_children: Vec<WidgetKey>,
    static_children: Vec<WidgetKey>,
}

impl Widget {
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn content_type(&self) -> i32 {
        self.content_type
    }

    pub fn dynamic_children(&self) -> &[WidgetKey] {
        &self.dynamic_children
    }

    pub fn nested_children(&self) -> &[WidgetKey] {
        &self.nested_children
    }

    pub fn static_children(&self) -> &[WidgetKey] {
        &self.static_children
    }
}

/// Arena of widget nodes with id lookup for root widgets.
///
/// Child nodes are anonymous (addressed by key only); roots are addressed
/// by their (group, child) id the way the host interface exposes them.
#[derive(Debug, Default)]
pub struct WidgetTree {
    nodes: Vec<Widget>,
    roots: HashMap<WidgetId, WidgetKey>,
}

/// Which of a widget's three child collections a node belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChildKind {
    Dynamic,
    Nested,
    Static,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a root widget addressable by id.
    pub fn insert_root(&mut self, id: WidgetId, content_type: i32) -> WidgetKey {
        let key = self.push(content_type);
        self.roots.insert(id, key);
        key
    }

    /// Attach a new child node to `parent` in the given collection.
    pub fn add_child(&mut self, parent: WidgetKey, kind: ChildKind, content_type: i32) -> WidgetKey {
        let key = self.push(content_type);
        let parent = &mut self.nodes[parent];
        match kind {
            ChildKind::Dynamic => parent.dynamic_children.push(key),
            ChildKind::Nested => parent.nested_children.push(key),
            ChildKind::Static => parent.static_children.push(key),
        }
        key
    }

    fn push(&mut self, content_type: i32) -> WidgetKey {
        self.nodes.push(Widget {
            content_type,
            ..Widget::default()
        });
        self.nodes.len() - 1
    }

    /// Look up a root widget by id. Absent ids (interface not built yet,
    /// wrong host version) are an ordinary `None`.
    pub fn find(&self, id: WidgetId) -> Option<WidgetKey> {
        self.roots.get(&id).copied()
    }

    pub fn get(&self, key: WidgetKey) -> &Widget {
        &self.nodes[key]
    }

    pub fn set_hidden(&mut self, key: WidgetKey, hidden: bool) {
        self.nodes[key].hidden = hidden;
    }

    pub fn is_hidden(&self, key: WidgetKey) -> bool {
        self.nodes[key].hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_absent_root() {
        let tree = WidgetTree::new();
        assert!(tree.find(CHATBOX).is_none());
    }

    #[test]
    fn test_children_land_in_their_collection() {
        let mut tree = WidgetTree::new();
        let root = tree.insert_root(CHATBOX, 0);
        let s = tree.add_child(root, ChildKind::Static, 0);
        let d = tree.add_child(root, ChildKind::Dynamic, 0);
        let n = tree.add_child(root, ChildKind::Nested, 0);

        let widget = tree.get(root);
        assert_eq!(widget.dynamic_children(), &[d]);
        assert_eq!(widget.nested_children(), &[n]);
        assert_eq!(widget.static_children(), &[s]);
    }

    #[test]
    fn test_hidden_flag_round_trip() {
        let mut tree = WidgetTree::new();
        let root = tree.insert_root(CHATBOX, 0);
        assert!(!tree.is_hidden(root));

        tree.set_hidden(root, true);
        assert!(tree.is_hidden(root));

        tree.set_hidden(root, false);
        assert!(!tree.is_hidden(root));
    }
}
