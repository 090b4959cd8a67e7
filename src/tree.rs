//! # Widget Tree
//!
//! A small generational arena standing in for the element tree a grid is
//! mounted into. Nodes know their parent and children, may carry a lookup
//! key (the selector analogue), and may be marked as grid items with preset
//! coordinates.
//!
//! Handles are generational, so a [`WidgetId`] kept after its node was
//! freed never resolves to whatever reuses the slot.

use crate::model::{WidgetId, WidgetOptions};

/// How a caller names a widget: a handle, or a lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Id(WidgetId),
    Key(String),
}

impl From<WidgetId> for Target {
    fn from(id: WidgetId) -> Self {
        Target::Id(id)
    }
}

impl From<&str> for Target {
    fn from(key: &str) -> Self {
        Target::Key(key.to_string())
    }
}

impl From<String> for Target {
    fn from(key: String) -> Self {
        Target::Key(key)
    }
}

#[derive(Debug, Clone, Default)]
struct Node {
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    key: Option<String>,
    item: bool,
    preset: WidgetOptions,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug, Clone, Default)]
pub struct WidgetTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn allocate(&mut self, node: Node) -> WidgetId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            WidgetId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            WidgetId {
                index,
                generation: 0,
            }
        }
    }

    fn node(&self, id: WidgetId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: WidgetId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    pub fn is_alive(&self, id: WidgetId) -> bool {
        self.node(id).is_some()
    }

    /// Create a detached node, e.g. a grid container.
    pub fn create_root(&mut self, key: Option<&str>) -> WidgetId {
        self.allocate(Node {
            key: key.map(str::to_string),
            ..Default::default()
        })
    }

    /// Create a node under `parent`. Returns `None` if `parent` is gone.
    pub fn create_child(&mut self, parent: WidgetId, key: Option<&str>) -> Option<WidgetId> {
        if !self.is_alive(parent) {
            return None;
        }
        let id = self.allocate(Node {
            parent: Some(parent),
            key: key.map(str::to_string),
            ..Default::default()
        });
        self.node_mut(parent)?.children.push(id);
        Some(id)
    }

    /// Create a node already marked as a grid item, with preset coordinates
    /// that are picked up when its container is mounted or it is placed.
    pub fn create_item(
        &mut self,
        parent: WidgetId,
        key: Option<&str>,
        preset: WidgetOptions,
    ) -> Option<WidgetId> {
        let id = self.create_child(parent, key)?;
        self.set_item(id, preset);
        Some(id)
    }

    pub fn set_item(&mut self, id: WidgetId, preset: WidgetOptions) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.item = true;
                node.preset = preset;
                true
            }
            None => false,
        }
    }

    /// Mark `id` as an item, keeping any preset it already has.
    pub(crate) fn mark_item(&mut self, id: WidgetId) {
        if let Some(node) = self.node_mut(id) {
            node.item = true;
        }
    }

    pub(crate) fn unmark_item(&mut self, id: WidgetId) {
        if let Some(node) = self.node_mut(id) {
            node.item = false;
        }
    }

    pub fn is_item(&self, id: WidgetId) -> bool {
        self.node(id).map(|n| n.item).unwrap_or(false)
    }

    pub fn preset(&self, id: WidgetId) -> WidgetOptions {
        self.node(id).map(|n| n.preset).unwrap_or_default()
    }

    pub fn key(&self, id: WidgetId) -> Option<&str> {
        self.node(id)?.key.as_deref()
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Move `child` under `parent`, detaching it from its old parent first.
    /// Refuses to create a cycle.
    pub fn append_child(&mut self, parent: WidgetId, child: WidgetId) -> bool {
        self.insert_child(parent, usize::MAX, child)
    }

    /// Like [`WidgetTree::append_child`], but at `index` among `parent`'s
    /// children as they are once `child` is detached. Indices past the end
    /// append.
    pub fn insert_child(&mut self, parent: WidgetId, index: usize, child: WidgetId) -> bool {
        if !self.is_alive(parent) || !self.is_alive(child) || self.contains(child, parent) {
            return false;
        }
        self.detach(child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            let index = index.min(node.children.len());
            node.children.insert(index, child);
        }
        true
    }

    /// Position of `id` among its parent's children.
    pub fn index_in_parent(&self, id: WidgetId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// Unlink `id` from its parent. The node and its subtree stay alive.
    pub fn detach(&mut self, id: WidgetId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Detach and free `id` and its whole subtree.
    pub fn remove(&mut self, id: WidgetId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let slot = &mut self.slots[next.index as usize];
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(next.index);
            }
        }
        true
    }

    /// Whether `node` is `ancestor` or lies beneath it.
    pub fn contains(&self, ancestor: WidgetId, node: WidgetId) -> bool {
        if !self.is_alive(ancestor) {
            return false;
        }
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// The nearest item at or above `id`.
    pub fn closest_item(&self, id: WidgetId) -> Option<WidgetId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.is_item(node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// First node with `key` anywhere in the tree, roots in creation order.
    pub fn find(&self, key: &str) -> Option<WidgetId> {
        self.slots.iter().enumerate().find_map(|(index, slot)| {
            let node = slot.node.as_ref()?;
            if node.parent.is_none() {
                let root = WidgetId {
                    index: index as u32,
                    generation: slot.generation,
                };
                self.find_within(root, key)
            } else {
                None
            }
        })
    }

    /// First node with `key` at or below `root`, in document order.
    pub fn find_within(&self, root: WidgetId, key: &str) -> Option<WidgetId> {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.node(id)?;
            if node.key.as_deref() == Some(key) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Resolve a target to a live node anywhere in the tree.
    pub fn lookup(&self, target: &Target) -> Option<WidgetId> {
        match target {
            Target::Id(id) => self.is_alive(*id).then_some(*id),
            Target::Key(key) => self.find(key),
        }
    }
}
