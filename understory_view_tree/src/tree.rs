// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, queries.

use alloc::vec::Vec;
use kurbo::{Affine, Rect};

use crate::types::{LocalNode, NodeFlags, NodeId, PointerEvents};

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level view tree.
pub struct Tree {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    // Kept in drawing order: ascending z, insertion order within equal z.
    children: Vec<NodeId>,
    local: LocalNode,
}

impl Node {
    fn new(generation: u32, local: LocalNode) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Insert a new node as a child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` inserts the node as a root.
    pub fn insert(&mut self, parent: Option<NodeId>, local: LocalNode) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove a node (and its subtree) from the tree.
    ///
    /// Returns every removed id, the subtree root first and descendants in
    /// depth-first order. Hosts forward these to whatever holds back-references
    /// to nodes (for example a gesture registry).
    pub fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        let mut removed = Vec::new();
        if !self.is_alive(id) {
            return removed;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        self.remove_subtree(id, &mut removed);
        removed
    }

    /// Reparent `id` under `new_parent` (or detach it as a root if `None`).
    ///
    /// Reparenting a node under itself or one of its descendants is ignored.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || self.is_ancestor_or_self(id, p))
        {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
    }

    /// Update local transform.
    pub fn set_local_transform(&mut self, id: NodeId, tf: Affine) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_transform = tf;
        }
    }

    /// Update local bounds.
    pub fn set_local_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_bounds = bounds;
        }
    }

    /// Update z index; the node moves within its parent's drawing order.
    pub fn set_z_index(&mut self, id: NodeId, z: i32) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        n.local.z_index = z;
        let parent = n.parent;
        if let Some(parent) = parent {
            self.unlink_parent(id, parent);
            self.link_parent(id, parent);
        }
    }

    /// Update node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags = flags;
        }
    }

    /// Update the pointer-events mode.
    pub fn set_pointer_events(&mut self, id: NodeId, mode: PointerEvents) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.pointer_events = mode;
        }
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    /// See [`NodeId`] docs for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Local data of a live node.
    pub fn local(&self, id: NodeId) -> Option<&LocalNode> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// Parent of a live node, or `None` for roots and stale ids.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children of a live node in drawing order (bottom-most first).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Transform from `id`'s local space into the space of its root.
    pub fn world_transform(&self, id: NodeId) -> Option<Affine> {
        let mut node = self.node_opt(id)?;
        let mut tf = node.local.local_transform;
        while let Some(p) = node.parent {
            node = self.node(p);
            tf = node.local.local_transform * tf;
        }
        Some(tf)
    }

    /// Root→node path (inclusive), or empty for stale ids.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        let mut cur = id;
        loop {
            out.push(cur);
            match self.node(cur).parent {
                Some(p) => cur = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    // --- internals ---

    /// Access a live node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.node(id).parent {
                Some(p) => id = p,
                None => return false,
            }
        }
    }

    fn remove_subtree(&mut self, id: NodeId, removed: &mut Vec<NodeId>) {
        removed.push(id);
        let children = self.node(id).children.clone();
        for child in children {
            self.remove_subtree(child, removed);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        let z = self.node(id).local.z_index;
        let pos = {
            let siblings = &self.node(parent).children;
            siblings
                .iter()
                .position(|s| self.node(*s).local.z_index > z)
                .unwrap_or(siblings.len())
        };
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.insert(pos, id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = None;
        }
    }
}
