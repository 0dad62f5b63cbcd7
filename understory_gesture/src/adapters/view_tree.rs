// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`ViewHost`] for Understory View Tree.
//!
//! ## Feature
//!
//! Enable with `view_tree_adapter` (on by default).
//!
//! ## Notes
//!
//! The tree's `VISIBLE`, `CLIP_CHILDREN`, and `BACKGROUND` flags map onto
//! [`ViewHost::is_visible`], [`ViewHost::clips_children`], and
//! [`ViewHost::has_background`]. Stale ids answer with empty bounds and no
//! children, and are reported dead by [`ViewHost::is_alive`].
//!
//! When removing views, pass every id returned by `Tree::remove` to
//! [`Orchestrator::view_removed`](crate::orchestrator::Orchestrator::view_removed).

use kurbo::{Affine, Rect};
use understory_view_tree::{NodeFlags, NodeId, Tree};

use crate::host::ViewHost;
use crate::types::PointerEvents;

impl ViewHost for Tree {
    type NodeId = NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        Tree::parent(self, node)
    }

    fn child_count(&self, node: NodeId) -> usize {
        self.children(node).len()
    }

    fn child_in_drawing_order(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.children(node).get(index).copied()
    }

    fn pointer_events(&self, node: NodeId) -> PointerEvents {
        match self.local(node).map(|l| l.pointer_events) {
            Some(understory_view_tree::PointerEvents::Auto) => PointerEvents::Auto,
            Some(understory_view_tree::PointerEvents::BoxOnly) => PointerEvents::BoxOnly,
            Some(understory_view_tree::PointerEvents::BoxNone) => PointerEvents::BoxNone,
            Some(understory_view_tree::PointerEvents::None) | None => PointerEvents::None,
        }
    }

    fn bounds(&self, node: NodeId) -> Rect {
        self.local(node).map_or(Rect::ZERO, |l| l.local_bounds)
    }

    fn transform(&self, node: NodeId) -> Affine {
        self.local(node)
            .map_or(Affine::IDENTITY, |l| l.local_transform)
    }

    fn clips_children(&self, node: NodeId) -> bool {
        self.local(node)
            .is_some_and(|l| l.flags.contains(NodeFlags::CLIP_CHILDREN))
    }

    fn is_visible(&self, node: NodeId) -> bool {
        self.local(node)
            .is_some_and(|l| l.flags.contains(NodeFlags::VISIBLE))
    }

    fn has_background(&self, node: NodeId) -> bool {
        self.local(node)
            .is_some_and(|l| l.flags.contains(NodeFlags::BACKGROUND))
    }

    fn is_alive(&self, node: NodeId) -> bool {
        Tree::is_alive(self, node)
    }
}
