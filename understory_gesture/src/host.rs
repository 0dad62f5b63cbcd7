// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host view-tree seam.
//!
//! The engine never owns or mutates views. It reads the host's hierarchy through
//! [`ViewHost`] while hit testing, while mapping frames into view-local space, and
//! while checking whether a handler's view is still attached under the dispatch root.

use core::fmt::Debug;

use kurbo::{Affine, Rect};

use crate::types::PointerEvents;

/// Read-only access to the host's view hierarchy.
///
/// Node ids are opaque tokens. They must be totally ordered so they can key the
/// registry, and a stale id must answer `false` from [`is_alive`](Self::is_alive).
pub trait ViewHost {
    /// Identity of a view node.
    type NodeId: Copy + Ord + Debug;

    /// Parent of `node`, or `None` for a root or stale id.
    fn parent(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    /// Number of children of `node`.
    fn child_count(&self, node: Self::NodeId) -> usize;

    /// The `index`-th child of `node` in drawing order (back to front).
    fn child_in_drawing_order(&self, node: Self::NodeId, index: usize) -> Option<Self::NodeId>;

    /// Touch targeting mode of `node`.
    fn pointer_events(&self, node: Self::NodeId) -> PointerEvents;

    /// Bounds of `node` in its own local space.
    fn bounds(&self, node: Self::NodeId) -> Rect;

    /// Transform from `node`'s local space into its parent's space.
    fn transform(&self, node: Self::NodeId) -> Affine;

    /// Whether touches outside `node`'s bounds are withheld from its children.
    fn clips_children(&self, node: Self::NodeId) -> bool;

    /// Whether `node` is visible. Invisible subtrees are skipped when hit testing.
    fn is_visible(&self, _node: Self::NodeId) -> bool {
        true
    }

    /// Whether `node` paints a background and so swallows touches without handlers.
    fn has_background(&self, _node: Self::NodeId) -> bool {
        false
    }

    /// Whether `node` still refers to a live view.
    fn is_alive(&self, node: Self::NodeId) -> bool;
}

/// Whether `node` is `root` or a live descendant of it.
pub fn is_attached_under<H: ViewHost + ?Sized>(host: &H, root: H::NodeId, node: H::NodeId) -> bool {
    if !host.is_alive(node) {
        return false;
    }
    let mut cur = Some(node);
    while let Some(n) = cur {
        if n == root {
            return true;
        }
        cur = host.parent(n);
    }
    false
}

/// Transform from `root` coordinates into `node`'s local space.
///
/// Composes the transforms strictly below `root` down to `node` and inverts the
/// result. Returns `None` if `node` is not attached under `root` or the chain is
/// singular.
pub fn root_to_local<H: ViewHost + ?Sized>(
    host: &H,
    root: H::NodeId,
    node: H::NodeId,
) -> Option<Affine> {
    if !host.is_alive(node) {
        return None;
    }
    let mut to_root = Affine::IDENTITY;
    let mut cur = node;
    while cur != root {
        to_root = host.transform(cur) * to_root;
        cur = host.parent(cur)?;
    }
    let det = to_root.determinant();
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    Some(to_root.inverse())
}
