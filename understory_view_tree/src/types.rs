// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the view tree: node identifiers, flags, pointer-events modes, and local geometry.

use kurbo::{Affine, Rect};

/// Identifier for a node in the tree.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// ### Liveness
///
/// Use [`Tree::is_alive`](crate::Tree::is_alive) to check whether a `NodeId` still refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
///
/// ### Ordering
///
/// `NodeId` is totally ordered (slot, then generation) so it can key ordered maps,
/// for example a gesture registry. The order carries no geometric meaning.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Generation of the slot this id was minted for.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility, clipping, and touch targeting.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible. Invisible nodes and their subtrees never receive touches.
        const VISIBLE       = 0b0000_0001;
        /// Children are clipped to this node's bounds, so touches outside the
        /// bounds are not forwarded to them.
        const CLIP_CHILDREN = 0b0000_0010;
        /// Node paints a background and swallows touches inside its bounds
        /// even when nothing is attached to it.
        const BACKGROUND    = 0b0000_0100;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::CLIP_CHILDREN
    }
}

/// How a node takes part in touch targeting.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum PointerEvents {
    /// The node and its descendants can both be targets; descendants are tested first.
    #[default]
    Auto,
    /// Neither the node nor its descendants can be targets.
    None,
    /// The node can be a target but its descendants are never visited.
    BoxOnly,
    /// The node is never a target itself but its descendants are visited.
    BoxNone,
}

/// Local geometry and touch configuration for a node.
#[derive(Clone, Debug)]
pub struct LocalNode {
    /// Local (untransformed) bounds.
    pub local_bounds: Rect,
    /// Local transform relative to parent space.
    pub local_transform: Affine,
    /// Z-order within the parent. Higher is drawn on top; equal values keep insertion order.
    pub z_index: i32,
    /// Touch targeting mode.
    pub pointer_events: PointerEvents,
    /// Visibility, clipping, and background flags.
    pub flags: NodeFlags,
}

impl Default for LocalNode {
    fn default() -> Self {
        Self {
            local_bounds: Rect::ZERO,
            local_transform: Affine::IDENTITY,
            z_index: 0,
            pointer_events: PointerEvents::Auto,
            flags: NodeFlags::default(),
        }
    }
}
