// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_view_tree --heading-base-level=0

//! Understory View Tree: a Kurbo-native tree of views for touch targeting.
//!
//! Understory View Tree models the host side of gesture handling: a hierarchy of views with
//! local bounds, local transforms, drawing order, clipping, and a per-view pointer-events mode.
//!
//! - Children are kept in drawing order (ascending z-index, insertion order within equal z).
//! - Each view has a [`PointerEvents`] mode deciding whether it, its descendants, both, or
//!   neither can be touch targets.
//! - [`NodeFlags`] control visibility, whether children are clipped to the parent's bounds, and
//!   whether a view paints a background.
//!
//! ## Where this fits
//!
//! The tree is read-only to gesture handling. `understory_gesture` walks it to find the
//! handlers a new pointer should reach, maps event coordinates into view-local space, and
//! checks whether a handler's view is still attached under the dispatch root.
//! Removing a view returns the ids of the removed subtree so the host can tell the gesture
//! layer which back-references to drop.
//!
//! ## Not a layout engine
//!
//! This crate does not perform layout. Upstream code computes positions and sizes and writes
//! the resulting bounds and transforms into the tree.
//!
//! ## API overview
//!
//! - [`Tree`]: container managing nodes.
//! - [`LocalNode`]: per-node local data (bounds, transform, z, pointer-events mode, flags).
//! - [`NodeId`]: generational handle of a node.
//!
//! ### Minimal usage
//!
//! ```
//! use understory_view_tree::{LocalNode, PointerEvents, Tree};
//! use kurbo::{Affine, Point, Rect, Vec2};
//!
//! let mut tree = Tree::new();
//!
//! let root = tree.insert(
//!     None,
//!     LocalNode { local_bounds: Rect::new(0.0, 0.0, 200.0, 200.0), ..Default::default() },
//! );
//!
//! let child = tree.insert(
//!     Some(root),
//!     LocalNode {
//!         local_bounds: Rect::new(0.0, 0.0, 50.0, 50.0),
//!         local_transform: Affine::translate(Vec2::new(10.0, 10.0)),
//!         pointer_events: PointerEvents::BoxOnly,
//!         ..Default::default()
//!     },
//! );
//!
//! assert_eq!(tree.children(root), &[child]);
//! let to_world = tree.world_transform(child).unwrap();
//! assert_eq!(to_world * Point::ZERO, Point::new(10.0, 10.0));
//!
//! let removed = tree.remove(root);
//! assert_eq!(removed, vec![root, child]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::Tree;
pub use types::{LocalNode, NodeFlags, NodeId, PointerEvents};
