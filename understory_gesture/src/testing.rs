// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal in-memory [`ViewHost`] for unit tests.

use alloc::vec::Vec;

use kurbo::{Affine, Rect};

use crate::host::ViewHost;
use crate::types::PointerEvents;

#[derive(Clone, Debug)]
pub(crate) struct TestNode {
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
    pub(crate) bounds: Rect,
    pub(crate) transform: Affine,
    pub(crate) pointer_events: PointerEvents,
    pub(crate) clips: bool,
    pub(crate) visible: bool,
    pub(crate) background: bool,
    pub(crate) alive: bool,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct TestHost {
    pub(crate) nodes: Vec<TestNode>,
}

impl TestHost {
    /// A host with a single 100x100 root at id `0`.
    pub(crate) fn new() -> Self {
        let mut host = Self::default();
        host.push(None, Rect::new(0.0, 0.0, 100.0, 100.0));
        host
    }

    /// Append a node; children added later are drawn on top.
    pub(crate) fn push(&mut self, parent: Option<usize>, bounds: Rect) -> usize {
        let id = self.nodes.len();
        self.nodes.push(TestNode {
            parent,
            children: Vec::new(),
            bounds,
            transform: Affine::IDENTITY,
            pointer_events: PointerEvents::Auto,
            clips: true,
            visible: true,
            background: false,
            alive: true,
        });
        if let Some(p) = parent {
            self.nodes[p].children.push(id);
        }
        id
    }

    /// Append a child placed at `(x, y)` in its parent with a local `w`x`h` box.
    pub(crate) fn child_at(&mut self, parent: usize, x: f64, y: f64, w: f64, h: f64) -> usize {
        let id = self.push(Some(parent), Rect::new(0.0, 0.0, w, h));
        self.nodes[id].transform = Affine::translate((x, y));
        id
    }

    /// Detach `id` from its parent and mark it dead.
    pub(crate) fn kill(&mut self, id: usize) {
        if let Some(p) = self.nodes[id].parent.take() {
            self.nodes[p].children.retain(|c| *c != id);
        }
        self.nodes[id].alive = false;
    }
}

impl ViewHost for TestHost {
    type NodeId = usize;

    fn parent(&self, node: usize) -> Option<usize> {
        self.nodes.get(node)?.parent
    }

    fn child_count(&self, node: usize) -> usize {
        self.nodes.get(node).map_or(0, |n| n.children.len())
    }

    fn child_in_drawing_order(&self, node: usize, index: usize) -> Option<usize> {
        self.nodes.get(node)?.children.get(index).copied()
    }

    fn pointer_events(&self, node: usize) -> PointerEvents {
        self.nodes[node].pointer_events
    }

    fn bounds(&self, node: usize) -> Rect {
        self.nodes[node].bounds
    }

    fn transform(&self, node: usize) -> Affine {
        self.nodes[node].transform
    }

    fn clips_children(&self, node: usize) -> bool {
        self.nodes[node].clips
    }

    fn is_visible(&self, node: usize) -> bool {
        self.nodes[node].visible
    }

    fn has_background(&self, node: usize) -> bool {
        self.nodes[node].background
    }

    fn is_alive(&self, node: usize) -> bool {
        self.nodes.get(node).is_some_and(|n| n.alive)
    }
}
