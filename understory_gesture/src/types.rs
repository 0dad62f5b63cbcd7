// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for gesture handling: identities, states, frames, hit slop, and emitted events.
//!
//! ## Overview
//!
//! These types describe the arbitration protocol's inputs and outputs.
//! They are referenced by the [`orchestrator`](crate::orchestrator) and used by hosts and recognizers.

use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect};

use crate::error::GestureError;

/// Host-chosen identity of a handler.
///
/// Ids are supplied at registration time and stay stable until the handler is dropped.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct HandlerId(pub u32);

/// Identity of a pointer (finger, stylus, mouse button) for the lifetime of one contact.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PointerId(pub u32);

/// Lifecycle state of a handler.
///
/// `Undetermined` is the initial state and the target of a reset.
/// `Cancelled`, `Failed`, and `End` are terminal for the current gesture cycle.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum GestureState {
    /// No decision yet; the handler is waiting for its first frame.
    #[default]
    Undetermined,
    /// The handler saw the start of a sequence it may recognize.
    Began,
    /// The handler recognized its gesture (or is awaiting arbitration to do so).
    Active,
    /// The handler was cancelled from outside its own recognition logic.
    Cancelled,
    /// The handler decided the sequence is not its gesture.
    Failed,
    /// The handler recognized its gesture and finished.
    End,
}

impl GestureState {
    /// Returns `true` for `Cancelled`, `Failed`, and `End`.
    #[inline]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Cancelled | Self::Failed | Self::End)
    }
}

/// The kind of change a [`TouchFrame`] reports.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TouchAction {
    /// First pointer of a sequence touched down.
    Down,
    /// An additional pointer touched down.
    PointerDown,
    /// One or more pointers moved.
    Move,
    /// A pointer lifted while others remain down.
    PointerUp,
    /// The last pointer lifted.
    Up,
    /// The platform interrupted the sequence.
    Cancel,
}

impl TouchAction {
    /// Returns `true` for actions that introduce a new pointer.
    #[inline]
    pub const fn adds_pointer(self) -> bool {
        matches!(self, Self::Down | Self::PointerDown)
    }

    /// Returns `true` for actions that remove a pointer.
    #[inline]
    pub const fn removes_pointer(self) -> bool {
        matches!(self, Self::Up | Self::PointerUp)
    }
}

/// A single live pointer within a frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pointer {
    /// Pointer identity.
    pub id: PointerId,
    /// Position in the coordinate space of the frame.
    pub position: Point,
}

impl Pointer {
    /// Create a pointer at `(x, y)`.
    pub fn new(id: u32, x: f64, y: f64) -> Self {
        Self {
            id: PointerId(id),
            position: Point::new(x, y),
        }
    }
}

/// An immutable snapshot of all live pointers plus the action that produced it.
///
/// Frames handed to the orchestrator are in dispatch-root coordinates.
/// Frames handed to recognizers are in the handler's view-local coordinates and
/// only contain the pointers that handler tracks.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchFrame {
    /// What changed.
    pub action: TouchAction,
    /// Pointer that was added or removed; for other actions, the first pointer.
    pub action_pointer: PointerId,
    /// Every pointer currently down, including one being added or removed.
    pub pointers: Vec<Pointer>,
    /// Monotonic timestamp in milliseconds.
    pub time_ms: u64,
}

impl TouchFrame {
    /// Create a frame.
    pub fn new(
        action: TouchAction,
        action_pointer: PointerId,
        pointers: Vec<Pointer>,
        time_ms: u64,
    ) -> Self {
        Self {
            action,
            action_pointer,
            pointers,
            time_ms,
        }
    }

    /// Single-pointer frame for pointer `0`, the common case in tests and demos.
    pub fn single(action: TouchAction, x: f64, y: f64, time_ms: u64) -> Self {
        Self::new(
            action,
            PointerId(0),
            alloc::vec![Pointer::new(0, x, y)],
            time_ms,
        )
    }

    /// The pointer with the given id, if present.
    pub fn pointer(&self, id: PointerId) -> Option<&Pointer> {
        self.pointers.iter().find(|p| p.id == id)
    }

    /// Position of the pointer named by [`action_pointer`](Self::action_pointer).
    pub fn action_position(&self) -> Option<Point> {
        self.pointer(self.action_pointer).map(|p| p.position)
    }

    /// Average position of all pointers, or `None` for an empty frame.
    pub fn centroid(&self) -> Option<Point> {
        if self.pointers.is_empty() {
            return None;
        }
        let (sx, sy) = self
            .pointers
            .iter()
            .fold((0.0, 0.0), |(x, y), p| (x + p.position.x, y + p.position.y));
        let n = self.pointers.len() as f64;
        Some(Point::new(sx / n, sy / n))
    }

    /// Copy of this frame with every position mapped through `tf`.
    pub fn transformed(&self, tf: Affine) -> Self {
        Self {
            action: self.action,
            action_pointer: self.action_pointer,
            pointers: self
                .pointers
                .iter()
                .map(|p| Pointer {
                    id: p.id,
                    position: tf * p.position,
                })
                .collect(),
            time_ms: self.time_ms,
        }
    }
}

/// How a node takes part in touch targeting, as reported by a [`ViewHost`](crate::host::ViewHost).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum PointerEvents {
    /// The node and its descendants are both considered; descendants first.
    #[default]
    Auto,
    /// Neither the node nor its descendants are considered.
    None,
    /// Only the node itself is considered.
    BoxOnly,
    /// Only the descendants are considered.
    BoxNone,
}

/// Per-edge extension of a handler's hit area.
///
/// Edges push the corresponding side of the view bounds outward.
/// `width`/`height` give the hit area a fixed extent anchored to whichever
/// horizontal/vertical edge is set.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HitSlop {
    /// Extension past the left edge.
    pub left: Option<f64>,
    /// Extension past the top edge.
    pub top: Option<f64>,
    /// Extension past the right edge.
    pub right: Option<f64>,
    /// Extension past the bottom edge.
    pub bottom: Option<f64>,
    /// Fixed width anchored to the set horizontal edge.
    pub width: Option<f64>,
    /// Fixed height anchored to the set vertical edge.
    pub height: Option<f64>,
}

impl HitSlop {
    /// Extend every edge by `pad`.
    pub fn uniform(pad: f64) -> Self {
        Self {
            left: Some(pad),
            top: Some(pad),
            right: Some(pad),
            bottom: Some(pad),
            width: None,
            height: None,
        }
    }

    /// Reject combinations that over- or under-determine an axis.
    pub fn validate(&self) -> Result<(), GestureError> {
        if self.width.is_some() && self.left.is_some() && self.right.is_some() {
            return Err(GestureError::InvalidHitSlop(
                "cannot set left, right, and width together",
            ));
        }
        if self.width.is_some() && self.left.is_none() && self.right.is_none() {
            return Err(GestureError::InvalidHitSlop(
                "width requires left or right to be set",
            ));
        }
        if self.height.is_some() && self.top.is_some() && self.bottom.is_some() {
            return Err(GestureError::InvalidHitSlop(
                "cannot set top, bottom, and height together",
            ));
        }
        if self.height.is_some() && self.top.is_none() && self.bottom.is_none() {
            return Err(GestureError::InvalidHitSlop(
                "height requires top or bottom to be set",
            ));
        }
        Ok(())
    }

    /// The hit area for a view with local `bounds`.
    pub fn apply(&self, bounds: Rect) -> Rect {
        let mut r = bounds.abs();
        if let Some(l) = self.left {
            r.x0 -= l;
        }
        if let Some(t) = self.top {
            r.y0 -= t;
        }
        if let Some(rt) = self.right {
            r.x1 += rt;
        }
        if let Some(b) = self.bottom {
            r.y1 += b;
        }
        if let Some(w) = self.width {
            if self.left.is_none() {
                r.x0 = r.x1 - w;
            } else if self.right.is_none() {
                r.x1 = r.x0 + w;
            }
        }
        if let Some(h) = self.height {
            if self.top.is_none() {
                r.y0 = r.y1 - h;
            } else if self.bottom.is_none() {
                r.y1 = r.y0 + h;
            }
        }
        r
    }
}

/// Inclusive point-in-rect test; points on the far edges count as inside.
#[inline]
pub(crate) fn contains_inclusive(rect: Rect, pt: Point) -> bool {
    let r = rect.abs();
    pt.x >= r.x0 && pt.x <= r.x1 && pt.y >= r.y0 && pt.y <= r.y1
}

/// A notification emitted for observers (for example a bridge to a scripting host).
///
/// Drained with [`Orchestrator::take_events`](crate::orchestrator::Orchestrator::take_events).
#[derive(Clone, Debug, PartialEq)]
pub enum GestureEvent {
    /// A handler changed state as seen by observers.
    StateChange {
        /// Handler whose state changed.
        handler: HandlerId,
        /// New state.
        state: GestureState,
        /// Previous state.
        prev: GestureState,
    },
    /// A promoted handler processed a frame.
    Update {
        /// Handler that processed the frame.
        handler: HandlerId,
        /// The frame in the handler's view-local coordinates.
        frame: TouchFrame,
    },
}
