// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: deterministic gesture arbitration over a view tree.
//!
//! Many recognizers may want the same touch sequence: a tap and a pan on one button, a
//! long press that should only fire if a double tap fails, a scroll container around both.
//! This crate decides, for every pointer frame, which handlers see it, in which order, and
//! which of them win.
//!
//! ## Concepts
//!
//! - [`Handler`]: a recognizer plus its lifecycle state
//!   (`Undetermined → Began → Active → End`, or `Failed`/`Cancelled`).
//! - [`Relations`]: declared `wait_for`, `simultaneous_with`, and `blocks` sets.
//! - [`Orchestrator`]: owns handlers, discovers candidates for new pointers, delivers
//!   frames, promotes or parks activating handlers, and cancels losers.
//! - [`ViewHost`](host::ViewHost): read-only access to the host's view hierarchy.
//!
//! ## Arbitration in brief
//!
//! - A handler that activates while it must wait for an unfinished candidate *awaits*.
//! - A promoted handler cancels every candidate that shares a pointer with it, unless the
//!   two may run simultaneously.
//! - When an awaited handler fails, waiters are offered promotion again; when it ends,
//!   waiters are cancelled.
//!
//! Observers drain [`GestureEvent`]s with [`Orchestrator::take_events`].
//!
//! ## Hosts
//!
//! Any tree can be a host by implementing [`host::ViewHost`]. With the
//! `view_tree_adapter` feature (on by default), `understory_view_tree::Tree` is one.
//!
//! ```
//! # #[cfg(feature = "view_tree_adapter")]
//! # {
//! use kurbo::{Affine, Rect, Vec2};
//! use understory_gesture::recognizers::{PanRecognizer, TapRecognizer};
//! use understory_gesture::{Handler, HandlerId, Orchestrator, TouchAction, TouchFrame};
//! use understory_view_tree::{LocalNode, Tree};
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(
//!     None,
//!     LocalNode { local_bounds: Rect::new(0.0, 0.0, 200.0, 200.0), ..Default::default() },
//! );
//! let button = tree.insert(
//!     Some(root),
//!     LocalNode {
//!         local_bounds: Rect::new(0.0, 0.0, 80.0, 40.0),
//!         local_transform: Affine::translate(Vec2::new(20.0, 20.0)),
//!         ..Default::default()
//!     },
//! );
//!
//! let (tap, pan) = (HandlerId(1), HandlerId(2));
//! let mut orch = Orchestrator::new(root);
//! orch.register(Handler::new(tap, TapRecognizer::default())).unwrap();
//! orch.register(Handler::new(pan, PanRecognizer::default())).unwrap();
//! orch.attach(tap, button).unwrap();
//! orch.attach(pan, button).unwrap();
//!
//! // A drag: the tap fails once the finger travels and the pan activates.
//! orch.on_touch_event(&tree, &TouchFrame::single(TouchAction::Down, 30.0, 30.0, 0)).unwrap();
//! orch.on_touch_event(&tree, &TouchFrame::single(TouchAction::Move, 60.0, 30.0, 16)).unwrap();
//! assert!(orch.handler(pan).unwrap().is_active());
//! assert_eq!(orch.candidates(), &[pan]);
//! # }
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod error;
pub mod handler;
pub mod host;
pub mod orchestrator;
pub mod policy;
pub mod recognizer;
pub mod recognizers;
pub mod registry;
pub mod types;

#[cfg(test)]
mod testing;

pub use error::{GestureError, RecognizerFault};
pub use handler::{Handler, HandlerConfig, Relations, Transition};
pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use recognizer::{HandlerContext, Recognize, Recognizer};
pub use types::{
    GestureEvent, GestureState, HandlerId, HitSlop, Pointer, PointerEvents, PointerId,
    TouchAction, TouchFrame,
};
