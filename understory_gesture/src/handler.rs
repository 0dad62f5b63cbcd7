// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handlers: a recognizer plus its lifecycle state and per-cycle bookkeeping.
//!
//! ## Lifecycle
//!
//! ```text
//! Undetermined ─begin─▶ Began ─activate─▶ Active ─end─▶ End
//!      │                  │                  │
//!      └──── fail / cancel / end ────────────┴──▶ Failed / Cancelled / End
//! ```
//!
//! Transitions requested from a terminal state are dropped. A handler returns to
//! `Undetermined` only through [`Handler::reset`], which the orchestrator runs when
//! it compacts finished handlers out of the candidate set.
//!
//! ## Flags
//!
//! `is_active` and `is_awaiting` are owned by the orchestrator. At most one of them
//! is set, and neither is set on a finished handler unless it still awaits.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect};

use crate::recognizer::{Recognize, Recognizer};
use crate::types::{
    GestureState, HandlerId, HitSlop, PointerId, TouchAction, TouchFrame, contains_inclusive,
};

/// Per-handler configuration that survives resets.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HandlerConfig {
    /// Disabled handlers are never discovered as candidates.
    pub enabled: bool,
    /// Extension of the view bounds used for hit testing.
    pub hit_slop: HitSlop,
    /// Only forced activation moves the handler to `Active`.
    pub manual_activation: bool,
    /// Frames whose primary pointer leaves the hit area end the gesture.
    pub cancel_when_outside: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hit_slop: HitSlop::default(),
            manual_activation: false,
            cancel_when_outside: false,
        }
    }
}

/// Declared relations of a handler to other handlers.
///
/// Relations are directed. The [`policy`](crate::policy) evaluates them in both
/// directions where that is meaningful.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Relations {
    /// This handler waits for each of these to fail before activating.
    pub wait_for: Vec<HandlerId>,
    /// This handler may be active at the same time as each of these.
    pub simultaneous_with: Vec<HandlerId>,
    /// Each of these waits for this handler to fail before activating.
    pub blocks: Vec<HandlerId>,
}

impl Relations {
    /// Add a handler to wait for.
    pub fn wait_for(mut self, other: HandlerId) -> Self {
        self.wait_for.push(other);
        self
    }

    /// Add a handler that may run simultaneously.
    pub fn simultaneous_with(mut self, other: HandlerId) -> Self {
        self.simultaneous_with.push(other);
        self
    }

    /// Add a handler that must wait for this one.
    pub fn blocks(mut self, other: HandlerId) -> Self {
        self.blocks.push(other);
        self
    }
}

/// A requested state transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// `Undetermined → Began`.
    Begin,
    /// `Undetermined | Began → Active`. `force` bypasses manual activation and wait-for.
    Activate {
        /// Skip manual-activation gating and the wait-for step of arbitration.
        force: bool,
    },
    /// `Undetermined | Began | Active → Failed`.
    Fail,
    /// `Undetermined | Began | Active → Cancelled`.
    Cancel,
    /// `Undetermined | Began | Active → End`.
    End,
}

impl Transition {
    /// The state this transition leads to from `from`, or `None` if it is not allowed.
    pub fn target(self, from: GestureState, manual_activation: bool) -> Option<GestureState> {
        use GestureState::*;
        let live = matches!(from, Undetermined | Began | Active);
        match self {
            Self::Begin => (from == Undetermined).then_some(Began),
            Self::Activate { force } => ((force || !manual_activation)
                && matches!(from, Undetermined | Began))
            .then_some(Active),
            Self::Fail => live.then_some(Failed),
            Self::Cancel => live.then_some(Cancelled),
            Self::End => live.then_some(End),
        }
    }
}

/// A registered gesture handler.
pub struct Handler<K> {
    id: HandlerId,
    pub(crate) recognizer: Recognizer,
    pub(crate) config: HandlerConfig,
    pub(crate) relations: Relations,
    pub(crate) view: Option<K>,
    pub(crate) state: GestureState,
    pub(crate) is_active: bool,
    pub(crate) is_awaiting: bool,
    pub(crate) activation_index: Option<u64>,
    pub(crate) tracked: Vec<PointerId>,
    pub(crate) timer: Option<u64>,
    pub(crate) force_activation: bool,
    pub(crate) reset_progress: bool,
}

impl<K: fmt::Debug> fmt::Debug for Handler<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("is_active", &self.is_active)
            .field("is_awaiting", &self.is_awaiting)
            .field("activation_index", &self.activation_index)
            .field("view", &self.view)
            .field("tracked", &self.tracked)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

impl<K> Handler<K> {
    /// Create an unbound handler in `Undetermined`.
    pub fn new(id: HandlerId, recognizer: impl Into<Recognizer>) -> Self {
        Self {
            id,
            recognizer: recognizer.into(),
            config: HandlerConfig::default(),
            relations: Relations::default(),
            view: None,
            state: GestureState::Undetermined,
            is_active: false,
            is_awaiting: false,
            activation_index: None,
            tracked: Vec::new(),
            timer: None,
            force_activation: false,
            reset_progress: false,
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: HandlerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the declared relations.
    pub fn with_relations(mut self, relations: Relations) -> Self {
        self.relations = relations;
        self
    }

    /// Handler id.
    pub fn id(&self) -> HandlerId {
        self.id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Whether arbitration promoted this handler.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Whether this handler wants to activate but waits on another.
    pub fn is_awaiting(&self) -> bool {
        self.is_awaiting
    }

    /// Order of the most recent promotion or await, if any in this cycle.
    pub fn activation_index(&self) -> Option<u64> {
        self.activation_index
    }

    /// Configuration.
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Declared relations.
    pub fn relations(&self) -> &Relations {
        &self.relations
    }

    /// The recognizer.
    pub fn recognizer(&self) -> &Recognizer {
        &self.recognizer
    }

    /// Bound view, if attached.
    pub fn view(&self) -> Option<&K> {
        self.view.as_ref()
    }

    /// Pointers tracked this cycle.
    pub fn tracked_pointers(&self) -> &[PointerId] {
        &self.tracked
    }

    /// Pending timer deadline.
    pub fn timer_deadline(&self) -> Option<u64> {
        self.timer
    }

    pub(crate) fn start_tracking(&mut self, pointer: PointerId) {
        if !self.tracked.contains(&pointer) {
            self.tracked.push(pointer);
        }
    }

    pub(crate) fn stop_tracking(&mut self, pointer: PointerId) {
        self.tracked.retain(|p| *p != pointer);
    }

    /// Whether `pointer` is tracked this cycle.
    pub fn is_tracking(&self, pointer: PointerId) -> bool {
        self.tracked.contains(&pointer)
    }

    pub(crate) fn shares_pointer_with(&self, other: &Self) -> bool {
        self.tracked.iter().any(|p| other.tracked.contains(p))
    }

    /// Whether `frame` should reach the recognizer.
    pub(crate) fn wants_frame(&self, frame: &TouchFrame) -> bool {
        self.config.enabled
            && !self.state.is_finished()
            && frame.pointers.iter().any(|p| self.is_tracking(p.id))
    }

    /// Return to `Undetermined`, clearing every per-cycle field.
    pub(crate) fn reset(&mut self) {
        self.state = GestureState::Undetermined;
        self.is_active = false;
        self.is_awaiting = false;
        self.activation_index = None;
        self.tracked.clear();
        self.timer = None;
        self.force_activation = false;
        self.reset_progress = false;
        self.recognizer.on_reset();
    }

    /// Restrict `frame` to tracked pointers and rename its action accordingly.
    ///
    /// Returns `None` when none of the frame's pointers are tracked.
    pub(crate) fn adapt_frame(&self, frame: &TouchFrame) -> Option<TouchFrame> {
        let pointers: Vec<_> = frame
            .pointers
            .iter()
            .filter(|p| self.is_tracking(p.id))
            .copied()
            .collect();
        let first = pointers.first()?.id;
        let action_tracked = self.is_tracking(frame.action_pointer);
        let only = self.tracked.len() == 1;
        let (action, action_pointer) = match frame.action {
            TouchAction::Down | TouchAction::PointerDown if action_tracked => (
                if only {
                    TouchAction::Down
                } else {
                    TouchAction::PointerDown
                },
                frame.action_pointer,
            ),
            TouchAction::Up | TouchAction::PointerUp if action_tracked => (
                if only {
                    TouchAction::Up
                } else {
                    TouchAction::PointerUp
                },
                frame.action_pointer,
            ),
            TouchAction::Down
            | TouchAction::PointerDown
            | TouchAction::Up
            | TouchAction::PointerUp => (TouchAction::Move, first),
            TouchAction::Move | TouchAction::Cancel => {
                let ap = if action_tracked {
                    frame.action_pointer
                } else {
                    first
                };
                (frame.action, ap)
            }
        };
        Some(TouchFrame {
            action,
            action_pointer,
            pointers,
            time_ms: frame.time_ms,
        })
    }

    /// Whether `pt` (view-local) lies inside the slop-adjusted `bounds`.
    pub(crate) fn is_within_bounds(&self, bounds: Rect, pt: Point) -> bool {
        contains_inclusive(self.config.hit_slop.apply(bounds), pt)
    }

    /// Whether `other`'s failure is awaited, per this handler's relations and hooks.
    pub(crate) fn declares_wait_for(&self, other: HandlerId) -> bool {
        self.relations.wait_for.contains(&other) || self.recognizer.should_wait_for_failure(other)
    }
}
