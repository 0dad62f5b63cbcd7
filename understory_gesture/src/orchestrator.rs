// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The orchestrator: candidate discovery, dispatch ordering, and arbitration.
//!
//! ## Overview
//!
//! The orchestrator owns every registered [`Handler`] and two ordered id lists:
//!
//! - candidates: handlers taking part in the current touch sequence, in discovery order;
//! - awaiting: candidates that want to activate but wait on another handler.
//!
//! Each call to [`Orchestrator::on_touch_event`]:
//!
//! 1. fires timers that are due at the frame's time;
//! 2. on `Down`/`PointerDown`, extends the candidate set through hit testing;
//!    on `Cancel`, cancels every candidate;
//! 3. delivers the frame to a snapshot of the candidates, promoted handlers first
//!    (earliest promotion first), then awaiting ones, then the rest in discovery order;
//! 4. compacts finished handlers out of the candidate set.
//!
//! ## Arbitration
//!
//! A handler that reaches `Active` is promoted unless an unfinished candidate must
//! be waited for, in which case it awaits. Promotion cancels every candidate that
//! shares a pointer with it and may not run simultaneously. When an awaited handler
//! finishes, the handlers waiting on it are cancelled (if it ended) or offered
//! promotion again (if it failed or was cancelled).
//!
//! State changes are applied immediately and may cascade. Compaction is deferred
//! until the outermost call unwinds, so the candidate list is never reshaped
//! under an iteration.
//!
//! ## Minimal usage
//!
//! ```
//! use understory_gesture::host::ViewHost;
//! use understory_gesture::recognizers::TapRecognizer;
//! use understory_gesture::{
//!     GestureEvent, GestureState, Handler, HandlerId, Orchestrator, PointerEvents, TouchAction,
//!     TouchFrame,
//! };
//! use kurbo::{Affine, Rect};
//!
//! // A single 100x100 view.
//! struct OneView;
//! impl ViewHost for OneView {
//!     type NodeId = u32;
//!     fn parent(&self, _: u32) -> Option<u32> { None }
//!     fn child_count(&self, _: u32) -> usize { 0 }
//!     fn child_in_drawing_order(&self, _: u32, _: usize) -> Option<u32> { None }
//!     fn pointer_events(&self, _: u32) -> PointerEvents { PointerEvents::Auto }
//!     fn bounds(&self, _: u32) -> Rect { Rect::new(0.0, 0.0, 100.0, 100.0) }
//!     fn transform(&self, _: u32) -> Affine { Affine::IDENTITY }
//!     fn clips_children(&self, _: u32) -> bool { true }
//!     fn is_alive(&self, node: u32) -> bool { node == 0 }
//! }
//!
//! let mut orch = Orchestrator::new(0_u32);
//! orch.register(Handler::new(HandlerId(1), TapRecognizer::default())).unwrap();
//! orch.attach(HandlerId(1), 0).unwrap();
//!
//! orch.on_touch_event(&OneView, &TouchFrame::single(TouchAction::Down, 10.0, 10.0, 0)).unwrap();
//! orch.on_touch_event(&OneView, &TouchFrame::single(TouchAction::Up, 11.0, 10.0, 40)).unwrap();
//!
//! let states: Vec<_> = orch
//!     .take_events()
//!     .into_iter()
//!     .filter_map(|e| match e {
//!         GestureEvent::StateChange { state, .. } => Some(state),
//!         _ => None,
//!     })
//!     .collect();
//! assert_eq!(states, [GestureState::Began, GestureState::Active, GestureState::End]);
//! assert!(orch.candidates().is_empty());
//! ```

use alloc::vec::Vec;
use core::fmt::Debug;
use core::mem;

use kurbo::Rect;
use tracing::{debug, trace, warn};

use crate::error::GestureError;
use crate::handler::{Handler, Relations, Transition};
use crate::hit_test;
use crate::host::{ViewHost, is_attached_under, root_to_local};
use crate::policy;
use crate::recognizer::{HandlerContext, Recognize, TimerRequest};
use crate::registry::Registry;
use crate::types::{GestureEvent, GestureState, HandlerId, TouchAction, TouchFrame};

/// Orchestrator configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Largest candidate set tolerated before discovery reports
    /// [`GestureError::CapacityExceeded`].
    pub max_candidates: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self { max_candidates: 64 }
    }
}

/// Gesture arbitration for one dispatch root.
#[derive(Debug)]
pub struct Orchestrator<K> {
    root: K,
    config: OrchestratorConfig,
    registry: Registry<K>,
    candidates: Vec<HandlerId>,
    awaiting: Vec<HandlerId>,
    next_activation_index: u64,
    depth: u32,
    cleanup_scheduled: bool,
    now_ms: u64,
    events: Vec<GestureEvent>,
}

impl<K: Copy + Ord + Debug> Orchestrator<K> {
    /// Create an orchestrator dispatching under `root` with default configuration.
    pub fn new(root: K) -> Self {
        Self::with_config(root, OrchestratorConfig::default())
    }

    /// Create an orchestrator with explicit configuration.
    pub fn with_config(root: K, config: OrchestratorConfig) -> Self {
        Self {
            root,
            config,
            registry: Registry::new(),
            candidates: Vec::new(),
            awaiting: Vec::new(),
            next_activation_index: 0,
            depth: 0,
            cleanup_scheduled: false,
            now_ms: 0,
            events: Vec::new(),
        }
    }

    /// The dispatch root.
    pub fn root(&self) -> K {
        self.root
    }

    /// Configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Handler storage.
    pub fn registry(&self) -> &Registry<K> {
        &self.registry
    }

    /// Latest time seen, from frames or [`advance_time`](Self::advance_time).
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    // --- Registry management ---

    /// Register a handler.
    pub fn register(&mut self, handler: Handler<K>) -> Result<(), GestureError> {
        let id = handler.id();
        self.registry.register(handler)?;
        debug!(handler = ?id, "registered handler");
        Ok(())
    }

    /// Bind a handler to a view.
    pub fn attach(&mut self, id: HandlerId, view: K) -> Result<(), GestureError> {
        self.registry.attach(id, view)?;
        debug!(handler = ?id, view = ?view, "attached handler");
        Ok(())
    }

    /// Replace a handler's declared relations.
    pub fn set_relations(&mut self, id: HandlerId, relations: Relations) -> Result<(), GestureError> {
        let handler = self
            .registry
            .get_mut(id)
            .ok_or(GestureError::UnknownHandler(id))?;
        handler.relations = relations;
        Ok(())
    }

    /// Enable or disable a handler.
    ///
    /// Disabling a handler that takes part in the current sequence cancels it.
    /// Setting the current value again does nothing.
    pub fn set_enabled(&mut self, id: HandlerId, enabled: bool) -> Result<(), GestureError> {
        let handler = self
            .registry
            .get_mut(id)
            .ok_or(GestureError::UnknownHandler(id))?;
        if handler.config.enabled == enabled {
            return Ok(());
        }
        handler.config.enabled = enabled;
        if !enabled && self.candidates.contains(&id) {
            self.depth += 1;
            self.cancel_and_release(id);
            self.depth -= 1;
            self.finish_pass();
        }
        Ok(())
    }

    /// Unregister a handler, cancelling it first if it is a candidate.
    ///
    /// Returns the handler, reset. Unknown ids return `None`.
    pub fn drop_handler(&mut self, id: HandlerId) -> Option<Handler<K>> {
        self.registry.get(id)?;
        self.depth += 1;
        if self.candidates.contains(&id) {
            self.cancel_and_release(id);
        }
        self.candidates.retain(|c| *c != id);
        self.awaiting.retain(|a| *a != id);
        let mut handler = self.registry.remove(id);
        self.depth -= 1;
        self.finish_pass();
        if let Some(h) = handler.as_mut() {
            h.reset();
        }
        debug!(handler = ?id, "dropped handler");
        handler
    }

    /// The host removed `view`: cancel and unbind every handler attached to it.
    pub fn view_removed(&mut self, view: K) {
        let ids = self.registry.remove_view(view);
        if ids.is_empty() {
            return;
        }
        debug!(view = ?view, handlers = ids.len(), "view removed");
        self.depth += 1;
        for id in ids {
            if let Some(h) = self.registry.get_mut(id) {
                h.timer = None;
            }
            if self.candidates.contains(&id) {
                self.cancel_and_release(id);
            }
        }
        self.depth -= 1;
        self.finish_pass();
    }

    // --- Introspection ---

    /// Handler `id`, if registered.
    pub fn handler(&self, id: HandlerId) -> Option<&Handler<K>> {
        self.registry.get(id)
    }

    /// Candidates in discovery order.
    pub fn candidates(&self) -> &[HandlerId] {
        &self.candidates
    }

    /// Awaiting handlers in the order they started waiting.
    pub fn awaiting(&self) -> &[HandlerId] {
        &self.awaiting
    }

    /// Whether any candidate is in `Active`.
    pub fn is_any_handler_active(&self) -> bool {
        self.candidates.iter().any(|id| {
            self.registry
                .get(*id)
                .is_some_and(|h| h.state == GestureState::Active)
        })
    }

    /// Drain the notifications emitted since the last call.
    pub fn take_events(&mut self) -> Vec<GestureEvent> {
        mem::take(&mut self.events)
    }

    // --- Programmatic transitions ---

    /// `Undetermined → Began` for a candidate.
    pub fn begin(&mut self, id: HandlerId) {
        self.transition(id, Transition::Begin);
    }

    /// Activate a candidate. `force` skips manual-activation gating and waiting.
    pub fn activate(&mut self, id: HandlerId, force: bool) {
        self.transition(id, Transition::Activate { force });
    }

    /// Fail a candidate.
    pub fn fail(&mut self, id: HandlerId) {
        self.transition(id, Transition::Fail);
    }

    /// Cancel a candidate.
    pub fn cancel(&mut self, id: HandlerId) {
        self.transition(id, Transition::Cancel);
    }

    /// End a candidate.
    pub fn end(&mut self, id: HandlerId) {
        self.transition(id, Transition::End);
    }

    fn transition(&mut self, id: HandlerId, t: Transition) {
        if !self.candidates.contains(&id) {
            return;
        }
        self.depth += 1;
        self.apply(id, t);
        self.depth -= 1;
        self.finish_pass();
    }

    // --- Input ---

    /// Process one frame in root coordinates.
    ///
    /// Returns whether any handler took part in the sequence for this frame.
    pub fn on_touch_event<H>(&mut self, host: &H, frame: &TouchFrame) -> Result<bool, GestureError>
    where
        H: ViewHost<NodeId = K> + ?Sized,
    {
        trace!(
            action = ?frame.action,
            pointers = frame.pointers.len(),
            candidates = self.candidates.len(),
            "touch frame"
        );
        self.now_ms = self.now_ms.max(frame.time_ms);
        self.depth += 1;
        let handled = self.dispatch(host, frame);
        self.depth -= 1;
        self.finish_pass();
        handled
    }

    /// Advance the clock and fire every timer due at `now_ms`.
    ///
    /// Candidates whose view has left `host`'s tree are cancelled first, so
    /// their timers never fire.
    pub fn advance_time<H>(&mut self, host: &H, now_ms: u64)
    where
        H: ViewHost<NodeId = K> + ?Sized,
    {
        self.now_ms = self.now_ms.max(now_ms);
        self.depth += 1;
        self.cancel_detached(host);
        self.fire_timers();
        self.depth -= 1;
        self.finish_pass();
    }

    fn dispatch<H>(&mut self, host: &H, frame: &TouchFrame) -> Result<bool, GestureError>
    where
        H: ViewHost<NodeId = K> + ?Sized,
    {
        self.cancel_detached(host);
        self.fire_timers();
        match frame.action {
            TouchAction::Down | TouchAction::PointerDown => self.extract(host, frame)?,
            TouchAction::Cancel => self.cancel_all(),
            TouchAction::Move | TouchAction::PointerUp | TouchAction::Up => {}
        }
        let handled = !self.candidates.is_empty();
        for id in self.dispatch_order() {
            self.deliver(host, id, frame);
        }
        Ok(handled)
    }

    fn extract<H>(&mut self, host: &H, frame: &TouchFrame) -> Result<(), GestureError>
    where
        H: ViewHost<NodeId = K> + ?Sized,
    {
        let Some(pos) = frame.action_position() else {
            return Ok(());
        };
        let found = hit_test::discover(host, &self.registry, self.root, pos);
        trace!(pointer = ?frame.action_pointer, found = found.len(), "hit test");
        for id in found {
            let Some(h) = self.registry.get_mut(id) else {
                continue;
            };
            if !self.candidates.contains(&id) {
                if self.candidates.len() >= self.config.max_candidates {
                    return Err(GestureError::CapacityExceeded {
                        limit: self.config.max_candidates,
                    });
                }
                h.is_active = false;
                h.is_awaiting = false;
                h.activation_index = None;
                self.candidates.push(id);
            }
            h.start_tracking(frame.action_pointer);
        }
        Ok(())
    }

    /// Cancel candidates whose view is dead or no longer under the root.
    fn cancel_detached<H>(&mut self, host: &H)
    where
        H: ViewHost<NodeId = K> + ?Sized,
    {
        let detached: Vec<HandlerId> = self
            .candidates
            .iter()
            .copied()
            .filter(|id| {
                self.registry.get(*id).is_some_and(|h| {
                    (!h.state.is_finished() || h.is_awaiting)
                        && !h.view.is_some_and(|v| is_attached_under(host, self.root, v))
                })
            })
            .collect();
        for id in detached {
            warn!(handler = ?id, "handler view is no longer reachable; cancelling");
            self.cancel_and_release(id);
        }
    }

    /// Candidates ordered for delivery: promoted, then awaiting, then the rest.
    fn dispatch_order(&self) -> Vec<HandlerId> {
        let mut order = self.candidates.clone();
        order.sort_by_key(|id| match self.registry.get(*id) {
            Some(h) if h.is_active => (0_u8, h.activation_index.unwrap_or(u64::MAX)),
            Some(h) if h.is_awaiting => (1, h.activation_index.unwrap_or(u64::MAX)),
            _ => (2, 0),
        });
        order
    }

    fn deliver<H>(&mut self, host: &H, id: HandlerId, frame: &TouchFrame)
    where
        H: ViewHost<NodeId = K> + ?Sized,
    {
        let Some(h) = self.registry.get(id) else {
            return;
        };
        let placement = h
            .view
            .filter(|v| is_attached_under(host, self.root, *v))
            .and_then(|v| Some((host.bounds(v), root_to_local(host, self.root, v)?)));
        let Some((bounds, to_local)) = placement else {
            if !h.state.is_finished() {
                warn!(handler = ?id, "handler view is no longer reachable; cancelling");
                self.apply(id, Transition::Cancel);
            }
            return;
        };
        if !h.wants_frame(frame) {
            return;
        }
        if h.is_awaiting && frame.action == TouchAction::Move {
            return;
        }
        let Some(local) = h.adapt_frame(&frame.transformed(to_local)) else {
            return;
        };
        trace!(handler = ?id, action = ?local.action, "deliver");

        self.handle(id, &local, bounds);

        let Some(h) = self.registry.get_mut(id) else {
            return;
        };
        let promoted = h.is_active;
        if promoted && mem::take(&mut h.reset_progress) {
            h.recognizer.reset_progress();
        }
        if frame.action.removes_pointer() {
            h.stop_tracking(frame.action_pointer);
        }
        if promoted {
            self.events.push(GestureEvent::Update {
                handler: id,
                frame: local,
            });
        }
    }

    fn handle(&mut self, id: HandlerId, frame: &TouchFrame, bounds: Rect) {
        let Some(h) = self.registry.get_mut(id) else {
            return;
        };
        if h.config.cancel_when_outside {
            let inside = frame
                .action_position()
                .or_else(|| frame.pointers.first().map(|p| p.position))
                .is_some_and(|pt| h.is_within_bounds(bounds, pt));
            if !inside {
                let state = h.state;
                match state {
                    GestureState::Active => self.apply(id, Transition::Cancel),
                    GestureState::Began => self.apply(id, Transition::Fail),
                    _ => {}
                }
                return;
            }
        }
        let mut ctx = HandlerContext::new(h.state, frame.time_ms, h.config.manual_activation);
        let outcome = h.recognizer.on_handle(frame, &mut ctx);
        match outcome {
            Ok(()) => self.apply_context(id, ctx),
            Err(fault) => {
                warn!(handler = ?id, %fault, "recognizer fault; failing handler");
                self.apply(id, Transition::Fail);
            }
        }
    }

    fn fire_timers(&mut self) {
        let now = self.now_ms;
        let due: Vec<HandlerId> = self
            .candidates
            .iter()
            .copied()
            .filter(|id| {
                self.registry
                    .get(*id)
                    .is_some_and(|h| h.timer.is_some_and(|d| d <= now))
            })
            .collect();
        for id in due {
            let Some(h) = self.registry.get_mut(id) else {
                continue;
            };
            if !h.timer.is_some_and(|d| d <= now) {
                continue;
            }
            h.timer = None;
            if h.state.is_finished() {
                continue;
            }
            trace!(handler = ?id, now, "timer fired");
            let mut ctx = HandlerContext::new(h.state, now, h.config.manual_activation);
            let outcome = h.recognizer.on_timer(&mut ctx);
            match outcome {
                Ok(()) => self.apply_context(id, ctx),
                Err(fault) => {
                    warn!(handler = ?id, %fault, "recognizer fault in timer; failing handler");
                    self.apply(id, Transition::Fail);
                }
            }
        }
    }

    fn apply_context(&mut self, id: HandlerId, ctx: HandlerContext) {
        if let Some(h) = self.registry.get_mut(id) {
            match ctx.timer {
                TimerRequest::Keep => {}
                TimerRequest::Schedule(deadline) => h.timer = Some(deadline),
                TimerRequest::Cancel => h.timer = None,
            }
        }
        for t in ctx.transitions {
            self.apply(id, t);
        }
    }

    // --- State machine ---

    /// Apply `t` if it is allowed from the handler's current state.
    fn apply(&mut self, id: HandlerId, t: Transition) {
        let Some(h) = self.registry.get_mut(id) else {
            return;
        };
        let Some(next) = t.target(h.state, h.config.manual_activation) else {
            return;
        };
        match t {
            Transition::Activate { force: true } => h.force_activation = true,
            Transition::Cancel => h.recognizer.on_cancel(),
            _ => {}
        }
        self.move_to_state(id, next);
    }

    fn move_to_state(&mut self, id: HandlerId, new: GestureState) {
        let Some(h) = self.registry.get_mut(id) else {
            return;
        };
        let prev = h.state;
        if prev == new {
            return;
        }
        h.state = new;
        if new.is_finished() {
            h.timer = None;
            if new != GestureState::End && h.is_awaiting {
                h.is_awaiting = false;
                self.awaiting.retain(|a| *a != id);
            }
        }
        self.on_state_change(id, new, prev);
    }

    fn on_state_change(&mut self, id: HandlerId, new: GestureState, prev: GestureState) {
        self.depth += 1;
        if new.is_finished() {
            let waiting: Vec<HandlerId> = self
                .awaiting
                .iter()
                .copied()
                .filter(|w| self.waits_for(*w, id))
                .collect();
            for w in waiting {
                if !self.registry.get(w).is_some_and(|h| h.is_awaiting) {
                    continue;
                }
                if new == GestureState::End {
                    debug!(handler = ?w, ended = ?id, "awaited handler ended; cancelling");
                    self.cancel_and_release(w);
                } else {
                    self.try_activate(w);
                }
            }
            self.compact_awaiting();
        }

        let is_active = self.registry.get(id).is_some_and(|h| h.is_active);
        if new == GestureState::Active {
            self.try_activate(id);
        } else if matches!(prev, GestureState::Active | GestureState::End) {
            if is_active {
                self.emit(id, new, prev);
            } else if prev == GestureState::Active
                && matches!(new, GestureState::Cancelled | GestureState::Failed)
            {
                self.emit(id, new, GestureState::Began);
            }
        } else if !(prev == GestureState::Undetermined && new == GestureState::Cancelled) {
            self.emit(id, new, prev);
        }
        self.depth -= 1;
        self.schedule_cleanup();
    }

    fn try_activate(&mut self, id: HandlerId) {
        let forced = match self.registry.get_mut(id) {
            Some(h) => mem::take(&mut h.force_activation),
            None => return,
        };
        if !forced && self.has_other_to_wait_for(id) {
            self.add_awaiting(id);
        } else {
            self.make_active(id);
        }
    }

    fn has_other_to_wait_for(&self, id: HandlerId) -> bool {
        let Some(h) = self.registry.get(id) else {
            return false;
        };
        self.candidates.iter().any(|c| {
            self.registry
                .get(*c)
                .is_some_and(|o| !o.state.is_finished() && policy::should_wait_for_other(h, o))
        })
    }

    fn add_awaiting(&mut self, id: HandlerId) {
        if self.awaiting.contains(&id) {
            return;
        }
        let index = self.bump_index();
        if let Some(h) = self.registry.get_mut(id) {
            h.is_awaiting = true;
            h.activation_index = Some(index);
        }
        self.awaiting.push(id);
        debug!(handler = ?id, index, "handler awaiting");
    }

    fn make_active(&mut self, id: HandlerId) {
        let index = self.bump_index();
        let current = match self.registry.get_mut(id) {
            Some(h) => {
                h.is_awaiting = false;
                h.is_active = true;
                h.reset_progress = true;
                h.activation_index = Some(index);
                h.state
            }
            None => return,
        };
        self.awaiting.retain(|a| *a != id);
        debug!(handler = ?id, index, "handler promoted");

        let doomed: Vec<HandlerId> = self
            .candidates
            .iter()
            .rev()
            .copied()
            .filter(|c| {
                self.state_of(*c).is_some_and(|s| !s.is_finished()) && self.cancelled_by(*c, id)
            })
            .collect();
        for c in doomed {
            debug!(handler = ?c, by = ?id, "cancelled by promotion");
            self.apply(c, Transition::Cancel);
        }

        let doomed: Vec<HandlerId> = self
            .awaiting
            .iter()
            .rev()
            .copied()
            .filter(|w| self.cancelled_by(*w, id))
            .collect();
        for w in doomed {
            self.cancel_and_release(w);
        }

        self.emit(id, GestureState::Active, GestureState::Began);
        if current != GestureState::Active {
            self.emit(id, GestureState::End, GestureState::Active);
            if current != GestureState::End {
                self.emit(id, GestureState::Undetermined, GestureState::End);
            }
        }
    }

    fn cancel_all(&mut self) {
        debug!(
            candidates = self.candidates.len(),
            awaiting = self.awaiting.len(),
            "cancelling all handlers"
        );
        let awaiting: Vec<HandlerId> = self.awaiting.iter().rev().copied().collect();
        for w in awaiting {
            self.cancel_and_release(w);
        }
        let candidates: Vec<HandlerId> = self.candidates.iter().rev().copied().collect();
        for c in candidates {
            self.apply(c, Transition::Cancel);
        }
    }

    /// Cancel `id` and make sure it no longer awaits.
    ///
    /// A handler that already reached `End` while awaiting cannot be cancelled;
    /// observers are told it was cancelled from `Began`, which is all they saw.
    fn cancel_and_release(&mut self, id: HandlerId) {
        self.apply(id, Transition::Cancel);
        if !self.registry.get(id).is_some_and(|h| h.is_awaiting) {
            return;
        }
        if self.state_of(id) == Some(GestureState::End) {
            self.emit(id, GestureState::Cancelled, GestureState::Began);
        }
        self.clear_awaiting(id);
        self.compact_awaiting();
        self.schedule_cleanup();
    }

    // --- Cleanup ---

    fn schedule_cleanup(&mut self) {
        if self.depth > 0 {
            self.cleanup_scheduled = true;
        } else {
            self.cleanup();
        }
    }

    fn finish_pass(&mut self) {
        if self.depth == 0 && self.cleanup_scheduled {
            self.cleanup();
        }
    }

    fn cleanup(&mut self) {
        let finished: Vec<HandlerId> = self
            .candidates
            .iter()
            .copied()
            .filter(|id| {
                self.registry
                    .get(*id)
                    .is_none_or(|h| h.state.is_finished() && !h.is_awaiting)
            })
            .collect();
        for id in finished.iter().rev() {
            if let Some(h) = self.registry.get_mut(*id) {
                h.reset();
            }
        }
        self.candidates.retain(|c| !finished.contains(c));
        self.cleanup_scheduled = false;
        if !finished.is_empty() {
            debug!(
                removed = finished.len(),
                remaining = self.candidates.len(),
                "compacted finished handlers"
            );
        }
    }

    fn clear_awaiting(&mut self, id: HandlerId) {
        if let Some(h) = self.registry.get_mut(id) {
            h.is_awaiting = false;
        }
    }

    fn compact_awaiting(&mut self) {
        let registry = &self.registry;
        self.awaiting
            .retain(|a| registry.get(*a).is_some_and(|h| h.is_awaiting));
    }

    // --- Helpers ---

    fn bump_index(&mut self) -> u64 {
        let index = self.next_activation_index;
        self.next_activation_index += 1;
        index
    }

    fn state_of(&self, id: HandlerId) -> Option<GestureState> {
        self.registry.get(id).map(|h| h.state)
    }

    fn waits_for(&self, waiter: HandlerId, other: HandlerId) -> bool {
        match (self.registry.get(waiter), self.registry.get(other)) {
            (Some(w), Some(o)) => policy::should_wait_for_other(w, o),
            _ => false,
        }
    }

    fn cancelled_by(&self, id: HandlerId, activating: HandlerId) -> bool {
        match (self.registry.get(id), self.registry.get(activating)) {
            (Some(h), Some(a)) => policy::should_be_cancelled_by(h, a),
            _ => false,
        }
    }

    fn emit(&mut self, handler: HandlerId, state: GestureState, prev: GestureState) {
        trace!(handler = ?handler, ?state, ?prev, "state change");
        self.events.push(GestureEvent::StateChange {
            handler,
            state,
            prev,
        });
    }
}
