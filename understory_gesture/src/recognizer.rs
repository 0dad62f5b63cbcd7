// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The recognizer plugin contract.
//!
//! ## Overview
//!
//! A recognizer is the gesture-specific half of a handler. It looks at frames
//! (already filtered to the pointers its handler tracks and mapped into view-local
//! coordinates) and asks for state transitions through a [`HandlerContext`].
//! The orchestrator applies the requested transitions after the hook returns, in
//! the order they were requested, so a recognizer never re-enters arbitration.
//!
//! Built-in variants live in [`recognizers`](crate::recognizers) and are selected
//! with the [`Recognizer`] enum. Anything else plugs in through
//! [`Recognizer::Custom`].
//!
//! ## Policy hooks
//!
//! [`Recognize::should_recognize_simultaneously`],
//! [`Recognize::should_wait_for_failure`], and [`Recognize::should_be_cancelled_by`]
//! refine the declared [`Relations`](crate::handler::Relations) of a handler.
//! See [`policy`](crate::policy) for how they combine.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::RecognizerFault;
use crate::handler::Transition;
use crate::recognizers::{LongPressRecognizer, ManualRecognizer, PanRecognizer, TapRecognizer};
use crate::types::{GestureState, HandlerId, TouchFrame};

/// What a hook wants done with its handler's timer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum TimerRequest {
    #[default]
    Keep,
    Schedule(u64),
    Cancel,
}

/// Per-call handle a recognizer uses to request transitions and timers.
///
/// [`state`](Self::state) reflects the transitions requested so far in this call,
/// so `ctx.activate(); ctx.end();` reads back as `End`.
#[derive(Debug)]
pub struct HandlerContext {
    state: GestureState,
    now_ms: u64,
    manual: bool,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) timer: TimerRequest,
}

impl HandlerContext {
    pub(crate) fn new(state: GestureState, now_ms: u64, manual: bool) -> Self {
        Self {
            state,
            now_ms,
            manual,
            transitions: Vec::new(),
            timer: TimerRequest::Keep,
        }
    }

    /// State of the handler after the transitions requested so far.
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Current time in milliseconds: the frame time, or the time passed to
    /// [`Orchestrator::advance_time`](crate::orchestrator::Orchestrator::advance_time).
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn request(&mut self, t: Transition) {
        if let Some(next) = t.target(self.state, self.manual) {
            self.state = next;
            self.transitions.push(t);
        }
    }

    /// Request `Undetermined → Began`.
    pub fn begin(&mut self) {
        self.request(Transition::Begin);
    }

    /// Request activation. Ignored for handlers using manual activation.
    pub fn activate(&mut self) {
        self.request(Transition::Activate { force: false });
    }

    /// Request failure.
    pub fn fail(&mut self) {
        self.request(Transition::Fail);
    }

    /// Request cancellation.
    pub fn cancel(&mut self) {
        self.request(Transition::Cancel);
    }

    /// Request the end of a recognized gesture.
    pub fn end(&mut self) {
        self.request(Transition::End);
    }

    /// Arm the one-shot timer `delay_ms` after [`now_ms`](Self::now_ms),
    /// replacing any pending deadline.
    pub fn schedule_timer(&mut self, delay_ms: u64) {
        self.timer = TimerRequest::Schedule(self.now_ms.saturating_add(delay_ms));
    }

    /// Disarm the timer. Cancelling an unarmed timer is a no-op.
    pub fn cancel_timer(&mut self) {
        self.timer = TimerRequest::Cancel;
    }
}

/// Capability interface implemented by every recognizer.
pub trait Recognize: Debug {
    /// Process a frame the handler tracks.
    fn on_handle(
        &mut self,
        frame: &TouchFrame,
        ctx: &mut HandlerContext,
    ) -> Result<(), RecognizerFault>;

    /// The timer armed with [`HandlerContext::schedule_timer`] is due.
    fn on_timer(&mut self, _ctx: &mut HandlerContext) -> Result<(), RecognizerFault> {
        Ok(())
    }

    /// The handler was cancelled from outside the recognizer.
    fn on_cancel(&mut self) {}

    /// The handler was reset; drop per-cycle state.
    fn on_reset(&mut self) {}

    /// First frame after promotion. Rebase any accumulated progress so the
    /// values reported from here on start fresh.
    fn reset_progress(&mut self) {}

    /// Whether this handler may stay active alongside `other`.
    fn should_recognize_simultaneously(&self, _other: HandlerId) -> bool {
        false
    }

    /// Whether this handler must wait for `other` to fail before activating.
    fn should_wait_for_failure(&self, _other: HandlerId) -> bool {
        false
    }

    /// Whether this handler, once it has a stake, yields to `other` activating.
    fn should_be_cancelled_by(&self, _other: HandlerId) -> bool {
        true
    }
}

/// The closed set of recognizer variants.
#[derive(Debug)]
pub enum Recognizer {
    /// Single or multi-finger tap.
    Tap(TapRecognizer),
    /// Drag past a distance threshold.
    Pan(PanRecognizer),
    /// Press held past a duration threshold.
    LongPress(LongPressRecognizer),
    /// Begins on touch and leaves every other decision to the host.
    Manual(ManualRecognizer),
    /// Host-provided recognizer.
    Custom(Box<dyn Recognize>),
}

macro_rules! each_variant {
    ($self:expr, $r:ident => $body:expr) => {
        match $self {
            Recognizer::Tap($r) => $body,
            Recognizer::Pan($r) => $body,
            Recognizer::LongPress($r) => $body,
            Recognizer::Manual($r) => $body,
            Recognizer::Custom($r) => $body,
        }
    };
}

impl Recognize for Recognizer {
    fn on_handle(
        &mut self,
        frame: &TouchFrame,
        ctx: &mut HandlerContext,
    ) -> Result<(), RecognizerFault> {
        each_variant!(self, r => r.on_handle(frame, ctx))
    }

    fn on_timer(&mut self, ctx: &mut HandlerContext) -> Result<(), RecognizerFault> {
        each_variant!(self, r => r.on_timer(ctx))
    }

    fn on_cancel(&mut self) {
        each_variant!(self, r => r.on_cancel());
    }

    fn on_reset(&mut self) {
        each_variant!(self, r => r.on_reset());
    }

    fn reset_progress(&mut self) {
        each_variant!(self, r => r.reset_progress());
    }

    fn should_recognize_simultaneously(&self, other: HandlerId) -> bool {
        each_variant!(self, r => r.should_recognize_simultaneously(other))
    }

    fn should_wait_for_failure(&self, other: HandlerId) -> bool {
        each_variant!(self, r => r.should_wait_for_failure(other))
    }

    fn should_be_cancelled_by(&self, other: HandlerId) -> bool {
        each_variant!(self, r => r.should_be_cancelled_by(other))
    }
}

impl From<TapRecognizer> for Recognizer {
    fn from(r: TapRecognizer) -> Self {
        Self::Tap(r)
    }
}

impl From<PanRecognizer> for Recognizer {
    fn from(r: PanRecognizer) -> Self {
        Self::Pan(r)
    }
}

impl From<LongPressRecognizer> for Recognizer {
    fn from(r: LongPressRecognizer) -> Self {
        Self::LongPress(r)
    }
}

impl From<ManualRecognizer> for Recognizer {
    fn from(r: ManualRecognizer) -> Self {
        Self::Manual(r)
    }
}
