// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::error::RecognizerFault;
use crate::recognizer::{HandlerContext, Recognize};
use crate::types::{GestureState, TouchAction, TouchFrame};

use super::Drift;

/// Thresholds for [`LongPressRecognizer`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LongPressConfig {
    /// Hold time before the press activates.
    pub min_duration_ms: u64,
    /// Drift tolerated while holding.
    pub max_distance: f64,
}

impl Default for LongPressConfig {
    fn default() -> Self {
        Self {
            min_duration_ms: 500,
            max_distance: 10.0,
        }
    }
}

/// Recognizes a press held in place past a duration.
#[derive(Clone, Debug, Default)]
pub struct LongPressRecognizer {
    config: LongPressConfig,
    drift: Drift,
}

impl LongPressRecognizer {
    /// Long press with the given thresholds.
    pub fn new(config: LongPressConfig) -> Self {
        Self {
            config,
            drift: Drift::default(),
        }
    }
}

impl Recognize for LongPressRecognizer {
    fn on_handle(
        &mut self,
        frame: &TouchFrame,
        ctx: &mut HandlerContext,
    ) -> Result<(), RecognizerFault> {
        if ctx.state() == GestureState::Undetermined && frame.action == TouchAction::Down {
            ctx.begin();
            ctx.schedule_timer(self.config.min_duration_ms);
        }
        let moved = self.drift.update(frame);
        if frame.action == TouchAction::Up {
            if ctx.state() == GestureState::Active {
                ctx.end();
            } else {
                ctx.fail();
            }
            return Ok(());
        }
        let max = self.config.max_distance;
        if moved.hypot2() > max * max {
            if ctx.state() == GestureState::Active {
                ctx.cancel();
            } else {
                ctx.fail();
            }
        }
        Ok(())
    }

    fn on_timer(&mut self, ctx: &mut HandlerContext) -> Result<(), RecognizerFault> {
        if ctx.state() == GestureState::Began {
            ctx.activate();
        }
        Ok(())
    }

    fn on_reset(&mut self) {
        self.drift.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_activates_held_press() {
        let mut r = LongPressRecognizer::default();
        let mut ctx = HandlerContext::new(GestureState::Undetermined, 0, false);
        r.on_handle(&TouchFrame::single(TouchAction::Down, 0.0, 0.0, 0), &mut ctx)
            .unwrap();
        assert_eq!(ctx.state(), GestureState::Began);

        let mut ctx = HandlerContext::new(GestureState::Began, 500, false);
        r.on_timer(&mut ctx).unwrap();
        assert_eq!(ctx.state(), GestureState::Active);
    }

    #[test]
    fn lifting_early_fails() {
        let mut r = LongPressRecognizer::default();
        let mut ctx = HandlerContext::new(GestureState::Began, 100, false);
        r.on_handle(&TouchFrame::single(TouchAction::Up, 0.0, 0.0, 100), &mut ctx)
            .unwrap();
        assert_eq!(ctx.state(), GestureState::Failed);
    }

    #[test]
    fn drifting_while_active_cancels() {
        let mut r = LongPressRecognizer::default();
        let mut ctx = HandlerContext::new(GestureState::Active, 0, false);
        r.on_handle(&TouchFrame::single(TouchAction::Move, 0.0, 0.0, 0), &mut ctx)
            .unwrap();
        r.on_handle(&TouchFrame::single(TouchAction::Move, 50.0, 0.0, 10), &mut ctx)
            .unwrap();
        assert_eq!(ctx.state(), GestureState::Cancelled);
    }
}
