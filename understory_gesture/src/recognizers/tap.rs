// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::error::RecognizerFault;
use crate::recognizer::{HandlerContext, Recognize};
use crate::types::{GestureState, TouchAction, TouchFrame};

use super::Drift;

/// Thresholds for [`TapRecognizer`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TapConfig {
    /// Fail if the last finger has not lifted this long after the first landed.
    pub max_duration_ms: u64,
    /// Fail once the centroid drifts further than this.
    pub max_distance: f64,
    /// Fingers that must have been down at once for the tap to count.
    pub min_pointers: usize,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            max_duration_ms: 500,
            max_distance: 10.0,
            min_pointers: 1,
        }
    }
}

/// Recognizes a short press that lifts close to where it started.
#[derive(Clone, Debug, Default)]
pub struct TapRecognizer {
    config: TapConfig,
    drift: Drift,
    max_pointers: usize,
}

impl TapRecognizer {
    /// Tap with the given thresholds.
    pub fn new(config: TapConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Thresholds.
    pub fn config(&self) -> &TapConfig {
        &self.config
    }
}

impl Recognize for TapRecognizer {
    fn on_handle(
        &mut self,
        frame: &TouchFrame,
        ctx: &mut HandlerContext,
    ) -> Result<(), RecognizerFault> {
        if ctx.state() == GestureState::Undetermined && frame.action == TouchAction::Down {
            ctx.begin();
            ctx.schedule_timer(self.config.max_duration_ms);
        }
        if ctx.state() != GestureState::Began {
            return Ok(());
        }
        self.max_pointers = self.max_pointers.max(frame.pointers.len());
        let moved = self.drift.update(frame);
        let max = self.config.max_distance;
        if moved.hypot2() > max * max {
            ctx.fail();
        } else if frame.action == TouchAction::Up {
            if self.max_pointers >= self.config.min_pointers {
                ctx.activate();
                ctx.end();
            } else {
                ctx.fail();
            }
        }
        Ok(())
    }

    fn on_timer(&mut self, ctx: &mut HandlerContext) -> Result<(), RecognizerFault> {
        if ctx.state() == GestureState::Began {
            ctx.fail();
        }
        Ok(())
    }

    fn on_reset(&mut self) {
        self.drift.reset();
        self.max_pointers = 0;
    }
}
