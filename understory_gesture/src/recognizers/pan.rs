// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Vec2;

use crate::error::RecognizerFault;
use crate::recognizer::{HandlerContext, Recognize};
use crate::types::{GestureState, TouchAction, TouchFrame};

use super::Drift;

/// Thresholds for [`PanRecognizer`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PanConfig {
    /// Centroid travel needed before the pan activates.
    pub min_distance: f64,
    /// Fingers that must be down for the pan to activate.
    pub min_pointers: usize,
}

impl Default for PanConfig {
    fn default() -> Self {
        Self {
            min_distance: 10.0,
            min_pointers: 1,
        }
    }
}

/// Recognizes a drag once it travels far enough.
#[derive(Clone, Debug, Default)]
pub struct PanRecognizer {
    config: PanConfig,
    drift: Drift,
}

impl PanRecognizer {
    /// Pan with the given thresholds.
    pub fn new(config: PanConfig) -> Self {
        Self {
            config,
            drift: Drift::default(),
        }
    }

    /// Centroid travel in this sequence, in view-local units.
    pub fn translation(&self) -> Vec2 {
        self.drift.translation()
    }
}

impl Recognize for PanRecognizer {
    fn on_handle(
        &mut self,
        frame: &TouchFrame,
        ctx: &mut HandlerContext,
    ) -> Result<(), RecognizerFault> {
        if ctx.state() == GestureState::Undetermined && frame.action == TouchAction::Down {
            ctx.begin();
        }
        let moved = self.drift.update(frame);
        match frame.action {
            TouchAction::Up => {
                if ctx.state() == GestureState::Active {
                    ctx.end();
                } else {
                    ctx.fail();
                }
            }
            TouchAction::Cancel => ctx.cancel(),
            _ => {
                let min = self.config.min_distance;
                if ctx.state() == GestureState::Began
                    && frame.pointers.len() >= self.config.min_pointers
                    && moved.hypot2() >= min * min
                {
                    ctx.activate();
                }
            }
        }
        Ok(())
    }

    fn on_reset(&mut self) {
        self.drift.reset();
    }

    fn reset_progress(&mut self) {
        self.drift.rebase();
    }
}
