// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::error::RecognizerFault;
use crate::recognizer::{HandlerContext, Recognize};
use crate::types::{GestureState, TouchAction, TouchFrame};

/// Begins when a finger lands and otherwise waits for programmatic transitions.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualRecognizer;

impl Recognize for ManualRecognizer {
    fn on_handle(
        &mut self,
        frame: &TouchFrame,
        ctx: &mut HandlerContext,
    ) -> Result<(), RecognizerFault> {
        if ctx.state() == GestureState::Undetermined && frame.action == TouchAction::Down {
            ctx.begin();
        }
        Ok(())
    }
}
