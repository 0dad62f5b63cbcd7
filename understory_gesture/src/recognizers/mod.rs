// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in recognizer variants.
//!
//! These are deliberately small. They exist so the arbitration engine has real
//! gestures to arbitrate; thresholds are plain config fields with conservative
//! defaults.

mod long_press;
mod manual;
mod pan;
mod tap;

pub use long_press::{LongPressConfig, LongPressRecognizer};
pub use manual::ManualRecognizer;
pub use pan::{PanConfig, PanRecognizer};
pub use tap::{TapConfig, TapRecognizer};

use kurbo::{Point, Vec2};

use crate::types::TouchFrame;

/// Centroid translation since the first frame of a sequence.
///
/// When fingers are added or lifted the centroid jumps; the tracker re-anchors
/// so that only actual motion contributes to the translation.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Drift {
    anchor: Option<Point>,
    last: Point,
    count: usize,
    carried: Vec2,
}

impl Drift {
    pub(crate) fn update(&mut self, frame: &TouchFrame) -> Vec2 {
        let Some(c) = frame.centroid() else {
            return self.translation();
        };
        match self.anchor {
            None => {
                self.anchor = Some(c);
                self.count = frame.pointers.len();
            }
            Some(anchor) if frame.pointers.len() != self.count => {
                self.carried += self.last - anchor;
                self.anchor = Some(c);
                self.count = frame.pointers.len();
            }
            Some(_) => {}
        }
        self.last = c;
        self.translation()
    }

    pub(crate) fn translation(&self) -> Vec2 {
        match self.anchor {
            Some(anchor) => self.carried + (self.last - anchor),
            None => Vec2::ZERO,
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Restart translation from the latest centroid.
    pub(crate) fn rebase(&mut self) {
        if self.anchor.is_some() {
            self.anchor = Some(self.last);
            self.carried = Vec2::ZERO;
        }
    }
}
