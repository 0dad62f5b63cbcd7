// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by gesture handling.

use crate::types::HandlerId;

/// Errors returned by the orchestrator and registry.
///
/// Lookups performed while dispatching (unknown handlers, detached views) never
/// produce errors; they are treated as no-ops.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GestureError {
    /// The candidate set would grow beyond the configured limit.
    ///
    /// This indicates a programming error in the host (handlers that never
    /// finish, or an unreasonably large number attached along one touch path).
    #[error("candidate set exceeds its limit of {limit} handlers")]
    CapacityExceeded {
        /// Configured maximum number of candidates.
        limit: usize,
    },
    /// A handler with this id is already registered.
    #[error("handler {0:?} is already registered")]
    DuplicateHandler(HandlerId),
    /// No handler with this id is registered.
    #[error("handler {0:?} is not registered")]
    UnknownHandler(HandlerId),
    /// A hit slop combines edges and extents in a way that cannot be resolved.
    #[error("invalid hit slop: {0}")]
    InvalidHitSlop(&'static str),
}

/// A fault raised by a recognizer hook.
///
/// The orchestrator discards the transitions requested during the faulting
/// hook and fails the handler.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("recognizer fault: {0}")]
pub struct RecognizerFault(pub &'static str);
