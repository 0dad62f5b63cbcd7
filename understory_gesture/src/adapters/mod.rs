// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Understory crates.
//!
//! Enabled via feature flags so the core stays `no_std` and free of host types.

#[cfg(feature = "view_tree_adapter")]
pub mod view_tree;
