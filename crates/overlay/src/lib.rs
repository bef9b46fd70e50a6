// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ov-overlay: render the per-agent instruction file from an
//! [`ov_core::OverlayConfig`] plus an embedded template (spec.md §4.5).

pub mod error;
pub mod generator;
pub mod quality_gates;

pub use error::OverlayError;
pub use generator::{render, write_overlay};
