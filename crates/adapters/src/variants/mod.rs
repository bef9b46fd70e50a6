// SPDX-License-Identifier: MIT

//! The three concrete adapters named in spec.md §4.2, covering every branch
//! of the distilled spec's adapter variant list.

pub mod headless;
pub mod hybrid;
pub mod interactive_tui;

pub use headless::Headless;
pub use hybrid::Hybrid;
pub use interactive_tui::InteractiveTui;
