// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("refusing to write overlay to the canonical project root: {path}")]
    CanonicalRoot { path: String },
    #[error("io error writing overlay at {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },
}
