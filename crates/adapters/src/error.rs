// SPDX-License-Identifier: MIT

//! Adapter-layer error kind (spec.md §7's `AgentError`, scoped to
//! runtime-adapter operations — guard deployment and command building never
//! touch the spawn pipeline's own `AgentError` directly).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentAdapterError {
    #[error("unknown runtime {0}")]
    UnknownRuntime(String),

    #[error("adapter {runtime}: failed writing {path}: {source}")]
    Io { runtime: String, path: String, #[source] source: std::io::Error },

    #[error("adapter {runtime}: refusing to deploy config to canonical project root: {path}")]
    CanonicalRoot { runtime: String, path: String },

    #[error("adapter {runtime}: serialization error: {0}")]
    Serde { runtime: String, #[source] source: serde_json::Error },
}
