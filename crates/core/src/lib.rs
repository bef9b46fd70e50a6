// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ov-core: data model, ids, clock and error kinds shared across Overstory.

pub mod macros;

pub mod capability;
pub mod clock;
pub mod error;
pub mod event;
pub mod id;
pub mod merge_queue;
pub mod message;
pub mod overlay_config;
pub mod run;
pub mod runtime_config;
pub mod session;

pub use capability::Capability;
pub use clock::{Clock, FakeClock, SystemClock};
pub use error::{AgentError, MergeError, SessionError, StoreError, ValidationError, WorktreeError};
pub use event::{EventLevel, EventType, StoredEvent};
pub use id::{short, MessageId, MergeQueueEntryId, RunId};
pub use merge_queue::{MergeQueueEntry, MergeStatus};
pub use message::{Message, MessageType, Priority, ORCHESTRATOR};
pub use overlay_config::{DispatchOverrides, OverlayConfig, QualityGate};
pub use run::{RunRecord, RunStatus};
pub use runtime_config::{PermissionMode, RuntimeConfig};
pub use session::{branch_name, AgentSession, SessionState, BRANCH_PREFIX};
