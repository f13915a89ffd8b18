//! Replaying one inbound request against the primary and candidate backends
//!
//! ```text
//!                 ReplayedRequest (buffered body)
//!                          │
//!                 ┌────────▼────────┐
//!                 │ DualDispatcher  │
//!                 └───┬─────────┬───┘
//!          spawn      │         │      spawn
//!            ┌────────▼──┐   ┌──▼────────┐
//!            │  primary  │   │ candidate │
//!            └────────┬──┘   └──┬────────┘
//!                     └──join───┘
//!                          │
//!          (primary outcome, candidate outcome)
//! ```

mod addr;
mod client;
mod dispatch;
mod error;
mod request;

pub use addr::BackendAddr;
pub use client::BackendClient;
pub use dispatch::DualDispatcher;
pub use error::{BackendError, ClientError};
pub use request::ReplayedRequest;
