#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Per-user conversation state.
//!
//! The store exposes only the defined mutation operations and owns the
//! per-user locking; callers never see the raw map.

pub mod state;
pub mod store;

pub use state::{DialogState, SessionState};
pub use store::SessionStore;
