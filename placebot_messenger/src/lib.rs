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

//! Facebook Messenger boundary: the Graph API send client and the
//! webhook endpoint feeding events into the dialog engine.

pub mod client;
pub mod error;
pub mod event;
pub mod webhook;

pub use client::MessengerClient;
pub use error::{Error, Result};
pub use webhook::{WebhookState, router, serve};
