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

//! HTTP clients for the external collaborators: the NLU service and the
//! places-search provider.

pub mod foursquare;
pub mod nlu;
pub mod retry;

pub use foursquare::FoursquareProvider;
pub use nlu::ApiAiClassifier;
