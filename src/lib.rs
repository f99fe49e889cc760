//! poster-studio library crate.
//!
//! Submits a brand name and offer to a poster generation endpoint, caches the
//! returned image locally and shares it.

pub mod config;
pub mod poster;
pub mod session;
pub mod share;
