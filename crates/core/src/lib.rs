//! Domain core for linking event badges to attendee ticket URLs.
//!
//! Holds everything that does not depend on HTTP or a concrete database:
//! scanned-payload extraction, the staff scan session state machine and its
//! tokio runtime, and the linking service that talks to a [`linking::BadgeStore`].

pub mod config;
pub mod error;
pub mod extract;
pub mod linking;
pub mod memory_store;
pub mod scan;
pub mod types;
