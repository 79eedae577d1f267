//! Staff scan session: the two-step badge/ticket scanning workflow.
//!
//! [`machine`] is the pure state machine; [`session`] runs one machine per
//! staff device on a tokio task with real timers and the save call.

pub mod machine;
pub mod session;
pub mod timers;

pub use machine::{ScanEffect, ScanEvent, ScanMachine, ScanSnapshot, ScanStep, Transition};
pub use session::{CommandReply, ScanSession, ScanSessionHandle, SessionClosed};
pub use timers::{TimerId, TimerKind, TimerSet};
