//! Background tasks spawned at startup.
//!
//! Each task is a free `async fn run(...)` spawned via `tokio::spawn`. All
//! tasks accept a [`CancellationToken`](tokio_util::sync::CancellationToken)
//! and stop when it is triggered during graceful shutdown.

pub mod session_sweeper;
