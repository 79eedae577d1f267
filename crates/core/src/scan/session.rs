//! Tokio runtime for a [`ScanMachine`].
//!
//! Each session is a single actor task that owns its machine, so events are
//! applied one at a time in arrival order. Timers and the save call run as
//! child tasks that report back through the actor's internal channel; their
//! abort handles are kept so a reset or teardown cancels them together.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;

use crate::config::ScanTimings;
use crate::linking::Linker;
use crate::scan::machine::{ScanEffect, ScanEvent, ScanMachine, ScanSnapshot};
use crate::scan::timers::TimerId;

/// Capacity of the external command queue per session.
const COMMAND_BUFFER: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Scan session is closed")]
pub struct SessionClosed;

/// Reply to an externally submitted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    /// Whether the machine acted on the event.
    pub handled: bool,
    /// State immediately after the event was applied.
    pub snapshot: ScanSnapshot,
}

struct Command {
    event: ScanEvent,
    reply: oneshot::Sender<CommandReply>,
}

/// Entry point for starting sessions.
pub struct ScanSession;

impl ScanSession {
    /// Spawn a new session actor in `scan_badge` and return its handle.
    pub fn spawn(linker: Linker, timings: ScanTimings) -> ScanSessionHandle {
        let machine = ScanMachine::new(timings);
        let (snapshot_tx, snapshot_rx) = watch::channel(machine.snapshot());
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let actor = SessionActor {
            machine,
            linker,
            timers: HashMap::new(),
            saves: HashMap::new(),
            internal_tx,
            snapshot_tx,
        };
        tokio::spawn(actor.run(command_rx, internal_rx, cancel.clone()));

        ScanSessionHandle {
            commands: command_tx,
            snapshot: snapshot_rx,
            cancel,
        }
    }
}

/// Cloneable handle to a running session.
///
/// The session stops when [`ScanSessionHandle::close`] is called or when
/// every handle has been dropped.
#[derive(Clone, Debug)]
pub struct ScanSessionHandle {
    commands: mpsc::Sender<Command>,
    snapshot: watch::Receiver<ScanSnapshot>,
    cancel: CancellationToken,
}

impl ScanSessionHandle {
    /// Forward a camera decode result.
    pub async fn decode(&self, raw_value: impl Into<String>) -> Result<CommandReply, SessionClosed> {
        self.submit(ScanEvent::Decoded(raw_value.into())).await
    }

    /// Report that the camera could not be initialized.
    pub async fn camera_failed(&self, message: Option<String>) -> Result<CommandReply, SessionClosed> {
        self.submit(ScanEvent::CameraFailed(message)).await
    }

    /// Clear the camera overlay and reinitialize capture.
    pub async fn retry_camera(&self) -> Result<CommandReply, SessionClosed> {
        self.submit(ScanEvent::RetryCamera).await
    }

    /// Full reset for the next attendee.
    pub async fn reset(&self) -> Result<CommandReply, SessionClosed> {
        self.submit(ScanEvent::Reset).await
    }

    /// Latest published state.
    pub fn snapshot(&self) -> ScanSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Watch every state change.
    pub fn subscribe(&self) -> watch::Receiver<ScanSnapshot> {
        self.snapshot.clone()
    }

    /// Stop the session, cancelling all outstanding timers.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled() || self.commands.is_closed()
    }

    async fn submit(&self, event: ScanEvent) -> Result<CommandReply, SessionClosed> {
        if self.cancel.is_cancelled() {
            return Err(SessionClosed);
        }
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command { event, reply })
            .await
            .map_err(|_| SessionClosed)?;
        rx.await.map_err(|_| SessionClosed)
    }
}

struct SessionActor {
    machine: ScanMachine,
    linker: Linker,
    timers: HashMap<TimerId, AbortHandle>,
    saves: HashMap<u64, AbortHandle>,
    internal_tx: mpsc::UnboundedSender<ScanEvent>,
    snapshot_tx: watch::Sender<ScanSnapshot>,
}

impl SessionActor {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut internal: mpsc::UnboundedReceiver<ScanEvent>,
        cancel: CancellationToken,
    ) {
        tracing::debug!("Scan session started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                command = commands.recv() => match command {
                    Some(Command { event, reply }) => {
                        let handled = self.apply(event);
                        let _ = reply.send(CommandReply {
                            handled,
                            snapshot: self.machine.snapshot(),
                        });
                    }
                    None => break,
                },
                Some(event) = internal.recv() => {
                    self.apply(event);
                }
            }
        }

        self.teardown();
        tracing::debug!("Scan session stopped");
    }

    /// Apply one event and carry out the resulting effects.
    fn apply(&mut self, event: ScanEvent) -> bool {
        match &event {
            ScanEvent::TimerFired(id) => {
                self.timers.remove(id);
            }
            ScanEvent::SaveFinished { save_id, .. } => {
                self.saves.remove(save_id);
            }
            _ => {}
        }

        let transition = self.machine.handle(event);
        for effect in transition.effects {
            self.execute(effect);
        }
        self.snapshot_tx.send_replace(self.machine.snapshot());
        transition.handled
    }

    fn execute(&mut self, effect: ScanEffect) {
        match effect {
            ScanEffect::ScheduleTimer { id, delay } => {
                let tx = self.internal_tx.clone();
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(ScanEvent::TimerFired(id));
                });
                self.timers.insert(id, handle.abort_handle());
            }
            ScanEffect::CancelTimers(ids) => {
                for id in ids {
                    if let Some(handle) = self.timers.remove(&id) {
                        handle.abort();
                    }
                }
            }
            ScanEffect::StartSave {
                save_id,
                badge_code,
                ticket_url,
            } => {
                let tx = self.internal_tx.clone();
                let linker = self.linker.clone();
                let handle = tokio::spawn(async move {
                    let result = linker
                        .link(&badge_code, &ticket_url)
                        .await
                        .map(|_| ())
                        .map_err(|e| {
                            tracing::error!(badge_code = %badge_code, error = %e, "Failed to link badge");
                            e.to_string()
                        });
                    let _ = tx.send(ScanEvent::SaveFinished { save_id, result });
                });
                self.saves.insert(save_id, handle.abort_handle());
            }
            ScanEffect::RestartCapture { generation } => {
                tracing::debug!(generation, "Camera capture reinitialized");
            }
        }
    }

    fn teardown(&mut self) {
        for id in self.machine.teardown() {
            if let Some(handle) = self.timers.remove(&id) {
                handle.abort();
            }
        }
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
        for (_, handle) in self.saves.drain() {
            handle.abort();
        }
        self.snapshot_tx.send_replace(self.machine.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::extract::BADGE_REJECTION_MESSAGE;
    use crate::linking::BadgeStore;
    use crate::memory_store::MemoryBadgeStore;
    use crate::scan::machine::ScanStep;

    fn spawn_with(store: &Arc<MemoryBadgeStore>) -> ScanSessionHandle {
        ScanSession::spawn(
            Linker::new(Arc::clone(store) as Arc<dyn BadgeStore>),
            ScanTimings::default(),
        )
    }

    async fn wait_for_step(session: &ScanSessionHandle, step: ScanStep) -> ScanSnapshot {
        let mut rx = session.subscribe();
        let snapshot = tokio::time::timeout(Duration::from_secs(30), rx.wait_for(|s| s.step == step))
            .await
            .unwrap_or_else(|_| panic!("session never reached {step:?}"))
            .expect("session dropped")
            .clone();
        snapshot
    }

    #[tokio::test(start_paused = true)]
    async fn badge_then_ticket_links_and_auto_resets() {
        let store = Arc::new(MemoryBadgeStore::new());
        let session = spawn_with(&store);

        let reply = session.decode("https://x/badge/B1").await.unwrap();
        assert!(reply.handled);
        assert_eq!(reply.snapshot.step, ScanStep::BadgeDone);
        assert_eq!(reply.snapshot.badge_code.as_deref(), Some("B1"));

        let snap = wait_for_step(&session, ScanStep::ScanLuma).await;
        assert_eq!(snap.capture_generation, 1);

        let reply = session.decode("https://lu.ma/ticket/xyz").await.unwrap();
        assert!(reply.handled);
        assert_eq!(reply.snapshot.step, ScanStep::Saving);

        let snap = wait_for_step(&session, ScanStep::Success).await;
        assert_eq!(snap.badge_code.as_deref(), Some("B1"));
        assert_eq!(store.len().await, 1);

        let snap = wait_for_step(&session, ScanStep::ScanBadge).await;
        assert_eq!(snap.badge_code, None);
        assert_eq!(snap.ticket_url, None);
        assert_eq!(snap.pending_timers, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn acknowledgement_waits_for_the_full_delay() {
        let store = Arc::new(MemoryBadgeStore::new());
        let session = spawn_with(&store);

        session.decode("https://x/badge/B1").await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(session.snapshot().step, ScanStep::BadgeDone);

        wait_for_step(&session, ScanStep::ScanLuma).await;
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_pending_acknowledgement() {
        let store = Arc::new(MemoryBadgeStore::new());
        let session = spawn_with(&store);

        session.decode("https://x/badge/B1").await.unwrap();
        let reply = session.reset().await.unwrap();
        assert_eq!(reply.snapshot.step, ScanStep::ScanBadge);
        assert_eq!(reply.snapshot.pending_timers, 0);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(session.snapshot().step, ScanStep::ScanBadge);
    }

    #[tokio::test(start_paused = true)]
    async fn bad_badge_goes_to_error_until_reset() {
        let store = Arc::new(MemoryBadgeStore::new());
        let session = spawn_with(&store);

        let reply = session.decode("definitely not a badge").await.unwrap();
        assert_eq!(reply.snapshot.step, ScanStep::Error);
        assert_eq!(
            reply.snapshot.error_message.as_deref(),
            Some(BADGE_REJECTION_MESSAGE)
        );

        let reply = session.reset().await.unwrap();
        assert_eq!(reply.snapshot.step, ScanStep::ScanBadge);
        assert_eq!(reply.snapshot.error_message, None);
    }

    #[tokio::test(start_paused = true)]
    async fn store_failure_lands_in_error_without_retry() {
        let store = Arc::new(MemoryBadgeStore::new());
        store.fail_with("relation does not exist");
        let session = spawn_with(&store);

        session.decode("https://x/badge/B1").await.unwrap();
        wait_for_step(&session, ScanStep::ScanLuma).await;
        session.decode("https://lu.ma/t/1").await.unwrap();

        let snap = wait_for_step(&session, ScanStep::Error).await;
        assert_eq!(
            snap.error_message.as_deref(),
            Some("Database error: relation does not exist")
        );
        assert!(!snap.processing);

        store.clear_failure();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(session.snapshot().step, ScanStep::Error);
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_session_rejects_commands() {
        let store = Arc::new(MemoryBadgeStore::new());
        let session = spawn_with(&store);
        session.decode("https://x/badge/B1").await.unwrap();

        session.close();
        assert!(session.is_closed());
        assert_eq!(session.decode("https://x/badge/B2").await, Err(SessionClosed));
    }
}
