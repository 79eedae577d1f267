//! Sans-IO state machine for one staff scan session.
//!
//! ```text
//! scan_badge --badge ok--> badge_done --ack timer--> scan_luma --ticket ok--> saving
//!     |                                                  |                      |
//!     +--bad payload--> error <--------bad payload-------+<-----save failed-----+
//!                         |                                                     |
//!                       reset                                             save ok v
//!                         |                                                  success
//!                         v                                                     |
//!                     scan_badge <----------------success reset timer-----------+
//! ```
//!
//! The machine never sleeps or performs I/O. Every call to
//! [`ScanMachine::handle`] returns the effects the caller must carry out:
//! arm or cancel timers, start the save, reinitialize the camera capture.

use std::time::Duration;

use serde::Serialize;

use crate::config::ScanTimings;
use crate::extract::{classify_badge_scan, classify_ticket_scan};
use crate::scan::timers::{TimerId, TimerKind, TimerSet};

/// Message used when the camera reports a failure without a description.
pub const DEFAULT_CAMERA_ERROR: &str = "Camera access denied.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStep {
    ScanBadge,
    BadgeDone,
    ScanLuma,
    Saving,
    Success,
    Error,
}

impl ScanStep {
    /// Steps in which the camera capture is live.
    pub fn is_scanning(self) -> bool {
        matches!(self, ScanStep::ScanBadge | ScanStep::ScanLuma)
    }
}

/// Inputs to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// The camera decoded a QR payload.
    Decoded(String),
    /// A previously scheduled timer elapsed.
    TimerFired(TimerId),
    /// The save started by [`ScanEffect::StartSave`] completed.
    SaveFinished {
        save_id: u64,
        result: Result<(), String>,
    },
    /// The camera could not be initialized.
    CameraFailed(Option<String>),
    /// Staff asked to reinitialize the camera after a failure.
    RetryCamera,
    /// "Try Again" / "Reset & Start Over".
    Reset,
}

/// Work the driver must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEffect {
    ScheduleTimer { id: TimerId, delay: Duration },
    CancelTimers(Vec<TimerId>),
    StartSave {
        save_id: u64,
        badge_code: String,
        ticket_url: String,
    },
    /// Tear down and reopen the camera capture so no stale stream or decode
    /// queue survives into the next step.
    RestartCapture { generation: u64 },
}

/// Result of feeding one event to the machine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transition {
    /// `false` when the event was ignored (guard held, wrong step, stale timer).
    pub handled: bool,
    pub effects: Vec<ScanEffect>,
}

impl Transition {
    fn ignored() -> Self {
        Self::default()
    }

    fn handled(effects: Vec<ScanEffect>) -> Self {
        Self {
            handled: true,
            effects,
        }
    }
}

/// Serializable view of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSnapshot {
    pub step: ScanStep,
    pub badge_code: Option<String>,
    pub ticket_url: Option<String>,
    pub error_message: Option<String>,
    pub camera_error: Option<String>,
    pub capture_generation: u64,
    pub processing: bool,
    pub pending_timers: usize,
}

#[derive(Debug)]
pub struct ScanMachine {
    timings: ScanTimings,
    step: ScanStep,
    badge_code: Option<String>,
    ticket_url: Option<String>,
    error_message: Option<String>,
    camera_error: Option<String>,
    /// Set once a decode has been acted upon in the current scanning step.
    processing: bool,
    capture_generation: u64,
    timers: TimerSet,
    next_save_id: u64,
    pending_save: Option<u64>,
}

impl ScanMachine {
    pub fn new(timings: ScanTimings) -> Self {
        Self {
            timings,
            step: ScanStep::ScanBadge,
            badge_code: None,
            ticket_url: None,
            error_message: None,
            camera_error: None,
            processing: false,
            capture_generation: 0,
            timers: TimerSet::new(),
            next_save_id: 0,
            pending_save: None,
        }
    }

    pub fn step(&self) -> ScanStep {
        self.step
    }

    pub fn snapshot(&self) -> ScanSnapshot {
        ScanSnapshot {
            step: self.step,
            badge_code: self.badge_code.clone(),
            ticket_url: self.ticket_url.clone(),
            error_message: self.error_message.clone(),
            camera_error: self.camera_error.clone(),
            capture_generation: self.capture_generation,
            processing: self.processing,
            pending_timers: self.timers.len(),
        }
    }

    /// Apply one event, then re-check the save guard.
    pub fn handle(&mut self, event: ScanEvent) -> Transition {
        let mut transition = match event {
            ScanEvent::Decoded(raw) => self.on_decoded(&raw),
            ScanEvent::TimerFired(id) => self.on_timer(id),
            ScanEvent::SaveFinished { save_id, result } => self.on_save_finished(save_id, result),
            ScanEvent::CameraFailed(message) => self.on_camera_failed(message),
            ScanEvent::RetryCamera => self.on_retry_camera(),
            ScanEvent::Reset => Transition::handled(self.full_reset()),
        };

        if let Some(save) = self.maybe_start_save() {
            transition.effects.push(save);
        }
        transition
    }

    /// Cancel everything on session teardown. Returns the timers to abort.
    pub fn teardown(&mut self) -> Vec<TimerId> {
        self.pending_save = None;
        self.timers.drain()
    }

    fn on_decoded(&mut self, raw: &str) -> Transition {
        if raw.is_empty() || self.processing || self.camera_error.is_some() {
            return Transition::ignored();
        }

        match self.step {
            ScanStep::ScanBadge => {
                self.processing = true;
                match classify_badge_scan(raw) {
                    Ok(code) => {
                        tracing::debug!(badge_code = %code, "Badge scanned");
                        self.badge_code = Some(code);
                        self.step = ScanStep::BadgeDone;
                        let id = self.timers.schedule(TimerKind::Acknowledge);
                        Transition::handled(vec![ScanEffect::ScheduleTimer {
                            id,
                            delay: self.timings.ack_delay,
                        }])
                    }
                    Err(rejection) => {
                        tracing::debug!(raw, "Badge scan rejected");
                        self.fail(rejection.message().to_string());
                        Transition::handled(Vec::new())
                    }
                }
            }
            ScanStep::ScanLuma => {
                self.processing = true;
                match classify_ticket_scan(raw) {
                    Ok(url) => {
                        self.ticket_url = Some(url);
                        Transition::handled(Vec::new())
                    }
                    Err(rejection) => {
                        tracing::debug!(raw, "Ticket scan rejected");
                        self.fail(rejection.message().to_string());
                        Transition::handled(Vec::new())
                    }
                }
            }
            _ => Transition::ignored(),
        }
    }

    fn on_timer(&mut self, id: TimerId) -> Transition {
        let Some(kind) = self.timers.fire(id) else {
            return Transition::ignored();
        };

        match (kind, self.step) {
            (TimerKind::Acknowledge, ScanStep::BadgeDone) => {
                self.step = ScanStep::ScanLuma;
                self.processing = false;
                Transition::handled(vec![self.restart_capture()])
            }
            (TimerKind::SuccessReset, ScanStep::Success) => Transition::handled(self.full_reset()),
            _ => Transition::ignored(),
        }
    }

    fn on_save_finished(&mut self, save_id: u64, result: Result<(), String>) -> Transition {
        if self.step != ScanStep::Saving || self.pending_save != Some(save_id) {
            return Transition::ignored();
        }
        self.pending_save = None;

        match result {
            Ok(()) => {
                self.step = ScanStep::Success;
                let id = self.timers.schedule(TimerKind::SuccessReset);
                Transition::handled(vec![ScanEffect::ScheduleTimer {
                    id,
                    delay: self.timings.success_reset_delay,
                }])
            }
            Err(message) => {
                self.fail(message);
                self.processing = false;
                Transition::handled(Vec::new())
            }
        }
    }

    fn on_camera_failed(&mut self, message: Option<String>) -> Transition {
        if !self.step.is_scanning() {
            return Transition::ignored();
        }
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CAMERA_ERROR.to_string());
        tracing::warn!(error = %message, "Camera unavailable");
        self.camera_error = Some(message);
        Transition::handled(Vec::new())
    }

    fn on_retry_camera(&mut self) -> Transition {
        if self.camera_error.take().is_none() {
            return Transition::ignored();
        }
        Transition::handled(vec![self.restart_capture()])
    }

    /// The save fires only once both values are present while in `scan_luma`,
    /// regardless of the order in which they arrived.
    fn maybe_start_save(&mut self) -> Option<ScanEffect> {
        if self.step != ScanStep::ScanLuma {
            return None;
        }
        let (Some(badge_code), Some(ticket_url)) = (&self.badge_code, &self.ticket_url) else {
            return None;
        };

        self.next_save_id += 1;
        let effect = ScanEffect::StartSave {
            save_id: self.next_save_id,
            badge_code: badge_code.clone(),
            ticket_url: ticket_url.clone(),
        };
        self.pending_save = Some(self.next_save_id);
        self.step = ScanStep::Saving;
        Some(effect)
    }

    fn fail(&mut self, message: String) {
        self.step = ScanStep::Error;
        self.error_message = Some(message);
    }

    fn restart_capture(&mut self) -> ScanEffect {
        self.capture_generation += 1;
        ScanEffect::RestartCapture {
            generation: self.capture_generation,
        }
    }

    fn full_reset(&mut self) -> Vec<ScanEffect> {
        let mut effects = Vec::new();
        let cancelled = self.timers.drain();
        if !cancelled.is_empty() {
            effects.push(ScanEffect::CancelTimers(cancelled));
        }

        self.step = ScanStep::ScanBadge;
        self.badge_code = None;
        self.ticket_url = None;
        self.error_message = None;
        self.camera_error = None;
        self.processing = false;
        self.pending_save = None;
        effects.push(self.restart_capture());
        effects
    }
}
