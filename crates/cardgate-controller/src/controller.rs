//! The access cycle.
//!
//! [`AccessController`] owns the peripherals and runs one card at a time:
//! read, classify, give feedback, report, hold the outcome, return to idle.
//! Every wait inside a cycle is awaited to completion, so the reader is not
//! polled again until the previous card has been fully handled.
//!
//! # Cycle
//!
//! ```text
//! Idle ──card──> Reading ──> Deciding ──granted──> Granting ──┐
//!   ^                             └───denied───> Denying ───┤
//!   └──────────────────────── Cooldown <──────────────────────┘
//! ```
//!
//! Physical access never depends on connectivity: an offline controller
//! grants and denies exactly as an online one, it only skips the report.

use std::time::Duration;

use cardgate_core::{AccessDecision, CardUid, ConnectivityState, Error, Result};
use cardgate_hardware::{DisplayDevice, RelayDevice, RfidDevice, SerialLink, ToneDevice};
use cardgate_modem::{ConnectivityMonitor, DispatchOutcome, NotificationDispatcher};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::authenticator::Authenticator;
use crate::config::TimingConfig;
use crate::directory::Directory;
use crate::feedback::{FAILURE_MELODY, Melody, SUCCESS_MELODY};
use crate::screen::{Frame, StatusScreen};
use crate::state_machine::{ControllerState, StateMachine};

/// The devices attached to one entry point.
#[derive(Debug)]
pub struct Peripherals<R, D, A, T> {
    pub reader: R,
    pub display: D,
    pub relay: A,
    pub buzzer: T,
}

/// What one call to [`AccessController::poll_once`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No card; `drained_lines` modem lines were forwarded to the log.
    Idle { drained_lines: usize },
    /// A card was seen but its UID could not be read.
    ReadFailed,
    /// A full card cycle ran.
    Completed {
        uid: CardUid,
        decision: AccessDecision,
        notification: DispatchOutcome,
    },
}

/// Single-entry-point access controller.
pub struct AccessController<R, D, A, T, L, Dir> {
    peripherals: Peripherals<R, D, A, T>,
    authenticator: Authenticator<Dir>,
    monitor: ConnectivityMonitor<L>,
    dispatcher: NotificationDispatcher<L>,
    screen: StatusScreen,
    machine: StateMachine,
    timing: TimingConfig,
    started_at: Instant,
}

impl<R, D, A, T, L, Dir> AccessController<R, D, A, T, L, Dir>
where
    R: RfidDevice,
    D: DisplayDevice,
    A: RelayDevice,
    T: ToneDevice,
    L: SerialLink,
    Dir: Directory,
{
    pub fn new(
        peripherals: Peripherals<R, D, A, T>,
        authenticator: Authenticator<Dir>,
        monitor: ConnectivityMonitor<L>,
        dispatcher: NotificationDispatcher<L>,
        timing: TimingConfig,
    ) -> Self {
        Self {
            peripherals,
            authenticator,
            monitor,
            dispatcher,
            screen: StatusScreen::default(),
            machine: StateMachine::new(),
            timing,
            started_at: Instant::now(),
        }
    }

    /// Use a screen sized for a different panel.
    #[must_use]
    pub fn with_screen(mut self, screen: StatusScreen) -> Self {
        self.screen = screen;
        self
    }

    pub fn state(&self) -> ControllerState {
        self.machine.current_state()
    }

    pub fn state_machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn connectivity(&self) -> ConnectivityState {
        self.monitor.state()
    }

    pub fn peripherals(&self) -> &Peripherals<R, D, A, T> {
        &self.peripherals
    }

    /// Milliseconds since the controller was created.
    pub fn uptime_millis(&self) -> u64 {
        u64::try_from(self.started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Bring up the display and show the boot and status screens.
    ///
    /// # Errors
    ///
    /// Returns `Error::DisplayInit` if the display does not initialize. The
    /// display is the only operator feedback, so callers must not continue.
    pub async fn start(&mut self) -> Result<()> {
        if let Err(e) = self.peripherals.display.init().await {
            return Err(Error::DisplayInit(e.to_string()));
        }

        match self.peripherals.reader.get_reader_info().await {
            Ok(info) => info!(
                reader = %info.name,
                protocols = ?info.protocols,
                "Card reader ready"
            ),
            Err(e) => warn!(error = %e, "Card reader did not report its info"),
        }

        let booting = self.screen.booting();
        self.show(&booting).await;
        tokio::time::sleep(self.timing.boot_dwell()).await;

        self.show_status().await;
        info!(connectivity = %self.connectivity(), "Controller started");
        Ok(())
    }

    /// Run one poll. With a card present this is a complete cycle back to
    /// Idle; without one it drains modem output and returns.
    pub async fn poll_once(&mut self) -> CycleOutcome {
        match self.peripherals.reader.is_card_present().await {
            Ok(true) => {}
            Ok(false) => {
                return CycleOutcome::Idle {
                    drained_lines: self.drain_modem().await,
                };
            }
            Err(e) => {
                warn!(error = %e, "Card presence check failed");
                return CycleOutcome::ReadFailed;
            }
        }

        let uid = match self.peripherals.reader.read_uid().await {
            Ok(uid) => uid,
            Err(e) => {
                warn!(error = %e, "Card read failed");
                return CycleOutcome::ReadFailed;
            }
        };

        self.enter(ControllerState::Reading);
        let reading = self.screen.reading(&uid);
        self.show(&reading).await;

        self.enter(ControllerState::Deciding);
        let identity = self.authenticator.classify(&uid).await;
        let decision = AccessDecision::from_identity(identity);
        info!(uid = %uid, decision = %decision, "Access decision");

        let notification = match &decision {
            AccessDecision::Granted(identity) => {
                self.enter(ControllerState::Granting);
                self.play(SUCCESS_MELODY).await;
                self.hold_relay(self.timing.relay_hold()).await;

                let notification = self.dispatcher.dispatch(&decision, self.uptime_millis()).await;
                debug!(?notification, "Notification dispatch");

                let granted = self.screen.granted(identity.label().unwrap_or_default());
                self.show(&granted).await;
                notification
            }
            AccessDecision::Denied => {
                self.enter(ControllerState::Denying);
                self.play(FAILURE_MELODY).await;

                let denied = self.screen.denied();
                self.show(&denied).await;
                DispatchOutcome::NotReported
            }
        };

        self.enter(ControllerState::Cooldown);
        tokio::time::sleep(self.timing.cooldown()).await;
        self.show_status().await;
        self.enter(ControllerState::Idle);

        CycleOutcome::Completed {
            uid,
            decision,
            notification,
        }
    }

    /// Poll forever, pausing for the poll interval after every poll.
    pub async fn run(&mut self) {
        loop {
            let outcome = self.poll_once().await;
            if let CycleOutcome::Completed { decision, .. } = &outcome {
                debug!(decision = %decision, state = %self.state(), "Cycle complete");
            }
            tokio::time::sleep(self.timing.poll_interval()).await;
        }
    }

    fn enter(&mut self, state: ControllerState) {
        trace!(
            from = %self.machine.current_state(),
            to = %state,
            after_ms = self.machine.time_in_current_state().as_millis() as u64,
            "State change"
        );
        if let Err(e) = self.machine.transition_to(state) {
            warn!(error = %e, "Unexpected state transition, resetting");
            self.machine.reset();
        }
    }

    async fn hold_relay(&mut self, hold: Duration) {
        if let Err(e) = self.peripherals.relay.set_energized(true).await {
            warn!(error = %e, "Relay energize failed");
        }
        tokio::time::sleep(hold).await;
        if let Err(e) = self.peripherals.relay.set_energized(false).await {
            warn!(error = %e, "Relay release failed");
        }
    }

    async fn play(&mut self, melody: Melody) {
        if let Err(e) = melody.play(&mut self.peripherals.buzzer).await {
            warn!(error = %e, "Melody playback failed");
        }
    }

    async fn show(&mut self, frame: &Frame) {
        if let Err(e) = self.screen.show(&mut self.peripherals.display, frame).await {
            warn!(error = %e, "Display update failed");
        }
    }

    async fn show_status(&mut self) {
        let status = self.screen.status(self.connectivity());
        self.show(&status).await;
    }

    async fn drain_modem(&mut self) -> usize {
        match self.monitor.transport() {
            Some(transport) => transport.lock().await.drain_pending().await,
            None => 0,
        }
    }
}
