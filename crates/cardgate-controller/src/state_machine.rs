//! Access cycle state machine.
//!
//! Tracks where the controller is inside one card cycle and rejects any
//! transition the cycle does not allow. Every accepted transition is kept in
//! a bounded history for diagnostics.
//!
//! # States
//!
//! - `Idle`: polling the reader, draining modem output
//! - `Reading`: UID captured, in-progress indicator shown
//! - `Deciding`: classifying the card
//! - `Granting`: success melody, relay hold, notification
//! - `Denying`: failure melody
//! - `Cooldown`: outcome held on screen
//!
//! # Valid Transitions
//!
//! - Idle → Reading → Deciding → Granting/Denying
//! - Granting → Cooldown → Idle
//! - Denying → Cooldown → Idle
//!
//! # Examples
//!
//! ```
//! use cardgate_controller::{ControllerState, StateMachine};
//!
//! let mut machine = StateMachine::new();
//! machine.transition_to(ControllerState::Reading).unwrap();
//! assert_eq!(machine.current_state(), ControllerState::Reading);
//!
//! assert!(machine.transition_to(ControllerState::Cooldown).is_err());
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use cardgate_core::{Error, Result};

/// Maximum number of transitions kept in history.
const MAX_HISTORY_SIZE: usize = 100;

/// Where the controller is in the card cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    #[default]
    Idle,
    Reading,
    Deciding,
    Granting,
    Denying,
    Cooldown,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            ControllerState::Idle => "Idle",
            ControllerState::Reading => "Reading",
            ControllerState::Deciding => "Deciding",
            ControllerState::Granting => "Granting",
            ControllerState::Denying => "Denying",
            ControllerState::Cooldown => "Cooldown",
        };
        f.write_str(state_str)
    }
}

impl ControllerState {
    /// Check if transition to target state is valid.
    pub fn can_transition_to(&self, target: &ControllerState) -> bool {
        matches!(
            (self, target),
            (ControllerState::Idle, ControllerState::Reading)
                | (ControllerState::Reading, ControllerState::Deciding)
                | (
                    ControllerState::Deciding,
                    ControllerState::Granting | ControllerState::Denying
                )
                | (
                    ControllerState::Granting | ControllerState::Denying,
                    ControllerState::Cooldown
                )
                | (ControllerState::Cooldown, ControllerState::Idle)
        )
    }
}

/// A recorded state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from: ControllerState,
    pub to: ControllerState,
    pub timestamp: Instant,
}

impl StateTransition {
    pub fn new(from: ControllerState, to: ControllerState) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }

    /// Time since the transition occurred.
    pub fn elapsed(&self) -> Duration {
        self.timestamp.elapsed()
    }
}

/// Validating state machine with bounded history.
#[derive(Debug)]
pub struct StateMachine {
    current_state: ControllerState,
    state_entered_at: Instant,
    history: VecDeque<StateTransition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            current_state: ControllerState::Idle,
            state_entered_at: Instant::now(),
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub fn current_state(&self) -> ControllerState {
        self.current_state
    }

    pub fn time_in_current_state(&self) -> Duration {
        self.state_entered_at.elapsed()
    }

    /// Transition history, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Move to `new_state` if the cycle allows it.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` and leaves the state
    /// unchanged when the transition is not allowed.
    pub fn transition_to(&mut self, new_state: ControllerState) -> Result<StateTransition> {
        if !self.current_state.can_transition_to(&new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.current_state.to_string(),
                to: new_state.to_string(),
            });
        }

        let transition = StateTransition::new(self.current_state, new_state);
        self.perform_state_change(new_state, transition.clone());
        Ok(transition)
    }

    /// Force the machine back to Idle, recording the jump.
    pub fn reset(&mut self) -> StateTransition {
        let transition = StateTransition::new(self.current_state, ControllerState::Idle);
        self.perform_state_change(ControllerState::Idle, transition.clone());
        transition
    }

    fn perform_state_change(&mut self, new_state: ControllerState, transition: StateTransition) {
        self.current_state = new_state;
        self.state_entered_at = transition.timestamp;

        self.history.push_back(transition);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
