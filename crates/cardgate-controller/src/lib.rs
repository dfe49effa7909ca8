//! Access decision and control loop for a single entry point.
//!
//! This crate ties the card reader, the actuators and the modem reporting
//! path into the per-card cycle.
//!
//! # Components
//!
//! - **Directory**: hex UID to user name ([`StaticDirectory`], [`TimeoutDirectory`])
//! - **Authenticator**: master card check, then directory lookup
//! - **StateMachine**: validated cycle states with bounded history
//! - **StatusScreen**: display frames per state
//! - **AccessController**: the orchestrator
//!
//! # Example
//!
//! ```no_run
//! use cardgate_controller::{
//!     AccessController, Authenticator, ControllerConfig, Peripherals, TimeoutDirectory,
//! };
//! use cardgate_hardware::mock::{MockBuzzer, MockDisplay, MockRelay, MockRfid, MockSerialLink};
//! use cardgate_modem::{ConnectivityMonitor, NotificationDispatcher};
//!
//! # async fn example() -> cardgate_core::Result<()> {
//! let config = ControllerConfig::default();
//! let directory = TimeoutDirectory::new(
//!     config.static_directory(),
//!     config.timing.directory_timeout(),
//! );
//! let authenticator = Authenticator::new(directory);
//!
//! let monitor = ConnectivityMonitor::<MockSerialLink>::detached();
//! let dispatcher = NotificationDispatcher::new(monitor.clone(), config.reporting.clone());
//!
//! let peripherals = Peripherals {
//!     reader: MockRfid::new().0,
//!     display: MockDisplay::new().0,
//!     relay: MockRelay::new().0,
//!     buzzer: MockBuzzer::new().0,
//! };
//!
//! let mut controller =
//!     AccessController::new(peripherals, authenticator, monitor, dispatcher, config.timing);
//! controller.start().await?;
//! controller.run().await;
//! # Ok(())
//! # }
//! ```

pub mod authenticator;
pub mod config;
pub mod controller;
pub mod directory;
pub mod feedback;
pub mod screen;
pub mod state_machine;

pub use authenticator::Authenticator;
pub use config::{ControllerConfig, SerialConfig, TimingConfig};
pub use controller::{AccessController, CycleOutcome, Peripherals};
pub use directory::{Directory, StaticDirectory, TimeoutDirectory};
pub use feedback::{FAILURE_MELODY, Melody, Note, SUCCESS_MELODY};
pub use screen::{Frame, StatusScreen};
pub use state_machine::{ControllerState, StateMachine, StateTransition};
