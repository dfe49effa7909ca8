//! Common test utilities for controller integration tests.
//!
//! [`rig`] builds a controller wired entirely to mock devices and returns
//! the control handles next to it, so a test can present cards and inspect
//! every actuator and the modem link afterwards.

#![allow(dead_code)]

use std::time::Duration;

use cardgate_controller::{
    AccessController, Authenticator, ControllerConfig, Peripherals, StaticDirectory,
};
use cardgate_hardware::mock::{
    MockBuzzer, MockBuzzerHandle, MockDisplay, MockDisplayHandle, MockRelay, MockRelayHandle,
    MockRfid, MockRfidHandle, MockSerialHandle, MockSerialLink,
};
use cardgate_modem::{ConnectivityMonitor, ModemTransport, NotificationDispatcher};

pub type MockController =
    AccessController<MockRfid, MockDisplay, MockRelay, MockBuzzer, MockSerialLink, StaticDirectory>;

pub struct Rig {
    pub controller: MockController,
    pub card: MockRfidHandle,
    pub display: MockDisplayHandle,
    pub relay: MockRelayHandle,
    pub buzzer: MockBuzzerHandle,
    pub modem: MockSerialHandle,
}

/// Started controller with the default configuration. When `online`, the
/// modem answers the startup probe and the controller reports grants.
///
/// The probe write is cleared from the modem log. The boot dwell has
/// already elapsed when this returns, so uptime starts at the dwell.
pub async fn rig(online: bool) -> Rig {
    rig_with_config(online, ControllerConfig::default()).await
}

pub async fn rig_with_config(online: bool, config: ControllerConfig) -> Rig {
    let (link, modem) = MockSerialLink::new();
    if online {
        modem.reply_to("AT", "OK\r\n", Duration::from_millis(200));
    }

    let monitor = ConnectivityMonitor::new(ModemTransport::new(link).into_shared());
    monitor.probe().await;
    modem.clear_written();

    let dispatcher = NotificationDispatcher::new(monitor.clone(), config.reporting.clone());
    let authenticator = Authenticator::new(config.static_directory());

    let (reader, card) = MockRfid::new();
    let (display, display_handle) = MockDisplay::new();
    let (relay, relay_handle) = MockRelay::new();
    let (buzzer, buzzer_handle) = MockBuzzer::new();

    let mut controller = AccessController::new(
        Peripherals {
            reader,
            display,
            relay,
            buzzer,
        },
        authenticator,
        monitor,
        dispatcher,
        config.timing,
    );
    controller.start().await.expect("mock display starts");

    Rig {
        controller,
        card,
        display: display_handle,
        relay: relay_handle,
        buzzer: buzzer_handle,
        modem,
    }
}

/// Uptime embedded in a notification payload, if any.
pub fn notification_uptime(payload: &str) -> Option<u64> {
    let marker = " at ";
    let start = payload.rfind(marker)? + marker.len();
    let digits: String = payload[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}
