//! Property-based tests for the modem reporting path.
//!
//! Each case runs on its own current-thread runtime with a paused clock, so
//! response windows cost no real time.

use std::time::Duration;

use cardgate_core::{AccessDecision, Identity};
use cardgate_hardware::mock::MockSerialLink;
use cardgate_modem::{
    ConnectivityMonitor, ModemTransport, NotificationDispatcher, NotificationEndpoint,
};
use proptest::prelude::*;

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("Failed to build test runtime")
}

/// Strategy for any decision the controller can produce.
fn any_decision() -> impl Strategy<Value = AccessDecision> {
    prop_oneof![
        Just(AccessDecision::Denied),
        Just(AccessDecision::Granted(Identity::Master)),
        "[ -~]{0,32}".prop_map(|name| AccessDecision::Granted(Identity::NamedUser { name })),
    ]
}

/// Strategy for what a modem may say when a connection cannot be opened.
fn failure_reply() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("ERROR\r\n"),
        Just("CLOSED\r\n"),
        Just("DNS Fail\r\nERROR\r\n"),
        Just("ALREADY CONNECTED\r\nERROR\r\n"),
        Just("busy p...\r\n"),
    ]
}

/// Strategy for printable request bodies, including CR/LF.
fn request_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -~\r\n]{0,300}")
        .expect("Failed to create request regex strategy")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: an offline dispatcher never touches the link.
    #[test]
    fn prop_offline_dispatch_never_writes(
        decision in any_decision(),
        uptime in any::<u64>(),
        enabled in any::<bool>(),
    ) {
        let rt = paused_runtime();
        let (link, handle) = MockSerialLink::new();
        let monitor = ConnectivityMonitor::new(ModemTransport::new(link).into_shared());
        let endpoint = NotificationEndpoint { enabled, ..NotificationEndpoint::default() };
        let dispatcher = NotificationDispatcher::new(monitor, endpoint);

        rt.block_on(dispatcher.dispatch(&decision, uptime));

        prop_assert_eq!(handle.write_count(), 0);
    }

    /// Property: a post is always exactly four writes, and the announced
    /// size matches the payload byte length.
    #[test]
    fn prop_connect_and_post_four_writes(
        host in "[a-z]{1,12}\\.[a-z]{2,3}",
        port in any::<u16>(),
        request in request_text(),
    ) {
        let rt = paused_runtime();
        let (link, handle) = MockSerialLink::new();
        let mut transport = ModemTransport::new(link);

        rt.block_on(transport.connect_and_post(&host, port, &request));

        let written = handle.written();
        prop_assert_eq!(written.len(), 4);
        prop_assert_eq!(&written[0], &format!("AT+CIPSTART=\"TCP\",\"{host}\",{port}\r\n"));
        prop_assert_eq!(&written[1], &format!("AT+CIPSEND={}\r\n", request.len()));
        prop_assert_eq!(&written[2], &request);
        prop_assert_eq!(&written[3], "AT+CIPCLOSE\r\n");
    }

    /// Property: a refused or failed connection does not cut the exchange
    /// short; size, payload and close are still written.
    #[test]
    fn prop_connect_and_post_ignores_failed_steps(
        connect_reply in failure_reply(),
        send_reply in failure_reply(),
        delay_ms in 0u64..2000,
        request in request_text(),
    ) {
        let rt = paused_runtime();
        let (link, handle) = MockSerialLink::new();
        handle.queue_reply(connect_reply, Duration::from_millis(delay_ms));
        handle.queue_reply(send_reply, Duration::from_millis(delay_ms / 2));
        let mut transport = ModemTransport::new(link);

        rt.block_on(transport.connect_and_post("maker.ifttt.com", 80, &request));

        let written = handle.written();
        prop_assert_eq!(written.len(), 4);
        prop_assert!(written[0].starts_with("AT+CIPSTART="));
        prop_assert_eq!(&written[1], &format!("AT+CIPSEND={}\r\n", request.len()));
        prop_assert_eq!(&written[2], &request);
        prop_assert_eq!(&written[3], "AT+CIPCLOSE\r\n");
    }
}
