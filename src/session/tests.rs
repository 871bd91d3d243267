//! Tests for the session state machine, driven tick by tick.

use super::{
    machine::SessionStateMachine,
    state::{Goal, LifecycleState, WimaxState},
    states::{connected, disconnecting, initializing},
};
use crate::{
    config::Config,
    driver::{
        ApiResponse, Command, CommandArgs, DeviceStatus, DriverEvent, DriverReply, PowerState,
        ReplyPayload, mock::ScriptedBackend,
    },
    error::Error,
    events::SessionEvent,
};
use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc;

struct Harness {
    machine: SessionStateMachine<ScriptedBackend>,
    backend: ScriptedBackend,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl Harness {
    fn new() -> Self {
        Self::with_backend(ScriptedBackend::new())
    }

    fn with_backend(backend: ScriptedBackend) -> Self {
        let (tx, events_rx) = mpsc::unbounded_channel();
        let machine = SessionStateMachine::new(Config::default(), backend.clone(), Arc::new(tx));
        Self {
            machine,
            backend,
            events_rx,
        }
    }

    /// Ticks until `done` holds, panicking after `max` ticks.
    async fn tick_until(
        &mut self,
        max: usize,
        done: impl Fn(&SessionStateMachine<ScriptedBackend>) -> bool,
    ) -> usize {
        for ticks in 1..=max {
            self.machine.tick().await;
            if done(&self.machine) {
                return ticks;
            }
        }
        panic!(
            "condition not reached within {max} ticks, state {:?}",
            self.machine.current_state()
        );
    }

    async fn tick_until_state(&mut self, state: LifecycleState) -> usize {
        self.tick_until(200, |m| m.current_state() == state).await
    }

    async fn ticks(&mut self, count: usize) {
        for _ in 0..count {
            self.machine.tick().await;
        }
    }

    fn drain(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn drain_states(&mut self) -> Vec<WimaxState> {
        self.drain()
            .into_iter()
            .filter_map(|event| match event {
                SessionEvent::StateChanged { state, .. } => Some(state),
                _ => None,
            })
            .collect()
    }

    async fn connect(&mut self) {
        self.machine.set_goal(Goal::Connected);
        self.tick_until_state(LifecycleState::Connected).await;
    }
}

fn device_status(status: DeviceStatus) -> DriverReply {
    DriverReply::with(ReplyPayload::DeviceStatus {
        status,
        progress: None,
    })
}

#[tokio::test]
async fn test_first_tick_reports_ready_once() {
    let mut h = Harness::new();
    h.ticks(5).await;

    let events = h.drain();
    assert_eq!(
        events,
        vec![SessionEvent::StateChanged {
            state: WimaxState::Ready,
            previous: WimaxState::Unknown,
            bsid: None,
        }]
    );
    assert!(h.backend.commands().is_empty());
}

#[tokio::test]
async fn test_ascent_with_one_empty_network_list() {
    let mut h = Harness::new();
    h.backend.push_reply(
        Command::GetNetworkList,
        DriverReply::with(ReplyPayload::Networks(Vec::new())),
    );

    h.connect().await;
    h.ticks(6).await;

    assert_eq!(
        h.drain_states(),
        vec![
            WimaxState::Ready,
            WimaxState::Initializing,
            WimaxState::Scanning,
            WimaxState::Initialized,
            WimaxState::Connecting,
            WimaxState::Connected,
        ]
    );
    assert_eq!(h.backend.count(Command::GetNetworkList), 2);
}

#[tokio::test]
async fn test_connected_event_carries_bsid() {
    let mut h = Harness::new();
    h.connect().await;

    let bsid = h.drain().into_iter().find_map(|event| match event {
        SessionEvent::StateChanged {
            state: WimaxState::Connected,
            bsid,
            ..
        } => bsid,
        _ => None,
    });
    assert_eq!(bsid.as_deref(), Some("00:00:01:80:00:01"));
}

#[tokio::test]
async fn test_failed_health_probe_reconnects() {
    let mut h = Harness::new();
    h.connect().await;
    h.drain();

    h.backend.push_reply(
        Command::GetDeviceStatus,
        DriverReply::code(ApiResponse::Failed),
    );
    h.machine.tick().await;
    assert_eq!(h.machine.current_state(), LifecycleState::Connecting);
    assert_eq!(h.drain_states(), vec![WimaxState::Connecting]);

    h.tick_until_state(LifecycleState::Connected).await;
    assert_eq!(h.drain_states(), vec![WimaxState::Connected]);
}

#[tokio::test]
async fn test_device_missing_mid_initialization_returns_to_ready() {
    let mut h = Harness::new();
    h.backend.push_reply(
        Command::GetListDevice,
        DriverReply::with(ReplyPayload::Devices(Vec::new())),
    );

    h.machine.set_goal(Goal::Connected);
    h.tick_until(50, |m| {
        m.current_state() == LifecycleState::Ready && m.goal() == Goal::Ready
    })
    .await;

    assert_eq!(
        h.drain_states(),
        vec![
            WimaxState::Ready,
            WimaxState::Initializing,
            WimaxState::Disconnecting,
            WimaxState::Disconnected,
            WimaxState::Ready,
        ]
    );
    assert_eq!(
        h.machine.final_message(),
        Some(initializing::DEVICE_REMOVED_MESSAGE)
    );

    // The next ascent starts from the top of the script.
    h.machine.set_goal(Goal::Initialized);
    h.backend.clear_log();
    h.machine.tick().await;
    assert_eq!(h.machine.current_state(), LifecycleState::Initializing);
    assert_eq!(h.machine.script_position(), None);
    h.machine.tick().await;
    assert_eq!(h.backend.commands(), vec![Command::WiMaxApiOpen]);
}

#[tokio::test]
async fn test_goal_change_mid_connect_runs_full_teardown() {
    let mut h = Harness::new();
    h.machine.set_goal(Goal::Connected);
    h.tick_until_state(LifecycleState::Connecting).await;
    h.machine.tick().await;
    assert_eq!(h.machine.script_position(), Some(1));

    h.backend.clear_log();
    h.machine.set_goal(Goal::Ready);
    h.drain();
    h.tick_until_state(LifecycleState::Ready).await;

    assert_eq!(h.backend.commands(), disconnecting::SCRIPT.to_vec());
    assert_eq!(
        h.drain_states(),
        vec![
            WimaxState::Disconnecting,
            WimaxState::Disconnected,
            WimaxState::Ready,
        ]
    );
    assert!(!h.machine.context().api_opened());
}

#[tokio::test]
async fn test_teardown_ignores_goal_reversal() {
    let mut h = Harness::new();
    h.connect().await;
    h.machine.set_goal(Goal::Disconnected);
    h.machine.tick().await;
    assert_eq!(h.machine.current_state(), LifecycleState::Disconnecting);

    h.machine.tick().await;
    h.machine.set_goal(Goal::Connected);
    h.backend.clear_log();
    h.tick_until_state(LifecycleState::Disconnected).await;
    assert_eq!(
        h.backend.commands(),
        disconnecting::SCRIPT[1..].to_vec()
    );

    // Only after teardown does the machine head back up.
    h.machine.tick().await;
    assert_eq!(h.machine.current_state(), LifecycleState::Initializing);
}

#[tokio::test]
async fn test_disconnected_goal_rests_in_disconnected() {
    let mut h = Harness::new();
    h.connect().await;
    h.machine.set_goal(Goal::Disconnected);
    h.tick_until_state(LifecycleState::Disconnected).await;
    h.drain();

    h.ticks(5).await;
    assert_eq!(h.machine.current_state(), LifecycleState::Disconnected);
    assert!(h.drain().is_empty());
}

#[tokio::test]
async fn test_initialized_goal_stops_before_connecting() {
    let mut h = Harness::new();
    h.machine.set_goal(Goal::Initialized);
    h.tick_until_state(LifecycleState::Initialized).await;
    h.ticks(5).await;

    assert_eq!(h.machine.current_state(), LifecycleState::Initialized);
    assert_eq!(h.backend.count(Command::CmdConnectToNetwork), 0);
}

#[tokio::test]
async fn test_rssi_published_only_on_change() {
    let mut h = Harness::new();
    h.connect().await;
    // Three full health cycles at the same reading.
    h.ticks(6).await;

    h.backend.set_link_rssi(53);
    h.ticks(4).await;

    let readings: Vec<i32> = h
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            SessionEvent::RssiChanged { dbm } => Some(dbm),
            _ => None,
        })
        .collect();
    assert_eq!(readings, vec![-60, -70]);
}

#[tokio::test]
async fn test_network_scan_budget_exhausted() {
    let backend = ScriptedBackend::new();
    backend.set_default(Command::GetNetworkList, DriverReply::code(ApiResponse::Failed));
    let mut h = Harness::with_backend(backend);

    h.machine.set_goal(Goal::Connected);
    h.tick_until(100, |m| {
        m.current_state() == LifecycleState::Ready && m.goal() == Goal::Ready
    })
    .await;

    assert_eq!(h.backend.count(Command::GetNetworkList), 10);
    assert_eq!(
        h.machine.final_message(),
        Some(initializing::NO_NETWORK_MESSAGE)
    );
    let states = h.drain_states();
    assert!(states.contains(&WimaxState::Disconnecting));
    assert_eq!(states.last(), Some(&WimaxState::Ready));
}

#[tokio::test]
async fn test_connect_failure_falls_back_to_ready() {
    let mut h = Harness::new();
    h.machine.set_goal(Goal::Connected);
    h.tick_until_state(LifecycleState::Connecting).await;
    h.backend.push_reply(
        Command::GetDeviceStatus,
        device_status(DeviceStatus::RfOffHw),
    );
    h.drain();

    h.ticks(2).await;
    assert_eq!(h.machine.current_state(), LifecycleState::Ready);
    assert_eq!(h.machine.goal(), Goal::Connected);
    assert_eq!(h.machine.final_message(), None);

    // The goal is untouched, so the machine climbs again.
    h.tick_until_state(LifecycleState::Connected).await;
    assert_eq!(
        h.drain_states(),
        vec![
            WimaxState::Ready,
            WimaxState::Initializing,
            WimaxState::Initialized,
            WimaxState::Connecting,
            WimaxState::Connected,
        ]
    );
}

#[tokio::test]
async fn test_missing_card_while_connecting_ends_session() {
    let backend = ScriptedBackend::new();
    backend.set_default(
        Command::CmdConnectToNetwork,
        DriverReply::code(ApiResponse::DeviceMissing),
    );
    let mut h = Harness::with_backend(backend);
    h.machine.set_goal(Goal::Connected);
    h.tick_until_state(LifecycleState::Connecting).await;
    h.drain();

    h.machine.tick().await;
    assert_eq!(h.machine.current_state(), LifecycleState::Ready);
    assert_eq!(h.machine.goal(), Goal::Ready);
    assert_eq!(
        h.machine.final_message(),
        Some(initializing::CARD_MISSING_MESSAGE)
    );

    h.ticks(50).await;
    assert_eq!(h.machine.current_state(), LifecycleState::Ready);
    assert_eq!(h.backend.count(Command::CmdConnectToNetwork), 1);
    assert_eq!(h.drain_states(), vec![WimaxState::Ready]);
}

#[tokio::test]
async fn test_invalid_card_while_connected_ends_session() {
    let mut h = Harness::new();
    h.connect().await;
    h.drain();

    h.backend.set_default(
        Command::GetDeviceStatus,
        DriverReply::code(ApiResponse::InvalidDevice),
    );
    h.tick_until(10, |m| m.current_state() == LifecycleState::Ready)
        .await;
    assert_eq!(h.machine.goal(), Goal::Ready);
    assert_eq!(
        h.machine.final_message(),
        Some(initializing::CARD_INVALID_MESSAGE)
    );

    h.backend.clear_log();
    h.ticks(50).await;
    assert_eq!(h.machine.current_state(), LifecycleState::Ready);
    assert!(h.backend.commands().is_empty());
    assert_eq!(
        h.drain_states(),
        vec![WimaxState::Connecting, WimaxState::Ready]
    );
}

#[tokio::test]
async fn test_scan_recovers_when_network_appears() {
    let backend = ScriptedBackend::new();
    backend.set_default(
        Command::GetNetworkList,
        DriverReply::with(ReplyPayload::Networks(Vec::new())),
    );
    let mut h = Harness::with_backend(backend);
    h.machine.set_goal(Goal::Connected);
    h.tick_until(50, |m| m.reported_state() == WimaxState::Scanning)
        .await;

    h.backend.clear_default(Command::GetNetworkList);
    h.tick_until_state(LifecycleState::Connected).await;
    assert_eq!(h.machine.final_message(), None);
    assert!(h.backend.count(Command::GetNetworkList) < 10);
}

#[tokio::test]
async fn test_link_down_while_connecting_rescans() {
    let mut h = Harness::new();
    h.backend.push_reply(
        Command::GetLinkStatus,
        DriverReply::code(ApiResponse::LinkNotConnected),
    );
    h.machine.set_goal(Goal::Connected);
    h.tick_until_state(LifecycleState::Connecting).await;
    h.ticks(3).await;

    assert_eq!(h.machine.current_state(), LifecycleState::Initializing);
    h.tick_until_state(LifecycleState::Connected).await;
}

#[tokio::test]
async fn test_busy_radio_while_connected_holds() {
    let mut h = Harness::new();
    h.connect().await;
    h.backend
        .push_reply(Command::GetDeviceStatus, device_status(DeviceStatus::Scanning));

    h.machine.tick().await;
    assert_eq!(h.machine.current_state(), LifecycleState::Connected);
    assert_eq!(
        h.machine.last_message(),
        Some(initializing::SCANNING_MESSAGE)
    );
    assert_eq!(h.machine.script_position(), Some(0));
}

#[tokio::test]
async fn test_poll_interval_widens_after_health_cycle() {
    let mut h = Harness::new();
    let config = Config::default();
    assert_eq!(h.machine.poll_interval(), config.session.poll_interval);

    h.connect().await;
    assert_eq!(h.machine.poll_interval(), config.session.poll_interval);
    h.machine.tick().await;
    assert_eq!(h.machine.poll_interval(), config.session.poll_interval);
    h.machine.tick().await;
    assert_eq!(
        h.machine.poll_interval(),
        config.session.connected_poll_interval
    );
    assert_eq!(connected::SCRIPT.len(), 2);
}

#[tokio::test]
async fn test_select_network_while_connected_cycles_connection() {
    let backend = ScriptedBackend::new();
    backend.set_default(
        Command::GetNetworkList,
        DriverReply::with(ReplyPayload::Networks(vec![
            ScriptedBackend::sample_nsp("CLEAR", 1),
            ScriptedBackend::sample_nsp("Rover", 2),
        ])),
    );
    let mut h = Harness::with_backend(backend);
    h.connect().await;
    h.drain();

    // Same name, different case: nothing happens.
    h.machine.select_network("clear");
    assert_eq!(h.machine.current_state(), LifecycleState::Connected);

    h.machine.select_network("Rover");
    assert_eq!(h.machine.current_state(), LifecycleState::Disconnecting);
    h.backend.clear_log();
    h.tick_until_state(LifecycleState::Connected).await;

    let connect = h
        .backend
        .requests()
        .into_iter()
        .find(|request| request.command == Command::CmdConnectToNetwork)
        .unwrap();
    assert!(matches!(connect.args, CommandArgs::Connect { nsp_id: 2, .. }));
    assert_eq!(
        h.drain_states(),
        vec![
            WimaxState::Disconnecting,
            WimaxState::Disconnected,
            WimaxState::Initializing,
            WimaxState::Initialized,
            WimaxState::Connecting,
            WimaxState::Connected,
        ]
    );
}

#[tokio::test]
async fn test_device_removal_descends() {
    let mut h = Harness::new();
    h.connect().await;

    h.machine
        .handle_driver_event(DriverEvent::DeviceInsertRemove { present: false })
        .await;
    assert_eq!(h.machine.goal(), Goal::Ready);
    h.drain();
    h.tick_until_state(LifecycleState::Ready).await;
    assert_eq!(
        h.drain_states(),
        vec![
            WimaxState::Disconnecting,
            WimaxState::Disconnected,
            WimaxState::Ready,
        ]
    );
}

#[tokio::test]
async fn test_device_insertion_requests_connection() {
    let mut h = Harness::new();
    h.machine
        .handle_driver_event(DriverEvent::DeviceInsertRemove { present: true })
        .await;
    assert_eq!(h.machine.goal(), Goal::Connected);
    assert_eq!(h.machine.context().device_present(), Some(true));
}

#[tokio::test]
async fn test_power_off_drops_connected_goal() {
    let mut h = Harness::new();
    h.machine.set_goal(Goal::Connected);
    h.machine
        .handle_driver_event(DriverEvent::ControlPowerManagement {
            state: PowerState::Off,
        })
        .await;
    assert_eq!(h.machine.goal(), Goal::Ready);
}

#[tokio::test]
async fn test_external_connect_checks_presence() {
    let mut h = Harness::new();
    h.machine
        .handle_driver_event(DriverEvent::ConnectToNetwork { status: 0 })
        .await;
    assert_eq!(h.machine.goal(), Goal::Connected);

    h.backend.set_default(
        Command::GetListDevice,
        DriverReply::with(ReplyPayload::Devices(Vec::new())),
    );
    h.machine
        .handle_driver_event(DriverEvent::DisconnectToNetwork { status: 1 })
        .await;
    assert_eq!(h.machine.goal(), Goal::Ready);
}

#[tokio::test]
async fn test_pass_through_notifications() {
    use crate::driver::{PackageUpdateStatus, ProvisioningOperationStatus};

    let mut h = Harness::new();
    h.machine
        .handle_driver_event(DriverEvent::PackageUpdate {
            status: PackageUpdateStatus::Completed,
        })
        .await;
    h.machine
        .handle_driver_event(DriverEvent::ProvisioningOperation {
            status: ProvisioningOperationStatus::Started,
            contact_type: 0,
        })
        .await;
    h.machine
        .handle_driver_event(DriverEvent::NetworkSearchWideScan {
            networks: vec![ScriptedBackend::sample_nsp("CLEAR", 1)],
        })
        .await;

    let events = h.drain();
    assert_eq!(events.len(), 3);
    assert_eq!(
        events[0],
        SessionEvent::PackageUpdate {
            message: PackageUpdateStatus::Completed.description().to_string(),
        }
    );
    assert!(matches!(events[1], SessionEvent::ProvisioningUpdate { .. }));
    assert!(matches!(events[2], SessionEvent::WideScanResults { ref networks } if networks.len() == 1));
}

#[tokio::test]
async fn test_queries_respect_state() {
    let mut h = Harness::new();
    assert!(matches!(
        h.machine.network_list().await,
        Err(Error::DeviceNotReady)
    ));
    assert!(matches!(
        h.machine.link_status().await,
        Err(Error::NotConnected)
    ));

    h.machine.set_goal(Goal::Initialized);
    h.tick_until_state(LifecycleState::Initialized).await;
    assert_eq!(h.machine.network_list().await.unwrap().len(), 1);
    assert_eq!(h.machine.device_list().await.unwrap().len(), 1);
    assert_eq!(
        h.machine.device_info().await.unwrap().vendor_name,
        "Scripted"
    );
    assert!(h.machine.provisioning_status().await.unwrap());
    assert!(matches!(
        h.machine.statistics().await,
        Err(Error::NotConnected)
    ));

    h.machine.set_goal(Goal::Connected);
    h.tick_until_state(LifecycleState::Connected).await;
    assert_eq!(h.machine.link_status().await.unwrap().rssi_dbm(), -60);
    assert_eq!(h.machine.connected_nsp().await.unwrap().name, "CLEAR");
    assert_eq!(h.machine.statistics().await.unwrap().total_rx_packets, 8);
}

#[tokio::test]
async fn test_failed_query_reports_response() {
    let mut h = Harness::new();
    h.machine.set_goal(Goal::Initialized);
    h.tick_until_state(LifecycleState::Initialized).await;

    h.backend.push_reply(
        Command::CmdNetworkSearchWideScan,
        DriverReply::code(ApiResponse::PermissionDenied),
    );
    assert!(matches!(
        h.machine.perform_wide_scan().await,
        Err(Error::QueryFailed {
            command: Command::CmdNetworkSearchWideScan,
            response: ApiResponse::PermissionDenied,
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_stalled_step_counts_as_failure() {
    let mut h = Harness::new();
    h.backend
        .push_stall(Command::WiMaxDeviceOpen, Duration::from_secs(120));
    h.machine.set_goal(Goal::Connected);
    h.tick_until(50, |m| {
        m.current_state() == LifecycleState::Ready && m.goal() == Goal::Ready
    })
    .await;
    assert_eq!(
        h.machine.final_message(),
        Some(initializing::CALL_FAILURE_MESSAGE)
    );
}
