//! Brings the driver from closed to a powered, subscribed device with a
//! non-empty network list.
//!
//! 将驱动从关闭状态带到已上电、已订阅且网络列表非空的设备。

use crate::{
    driver::{ApiResponse, Command, CommandArgs, DeviceStatus, DriverBackend, DriverFacade},
    session::script::{ScriptCursor, ScriptStatus},
};
use tracing::{debug, warn};

pub(crate) const SCANNING_MESSAGE: &str = "Scanning for best possible connection.";
pub(crate) const NO_NETWORK_MESSAGE: &str = "No WiMax network found.";
pub(crate) const DEVICE_REMOVED_MESSAGE: &str = "Device removed.";
pub(crate) const CARD_INVALID_MESSAGE: &str = "Card is invalid.";
pub(crate) const CARD_MISSING_MESSAGE: &str = "WiMax card missing, cannot initialize.";
pub(crate) const CALL_FAILURE_MESSAGE: &str = "Call failure.";

pub(crate) const SCRIPT: &[Command] = &[
    Command::WiMaxApiOpen,
    Command::GetListDevice,
    Command::WiMaxDeviceOpen,
    Command::SubscribeConnectToNetwork,
    Command::SubscribeDeviceInsertRemove,
    Command::SubscribeDisconnectToNetwork,
    Command::SubscribeControlPowerManagement,
    Command::SubscribeNetworkSearchWideScan,
    Command::SubscribePackageUpdate,
    Command::SubscribeProvisioningOperation,
    Command::SubscribeDeviceStatusChange,
    Command::GetDeviceStatus,
    Command::CmdControlPowerManagementOn,
    Command::GetDeviceStatus,
    Command::GetNetworkList,
    Command::GetDeviceStatus,
];

/// Picks the message for a lost card. `InvalidDevice` is ambiguous, so the
/// devices are enumerated again to tell a pulled card from a broken one.
///
/// 为丢失的网卡选择消息。`InvalidDevice` 含义不明确，因此重新枚举设备，
/// 以区分被拔出的网卡和损坏的网卡。
pub(crate) async fn device_lost_message<B: DriverBackend>(
    driver: &mut DriverFacade<B>,
    response: ApiResponse,
) -> &'static str {
    if response == ApiResponse::InvalidDevice && driver.is_card_connected().await {
        CARD_INVALID_MESSAGE
    } else {
        CARD_MISSING_MESSAGE
    }
}

#[derive(Debug)]
pub(crate) struct Initializing {
    cursor: ScriptCursor,
    failed_scans: u32,
    message: Option<&'static str>,
}

impl Initializing {
    pub(crate) fn new() -> Self {
        Self {
            cursor: ScriptCursor::new(SCRIPT),
            failed_scans: 0,
            message: None,
        }
    }

    pub(crate) fn cursor(&self) -> &ScriptCursor {
        &self.cursor
    }

    pub(crate) fn message(&self) -> Option<&'static str> {
        self.message
    }

    /// Runs one step. `scan_budget` bounds the failed or empty network list
    /// fetches tolerated in a row.
    pub(crate) async fn execute<B: DriverBackend>(
        &mut self,
        driver: &mut DriverFacade<B>,
        scan_budget: u32,
    ) -> ScriptStatus {
        self.message = None;
        let Some(command) = self.cursor.start_or_current() else {
            return ScriptStatus::Completed;
        };
        let response = driver.execute_or_fail(command, CommandArgs::None).await;
        debug!(%command, %response, step = ?self.cursor.position(), "Initialization step");

        match response {
            ApiResponse::Success => self.on_success(command, driver, scan_budget),
            _ if command == Command::CmdControlPowerManagementOn => {
                warn!(%response, "Radio power-on refused, continuing");
                self.step_forward()
            }
            response if response.is_device_lost() => {
                let message = device_lost_message(driver, response).await;
                self.fail(message)
            }
            ApiResponse::Failed => match command {
                Command::GetNetworkList => self.on_empty_scan(scan_budget),
                Command::GetListDevice => self.fail(DEVICE_REMOVED_MESSAGE),
                _ => self.fail(CALL_FAILURE_MESSAGE),
            },
            // Anything else is retried in place until the goal changes.
            _ => {
                debug!(%command, %response, "Step refused, retrying");
                ScriptStatus::Running
            }
        }
    }

    fn on_success<B: DriverBackend>(
        &mut self,
        command: Command,
        driver: &DriverFacade<B>,
        scan_budget: u32,
    ) -> ScriptStatus {
        let ctx = driver.context();
        match command {
            Command::GetListDevice if !ctx.has_device() => self.fail(DEVICE_REMOVED_MESSAGE),
            Command::GetNetworkList if ctx.networks().is_empty() => self.on_empty_scan(scan_budget),
            Command::GetNetworkList => {
                self.failed_scans = 0;
                self.step_forward()
            }
            Command::GetDeviceStatus => match ctx.device_status() {
                Some(DeviceStatus::Ready | DeviceStatus::Uninitialized | DeviceStatus::DataConnected) => {
                    self.step_forward()
                }
                Some(status) if status.is_busy() => {
                    if self.cursor.previous() == Some(Command::GetNetworkList) {
                        self.cursor.rewind(2);
                    }
                    self.message = Some(SCANNING_MESSAGE);
                    ScriptStatus::Scanning
                }
                // Power-on comes next and may bring the radio up.
                Some(status)
                    if status.is_rf_off()
                        && self.cursor.next() == Some(Command::CmdControlPowerManagementOn) =>
                {
                    self.step_forward()
                }
                _ => ScriptStatus::Running,
            },
            _ => self.step_forward(),
        }
    }

    fn on_empty_scan(&mut self, scan_budget: u32) -> ScriptStatus {
        self.failed_scans += 1;
        if self.failed_scans >= scan_budget {
            warn!(attempts = self.failed_scans, "Giving up on network scan");
            self.failed_scans = 0;
            return self.fail(NO_NETWORK_MESSAGE);
        }
        debug!(attempts = self.failed_scans, "No network visible yet");
        self.message = Some(SCANNING_MESSAGE);
        ScriptStatus::Scanning
    }

    fn step_forward(&mut self) -> ScriptStatus {
        if self.cursor.advance() {
            ScriptStatus::Completed
        } else {
            ScriptStatus::Running
        }
    }

    fn fail(&mut self, message: &'static str) -> ScriptStatus {
        self.cursor.reset();
        self.message = Some(message);
        ScriptStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::DriverConfig,
        driver::{DriverReply, HardwareDeviceId, ReplyPayload, mock::ScriptedBackend},
    };

    async fn run_to_end(
        state: &mut Initializing,
        driver: &mut DriverFacade<ScriptedBackend>,
        budget: u32,
    ) -> Vec<ScriptStatus> {
        let mut statuses = Vec::new();
        for _ in 0..64 {
            let status = state.execute(driver, budget).await;
            statuses.push(status);
            if matches!(status, ScriptStatus::Completed | ScriptStatus::Failed) {
                break;
            }
        }
        statuses
    }

    #[tokio::test]
    async fn test_healthy_device_completes_in_script_order() {
        let backend = ScriptedBackend::new();
        let mut driver = DriverFacade::new(backend.clone(), DriverConfig::default());
        let mut state = Initializing::new();

        let statuses = run_to_end(&mut state, &mut driver, 10).await;
        assert_eq!(statuses.len(), SCRIPT.len());
        assert_eq!(statuses.last(), Some(&ScriptStatus::Completed));
        assert_eq!(backend.commands(), SCRIPT.to_vec());
        assert_eq!(state.cursor().position(), None);
    }

    #[tokio::test]
    async fn test_scanning_after_network_list_rewinds() {
        let backend = ScriptedBackend::new();
        let mut driver = DriverFacade::new(backend.clone(), DriverConfig::default());
        let mut state = Initializing::new();

        for _ in 0..15 {
            state.execute(&mut driver, 10).await;
        }
        assert_eq!(state.cursor().position(), Some(15));

        backend.push_reply(
            Command::GetDeviceStatus,
            DriverReply::with(ReplyPayload::DeviceStatus {
                status: DeviceStatus::Scanning,
                progress: None,
            }),
        );
        let status = state.execute(&mut driver, 10).await;
        assert_eq!(status, ScriptStatus::Scanning);
        assert_eq!(state.message(), Some(SCANNING_MESSAGE));
        assert_eq!(state.cursor().position(), Some(13));
    }

    #[tokio::test]
    async fn test_power_on_failure_is_tolerated() {
        let backend = ScriptedBackend::new();
        backend.push_reply(
            Command::CmdControlPowerManagementOn,
            DriverReply::code(ApiResponse::Failed),
        );
        let mut driver = DriverFacade::new(backend.clone(), DriverConfig::default());
        let mut state = Initializing::new();

        let statuses = run_to_end(&mut state, &mut driver, 10).await;
        assert_eq!(statuses.last(), Some(&ScriptStatus::Completed));
    }

    #[tokio::test]
    async fn test_rf_off_before_power_on_advances() {
        let backend = ScriptedBackend::new();
        backend.push_reply(
            Command::GetDeviceStatus,
            DriverReply::with(ReplyPayload::DeviceStatus {
                status: DeviceStatus::RfOffSw,
                progress: None,
            }),
        );
        let mut driver = DriverFacade::new(backend.clone(), DriverConfig::default());
        let mut state = Initializing::new();

        let statuses = run_to_end(&mut state, &mut driver, 10).await;
        assert_eq!(statuses.last(), Some(&ScriptStatus::Completed));
    }

    #[tokio::test]
    async fn test_empty_device_list_fails() {
        let backend = ScriptedBackend::new();
        backend.push_reply(
            Command::GetListDevice,
            DriverReply::with(ReplyPayload::Devices(Vec::new())),
        );
        let mut driver = DriverFacade::new(backend.clone(), DriverConfig::default());
        let mut state = Initializing::new();

        let statuses = run_to_end(&mut state, &mut driver, 10).await;
        assert_eq!(statuses, vec![ScriptStatus::Running, ScriptStatus::Failed]);
        assert_eq!(state.message(), Some(DEVICE_REMOVED_MESSAGE));
        assert_eq!(state.cursor().position(), None);
    }

    #[tokio::test]
    async fn test_invalid_device_fails() {
        let backend = ScriptedBackend::new();
        backend.push_reply(
            Command::WiMaxDeviceOpen,
            DriverReply::code(ApiResponse::InvalidDevice),
        );
        let mut driver = DriverFacade::new(backend.clone(), DriverConfig::default());
        let mut state = Initializing::new();

        let statuses = run_to_end(&mut state, &mut driver, 10).await;
        assert_eq!(statuses.last(), Some(&ScriptStatus::Failed));
        assert_eq!(state.message(), Some(CARD_INVALID_MESSAGE));
    }

    #[tokio::test]
    async fn test_invalid_device_after_card_pulled_reports_missing() {
        let backend = ScriptedBackend::new();
        backend.push_reply(
            Command::GetListDevice,
            DriverReply::with(ReplyPayload::Devices(vec![HardwareDeviceId {
                device_index: 0,
                device_name: "wimax0".into(),
                device_type: 1,
            }])),
        );
        backend.set_default(
            Command::GetListDevice,
            DriverReply::with(ReplyPayload::Devices(Vec::new())),
        );
        backend.push_reply(
            Command::WiMaxDeviceOpen,
            DriverReply::code(ApiResponse::InvalidDevice),
        );
        let mut driver = DriverFacade::new(backend.clone(), DriverConfig::default());
        let mut state = Initializing::new();

        let statuses = run_to_end(&mut state, &mut driver, 10).await;
        assert_eq!(statuses.last(), Some(&ScriptStatus::Failed));
        assert_eq!(state.message(), Some(CARD_MISSING_MESSAGE));
        assert_eq!(backend.count(Command::GetListDevice), 2);
    }

    #[tokio::test]
    async fn test_device_missing_skips_enumeration() {
        let backend = ScriptedBackend::new();
        backend.push_reply(
            Command::WiMaxDeviceOpen,
            DriverReply::code(ApiResponse::DeviceMissing),
        );
        let mut driver = DriverFacade::new(backend.clone(), DriverConfig::default());
        let mut state = Initializing::new();

        let statuses = run_to_end(&mut state, &mut driver, 10).await;
        assert_eq!(statuses.last(), Some(&ScriptStatus::Failed));
        assert_eq!(state.message(), Some(CARD_MISSING_MESSAGE));
        assert_eq!(backend.count(Command::GetListDevice), 1);
    }

    #[tokio::test]
    async fn test_refused_step_retries_in_place() {
        let backend = ScriptedBackend::new();
        backend.push_reply(
            Command::WiMaxDeviceOpen,
            DriverReply::code(ApiResponse::PermissionDenied),
        );
        backend.push_reply(
            Command::WiMaxDeviceOpen,
            DriverReply::code(ApiResponse::InvalidParameter),
        );
        let mut driver = DriverFacade::new(backend.clone(), DriverConfig::default());
        let mut state = Initializing::new();

        state.execute(&mut driver, 10).await;
        state.execute(&mut driver, 10).await;
        assert_eq!(state.execute(&mut driver, 10).await, ScriptStatus::Running);
        assert_eq!(state.execute(&mut driver, 10).await, ScriptStatus::Running);
        assert_eq!(state.cursor().position(), Some(2));
        assert_eq!(state.message(), None);

        state.execute(&mut driver, 10).await;
        assert_eq!(state.cursor().position(), Some(3));
        assert_eq!(backend.count(Command::WiMaxDeviceOpen), 3);
    }

    #[tokio::test]
    async fn test_generic_failure_is_call_failure() {
        let backend = ScriptedBackend::new();
        backend.push_reply(
            Command::SubscribePackageUpdate,
            DriverReply::code(ApiResponse::Failed),
        );
        let mut driver = DriverFacade::new(backend.clone(), DriverConfig::default());
        let mut state = Initializing::new();

        let statuses = run_to_end(&mut state, &mut driver, 10).await;
        assert_eq!(statuses.last(), Some(&ScriptStatus::Failed));
        assert_eq!(state.message(), Some(CALL_FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_network_scan_budget() {
        let backend = ScriptedBackend::new();
        backend.set_default(Command::GetNetworkList, DriverReply::code(ApiResponse::Failed));
        let mut driver = DriverFacade::new(backend.clone(), DriverConfig::default());
        let mut state = Initializing::new();

        let statuses = run_to_end(&mut state, &mut driver, 3).await;
        let scans = statuses
            .iter()
            .filter(|s| **s == ScriptStatus::Scanning)
            .count();
        assert_eq!(scans, 2);
        assert_eq!(statuses.last(), Some(&ScriptStatus::Failed));
        assert_eq!(state.message(), Some(NO_NETWORK_MESSAGE));
        assert_eq!(backend.count(Command::GetNetworkList), 3);
    }
}
