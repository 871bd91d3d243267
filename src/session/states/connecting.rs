//! Attaches to an NSP and waits for the data path to come up.
//! 附着到 NSP 并等待数据路径建立。

use crate::{
    driver::{
        ApiResponse, Command, CommandArgs, ConnectionProgress, DeviceStatus, DriverBackend,
        DriverFacade,
    },
    session::{
        script::{ScriptCursor, ScriptStatus},
        states::initializing::device_lost_message,
    },
};
use tracing::{debug, warn};

pub(crate) const SCRIPT: &[Command] = &[
    Command::CmdConnectToNetwork,
    Command::GetDeviceStatus,
    Command::GetLinkStatus,
    Command::GetIpInterfaceIndex,
];

#[derive(Debug)]
pub(crate) struct Connecting {
    cursor: ScriptCursor,
    message: Option<&'static str>,
}

impl Connecting {
    pub(crate) fn new() -> Self {
        Self {
            cursor: ScriptCursor::new(SCRIPT),
            message: None,
        }
    }

    pub(crate) fn cursor(&self) -> &ScriptCursor {
        &self.cursor
    }

    /// Set when the last step failed because the card is gone.
    /// 当上一步因网卡丢失而失败时设置。
    pub(crate) fn message(&self) -> Option<&'static str> {
        self.message
    }

    /// Runs one step, connecting to `preferred_nsp` when it is visible and to
    /// the first visible NSP otherwise.
    pub(crate) async fn execute<B: DriverBackend>(
        &mut self,
        driver: &mut DriverFacade<B>,
        preferred_nsp: &str,
    ) -> ScriptStatus {
        self.message = None;
        let Some(command) = self.cursor.start_or_current() else {
            return ScriptStatus::Completed;
        };
        match command {
            Command::CmdConnectToNetwork => self.connect(driver, preferred_nsp).await,
            Command::GetDeviceStatus => self.probe_device(driver).await,
            _ => self.probe_link(driver).await,
        }
    }

    async fn connect<B: DriverBackend>(
        &mut self,
        driver: &mut DriverFacade<B>,
        preferred_nsp: &str,
    ) -> ScriptStatus {
        let ctx = driver.context();
        let Some(nsp) = ctx
            .network_named(preferred_nsp)
            .or_else(|| ctx.networks().first())
        else {
            debug!("No NSP to connect to, rescanning");
            self.cursor.reset();
            return ScriptStatus::Scanning;
        };
        let args = CommandArgs::Connect {
            nsp_name: nsp.name.clone(),
            nsp_id: nsp.id,
            password: String::new(),
        };

        let response = driver
            .execute_or_fail(Command::CmdConnectToNetwork, args)
            .await;
        debug!(%response, "Connect request");
        match response {
            ApiResponse::Success | ApiResponse::AlreadyConnected => {
                self.cursor.advance();
                ScriptStatus::Running
            }
            response if response.is_device_lost() => self.device_lost(driver, response).await,
            _ => ScriptStatus::Running,
        }
    }

    async fn probe_device<B: DriverBackend>(&mut self, driver: &mut DriverFacade<B>) -> ScriptStatus {
        let response = driver
            .execute_or_fail(Command::GetDeviceStatus, CommandArgs::None)
            .await;
        if response.is_device_lost() {
            return self.device_lost(driver, response).await;
        }
        if !response.is_success() {
            return ScriptStatus::Running;
        }
        let ctx = driver.context();
        match ctx.device_status() {
            Some(DeviceStatus::DataConnected | DeviceStatus::Ready) => {
                if ctx.connection_progress() != Some(ConnectionProgress::Ranging) {
                    self.cursor.advance();
                }
                ScriptStatus::Running
            }
            Some(status) if status == DeviceStatus::Uninitialized || status.is_rf_off() => {
                debug!(?status, "Radio unavailable while connecting");
                self.cursor.reset();
                ScriptStatus::Failed
            }
            _ => ScriptStatus::Running,
        }
    }

    async fn probe_link<B: DriverBackend>(&mut self, driver: &mut DriverFacade<B>) -> ScriptStatus {
        let response = driver
            .execute_or_fail(Command::GetLinkStatus, CommandArgs::None)
            .await;
        let link_up = match response {
            ApiResponse::Success => true,
            ApiResponse::LinkNotConnected => driver.context().link_status().is_some(),
            response if response.is_device_lost() => {
                return self.device_lost(driver, response).await;
            }
            _ => return ScriptStatus::Running,
        };
        if !link_up {
            debug!("Link not up, rescanning");
            self.cursor.reset();
            return ScriptStatus::Scanning;
        }

        let response = driver
            .execute_or_fail(Command::GetIpInterfaceIndex, CommandArgs::None)
            .await;
        if !response.is_success() {
            warn!(%response, "IP interface lookup failed, continuing");
        }
        self.cursor.reset();
        ScriptStatus::Completed
    }

    async fn device_lost<B: DriverBackend>(
        &mut self,
        driver: &mut DriverFacade<B>,
        response: ApiResponse,
    ) -> ScriptStatus {
        let message = device_lost_message(driver, response).await;
        warn!(%response, message, "Card lost while connecting");
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
        driver::{DriverReply, LinkStatusInfo, ReplyPayload, mock::ScriptedBackend},
        session::states::initializing,
    };

    async fn opened(backend: &ScriptedBackend) -> DriverFacade<ScriptedBackend> {
        let mut driver = DriverFacade::new(backend.clone(), DriverConfig::default());
        driver
            .execute(Command::WiMaxApiOpen, CommandArgs::None)
            .await
            .unwrap();
        driver
            .execute(Command::GetNetworkList, CommandArgs::None)
            .await
            .unwrap();
        backend.clear_log();
        driver
    }

    #[tokio::test]
    async fn test_connects_in_three_ticks() {
        let backend = ScriptedBackend::new();
        let mut driver = opened(&backend).await;
        let mut state = Connecting::new();

        assert_eq!(state.execute(&mut driver, "CLEAR").await, ScriptStatus::Running);
        assert_eq!(state.execute(&mut driver, "CLEAR").await, ScriptStatus::Running);
        assert_eq!(state.execute(&mut driver, "CLEAR").await, ScriptStatus::Completed);
        assert_eq!(backend.commands(), SCRIPT.to_vec());
        assert_eq!(state.cursor().position(), None);
    }

    #[tokio::test]
    async fn test_prefers_selected_nsp() {
        let backend = ScriptedBackend::new();
        backend.set_default(
            Command::GetNetworkList,
            DriverReply::with(ReplyPayload::Networks(vec![
                ScriptedBackend::sample_nsp("CLEAR", 1),
                ScriptedBackend::sample_nsp("Rover", 7),
            ])),
        );
        let mut driver = opened(&backend).await;
        let mut state = Connecting::new();

        state.execute(&mut driver, "rover").await;
        let request = backend.requests().pop().unwrap();
        assert_eq!(
            request.args,
            CommandArgs::Connect {
                nsp_name: "Rover".into(),
                nsp_id: 7,
                password: String::new(),
            }
        );

        let mut state = Connecting::new();
        state.execute(&mut driver, "missing").await;
        let request = backend.requests().pop().unwrap();
        assert!(matches!(request.args, CommandArgs::Connect { nsp_id: 1, .. }));
    }

    #[tokio::test]
    async fn test_invalid_device_fails() {
        let backend = ScriptedBackend::new();
        backend.push_reply(
            Command::CmdConnectToNetwork,
            DriverReply::code(ApiResponse::InvalidDevice),
        );
        let mut driver = opened(&backend).await;
        let mut state = Connecting::new();

        assert_eq!(state.execute(&mut driver, "CLEAR").await, ScriptStatus::Failed);
        assert_eq!(state.cursor().position(), None);
        assert_eq!(state.message(), Some(initializing::CARD_INVALID_MESSAGE));
    }

    #[tokio::test]
    async fn test_missing_device_on_connect_fails() {
        let backend = ScriptedBackend::new();
        backend.push_reply(
            Command::CmdConnectToNetwork,
            DriverReply::code(ApiResponse::DeviceMissing),
        );
        let mut driver = opened(&backend).await;
        let mut state = Connecting::new();

        assert_eq!(state.execute(&mut driver, "CLEAR").await, ScriptStatus::Failed);
        assert_eq!(state.message(), Some(initializing::CARD_MISSING_MESSAGE));
        assert_eq!(backend.count(Command::CmdConnectToNetwork), 1);
    }

    #[tokio::test]
    async fn test_lost_device_on_status_probe_fails() {
        let backend = ScriptedBackend::new();
        backend.push_reply(
            Command::GetDeviceStatus,
            DriverReply::code(ApiResponse::InvalidDevice),
        );
        backend.set_default(
            Command::GetListDevice,
            DriverReply::with(ReplyPayload::Devices(Vec::new())),
        );
        let mut driver = opened(&backend).await;
        let mut state = Connecting::new();

        state.execute(&mut driver, "CLEAR").await;
        assert_eq!(state.execute(&mut driver, "CLEAR").await, ScriptStatus::Failed);
        assert_eq!(state.message(), Some(initializing::CARD_MISSING_MESSAGE));
        assert_eq!(state.cursor().position(), None);
    }

    #[tokio::test]
    async fn test_lost_device_on_link_probe_fails() {
        let backend = ScriptedBackend::new();
        backend.push_reply(
            Command::GetLinkStatus,
            DriverReply::code(ApiResponse::DeviceMissing),
        );
        let mut driver = opened(&backend).await;
        let mut state = Connecting::new();

        state.execute(&mut driver, "CLEAR").await;
        state.execute(&mut driver, "CLEAR").await;
        assert_eq!(state.execute(&mut driver, "CLEAR").await, ScriptStatus::Failed);
        assert_eq!(state.message(), Some(initializing::CARD_MISSING_MESSAGE));
        assert_eq!(backend.count(Command::GetIpInterfaceIndex), 0);
    }

    #[tokio::test]
    async fn test_other_refusals_retry_connect() {
        let backend = ScriptedBackend::new();
        backend.push_reply(
            Command::CmdConnectToNetwork,
            DriverReply::code(ApiResponse::ConnectionInProgress),
        );
        let mut driver = opened(&backend).await;
        let mut state = Connecting::new();

        assert_eq!(state.execute(&mut driver, "CLEAR").await, ScriptStatus::Running);
        assert_eq!(state.cursor().position(), Some(0));
        assert_eq!(state.message(), None);
    }

    #[tokio::test]
    async fn test_ranging_holds_the_probe() {
        let backend = ScriptedBackend::new();
        backend.push_reply(
            Command::GetDeviceStatus,
            DriverReply::with(ReplyPayload::DeviceStatus {
                status: DeviceStatus::DataConnected,
                progress: Some(ConnectionProgress::Ranging),
            }),
        );
        let mut driver = opened(&backend).await;
        let mut state = Connecting::new();

        state.execute(&mut driver, "CLEAR").await;
        assert_eq!(state.execute(&mut driver, "CLEAR").await, ScriptStatus::Running);
        assert_eq!(state.cursor().position(), Some(1));
        state.execute(&mut driver, "CLEAR").await;
        assert_eq!(state.cursor().position(), Some(2));
    }

    #[tokio::test]
    async fn test_rf_off_fails() {
        let backend = ScriptedBackend::new();
        backend.push_reply(
            Command::GetDeviceStatus,
            DriverReply::with(ReplyPayload::DeviceStatus {
                status: DeviceStatus::RfOffHw,
                progress: None,
            }),
        );
        let mut driver = opened(&backend).await;
        let mut state = Connecting::new();

        state.execute(&mut driver, "CLEAR").await;
        assert_eq!(state.execute(&mut driver, "CLEAR").await, ScriptStatus::Failed);
    }

    #[tokio::test]
    async fn test_link_down_without_data_rescans() {
        let backend = ScriptedBackend::new();
        backend.push_reply(
            Command::GetLinkStatus,
            DriverReply::code(ApiResponse::LinkNotConnected),
        );
        let mut driver = opened(&backend).await;
        let mut state = Connecting::new();

        state.execute(&mut driver, "CLEAR").await;
        state.execute(&mut driver, "CLEAR").await;
        assert_eq!(state.execute(&mut driver, "CLEAR").await, ScriptStatus::Scanning);
        assert_eq!(state.cursor().position(), None);
    }

    #[tokio::test]
    async fn test_link_down_with_data_and_interface_failure_completes() {
        let backend = ScriptedBackend::new();
        backend.push_reply(
            Command::GetLinkStatus,
            DriverReply::new(
                ApiResponse::LinkNotConnected,
                ReplyPayload::LinkStatus(LinkStatusInfo::default()),
            ),
        );
        backend.push_reply(
            Command::GetIpInterfaceIndex,
            DriverReply::code(ApiResponse::Failed),
        );
        let mut driver = opened(&backend).await;
        let mut state = Connecting::new();

        state.execute(&mut driver, "CLEAR").await;
        state.execute(&mut driver, "CLEAR").await;
        assert_eq!(state.execute(&mut driver, "CLEAR").await, ScriptStatus::Completed);
    }
}
