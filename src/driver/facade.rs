//! The connection layer between the state scripts and the raw driver.
//! 状态脚本与原始驱动之间的连接层。
//!
//! `DriverFacade` makes open/close and subscribe/unsubscribe idempotent,
//! refuses queries the driver only serves with an open API, bounds every call
//! with the configured timeout, and records each reply's reading in the
//! [`SessionContext`].
//!
//! `DriverFacade` 使打开/关闭和订阅/取消订阅具有幂等性，拒绝驱动仅在 API
//! 打开时才处理的查询，以配置的超时限制每次调用，并将每个回复的读数记录到
//! [`SessionContext`] 中。

use crate::{
    config::DriverConfig,
    driver::{
        command::{Command, Subscription},
        context::SessionContext,
        response::ApiResponse,
        traits::{CommandArgs, CommandRequest, DriverBackend, DriverReply, ReplyPayload},
        types::{PackageUpdateState, PowerState},
    },
    error::{Error, Result},
};
use tracing::{debug, trace, warn};

pub struct DriverFacade<B: DriverBackend> {
    backend: B,
    context: SessionContext,
    config: DriverConfig,
}

impl<B: DriverBackend> DriverFacade<B> {
    pub fn new(backend: B, config: DriverConfig) -> Self {
        Self {
            backend,
            context: SessionContext::default(),
            config,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub(crate) fn context_mut(&mut self) -> &mut SessionContext {
        &mut self.context
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Executes a command for a script step. Backend faults and timeouts are
    /// logged and reported as `Failed` so the step can classify them.
    ///
    /// 为脚本步骤执行命令。后端故障和超时会被记录并报告为 `Failed`，
    /// 以便步骤对其进行分类。
    pub async fn execute_or_fail(&mut self, command: Command, args: CommandArgs) -> ApiResponse {
        match self.execute(command, args).await {
            Ok(response) => response,
            Err(err) => {
                warn!(%command, error = %err, "Driver command faulted, treating as FAILED");
                ApiResponse::Failed
            }
        }
    }

    /// Executes a single command, applying the connection-layer rules around it.
    /// 执行单个命令，并在其前后应用连接层规则。
    pub async fn execute(&mut self, command: Command, args: CommandArgs) -> Result<ApiResponse> {
        if let Some(subscription) = command.subscribes() {
            return self.subscribe(command, subscription).await;
        }
        if let Some(subscription) = command.unsubscribes() {
            return self.unsubscribe(command, subscription).await;
        }
        if command.is_unsupported() {
            debug!(%command, "Command has no driver behavior");
            return Ok(ApiResponse::NotImplemented);
        }
        if command.requires_open_api() && !self.context.api_opened {
            debug!(%command, "Driver API is not open, refusing command");
            return Ok(ApiResponse::Failed);
        }

        match command {
            Command::WiMaxApiOpen if self.context.api_opened => return Ok(ApiResponse::Success),
            Command::WiMaxApiClose | Command::WiMaxDeviceClose if !self.context.api_opened => {
                return Ok(ApiResponse::Success);
            }
            Command::WiMaxDeviceOpen if self.context.device_opened => {
                return Ok(ApiResponse::Success);
            }
            _ => {}
        }

        let Some(args) = self.prepare(command, args) else {
            debug!(%command, "No NSP to scope the query to");
            return Ok(ApiResponse::Failed);
        };

        let reply = self.call(CommandRequest::new(command, args)).await?;
        let response = reply.response;
        trace!(%command, %response, "Driver command returned");
        self.record(command, reply);
        Ok(response)
    }

    /// Opens the API and enumerates devices, reporting whether a card is attached.
    /// 打开 API 并枚举设备，报告是否连接了网卡。
    pub async fn is_card_connected(&mut self) -> bool {
        self.execute_or_fail(Command::WiMaxApiOpen, CommandArgs::None)
            .await;
        self.execute_or_fail(Command::GetListDevice, CommandArgs::None)
            .await
            .is_success()
            && self.context.has_device()
    }

    fn prepare(&mut self, command: Command, args: CommandArgs) -> Option<CommandArgs> {
        let args = match command {
            Command::CmdConnectToNetwork => {
                self.context.link_status = None;
                self.context.statistics = None;
                args
            }
            Command::CmdControlPowerManagementOn => CommandArgs::Power(PowerState::On),
            Command::CmdControlPowerManagementOff => CommandArgs::Power(PowerState::Off),
            Command::GetProvisioningStatus | Command::GetContactInformation => {
                let name = self
                    .context
                    .networks
                    .first()
                    .map(|nsp| nsp.name.clone())
                    .filter(|name| !name.is_empty())?;
                CommandArgs::Nsp { name }
            }
            Command::SetPackageUpdateState => match args {
                CommandArgs::PackageUpdateState(_) => args,
                _ => CommandArgs::PackageUpdateState(PackageUpdateState::default()),
            },
            _ => args,
        };
        Some(args)
    }

    fn record(&mut self, command: Command, reply: DriverReply) {
        let success = reply.response.is_success();
        let ctx = &mut self.context;
        match (command, reply.payload) {
            (Command::WiMaxApiOpen, _) => ctx.api_opened |= success,
            (Command::WiMaxApiClose, _) => {
                if success {
                    ctx.reset_flags();
                }
            }
            (Command::WiMaxDeviceOpen, _) => ctx.device_opened |= success,
            (Command::WiMaxDeviceClose, _) => ctx.device_opened = false,
            (Command::GetListDevice, ReplyPayload::Devices(devices))
                if success && !devices.is_empty() =>
            {
                ctx.devices = devices;
            }
            (Command::GetListDevice, _) => {
                ctx.devices.clear();
                ctx.device_info = None;
            }
            (Command::GetNetworkList, ReplyPayload::Networks(networks))
                if success && !networks.is_empty() =>
            {
                ctx.networks = networks;
            }
            (Command::GetNetworkList, _) => ctx.networks.clear(),
            (Command::GetDeviceStatus, ReplyPayload::DeviceStatus { status, progress })
                if success =>
            {
                ctx.device_status = Some(status);
                ctx.connection_progress = progress;
            }
            (Command::GetDeviceStatus, _) => {
                ctx.device_status = None;
                ctx.connection_progress = None;
            }
            (Command::GetLinkStatus, ReplyPayload::LinkStatus(link)) => {
                ctx.link_status = Some(link);
            }
            (Command::GetLinkStatus, _) => ctx.link_status = None,
            (Command::GetIpInterfaceIndex, ReplyPayload::Interface(interface)) => {
                ctx.interface = Some(interface);
            }
            (Command::GetIpInterfaceIndex, _) => ctx.interface = None,
            (Command::GetStatistics, ReplyPayload::Statistics(statistics)) => {
                ctx.statistics = Some(statistics);
            }
            (Command::GetStatistics, _) => ctx.statistics = None,
            (Command::GetConnectedNsp, ReplyPayload::ConnectedNsp(nsp)) => {
                ctx.connected_nsp = Some(nsp);
            }
            (Command::GetConnectedNsp, _) => ctx.connected_nsp = None,
            (Command::GetDeviceInformation, ReplyPayload::DeviceInfo(info)) => {
                ctx.device_info = Some(info);
            }
            (Command::GetDeviceInformation, _) => ctx.device_info = None,
            (Command::GetPackageInformation, ReplyPayload::PackageInfo(info)) => {
                ctx.package_info = Some(info);
            }
            (Command::GetPackageInformation, _) => ctx.package_info = None,
            (Command::GetProvisioningStatus, ReplyPayload::Provisioned(provisioned)) => {
                ctx.provisioned = Some(provisioned);
            }
            (Command::GetProvisioningStatus, _) => ctx.provisioned = None,
            (Command::GetContactInformation, ReplyPayload::Contacts(contacts)) => {
                ctx.contacts = contacts;
            }
            (Command::GetContactInformation, _) => ctx.contacts.clear(),
            _ => {}
        }
    }

    async fn subscribe(&mut self, command: Command, subscription: Subscription) -> Result<ApiResponse> {
        if self.context.subscriptions.is_set(subscription) {
            return Ok(ApiResponse::Success);
        }
        if !self.config.callbacks_enabled {
            trace!(?subscription, "Callbacks disabled, subscribing locally");
            self.context.subscriptions.set(subscription, true);
            return Ok(ApiResponse::Success);
        }
        let reply = self
            .call(CommandRequest::new(command, CommandArgs::None))
            .await?;
        if reply.response.is_success() {
            self.context.subscriptions.set(subscription, true);
        }
        Ok(reply.response)
    }

    async fn unsubscribe(
        &mut self,
        command: Command,
        subscription: Subscription,
    ) -> Result<ApiResponse> {
        if !self.context.subscriptions.is_set(subscription) {
            return Ok(ApiResponse::Success);
        }
        self.context.subscriptions.set(subscription, false);
        if !self.config.callbacks_enabled {
            return Ok(ApiResponse::Success);
        }
        let reply = self
            .call(CommandRequest::new(command, CommandArgs::None))
            .await?;
        Ok(reply.response)
    }

    async fn call(&mut self, request: CommandRequest) -> Result<DriverReply> {
        let command = request.command;
        trace!(%command, args = ?request.args, "Calling driver backend");
        match self.config.command_timeout {
            Some(after) => tokio::time::timeout(after, self.backend.call(request))
                .await
                .map_err(|_| Error::CommandTimeout { command, after })?,
            None => self.backend.call(request).await,
        }
    }
}
