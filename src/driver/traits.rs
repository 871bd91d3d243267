//! Traits for abstracting over WiMAX driver implementations.
use crate::driver::{
    command::Command,
    response::ApiResponse,
    structs::{
        ConnectedNspInfo, ConnectionStatistics, ContactInfo, DeviceInfo, HardwareDeviceId,
        InterfaceInfo, LinkStatusInfo, NspInfo, PackageInfo,
    },
    types::{ConnectionProgress, DeviceStatus, PackageUpdateState, PowerState},
};
use crate::error::Result;
use async_trait::async_trait;

/// Arguments attached to a driver command.
/// 附加到驱动命令上的参数。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CommandArgs {
    #[default]
    None,
    /// Target state of a power-management command.
    /// 电源管理命令的目标状态。
    Power(PowerState),
    /// Connection target. Profile id and password are left empty by the
    /// connecting script.
    ///
    /// 连接目标。连接脚本不填写配置 ID 和密码。
    Connect {
        nsp_name: String,
        nsp_id: u32,
        password: String,
    },
    /// A query scoped to one NSP.
    /// 针对某个 NSP 的查询。
    Nsp { name: String },
    PackageUpdateState(PackageUpdateState),
}

/// A single command handed to the backend.
/// 交给后端的单个命令。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub command: Command,
    pub args: CommandArgs,
}

impl CommandRequest {
    pub fn new(command: Command, args: CommandArgs) -> Self {
        Self { command, args }
    }
}

/// Typed reading produced by a command.
/// 命令产生的类型化读数。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReplyPayload {
    #[default]
    None,
    Devices(Vec<HardwareDeviceId>),
    DeviceStatus {
        status: DeviceStatus,
        progress: Option<ConnectionProgress>,
    },
    Networks(Vec<NspInfo>),
    LinkStatus(LinkStatusInfo),
    Interface(InterfaceInfo),
    Statistics(ConnectionStatistics),
    ConnectedNsp(ConnectedNspInfo),
    DeviceInfo(DeviceInfo),
    PackageInfo(PackageInfo),
    Provisioned(bool),
    Contacts(Vec<ContactInfo>),
}

/// The backend's answer to a [`CommandRequest`].
/// 后端对 [`CommandRequest`] 的答复。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverReply {
    pub response: ApiResponse,
    pub payload: ReplyPayload,
}

impl DriverReply {
    pub fn new(response: ApiResponse, payload: ReplyPayload) -> Self {
        Self { response, payload }
    }

    /// A bare `Success` with no reading.
    pub fn ok() -> Self {
        Self::new(ApiResponse::Success, ReplyPayload::None)
    }

    /// `Success` carrying a reading.
    pub fn with(payload: ReplyPayload) -> Self {
        Self::new(ApiResponse::Success, payload)
    }

    /// A response code with no reading.
    pub fn code(response: ApiResponse) -> Self {
        Self::new(response, ReplyPayload::None)
    }
}

/// An asynchronous WiMAX driver.
///
/// This trait abstracts the numbered-command driver so the session can run
/// against real hardware bindings, a simulator or a scripted test double.
/// Only the control task calls it, so commands never overlap.
///
/// 异步 WiMAX 驱动。
///
/// 此 trait 对编号命令驱动进行抽象，使会话可以运行在真实硬件绑定、
/// 模拟器或脚本化测试替身之上。只有控制任务调用它，因此命令不会重叠。
#[async_trait]
pub trait DriverBackend: Send + 'static {
    /// Executes one command. `Err` is reserved for faults outside the
    /// driver's response codes (a dead binding, a lost IPC link...).
    ///
    /// 执行一个命令。`Err` 仅用于驱动响应码之外的故障。
    async fn call(&mut self, request: CommandRequest) -> Result<DriverReply>;
}

#[async_trait]
impl DriverBackend for Box<dyn DriverBackend> {
    async fn call(&mut self, request: CommandRequest) -> Result<DriverReply> {
        (**self).call(request).await
    }
}
