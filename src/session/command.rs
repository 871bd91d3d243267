//! Commands sent from a `SessionHandle` to the control loop.

use crate::{
    driver::{
        ConnectedNspInfo, ConnectionStatistics, ContactInfo, DeviceInfo, HardwareDeviceId,
        LinkStatusInfo, NspInfo, PackageInfo, PackageUpdateState,
    },
    error::Result,
    session::{machine::SessionSnapshot, state::Goal},
};
use tokio::sync::oneshot;

/// Commands sent to the session control loop.
///
/// Goal and network changes are fire-and-forget; queries carry their own
/// response channel and run between two ticks.
///
/// 发送到会话控制循环的命令。
///
/// 目标和网络更改无需应答；查询携带自己的响应通道，并在两次 tick 之间运行。
#[derive(Debug)]
pub enum SessionCommand {
    SetGoal(Goal),
    /// Selects the NSP the connecting script prefers.
    /// 选择连接脚本首选的 NSP。
    SelectNetwork(String),
    Snapshot {
        response_tx: oneshot::Sender<SessionSnapshot>,
    },
    DeviceList {
        response_tx: oneshot::Sender<Result<Vec<HardwareDeviceId>>>,
    },
    NetworkList {
        response_tx: oneshot::Sender<Result<Vec<NspInfo>>>,
    },
    WideScan {
        response_tx: oneshot::Sender<Result<()>>,
    },
    ConnectedNsp {
        response_tx: oneshot::Sender<Result<ConnectedNspInfo>>,
    },
    Statistics {
        response_tx: oneshot::Sender<Result<ConnectionStatistics>>,
    },
    LinkStatus {
        response_tx: oneshot::Sender<Result<LinkStatusInfo>>,
    },
    DeviceInfo {
        response_tx: oneshot::Sender<Result<DeviceInfo>>,
    },
    PackageInfo {
        response_tx: oneshot::Sender<Result<PackageInfo>>,
    },
    SetPackageUpdateState {
        state: PackageUpdateState,
        response_tx: oneshot::Sender<Result<()>>,
    },
    ContactInformation {
        response_tx: oneshot::Sender<Result<Vec<ContactInfo>>>,
    },
    ProvisioningStatus {
        response_tx: oneshot::Sender<Result<bool>>,
    },
    /// Stops the control loop without any teardown.
    /// 停止控制循环，不执行任何拆除。
    Shutdown {
        response_tx: oneshot::Sender<()>,
    },
}
