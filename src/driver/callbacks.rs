//! Driver notifications delivered to the control loop.
//! 投递给控制循环的驱动通知。
//!
//! The driver raises notifications on its own threads. [`DriverCallbacks`]
//! turns each one into a [`DriverEvent`] message; the control loop drains them
//! at the top of every tick, so they never interleave with a script step.
//!
//! 驱动在自己的线程上发出通知。[`DriverCallbacks`] 将每个通知转换为
//! [`DriverEvent`] 消息；控制循环在每次 tick 开始时处理它们，因此它们不会与脚本步骤交错。

use crate::{
    driver::{
        structs::NspInfo,
        types::{
            ConnectionProgress, DeviceStatus, DeviceStatusChangeReason, PackageUpdateStatus,
            PowerState, ProvisioningOperationStatus,
        },
    },
    error::{Error, Result},
};
use tokio::sync::mpsc;

/// A notification pushed by the driver.
/// 驱动推送的通知。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    DeviceStatusChange {
        status: Option<DeviceStatus>,
        reason: Option<DeviceStatusChangeReason>,
        progress: Option<ConnectionProgress>,
    },
    /// A card was inserted (`present`) or pulled.
    /// 网卡被插入（`present`）或拔出。
    DeviceInsertRemove { present: bool },
    ControlPowerManagement { state: PowerState },
    /// Outcome of a connection attempt. `0` reports success.
    /// 连接尝试的结果。`0` 表示成功。
    ConnectToNetwork { status: i32 },
    /// Outcome of a disconnection. `1` reports that the link dropped.
    /// 断开连接的结果。`1` 表示链路已断开。
    DisconnectToNetwork { status: i32 },
    NetworkSearchWideScan { networks: Vec<NspInfo> },
    ProvisioningOperation {
        status: ProvisioningOperationStatus,
        contact_type: u32,
    },
    PackageUpdate { status: PackageUpdateStatus },
}

/// A cloneable, thread-safe handle the driver binding uses to post notifications.
/// 驱动绑定用于投递通知的可克隆、线程安全句柄。
#[derive(Debug, Clone)]
pub struct DriverCallbacks {
    tx: mpsc::UnboundedSender<DriverEvent>,
}

impl DriverCallbacks {
    pub(crate) fn new(tx: mpsc::UnboundedSender<DriverEvent>) -> Self {
        Self { tx }
    }

    /// Posts a notification. Fails once the control loop has stopped.
    /// 投递通知。控制循环停止后会失败。
    pub fn send(&self, event: DriverEvent) -> Result<()> {
        self.tx.send(event).map_err(|_| Error::ChannelClosed)
    }

    pub fn device_status_changed(
        &self,
        status: i32,
        reason: i32,
        progress: i32,
    ) -> Result<()> {
        self.send(DriverEvent::DeviceStatusChange {
            status: DeviceStatus::from_i32(status),
            reason: DeviceStatusChangeReason::from_i32(reason),
            progress: ConnectionProgress::from_i32(progress),
        })
    }

    pub fn device_inserted(&self) -> Result<()> {
        self.send(DriverEvent::DeviceInsertRemove { present: true })
    }

    pub fn device_removed(&self) -> Result<()> {
        self.send(DriverEvent::DeviceInsertRemove { present: false })
    }

    pub fn power_changed(&self, state: PowerState) -> Result<()> {
        self.send(DriverEvent::ControlPowerManagement { state })
    }

    pub fn connect_result(&self, status: i32) -> Result<()> {
        self.send(DriverEvent::ConnectToNetwork { status })
    }

    pub fn disconnect_result(&self, status: i32) -> Result<()> {
        self.send(DriverEvent::DisconnectToNetwork { status })
    }

    pub fn wide_scan_completed(&self, networks: Vec<NspInfo>) -> Result<()> {
        self.send(DriverEvent::NetworkSearchWideScan { networks })
    }

    pub fn provisioning_operation(
        &self,
        status: ProvisioningOperationStatus,
        contact_type: u32,
    ) -> Result<()> {
        self.send(DriverEvent::ProvisioningOperation {
            status,
            contact_type,
        })
    }

    pub fn package_update(&self, status: PackageUpdateStatus) -> Result<()> {
        self.send(DriverEvent::PackageUpdate { status })
    }
}
