//! 驱动读数和连接层标志的记录。
//! Record of driver readings and connection-layer flags.
//!
//! The facade writes here after each command; scripts only read. Readings are
//! replaced wholesale by the command that owns them, so a failed probe leaves
//! `None` rather than a stale value.
//!
//! 门面在每个命令后写入此处；脚本只读取。读数由拥有它的命令整体替换，
//! 因此失败的探测会留下 `None` 而不是过时的值。

use crate::driver::{
    command::Subscription,
    structs::{
        ConnectedNspInfo, ConnectionStatistics, ContactInfo, DeviceInfo, HardwareDeviceId,
        InterfaceInfo, LinkStatusInfo, NspInfo, PackageInfo,
    },
    types::{ConnectionProgress, DeviceStatus},
};

/// The set of notification channels currently subscribed.
/// 当前已订阅的通知通道集合。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubscriptionFlags(u8);

impl SubscriptionFlags {
    pub fn is_set(&self, subscription: Subscription) -> bool {
        self.0 & subscription.bit() != 0
    }

    pub fn set(&mut self, subscription: Subscription, on: bool) {
        if on {
            self.0 |= subscription.bit();
        } else {
            self.0 &= !subscription.bit();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

/// Readings and flags shared by every state script.
/// 所有状态脚本共享的读数和标志。
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub(crate) devices: Vec<HardwareDeviceId>,
    pub(crate) device_present: Option<bool>,
    pub(crate) device_status: Option<DeviceStatus>,
    pub(crate) connection_progress: Option<ConnectionProgress>,
    pub(crate) networks: Vec<NspInfo>,
    pub(crate) link_status: Option<LinkStatusInfo>,
    pub(crate) interface: Option<InterfaceInfo>,
    pub(crate) statistics: Option<ConnectionStatistics>,
    pub(crate) connected_nsp: Option<ConnectedNspInfo>,
    pub(crate) device_info: Option<DeviceInfo>,
    pub(crate) package_info: Option<PackageInfo>,
    pub(crate) provisioned: Option<bool>,
    pub(crate) contacts: Vec<ContactInfo>,
    pub(crate) api_opened: bool,
    pub(crate) device_opened: bool,
    pub(crate) subscriptions: SubscriptionFlags,
}

impl SessionContext {
    pub fn devices(&self) -> &[HardwareDeviceId] {
        &self.devices
    }

    /// At least one device was listed by the last enumeration.
    /// 上一次枚举至少列出了一个设备。
    pub fn has_device(&self) -> bool {
        !self.devices.is_empty()
    }

    /// Presence as last pushed by the insert/remove notification.
    /// 插入/移除通知最后推送的设备存在状态。
    pub fn device_present(&self) -> Option<bool> {
        self.device_present
    }

    pub fn device_status(&self) -> Option<DeviceStatus> {
        self.device_status
    }

    pub fn connection_progress(&self) -> Option<ConnectionProgress> {
        self.connection_progress
    }

    pub fn networks(&self) -> &[NspInfo] {
        &self.networks
    }

    /// Looks up an NSP by name, ignoring ASCII case.
    /// 按名称查找 NSP，忽略 ASCII 大小写。
    pub fn network_named(&self, name: &str) -> Option<&NspInfo> {
        self.networks
            .iter()
            .find(|nsp| nsp.name.eq_ignore_ascii_case(name))
    }

    pub fn link_status(&self) -> Option<&LinkStatusInfo> {
        self.link_status.as_ref()
    }

    pub fn interface(&self) -> Option<&InterfaceInfo> {
        self.interface.as_ref()
    }

    pub fn statistics(&self) -> Option<&ConnectionStatistics> {
        self.statistics.as_ref()
    }

    pub fn connected_nsp(&self) -> Option<&ConnectedNspInfo> {
        self.connected_nsp.as_ref()
    }

    pub fn device_info(&self) -> Option<&DeviceInfo> {
        self.device_info.as_ref()
    }

    pub fn package_info(&self) -> Option<&PackageInfo> {
        self.package_info.as_ref()
    }

    pub fn provisioned(&self) -> Option<bool> {
        self.provisioned
    }

    pub fn contacts(&self) -> &[ContactInfo] {
        &self.contacts
    }

    pub fn api_opened(&self) -> bool {
        self.api_opened
    }

    pub fn device_opened(&self) -> bool {
        self.device_opened
    }

    pub fn subscriptions(&self) -> SubscriptionFlags {
        self.subscriptions
    }

    /// Drops every connection-layer flag after the API has been closed.
    /// API 关闭后清除所有连接层标志。
    pub(crate) fn reset_flags(&mut self) {
        self.api_opened = false;
        self.device_opened = false;
        self.subscriptions.clear();
    }
}
