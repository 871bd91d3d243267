//! 驱动命令码。
//! Driver command codes.

use std::fmt;

/// A numbered driver operation. The discriminant is the code handed to the driver.
/// 编号的驱动操作。判别值即交给驱动的命令码。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Opens the driver API.
    /// 打开驱动API。
    WiMaxApiOpen = 1,
    /// Enumerates the attached hardware devices.
    /// 枚举已连接的硬件设备。
    GetListDevice = 2,
    /// Opens the first enumerated device.
    /// 打开第一个枚举到的设备。
    WiMaxDeviceOpen = 3,
    /// Closes the opened device.
    /// 关闭已打开的设备。
    WiMaxDeviceClose = 4,
    /// Closes the driver API.
    /// 关闭驱动API。
    WiMaxApiClose = 5,
    CmdControlPowerManagementOn = 6,
    CmdControlPowerManagementOff = 7,
    CmdResetWimaxDevice = 8,
    CmdResetToFactorySettings = 9,
    GetErrorString = 10,
    SetServiceProviderUnlock = 11,
    GetServiceProviderLockStatus = 12,
    /// Fetches the visible NSP list.
    /// 获取可见的 NSP 列表。
    GetNetworkList = 13,
    /// Starts a connection to an NSP.
    /// 开始连接到某个 NSP。
    CmdConnectToNetwork = 14,
    /// Tears down the network connection.
    /// 断开网络连接。
    CmdDisconnectFromNetwork = 15,
    CmdNetworkSearchWideScan = 16,
    GetIpInterfaceIndex = 17,
    GetSelectProfileList = 18,
    /// Reads radio link figures (RSSI, CINR, BSID...).
    /// 读取无线链路数据（RSSI、CINR、BSID 等）。
    GetLinkStatus = 19,
    GetDeviceInformation = 20,
    /// Reads the device status and connection progress.
    /// 读取设备状态和连接进度。
    GetDeviceStatus = 21,
    GetConnectedNsp = 22,
    SetRoamingMode = 23,
    GetRoamingMode = 24,
    GetStatistics = 25,
    GetProvisioningStatus = 26,
    GetContactInformation = 27,
    GetPackageInformation = 28,
    SetPackageUpdateState = 29,
    SubscribeDeviceStatusChange = 30,
    SubscribeDeviceInsertRemove = 31,
    SubscribeControlPowerManagement = 32,
    SubscribeConnectToNetwork = 33,
    SubscribeDisconnectToNetwork = 34,
    SubscribeNetworkSearchWideScan = 35,
    SubscribeProvisioningOperation = 36,
    SubscribePackageUpdate = 37,
    UnsubscribeDeviceStatusChange = 38,
    UnsubscribeDeviceInsertRemove = 39,
    UnsubscribeControlPowerManagement = 40,
    UnsubscribeConnectToNetwork = 41,
    UnsubscribeDisconnectToNetwork = 42,
    UnsubscribeNetworkSearchWideScan = 43,
    UnsubscribeProvisioningOperation = 44,
    UnsubscribePackageUpdate = 45,
}

impl Command {
    /// 从一个字节尝试转换成 `Command`。
    /// Tries to convert a byte into a `Command`.
    pub fn from_u8(byte: u8) -> Option<Self> {
        let command = match byte {
            1 => Command::WiMaxApiOpen,
            2 => Command::GetListDevice,
            3 => Command::WiMaxDeviceOpen,
            4 => Command::WiMaxDeviceClose,
            5 => Command::WiMaxApiClose,
            6 => Command::CmdControlPowerManagementOn,
            7 => Command::CmdControlPowerManagementOff,
            8 => Command::CmdResetWimaxDevice,
            9 => Command::CmdResetToFactorySettings,
            10 => Command::GetErrorString,
            11 => Command::SetServiceProviderUnlock,
            12 => Command::GetServiceProviderLockStatus,
            13 => Command::GetNetworkList,
            14 => Command::CmdConnectToNetwork,
            15 => Command::CmdDisconnectFromNetwork,
            16 => Command::CmdNetworkSearchWideScan,
            17 => Command::GetIpInterfaceIndex,
            18 => Command::GetSelectProfileList,
            19 => Command::GetLinkStatus,
            20 => Command::GetDeviceInformation,
            21 => Command::GetDeviceStatus,
            22 => Command::GetConnectedNsp,
            23 => Command::SetRoamingMode,
            24 => Command::GetRoamingMode,
            25 => Command::GetStatistics,
            26 => Command::GetProvisioningStatus,
            27 => Command::GetContactInformation,
            28 => Command::GetPackageInformation,
            29 => Command::SetPackageUpdateState,
            30 => Command::SubscribeDeviceStatusChange,
            31 => Command::SubscribeDeviceInsertRemove,
            32 => Command::SubscribeControlPowerManagement,
            33 => Command::SubscribeConnectToNetwork,
            34 => Command::SubscribeDisconnectToNetwork,
            35 => Command::SubscribeNetworkSearchWideScan,
            36 => Command::SubscribeProvisioningOperation,
            37 => Command::SubscribePackageUpdate,
            38 => Command::UnsubscribeDeviceStatusChange,
            39 => Command::UnsubscribeDeviceInsertRemove,
            40 => Command::UnsubscribeControlPowerManagement,
            41 => Command::UnsubscribeConnectToNetwork,
            42 => Command::UnsubscribeDisconnectToNetwork,
            43 => Command::UnsubscribeNetworkSearchWideScan,
            44 => Command::UnsubscribeProvisioningOperation,
            45 => Command::UnsubscribePackageUpdate,
            _ => return None,
        };
        Some(command)
    }

    /// The numeric code handed to the driver.
    /// 交给驱动的数字码。
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The callback channel this command subscribes to, if any.
    /// 此命令订阅的回调通道（如果有）。
    pub fn subscribes(self) -> Option<Subscription> {
        let subscription = match self {
            Command::SubscribeDeviceStatusChange => Subscription::DeviceStatusChange,
            Command::SubscribeDeviceInsertRemove => Subscription::DeviceInsertRemove,
            Command::SubscribeControlPowerManagement => Subscription::ControlPowerManagement,
            Command::SubscribeConnectToNetwork => Subscription::ConnectToNetwork,
            Command::SubscribeDisconnectToNetwork => Subscription::DisconnectToNetwork,
            Command::SubscribeNetworkSearchWideScan => Subscription::NetworkSearchWideScan,
            Command::SubscribeProvisioningOperation => Subscription::ProvisioningOperation,
            Command::SubscribePackageUpdate => Subscription::PackageUpdate,
            _ => return None,
        };
        Some(subscription)
    }

    /// The callback channel this command unsubscribes from, if any.
    /// 此命令取消订阅的回调通道（如果有）。
    pub fn unsubscribes(self) -> Option<Subscription> {
        let subscription = match self {
            Command::UnsubscribeDeviceStatusChange => Subscription::DeviceStatusChange,
            Command::UnsubscribeDeviceInsertRemove => Subscription::DeviceInsertRemove,
            Command::UnsubscribeControlPowerManagement => Subscription::ControlPowerManagement,
            Command::UnsubscribeConnectToNetwork => Subscription::ConnectToNetwork,
            Command::UnsubscribeDisconnectToNetwork => Subscription::DisconnectToNetwork,
            Command::UnsubscribeNetworkSearchWideScan => Subscription::NetworkSearchWideScan,
            Command::UnsubscribeProvisioningOperation => Subscription::ProvisioningOperation,
            Command::UnsubscribePackageUpdate => Subscription::PackageUpdate,
            _ => return None,
        };
        Some(subscription)
    }

    /// Commands the driver only serves once the API has been opened.
    /// 驱动只在API打开后才处理的命令。
    pub fn requires_open_api(self) -> bool {
        matches!(
            self,
            Command::CmdControlPowerManagementOn
                | Command::CmdControlPowerManagementOff
                | Command::GetDeviceStatus
                | Command::GetDeviceInformation
                | Command::GetConnectedNsp
                | Command::GetPackageInformation
                | Command::SetPackageUpdateState
                | Command::GetProvisioningStatus
                | Command::GetContactInformation
        )
    }

    /// Commands that are accepted but have no driver behavior behind them.
    /// 被接受但背后没有驱动行为的命令。
    pub fn is_unsupported(self) -> bool {
        matches!(
            self,
            Command::CmdResetToFactorySettings
                | Command::GetErrorString
                | Command::SetServiceProviderUnlock
                | Command::GetServiceProviderLockStatus
                | Command::SetRoamingMode
                | Command::GetRoamingMode
        )
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Command::WiMaxApiOpen => "API_OPEN",
            Command::GetListDevice => "LIST_DEVICES",
            Command::WiMaxDeviceOpen => "DEVICE_OPEN",
            Command::WiMaxDeviceClose => "DEVICE_CLOSE",
            Command::WiMaxApiClose => "API_CLOSE",
            Command::CmdControlPowerManagementOn => "POWER_ON",
            Command::CmdControlPowerManagementOff => "POWER_OFF",
            Command::CmdResetWimaxDevice => "RESET_DEVICE",
            Command::CmdResetToFactorySettings => "FACTORY_RESET",
            Command::GetErrorString => "ERROR_STRING",
            Command::SetServiceProviderUnlock => "SP_UNLOCK",
            Command::GetServiceProviderLockStatus => "SP_LOCK_STATUS",
            Command::GetNetworkList => "NETWORK_LIST",
            Command::CmdConnectToNetwork => "CONNECT",
            Command::CmdDisconnectFromNetwork => "DISCONNECT",
            Command::CmdNetworkSearchWideScan => "WIDE_SCAN",
            Command::GetIpInterfaceIndex => "IP_INTERFACE",
            Command::GetSelectProfileList => "PROFILE_LIST",
            Command::GetLinkStatus => "LINK_STATUS",
            Command::GetDeviceInformation => "DEVICE_INFO",
            Command::GetDeviceStatus => "DEVICE_STATUS",
            Command::GetConnectedNsp => "CONNECTED_NSP",
            Command::SetRoamingMode => "SET_ROAMING",
            Command::GetRoamingMode => "GET_ROAMING",
            Command::GetStatistics => "STATISTICS",
            Command::GetProvisioningStatus => "PROVISIONING_STATUS",
            Command::GetContactInformation => "CONTACT_INFO",
            Command::GetPackageInformation => "PACKAGE_INFO",
            Command::SetPackageUpdateState => "PACKAGE_UPDATE_STATE",
            Command::SubscribeDeviceStatusChange => "SUBSCRIBE_DEVICE_STATUS_CHANGE",
            Command::SubscribeDeviceInsertRemove => "SUBSCRIBE_DEVICE_INSERT_REMOVE",
            Command::SubscribeControlPowerManagement => "SUBSCRIBE_CONTROL_POWER_MANAGEMENT",
            Command::SubscribeConnectToNetwork => "SUBSCRIBE_CONNECT_TO_NETWORK",
            Command::SubscribeDisconnectToNetwork => "SUBSCRIBE_DISCONNECT_TO_NETWORK",
            Command::SubscribeNetworkSearchWideScan => "SUBSCRIBE_NETWORK_SEARCH_WIDE_SCAN",
            Command::SubscribeProvisioningOperation => "SUBSCRIBE_PROVISIONING_OPERATION",
            Command::SubscribePackageUpdate => "SUBSCRIBE_PACKAGE_UPDATE",
            Command::UnsubscribeDeviceStatusChange => "UNSUBSCRIBE_DEVICE_STATUS_CHANGE",
            Command::UnsubscribeDeviceInsertRemove => "UNSUBSCRIBE_DEVICE_INSERT_REMOVE",
            Command::UnsubscribeControlPowerManagement => "UNSUBSCRIBE_CONTROL_POWER_MANAGEMENT",
            Command::UnsubscribeConnectToNetwork => "UNSUBSCRIBE_CONNECT_TO_NETWORK",
            Command::UnsubscribeDisconnectToNetwork => "UNSUBSCRIBE_DISCONNECT_TO_NETWORK",
            Command::UnsubscribeNetworkSearchWideScan => "UNSUBSCRIBE_NETWORK_SEARCH_WIDE_SCAN",
            Command::UnsubscribeProvisioningOperation => "UNSUBSCRIBE_PROVISIONING_OPERATION",
            Command::UnsubscribePackageUpdate => "UNSUBSCRIBE_PACKAGE_UPDATE",
        };
        write!(f, "{}", s)
    }
}

/// A driver notification channel that can be subscribed to.
/// 可订阅的驱动通知通道。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subscription {
    DeviceStatusChange,
    DeviceInsertRemove,
    ControlPowerManagement,
    ConnectToNetwork,
    DisconnectToNetwork,
    NetworkSearchWideScan,
    ProvisioningOperation,
    PackageUpdate,
}

impl Subscription {
    /// All channels, in the order the initialization script subscribes them.
    /// 所有通道，按初始化脚本订阅的顺序排列。
    pub const ALL: [Subscription; 8] = [
        Subscription::DeviceStatusChange,
        Subscription::DeviceInsertRemove,
        Subscription::ControlPowerManagement,
        Subscription::ConnectToNetwork,
        Subscription::DisconnectToNetwork,
        Subscription::NetworkSearchWideScan,
        Subscription::ProvisioningOperation,
        Subscription::PackageUpdate,
    ];

    /// Bit used for this channel in [`SubscriptionFlags`](super::SubscriptionFlags).
    pub(crate) fn bit(self) -> u8 {
        1 << (self as u8)
    }
}
