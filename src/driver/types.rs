//! 驱动报告的状态枚举。
//! Status enumerations reported by the driver.

/// Device status as read by the device-status probe.
/// 设备状态探测读取到的设备状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum DeviceStatus {
    Uninitialized = 0,
    RfOffHwSw = 1,
    RfOffHw = 2,
    RfOffSw = 3,
    Ready = 4,
    Scanning = 5,
    Connecting = 6,
    DataConnected = 7,
}

impl DeviceStatus {
    pub fn from_i32(value: i32) -> Option<Self> {
        use DeviceStatus::*;
        let status = match value {
            0 => Uninitialized,
            1 => RfOffHwSw,
            2 => RfOffHw,
            3 => RfOffSw,
            4 => Ready,
            5 => Scanning,
            6 => Connecting,
            7 => DataConnected,
            _ => return None,
        };
        Some(status)
    }

    /// 射频被硬件或软件开关关闭。
    /// The radio is switched off by hardware or software.
    pub fn is_rf_off(self) -> bool {
        matches!(
            self,
            DeviceStatus::RfOffHwSw | DeviceStatus::RfOffHw | DeviceStatus::RfOffSw
        )
    }

    /// 设备正在搜索或协商，尚未稳定。
    /// The device is searching or negotiating and has not settled.
    pub fn is_busy(self) -> bool {
        matches!(self, DeviceStatus::Scanning | DeviceStatus::Connecting)
    }
}

/// Sub-phase of an ongoing connection attempt.
/// 正在进行的连接尝试的子阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ConnectionProgress {
    Ranging = 0,
    Sbc = 1,
    EapAuthenticationDevice = 2,
    EapAuthenticationUser = 3,
    ThreeWayHandshake = 4,
    Registration = 5,
    Deregistration = 6,
    Registered = 7,
}

impl ConnectionProgress {
    pub fn from_i32(value: i32) -> Option<Self> {
        use ConnectionProgress::*;
        let progress = match value {
            0 => Ranging,
            1 => Sbc,
            2 => EapAuthenticationDevice,
            3 => EapAuthenticationUser,
            4 => ThreeWayHandshake,
            5 => Registration,
            6 => Deregistration,
            7 => Registered,
            _ => return None,
        };
        Some(progress)
    }
}

/// Why the driver pushed a device-status change.
/// 驱动推送设备状态变化的原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum DeviceStatusChangeReason {
    Normal = 0,
    FailedToConnectToNetwork = 1,
    FailedToConnectRanging = 2,
    FailedToConnectSbc = 3,
    FailedToConnectEapAuthDevice = 4,
    FailedToConnectEapAuthUser = 5,
    FailedToConnectThreeWayHandshake = 6,
    FailedToConnectRegistration = 7,
    FailedToConnectDataPath = 8,
}

impl DeviceStatusChangeReason {
    pub fn from_i32(value: i32) -> Option<Self> {
        use DeviceStatusChangeReason::*;
        let reason = match value {
            0 => Normal,
            1 => FailedToConnectToNetwork,
            2 => FailedToConnectRanging,
            3 => FailedToConnectSbc,
            4 => FailedToConnectEapAuthDevice,
            5 => FailedToConnectEapAuthUser,
            6 => FailedToConnectThreeWayHandshake,
            7 => FailedToConnectRegistration,
            8 => FailedToConnectDataPath,
            _ => return None,
        };
        Some(reason)
    }
}

/// Progress of a software package update pushed by the network.
/// 网络推送的软件包更新进度。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum PackageUpdateStatus {
    Received = 0,
    ReceivedLowerStack = 1,
    ReceivedFullStack = 2,
    ReceivedOmaDmClient = 3,
    Started = 4,
    Completed = 5,
    FailedNetworkDisconnected = 6,
    FailedInvalidPackage = 7,
    FailedBadAuthentication = 8,
    Failed = 9,
}

impl PackageUpdateStatus {
    pub fn from_i32(value: i32) -> Option<Self> {
        use PackageUpdateStatus::*;
        let status = match value {
            0 => Received,
            1 => ReceivedLowerStack,
            2 => ReceivedFullStack,
            3 => ReceivedOmaDmClient,
            4 => Started,
            5 => Completed,
            6 => FailedNetworkDisconnected,
            7 => FailedInvalidPackage,
            8 => FailedBadAuthentication,
            9 => Failed,
            _ => return None,
        };
        Some(status)
    }

    /// The user-facing text forwarded with a package update event.
    /// 随软件包更新事件转发的面向用户的文本。
    pub fn description(self) -> &'static str {
        use PackageUpdateStatus::*;
        match self {
            Received => {
                "WiMAX PACKAGE RECEIVED: A software update package is available for your WiMAX device. Do you want to start downloading it?"
            }
            ReceivedLowerStack => "Update package received for firmware update only.",
            ReceivedFullStack => "Update package received for firmware, SDK and driver.",
            ReceivedOmaDmClient => "Update package received for OMA-DM client.",
            Started => {
                "WiMAX SOFTWARE UPDATE DOWNLOADED: It is HIGHLY recommended that you install this software update package. Do you want to install it?"
            }
            Completed => "Update package successfully installed.",
            FailedNetworkDisconnected => {
                "Update package failed to install because of network disconnection."
            }
            FailedInvalidPackage => "Update package failed to install because of invalid package.",
            FailedBadAuthentication => {
                "Update package failed to install because of bas authentication."
            }
            Failed => {
                "WiMAX SOFTWARE FAILED DOWNLOAD: The package you attempted to download seems to have failed."
            }
        }
    }
}

/// Progress of an over-the-air provisioning operation.
/// 空中配置操作的进度。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ProvisioningOperationStatus {
    Started = 0,
    Completed = 1,
    FailedNetworkDisconnect = 2,
    Failed = 3,
    FailedInvalidProvisioning = 4,
    FailedBadAuthentication = 5,
    RequestInitialProvisioning = 6,
    RequestOngoingProvisioning = 7,
    RequestResetProvisioning = 8,
    TriggerContact = 9,
}

impl ProvisioningOperationStatus {
    pub fn from_i32(value: i32) -> Option<Self> {
        use ProvisioningOperationStatus::*;
        let status = match value {
            0 => Started,
            1 => Completed,
            2 => FailedNetworkDisconnect,
            3 => Failed,
            4 => FailedInvalidProvisioning,
            5 => FailedBadAuthentication,
            6 => RequestInitialProvisioning,
            7 => RequestOngoingProvisioning,
            8 => RequestResetProvisioning,
            9 => TriggerContact,
            _ => return None,
        };
        Some(status)
    }

    /// The user-facing text forwarded with a provisioning event.
    /// 随配置事件转发的面向用户的文本。
    pub fn description(self) -> &'static str {
        use ProvisioningOperationStatus::*;
        match self {
            Started => {
                "WiMAX UPDATE: Your WiMAX Adapter is being updated by the network. DO NOT REMOVE THE CARD UNTIL COMPLETION!"
            }
            Completed => "WiMAX UPDATE: Your WiMAX Adapter has been updated.",
            FailedNetworkDisconnect => "Update failed because of network disconnect.",
            Failed => {
                "WiMAX UPDATE: Update failed. Please contact customer care for more details or help."
            }
            FailedInvalidProvisioning => "Update failed because of invalid provisioning.",
            FailedBadAuthentication => "Update failed because of authentication failure.",
            RequestInitialProvisioning => "Update requested initial provisioning.",
            RequestOngoingProvisioning => "Update ongoing provisioning.",
            RequestResetProvisioning => "Update requested reset provisioning.",
            TriggerContact => "Specifies to invoke the URI specified in the contact information.",
        }
    }
}

/// The answer given to a pending package update.
/// 对待处理软件包更新的答复。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum PackageUpdateState {
    #[default]
    Delay = 0,
    Accepted = 1,
    Denied = 2,
}

/// Radio power state, as requested by a power command or reported by the
/// power-management notification.
///
/// 无线电源状态，由电源命令请求或电源管理通知报告。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum PowerState {
    On = 0,
    Off = 1,
}

impl PowerState {
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(PowerState::On),
            1 => Some(PowerState::Off),
            _ => None,
        }
    }
}
