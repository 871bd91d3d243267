//! 驱动对每个命令返回的响应码。
//! The response code the driver returns for every command.

use std::fmt;

/// Result code of a single driver command.
/// 单个驱动命令的结果码。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ApiResponse {
    FirstCommonError = 0,
    Success = 1,
    Failed = 2,
    BufferSizeTooSmall = 3,
    PermissionDenied = 4,
    /// The device handle is no longer valid (card pulled or broken).
    /// 设备句柄不再有效（卡被拔出或损坏）。
    InvalidDevice = 5,
    InvalidParameter = 6,
    AlreadyConnected = 7,
    /// The link is down. The driver may still have filled in link figures.
    /// 链路断开。驱动可能仍然填充了链路数据。
    LinkNotConnected = 8,
    NetworkProhibited = 9,
    DeviceMissing = 10,
    InvalidProfile = 11,
    RoamingNotAllowed = 12,
    ConnectionInProgress = 13,
    NotImplemented = 14,
    LastCommonError = 15,
}

impl ApiResponse {
    /// 从一个整数尝试转换成 `ApiResponse`。
    /// Tries to convert an integer into an `ApiResponse`.
    pub fn from_i32(value: i32) -> Option<Self> {
        use ApiResponse::*;
        let response = match value {
            0 => FirstCommonError,
            1 => Success,
            2 => Failed,
            3 => BufferSizeTooSmall,
            4 => PermissionDenied,
            5 => InvalidDevice,
            6 => InvalidParameter,
            7 => AlreadyConnected,
            8 => LinkNotConnected,
            9 => NetworkProhibited,
            10 => DeviceMissing,
            11 => InvalidProfile,
            12 => RoamingNotAllowed,
            13 => ConnectionInProgress,
            14 => NotImplemented,
            15 => LastCommonError,
            _ => return None,
        };
        Some(response)
    }

    pub fn is_success(self) -> bool {
        self == ApiResponse::Success
    }

    /// The card is gone or unusable; retrying the same command cannot help.
    /// 网卡已不存在或不可用；重试同一命令无济于事。
    pub fn is_device_lost(self) -> bool {
        matches!(self, ApiResponse::InvalidDevice | ApiResponse::DeviceMissing)
    }
}

impl fmt::Display for ApiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, *self as i32)
    }
}
