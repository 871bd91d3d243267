//! 定义了库中所有可能的错误类型。
//! Defines all possible error types in the library.

use crate::driver::{ApiResponse, Command};
use std::time::Duration;
use thiserror::Error;

/// The primary error type for the session library.
/// 会话库的主要错误类型。
#[derive(Debug, Error)]
pub enum Error {
    /// An internal channel for communication between tasks was closed unexpectedly.
    /// 用于任务间通信的内部通道意外关闭。
    #[error("Internal channel is broken")]
    ChannelClosed,

    /// A driver command did not return within the configured bound.
    /// 驱动命令未在配置的时限内返回。
    #[error("Driver command {command} timed out after {after:?}")]
    CommandTimeout { command: Command, after: Duration },

    /// The driver backend reported a fault that is not an API response code.
    /// 驱动后端报告了一个不属于API响应码的故障。
    #[error("Driver backend failure: {0}")]
    Backend(String),

    /// The operation needs an opened device (initialized, connecting or connected).
    /// 该操作需要已打开的设备（已初始化、连接中或已连接）。
    #[error("Device is not ready")]
    DeviceNotReady,

    /// The operation could not be completed because the session is not connected.
    /// 由于会话未连接，操作无法完成。
    #[error("Session not connected")]
    NotConnected,

    /// A caller query was executed but the driver rejected it.
    /// 调用者查询已执行，但驱动拒绝了它。
    #[error("Driver command {command} failed with {response:?}")]
    QueryFailed {
        command: Command,
        response: ApiResponse,
    },

    /// The driver accepted a query but produced no reading for it.
    /// 驱动接受了查询，但没有产生相应的读数。
    #[error("Driver command {command} produced no reading")]
    MissingReading { command: Command },

    /// The control loop did not reach the ready state before shutdown.
    /// 控制循环在关闭前未到达就绪状态。
    #[error("Session did not return to ready within {0:?}")]
    ShutdownTimeout(Duration),
}

/// A specialized `Result` type for this library.
/// 本库专用的 `Result` 类型。
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        use std::io::ErrorKind;
        match err {
            Error::ChannelClosed => ErrorKind::BrokenPipe.into(),
            Error::CommandTimeout { .. } => ErrorKind::TimedOut.into(),
            Error::ShutdownTimeout(_) => ErrorKind::TimedOut.into(),
            Error::Backend(msg) => std::io::Error::other(msg),
            Error::DeviceNotReady => ErrorKind::NotFound.into(),
            Error::NotConnected => ErrorKind::NotConnected.into(),
            Error::QueryFailed { .. } => ErrorKind::Other.into(),
            Error::MissingReading { .. } => ErrorKind::InvalidData.into(),
        }
    }
}
