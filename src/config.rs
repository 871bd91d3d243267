//! 定义了会话控制循环和驱动门面的可配置参数。
//! Defines configurable parameters for the session control loop and the driver facade.

use std::time::Duration;

/// A structure containing all configurable parameters for a session.
///
/// 包含所有会话可配置参数的结构体。
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Control-loop related parameters.
    /// 控制循环相关参数。
    pub session: SessionConfig,

    /// Driver facade related parameters.
    /// 驱动门面相关参数。
    pub driver: DriverConfig,
}

/// Control-loop related parameters.
///
/// 控制循环相关参数。
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The sleep between two ticks in every state except a settled connection.
    /// 除稳定连接外所有状态下两次 tick 之间的休眠时间。
    pub poll_interval: Duration,
    /// The sleep between two ticks once the connected health probe completed a cycle.
    /// 已连接状态的健康探测完成一轮之后两次 tick 之间的休眠时间。
    pub connected_poll_interval: Duration,
    /// How many failed or empty network list fetches the initialization script
    /// tolerates before it gives up and the session returns to ready.
    ///
    /// 初始化脚本在放弃并返回就绪状态之前，能容忍的失败或空网络列表获取次数。
    pub network_scan_retry_count: u32,
    /// The NSP the connecting script prefers when it is present in the network list.
    /// 当网络列表中存在时，连接脚本优先选择的 NSP。
    pub default_nsp: String,
    /// Whether a device insertion while the goal is ready requests a connection.
    /// 当目标为就绪时插入设备是否请求连接。
    pub auto_connect_on_insert: bool,
    /// Capacity of the caller command channel.
    /// 调用者命令通道的容量。
    pub command_channel_capacity: usize,
}

/// Driver facade related parameters.
///
/// 驱动门面相关参数。
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Upper bound for a single driver command. `None` waits forever.
    /// 单个驱动命令的上限时间。`None` 表示无限等待。
    pub command_timeout: Option<Duration>,
    /// When disabled, subscribe and unsubscribe commands only flip local
    /// bookkeeping and never reach the backend.
    ///
    /// 禁用时，订阅和取消订阅命令只修改本地记录，不会到达后端。
    pub callbacks_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            connected_poll_interval: Duration::from_millis(1000),
            network_scan_retry_count: 10,
            default_nsp: "CLEAR".to_string(),
            auto_connect_on_insert: true,
            command_channel_capacity: 128,
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            command_timeout: Some(Duration::from_secs(30)),
            callbacks_enabled: true,
        }
    }
}
