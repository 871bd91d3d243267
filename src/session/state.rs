//! 会话状态和目标的定义。
//! Definitions of session states and goals.

use std::fmt;

/// The state the control loop currently occupies.
/// 控制循环当前所处的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Ready,
    Initializing,
    Initialized,
    Connecting,
    Connected,
    Disconnecting,
    Disconnected,
}

impl LifecycleState {
    /// 检查设备是否已打开并可接受查询。
    /// Checks if the device is open and can accept queries.
    pub fn is_device_ready(&self) -> bool {
        matches!(
            self,
            LifecycleState::Initialized | LifecycleState::Connecting | LifecycleState::Connected
        )
    }

    /// 检查是否处于上升路径（准备 → 已连接）上。
    /// Checks if the state lies on the ascending path (ready → connected).
    pub fn is_ascending(&self) -> bool {
        matches!(
            self,
            LifecycleState::Initializing
                | LifecycleState::Initialized
                | LifecycleState::Connecting
                | LifecycleState::Connected
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&WimaxState::from(*self), f)
    }
}

/// The end state requested by callers.
/// 调用者请求的最终状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Goal {
    #[default]
    Ready,
    Initialized,
    Connected,
    Disconnected,
}

/// The externally reported state. `Unknown` precedes the first report and
/// `Scanning` is a transient report emitted while initialization waits for
/// the radio.
///
/// 对外报告的状态。`Unknown` 出现在第一次报告之前，`Scanning` 是初始化等待
/// 无线电时发出的瞬态报告。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum WimaxState {
    #[default]
    Unknown = 0,
    Ready = 1,
    Initializing = 3,
    Scanning = 4,
    Initialized = 5,
    Connecting = 6,
    Connected = 7,
    Disconnecting = 8,
    Disconnected = 9,
}

impl WimaxState {
    pub fn from_i32(value: i32) -> Option<Self> {
        use WimaxState::*;
        let state = match value {
            0 => Unknown,
            1 => Ready,
            3 => Initializing,
            4 => Scanning,
            5 => Initialized,
            6 => Connecting,
            7 => Connected,
            8 => Disconnecting,
            9 => Disconnected,
            _ => return None,
        };
        Some(state)
    }

    pub fn is_connected(&self) -> bool {
        *self == WimaxState::Connected
    }
}

impl From<LifecycleState> for WimaxState {
    fn from(state: LifecycleState) -> Self {
        match state {
            LifecycleState::Ready => WimaxState::Ready,
            LifecycleState::Initializing => WimaxState::Initializing,
            LifecycleState::Initialized => WimaxState::Initialized,
            LifecycleState::Connecting => WimaxState::Connecting,
            LifecycleState::Connected => WimaxState::Connected,
            LifecycleState::Disconnecting => WimaxState::Disconnecting,
            LifecycleState::Disconnected => WimaxState::Disconnected,
        }
    }
}

impl fmt::Display for WimaxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WimaxState::Unknown => "UNKNOWN",
            WimaxState::Ready => "READY",
            WimaxState::Initializing => "INITIALIZING",
            WimaxState::Scanning => "SCANNING",
            WimaxState::Initialized => "INITIALIZED",
            WimaxState::Connecting => "CONNECTING",
            WimaxState::Connected => "CONNECTED",
            WimaxState::Disconnecting => "DISCONNECTING",
            WimaxState::Disconnected => "DISCONNECTED",
        };
        write!(f, "{}", s)
    }
}
