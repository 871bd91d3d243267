//! The current state together with its per-entry script progress.
//! 当前状态及其每次进入时的脚本进度。
//!
//! Each entry builds a fresh value, so every scripted state starts its script
//! from the top when it is re-entered.
//!
//! 每次进入都会构建一个新值，因此每个脚本状态在重新进入时都会从头开始运行脚本。

pub(crate) mod connected;
pub(crate) mod connecting;
pub(crate) mod disconnecting;
pub(crate) mod initializing;

use crate::session::state::LifecycleState;
use connected::Connected;
use connecting::Connecting;
use disconnecting::Disconnecting;
use initializing::Initializing;

#[derive(Debug)]
pub(crate) enum SessionState {
    Ready,
    Initializing(Initializing),
    Initialized,
    Connecting(Connecting),
    Connected(Connected),
    Disconnecting(Disconnecting),
    Disconnected,
}

impl SessionState {
    /// 进入一个状态，构建新的脚本进度。
    /// Enters a state with fresh script progress.
    pub(crate) fn enter(state: LifecycleState) -> Self {
        match state {
            LifecycleState::Ready => SessionState::Ready,
            LifecycleState::Initializing => SessionState::Initializing(Initializing::new()),
            LifecycleState::Initialized => SessionState::Initialized,
            LifecycleState::Connecting => SessionState::Connecting(Connecting::new()),
            LifecycleState::Connected => SessionState::Connected(Connected::new()),
            LifecycleState::Disconnecting => SessionState::Disconnecting(Disconnecting::new()),
            LifecycleState::Disconnected => SessionState::Disconnected,
        }
    }

    pub(crate) fn lifecycle(&self) -> LifecycleState {
        match self {
            SessionState::Ready => LifecycleState::Ready,
            SessionState::Initializing(_) => LifecycleState::Initializing,
            SessionState::Initialized => LifecycleState::Initialized,
            SessionState::Connecting(_) => LifecycleState::Connecting,
            SessionState::Connected(_) => LifecycleState::Connected,
            SessionState::Disconnecting(_) => LifecycleState::Disconnecting,
            SessionState::Disconnected => LifecycleState::Disconnected,
        }
    }

    /// Cursor position of the running script, `None` for scriptless states.
    /// 正在运行的脚本的游标位置，无脚本状态为 `None`。
    pub(crate) fn script_position(&self) -> Option<usize> {
        match self {
            SessionState::Initializing(state) => state.cursor().position(),
            SessionState::Connecting(state) => state.cursor().position(),
            SessionState::Connected(state) => state.cursor().position(),
            SessionState::Disconnecting(state) => state.cursor().position(),
            SessionState::Ready | SessionState::Initialized | SessionState::Disconnected => None,
        }
    }
}
