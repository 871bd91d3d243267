//! 会话向外部观察者发布的事件。
//! Events the session publishes to external observers.

use crate::{driver::NspInfo, session::WimaxState};
use tokio::sync::{broadcast, mpsc};

/// A notification published by the control loop.
/// 控制循环发布的通知。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// 报告的状态发生变化。连续重复的状态只发布一次。
    /// The reported state changed. Consecutive duplicates are published once.
    StateChanged {
        state: WimaxState,
        previous: WimaxState,
        /// Base station id, present when entering `Connected` with link data.
        /// 基站 ID，在进入 `Connected` 且有链路数据时存在。
        bsid: Option<String>,
    },
    /// 已连接时的信号强度变化。
    /// The signal strength changed while connected.
    RssiChanged { dbm: i32 },
    ProvisioningUpdate { message: String },
    PackageUpdate { message: String },
    WideScanResults { networks: Vec<NspInfo> },
}

/// Receives session events. Implementations must not block.
/// 接收会话事件。实现不得阻塞。
pub trait EventSink: Send + Sync + 'static {
    fn publish(&self, event: SessionEvent);
}

impl EventSink for mpsc::UnboundedSender<SessionEvent> {
    fn publish(&self, event: SessionEvent) {
        // Nobody listening is not an error.
        let _ = self.send(event);
    }
}

impl EventSink for broadcast::Sender<SessionEvent> {
    fn publish(&self, event: SessionEvent) {
        let _ = self.send(event);
    }
}

/// 事件监听器类型定义
/// Event listener type definition
pub type EventListener = Box<dyn Fn(&SessionEvent) + Send + Sync>;

/// A list of closures, each called with every published event.
/// 闭包列表，每个闭包都会收到每个发布的事件。
#[derive(Default)]
pub struct EventListeners {
    listeners: Vec<EventListener>,
}

impl std::fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventListeners")
            .field("listeners_count", &self.listeners.len())
            .finish()
    }
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册事件监听器
    /// Register event listener
    pub fn register(&mut self, listener: EventListener) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl EventSink for EventListeners {
    fn publish(&self, event: SessionEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }
}
