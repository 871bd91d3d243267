#![deny(clippy::expect_used, clippy::unwrap_used)]

//! The root of the WiMAX session management library.
//! WiMAX 会话管理库的根。
//!
//! A single control loop steers an opaque radio driver toward a caller-requested
//! goal (ready / initialized / connected / disconnected) by running small scripts
//! of driver commands and reconciling the observed state with that goal.
//!
//! 单个控制循环通过运行驱动命令脚本，并将观察到的状态与调用者请求的目标进行调和，
//! 引导不透明的无线驱动到达目标状态。

pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod session;
pub mod signal;

pub use config::Config;
pub use error::{Error, Result};
pub use events::{EventSink, SessionEvent};
pub use session::{Goal, LifecycleState, SessionHandle, WimaxState};
