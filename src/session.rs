//! The session state machine and the control loop that drives it.
//! 会话状态机以及驱动它的控制循环。
//!
//! [`SessionHandle::spawn`] starts a control loop that owns a
//! [`SessionStateMachine`]. Callers steer it by setting a [`Goal`]; the loop
//! ticks the machine, which runs one script step of its current
//! [`LifecycleState`] per tick and publishes [`WimaxState`] changes.
//!
//! [`SessionHandle::spawn`] 启动一个拥有 [`SessionStateMachine`] 的控制循环。
//! 调用者通过设置 [`Goal`] 来引导它；循环对状态机进行 tick，每次 tick
//! 运行当前 [`LifecycleState`] 的一个脚本步骤并发布 [`WimaxState`] 变化。

mod actor;
pub mod command;
pub mod handle;
pub mod machine;
pub mod reconcile;
pub mod script;
pub mod state;
pub(crate) mod states;

#[cfg(test)]
mod tests;

pub use handle::SessionHandle;
pub use machine::{SessionSnapshot, SessionStateMachine};
pub use reconcile::reconcile;
pub use script::{ScriptCursor, ScriptStatus};
pub use state::{Goal, LifecycleState, WimaxState};
