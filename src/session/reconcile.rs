//! 目标调和逻辑模块
//! Goal Reconciliation Logic Module
//!
//! Decides which state the machine moves to when its current state is not
//! progressing toward the goal. There is exactly one way up
//! (ready → initializing → initialized → connecting → connected) and one way
//! down (any → disconnecting → disconnected → ready).
//!
//! 决定当当前状态没有朝目标推进时，状态机应转移到哪个状态。
//! 只有一条上升路径和一条下降路径。

use crate::session::state::{Goal, LifecycleState};

/// Returns the state to move to, or `None` when the current state is already
/// converging on the goal.
///
/// 返回要转移到的状态；当前状态已在朝目标收敛时返回 `None`。
pub fn reconcile(goal: Goal, current: LifecycleState) -> Option<LifecycleState> {
    use LifecycleState::*;

    let next = match goal {
        Goal::Ready | Goal::Disconnected => match current {
            Initializing | Initialized | Connecting | Connected => Disconnecting,
            Disconnected if goal == Goal::Ready => Ready,
            // Teardown finishes on its own; ready and disconnected are resting states.
            Ready | Disconnecting | Disconnected => return None,
        },
        Goal::Initialized | Goal::Connected => {
            if is_converging(goal, current) {
                return None;
            }
            Initializing
        }
    };
    (next != current).then_some(next)
}

/// 检查当前状态是否已在朝目标收敛。
/// Checks if the current state is already converging on the goal.
pub fn is_converging(goal: Goal, current: LifecycleState) -> bool {
    use LifecycleState::*;
    match goal {
        Goal::Initialized => matches!(current, Initializing | Initialized),
        Goal::Connected => matches!(current, Initializing | Initialized | Connecting),
        Goal::Ready => matches!(current, Ready),
        Goal::Disconnected => matches!(current, Ready | Disconnected),
    }
}
