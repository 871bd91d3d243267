//! 状态脚本的游标和步骤结果。
//! Cursor and step outcome shared by the state scripts.

use crate::driver::Command;

/// Outcome of a single script step.
/// 单个脚本步骤的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStatus {
    /// Still working toward the end of the script.
    /// 仍在朝脚本末尾推进。
    Running,
    /// The radio is busy; the step is retried on a later tick.
    /// 无线电正忙；该步骤将在之后的 tick 重试。
    Scanning,
    Completed,
    Failed,
}

/// Progress through a fixed command script. `None` means not started or reset.
/// 固定命令脚本中的进度。`None` 表示尚未开始或已重置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCursor {
    script: &'static [Command],
    position: Option<usize>,
}

impl ScriptCursor {
    pub const fn new(script: &'static [Command]) -> Self {
        Self {
            script,
            position: None,
        }
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    pub fn reset(&mut self) {
        self.position = None;
    }

    /// Returns the command to run, starting over when the cursor is reset.
    /// 返回要运行的命令，游标被重置时从头开始。
    pub fn start_or_current(&mut self) -> Option<Command> {
        let index = match self.position {
            Some(index) if index < self.script.len() => index,
            _ => 0,
        };
        let command = self.script.get(index).copied()?;
        self.position = Some(index);
        Some(command)
    }

    /// The command before the cursor, if any.
    /// 游标之前的命令（如果有）。
    pub fn previous(&self) -> Option<Command> {
        let index = self.position?.checked_sub(1)?;
        self.script.get(index).copied()
    }

    /// The command after the cursor, if any.
    /// 游标之后的命令（如果有）。
    pub fn next(&self) -> Option<Command> {
        self.script.get(self.position? + 1).copied()
    }

    /// Moves to the next step. Returns `true` and resets when the script ran out.
    /// 移动到下一步。脚本执行完毕时返回 `true` 并重置。
    pub fn advance(&mut self) -> bool {
        let next = self.position.map_or(0, |index| index + 1);
        if next >= self.script.len() {
            self.position = None;
            true
        } else {
            self.position = Some(next);
            false
        }
    }

    /// Steps back so earlier probes run again.
    /// 后退，以便重新运行之前的探测。
    pub fn rewind(&mut self, steps: usize) {
        if let Some(index) = self.position {
            self.position = Some(index.saturating_sub(steps));
        }
    }
}
