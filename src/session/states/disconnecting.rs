//! Teardown that returns the driver to a clean, closed state.
//! 将驱动恢复到干净关闭状态的拆除流程。

use crate::{
    driver::{Command, CommandArgs, DriverBackend, DriverFacade},
    session::script::{ScriptCursor, ScriptStatus},
};
use tracing::debug;

pub(crate) const SCRIPT: &[Command] = &[
    Command::UnsubscribeDeviceStatusChange,
    Command::UnsubscribeDeviceInsertRemove,
    Command::UnsubscribeControlPowerManagement,
    Command::UnsubscribeConnectToNetwork,
    Command::UnsubscribeDisconnectToNetwork,
    Command::UnsubscribeNetworkSearchWideScan,
    Command::UnsubscribeProvisioningOperation,
    Command::UnsubscribePackageUpdate,
    Command::CmdDisconnectFromNetwork,
    Command::WiMaxDeviceClose,
    Command::WiMaxApiClose,
];

#[derive(Debug)]
pub(crate) struct Disconnecting {
    cursor: ScriptCursor,
}

impl Disconnecting {
    pub(crate) fn new() -> Self {
        Self {
            cursor: ScriptCursor::new(SCRIPT),
        }
    }

    pub(crate) fn cursor(&self) -> &ScriptCursor {
        &self.cursor
    }

    /// Runs one step. Results never change the course of the teardown.
    /// 运行一步。结果永远不会改变拆除流程。
    pub(crate) async fn execute<B: DriverBackend>(
        &mut self,
        driver: &mut DriverFacade<B>,
    ) -> ScriptStatus {
        let Some(command) = self.cursor.start_or_current() else {
            return ScriptStatus::Completed;
        };
        let response = driver.execute_or_fail(command, CommandArgs::None).await;
        if !response.is_success() {
            debug!(%command, %response, "Teardown step failed, continuing");
        }
        if self.cursor.advance() {
            ScriptStatus::Completed
        } else {
            ScriptStatus::Running
        }
    }
}
