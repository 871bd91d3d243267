//! Health monitor for an established connection.
//! 已建立连接的健康监视器。
//!
//! Cycles a device-status probe and a link-status probe for as long as the goal
//! stays connected. A completed cycle leaves an RSSI sample for the machine.
//!
//! 只要目标保持为已连接，就循环执行设备状态探测和链路状态探测。
//! 完成的一轮会为状态机留下一个 RSSI 样本。

use crate::{
    driver::{Command, CommandArgs, DeviceStatus, DriverBackend, DriverFacade},
    session::{
        script::{ScriptCursor, ScriptStatus},
        states::initializing::SCANNING_MESSAGE,
    },
};
use tracing::debug;

pub(crate) const SCRIPT: &[Command] = &[Command::GetDeviceStatus, Command::GetLinkStatus];

#[derive(Debug)]
pub(crate) struct Connected {
    cursor: ScriptCursor,
    cycle_complete: bool,
    rssi_sample: Option<i32>,
    message: Option<&'static str>,
}

impl Connected {
    pub(crate) fn new() -> Self {
        Self {
            cursor: ScriptCursor::new(SCRIPT),
            cycle_complete: false,
            rssi_sample: None,
            message: None,
        }
    }

    pub(crate) fn cursor(&self) -> &ScriptCursor {
        &self.cursor
    }

    /// Both probes ran since the last device-status probe started a cycle.
    /// 自上一次设备状态探测开始一轮以来，两个探测都已运行。
    pub(crate) fn cycle_complete(&self) -> bool {
        self.cycle_complete
    }

    pub(crate) fn message(&self) -> Option<&'static str> {
        self.message
    }

    /// RSSI in dBm read by the last completed cycle, if it produced one.
    pub(crate) fn take_rssi_sample(&mut self) -> Option<i32> {
        self.rssi_sample.take()
    }

    pub(crate) async fn execute<B: DriverBackend>(
        &mut self,
        driver: &mut DriverFacade<B>,
    ) -> ScriptStatus {
        self.message = None;
        let Some(command) = self.cursor.start_or_current() else {
            return ScriptStatus::Completed;
        };
        let response = driver.execute_or_fail(command, CommandArgs::None).await;

        if command == Command::GetDeviceStatus {
            self.cycle_complete = false;
            if !response.is_success() {
                debug!(%response, "Health probe failed");
                return ScriptStatus::Failed;
            }
            return match driver.context().device_status() {
                Some(DeviceStatus::DataConnected) => {
                    self.cursor.advance();
                    ScriptStatus::Running
                }
                Some(status) if status.is_busy() => {
                    self.message = Some(SCANNING_MESSAGE);
                    ScriptStatus::Scanning
                }
                status => {
                    debug!(?status, "Data path lost");
                    ScriptStatus::Failed
                }
            };
        }

        // The link probe never fails the cycle; it only feeds the RSSI sample.
        if response.is_success() {
            self.rssi_sample = driver.context().link_status().map(|link| link.rssi_dbm());
        }
        self.cursor.advance();
        self.cycle_complete = true;
        ScriptStatus::Completed
    }
}
