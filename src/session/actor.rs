//! The control loop that owns the state machine.
//! 拥有状态机的控制循环。

use crate::{
    driver::{DriverBackend, DriverEvent},
    session::{command::SessionCommand, machine::SessionStateMachine},
};
use tokio::{
    sync::mpsc,
    time::{Instant, sleep_until},
};
use tracing::{debug, info};

/// Runs ticks on a data-dependent schedule and serves caller commands while
/// it sleeps.
///
/// 按照依赖数据的时间表运行 tick，并在休眠期间处理调用者命令。
pub(crate) struct SessionActor<B: DriverBackend> {
    machine: SessionStateMachine<B>,
    command_rx: mpsc::Receiver<SessionCommand>,
    event_rx: mpsc::UnboundedReceiver<DriverEvent>,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

impl<B: DriverBackend> SessionActor<B> {
    pub(crate) fn new(
        machine: SessionStateMachine<B>,
        command_rx: mpsc::Receiver<SessionCommand>,
        event_rx: mpsc::UnboundedReceiver<DriverEvent>,
    ) -> Self {
        Self {
            machine,
            command_rx,
            event_rx,
        }
    }

    /// Runs the control loop until shutdown or until every handle is dropped.
    ///
    /// 运行控制循环，直到关闭或所有句柄都被丢弃。
    pub(crate) async fn run(mut self) {
        info!(goal = ?self.machine.goal(), "Session control loop started");
        loop {
            // 1. Driver notifications are applied before the step they may affect.
            // 1. 驱动通知在可能受其影响的步骤之前应用。
            while let Ok(event) = self.event_rx.try_recv() {
                self.machine.handle_driver_event(event).await;
            }

            // 2. One script step.
            // 2. 一个脚本步骤。
            self.machine.tick().await;

            // 3. Sleep, serving commands in the meantime.
            // 3. 休眠，同时处理命令。
            let deadline = Instant::now() + self.machine.poll_interval();
            loop {
                tokio::select! {
                    _ = sleep_until(deadline) => break,
                    command = self.command_rx.recv() => {
                        let Some(command) = command else {
                            debug!("All session handles dropped");
                            info!("Session control loop stopped");
                            return;
                        };
                        if self.handle_command(command).await == Flow::Stop {
                            info!(state = ?self.machine.current_state(), "Session control loop stopped");
                            return;
                        }
                    }
                }
            }
        }
    }

    async fn handle_command(&mut self, command: SessionCommand) -> Flow {
        let machine = &mut self.machine;
        // A dropped response receiver means the caller gave up; nothing to do.
        match command {
            SessionCommand::SetGoal(goal) => machine.set_goal(goal),
            SessionCommand::SelectNetwork(name) => machine.select_network(&name),
            SessionCommand::Snapshot { response_tx } => {
                let _ = response_tx.send(machine.snapshot());
            }
            SessionCommand::DeviceList { response_tx } => {
                let _ = response_tx.send(machine.device_list().await);
            }
            SessionCommand::NetworkList { response_tx } => {
                let _ = response_tx.send(machine.network_list().await);
            }
            SessionCommand::WideScan { response_tx } => {
                let _ = response_tx.send(machine.perform_wide_scan().await);
            }
            SessionCommand::ConnectedNsp { response_tx } => {
                let _ = response_tx.send(machine.connected_nsp().await);
            }
            SessionCommand::Statistics { response_tx } => {
                let _ = response_tx.send(machine.statistics().await);
            }
            SessionCommand::LinkStatus { response_tx } => {
                let _ = response_tx.send(machine.link_status().await);
            }
            SessionCommand::DeviceInfo { response_tx } => {
                let _ = response_tx.send(machine.device_info().await);
            }
            SessionCommand::PackageInfo { response_tx } => {
                let _ = response_tx.send(machine.package_info().await);
            }
            SessionCommand::SetPackageUpdateState { state, response_tx } => {
                let _ = response_tx.send(machine.set_package_update_state(state).await);
            }
            SessionCommand::ContactInformation { response_tx } => {
                let _ = response_tx.send(machine.contact_information().await);
            }
            SessionCommand::ProvisioningStatus { response_tx } => {
                let _ = response_tx.send(machine.provisioning_status().await);
            }
            SessionCommand::Shutdown { response_tx } => {
                let _ = response_tx.send(());
                return Flow::Stop;
            }
        }
        Flow::Continue
    }
}
