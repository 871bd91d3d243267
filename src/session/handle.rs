//! The caller-facing API of a running session.
//! 运行中会话的调用者 API。

use crate::{
    config::Config,
    driver::{
        ConnectedNspInfo, ConnectionStatistics, ContactInfo, DeviceInfo, DriverBackend,
        DriverCallbacks, HardwareDeviceId, LinkStatusInfo, NspInfo, PackageInfo,
        PackageUpdateState,
    },
    error::{Error, Result},
    events::EventSink,
    session::{
        actor::SessionActor,
        command::SessionCommand,
        machine::{SessionSnapshot, SessionStateMachine},
        state::{Goal, LifecycleState},
    },
};
use std::{sync::Arc, time::Duration};
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

/// A cloneable handle to a session control loop.
///
/// 会话控制循环的可克隆句柄。
#[derive(Debug, Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
    poll_interval: Duration,
}

impl SessionHandle {
    /// Spawns the control loop on the current tokio runtime.
    ///
    /// Returns the caller handle and the callback sender the driver binding
    /// uses to post notifications. The loop starts in the ready state with a
    /// ready goal.
    ///
    /// 在当前 tokio 运行时上启动控制循环。
    ///
    /// 返回调用者句柄以及驱动绑定用于投递通知的回调发送器。
    /// 循环以就绪状态和就绪目标启动。
    pub fn spawn<B: DriverBackend>(
        config: Config,
        backend: B,
        sink: Arc<dyn EventSink>,
    ) -> (Self, DriverCallbacks) {
        let (command_tx, command_rx) = mpsc::channel(config.session.command_channel_capacity);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let poll_interval = config.session.poll_interval;

        let machine = SessionStateMachine::new(config, backend, sink);
        let actor = SessionActor::new(machine, command_rx, event_rx);
        tokio::spawn(actor.run());
        info!("Session spawned");

        (
            Self {
                command_tx,
                poll_interval,
            },
            DriverCallbacks::new(event_tx),
        )
    }

    async fn send(&self, command: SessionCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| Error::ChannelClosed)
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(make(response_tx)).await?;
        response_rx.await.map_err(|_| Error::ChannelClosed)
    }

    /// Requests an end state. Takes effect on the next tick.
    /// 请求一个最终状态。在下一次 tick 生效。
    pub async fn set_goal(&self, goal: Goal) -> Result<()> {
        self.send(SessionCommand::SetGoal(goal)).await
    }

    pub async fn initialize(&self) -> Result<()> {
        self.set_goal(Goal::Initialized).await
    }

    /// Prefers `nsp` and requests a connection.
    /// 首选 `nsp` 并请求连接。
    pub async fn connect(&self, nsp: &str) -> Result<()> {
        self.select_network(nsp).await?;
        self.set_goal(Goal::Connected).await
    }

    pub async fn disconnect(&self) -> Result<()> {
        self.set_goal(Goal::Disconnected).await
    }

    pub async fn go_ready(&self) -> Result<()> {
        self.set_goal(Goal::Ready).await
    }

    pub async fn select_network(&self, nsp: &str) -> Result<()> {
        self.send(SessionCommand::SelectNetwork(nsp.to_string()))
            .await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        self.request(|response_tx| SessionCommand::Snapshot { response_tx })
            .await
    }

    pub async fn current_state(&self) -> Result<LifecycleState> {
        Ok(self.snapshot().await?.state)
    }

    pub async fn goal(&self) -> Result<Goal> {
        Ok(self.snapshot().await?.goal)
    }

    pub async fn last_message(&self) -> Result<Option<String>> {
        Ok(self.snapshot().await?.last_message)
    }

    pub async fn final_message(&self) -> Result<Option<String>> {
        Ok(self.snapshot().await?.final_message)
    }

    pub async fn device_list(&self) -> Result<Vec<HardwareDeviceId>> {
        self.request(|response_tx| SessionCommand::DeviceList { response_tx })
            .await?
    }

    pub async fn network_list(&self) -> Result<Vec<NspInfo>> {
        self.request(|response_tx| SessionCommand::NetworkList { response_tx })
            .await?
    }

    pub async fn perform_wide_scan(&self) -> Result<()> {
        self.request(|response_tx| SessionCommand::WideScan { response_tx })
            .await?
    }

    pub async fn connected_nsp(&self) -> Result<ConnectedNspInfo> {
        self.request(|response_tx| SessionCommand::ConnectedNsp { response_tx })
            .await?
    }

    pub async fn statistics(&self) -> Result<ConnectionStatistics> {
        self.request(|response_tx| SessionCommand::Statistics { response_tx })
            .await?
    }

    pub async fn link_status(&self) -> Result<LinkStatusInfo> {
        self.request(|response_tx| SessionCommand::LinkStatus { response_tx })
            .await?
    }

    pub async fn device_info(&self) -> Result<DeviceInfo> {
        self.request(|response_tx| SessionCommand::DeviceInfo { response_tx })
            .await?
    }

    pub async fn package_info(&self) -> Result<PackageInfo> {
        self.request(|response_tx| SessionCommand::PackageInfo { response_tx })
            .await?
    }

    pub async fn set_package_update_state(&self, state: PackageUpdateState) -> Result<()> {
        self.request(|response_tx| SessionCommand::SetPackageUpdateState { state, response_tx })
            .await?
    }

    pub async fn contact_information(&self) -> Result<Vec<ContactInfo>> {
        self.request(|response_tx| SessionCommand::ContactInformation { response_tx })
            .await?
    }

    pub async fn provisioning_status(&self) -> Result<bool> {
        self.request(|response_tx| SessionCommand::ProvisioningStatus { response_tx })
            .await?
    }

    /// Stops the control loop immediately. The driver is left as it is.
    /// 立即停止控制循环。驱动保持原样。
    pub async fn shutdown(&self) -> Result<()> {
        self.request(|response_tx| SessionCommand::Shutdown { response_tx })
            .await
    }

    /// Requests the ready goal, waits up to `timeout` for the teardown to
    /// reach the ready state, then stops the control loop either way.
    ///
    /// 请求就绪目标，最多等待 `timeout` 让拆除到达就绪状态，然后无论如何都停止控制循环。
    pub async fn shutdown_gracefully(&self, timeout: Duration) -> Result<()> {
        self.go_ready().await?;
        let settled = tokio::time::timeout(timeout, async {
            while self.current_state().await? != LifecycleState::Ready {
                tokio::time::sleep(self.poll_interval).await;
            }
            Ok::<_, Error>(())
        })
        .await;
        self.shutdown().await?;

        match settled {
            Ok(result) => result,
            Err(_) => {
                warn!(?timeout, "Session did not settle before shutdown");
                Err(Error::ShutdownTimeout(timeout))
            }
        }
    }
}
