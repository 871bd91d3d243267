//! 会话状态机 - 负责在每次 tick 时推进脚本并朝目标调和
//! Session state machine - advances scripts on every tick and reconciles toward the goal

use crate::{
    config::{Config, SessionConfig},
    driver::{
        Command, CommandArgs, ConnectedNspInfo, ConnectionStatistics, ContactInfo, DeviceInfo,
        DriverBackend, DriverEvent, DriverFacade, HardwareDeviceId, LinkStatusInfo, NspInfo,
        PackageInfo, PackageUpdateState, PowerState, SessionContext,
    },
    error::{Error, Result},
    events::{EventSink, SessionEvent},
    session::{
        reconcile::reconcile,
        script::ScriptStatus,
        state::{Goal, LifecycleState, WimaxState},
        states::SessionState,
    },
};
use std::{sync::Arc, time::Duration};
use tracing::{debug, info, trace, warn};

/// A point-in-time view of the machine for callers.
/// 供调用者使用的状态机时间点视图。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: LifecycleState,
    pub reported: WimaxState,
    pub goal: Goal,
    pub preferred_nsp: String,
    pub last_message: Option<String>,
    pub final_message: Option<String>,
}

/// Owns the driver and the current state; steers toward the goal one step per tick.
///
/// 拥有驱动和当前状态；每次 tick 朝目标推进一步。
pub struct SessionStateMachine<B: DriverBackend> {
    driver: DriverFacade<B>,
    state: SessionState,
    goal: Goal,
    config: SessionConfig,
    preferred_nsp: String,
    sink: Arc<dyn EventSink>,
    /// 最后一次发布的状态，用于去重
    /// Last published state, used for deduplication
    last_reported: WimaxState,
    last_rssi: Option<i32>,
    last_message: Option<&'static str>,
    final_message: Option<&'static str>,
}

impl<B: DriverBackend> std::fmt::Debug for SessionStateMachine<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStateMachine")
            .field("state", &self.state)
            .field("goal", &self.goal)
            .field("preferred_nsp", &self.preferred_nsp)
            .field("last_reported", &self.last_reported)
            .finish()
    }
}

impl<B: DriverBackend> SessionStateMachine<B> {
    /// 创建处于就绪状态的状态机。第一次 tick 会报告就绪状态。
    /// Creates a machine in the ready state. The first tick reports it.
    pub fn new(config: Config, backend: B, sink: Arc<dyn EventSink>) -> Self {
        Self {
            driver: DriverFacade::new(backend, config.driver),
            state: SessionState::Ready,
            goal: Goal::Ready,
            preferred_nsp: config.session.default_nsp.clone(),
            config: config.session,
            sink,
            last_reported: WimaxState::Unknown,
            last_rssi: None,
            last_message: None,
            final_message: None,
        }
    }

    pub fn current_state(&self) -> LifecycleState {
        self.state.lifecycle()
    }

    /// The last state published to the sink.
    /// 最后发布到接收器的状态。
    pub fn reported_state(&self) -> WimaxState {
        self.last_reported
    }

    pub fn goal(&self) -> Goal {
        self.goal
    }

    /// Records the requested end state. Takes effect on the next tick.
    /// 记录请求的最终状态。在下一次 tick 生效。
    pub fn set_goal(&mut self, goal: Goal) {
        if self.goal != goal {
            debug!(from = ?self.goal, to = ?goal, "Goal changed");
            self.goal = goal;
        }
    }

    pub fn preferred_nsp(&self) -> &str {
        &self.preferred_nsp
    }

    /// Changes the preferred NSP. A connection in progress or established to a
    /// possibly different NSP is torn down so the next ascent uses the new one.
    ///
    /// 更改首选 NSP。正在进行或已建立的连接会被拆除，以便下一次上升使用新的 NSP。
    pub fn select_network(&mut self, name: &str) {
        if self.preferred_nsp.eq_ignore_ascii_case(name) {
            return;
        }
        info!(from = %self.preferred_nsp, to = name, "Preferred NSP changed");
        self.preferred_nsp = name.to_string();
        if self.goal == Goal::Connected
            && matches!(
                self.current_state(),
                LifecycleState::Connecting | LifecycleState::Connected
            )
        {
            self.transition_to(LifecycleState::Disconnecting);
        }
    }

    pub fn last_message(&self) -> Option<&'static str> {
        self.last_message
    }

    /// The message of the last initialization that gave up.
    /// 最后一次放弃的初始化的消息。
    pub fn final_message(&self) -> Option<&'static str> {
        self.final_message
    }

    pub fn script_position(&self) -> Option<usize> {
        self.state.script_position()
    }

    pub fn context(&self) -> &SessionContext {
        self.driver.context()
    }

    pub fn backend(&self) -> &B {
        self.driver.backend()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.current_state(),
            reported: self.last_reported,
            goal: self.goal,
            preferred_nsp: self.preferred_nsp.clone(),
            last_message: self.last_message.map(str::to_string),
            final_message: self.final_message.map(str::to_string),
        }
    }

    /// How long to wait before the next tick.
    /// 下一次 tick 前的等待时间。
    pub fn poll_interval(&self) -> Duration {
        match &self.state {
            SessionState::Connected(monitor) if monitor.cycle_complete() => {
                self.config.connected_poll_interval
            }
            _ => self.config.poll_interval,
        }
    }

    /// Runs one step of the current state and any transition it leads to.
    /// 运行当前状态的一步以及由此引起的任何转换。
    pub async fn tick(&mut self) {
        if self.last_reported == WimaxState::Unknown {
            let current = self.current_state();
            self.report(current.into());
        }

        match self.current_state() {
            LifecycleState::Ready | LifecycleState::Disconnected => self.reconcile(),
            LifecycleState::Initialized => {
                if self.goal == Goal::Connected {
                    self.transition_to(LifecycleState::Connecting);
                } else {
                    self.reconcile();
                }
            }
            LifecycleState::Initializing => self.tick_initializing().await,
            LifecycleState::Connecting => self.tick_connecting().await,
            LifecycleState::Connected => self.tick_connected().await,
            LifecycleState::Disconnecting => self.tick_disconnecting().await,
        }
    }

    async fn tick_initializing(&mut self) {
        if !matches!(self.goal, Goal::Initialized | Goal::Connected) {
            return self.reconcile();
        }
        let budget = self.config.network_scan_retry_count;
        let SessionState::Initializing(script) = &mut self.state else {
            return;
        };
        let status = script.execute(&mut self.driver, budget).await;
        let message = script.message();
        self.last_message = message;

        match status {
            ScriptStatus::Running => {}
            ScriptStatus::Scanning => self.report(WimaxState::Scanning),
            ScriptStatus::Completed => self.transition_to(LifecycleState::Initialized),
            ScriptStatus::Failed => {
                warn!(
                    message = message.unwrap_or_default(),
                    "Initialization failed, returning to ready"
                );
                self.final_message = message;
                self.goal = Goal::Ready;
                self.reconcile();
            }
        }
    }

    async fn tick_connecting(&mut self) {
        if self.goal != Goal::Connected {
            return self.reconcile();
        }
        let SessionState::Connecting(script) = &mut self.state else {
            return;
        };
        let status = script.execute(&mut self.driver, &self.preferred_nsp).await;
        let card_lost = script.message();

        match status {
            ScriptStatus::Running => {}
            ScriptStatus::Completed => self.transition_to(LifecycleState::Connected),
            ScriptStatus::Scanning => self.transition_to(LifecycleState::Initializing),
            ScriptStatus::Failed => {
                warn!(nsp = %self.preferred_nsp, "Connection attempt failed");
                // A lost card ends the session instead of climbing again.
                if let Some(message) = card_lost {
                    self.last_message = Some(message);
                    self.final_message = Some(message);
                    self.goal = Goal::Ready;
                }
                self.transition_to(LifecycleState::Ready);
            }
        }
    }

    async fn tick_connected(&mut self) {
        if self.goal != Goal::Connected {
            return self.reconcile();
        }
        let SessionState::Connected(monitor) = &mut self.state else {
            return;
        };
        let status = monitor.execute(&mut self.driver).await;
        let sample = monitor.take_rssi_sample();
        self.last_message = monitor.message();

        match status {
            ScriptStatus::Completed => {
                if let Some(dbm) = sample {
                    self.publish_rssi(dbm);
                }
            }
            ScriptStatus::Failed => {
                info!("Connection health probe failed, reconnecting");
                self.transition_to(LifecycleState::Connecting);
            }
            ScriptStatus::Running | ScriptStatus::Scanning => {}
        }
    }

    async fn tick_disconnecting(&mut self) {
        let SessionState::Disconnecting(script) = &mut self.state else {
            return;
        };
        if script.execute(&mut self.driver).await == ScriptStatus::Completed {
            self.transition_to(LifecycleState::Disconnected);
        }
    }

    fn reconcile(&mut self) {
        if let Some(next) = reconcile(self.goal, self.current_state()) {
            self.transition_to(next);
        }
    }

    fn transition_to(&mut self, next: LifecycleState) {
        let from = self.current_state();
        if from == next {
            return;
        }
        info!(?from, to = ?next, goal = ?self.goal, "Session state transition");
        self.state = SessionState::enter(next);
        self.report(next.into());
    }

    fn report(&mut self, state: WimaxState) {
        if self.last_reported == state {
            return;
        }
        let previous = std::mem::replace(&mut self.last_reported, state);
        let bsid = if state.is_connected() {
            self.driver
                .context()
                .link_status()
                .map(|link| link.bsid.to_string())
        } else {
            None
        };
        debug!(%state, %previous, ?bsid, "Publishing state change");
        self.sink.publish(SessionEvent::StateChanged {
            state,
            previous,
            bsid,
        });
    }

    fn publish_rssi(&mut self, dbm: i32) {
        if self.last_rssi == Some(dbm) {
            return;
        }
        trace!(dbm, previous = ?self.last_rssi, "RSSI changed");
        self.last_rssi = Some(dbm);
        self.sink.publish(SessionEvent::RssiChanged { dbm });
    }

    /// Applies a driver notification. Only goals change here; transitions
    /// happen on the following tick.
    ///
    /// 应用驱动通知。这里只改变目标；转换在随后的 tick 中发生。
    pub async fn handle_driver_event(&mut self, event: DriverEvent) {
        debug!(?event, goal = ?self.goal, "Driver notification");
        match event {
            DriverEvent::DeviceInsertRemove { present } => {
                self.driver.context_mut().device_present = Some(present);
                if !present {
                    info!("Device removed");
                    self.set_goal(Goal::Ready);
                } else if self.goal == Goal::Ready && self.config.auto_connect_on_insert {
                    info!("Device inserted, connecting");
                    self.set_goal(Goal::Connected);
                }
            }
            DriverEvent::ControlPowerManagement { state } => {
                if state == PowerState::Off && self.goal == Goal::Connected {
                    info!("Radio powered off");
                    self.set_goal(Goal::Ready);
                }
            }
            DriverEvent::ConnectToNetwork { status } => {
                if status == 0 && self.goal != Goal::Connected {
                    self.check_presence().await;
                }
            }
            DriverEvent::DisconnectToNetwork { status } => {
                if status == 1 && self.goal != Goal::Disconnected {
                    self.check_presence().await;
                }
            }
            DriverEvent::NetworkSearchWideScan { networks } => {
                self.check_presence().await;
                self.sink.publish(SessionEvent::WideScanResults { networks });
            }
            DriverEvent::ProvisioningOperation { status, .. } => {
                self.sink.publish(SessionEvent::ProvisioningUpdate {
                    message: status.description().to_string(),
                });
            }
            DriverEvent::PackageUpdate { status } => {
                self.sink.publish(SessionEvent::PackageUpdate {
                    message: status.description().to_string(),
                });
            }
            DriverEvent::DeviceStatusChange { .. } => {}
        }
    }

    async fn check_presence(&mut self) {
        if self.driver.is_card_connected().await {
            if self.goal == Goal::Ready {
                self.set_goal(Goal::Connected);
            }
        } else {
            self.set_goal(Goal::Ready);
        }
    }

    fn require_device_ready(&self) -> Result<()> {
        if self.current_state().is_device_ready() {
            Ok(())
        } else {
            Err(Error::DeviceNotReady)
        }
    }

    fn require_connected(&self) -> Result<()> {
        if self.current_state() == LifecycleState::Connected {
            Ok(())
        } else {
            Err(Error::NotConnected)
        }
    }

    async fn query(&mut self, command: Command, args: CommandArgs) -> Result<()> {
        let response = self.driver.execute(command, args).await?;
        if response.is_success() {
            Ok(())
        } else {
            Err(Error::QueryFailed { command, response })
        }
    }

    pub async fn device_list(&mut self) -> Result<Vec<HardwareDeviceId>> {
        self.require_device_ready()?;
        self.query(Command::GetListDevice, CommandArgs::None).await?;
        Ok(self.context().devices().to_vec())
    }

    pub async fn network_list(&mut self) -> Result<Vec<NspInfo>> {
        self.require_device_ready()?;
        self.query(Command::GetNetworkList, CommandArgs::None).await?;
        Ok(self.context().networks().to_vec())
    }

    /// Starts a wide scan. Results arrive as a wide-scan notification.
    /// 开始宽扫描。结果以宽扫描通知的形式到达。
    pub async fn perform_wide_scan(&mut self) -> Result<()> {
        self.require_device_ready()?;
        self.query(Command::CmdNetworkSearchWideScan, CommandArgs::None)
            .await
    }

    pub async fn connected_nsp(&mut self) -> Result<ConnectedNspInfo> {
        self.require_connected()?;
        let command = Command::GetConnectedNsp;
        self.query(command, CommandArgs::None).await?;
        self.context()
            .connected_nsp()
            .cloned()
            .ok_or(Error::MissingReading { command })
    }

    pub async fn statistics(&mut self) -> Result<ConnectionStatistics> {
        self.require_connected()?;
        let command = Command::GetStatistics;
        self.query(command, CommandArgs::None).await?;
        self.context()
            .statistics()
            .copied()
            .ok_or(Error::MissingReading { command })
    }

    pub async fn link_status(&mut self) -> Result<LinkStatusInfo> {
        self.require_connected()?;
        let command = Command::GetLinkStatus;
        self.query(command, CommandArgs::None).await?;
        self.context()
            .link_status()
            .cloned()
            .ok_or(Error::MissingReading { command })
    }

    pub async fn device_info(&mut self) -> Result<DeviceInfo> {
        self.require_device_ready()?;
        let command = Command::GetDeviceInformation;
        self.query(command, CommandArgs::None).await?;
        self.context()
            .device_info()
            .cloned()
            .ok_or(Error::MissingReading { command })
    }

    pub async fn package_info(&mut self) -> Result<PackageInfo> {
        self.require_device_ready()?;
        let command = Command::GetPackageInformation;
        self.query(command, CommandArgs::None).await?;
        self.context()
            .package_info()
            .cloned()
            .ok_or(Error::MissingReading { command })
    }

    pub async fn set_package_update_state(&mut self, state: PackageUpdateState) -> Result<()> {
        self.require_device_ready()?;
        self.query(
            Command::SetPackageUpdateState,
            CommandArgs::PackageUpdateState(state),
        )
        .await
    }

    pub async fn contact_information(&mut self) -> Result<Vec<ContactInfo>> {
        self.require_device_ready()?;
        self.query(Command::GetContactInformation, CommandArgs::None)
            .await?;
        Ok(self.context().contacts().to_vec())
    }

    pub async fn provisioning_status(&mut self) -> Result<bool> {
        self.require_device_ready()?;
        let command = Command::GetProvisioningStatus;
        self.query(command, CommandArgs::None).await?;
        self.context()
            .provisioned()
            .ok_or(Error::MissingReading { command })
    }
}
