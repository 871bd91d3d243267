//! A scripted driver backend for tests and simulations.
//! 用于测试和模拟的脚本化驱动后端。
//!
//! Without any scripting the backend behaves like a healthy card that sees a
//! single `CLEAR` network: it enumerates one device, reports `Ready` until a
//! connect succeeds and `DataConnected` afterwards, and returns link figures
//! only while connected. Tests queue one-shot replies per command or replace
//! the default reply of a command. Clones share the same script and log.
//!
//! 在没有任何脚本的情况下，后端表现为一张健康的网卡，只能看到一个 `CLEAR` 网络。
//! 测试可以为每个命令排队一次性回复，或替换命令的默认回复。克隆共享同一脚本和日志。

use crate::{
    driver::{
        command::Command,
        response::ApiResponse,
        structs::{
            Bsid, ConnectedNspInfo, ConnectionStatistics, DeviceInfo, DeviceVersion,
            HardwareDeviceId, InterfaceInfo, LinkStatusInfo, NspInfo, PackageInfo,
        },
        traits::{CommandRequest, DriverBackend, DriverReply, ReplyPayload},
        types::{ConnectionProgress, DeviceStatus},
    },
    error::{Error, Result},
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, AtomicU8, Ordering},
    },
    time::Duration,
};

#[derive(Debug, Clone)]
enum Step {
    Reply(DriverReply),
    Fault(String),
    Stall(Duration),
}

#[derive(Debug, Default)]
struct Shared {
    queued: DashMap<Command, VecDeque<Step>>,
    defaults: DashMap<Command, DriverReply>,
    log: Mutex<Vec<CommandRequest>>,
    connected: AtomicBool,
    link_rssi: AtomicU8,
}

#[derive(Debug, Clone)]
pub struct ScriptedBackend {
    shared: Arc<Shared>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedBackend {
    /// Raw RSSI byte of the built-in link reading (-60 dBm).
    pub const DEFAULT_LINK_RSSI: u8 = 63;

    pub fn new() -> Self {
        let shared = Shared::default();
        shared
            .link_rssi
            .store(Self::DEFAULT_LINK_RSSI, Ordering::Relaxed);
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Queues a one-shot reply, consumed by the next call of `command`.
    /// 排队一个一次性回复，由 `command` 的下一次调用消费。
    pub fn push_reply(&self, command: Command, reply: DriverReply) {
        self.push(command, Step::Reply(reply));
    }

    /// Queues a backend fault for the next call of `command`.
    /// 为 `command` 的下一次调用排队一个后端故障。
    pub fn push_fault(&self, command: Command, message: &str) {
        self.push(command, Step::Fault(message.to_string()));
    }

    /// Makes the next call of `command` hang for `delay` before answering normally.
    /// 使 `command` 的下一次调用在正常应答前挂起 `delay`。
    pub fn push_stall(&self, command: Command, delay: Duration) {
        self.push(command, Step::Stall(delay));
    }

    /// Replaces the reply `command` returns whenever nothing is queued.
    /// 替换 `command` 在没有排队回复时返回的回复。
    pub fn set_default(&self, command: Command, reply: DriverReply) {
        self.shared.defaults.insert(command, reply);
    }

    pub fn clear_default(&self, command: Command) {
        self.shared.defaults.remove(&command);
    }

    pub fn set_connected(&self, connected: bool) {
        self.shared.connected.store(connected, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    /// Sets the raw RSSI byte of the built-in link reading.
    pub fn set_link_rssi(&self, raw: u8) {
        self.shared.link_rssi.store(raw, Ordering::SeqCst);
    }

    /// Every request that reached the backend, oldest first.
    /// 到达后端的所有请求，按时间先后排列。
    pub fn requests(&self) -> Vec<CommandRequest> {
        self.log().clone()
    }

    pub fn commands(&self) -> Vec<Command> {
        self.log().iter().map(|request| request.command).collect()
    }

    pub fn count(&self, command: Command) -> usize {
        self.log()
            .iter()
            .filter(|request| request.command == command)
            .count()
    }

    pub fn clear_log(&self) {
        self.log().clear();
    }

    /// A network entry as the built-in network list reports it.
    pub fn sample_nsp(name: &str, id: u32) -> NspInfo {
        NspInfo {
            name: name.to_string(),
            id,
            rssi: 60,
            cinr: 25,
            network_type: 0,
        }
    }

    /// A link reading with the given raw RSSI byte.
    pub fn sample_link(rssi: u8) -> LinkStatusInfo {
        LinkStatusInfo {
            center_frequency: 2_593_000,
            rssi,
            cinr: 30,
            tx_power: 180,
            bsid: Bsid([0x00, 0x00, 0x01, 0x80, 0x00, 0x01]),
        }
    }

    fn push(&self, command: Command, step: Step) {
        self.shared.queued.entry(command).or_default().push_back(step);
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<CommandRequest>> {
        self.shared.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_step(&self, command: Command) -> Option<Step> {
        self.shared
            .queued
            .get_mut(&command)
            .and_then(|mut queue| queue.pop_front())
    }

    fn default_reply(&self, command: Command) -> DriverReply {
        if let Some(reply) = self.shared.defaults.get(&command) {
            return reply.clone();
        }
        let connected = self.is_connected();
        match command {
            Command::GetListDevice => DriverReply::with(ReplyPayload::Devices(vec![
                HardwareDeviceId {
                    device_index: 0,
                    device_name: "wimax0".into(),
                    device_type: 1,
                },
            ])),
            Command::GetDeviceStatus if connected => DriverReply::with(ReplyPayload::DeviceStatus {
                status: DeviceStatus::DataConnected,
                progress: Some(ConnectionProgress::Registered),
            }),
            Command::GetDeviceStatus => DriverReply::with(ReplyPayload::DeviceStatus {
                status: DeviceStatus::Ready,
                progress: None,
            }),
            Command::GetNetworkList => {
                DriverReply::with(ReplyPayload::Networks(vec![Self::sample_nsp("CLEAR", 1)]))
            }
            Command::GetLinkStatus if connected => DriverReply::with(ReplyPayload::LinkStatus(
                Self::sample_link(self.shared.link_rssi.load(Ordering::SeqCst)),
            )),
            Command::GetLinkStatus => DriverReply::code(ApiResponse::LinkNotConnected),
            Command::GetIpInterfaceIndex => DriverReply::with(ReplyPayload::Interface(InterfaceInfo {
                interface_name: "wmx0".into(),
            })),
            Command::GetStatistics if connected => {
                DriverReply::with(ReplyPayload::Statistics(ConnectionStatistics {
                    total_rx_bytes: 4096,
                    total_tx_bytes: 1024,
                    total_rx_packets: 8,
                    total_tx_packets: 4,
                }))
            }
            Command::GetConnectedNsp if connected => {
                DriverReply::with(ReplyPayload::ConnectedNsp(ConnectedNspInfo {
                    name: "CLEAR".into(),
                    realm: "clearwire-wmx.net".into(),
                    id: 1,
                    activated: true,
                    rssi: 60,
                    cinr: 25,
                    network_type: 0,
                }))
            }
            Command::GetStatistics | Command::GetConnectedNsp => {
                DriverReply::code(ApiResponse::LinkNotConnected)
            }
            Command::GetDeviceInformation => DriverReply::with(ReplyPayload::DeviceInfo(DeviceInfo {
                hw_version: DeviceVersion {
                    name: "hw".into(),
                    version: "1.0".into(),
                },
                mac_address: [0x00, 0x1d, 0xe1, 0x00, 0x00, 0x01],
                vendor_name: "Scripted".into(),
                ..Default::default()
            })),
            Command::GetPackageInformation => {
                DriverReply::with(ReplyPayload::PackageInfo(PackageInfo::default()))
            }
            Command::GetProvisioningStatus => DriverReply::with(ReplyPayload::Provisioned(true)),
            Command::GetContactInformation => DriverReply::with(ReplyPayload::Contacts(Vec::new())),
            _ => DriverReply::ok(),
        }
    }

    fn observe(&self, command: Command, response: ApiResponse) {
        match command {
            Command::CmdConnectToNetwork
                if matches!(response, ApiResponse::Success | ApiResponse::AlreadyConnected) =>
            {
                self.set_connected(true)
            }
            Command::CmdDisconnectFromNetwork | Command::WiMaxDeviceClose => {
                self.set_connected(false)
            }
            _ => {}
        }
    }
}

#[async_trait]
impl DriverBackend for ScriptedBackend {
    async fn call(&mut self, request: CommandRequest) -> Result<DriverReply> {
        let command = request.command;
        self.log().push(request);

        let reply = match self.next_step(command) {
            Some(Step::Reply(reply)) => reply,
            Some(Step::Fault(message)) => return Err(Error::Backend(message)),
            Some(Step::Stall(delay)) => {
                tokio::time::sleep(delay).await;
                self.default_reply(command)
            }
            None => self.default_reply(command),
        };
        self.observe(command, reply.response);
        Ok(reply)
    }
}
