//! 驱动填充的解码数据结构。
//! Decoded structures filled in by the driver.

use std::fmt;

/// A hardware device as listed by device enumeration.
/// 设备枚举列出的硬件设备。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareDeviceId {
    pub device_index: u32,
    pub device_name: String,
    pub device_type: u32,
}

/// A network service provider visible to the radio.
/// 无线电可见的网络服务提供商。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NspInfo {
    pub name: String,
    pub id: u32,
    pub rssi: u8,
    pub cinr: u8,
    pub network_type: u32,
}

/// The 48-bit base station identifier.
/// 48 位基站标识符。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bsid(pub [u8; 6]);

impl Bsid {
    /// The identifier as a big-endian 48-bit integer.
    /// 以大端 48 位整数表示的标识符。
    pub fn as_u64(&self) -> u64 {
        self.0.iter().fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte))
    }
}

/// Upper-case colon-separated hex, e.g. `00:1A:2B:3C:4D:5E`.
impl fmt::Display for Bsid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

/// Raw radio link figures. Conversions to physical units are methods.
/// 原始无线链路数据。到物理单位的换算以方法提供。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkStatusInfo {
    pub center_frequency: u32,
    pub rssi: u8,
    pub cinr: u8,
    pub tx_power: u8,
    pub bsid: Bsid,
}

impl LinkStatusInfo {
    /// 接收信号强度 (dBm)。
    /// Received signal strength in dBm.
    pub fn rssi_dbm(&self) -> i32 {
        i32::from(self.rssi) - 123
    }

    /// 载波干扰噪声比 (dB)。
    /// Carrier to interference-plus-noise ratio in dB.
    pub fn cinr_db(&self) -> i32 {
        i32::from(self.cinr) - 10
    }

    /// 发射功率 (dBm)。
    /// Transmit power in dBm.
    pub fn tx_power_dbm(&self) -> i32 {
        i32::from(self.tx_power) / 2 - 84
    }
}

/// Traffic counters of the current connection.
/// 当前连接的流量计数器。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectionStatistics {
    pub total_rx_bytes: u64,
    pub total_tx_bytes: u64,
    pub total_rx_packets: u64,
    pub total_tx_packets: u64,
}

/// The NSP the device is attached to.
/// 设备当前附着的 NSP。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedNspInfo {
    pub name: String,
    pub realm: String,
    pub id: u32,
    pub activated: bool,
    pub rssi: u8,
    pub cinr: u8,
    pub network_type: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceVersion {
    pub name: String,
    pub version: String,
}

/// Hardware and software identity of the opened device.
/// 已打开设备的硬件和软件标识。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceInfo {
    pub hw_version: DeviceVersion,
    pub sw_version: DeviceVersion,
    pub rf_version: DeviceVersion,
    pub asic_version: DeviceVersion,
    pub mac_address: [u8; 6],
    pub vendor_name: String,
    pub vendor_specific_info: String,
}

/// A software update package announced by the network.
/// 网络通告的软件更新包。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageInfo {
    pub file_path: String,
    pub file_name: String,
    pub force_reboot: bool,
    pub mandatory_update: bool,
    pub warn_user_to_not_power_down: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactInfo {
    pub text_for_uri: String,
    pub uri: String,
    pub contact_type: u32,
}

/// The network interface bound to the data path.
/// 绑定到数据路径的网络接口。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceInfo {
    pub interface_name: String,
}
