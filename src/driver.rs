//! The boundary toward the WiMAX radio driver.
//! 通往 WiMAX 无线驱动的边界。
//!
//! The driver is opaque: it receives numeric commands, answers with an
//! [`ApiResponse`] code, and fills in typed readings that the [`DriverFacade`]
//! records in a [`SessionContext`]. Asynchronous notifications arrive through
//! [`DriverCallbacks`].
//!
//! 驱动是不透明的：它接收数字命令，以 [`ApiResponse`] 码作答，
//! 并填充由 [`DriverFacade`] 记录到 [`SessionContext`] 中的类型化读数。
//! 异步通知通过 [`DriverCallbacks`] 到达。

pub mod callbacks;
pub mod command;
pub mod context;
pub mod facade;
pub mod mock;
pub mod response;
pub mod structs;
pub mod traits;
pub mod types;

pub use callbacks::{DriverCallbacks, DriverEvent};
pub use command::{Command, Subscription};
pub use context::{SessionContext, SubscriptionFlags};
pub use facade::DriverFacade;
pub use response::ApiResponse;
pub use structs::{
    Bsid, ConnectedNspInfo, ConnectionStatistics, ContactInfo, DeviceInfo,
    DeviceVersion, HardwareDeviceId, InterfaceInfo, LinkStatusInfo, NspInfo, PackageInfo,
};
pub use traits::{CommandArgs, CommandRequest, DriverBackend, DriverReply, ReplyPayload};
pub use types::{
    ConnectionProgress, DeviceStatus, DeviceStatusChangeReason, PackageUpdateState,
    PackageUpdateStatus, PowerState, ProvisioningOperationStatus,
};
