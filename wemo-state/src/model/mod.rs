//! Data model shared by the reconciler, poller and dispatcher

mod node;
mod status;
mod unit;

pub use node::{NodeKind, WemoNode, BRIDGE_UDN_PREFIX};
pub(crate) use node::switch_device_id;
pub use status::{Command, DeviceKind, DeviceStatus, PowerState};
pub use unit::Unit;
