//! Discovery, reconciliation, polling and command dispatch for WEMO devices
//!
//! This crate is the engine between a home-automation hub's generic device
//! registry and the WEMO UPnP control protocol. Each cycle it:
//!
//! 1. finds root devices with SSDP and refreshes their locations,
//! 2. resolves WEMO Link bridges into groups and standalone LEDs,
//!    registering a hub unit for each new DeviceID,
//! 3. polls every node and pushes changed status to the hub.
//!
//! Hub commands travel the other way through [`WemoEngine::dispatch_command`].
//!
//! # Identifiers
//!
//! - **UDN**: UPnP root device name, e.g. `uuid:Bridge-1_0-231442B0100A0B`
//! - **DeviceID**: WEMO identifier of a switch, LED or group
//! - **Unit**: hub-side number 1-254, owned by the [`DeviceRegistry`]
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wemo_state::{logging, DebugLevel, EngineConfig, MemoryRegistry, WemoEngine};
//!
//! logging::init_logging(DebugLevel::Basic).ok();
//!
//! let registry = Arc::new(MemoryRegistry::new());
//! let engine = WemoEngine::builder(registry.clone())
//!     .config(EngineConfig::new().with_debug_level(DebugLevel::Basic))
//!     .build();
//!
//! let report = engine.run_cycle();
//! println!("{} devices answered, {} registered", report.discovered, registry.len());
//! ```

pub mod config;
pub mod discoverer;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;
pub mod poller;
pub mod reconciler;
pub mod registry;

mod topology;
mod worker;

pub use config::{DebugLevel, EngineConfig};
pub use discoverer::{Discoverer, SsdpDiscoverer};
pub use dispatcher::DispatchOutcome;
pub use engine::{CycleReport, EngineBuilder, NodeReport, WemoEngine};
pub use error::{Result, StateError};
pub use model::{Command, DeviceKind, DeviceStatus, NodeKind, PowerState, Unit, WemoNode};
pub use poller::PollOutcome;
pub use registry::{DeviceRegistry, MemoryRegistry, RegisteredDevice};
