//! Engine facade
//!
//! [`WemoEngine`] is what a host hub embeds. It owns the node table (via the
//! [`Reconciler`]), the SOAP client and the poll worker, and exposes the
//! hub-facing lifecycle: `start`, `heartbeat`, `dispatch_command` and
//! `shutdown`.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};
use wemo_api::{SoapClient, SoapTransport, WemoClient};

use crate::config::EngineConfig;
use crate::discoverer::{Discoverer, SsdpDiscoverer};
use crate::dispatcher::{self, DispatchOutcome};
use crate::model::{Command, Unit, WemoNode};
use crate::poller::{self, PollOutcome};
use crate::reconciler::Reconciler;
use crate::registry::DeviceRegistry;
use crate::topology;
use crate::worker::{panic_message, spawn_poll_worker, PollWorker};
use crate::{Result, StateError};

/// Outcome of polling one node during a cycle
#[derive(Debug)]
pub struct NodeReport {
    pub udn: String,
    pub outcome: PollOutcome,
}

/// Summary of one discovery + poll cycle
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Root devices that answered discovery this cycle
    pub discovered: usize,
    /// Set when discovery could not run; known nodes were still polled
    pub discovery_error: Option<StateError>,
    /// One entry per known node, in UDN order
    pub outcomes: Vec<NodeReport>,
}

impl CycleReport {
    pub fn outcome(&self, udn: &str) -> Option<&PollOutcome> {
        self.outcomes.iter().find(|report| report.udn == udn).map(|report| &report.outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = &NodeReport> {
        self.outcomes
            .iter()
            .filter(|report| matches!(report.outcome, PollOutcome::Failed(_)))
    }
}

/// State shared between the facade, the poll worker and command threads
pub(crate) struct EngineCore {
    config: EngineConfig,
    reconciler: Reconciler,
    client: WemoClient,
    discoverer: Box<dyn Discoverer>,
    /// Serialises cycles from the worker and from `run_cycle`
    cycle_guard: Mutex<()>,
}

impl EngineCore {
    pub(crate) fn run_cycle(&self) -> CycleReport {
        let _cycle = self.cycle_guard.lock();
        let mut report = CycleReport::default();

        debug!("Searching for WEMOs ...");
        match self.discoverer.discover() {
            Ok(found) => {
                report.discovered = found.len();
                let mut found: Vec<_> = found.into_iter().collect();
                found.sort();
                for (udn, location) in &found {
                    self.reconciler.upsert_location(udn, location);
                }
            }
            Err(e) => {
                warn!("Discovery failed, polling known nodes only: {}", e);
                report.discovery_error = Some(e);
            }
        }

        for udn in self.reconciler.udns() {
            let outcome = catch_unwind(AssertUnwindSafe(|| self.poll_node(&udn)))
                .unwrap_or_else(|payload| {
                    PollOutcome::Failed(StateError::Panicked(panic_message(payload.as_ref())))
                });

            if let PollOutcome::Failed(e) = &outcome {
                error!("Updating {} failed: {}", udn, e);
            }
            report.outcomes.push(NodeReport { udn, outcome });
        }

        report
    }

    fn poll_node(&self, udn: &str) -> PollOutcome {
        let Some(node) = self.reconciler.node(udn) else {
            return PollOutcome::Failed(StateError::DeviceUnavailable {
                device_id: udn.to_string(),
            });
        };
        debug!("Updating {} udn={}", node.location, node.udn);

        if node.is_bridge() {
            let node = topology::resolve_bridge(&self.client, &self.reconciler, &node);
            poller::poll_bridge(&self.client, &self.reconciler, &node)
        } else {
            poller::poll_switch(&self.client, &self.reconciler, &node)
        }
    }

    fn dispatch(&self, unit: Unit, command: Command, level: u8) -> Result<DispatchOutcome> {
        dispatcher::dispatch(&self.client, &self.reconciler, unit, command, level)
    }
}

/// Builder for [`WemoEngine`]
pub struct EngineBuilder {
    config: EngineConfig,
    registry: Arc<dyn DeviceRegistry>,
    discoverer: Option<Box<dyn Discoverer>>,
    transport: Option<Arc<dyn SoapTransport>>,
}

impl EngineBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace SSDP discovery
    pub fn discoverer(mut self, discoverer: impl Discoverer + 'static) -> Self {
        self.discoverer = Some(Box::new(discoverer));
        self
    }

    /// Replace the HTTP SOAP transport
    pub fn transport(mut self, transport: Arc<dyn SoapTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> WemoEngine {
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(SoapClient::with_timeout(self.config.http_timeout)));
        let discoverer = self
            .discoverer
            .unwrap_or_else(|| Box::new(SsdpDiscoverer::new(self.config.discovery_window)));

        WemoEngine {
            core: Arc::new(EngineCore {
                reconciler: Reconciler::new(self.registry),
                client: WemoClient::with_transport(transport),
                discoverer,
                config: self.config,
                cycle_guard: Mutex::new(()),
            }),
            worker: Mutex::new(None),
        }
    }
}

/// Discovery, polling and command dispatch for WEMO devices
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use wemo_state::{Command, MemoryRegistry, Unit, WemoEngine};
///
/// let registry = Arc::new(MemoryRegistry::new());
/// let engine = WemoEngine::new(registry);
/// engine.start()?;
///
/// // Called by the hub on its own schedule
/// engine.heartbeat()?;
///
/// if let Some(unit) = Unit::new(1) {
///     engine.dispatch_command(unit, Command::On, 75)?;
/// }
/// engine.shutdown();
/// # Ok::<(), wemo_state::StateError>(())
/// ```
pub struct WemoEngine {
    core: Arc<EngineCore>,
    worker: Mutex<Option<PollWorker>>,
}

impl WemoEngine {
    /// Engine with default configuration, SSDP discovery and HTTP transport
    pub fn new(registry: Arc<dyn DeviceRegistry>) -> Self {
        Self::builder(registry).build()
    }

    pub fn builder(registry: Arc<dyn DeviceRegistry>) -> EngineBuilder {
        EngineBuilder {
            config: EngineConfig::default(),
            registry,
            discoverer: None,
            transport: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.core.config
    }

    pub fn registry(&self) -> &Arc<dyn DeviceRegistry> {
        self.core.reconciler.registry()
    }

    /// Mark known units unreachable, start the poll worker and queue the first cycle
    pub fn start(&self) -> Result<()> {
        let mut worker = self.worker.lock();
        if worker.as_ref().is_some_and(PollWorker::is_running) {
            debug!("Engine already started");
            return Ok(());
        }

        info!("Starting WEMO engine ({})", self.core.config.debug_level);
        if self.core.config.debug_level.is_enabled() {
            self.dump_config();
        }
        let marked = self.core.reconciler.mark_all_unreachable();
        debug!("{} existing units marked unreachable until rediscovered", marked);

        let started = spawn_poll_worker(Arc::clone(&self.core))?;
        started.tick()?;
        *worker = Some(started);
        Ok(())
    }

    fn dump_config(&self) {
        debug!("Engine config: {:?}", self.core.config);

        let registry = self.registry();
        let units = registry.list_existing_units();
        debug!("Device count: {}", units.len());
        for unit in units {
            debug!(
                "Unit {}: DeviceID={} status={}",
                unit,
                registry.device_id(unit).unwrap_or_default(),
                registry
                    .status(unit)
                    .map(|status| status.to_string())
                    .unwrap_or_default()
            );
        }
    }

    /// Queue a cycle on the worker.
    ///
    /// Returns `Ok(false)` when a cycle is already pending; the heartbeat is
    /// folded into it.
    pub fn heartbeat(&self) -> Result<bool> {
        self.worker
            .lock()
            .as_ref()
            .ok_or(StateError::WorkerStopped)?
            .tick()
    }

    /// Run one cycle on the calling thread
    pub fn run_cycle(&self) -> CycleReport {
        self.core.run_cycle()
    }

    /// Send a hub command and wait for the device's answer
    pub fn dispatch_command(
        &self,
        unit: Unit,
        command: Command,
        level: u8,
    ) -> Result<DispatchOutcome> {
        self.core.dispatch(unit, command, level)
    }

    /// Send a hub command on its own thread
    pub fn spawn_command(
        &self,
        unit: Unit,
        command: Command,
        level: u8,
    ) -> Result<JoinHandle<Result<DispatchOutcome>>> {
        let core = Arc::clone(&self.core);
        let handle = thread::Builder::new()
            .name(format!("wemo-cmd-{}", unit))
            .spawn(move || {
                let outcome = core.dispatch(unit, command, level);
                if let Err(e) = &outcome {
                    error!("Command for unit {} failed: {}", unit, e);
                }
                outcome
            })?;
        Ok(handle)
    }

    /// Snapshot of every known node
    pub fn nodes(&self) -> Vec<WemoNode> {
        self.core.reconciler.nodes()
    }

    pub fn node(&self, udn: &str) -> Option<WemoNode> {
        self.core.reconciler.node(udn)
    }

    pub fn is_running(&self) -> bool {
        self.worker.lock().as_ref().is_some_and(PollWorker::is_running)
    }

    /// Stop the worker, waiting for an in-flight cycle
    pub fn shutdown(&self) {
        let worker = self.worker.lock().take();
        if let Some(mut worker) = worker {
            info!("Stopping WEMO engine");
            worker.shutdown();
        }
    }
}

impl Drop for WemoEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for WemoEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WemoEngine")
            .field("config", &self.core.config)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
