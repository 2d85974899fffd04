//! Run the engine against the local network with an in-memory registry.
//!
//! ```text
//! cargo run -p wemo-sdk-state --example run_engine -- 62
//! ```
//!
//! The optional argument is the hub debug level (0, 2, 62, 126, 16, 18, 144, -1).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use wemo_state::{logging, DebugLevel, EngineConfig, MemoryRegistry, WemoEngine};

const HEARTBEAT: Duration = Duration::from_secs(10);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let debug_level: DebugLevel = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => DebugLevel::Basic,
    };
    logging::init_logging(debug_level)?;

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))?;
    }

    let registry = Arc::new(MemoryRegistry::new());
    let engine = WemoEngine::builder(registry.clone())
        .config(EngineConfig::new().with_debug_level(debug_level))
        .build();

    println!("1. Starting engine...");
    engine.start()?;
    println!("✓ Engine started, heartbeat every {}s (Ctrl-C to stop)", HEARTBEAT.as_secs());

    let poll = Duration::from_millis(250);
    let ticks_per_heartbeat = (HEARTBEAT.as_millis() / poll.as_millis()) as u32;
    let mut last_seen = 0;
    let mut ticks = 0;

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(poll);

        let devices = registry.devices();
        if devices.len() != last_seen {
            last_seen = devices.len();
            println!("\nRegistered devices:");
            for (unit, device) in &devices {
                println!(
                    "  [{:>3}] {:<24} {:<20} {}",
                    unit.get(),
                    device.name,
                    device.device_id,
                    device.status
                );
            }
        }

        ticks += 1;
        if ticks % ticks_per_heartbeat == 0 && engine.heartbeat().is_err() {
            println!("✗ Poll worker stopped");
            break;
        }
    }

    println!("\n2. Shutting down...");
    engine.shutdown();
    for node in engine.nodes() {
        println!("  {} at {} ({} devices)", node.udn, node.location, node.device_ids.len());
    }
    println!("✓ Done");
    Ok(())
}
