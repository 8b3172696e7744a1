//! The bridge daemon: reader thread, decode/advance/publish loop,
//! shutdown handling.
//!
//! Architecture:
//! - the bus connection is established and the name claimed before any
//!   report is read, so every published signal comes from the primary
//!   owner of the service name
//! - a dedicated thread blocks on the hidraw node and feeds raw reports
//!   into a FIFO channel
//! - a single consumer decodes, advances the state machine, and publishes,
//!   so events hit the bus strictly in device-read order
//! - Ctrl-C sets a flag the reader observes at its next poll; the channel
//!   drains and the daemon exits cleanly

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::bus::{BusError, DialBus, DialPublisher};
use crate::config::DaemonConfig;
use crate::device::{run_report_reader_loop, DeviceError, HidrawSource, ReportSource};
use crate::packet::WheelPacket;
use crate::state::DialStateMachine;

/// Channel capacity between the reader thread and the consumer. The dial
/// reports at human speed; this only buffers bursts.
const REPORT_CHANNEL_CAPACITY: usize = 64;

/// Fatal daemon errors. Each one exits the process non-zero, no retry.
#[derive(Error, Debug)]
pub enum DaemonError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Bus(#[from] BusError),
}

/// Run the daemon with the real device and the real session bus.
pub async fn run(config: DaemonConfig) -> Result<(), DaemonError> {
    let publisher = DialPublisher::connect(&config.bus).await?;
    info!(name = %config.bus.service_name, "session bus connected, name claimed");

    let source = HidrawSource::open(&config.device.path)?;
    info!(path = %config.device.path, "opened HID device");

    run_with(source, publisher, config).await
}

/// Run the daemon over an arbitrary report source and bus backend.
///
/// `run` delegates here after opening the real device and connecting the
/// real bus; the seams exist so the whole pipeline can be driven end to
/// end without hardware or a bus.
pub async fn run_with<S, B>(source: S, bus: B, config: DaemonConfig) -> Result<(), DaemonError>
where
    S: ReportSource + 'static,
    B: DialBus,
{
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })
    .ok();

    let (tx, rx) = mpsc::channel(REPORT_CHANNEL_CAPACITY);
    let timeout_ms = config.device.read_timeout_ms;
    std::thread::Builder::new()
        .name("hid-report-reader".into())
        .spawn(move || {
            run_report_reader_loop(source, tx, shutdown, timeout_ms);
        })
        .expect("Failed to spawn HID report reader thread");

    let machine = DialStateMachine::new(config.sentinels);
    pump(rx, machine, &bus).await?;

    info!("shutdown requested, exiting");
    Ok(())
}

/// The main loop: one raw report in, at most one signal out.
///
/// Short or oversized reads are logged and skipped without touching the
/// press state. A forwarded read error ends the loop and is fatal.
/// Publish failures are logged and the loop continues; a bus hiccup must
/// not stall input processing.
pub async fn pump<B: DialBus>(
    mut rx: mpsc::Receiver<Result<Vec<u8>, DeviceError>>,
    mut machine: DialStateMachine,
    bus: &B,
) -> Result<(), DaemonError> {
    while let Some(item) = rx.recv().await {
        let raw = item?;

        let Some(pkt) = WheelPacket::parse(&raw) else {
            warn!(len = raw.len(), "malformed report, skipping");
            continue;
        };

        debug!(
            report_id = pkt.report_id,
            button = pkt.button,
            rotation_hb = pkt.rotation_hb,
            rotation_lb = pkt.rotation_lb,
            "decoded report"
        );

        if let Some(event) = machine.advance(&pkt) {
            debug!(?event, "dial event");
            if let Err(e) = bus.publish(event).await {
                warn!("failed to publish signal: {e}");
            }
        }
    }

    Ok(())
}
