//! HID device access and the report reader thread.
//!
//! The dial's hidraw node is opened once, by its fixed path, and owned by
//! a dedicated reader thread for the process lifetime. The thread blocks
//! in `read_timeout` and forwards every raw report, whatever its length,
//! into an ordered channel; length checking belongs to the decoder. The
//! timeout exists only so the thread can observe the shutdown flag while
//! the dial is idle.

use std::ffi::CString;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hidapi::{HidApi, HidDevice};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

/// Read buffer size. Far above the dial's 4-byte reports; oversized reads
/// are forwarded intact so the decoder can reject them.
const READ_BUF_LEN: usize = 64;

/// Errors from the device layer.
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("failed to open HID device {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("HID read failed: {0}")]
    Read(String),
}

/// A blocking source of raw dial reports.
///
/// `Ok(0)` means the timeout elapsed with no report; any other `Ok(len)`
/// is one report of `len` bytes at the front of `buf`. Implemented by the
/// real hidraw device and by scripted sources in tests.
pub trait ReportSource: Send {
    fn read_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, DeviceError>;
}

/// The real dial, opened via hidapi's hidraw backend.
pub struct HidrawSource {
    device: HidDevice,
}

impl HidrawSource {
    /// Open the dial at a fixed, pre-known hidraw path.
    pub fn open(path: &str) -> Result<Self, DeviceError> {
        let open_err = |reason: String| DeviceError::Open {
            path: path.to_string(),
            reason,
        };

        let api = HidApi::new().map_err(|e| open_err(e.to_string()))?;
        let cpath = CString::new(path).map_err(|_| open_err("path contains NUL".to_string()))?;
        let device = api.open_path(&cpath).map_err(|e| open_err(e.to_string()))?;

        Ok(Self { device })
    }
}

impl ReportSource for HidrawSource {
    fn read_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, DeviceError> {
        self.device
            .read_timeout(buf, timeout_ms)
            .map_err(|e| DeviceError::Read(e.to_string()))
    }
}

/// Reader loop run on a dedicated thread.
///
/// Forwards each raw report (and, terminally, a read error) into `tx` in
/// read order. Exits when the shutdown flag is set, when the consumer
/// hangs up, or on the first read error; a read error is fatal for the
/// daemon, so there is no retry here.
pub fn run_report_reader_loop<S: ReportSource>(
    mut source: S,
    tx: mpsc::Sender<Result<Vec<u8>, DeviceError>>,
    shutdown: Arc<AtomicBool>,
    timeout_ms: i32,
) {
    debug!("report reader thread started");
    let mut buf = [0u8; READ_BUF_LEN];

    while !shutdown.load(Ordering::Relaxed) {
        match source.read_report(&mut buf, timeout_ms) {
            // Timeout, no report. Loop to re-check the shutdown flag.
            Ok(0) => {}
            Ok(len) => {
                if tx.blocking_send(Ok(buf[..len].to_vec())).is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = tx.blocking_send(Err(e));
                break;
            }
        }
    }

    debug!("report reader thread exiting");
}
