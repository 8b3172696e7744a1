//! Integration tests for the full bridge pipeline.
//!
//! These drive `daemon::run_with` over the public API with a scripted
//! report source and a recording bus, exercising the boundary between
//! `device`, `packet`, `state`, and `bus` without hardware or a session
//! bus.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use openwheel::bus::{BusError, DialBus};
use openwheel::config::DaemonConfig;
use openwheel::daemon;
use openwheel::device::{DeviceError, ReportSource};
use openwheel::state::DialEvent;

/// Plays back a fixed list of read outcomes. Once the script is
/// exhausted it reports a read error, which ends the daemon the same way
/// an unplugged device would.
struct ScriptedDial {
    script: Vec<Result<Vec<u8>, DeviceError>>,
}

impl ScriptedDial {
    fn feeding(reports: &[&[u8]]) -> Self {
        Self {
            script: reports.iter().map(|r| Ok(r.to_vec())).collect(),
        }
    }
}

impl ReportSource for ScriptedDial {
    fn read_report(&mut self, buf: &mut [u8], _timeout_ms: i32) -> Result<usize, DeviceError> {
        if self.script.is_empty() {
            return Err(DeviceError::Read("end of script".to_string()));
        }
        match self.script.remove(0) {
            Ok(bytes) => {
                buf[..bytes.len()].copy_from_slice(&bytes);
                Ok(bytes.len())
            }
            Err(e) => Err(e),
        }
    }
}

#[derive(Clone)]
struct RecordingBus {
    events: Arc<Mutex<Vec<DialEvent>>>,
}

impl RecordingBus {
    fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn events(&self) -> Vec<DialEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl DialBus for RecordingBus {
    async fn publish(&self, event: DialEvent) -> Result<(), BusError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

// ── Full pipeline: raw reports in, ordered signals out ──

#[tokio::test(flavor = "multi_thread")]
async fn pipeline_rotate_press_release_in_order() {
    // The reference scenario: one clockwise tick, then a full press.
    // Sentinel defaults: rotate+ = 0x01 in rotation_hb, button down/up =
    // 0x01/0x00 in the button byte.
    let dial = ScriptedDial::feeding(&[
        &[0x00, 0x00, 0x01, 0x00], // rotate +
        &[0x00, 0x01, 0x00, 0x00], // button down
        &[0x00, 0x00, 0x00, 0x00], // button up (qualifying release)
    ]);
    let bus = RecordingBus::new();

    let result = daemon::run_with(dial, bus.clone(), DaemonConfig::default()).await;

    // The script ends in a read error, the daemon's fatal exit path.
    assert!(result.is_err());
    assert_eq!(
        bus.events(),
        vec![
            DialEvent::Rotate(1),
            DialEvent::Press(true),
            DialEvent::Press(false),
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn pipeline_malformed_frames_are_skipped() {
    let dial = ScriptedDial::feeding(&[
        &[0x00, 0x00, 0xFF, 0x00],             // rotate -
        &[0x01, 0x02],                         // short read, skipped
        &[0x00, 0x01, 0x00, 0x00],             // button down
        &[0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // oversized read, skipped
        &[0x00, 0x00, 0x00, 0x00],             // button up
    ]);
    let bus = RecordingBus::new();

    let _ = daemon::run_with(dial, bus.clone(), DaemonConfig::default()).await;

    assert_eq!(
        bus.events(),
        vec![
            DialEvent::Rotate(-1),
            DialEvent::Press(true),
            DialEvent::Press(false),
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn pipeline_read_error_stops_everything() {
    let dial = ScriptedDial {
        script: vec![
            Ok(vec![0x00, 0x00, 0x01, 0x00]),
            Err(DeviceError::Read("device unplugged".to_string())),
            // Never delivered.
            Ok(vec![0x00, 0x01, 0x00, 0x00]),
        ],
    };
    let bus = RecordingBus::new();

    let result = daemon::run_with(dial, bus.clone(), DaemonConfig::default()).await;

    assert!(result.is_err());
    assert_eq!(bus.events(), vec![DialEvent::Rotate(1)]);
}

#[tokio::test(flavor = "multi_thread")]
async fn pipeline_idle_and_spurious_release_stream_is_silent() {
    // An idle dial streams all-zero reports; button byte 0x00 matches the
    // up sentinel but must be debounced away with no preceding press.
    let dial = ScriptedDial::feeding(&[
        &[0x00, 0x00, 0x00, 0x00],
        &[0x00, 0x00, 0x00, 0x00],
        &[0x00, 0x00, 0x00, 0x00],
    ]);
    let bus = RecordingBus::new();

    let _ = daemon::run_with(dial, bus.clone(), DaemonConfig::default()).await;

    assert!(bus.events().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn pipeline_custom_sentinels_from_config() {
    let mut config = DaemonConfig::default();
    config.sentinels.rotate_plus = 0xA0;
    config.sentinels.button_down = 0xB0;
    config.sentinels.button_up = 0xB1;

    let dial = ScriptedDial::feeding(&[
        &[0x00, 0x00, 0xA0, 0x00], // rotate + under the override
        &[0x00, 0x01, 0x00, 0x00], // default down byte: now meaningless
        &[0x00, 0xB0, 0x00, 0x00], // down under the override
        &[0x00, 0xB1, 0x00, 0x00], // up under the override
    ]);
    let bus = RecordingBus::new();

    let _ = daemon::run_with(dial, bus.clone(), config).await;

    assert_eq!(
        bus.events(),
        vec![
            DialEvent::Rotate(1),
            DialEvent::Press(true),
            DialEvent::Press(false),
        ]
    );
}
