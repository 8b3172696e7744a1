// OpenWheel - ASUS dial bridge daemon
// HID report decoding, event state machine, and D-Bus publishing

pub mod bus;
pub mod config;
pub mod daemon;
pub mod device;
pub mod packet;
pub mod state;

pub use bus::{BusError, DialBus, DialPublisher};
pub use config::{BusConfig, ConfigError, DaemonConfig, DeviceConfig, Sentinels};
pub use daemon::DaemonError;
pub use device::{DeviceError, HidrawSource, ReportSource};
pub use packet::{WheelPacket, REPORT_LEN};
pub use state::{DialEvent, DialStateMachine, PressState};
