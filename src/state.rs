//! Dial event state machine.
//!
//! Turns the continuous stream of decoded reports into discrete semantic
//! events. The dial keeps reporting while idle or held, so release events
//! are gated on a press having been seen first; rotation ticks carry no
//! held/idle notion and bypass the gate.

use crate::config::Sentinels;
use crate::packet::WheelPacket;

/// Semantic event published on the bus. At most one per report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialEvent {
    /// One rotation tick, delta is +1 (clockwise) or -1.
    Rotate(i32),
    /// Button press (`true`) or release (`false`).
    Press(bool),
}

/// Logical press state of the dial button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressState {
    #[default]
    Released,
    Held,
}

/// Per-session event state machine.
///
/// Owns the press state; never shared, never persisted across restarts.
pub struct DialStateMachine {
    sentinels: Sentinels,
    press: PressState,
}

impl DialStateMachine {
    pub fn new(sentinels: Sentinels) -> Self {
        Self {
            sentinels,
            press: PressState::Released,
        }
    }

    /// Current press state.
    pub fn press_state(&self) -> PressState {
        self.press
    }

    /// Consume one decoded report, emitting at most one event.
    ///
    /// Rules are checked in priority order, first match wins:
    /// 1. rotation high byte = rotate-plus sentinel → `Rotate(+1)`
    /// 2. rotation high byte = rotate-minus sentinel → `Rotate(-1)`
    /// 3. button = down sentinel → `Press(true)`, state becomes `Held`
    ///    (re-entered on repeats, each one emits)
    /// 4. button = up sentinel while `Held` → `Press(false)`, back to
    ///    `Released`
    /// 5. anything else → no event
    ///
    /// The `Held` gate on rule 4 is the debounce: with an all-zero idle
    /// stream the button byte matches the up sentinel on every report.
    pub fn advance(&mut self, pkt: &WheelPacket) -> Option<DialEvent> {
        if pkt.rotation_hb == self.sentinels.rotate_plus {
            return Some(DialEvent::Rotate(1));
        }

        if pkt.rotation_hb == self.sentinels.rotate_minus {
            return Some(DialEvent::Rotate(-1));
        }

        if pkt.button == self.sentinels.button_down {
            self.press = PressState::Held;
            return Some(DialEvent::Press(true));
        }

        if pkt.button == self.sentinels.button_up && self.press == PressState::Held {
            self.press = PressState::Released;
            return Some(DialEvent::Press(false));
        }

        None
    }
}
