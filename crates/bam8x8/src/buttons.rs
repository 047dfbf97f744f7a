//! Button debounce/hold state machine
//!
//! Two buttons arrive as a 2-bit active-low mask (bit 0 = left, bit 1 =
//! right; idle = `0b11`). The edge interrupt tracks presses and classifies
//! releases into taps; the hold-tick timer, enabled only while a press is
//! being timed, promotes a sustained press into a hold. Classification
//! produces a single pending [`Action`], consumed by
//! [`Painter::poll_action`](crate::Painter::poll_action).

use crate::config::Config;
use crate::interface::ButtonInterface;
use crate::shared::Shared;

/// Mask value with both buttons released.
pub const IDLE_MASK: u8 = 0b11;

/// Mask bit for the left button (clear = pressed).
pub const LEFT_BIT: u8 = 0b01;

/// Mask bit for the right button (clear = pressed).
pub const RIGHT_BIT: u8 = 0b10;

/// A classified button event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Action {
    /// Nothing pending.
    #[default]
    None,
    /// Left button pressed and released past the debounce threshold.
    TapLeft,
    /// Right button pressed and released past the debounce threshold.
    TapRight,
    /// Left button held past the hold threshold.
    HoldLeft,
    /// Right button held past the hold threshold.
    HoldRight,
    /// Both buttons held past the hold threshold.
    HoldBoth,
}

/// Interrupt-side handle for the two buttons.
///
/// Call [`on_edge`](Buttons::on_edge) from the pin-change handler of either
/// button and [`on_hold_tick`](Buttons::on_hold_tick) from the hold-timer
/// overflow handler. The two handlers never race in practice: the edge
/// handler is what starts and stops the hold timer.
pub struct Buttons<J> {
    shared: &'static Shared,
    interface: J,
    debounce_ticks: u8,
    hold_ticks: u8,
    /// Last observed mask.
    last: u8,
    /// Hold-timer ticks since the press being timed.
    count: u8,
}

impl<J> Buttons<J>
where
    J: ButtonInterface,
{
    /// Create the button state machine.
    pub fn new(shared: &'static Shared, config: &Config, interface: J) -> Self {
        log::debug!(
            "buttons configured: debounce={} hold={}",
            config.debounce_ticks,
            config.hold_ticks,
        );
        Self {
            shared,
            interface,
            debounce_ticks: config.debounce_ticks,
            hold_ticks: config.hold_ticks,
            last: IDLE_MASK,
            count: 0,
        }
    }

    /// Edge-interrupt entry: a button line changed level.
    pub fn on_edge(&mut self) {
        let mask = self.interface.read_mask() & IDLE_MASK;
        if mask == IDLE_MASK {
            // Both released. A tap counts only past the debounce threshold;
            // the hold path scrubs `last` so it cannot also tap here.
            self.interface.stop_hold_timer();
            if self.count > self.debounce_ticks {
                match self.last {
                    m if m == IDLE_MASK & !LEFT_BIT => self.shared.publish_action(Action::TapLeft),
                    m if m == IDLE_MASK & !RIGHT_BIT => {
                        self.shared.publish_action(Action::TapRight)
                    }
                    _ => {}
                }
            }
        } else {
            if mask == self.last {
                // Bounce on a level we are already timing.
                return;
            }
            // New press (or additional button): restart the hold clock.
            self.count = 0;
            self.interface.restart_hold_timer();
        }
        self.last = mask;
    }

    /// Hold-timer overflow entry: one more tick of the press being timed.
    ///
    /// When the count reaches the hold threshold the hold action fires once
    /// and the timer stops, even if the button stays down.
    pub fn on_hold_tick(&mut self) {
        if self.count >= self.hold_ticks {
            self.interface.stop_hold_timer();
            match self.last {
                m if m == IDLE_MASK & !LEFT_BIT => self.shared.publish_action(Action::HoldLeft),
                m if m == IDLE_MASK & !RIGHT_BIT => self.shared.publish_action(Action::HoldRight),
                0 => self.shared.publish_action(Action::HoldBoth),
                _ => {}
            }
            // Scrub so the eventual release is not classified as a tap.
            self.last = 0;
            self.count = 0;
        } else {
            self.count += 1;
        }
    }

    /// Borrow the hardware interface.
    pub fn interface(&self) -> &J {
        &self.interface
    }

    /// Borrow the hardware interface mutably.
    pub fn interface_mut(&mut self) -> &mut J {
        &mut self.interface
    }
}
