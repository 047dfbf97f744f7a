//! Hardware interface abstraction
//!
//! This module provides the [`MatrixInterface`] and [`ButtonInterface`]
//! traits the driver core is generic over, plus reference implementations
//! ([`PinInterface`], [`PinButtons`]) built on embedded-hal v1.0 digital
//! traits.
//!
//! ## Hardware requirements
//!
//! The matrix needs:
//! - 8 column select lines (outputs, active low)
//! - 3 "drive group" ports of 8 row-drive lines each (outputs)
//! - a periodic timer whose next-fire interval can be reprogrammed from
//!   inside its own handler
//!
//! The buttons need:
//! - 2 digital inputs with edge-triggered interrupt capability (active low)
//! - a second free-running timer usable as a tick counter
//!
//! ## Infallibility
//!
//! None of the operations return errors: they run inside the refresh
//! interrupt, which must never fail or block. Implementations over fallible
//! pins swallow pin errors the way a port write cannot fail on real hardware.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::DRIVE_GROUPS;

/// Trait for the output side of the matrix hardware.
///
/// The refresh scheduler ([`Scanout`](crate::Scanout)) drives the display
/// exclusively through this trait, which keeps the scanning algorithm
/// portable and testable against a simulated implementation.
pub trait MatrixInterface {
    /// Turn a column's select line off.
    fn deselect_column(&mut self, col: u8);

    /// Turn a column's select line on.
    ///
    /// Called after [`write_groups`](MatrixInterface::write_groups) so the
    /// column lights with its drive lines already settled.
    fn select_column(&mut self, col: u8);

    /// Load the three drive-group bytes onto the physical drive lines.
    fn write_groups(&mut self, groups: [u8; DRIVE_GROUPS]);

    /// Program the refresh timer's next-fire interval, in timer ticks.
    ///
    /// Called from within the timer's own handler; the implementation must
    /// arm the next interrupt `ticks` from now.
    fn set_next_interval(&mut self, ticks: u16);

    /// Force every LED off: all columns deselected, drive lines cleared.
    ///
    /// Used once by [`Scanout::begin`](crate::Scanout::begin) before the
    /// refresh interrupt is enabled.
    fn blank(&mut self) {
        for col in 0..8 {
            self.deselect_column(col);
        }
        self.write_groups([0; DRIVE_GROUPS]);
    }
}

/// Trait for the button hardware.
///
/// The state machine ([`Buttons`](crate::Buttons)) reads a 2-bit active-low
/// mask (bit 0 = left, bit 1 = right; idle = `0b11`) and gates the hold-tick
/// timer so it only runs while a press is being timed.
pub trait ButtonInterface {
    /// Read the raw 2-bit button mask. Bits are high when released.
    fn read_mask(&mut self) -> u8;

    /// Zero the hold-tick timer and enable its interrupt.
    fn restart_hold_timer(&mut self);

    /// Disable the hold-tick timer interrupt.
    fn stop_hold_timer(&mut self);
}

/// A byte-wide output port carrying one drive group.
///
/// embedded-hal has no port-wide write, and toggling eight `OutputPin`s one
/// at a time is far too slow for the plane-0 slot, so the board supplies a
/// single-store port write here. If other functions share the port, the
/// implementation is responsible for merging their idle levels into the
/// written value.
pub trait GroupPort {
    /// Drive the group's eight lines from one byte.
    fn write(&mut self, bits: u8);
}

/// The reprogrammable refresh timer.
pub trait IntervalTimer {
    /// Arm the next compare-match `ticks` from now.
    fn set_next_fire(&mut self, ticks: u16);
}

/// The free-running hold-tick timer.
pub trait HoldTimer {
    /// Zero the counter and enable the tick interrupt.
    fn restart(&mut self);

    /// Disable the tick interrupt.
    fn stop(&mut self);
}

/// Reference [`MatrixInterface`] over embedded-hal pins.
///
/// Column selects are active low (the columns are LED cathodes): a selected
/// column is driven low, a deselected one high.
///
/// ## Example
///
/// ```rust,ignore
/// use bam8x8::PinInterface;
///
/// let interface = PinInterface::new(column_pins, [portb, portc, portd], timer);
/// let matrix = Matrix::claim(&SHARED, config, interface);
/// ```
pub struct PinInterface<C, G, T> {
    /// Column select pins, active low.
    columns: [C; 8],
    /// Drive-group ports.
    groups: [G; DRIVE_GROUPS],
    /// Refresh timer.
    timer: T,
}

impl<C, G, T> PinInterface<C, G, T>
where
    C: OutputPin,
    G: GroupPort,
    T: IntervalTimer,
{
    /// Create a new PinInterface.
    pub fn new(columns: [C; 8], groups: [G; DRIVE_GROUPS], timer: T) -> Self {
        Self {
            columns,
            groups,
            timer,
        }
    }
}

impl<C, G, T> MatrixInterface for PinInterface<C, G, T>
where
    C: OutputPin,
    G: GroupPort,
    T: IntervalTimer,
{
    fn deselect_column(&mut self, col: u8) {
        if let Some(pin) = self.columns.get_mut(col as usize) {
            pin.set_high().ok();
        }
    }

    fn select_column(&mut self, col: u8) {
        if let Some(pin) = self.columns.get_mut(col as usize) {
            pin.set_low().ok();
        }
    }

    fn write_groups(&mut self, groups: [u8; DRIVE_GROUPS]) {
        for (port, bits) in self.groups.iter_mut().zip(groups) {
            port.write(bits);
        }
    }

    fn set_next_interval(&mut self, ticks: u16) {
        self.timer.set_next_fire(ticks);
    }
}

/// Reference [`ButtonInterface`] over embedded-hal input pins.
pub struct PinButtons<L, R, H> {
    left: L,
    right: R,
    hold: H,
}

impl<L, R, H> PinButtons<L, R, H>
where
    L: InputPin,
    R: InputPin,
    H: HoldTimer,
{
    /// Create a new PinButtons over two active-low inputs and a hold timer.
    pub fn new(left: L, right: R, hold: H) -> Self {
        Self { left, right, hold }
    }
}

impl<L, R, H> ButtonInterface for PinButtons<L, R, H>
where
    L: InputPin,
    R: InputPin,
    H: HoldTimer,
{
    fn read_mask(&mut self) -> u8 {
        // Pins read high when released; a read error counts as released.
        let left = self.left.is_high().unwrap_or(true);
        let right = self.right.is_high().unwrap_or(true);
        (left as u8) | (right as u8) << 1
    }

    fn restart_hold_timer(&mut self) {
        self.hold.restart();
    }

    fn stop_hold_timer(&mut self) {
        self.hold.stop();
    }
}
