//! The refresh scheduler: the interrupt half of the display driver

use crate::config::Config;
use crate::interface::MatrixInterface;
use crate::shared::Shared;
use crate::{HEIGHT, PLANES};

/// Interrupt-side handle: the bit-plane scan state machine.
///
/// Owns the refresh cursor (traversal slot, bit-plane, active column) and the
/// hardware interface. Call [`on_timer`](Scanout::on_timer) from the refresh
/// timer's interrupt handler and nowhere else.
pub struct Scanout<I> {
    shared: &'static Shared,
    interface: I,
    config: Config,
    /// Index into the traversal order, 0..8.
    slot: u8,
    /// Current bit-plane, 0..8.
    plane: u8,
    /// Column whose select line is currently asserted.
    active: u8,
    /// Cached front-buffer index; published to the shared cell on swap.
    front: u8,
}

impl<I> Scanout<I>
where
    I: MatrixInterface,
{
    pub(crate) fn new(shared: &'static Shared, config: Config, interface: I) -> Self {
        let active = config.scan_order[HEIGHT - 1];
        Self {
            shared,
            interface,
            config,
            slot: 0,
            plane: 0,
            active,
            front: 0,
        }
    }

    /// Blank the display and arm the first timer slot.
    ///
    /// Call once before unmasking the refresh timer interrupt; drawing
    /// before `begin` is harmless but invisible.
    pub fn begin(&mut self) {
        self.interface.blank();
        self.interface.set_next_interval(self.config.interval(0));
        log::debug!(
            "scanout started: base_unit={} isr_overhead={} order={:?}",
            self.config.base_unit,
            self.config.isr_overhead,
            self.config.scan_order,
        );
    }

    /// One refresh-timer fire: advance the scan by one column slot.
    ///
    /// Steps, in order:
    /// 1. de-assert the previously active column,
    /// 2. load the new column's drive-group bytes for the current plane from
    ///    the front buffer,
    /// 3. assert the new column,
    /// 4. arm the timer with the plane-weighted interval,
    /// 5. advance the cursor: next traversal slot, next plane on slot wrap,
    /// 6. on plane wrap (frame complete) commit a pending buffer swap and
    ///    bump the frame counter.
    ///
    /// Never fails, never blocks, never allocates.
    pub fn on_timer(&mut self) {
        let col = self.config.scan_order[self.slot as usize];

        self.interface.deselect_column(self.active);
        // Safety: the interrupt context only ever reads the front buffer,
        // and the front index cannot move within an invocation.
        let groups = unsafe { (*self.shared.buffer_ptr(self.front)).drive_bytes(self.plane, col) };
        self.interface.write_groups(groups);
        self.interface.select_column(col);
        self.interface.set_next_interval(self.config.interval(self.plane));
        self.active = col;

        self.slot += 1;
        if self.slot as usize == HEIGHT {
            self.slot = 0;
            self.plane += 1;
            if self.plane as usize == PLANES {
                self.plane = 0;
                // Frame boundary: the sole point at which a swap commits.
                if self.shared.take_swap_request() {
                    self.front ^= 1;
                    self.shared.set_front(self.front);
                }
                self.shared.bump_frames();
            }
        }
    }

    /// Borrow the hardware interface.
    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Borrow the hardware interface mutably.
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Tear down the scanout and recover the hardware interface.
    ///
    /// Mask the refresh timer interrupt before calling this.
    pub fn into_interface(self) -> I {
        self.interface
    }
}
