//! The application-side handle: drawing, swapping, delays and button polling

use crate::buffer::{DriveMasks, FrameBuffer};
use crate::buttons::Action;
use crate::config::Config;
use crate::shared::Shared;

/// Application-side handle to the matrix.
///
/// All drawing goes into the back buffer; nothing becomes visible until
/// [`swap_buffers`](Painter::swap_buffers) commits at a frame boundary
/// (in double-buffered mode) or immediately as the scan reaches the pixels
/// (in single-buffered mode, where front and back are the same buffer).
pub struct Painter {
    shared: &'static Shared,
    drive_masks: DriveMasks,
    double_buffered: bool,
}

impl Painter {
    pub(crate) fn new(shared: &'static Shared, config: &Config) -> Self {
        Self {
            shared,
            drive_masks: config.drive_masks,
            double_buffered: config.double_buffered,
        }
    }

    fn back_index(&self) -> u8 {
        if self.double_buffered {
            self.shared.front() ^ 1
        } else {
            0
        }
    }

    fn back(&mut self) -> &mut FrameBuffer {
        // Safety: the application context is the only writer of the back
        // buffer, and the front index cannot move while this borrow lives
        // (a swap requires `swap_buffers(&mut self)`).
        unsafe { &mut *self.shared.buffer_ptr(self.back_index()) }
    }

    /// Write one pixel into the back buffer.
    ///
    /// `intensity` 0 is off, 255 full brightness. Coordinates outside the
    /// 8x8 grid are silently ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, intensity: u8) {
        let masks = self.drive_masks;
        self.back().set_pixel(&masks, x, y, intensity);
    }

    /// Read one pixel back out of the back buffer.
    pub fn pixel(&mut self, x: i32, y: i32) -> u8 {
        let masks = self.drive_masks;
        self.back().pixel(&masks, x, y)
    }

    /// Set every pixel of the back buffer to one intensity.
    pub fn fill(&mut self, intensity: u8) {
        let masks = self.drive_masks;
        self.back().fill(&masks, intensity);
    }

    /// Blank the back buffer.
    pub fn clear(&mut self) {
        self.back().clear();
    }

    /// Mutable view of the back buffer, for bulk operations.
    ///
    /// Must never be used to reach the front buffer; the borrow ends before
    /// a swap can be requested, which keeps that impossible from safe code.
    pub fn back_buffer(&mut self) -> &mut FrameBuffer {
        self.back()
    }

    /// The drive-line wiring table this matrix was configured with.
    pub fn drive_masks(&self) -> &DriveMasks {
        &self.drive_masks
    }

    /// Display the back buffer: request a swap and wait for the commit.
    ///
    /// This is a rendezvous, not a fire-and-forget signal: the swap itself
    /// happens inside the refresh interrupt at the next frame boundary, and
    /// this call busy-waits until then, a bounded wait of up to one full
    /// frame period. With `copy_forward` the new front is then copied into
    /// the new back buffer, so incremental drawing can continue from the
    /// displayed image; without it the new back buffer keeps its stale
    /// contents.
    ///
    /// No-op in single-buffered mode.
    pub fn swap_buffers(&mut self, copy_forward: bool) {
        if !self.double_buffered {
            return;
        }
        self.shared.request_swap();
        while self.shared.swap_pending() {
            core::hint::spin_loop();
        }
        if copy_forward {
            let front = self.shared.front();
            // Safety: the interrupt context reads the front buffer, which we
            // only read here; the back buffer is written by this context
            // alone.
            unsafe {
                let front_buf = &*self.shared.buffer_ptr(front);
                (*self.shared.buffer_ptr(front ^ 1)).copy_from(front_buf);
            }
        }
    }

    /// The frame counter: one count per completed 8-plane sweep.
    ///
    /// Wraps silently; meant for duration measurement via wrapping
    /// subtraction, not as an absolute timestamp.
    pub fn frames(&self) -> u16 {
        self.shared.frames()
    }

    /// Busy-wait until the frame counter has advanced by `n` counts.
    ///
    /// This is the system's only time-keeping primitive: the conventional
    /// tick services are left disabled so they cannot perturb the refresh
    /// timing. One frame is roughly 1/65 s with the default constants.
    pub fn delay_frames(&self, n: u16) {
        let start = self.shared.frames();
        while self.shared.frames().wrapping_sub(start) < n {
            core::hint::spin_loop();
        }
    }

    /// Return and clear the pending button action.
    ///
    /// At most one action is pending at a time; an unconsumed action is
    /// overwritten by the next classification.
    pub fn poll_action(&mut self) -> Action {
        self.shared.take_action()
    }
}
