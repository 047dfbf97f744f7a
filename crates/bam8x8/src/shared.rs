//! Cells shared between the application context and interrupt context
//!
//! Everything both contexts touch is gathered here, one field per concern,
//! each with a single writer:
//!
//! | cell           | writer              | reader             |
//! |----------------|---------------------|--------------------|
//! | `front`        | refresh interrupt   | application        |
//! | `swap_pending` | both (set/clear)    | both               |
//! | `frames`       | refresh interrupt   | application        |
//! | `action`       | button interrupts   | application        |
//! | buffers        | application (back)  | interrupt (front)  |
//!
//! Scalar cells sit behind `critical_section::Mutex<Cell<_>>` so every access
//! is a single load or store inside a scoped critical section; that is what
//! makes multi-byte values like the frame counter safe against torn reads on
//! targets without atomics.
//!
//! The frame buffers are not locked at all. The refresh interrupt only ever
//! reads the front buffer and the application only ever writes the back
//! buffer, and the front index can only move while the application is parked
//! inside `swap_buffers`. That discipline is what makes unsynchronized
//! concurrent drawing safe, and it is enforced by the narrow API of
//! [`Painter`](crate::Painter) and [`Scanout`](crate::Scanout).

use core::cell::{Cell, UnsafeCell};

use critical_section::Mutex;

use crate::buffer::FrameBuffer;
use crate::buttons::Action;

/// Statically allocatable shared state for one matrix.
///
/// Place one in a `static` and hand it to [`Matrix::claim`](crate::Matrix::claim):
///
/// ```rust,ignore
/// static SHARED: bam8x8::Shared = bam8x8::Shared::new();
/// ```
///
/// Always holds two frame buffers; single-buffered mode aliases both roles
/// onto buffer 0 and leaves the second unused. Nothing is allocated after
/// construction.
pub struct Shared {
    buffers: [UnsafeCell<FrameBuffer>; 2],
    front: Mutex<Cell<u8>>,
    swap_pending: Mutex<Cell<bool>>,
    frames: Mutex<Cell<u16>>,
    action: Mutex<Cell<Action>>,
    display_claimed: Mutex<Cell<bool>>,
}

// Safety: the buffers are the only non-Sync fields. They are handed out
// exclusively through the front/back discipline documented above, with the
// claim flag guaranteeing a single Painter/Scanout pair per Shared.
unsafe impl Sync for Shared {}

impl Shared {
    /// Create blank shared state.
    pub const fn new() -> Self {
        Self {
            buffers: [
                UnsafeCell::new(FrameBuffer::new()),
                UnsafeCell::new(FrameBuffer::new()),
            ],
            front: Mutex::new(Cell::new(0)),
            swap_pending: Mutex::new(Cell::new(false)),
            frames: Mutex::new(Cell::new(0)),
            action: Mutex::new(Cell::new(Action::None)),
            display_claimed: Mutex::new(Cell::new(false)),
        }
    }

    /// One-shot claim of the display half. Returns false if already claimed.
    pub(crate) fn claim_display(&self) -> bool {
        critical_section::with(|cs| {
            let claimed = self.display_claimed.borrow(cs);
            if claimed.get() {
                false
            } else {
                claimed.set(true);
                true
            }
        })
    }

    pub(crate) fn buffer_ptr(&self, index: u8) -> *mut FrameBuffer {
        self.buffers[(index & 1) as usize].get()
    }

    pub(crate) fn front(&self) -> u8 {
        critical_section::with(|cs| self.front.borrow(cs).get())
    }

    pub(crate) fn set_front(&self, index: u8) {
        critical_section::with(|cs| self.front.borrow(cs).set(index));
    }

    pub(crate) fn swap_pending(&self) -> bool {
        critical_section::with(|cs| self.swap_pending.borrow(cs).get())
    }

    pub(crate) fn request_swap(&self) {
        critical_section::with(|cs| self.swap_pending.borrow(cs).set(true));
    }

    /// Read and clear the swap request in one step.
    pub(crate) fn take_swap_request(&self) -> bool {
        critical_section::with(|cs| {
            let pending = self.swap_pending.borrow(cs);
            let requested = pending.get();
            pending.set(false);
            requested
        })
    }

    pub(crate) fn frames(&self) -> u16 {
        critical_section::with(|cs| self.frames.borrow(cs).get())
    }

    /// Advance the frame counter. Wraps silently.
    pub(crate) fn bump_frames(&self) {
        critical_section::with(|cs| {
            let frames = self.frames.borrow(cs);
            frames.set(frames.get().wrapping_add(1));
        });
    }

    /// Publish a classified button action, overwriting any unconsumed one.
    pub(crate) fn publish_action(&self, action: Action) {
        critical_section::with(|cs| self.action.borrow(cs).set(action));
    }

    /// Read and clear the pending action in one step.
    pub(crate) fn take_action(&self) -> Action {
        critical_section::with(|cs| self.action.borrow(cs).replace(Action::None))
    }
}

impl Default for Shared {
    fn default() -> Self {
        Self::new()
    }
}
