//! Driver for an 8x8 monochrome LED matrix with 8-bit grayscale, produced by
//! bit-angle modulation (BAM) from a periodic timer interrupt.
//!
//! # Concept of operation
//!
//! The matrix is multiplexed one column at a time. Each pixel's 8-bit
//! intensity is split into 8 bit-planes; plane `k` of every pixel is shown
//! for a duration proportional to `2^k`. The eye integrates the weighted
//! on-times into 256 linear brightness steps, without the 256 discrete timer
//! slots that PWM would need. This technique is known as bit-angle modulation.
//!
//! On every timer fire the refresh routine turns the previous column off,
//! loads the next column's drive-group bytes for the current plane, turns the
//! new column on, and reprograms the timer so the slot lasts
//! `(base_unit << plane) - isr_overhead` ticks. The overhead term compensates
//! for the cost of servicing the interrupt itself so the *effective* on-time
//! stays proportional to the plane weight. Columns are visited in a fixed
//! interleaved order (not left to right) to spread spatially adjacent columns
//! across time, which reduces apparent flicker and multiplexing artifacts
//! during horizontal motion.
//!
//! Completing plane 7 completes a frame (roughly 65 Hz with the default
//! constants). The frame boundary is the only point at which a pending
//! buffer swap is committed, so drawing never tears.
//!
//! # Execution contexts
//!
//! There are two logical contexts: the application, and the refresh interrupt
//! which may preempt it at any instruction. A secondary tick interrupt and a
//! button edge interrupt feed the input state machine. The driver splits into
//! matching halves:
//!
//! - [`Painter`], application side: pixel writes into the back buffer, the
//!   blocking buffer-swap rendezvous, frame-count delays, button polling.
//! - [`Scanout`], interrupt side: call [`Scanout::on_timer`] from the
//!   refresh timer handler.
//! - [`Buttons`], interrupt side: call [`Buttons::on_edge`] from the button
//!   edge handler and [`Buttons::on_hold_tick`] from the hold-timer handler.
//!
//! Every cell shared between contexts lives in a [`Shared`] block placed in a
//! `static` by the caller; cross-context accesses are single stores or loads
//! inside `critical_section` scopes.
//!
//! # Example
//!
//! ```rust,ignore
//! use bam8x8::{Builder, Matrix, Shared};
//!
//! static SHARED: Shared = Shared::new();
//!
//! let config = Builder::new().double_buffered(true).build()?;
//! let matrix = Matrix::claim(&SHARED, config, interface).unwrap();
//! let (mut painter, scanout) = matrix.split();
//!
//! // Move `scanout` into the refresh timer ISR, then:
//! painter.set_pixel(3, 4, 200);
//! painter.swap_buffers(false);
//! painter.delay_frames(65); // about one second
//! ```

#![no_std]

#[cfg(test)]
extern crate std;

mod buffer;
mod buttons;
mod config;
mod error;
#[cfg(feature = "graphics")]
mod graphics;
mod interface;
mod matrix;
mod paint;
mod scan;
mod shared;

pub use buffer::{DriveMasks, FrameBuffer, DEFAULT_DRIVE_MASKS};
pub use buttons::{Action, Buttons, IDLE_MASK, LEFT_BIT, RIGHT_BIT};
pub use config::{Builder, Config};
pub use error::BuilderError;
pub use interface::{
    ButtonInterface, GroupPort, HoldTimer, IntervalTimer, MatrixInterface, PinButtons,
    PinInterface,
};
pub use matrix::Matrix;
pub use paint::Painter;
pub use scan::Scanout;
pub use shared::Shared;

/// Display width in pixels.
pub const WIDTH: usize = 8;

/// Display height in pixels.
pub const HEIGHT: usize = 8;

/// Number of bit-planes (one per intensity bit).
pub const PLANES: usize = 8;

/// Number of drive-group bytes per scan line.
pub const DRIVE_GROUPS: usize = 3;

/// Bytes per bit-plane: 8 scan lines of 3 drive-group bytes.
pub const PLANE_STRIDE: usize = HEIGHT * DRIVE_GROUPS;

/// Size of one frame buffer in bytes.
pub const BUFFER_SIZE: usize = PLANES * PLANE_STRIDE;
