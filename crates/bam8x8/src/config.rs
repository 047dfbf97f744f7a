//! Driver configuration types and builder

use crate::buffer::{DriveMasks, DEFAULT_DRIVE_MASKS};
use crate::error::BuilderError;

/// Default column traversal order.
///
/// Columns are cycled in this interleaved order, rather than sequentially,
/// so spatially distant columns light in adjacent time slots. This reduces
/// apparent flicker and makes multiplexing artifacts less objectionable,
/// especially when scrolling horizontally.
pub const DEFAULT_SCAN_ORDER: [u8; 8] = [0, 4, 2, 6, 1, 5, 3, 7];

/// Driver configuration.
///
/// Holds the timing model, the column traversal order, the drive-line wiring
/// and the button thresholds. All of these are empirical tuning for a
/// specific board and display. Use [`Builder`] to create a validated
/// `Config`.
#[derive(Clone, Debug)]
pub struct Config {
    /// Shortest LED on-time in refresh-timer ticks (plane 0).
    ///
    /// Must exceed `isr_overhead`; the plane-`k` slot is
    /// `(base_unit << k) - isr_overhead` ticks.
    pub base_unit: u16,
    /// Estimated cost in timer ticks of entering and leaving the refresh
    /// interrupt, subtracted from each slot so effective on-times stay
    /// proportional to plane weights.
    pub isr_overhead: u16,
    /// Column traversal order, a permutation of `0..8`.
    pub scan_order: [u8; 8],
    /// Drive-line wiring table, one single-bit group mask per x coordinate.
    pub drive_masks: DriveMasks,
    /// Whether to run with separate front and back buffers.
    pub double_buffered: bool,
    /// Hold-timer ticks below which a press/release pair is discarded as
    /// switch bounce.
    pub debounce_ticks: u8,
    /// Hold-timer ticks after which a press becomes a hold action
    /// (76 ticks at ~30.5 Hz is about 2.5 seconds).
    pub hold_ticks: u8,
}

impl Config {
    /// The timer interval programmed for a bit-plane's slot.
    pub(crate) fn interval(&self, plane: u8) -> u16 {
        (self.base_unit << plane) - self.isr_overhead
    }
}

/// Builder for constructing driver configuration.
///
/// # Example
///
/// ```
/// use bam8x8::Builder;
///
/// let config = Builder::new()
///     .double_buffered(true)
///     .base_unit(60)
///     .isr_overhead(53)
///     .build()
///     .expect("valid configuration");
/// ```
pub struct Builder {
    base_unit: u16,
    isr_overhead: u16,
    scan_order: [u8; 8],
    drive_masks: DriveMasks,
    double_buffered: bool,
    debounce_ticks: u8,
    hold_ticks: u8,
}

impl Default for Builder {
    fn default() -> Self {
        Builder {
            // 60 ticks minimum on-time: 60 * 255 * 8 ticks per frame is
            // ~65 Hz from an 8 MHz timer clock.
            base_unit: 60,
            // Measured interrupt entry/exit cost on the reference board.
            isr_overhead: 53,
            scan_order: DEFAULT_SCAN_ORDER,
            drive_masks: DEFAULT_DRIVE_MASKS,
            double_buffered: false,
            debounce_ticks: 2,
            hold_ticks: 76,
        }
    }
}

impl Builder {
    /// Create a new Builder with the default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum on-time in refresh-timer ticks.
    pub fn base_unit(mut self, ticks: u16) -> Self {
        self.base_unit = ticks;
        self
    }

    /// Set the interrupt-overhead compensation in refresh-timer ticks.
    pub fn isr_overhead(mut self, ticks: u16) -> Self {
        self.isr_overhead = ticks;
        self
    }

    /// Set the column traversal order.
    pub fn scan_order(mut self, order: [u8; 8]) -> Self {
        self.scan_order = order;
        self
    }

    /// Set the drive-line wiring table.
    pub fn drive_masks(mut self, masks: DriveMasks) -> Self {
        self.drive_masks = masks;
        self
    }

    /// Enable or disable double buffering.
    pub fn double_buffered(mut self, enabled: bool) -> Self {
        self.double_buffered = enabled;
        self
    }

    /// Set the button debounce threshold in hold-timer ticks.
    pub fn debounce_ticks(mut self, ticks: u8) -> Self {
        self.debounce_ticks = ticks;
        self
    }

    /// Set the button hold threshold in hold-timer ticks.
    pub fn hold_ticks(mut self, ticks: u8) -> Self {
        self.hold_ticks = ticks;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`BuilderError`] if the scan order is not a permutation, the
    /// timing constants produce a non-positive or overflowing slot, a drive
    /// mask does not assert exactly one line, or the hold threshold does not
    /// exceed the debounce threshold. A malformed traversal order is a
    /// build-time defect, never a runtime error of the refresh routine.
    pub fn build(self) -> Result<Config, BuilderError> {
        let mut seen = [false; 8];
        for &col in &self.scan_order {
            if col >= 8 || seen[col as usize] {
                return Err(BuilderError::InvalidScanOrder {
                    order: self.scan_order,
                });
            }
            seen[col as usize] = true;
        }

        if self.base_unit <= self.isr_overhead {
            return Err(BuilderError::TimingUnderflow {
                base_unit: self.base_unit,
                isr_overhead: self.isr_overhead,
            });
        }
        if self.base_unit > u16::MAX >> 7 {
            return Err(BuilderError::IntervalOverflow {
                base_unit: self.base_unit,
            });
        }

        for (x, mask) in self.drive_masks.iter().enumerate() {
            let bits: u32 = mask.iter().map(|b| b.count_ones()).sum();
            if bits != 1 {
                return Err(BuilderError::InvalidDriveMask { column: x as u8 });
            }
        }

        if self.hold_ticks <= self.debounce_ticks {
            return Err(BuilderError::InvalidHoldThresholds {
                debounce_ticks: self.debounce_ticks,
                hold_ticks: self.hold_ticks,
            });
        }

        Ok(Config {
            base_unit: self.base_unit,
            isr_overhead: self.isr_overhead,
            scan_order: self.scan_order,
            drive_masks: self.drive_masks,
            double_buffered: self.double_buffered,
            debounce_ticks: self.debounce_ticks,
            hold_ticks: self.hold_ticks,
        })
    }
}
