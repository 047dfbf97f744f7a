//! Error types for the driver
//!
//! The refresh path is infallible: once running it never fails,
//! blocks or allocates, and a stalled scheduler is a fatal condition for an
//! external watchdog layer. The only fallible operation is building a
//! [`Config`](crate::Config), so [`BuilderError`] is the whole error surface.
//!
//! ## Example
//!
//! ```
//! use bam8x8::{Builder, BuilderError};
//!
//! let result = Builder::new().scan_order([0, 0, 2, 6, 1, 5, 3, 7]).build();
//! assert!(matches!(result, Err(BuilderError::InvalidScanOrder { .. })));
//! ```

/// Errors that can occur when building configuration.
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// The column traversal order is not a permutation of `0..8`.
    ///
    /// Every column must be visited exactly once per bit-plane sweep.
    InvalidScanOrder {
        /// The rejected order.
        order: [u8; 8],
    },
    /// The interrupt-overhead compensation is not smaller than the base
    /// on-time unit, which would make the plane-0 slot non-positive.
    TimingUnderflow {
        /// Minimum on-time in timer ticks.
        base_unit: u16,
        /// Estimated interrupt entry/exit cost in timer ticks.
        isr_overhead: u16,
    },
    /// `base_unit << 7` does not fit the 16-bit timer compare register.
    IntervalOverflow {
        /// Minimum on-time in timer ticks.
        base_unit: u16,
    },
    /// A drive-mask entry does not assert exactly one drive line.
    InvalidDriveMask {
        /// The x coordinate whose mask was rejected.
        column: u8,
    },
    /// The hold threshold does not exceed the debounce threshold.
    InvalidHoldThresholds {
        /// Ticks below which a release is treated as bounce.
        debounce_ticks: u8,
        /// Ticks after which a press becomes a hold.
        hold_ticks: u8,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BuilderError::InvalidScanOrder { order } => {
                write!(f, "Scan order {order:?} is not a permutation of 0..8")
            }
            BuilderError::TimingUnderflow {
                base_unit,
                isr_overhead,
            } => write!(
                f,
                "Base unit {base_unit} must exceed interrupt overhead {isr_overhead}"
            ),
            BuilderError::IntervalOverflow { base_unit } => {
                write!(f, "Base unit {base_unit} overflows the plane-7 interval")
            }
            BuilderError::InvalidDriveMask { column } => {
                write!(f, "Drive mask for column {column} must assert exactly one line")
            }
            BuilderError::InvalidHoldThresholds {
                debounce_ticks,
                hold_ticks,
            } => write!(
                f,
                "Hold threshold {hold_ticks} must exceed debounce threshold {debounce_ticks}"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}
