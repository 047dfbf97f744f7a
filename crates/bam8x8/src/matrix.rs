//! Driver construction and handle split

use crate::config::Config;
use crate::interface::MatrixInterface;
use crate::paint::Painter;
use crate::scan::Scanout;
use crate::shared::Shared;

/// The assembled display driver, ready to be split into its two halves.
///
/// Construction cannot fail: configuration is validated by
/// [`Builder::build`](crate::Builder::build) and the buffers live statically
/// inside [`Shared`]. The claim can fail: each `Shared` block supports
/// exactly one matrix, so a second [`claim`](Matrix::claim) returns `None`.
pub struct Matrix<I> {
    painter: Painter,
    scanout: Scanout<I>,
}

impl<I> Matrix<I>
where
    I: MatrixInterface,
{
    /// Claim the shared block and assemble the driver.
    ///
    /// Returns `None` if this `Shared` has already been claimed.
    ///
    /// ## Example
    ///
    /// ```rust,ignore
    /// static SHARED: Shared = Shared::new();
    ///
    /// let config = Builder::new().double_buffered(true).build()?;
    /// let (mut painter, mut scanout) =
    ///     Matrix::claim(&SHARED, config, interface).unwrap().split();
    /// scanout.begin();
    /// // unmask the refresh timer interrupt, then draw through `painter`
    /// ```
    pub fn claim(shared: &'static Shared, config: Config, interface: I) -> Option<Self> {
        if !shared.claim_display() {
            return None;
        }
        log::debug!(
            "matrix claimed: double_buffered={} base_unit={}",
            config.double_buffered,
            config.base_unit,
        );
        let painter = Painter::new(shared, &config);
        let scanout = Scanout::new(shared, config, interface);
        Some(Self { painter, scanout })
    }

    /// Split into the application half and the interrupt half.
    pub fn split(self) -> (Painter, Scanout<I>) {
        (self.painter, self.scanout)
    }
}
