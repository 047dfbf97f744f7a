//! Graphics support via embedded-graphics
//!
//! Implements [`DrawTarget`] for [`Painter`] with [`Gray8`] pixels, so the
//! whole embedded-graphics primitive and text stack draws straight into the
//! back buffer:
//!
//! ```rust,ignore
//! use embedded_graphics::{prelude::*, primitives::{Line, PrimitiveStyle}};
//! use embedded_graphics::pixelcolor::Gray8;
//!
//! Line::new(Point::new(0, 0), Point::new(7, 7))
//!     .into_styled(PrimitiveStyle::with_stroke(Gray8::new(0x80), 1))
//!     .draw(&mut painter)?;
//! painter.swap_buffers(false);
//! ```

use core::convert::Infallible;

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::{Gray8, GrayColor},
    Pixel,
};

use crate::paint::Painter;
use crate::{HEIGHT, WIDTH};

impl OriginDimensions for Painter {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Painter {
    type Color = Gray8;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            // set_pixel already discards out-of-range coordinates.
            self.set_pixel(point.x, point.y, color.luma());
        }
        Ok(())
    }
}
