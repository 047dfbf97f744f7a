//! Frame buffer storage and bit-plane pixel encoding
//!
//! A [`FrameBuffer`] holds one frame as raw drive-group bytes, laid out so
//! the refresh interrupt can stream a scan line with nothing but an indexed
//! copy: plane-major, `offset = plane * 24 + line * 3 + group`. A pixel's
//! intensity is never stored as a number; it exists only as the set of
//! drive-line bits asserted across the 8 planes (bit `k` of the intensity
//! maps to plane `k`).
//!
//! The matrix is mounted rotated relative to the graphics coordinate system,
//! so the scanned "column" select line for a pixel is chosen by its `y`
//! coordinate, while `x` picks the drive-line bit within the 3 group bytes
//! via a [`DriveMasks`] wiring table.

use crate::{BUFFER_SIZE, DRIVE_GROUPS, HEIGHT, PLANES, PLANE_STRIDE, WIDTH};

/// Drive-line wiring table: for each `x` coordinate, the mask applied to the
/// three drive-group bytes. Exactly one bit is set across the three entries.
pub type DriveMasks = [[u8; DRIVE_GROUPS]; WIDTH];

/// Default drive-line mapping.
///
/// Empirical wiring constants for the reference board; override through
/// [`Builder::drive_masks`](crate::Builder::drive_masks) for other boards.
pub const DEFAULT_DRIVE_MASKS: DriveMasks = [
    [0x00, 0x00, 0x10],
    [0x20, 0x00, 0x00],
    [0x00, 0x08, 0x00],
    [0x10, 0x00, 0x00],
    [0x04, 0x00, 0x00],
    [0x00, 0x04, 0x00],
    [0x01, 0x00, 0x00],
    [0x00, 0x00, 0x20],
];

/// One frame of bit-plane drive data.
///
/// All-zero bytes mean every LED off; board-specific idle levels for pins
/// that share a port with the matrix belong in the [`GroupPort`]
/// implementation, not in the buffer.
///
/// [`GroupPort`]: crate::GroupPort
#[derive(Clone)]
pub struct FrameBuffer {
    bytes: [u8; BUFFER_SIZE],
}

impl FrameBuffer {
    /// Create a blank (all LEDs off) frame buffer.
    pub const fn new() -> Self {
        Self {
            bytes: [0; BUFFER_SIZE],
        }
    }

    /// Write one pixel's intensity into the bit-plane encoding.
    ///
    /// Coordinates outside the 8x8 grid are silently ignored, so callers may
    /// draw near the edges without clipping themselves.
    pub fn set_pixel(&mut self, masks: &DriveMasks, x: i32, y: i32, intensity: u8) {
        if !in_bounds(x, y) {
            return;
        }
        let m = &masks[x as usize];
        let mut offset = y as usize * DRIVE_GROUPS;
        for bit in 0..PLANES {
            let line = &mut self.bytes[offset..offset + DRIVE_GROUPS];
            if intensity & (1 << bit) != 0 {
                line[0] |= m[0];
                line[1] |= m[1];
                line[2] |= m[2];
            } else {
                line[0] &= !m[0];
                line[1] &= !m[1];
                line[2] &= !m[2];
            }
            offset += PLANE_STRIDE;
        }
    }

    /// Reconstruct one pixel's intensity from the bit-plane encoding.
    ///
    /// Out-of-range coordinates read as 0.
    pub fn pixel(&self, masks: &DriveMasks, x: i32, y: i32) -> u8 {
        if !in_bounds(x, y) {
            return 0;
        }
        let m = &masks[x as usize];
        let mut intensity = 0;
        let mut offset = y as usize * DRIVE_GROUPS;
        for bit in 0..PLANES {
            let line = &self.bytes[offset..offset + DRIVE_GROUPS];
            if line[0] & m[0] | line[1] & m[1] | line[2] & m[2] != 0 {
                intensity |= 1 << bit;
            }
            offset += PLANE_STRIDE;
        }
        intensity
    }

    /// Set every pixel to the same intensity.
    pub fn fill(&mut self, masks: &DriveMasks, intensity: u8) {
        // Composite of all drive lines per group byte.
        let mut all = [0u8; DRIVE_GROUPS];
        for m in masks {
            all[0] |= m[0];
            all[1] |= m[1];
            all[2] |= m[2];
        }
        for bit in 0..PLANES {
            let value = if intensity & (1 << bit) != 0 { all } else { [0; 3] };
            let plane = &mut self.bytes[bit * PLANE_STRIDE..(bit + 1) * PLANE_STRIDE];
            for line in plane.chunks_exact_mut(DRIVE_GROUPS) {
                line.copy_from_slice(&value);
            }
        }
    }

    /// Blank the buffer (all LEDs off).
    pub fn clear(&mut self) {
        self.bytes = [0; BUFFER_SIZE];
    }

    /// Copy another buffer's contents into this one.
    pub fn copy_from(&mut self, other: &FrameBuffer) {
        self.bytes = other.bytes;
    }

    /// The three drive-group bytes for one scan line of one plane, in the
    /// order the refresh interrupt streams them out.
    pub(crate) fn drive_bytes(&self, plane: u8, line: u8) -> [u8; DRIVE_GROUPS] {
        let offset = plane as usize * PLANE_STRIDE + line as usize * DRIVE_GROUPS;
        [
            self.bytes[offset],
            self.bytes[offset + 1],
            self.bytes[offset + 2],
        ]
    }

    /// Raw view of the encoded planes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable raw view, for bulk operations by a graphics layer.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn in_bounds(x: i32, y: i32) -> bool {
    (0..WIDTH as i32).contains(&x) && (0..HEIGHT as i32).contains(&y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_round_trips_through_plane_encoding() {
        let mut fb = FrameBuffer::new();
        for y in 0..HEIGHT as i32 {
            for x in 0..WIDTH as i32 {
                for intensity in [0u8, 1, 2, 0x55, 0x80, 0xAA, 0xFE, 0xFF] {
                    fb.set_pixel(&DEFAULT_DRIVE_MASKS, x, y, intensity);
                    assert_eq!(fb.pixel(&DEFAULT_DRIVE_MASKS, x, y), intensity);
                }
            }
        }
    }

    #[test]
    fn every_intensity_round_trips_at_one_pixel() {
        let mut fb = FrameBuffer::new();
        for intensity in 0..=255u8 {
            fb.set_pixel(&DEFAULT_DRIVE_MASKS, 5, 2, intensity);
            assert_eq!(fb.pixel(&DEFAULT_DRIVE_MASKS, 5, 2), intensity);
        }
    }

    #[test]
    fn neighbours_are_untouched() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(&DEFAULT_DRIVE_MASKS, 3, 3, 0xFF);
        fb.set_pixel(&DEFAULT_DRIVE_MASKS, 4, 3, 0x0F);
        assert_eq!(fb.pixel(&DEFAULT_DRIVE_MASKS, 3, 3), 0xFF);
        assert_eq!(fb.pixel(&DEFAULT_DRIVE_MASKS, 4, 3), 0x0F);
        assert_eq!(fb.pixel(&DEFAULT_DRIVE_MASKS, 2, 3), 0);
        assert_eq!(fb.pixel(&DEFAULT_DRIVE_MASKS, 3, 2), 0);
    }

    #[test]
    fn out_of_range_writes_leave_buffer_unchanged() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(&DEFAULT_DRIVE_MASKS, 2, 2, 0x77);
        let snapshot = fb.clone();
        for (x, y) in [(-1, 0), (0, -1), (8, 0), (0, 8), (100, 100), (-7, 12)] {
            fb.set_pixel(&DEFAULT_DRIVE_MASKS, x, y, 0xFF);
        }
        assert_eq!(fb.as_bytes(), snapshot.as_bytes());
    }

    #[test]
    fn fill_reaches_every_pixel() {
        let mut fb = FrameBuffer::new();
        fb.fill(&DEFAULT_DRIVE_MASKS, 0xA5);
        for y in 0..HEIGHT as i32 {
            for x in 0..WIDTH as i32 {
                assert_eq!(fb.pixel(&DEFAULT_DRIVE_MASKS, x, y), 0xA5);
            }
        }
        fb.clear();
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn default_masks_use_one_drive_line_per_column() {
        for m in &DEFAULT_DRIVE_MASKS {
            let bits: u32 = m.iter().map(|b| b.count_ones()).sum();
            assert_eq!(bits, 1);
        }
    }
}
