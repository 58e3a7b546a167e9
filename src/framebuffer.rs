//! In-memory drawing surface for the simulator and the tests

use core::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::{Rgb565, RgbColor},
    Pixel,
};

/// Row-major `Rgb565` pixel buffer.
pub struct FrameBuffer {
    size: Size,
    pixels: Vec<Rgb565>,
}

impl FrameBuffer {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![Rgb565::BLACK; (size.width * size.height) as usize],
        }
    }

    /// Colour at `point`, `None` outside the buffer
    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        self.index(point).map(|index| self.pixels[index])
    }

    /// Number of pixels in `color`
    pub fn count(&self, color: Rgb565) -> usize {
        self.pixels.iter().filter(|pixel| **pixel == color).count()
    }

    /// Number of pixels in `color` within columns `columns`
    pub fn count_in_columns(&self, columns: core::ops::Range<u32>, color: Rgb565) -> usize {
        self.pixels
            .iter()
            .enumerate()
            .filter(|(index, pixel)| {
                columns.contains(&(*index as u32 % self.size.width)) && **pixel == color
            })
            .count()
    }

    fn index(&self, point: Point) -> Option<usize> {
        let x = u32::try_from(point.x).ok()?;
        let y = u32::try_from(point.y).ok()?;
        (x < self.size.width && y < self.size.height)
            .then(|| (y * self.size.width + x) as usize)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(index) = self.index(point) {
                self.pixels[index] = color;
            }
        }
        Ok(())
    }
}
