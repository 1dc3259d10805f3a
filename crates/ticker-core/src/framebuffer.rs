//! RAM-backed framebuffer with per-pixel change detection.
//!
//! The chart draws into this buffer instead of the display. After drawing
//! completes, only the rectangular region containing changed pixels is flushed
//! to the real display in a single `fill_contiguous` call.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

use crate::surface::Surface;

/// Bounding box of pixels that have changed since the last flush.
#[derive(Debug, Clone, Copy)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    /// Expand the dirty region to include the given pixel coordinate.
    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Create a new dirty rect covering a single pixel.
    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }
}

/// Half-open pixel span `[x0, x1) x [y0, y1)`, already clipped to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl Span {
    fn from_rect(area: &Rectangle) -> Self {
        let x0 = area.top_left.x as i64;
        let y0 = area.top_left.y as i64;
        Self {
            x0,
            y0,
            x1: x0 + area.size.width as i64,
            y1: y0 + area.size.height as i64,
        }
    }

    /// Intersect with `[0, width) x [0, height)`; `None` if nothing is left.
    fn clip(self, width: usize, height: usize) -> Option<Self> {
        let clipped = Self {
            x0: self.x0.max(0),
            y0: self.y0.max(0),
            x1: self.x1.min(width as i64),
            y1: self.y1.min(height as i64),
        };
        (clipped.x0 < clipped.x1 && clipped.y0 < clipped.y1).then_some(clipped)
    }

    fn translate(self, dx: i64, dy: i64) -> Self {
        Self {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
        }
    }

    fn width(&self) -> usize {
        (self.x1 - self.x0) as usize
    }
}

/// Heap-backed framebuffer implementing [`Surface`] for `Rgb565`.
///
/// The buffer has a fixed size chosen at construction and a background color
/// that [`Surface::clear_region`] restores. A dirty bounding box is tracked so
/// that only changed pixels are flushed to the display.
pub struct FrameBuffer {
    pixels: Vec<Rgb565>,
    width: usize,
    height: usize,
    background: Rgb565,
    dirty: Option<DirtyRect>,
}

impl FrameBuffer {
    /// Allocate a new framebuffer of `size`, filled with `background`.
    pub fn new(size: Size, background: Rgb565) -> Self {
        let width = size.width as usize;
        let height = size.height as usize;
        Self {
            pixels: vec![background; width * height],
            width,
            height,
            background,
            dirty: None,
        }
    }

    /// Background color restored by region clears.
    pub fn background(&self) -> Rgb565 {
        self.background
    }

    /// Read back a single pixel, `None` when outside the buffer.
    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        let (x, y) = (point.x, point.y);
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width + x as usize])
    }

    /// Whether anything changed since the last flush.
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    /// Write a single pixel, expanding the dirty rect only if the color changed.
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        let idx = y * self.width + x;
        if self.pixels[idx] != color {
            self.pixels[idx] = color;
            self.mark_dirty(x, y);
        }
    }

    fn mark_dirty(&mut self, x: usize, y: usize) {
        match &mut self.dirty {
            Some(rect) => rect.expand(x, y),
            None => self.dirty = Some(DirtyRect::from_point(x, y)),
        }
    }

    fn mark_span_dirty(&mut self, span: Span) {
        self.mark_dirty(span.x0 as usize, span.y0 as usize);
        self.mark_dirty(span.x1 as usize - 1, span.y1 as usize - 1);
    }

    /// Flush the dirty region to a display, then reset the dirty state.
    ///
    /// Only the bounding rectangle of changed pixels is sent via
    /// `fill_contiguous`. If nothing changed, this is a no-op.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.flush_at(display, Point::zero())
    }

    /// Like [`FrameBuffer::flush`], placing the buffer's origin at `offset` on
    /// the display.
    pub fn flush_at<D>(&mut self, display: &mut D, offset: Point) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };

        let width = rect.max_x - rect.min_x + 1;
        let height = rect.max_y - rect.min_y + 1;

        debug!(
            "Flushing {}x{} dirty region at ({}, {})",
            width, height, rect.min_x, rect.min_y
        );

        let area = Rectangle::new(
            Point::new(rect.min_x as i32, rect.min_y as i32) + offset,
            Size::new(width as u32, height as u32),
        );

        // Borrow the pixel slice so the closure captures a shared reference,
        // avoiding the `FnMut` escaping-reference issue with `&mut self`.
        let pixels = &self.pixels;
        let stride = self.width;
        let pixel_iter = (rect.min_y..=rect.max_y).flat_map(move |y| {
            let row_start = y * stride + rect.min_x;
            pixels[row_start..row_start + width].iter().copied()
        });

        display.fill_contiguous(&area, pixel_iter)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = (self.width, self.height);

        for Pixel(coord, color) in pixels {
            let x = coord.x;
            let y = coord.y;
            if x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h {
                self.set_pixel(x as usize, y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        let (w, h) = (self.width as i64, self.height as i64);
        let origin = Span::from_rect(area);

        // Colors are laid out row-major over the unclipped area.
        let mut colors = colors.into_iter();
        for y in origin.y0..origin.y1 {
            for x in origin.x0..origin.x1 {
                if let Some(color) = colors.next()
                    && (0..w).contains(&x)
                    && (0..h).contains(&y)
                {
                    self.set_pixel(x as usize, y as usize, color);
                }
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let Some(span) = Span::from_rect(area).clip(self.width, self.height) else {
            return Ok(());
        };

        for y in span.y0..span.y1 {
            for x in span.x0..span.x1 {
                self.set_pixel(x as usize, y as usize, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..self.height {
            for x in 0..self.width {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

impl Surface for FrameBuffer {
    fn copy_region(&mut self, area: &Rectangle, dest: Point) -> Result<(), Self::Error> {
        let dx = dest.x as i64 - area.top_left.x as i64;
        let dy = dest.y as i64 - area.top_left.y as i64;

        let Some(src) = Span::from_rect(area).clip(self.width, self.height) else {
            return Ok(());
        };
        let Some(dst) = src.translate(dx, dy).clip(self.width, self.height) else {
            return Ok(());
        };
        let src = dst.translate(-dx, -dy);
        let row_len = dst.width();
        let stride = self.width;

        let copy_row = |pixels: &mut Vec<Rgb565>, row: i64| {
            let from = (src.y0 + row) as usize * stride + src.x0 as usize;
            let to = (dst.y0 + row) as usize * stride + dst.x0 as usize;
            pixels.copy_within(from..from + row_len, to);
        };

        // Walk rows away from the destination so overlapping rows are read
        // before they are overwritten.
        let rows = dst.y1 - dst.y0;
        if dy > 0 {
            for row in (0..rows).rev() {
                copy_row(&mut self.pixels, row);
            }
        } else {
            for row in 0..rows {
                copy_row(&mut self.pixels, row);
            }
        }

        self.mark_span_dirty(dst);
        Ok(())
    }

    fn clear_region(&mut self, area: &Rectangle) -> Result<(), Self::Error> {
        let background = self.background;
        self.fill_solid(area, background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;

    fn buffer(width: u32, height: u32) -> FrameBuffer {
        FrameBuffer::new(Size::new(width, height), Rgb565::WHITE)
    }

    #[test]
    fn test_new_buffer_is_background_and_clean() {
        let fb = buffer(4, 3);
        assert_eq!(fb.size(), Size::new(4, 3));
        assert_eq!(fb.pixel(Point::new(3, 2)), Some(Rgb565::WHITE));
        assert_eq!(fb.pixel(Point::new(4, 0)), None);
        assert_eq!(fb.pixel(Point::new(0, -1)), None);
        assert!(!fb.is_dirty());
    }

    #[test]
    fn test_draw_iter_clips_out_of_bounds_pixels() {
        let mut fb = buffer(4, 4);
        fb.draw_iter([
            Pixel(Point::new(-1, 0), Rgb565::RED),
            Pixel(Point::new(1, 1), Rgb565::RED),
            Pixel(Point::new(4, 4), Rgb565::RED),
        ])
        .unwrap();

        assert_eq!(fb.pixel(Point::new(1, 1)), Some(Rgb565::RED));
        assert!(fb.is_dirty());
    }

    #[test]
    fn test_unchanged_pixels_do_not_dirty() {
        let mut fb = buffer(4, 4);
        fb.draw_iter([Pixel(Point::new(2, 2), Rgb565::WHITE)]).unwrap();
        assert!(!fb.is_dirty());
    }

    #[test]
    fn test_copy_region_shifts_columns_left() {
        let mut fb = buffer(6, 2);
        for x in 0..6 {
            let color = if x % 2 == 0 { Rgb565::RED } else { Rgb565::GREEN };
            fb.draw_iter([Pixel(Point::new(x, 0), color)]).unwrap();
        }

        fb.copy_region(&Rectangle::new(Point::new(2, 0), Size::new(4, 2)), Point::zero())
            .unwrap();

        // Column 2 (red) moves to 0, column 3 (green) to 1, and so on.
        assert_eq!(fb.pixel(Point::new(0, 0)), Some(Rgb565::RED));
        assert_eq!(fb.pixel(Point::new(1, 0)), Some(Rgb565::GREEN));
        assert_eq!(fb.pixel(Point::new(3, 0)), Some(Rgb565::GREEN));
        // The source tail is left untouched by the copy itself.
        assert_eq!(fb.pixel(Point::new(5, 0)), Some(Rgb565::GREEN));
    }

    #[test]
    fn test_copy_region_overlapping_downwards() {
        let mut fb = buffer(1, 4);
        for y in 0..4 {
            let color = Rgb565::new(y as u8, 0, 0);
            fb.draw_iter([Pixel(Point::new(0, y), color)]).unwrap();
        }

        fb.copy_region(&Rectangle::new(Point::zero(), Size::new(1, 3)), Point::new(0, 1))
            .unwrap();

        assert_eq!(fb.pixel(Point::new(0, 0)), Some(Rgb565::new(0, 0, 0)));
        assert_eq!(fb.pixel(Point::new(0, 1)), Some(Rgb565::new(0, 0, 0)));
        assert_eq!(fb.pixel(Point::new(0, 2)), Some(Rgb565::new(1, 0, 0)));
        assert_eq!(fb.pixel(Point::new(0, 3)), Some(Rgb565::new(2, 0, 0)));
    }

    #[test]
    fn test_copy_region_clips_destination() {
        let mut fb = buffer(4, 1);
        fb.draw_iter([Pixel(Point::new(0, 0), Rgb565::RED)]).unwrap();

        // Copying the whole row two pixels right drops the last two columns.
        fb.copy_region(&Rectangle::new(Point::zero(), Size::new(4, 1)), Point::new(2, 0))
            .unwrap();

        assert_eq!(fb.pixel(Point::new(2, 0)), Some(Rgb565::RED));
        assert_eq!(fb.pixel(Point::new(3, 0)), Some(Rgb565::WHITE));
    }

    #[test]
    fn test_clear_region_restores_background() {
        let mut fb = FrameBuffer::new(Size::new(4, 4), Rgb565::BLUE);
        fb.clear(Rgb565::RED).unwrap();

        fb.clear_region(&Rectangle::new(Point::new(2, 0), Size::new(10, 4)))
            .unwrap();

        assert_eq!(fb.pixel(Point::new(1, 3)), Some(Rgb565::RED));
        assert_eq!(fb.pixel(Point::new(2, 0)), Some(Rgb565::BLUE));
        assert_eq!(fb.pixel(Point::new(3, 3)), Some(Rgb565::BLUE));
    }

    #[test]
    fn test_flush_sends_only_dirty_region() {
        let mut fb = FrameBuffer::new(Size::new(8, 8), Rgb565::BLACK);
        fb.draw_iter([
            Pixel(Point::new(2, 3), Rgb565::RED),
            Pixel(Point::new(3, 4), Rgb565::GREEN),
        ])
        .unwrap();

        let mut display = MockDisplay::<Rgb565>::new();
        fb.flush(&mut display).unwrap();

        assert_eq!(
            display.affected_area(),
            Rectangle::new(Point::new(2, 3), Size::new(2, 2))
        );
        assert_eq!(display.get_pixel(Point::new(3, 4)), Some(Rgb565::GREEN));
        assert!(!fb.is_dirty());

        // Nothing left to send.
        let mut second = MockDisplay::<Rgb565>::new();
        fb.flush(&mut second).unwrap();
        assert_eq!(second.affected_area().size, Size::zero());
    }
}
