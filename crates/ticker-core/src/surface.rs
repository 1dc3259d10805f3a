//! Drawable pixel surface used as the chart's render target.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// A fixed-size pixel buffer the chart draws into.
///
/// On top of the primitive drawing provided by [`DrawTarget`] (lines, filled
/// circles), a surface must be able to move an existing block of pixels and
/// to clear a block back to its background. Both operations clip the given
/// rectangles to the surface bounds.
pub trait Surface: DrawTarget<Color = Rgb565> {
    /// Copy the pixels in `area` so that its top-left corner lands on `dest`.
    ///
    /// Source and destination may overlap.
    fn copy_region(&mut self, area: &Rectangle, dest: Point) -> Result<(), Self::Error>;

    /// Reset every pixel in `area` to the surface background.
    fn clear_region(&mut self, area: &Rectangle) -> Result<(), Self::Error>;
}
