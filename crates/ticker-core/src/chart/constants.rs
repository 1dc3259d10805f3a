//! Default values for the scrolling chart

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::RgbColor;

/// Horizontal pixels per tick
pub const DEFAULT_TIME_SCALE_PX: u32 = 15;

/// Pixels shifted left on each scroll
pub const DEFAULT_SCROLL_STEP_PX: u32 = 15;

/// Radius of the dot drawn at each sample
pub const DEFAULT_POINT_RADIUS_PX: u32 = 4;

/// Stroke width of the connecting segment
pub const DEFAULT_LINE_WIDTH_PX: u32 = 1;

// RGB565 format: R(5 bits), G(6 bits), B(5 bits)

/// Rising value
pub const COLOR_UP: Rgb565 = Rgb565::new(0, 128 >> 2, 0);

/// Falling value
pub const COLOR_DOWN: Rgb565 = Rgb565::RED;

/// Unchanged value
pub const COLOR_NEUTRAL: Rgb565 = Rgb565::BLACK;

/// Surface background, restored by scroll clears
pub const COLOR_BACKGROUND: Rgb565 = Rgb565::WHITE;
