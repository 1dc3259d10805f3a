//! Chart geometry and color configuration

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::sample::Trend;

use super::constants::{
    COLOR_BACKGROUND, COLOR_DOWN, COLOR_NEUTRAL, COLOR_UP, DEFAULT_LINE_WIDTH_PX,
    DEFAULT_POINT_RADIUS_PX, DEFAULT_SCROLL_STEP_PX, DEFAULT_TIME_SCALE_PX,
};
use super::{ChartError, ChartResult};

/// Colors used for each trend direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendColors {
    /// Value went up
    pub up: Rgb565,
    /// Value went down
    pub down: Rgb565,
    /// Value unchanged
    pub neutral: Rgb565,
}

impl Default for TrendColors {
    fn default() -> Self {
        Self {
            up: COLOR_UP,
            down: COLOR_DOWN,
            neutral: COLOR_NEUTRAL,
        }
    }
}

impl TrendColors {
    /// Color for the given trend
    pub fn color_for(&self, trend: Trend) -> Rgb565 {
        match trend {
            Trend::Up => self.up,
            Trend::Down => self.down,
            Trend::Neutral => self.neutral,
        }
    }
}

/// Scrolling chart configuration
///
/// # Examples
/// ```ignore
/// let config = ChartConfig::default()
///     .with_time_scale(10)
///     .with_point_radius(3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartConfig {
    /// Horizontal pixels per tick
    pub time_scale: u32,
    /// Pixels shifted left when the surface is full
    pub scroll_step: u32,
    /// Dot radius; also the gap between a previous dot's center and the
    /// start of the next segment
    pub point_radius: u32,
    /// Segment stroke width
    pub line_width: u32,
    /// Per-trend colors
    pub colors: TrendColors,
    /// Color the scroll strip is cleared to
    pub background: Rgb565,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            time_scale: DEFAULT_TIME_SCALE_PX,
            scroll_step: DEFAULT_SCROLL_STEP_PX,
            point_radius: DEFAULT_POINT_RADIUS_PX,
            line_width: DEFAULT_LINE_WIDTH_PX,
            colors: TrendColors::default(),
            background: COLOR_BACKGROUND,
        }
    }
}

impl ChartConfig {
    pub fn with_time_scale(mut self, time_scale: u32) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn with_scroll_step(mut self, scroll_step: u32) -> Self {
        self.scroll_step = scroll_step;
        self
    }

    pub fn with_point_radius(mut self, point_radius: u32) -> Self {
        self.point_radius = point_radius;
        self
    }

    pub fn with_line_width(mut self, line_width: u32) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn with_colors(mut self, colors: TrendColors) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_background(mut self, background: Rgb565) -> Self {
        self.background = background;
        self
    }

    /// Check the configuration against a surface of `size`.
    pub fn validate(&self, size: Size) -> ChartResult<()> {
        if self.time_scale == 0 {
            return Err(ChartError::InvalidConfig {
                param: "time_scale must be non-zero",
            });
        }
        if self.scroll_step == 0 || self.scroll_step > size.width {
            return Err(ChartError::InvalidConfig {
                param: "scroll_step must be within 1..=surface width",
            });
        }
        if self.line_width == 0 {
            return Err(ChartError::InvalidConfig {
                param: "line_width must be non-zero",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChartConfig::default();
        assert_eq!(config.time_scale, 15);
        assert_eq!(config.scroll_step, 15);
        assert_eq!(config.point_radius, 4);
        assert_eq!(config.colors.color_for(Trend::Down), Rgb565::RED);
        assert_eq!(config.colors.color_for(Trend::Neutral), Rgb565::BLACK);
        assert!(config.validate(Size::new(600, 400)).is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let size = Size::new(100, 50);
        assert!(ChartConfig::default().with_time_scale(0).validate(size).is_err());
        assert!(ChartConfig::default().with_scroll_step(0).validate(size).is_err());
        assert!(ChartConfig::default().with_scroll_step(101).validate(size).is_err());
        assert!(ChartConfig::default().with_scroll_step(100).validate(size).is_ok());
        assert!(ChartConfig::default().with_line_width(0).validate(size).is_err());
    }
}
