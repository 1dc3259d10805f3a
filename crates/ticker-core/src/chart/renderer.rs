//! Incremental segment-and-dot renderer with pixel-shift scrolling

use core::fmt::Debug;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use log::{debug, trace, warn};

use crate::sample::{Sample, Trend};
use crate::surface::Surface;

use super::config::ChartConfig;
use super::{ChartError, ChartResult};

/// Screen-space geometry for one incremental draw.
///
/// Produced by [`ScrollingChartRenderer::plan`], which depends only on the
/// surface size, the configuration and the two samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawPlan {
    /// Segment start, just right of the previous dot
    pub from: Point,
    /// New point; segment end and dot center
    pub to: Point,
    /// Direction of change, selects the color
    pub trend: Trend,
    /// Whether the surface is shifted left before drawing
    pub scroll: bool,
}

/// What a single render call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOutcome {
    /// Geometry that was drawn
    pub plan: DrawPlan,
    /// Color used for the segment and dot
    pub color: Rgb565,
}

/// Draws one sample at a time onto a [`Surface`], scrolling when full.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollingChartRenderer {
    config: ChartConfig,
}

impl ScrollingChartRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Compute where the segment and dot for `current` go.
    pub fn plan(&self, size: Size, previous: &Sample, current: &Sample) -> DrawPlan {
        let width = size.width as i64;
        let scale = self.config.time_scale as i64;
        let radius = self.config.point_radius as i64;
        let step = self.config.scroll_step as i64;

        let mut x = current.tick as i64 * scale;
        let mut prev_x = previous.tick as i64 * scale + radius;

        let scroll = x + radius > width;
        if scroll {
            x = width - step;
            prev_x = x - (step - radius);
        }

        DrawPlan {
            from: Point::new(prev_x as i32, value_to_row(size.height, previous.value)),
            to: Point::new(x as i32, value_to_row(size.height, current.value)),
            trend: Trend::between(previous.value, current.value),
            scroll,
        }
    }

    /// Draw the segment from `previous` to `current` and the dot at `current`.
    ///
    /// For the first sample of a series pass the same sample twice; the
    /// segment stays inside the new dot and only the dot shows.
    ///
    /// Inputs are validated before the surface is touched.
    pub fn render<S>(
        &self,
        surface: &mut S,
        previous: &Sample,
        current: &Sample,
    ) -> ChartResult<RenderOutcome>
    where
        S: Surface,
        S::Error: Debug,
    {
        let size = surface.bounding_box().size;
        if size.width == 0 || size.height == 0 {
            return Err(ChartError::SurfaceUnavailable {
                width: size.width,
                height: size.height,
            });
        }
        self.config.validate(size)?;
        current.validate_after(previous)?;

        let plan = self.plan(size, previous, current);

        if plan.scroll {
            debug!(
                "Tick {} overflows {}px surface, shifting left by {}px",
                current.tick, size.width, self.config.scroll_step
            );
            Self::shift_left(surface, self.config.scroll_step).map_err(draw_failed)?;
        }

        let color = self.config.colors.color_for(plan.trend);
        trace!(
            "Drawing tick {} from {:?} to {:?} ({:?})",
            current.tick, plan.from, plan.to, plan.trend
        );

        Line::new(plan.from, plan.to)
            .into_styled(PrimitiveStyle::with_stroke(color, self.config.line_width))
            .draw(surface)
            .map_err(draw_failed)?;

        Circle::with_center(plan.to, self.config.point_radius * 2 + 1)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(surface)
            .map_err(draw_failed)?;

        Ok(RenderOutcome { plan, color })
    }

    /// Move every pixel `px` columns to the left and clear the freed strip on
    /// the right.
    pub fn shift_left<S: Surface>(surface: &mut S, px: u32) -> Result<(), S::Error> {
        let size = surface.bounding_box().size;
        let px = px.min(size.width);
        let kept = size.width - px;

        surface.copy_region(
            &Rectangle::new(Point::new(px as i32, 0), Size::new(kept, size.height)),
            Point::zero(),
        )?;
        surface.clear_region(&Rectangle::new(
            Point::new(kept as i32, 0),
            Size::new(px, size.height),
        ))
    }
}

/// Map a value to a pixel row: zero sits at mid-height, larger values higher.
///
/// Rows are kept within one surface height above and below the surface so
/// that segments to far-off values stay short; everything outside is clipped
/// anyway.
fn value_to_row(height: u32, value: f32) -> i32 {
    let height = height as f32;
    let row = (height / 2.0 - value).clamp(-height, 2.0 * height);
    // Round half away from zero; float-to-int `as` saturates.
    if row >= 0.0 {
        (row + 0.5) as i32
    } else {
        (row - 0.5) as i32
    }
}

fn draw_failed<E: Debug>(err: E) -> ChartError {
    warn!("Surface draw error: {:?}", err);
    ChartError::DrawFailed
}
