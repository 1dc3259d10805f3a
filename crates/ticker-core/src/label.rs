//! Price label colored by the latest trend

use core::fmt::Write;

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, ascii::FONT_10X20};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::String;

use crate::chart::TrendColors;
use crate::sample::Trend;

/// Maximum rendered label length
const MAX_LABEL_LENGTH: usize = 32;

/// Left padding inside the label bounds in pixels
const LABEL_PADDING_LEFT_PX: i32 = 8;

/// Text line such as `Price: $42`, colored green/red/black as the price moves.
///
/// Keeps its own copy of the previous price, independent of the chart, and
/// only marks itself dirty when the displayed text or color changes.
pub struct PriceLabel {
    bounds: Rectangle,
    font: &'static MonoFont<'static>,
    colors: TrendColors,
    background: Rgb565,
    precision: usize,
    previous: Option<f32>,
    trend: Trend,
    text: String<MAX_LABEL_LENGTH>,
    dirty: bool,
}

impl PriceLabel {
    pub fn new(bounds: Rectangle, colors: TrendColors, background: Rgb565) -> Self {
        let mut label = Self {
            bounds,
            font: &FONT_10X20,
            colors,
            background,
            precision: 0,
            previous: None,
            trend: Trend::Neutral,
            text: String::new(),
            dirty: true,
        };
        label.text = label.format(0.0);
        label
    }

    /// Number of decimals shown.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self.text = self.format(self.previous.unwrap_or(0.0));
        self
    }

    pub fn with_font(mut self, font: &'static MonoFont<'static>) -> Self {
        self.font = font;
        self
    }

    /// Show a new price and return its trend against the previous one.
    ///
    /// The first price is always neutral.
    pub fn update(&mut self, value: f32) -> Trend {
        let trend = match self.previous {
            Some(previous) => Trend::between(previous, value),
            None => Trend::Neutral,
        };
        self.previous = Some(value);

        let text = self.format(value);
        if text != self.text || trend != self.trend {
            self.text = text;
            self.trend = trend;
            self.dirty = true;
        }
        trend
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn trend(&self) -> Trend {
        self.trend
    }

    pub fn color(&self) -> Rgb565 {
        self.colors.color_for(self.trend)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Forget the previous price and show the initial text.
    pub fn reset(&mut self) {
        self.previous = None;
        self.trend = Trend::Neutral;
        self.text = self.format(0.0);
        self.dirty = true;
    }

    pub fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        self.bounds
            .into_styled(PrimitiveStyle::with_fill(self.background))
            .draw(display)?;

        let position = Point::new(
            self.bounds.top_left.x + LABEL_PADDING_LEFT_PX,
            self.bounds.center().y,
        );
        Text::with_baseline(
            &self.text,
            position,
            MonoTextStyle::new(self.font, self.color()),
            Baseline::Middle,
        )
        .draw(display)?;
        Ok(())
    }

    fn format(&self, value: f32) -> String<MAX_LABEL_LENGTH> {
        let mut text = String::new();
        let _ = write!(Truncating(&mut text), "Price: ${:.*}", self.precision, value);
        text
    }
}

/// Writer that keeps as many characters as fit and drops the rest.
struct Truncating<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}
