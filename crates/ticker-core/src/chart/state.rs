//! Stateful chart that remembers the last drawn sample

use core::fmt::Debug;

use log::debug;

use crate::sample::Sample;
use crate::surface::Surface;

use super::config::ChartConfig;
use super::renderer::{RenderOutcome, ScrollingChartRenderer};
use super::ChartResult;

/// The two most recently drawn samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub previous: Sample,
    pub current: Sample,
}

/// Feeds samples to a [`ScrollingChartRenderer`] one at a time.
///
/// The last drawn sample is cached here instead of in the caller, and is only
/// replaced once a draw succeeds. A rejected sample leaves the cache as it
/// was, so the next valid sample still connects to the last drawn point.
#[derive(Debug, Clone, Default)]
pub struct TickerChart {
    renderer: ScrollingChartRenderer,
    state: Option<RenderState>,
}

impl TickerChart {
    pub fn new(config: ChartConfig) -> Self {
        Self {
            renderer: ScrollingChartRenderer::new(config),
            state: None,
        }
    }

    pub fn config(&self) -> &ChartConfig {
        self.renderer.config()
    }

    /// Draw `sample` connected to the previously drawn one.
    ///
    /// The very first sample is drawn against itself.
    pub fn push<S>(&mut self, surface: &mut S, sample: Sample) -> ChartResult<RenderOutcome>
    where
        S: Surface,
        S::Error: Debug,
    {
        let previous = self.last_sample().unwrap_or(sample);
        let outcome = self.renderer.render(surface, &previous, &sample)?;

        self.state = Some(RenderState {
            previous,
            current: sample,
        });
        Ok(outcome)
    }

    pub fn state(&self) -> Option<&RenderState> {
        self.state.as_ref()
    }

    /// Most recently drawn sample
    pub fn last_sample(&self) -> Option<Sample> {
        self.state.map(|state| state.current)
    }

    /// Forget the cached samples; the next push starts a new series.
    ///
    /// Pixels already on the surface are not touched.
    pub fn reset(&mut self) {
        debug!("Resetting chart state");
        self.state = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartError;
    use crate::chart::constants::{COLOR_BACKGROUND, COLOR_NEUTRAL};
    use crate::framebuffer::FrameBuffer;
    use crate::sample::Trend;
    use embedded_graphics::pixelcolor::Rgb565;
    use embedded_graphics::prelude::*;

    fn setup() -> (TickerChart, FrameBuffer) {
        let config = ChartConfig::default();
        (
            TickerChart::new(config),
            FrameBuffer::new(Size::new(600, 400), config.background),
        )
    }

    #[test]
    fn test_three_samples_end_to_end() {
        let (mut chart, mut fb) = setup();
        let samples = [
            Sample::new(0, 10.0),
            Sample::new(1, 12.0),
            Sample::new(2, 9.0),
        ];

        let outcomes: Vec<_> = samples
            .iter()
            .map(|s| chart.push(&mut fb, *s).unwrap())
            .collect();

        let xs: Vec<_> = outcomes.iter().map(|o| o.plan.to.x).collect();
        let trends: Vec<_> = outcomes.iter().map(|o| o.plan.trend).collect();
        assert_eq!(xs, [0, 15, 30]);
        assert_eq!(trends, [Trend::Neutral, Trend::Up, Trend::Down]);
        assert!(outcomes.iter().all(|o| !o.plan.scroll));
        assert_eq!(
            chart.state(),
            Some(&RenderState {
                previous: samples[1],
                current: samples[2],
            })
        );
    }

    #[test]
    fn test_no_scroll_while_series_fits() {
        let (mut chart, mut fb) = setup();
        // Marker near the left edge, clear of any line or dot.
        fb.draw_iter([Pixel(Point::new(1, 0), Rgb565::BLUE)]).unwrap();

        // 39 samples: 39 * 15 = 585 < 600.
        for tick in 0..39 {
            let outcome = chart.push(&mut fb, Sample::new(tick, 0.0)).unwrap();
            assert!(!outcome.plan.scroll, "tick {tick} scrolled");
        }

        assert_eq!(fb.pixel(Point::new(1, 0)), Some(Rgb565::BLUE));
    }

    #[test]
    fn test_fortieth_sample_scrolls_exactly_once() {
        let (mut chart, mut fb) = setup();
        fb.draw_iter([Pixel(Point::new(20, 0), Rgb565::BLUE)]).unwrap();

        let mut scrolls = 0;
        for tick in 0..=40 {
            let outcome = chart.push(&mut fb, Sample::new(tick, 0.0)).unwrap();
            if outcome.plan.scroll {
                scrolls += 1;
                assert_eq!(tick, 40);
                assert_eq!(outcome.plan.to.x, 600 - 15);
            }
        }

        assert_eq!(scrolls, 1);
        assert_eq!(fb.pixel(Point::new(5, 0)), Some(Rgb565::BLUE));
        assert_eq!(fb.pixel(Point::new(20, 0)), Some(COLOR_BACKGROUND));
        // Newest dot at the right edge.
        assert_eq!(fb.pixel(Point::new(585, 200)), Some(COLOR_NEUTRAL));
    }

    #[test]
    fn test_every_sample_past_the_edge_scrolls() {
        let (mut chart, mut fb) = setup();
        for tick in 0..40 {
            chart.push(&mut fb, Sample::new(tick, 0.0)).unwrap();
        }

        for tick in 40..45 {
            let outcome = chart.push(&mut fb, Sample::new(tick, 1.0)).unwrap();
            assert!(outcome.plan.scroll);
            assert_eq!(outcome.plan.to.x, 585);
            assert_eq!(outcome.plan.from.x, 574);
        }
    }

    #[test]
    fn test_same_pair_twice_yields_same_position() {
        let (mut chart, mut fb) = setup();
        let previous = Sample::new(3, 1.0);
        let current = Sample::new(4, 2.0);

        chart.push(&mut fb, previous).unwrap();
        let first = chart.push(&mut fb, current).unwrap();

        chart.reset();
        chart.push(&mut fb, previous).unwrap();
        let second = chart.push(&mut fb, current).unwrap();

        assert_eq!(first.plan, second.plan);
    }

    #[test]
    fn test_rejected_sample_keeps_cache() {
        let (mut chart, mut fb) = setup();
        chart.push(&mut fb, Sample::new(0, 1.0)).unwrap();
        chart.push(&mut fb, Sample::new(5, 2.0)).unwrap();
        let before = chart.state().copied();

        let err = chart.push(&mut fb, Sample::new(4, 3.0)).unwrap_err();
        assert!(matches!(err, ChartError::InvalidSample { tick: 4, .. }));
        let err = chart.push(&mut fb, Sample::new(6, f32::INFINITY)).unwrap_err();
        assert!(matches!(err, ChartError::InvalidSample { tick: 6, .. }));

        assert_eq!(chart.state().copied(), before);
        assert_eq!(chart.last_sample(), Some(Sample::new(5, 2.0)));
    }

    #[test]
    fn test_reset_starts_a_new_series() {
        let (mut chart, mut fb) = setup();
        chart.push(&mut fb, Sample::new(7, 1.0)).unwrap();
        chart.reset();
        assert!(chart.state().is_none());

        // Lower tick is fine after a reset and is drawn as a first point.
        let outcome = chart.push(&mut fb, Sample::new(0, 4.0)).unwrap();
        assert_eq!(outcome.plan.trend, Trend::Neutral);
        assert_eq!(outcome.plan.to, Point::new(0, 196));
    }
}
