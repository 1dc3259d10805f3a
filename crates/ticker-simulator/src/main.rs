//! Desktop simulator for the tickerchart scrolling price chart.
//!
//! Renders the ticker-core chart in an SDL2 window via
//! `embedded-graphics-simulator`. A random price is sampled once per second
//! and drawn onto a 600×400 chart, with the current price shown underneath.
//!
//! # Key bindings
//!
//! | Key   | Action                              |
//! |-------|-------------------------------------|
//! | Space | Pause / resume the sampling timer   |
//! | R     | Clear the chart and restart at tick 0 |
//! | Q     | Quit                                |
//!
//! Set `TICKER_SEED` to replay the same price sequence.

use std::time::Duration as StdDuration;

use embassy_time::{Duration, Instant};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ticker_core::feed::{SampleSource, TickerFeed};
use ticker_core::label::PriceLabel;
use ticker_core::scheduler::IntervalScheduler;
use ticker_core::{ChartConfig, FrameBuffer, Sample, TickerChart};

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

/// Chart surface size in pixels.
const CHART_SIZE: Size = Size::new(600, 400);

/// Height of the price strip under the chart.
const LABEL_HEIGHT_PX: u32 = 40;

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 1;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: StdDuration = StdDuration::from_millis(33);

/// Interval between price samples.
const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Only the feed's timer is ever registered.
const SCHEDULER_CAPACITY: usize = 1;

/// Inclusive range of generated prices.
const PRICE_MIN: i32 = 0;
const PRICE_MAX: i32 = 100;

// ---------------------------------------------------------------------------
// Price generation
// ---------------------------------------------------------------------------

/// Uniformly random whole-dollar prices.
struct RandomPrice {
    rng: StdRng,
}

impl RandomPrice {
    /// Seeded from `TICKER_SEED` when set, from OS entropy otherwise.
    fn from_env() -> Self {
        let seed = std::env::var("TICKER_SEED")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok());

        let rng = match seed {
            Some(seed) => {
                info!("Using price seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl SampleSource for RandomPrice {
    fn next_value(&mut self) -> f32 {
        self.rng.gen_range(PRICE_MIN..=PRICE_MAX) as f32
    }
}

// ---------------------------------------------------------------------------
// Ticker view
// ---------------------------------------------------------------------------

/// Chart surface plus price label, fed one sample at a time.
struct TickerView {
    surface: FrameBuffer,
    chart: TickerChart,
    label: PriceLabel,
}

impl TickerView {
    fn new(config: ChartConfig) -> Self {
        let label_bounds = Rectangle::new(
            Point::new(0, CHART_SIZE.height as i32),
            Size::new(CHART_SIZE.width, LABEL_HEIGHT_PX),
        );

        Self {
            surface: FrameBuffer::new(CHART_SIZE, config.background),
            chart: TickerChart::new(config),
            label: PriceLabel::new(label_bounds, config.colors, config.background),
        }
    }

    fn show(&mut self, sample: Sample) {
        match self.chart.push(&mut self.surface, sample) {
            Ok(outcome) => {
                if outcome.plan.scroll {
                    debug!("Chart scrolled at tick {}", sample.tick);
                }
                self.label.update(sample.value);
            }
            Err(e) => warn!("Dropping sample {:?}: {}", sample, e),
        }
    }

    /// Wipe the chart so the next sample starts a fresh series.
    fn reset(&mut self) {
        let background = self.chart.config().background;
        let _ = self.surface.clear(background);
        self.chart.reset();
        self.label.reset();
    }

    fn draw(&mut self, display: &mut SimulatorDisplay<Rgb565>) {
        let _ = self.surface.flush(display);
        if self.label.is_dirty() {
            let _ = self.label.draw(display);
            self.label.mark_clean();
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting tickerchart simulator");
    info!(
        "Chart: {}×{} (scale {}×)",
        CHART_SIZE.width, CHART_SIZE.height, WINDOW_SCALE
    );
    info!("Keys: Space=Pause/Resume  R=Reset  Q=Quit");

    let config = ChartConfig::default();

    // SDL2 display and window
    let mut display = SimulatorDisplay::<Rgb565>::new(Size::new(
        CHART_SIZE.width,
        CHART_SIZE.height + LABEL_HEIGHT_PX,
    ));
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Ticker Chart", &output_settings);

    let mut view = TickerView::new(config);
    let mut scheduler = IntervalScheduler::<SCHEDULER_CAPACITY>::new();
    let mut feed = TickerFeed::new(RandomPrice::from_env());

    view.show(feed.initial_sample());
    if let Err(e) = feed.start(&mut scheduler, Instant::now(), SAMPLE_INTERVAL) {
        error!("Could not start ticker feed: {}", e);
        return;
    }

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    let _ = display.clear(config.background);
    view.draw(&mut display);
    window.update(&display);

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    'running: loop {
        let frame_start = std::time::Instant::now();

        // --- SDL events ---------------------------------------------------
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q | Keycode::Escape => break 'running,
                    Keycode::Space => {
                        if feed.is_running() {
                            feed.stop(&mut scheduler);
                        } else if let Err(e) =
                            feed.start(&mut scheduler, Instant::now(), SAMPLE_INTERVAL)
                        {
                            warn!("Could not resume ticker feed: {}", e);
                        }
                    }
                    Keycode::R => {
                        info!("Resetting chart");
                        view.reset();
                        feed.reset();
                        view.show(feed.initial_sample());
                    }
                    _ => {}
                },

                _ => {}
            }
        }

        // --- Sampling -----------------------------------------------------
        for handle in scheduler.poll(Instant::now()) {
            if feed.owns(handle) {
                let sample = feed.next_sample();
                view.show(sample);
            }
        }

        // --- Render -------------------------------------------------------
        view.draw(&mut display);
        window.update(&display);

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    feed.stop(&mut scheduler);
    info!("Simulator exiting");
}
