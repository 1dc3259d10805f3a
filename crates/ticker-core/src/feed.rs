//! Periodic sample production for the ticker
//!
//! A [`TickerFeed`] turns timer firings into [`Sample`]s with consecutive
//! ticks. It owns the timer it started and cancels it on [`TickerFeed::stop`],
//! so tearing the ticker down releases the scheduler slot.

use embassy_time::{Duration, Instant};
use log::{debug, info};

use crate::sample::Sample;
use crate::scheduler::{Scheduler, SchedulerResult, TimerHandle};

/// Produces the value for each new tick.
pub trait SampleSource {
    fn next_value(&mut self) -> f32;
}

impl<F: FnMut() -> f32> SampleSource for F {
    fn next_value(&mut self) -> f32 {
        self()
    }
}

/// Tick counter plus value source, started and stopped through a [`Scheduler`].
pub struct TickerFeed<S> {
    source: S,
    tick: u32,
    timer: Option<TimerHandle>,
}

impl<S: SampleSource> TickerFeed<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            tick: 0,
            timer: None,
        }
    }

    /// Sample shown before the first timer firing.
    pub fn initial_sample(&self) -> Sample {
        Sample::new(0, 0.0)
    }

    /// Start producing samples every `period`. Does nothing if already running.
    pub fn start<Sch: Scheduler>(
        &mut self,
        scheduler: &mut Sch,
        now: Instant,
        period: Duration,
    ) -> SchedulerResult<()> {
        if self.timer.is_some() {
            return Ok(());
        }
        self.timer = Some(scheduler.start(now, period)?);
        info!("Ticker feed started ({}ms interval)", period.as_millis());
        Ok(())
    }

    /// Cancel the feed's timer, if any.
    pub fn stop<Sch: Scheduler>(&mut self, scheduler: &mut Sch) {
        if let Some(handle) = self.timer.take() {
            scheduler.stop(handle);
            info!("Ticker feed stopped at tick {}", self.tick);
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Whether `handle` is this feed's timer.
    pub fn owns(&self, handle: TimerHandle) -> bool {
        self.timer == Some(handle)
    }

    /// Advance to the next tick and draw its value.
    pub fn next_sample(&mut self) -> Sample {
        self.tick = self.tick.saturating_add(1);
        let sample = Sample::new(self.tick, self.source.next_value());
        debug!("Tick {} -> {}", sample.tick, sample.value);
        sample
    }

    /// Restart the tick count from zero. The timer keeps running.
    pub fn reset(&mut self) {
        self.tick = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::IntervalScheduler;

    fn scripted(values: &'static [f32]) -> impl FnMut() -> f32 {
        let mut index = 0;
        move || {
            let value = values[index % values.len()];
            index += 1;
            value
        }
    }

    #[test]
    fn test_samples_have_consecutive_ticks() {
        let mut feed = TickerFeed::new(scripted(&[10.0, 12.0, 9.0]));
        assert_eq!(feed.initial_sample(), Sample::new(0, 0.0));

        assert_eq!(feed.next_sample(), Sample::new(1, 10.0));
        assert_eq!(feed.next_sample(), Sample::new(2, 12.0));
        assert_eq!(feed.next_sample(), Sample::new(3, 9.0));

        feed.reset();
        assert_eq!(feed.next_sample().tick, 1);
    }

    #[test]
    fn test_start_and_stop_manage_one_timer() {
        let mut scheduler = IntervalScheduler::<2>::new();
        let mut feed = TickerFeed::new(scripted(&[1.0]));
        let period = Duration::from_secs(1);

        feed.start(&mut scheduler, Instant::from_millis(0), period).unwrap();
        feed.start(&mut scheduler, Instant::from_millis(0), period).unwrap();
        assert!(feed.is_running());
        assert_eq!(scheduler.active(), 1);

        let fired = scheduler.poll(Instant::from_millis(1000));
        assert_eq!(fired.len(), 1);
        assert!(feed.owns(fired[0]));

        feed.stop(&mut scheduler);
        assert!(!feed.is_running());
        assert_eq!(scheduler.active(), 0);
        assert!(scheduler.poll(Instant::from_millis(5000)).is_empty());
    }

    #[test]
    fn test_feed_drives_chart_through_scheduler() {
        use crate::chart::{ChartConfig, TickerChart};
        use crate::framebuffer::FrameBuffer;
        use embedded_graphics::prelude::Size;

        let config = ChartConfig::default();
        let mut surface = FrameBuffer::new(Size::new(600, 400), config.background);
        let mut chart = TickerChart::new(config);
        let mut scheduler = IntervalScheduler::<1>::new();
        let mut feed = TickerFeed::new(scripted(&[10.0, 12.0, 9.0]));

        chart.push(&mut surface, feed.initial_sample()).unwrap();
        feed.start(&mut scheduler, Instant::from_millis(0), Duration::from_secs(1))
            .unwrap();

        for second in 1..=3 {
            for handle in scheduler.poll(Instant::from_secs(second)) {
                if feed.owns(handle) {
                    chart.push(&mut surface, feed.next_sample()).unwrap();
                }
            }
        }

        assert_eq!(chart.last_sample(), Some(Sample::new(3, 9.0)));
    }
}
