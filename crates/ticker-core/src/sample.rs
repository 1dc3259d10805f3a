//! Ticker samples and the trend between consecutive samples

use core::cmp::Ordering;

use crate::chart::{ChartError, ChartResult, SampleFault};

/// One observed price at a discrete time step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Time step index, non-decreasing across a series
    pub tick: u32,
    /// Observed value
    pub value: f32,
}

impl Sample {
    /// Create a new sample
    pub const fn new(tick: u32, value: f32) -> Self {
        Self { tick, value }
    }

    /// Reject values that cannot be mapped to a pixel row.
    pub fn validate(&self) -> ChartResult<()> {
        if self.value.is_finite() {
            Ok(())
        } else {
            Err(ChartError::InvalidSample {
                tick: self.tick,
                fault: SampleFault::NonFiniteValue,
            })
        }
    }

    /// Validate `self` as the successor of `previous`.
    pub fn validate_after(&self, previous: &Sample) -> ChartResult<()> {
        previous.validate()?;
        self.validate()?;
        if self.tick < previous.tick {
            return Err(ChartError::InvalidSample {
                tick: self.tick,
                fault: SampleFault::TickRegressed {
                    previous: previous.tick,
                },
            });
        }
        Ok(())
    }
}

/// Direction of change between two consecutive values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Value went up
    Up,
    /// Value went down
    Down,
    /// Value unchanged
    Neutral,
}

impl Trend {
    /// Trend from `previous` to `current`.
    ///
    /// Incomparable values (NaN) count as unchanged.
    pub fn between(previous: f32, current: f32) -> Self {
        match previous.partial_cmp(&current) {
            Some(Ordering::Less) => Trend::Up,
            Some(Ordering::Greater) => Trend::Down,
            Some(Ordering::Equal) | None => Trend::Neutral,
        }
    }
}
