//! Incremental scrolling line chart
//!
//! Draws a live numeric series one sample at a time onto a [`Surface`]. Each
//! new sample adds a line segment from the previous point plus a dot at the
//! new point, colored by the trend between the two. Once a point would land
//! past the right edge, the already-painted pixels are shifted left and the
//! point is drawn at the right edge instead.
//!
//! Nothing but the two most recent samples is kept in memory; the history
//! lives only as pixels on the surface.
//!
//! # Examples
//!
//! ```ignore
//! use ticker_core::{ChartConfig, FrameBuffer, Sample, TickerChart};
//! use embedded_graphics::prelude::*;
//!
//! let config = ChartConfig::default();
//! let mut surface = FrameBuffer::new(Size::new(600, 400), config.background);
//! let mut chart = TickerChart::new(config);
//!
//! chart.push(&mut surface, Sample::new(0, 10.0))?;
//! chart.push(&mut surface, Sample::new(1, 12.0))?;
//! ```
//!
//! [`Surface`]: crate::surface::Surface

use thiserror_no_std::Error;

mod config;
pub mod constants;
mod renderer;
mod state;

pub use config::{ChartConfig, TrendColors};
pub use renderer::{DrawPlan, RenderOutcome, ScrollingChartRenderer};
pub use state::{RenderState, TickerChart};

/// Why a sample was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SampleFault {
    /// Value is NaN or infinite
    #[error("value is not finite")]
    NonFiniteValue,

    /// Tick is smaller than the tick of the sample before it
    #[error("tick went backwards (previous tick: {previous})")]
    TickRegressed {
        /// Tick of the preceding sample
        previous: u32,
    },
}

/// Error types for chart operations
#[derive(Debug, Error)]
pub enum ChartError {
    /// Sample cannot be drawn
    #[error("Invalid sample at tick {tick}: {fault}")]
    InvalidSample {
        /// Tick of the offending sample
        tick: u32,
        /// What is wrong with it
        fault: SampleFault,
    },

    /// Surface has no drawable area
    #[error("Surface unavailable ({width}x{height})")]
    SurfaceUnavailable {
        /// Surface width in pixels
        width: u32,
        /// Surface height in pixels
        height: u32,
    },

    /// Configuration value out of range
    #[error("Invalid chart configuration: {param}")]
    InvalidConfig {
        /// Parameter description
        param: &'static str,
    },

    /// The draw target reported an error
    #[error("Drawing to the surface failed")]
    DrawFailed,
}

/// Result type for chart operations
pub type ChartResult<T> = Result<T, ChartError>;
