//! Hardware-independent core library for tickerchart
//!
//! This crate contains all platform-agnostic logic for the scrolling price
//! ticker: the pixel surface, the incremental chart renderer, the price label,
//! and the interval scheduler that drives sample production.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets and desktop hosts (for the simulator and tests).

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod chart;
pub mod feed;
pub mod framebuffer;
pub mod label;
pub mod sample;
pub mod scheduler;
pub mod surface;

pub use chart::{ChartConfig, ChartError, ChartResult, ScrollingChartRenderer, TickerChart};
pub use framebuffer::FrameBuffer;
pub use sample::{Sample, Trend};
pub use surface::Surface;
