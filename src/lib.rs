// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # trailwatch
//!
//! A terminal dashboard and library for wearable sensor logs.
//!
//! A wearable device records readings (SpO2, heart rate, temperature,
//! acceleration, GPS fields) and tags each with a health status computed
//! from per-sensor thresholds. This crate parses the threshold configuration
//! and the sample log, filters samples by sensor and sample kind, and shows
//! time series, a health distribution and summary statistics in an
//! interactive terminal UI. Thresholds can be edited and written back in the
//! device's config format.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(parsing, │    │(render) │    │         │ │
//! │  └────┬────┘    │ stats)   │    └─────────┘    └─────────┘ │
//! │       │         └──────────┘                                │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── FileSource | StreamSource | ChannelSource  │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Session state: collections, filter selection, config editor
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) for files,
//!   async streams and channels
//! - **[`data`]**: Config and log parsers, filtering, grouping and statistics
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`settings`]**: Layered settings from a TOML file and the environment
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a log file with thresholds from config.txt
//! trailwatch --config-file config.txt --data samples.log
//!
//! # Read a log from a TCP bridge
//! trailwatch --connect localhost:9090
//!
//! # Only heart rate, exported as JSON without the UI
//! trailwatch -d samples.log --sample heart_rate --export out.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use trailwatch::{parse_samples, ConfigSet, Dashboard, SampleFilter, SensorType};
//!
//! let samples = parse_samples("1,8,8370,1.008798,4\n0,1,13208,65.0,1\n");
//! let filter = SampleFilter::new(Some(SensorType::Accelerometer), None);
//! let dashboard = Dashboard::build(&samples, &ConfigSet::demo(), filter);
//!
//! assert_eq!(dashboard.stats.count, 1);
//! assert_eq!(dashboard.series.len(), 1);
//! ```
//!
//! ### With a channel source
//!
//! ```
//! use trailwatch::{App, ChannelSource, Theme};
//!
//! let (tx, source) = ChannelSource::create("device bridge");
//! let mut app = App::new(Box::new(source), Theme::dark());
//!
//! tx.send("0,0,13199,86.511078,0\n".to_string()).unwrap();
//! app.reload_data().unwrap();
//! assert_eq!(app.samples.len(), 1);
//! ```

pub mod app;
pub mod data;
pub mod error;
pub mod events;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use data::{
    parse_config, parse_samples, render_config, ConfigSet, Dashboard, Distribution, HealthStatus,
    SampleFilter, SampleType, SensorSample, SensorType, Statistics, ThresholdConfig,
};
pub use error::DashboardError;
pub use settings::{Settings, ThemeMode};
pub use source::{ChannelSource, DataSource, FileSource, StreamSource};
pub use ui::Theme;
