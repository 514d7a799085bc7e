//! Data models, parsers and the aggregation pipeline.
//!
//! This module turns raw config and log text into typed records and derives
//! everything the dashboard displays from them. Nothing here touches the
//! terminal.
//!
//! ## Submodules
//!
//! - [`kinds`]: [`SensorType`], [`SampleType`] and [`HealthStatus`]
//! - [`config`]: threshold configuration parsing, editing and generation
//! - [`samples`]: sensor log parsing
//! - [`aggregate`]: filtering, series grouping, histogram and statistics
//! - [`duration`]: refresh-interval parsing and time formatting
//!
//! ## Data Flow
//!
//! ```text
//! config text ──▶ parse_config() ──▶ ConfigSet ─────────┐
//!                                                       ▼
//! log text ─────▶ parse_samples() ─▶ Vec<SensorSample> ─▶ Dashboard::build(filter)
//!                                                       │
//!                                                       ├──▶ Series (chart lines)
//!                                                       ├──▶ HealthHistogram
//!                                                       └──▶ Statistics
//! ```

pub mod aggregate;
pub mod config;
pub mod duration;
pub mod kinds;
mod lines;
pub mod samples;

pub use aggregate::{
    group_series, Dashboard, Distribution, HealthHistogram, SampleFilter, Series, Statistics,
};
pub use config::{
    parse_config, render_config, ConfigSet, FieldValue, ThresholdConfig, ThresholdField,
};
pub use kinds::{HealthStatus, SampleType, SensorType};
pub use samples::{parse_samples, SensorSample};
