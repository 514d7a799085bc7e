//! Filtering, grouping and statistics over the sample collection.
//!
//! Everything here is a pure function of the current samples, the threshold
//! collection and a [`SampleFilter`]. [`Dashboard::build`] runs the whole
//! pipeline and produces the payload the UI and the JSON export consume.
//!
//! An empty filtered set is a normal state: statistics are all zero, there
//! are no series, and the health distribution is [`Distribution::NoData`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_json::json;

use super::config::ConfigSet;
use super::duration::{format_timestamp, span_minutes};
use super::kinds::{HealthStatus, SampleType, SensorType};
use super::samples::SensorSample;
use crate::error::DashboardError;

/// Sensor and sample type predicates. `None` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SampleFilter {
    pub sensor_type: Option<SensorType>,
    pub sample_type: Option<SampleType>,
}

impl SampleFilter {
    /// A filter that matches every sample.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(sensor_type: Option<SensorType>, sample_type: Option<SampleType>) -> Self {
        Self {
            sensor_type,
            sample_type,
        }
    }

    pub fn is_all(&self) -> bool {
        self.sensor_type.is_none() && self.sample_type.is_none()
    }

    pub fn matches(&self, sample: &SensorSample) -> bool {
        self.sensor_type.map_or(true, |t| sample.sensor_type == t)
            && self.sample_type.map_or(true, |t| sample.sample_type == t)
    }

    /// The matching subsequence, in original order.
    pub fn apply(&self, samples: &[SensorSample]) -> Vec<SensorSample> {
        samples.iter().filter(|s| self.matches(s)).cloned().collect()
    }

    /// Step the sensor selector: all → each kind in order → all.
    pub fn cycle_sensor(&mut self, forward: bool) {
        self.sensor_type = cycle_option(self.sensor_type, &SensorType::ALL, forward);
    }

    /// Step the sample selector: all → each kind in order → all.
    pub fn cycle_sample(&mut self, forward: bool) {
        self.sample_type = cycle_option(self.sample_type, &SampleType::ALL, forward);
    }

    /// Short description for titles, e.g. `GPS / all samples`.
    pub fn describe(&self) -> String {
        let sensor = self.sensor_type.map_or("all sensors", |t| t.name());
        let sample = self.sample_type.map_or("all samples", |t| t.name());
        format!("{} / {}", sensor, sample)
    }
}

fn cycle_option<T: Copy + PartialEq>(current: Option<T>, all: &[T], forward: bool) -> Option<T> {
    // Position 0 is "all", 1..=len are the kinds.
    let slots = all.len() + 1;
    let pos = current.and_then(|c| all.iter().position(|k| *k == c)).map_or(0, |i| i + 1);
    let next = if forward { (pos + 1) % slots } else { (pos + slots - 1) % slots };
    next.checked_sub(1).map(|i| all[i])
}

/// Samples of one (sensor kind, sample kind) pair, plotted as one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub sensor_type: SensorType,
    pub sample_type: SampleType,
    pub samples: Vec<SensorSample>,
}

impl Series {
    /// Legend label, e.g. `OXIMETER - SPO2`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.sensor_type.name(), self.sample_type.name())
    }

    /// `(timestamp, reading)` points for the time-series chart.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.samples.iter().map(|s| (s.timestamp as f64, s.data)).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.data).collect()
    }
}

/// Group samples by (sensor, sample) pair in order of first appearance.
pub fn group_series(samples: &[SensorSample]) -> Vec<Series> {
    let mut series: Vec<Series> = Vec::new();
    for sample in samples {
        match series
            .iter_mut()
            .find(|s| s.sensor_type == sample.sensor_type && s.sample_type == sample.sample_type)
        {
            Some(group) => group.samples.push(sample.clone()),
            None => series.push(Series {
                sensor_type: sample.sensor_type,
                sample_type: sample.sample_type,
                samples: vec![sample.clone()],
            }),
        }
    }
    series
}

/// Count of samples per health status, in ascending status order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthHistogram {
    counts: BTreeMap<HealthStatus, usize>,
}

impl HealthHistogram {
    pub fn from_samples(samples: &[SensorSample]) -> Self {
        let mut counts = BTreeMap::new();
        for sample in samples {
            *counts.entry(sample.health_status).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Statuses that occur at least once, with their counts.
    pub fn counts(&self) -> Vec<(HealthStatus, usize)> {
        self.counts.iter().map(|(k, v)| (*k, *v)).collect()
    }

    pub fn get(&self, status: HealthStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Most severe status present, by distance from `Normal`. Ties go to the
    /// higher status.
    pub fn worst(&self) -> Option<HealthStatus> {
        self.counts
            .keys()
            .copied()
            .max_by_key(|s| (s.ordinal() - HealthStatus::Normal.ordinal()).abs())
    }
}

/// Descriptive statistics over the readings of a filtered set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation (divides by N).
    pub std_dev: f64,
    /// (last timestamp - first timestamp) in minutes, over min/max timestamps.
    pub duration_minutes: f64,
}

impl Statistics {
    /// Compute over `samples`; all zero when empty. NaN readings propagate.
    pub fn compute(samples: &[SensorSample]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let n = samples.len() as f64;
        let mean = samples.iter().map(|s| s.data).sum::<f64>() / n;
        let variance = samples.iter().map(|s| (s.data - mean).powi(2)).sum::<f64>() / n;
        let min = samples.iter().map(|s| s.data).fold(f64::INFINITY, nan_min);
        let max = samples.iter().map(|s| s.data).fold(f64::NEG_INFINITY, nan_max);

        let first = samples.iter().map(|s| s.timestamp).min().unwrap_or(0);
        let last = samples.iter().map(|s| s.timestamp).max().unwrap_or(0);

        Self {
            count: samples.len(),
            mean,
            min,
            max,
            std_dev: variance.sqrt(),
            duration_minutes: span_minutes(first, last),
        }
    }
}

fn nan_min(acc: f64, v: f64) -> f64 {
    if acc.is_nan() || v.is_nan() {
        f64::NAN
    } else {
        acc.min(v)
    }
}

fn nan_max(acc: f64, v: f64) -> f64 {
    if acc.is_nan() || v.is_nan() {
        f64::NAN
    } else {
        acc.max(v)
    }
}

/// Payload for the health-status distribution chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Distribution {
    /// Nothing matched the filter; render a placeholder, not an empty chart.
    NoData,
    /// `(status, count)` pairs for statuses present.
    Counts(Vec<(HealthStatus, u64)>),
}

/// Everything the dashboard shows for one filter selection.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    /// The filter this dashboard was built with.
    pub filter: SampleFilter,
    /// Samples in the whole collection, before filtering.
    pub total_samples: usize,
    /// Filtered samples in original order.
    pub samples: Vec<SensorSample>,
    pub series: Vec<Series>,
    pub health: HealthHistogram,
    pub stats: Statistics,
    /// Samples whose logged status differs from the configured thresholds.
    pub mismatches: usize,
}

impl Dashboard {
    pub fn build(samples: &[SensorSample], configs: &ConfigSet, filter: SampleFilter) -> Self {
        let filtered = filter.apply(samples);
        let mismatches = count_mismatches(&filtered, configs);
        Self {
            filter,
            total_samples: samples.len(),
            series: group_series(&filtered),
            health: HealthHistogram::from_samples(&filtered),
            stats: Statistics::compute(&filtered),
            samples: filtered,
            mismatches,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Time-axis labels, one per filtered sample.
    pub fn time_labels(&self) -> Vec<String> {
        self.samples.iter().map(|s| format_timestamp(s.timestamp)).collect()
    }

    /// Timestamp range covered by the filtered samples.
    pub fn time_bounds(&self) -> Option<(i64, i64)> {
        let first = self.samples.iter().map(|s| s.timestamp).min()?;
        let last = self.samples.iter().map(|s| s.timestamp).max()?;
        Some((first, last))
    }

    pub fn distribution(&self) -> Distribution {
        if self.is_empty() {
            return Distribution::NoData;
        }
        Distribution::Counts(
            self.health.counts().into_iter().map(|(s, c)| (s, c as u64)).collect(),
        )
    }

    /// JSON document written by the export action.
    pub fn export_json(&self) -> serde_json::Value {
        let health: Vec<serde_json::Value> = self
            .health
            .counts()
            .iter()
            .map(|(status, count)| json!({ "status": status, "count": count }))
            .collect();

        let series: Vec<serde_json::Value> = self
            .series
            .iter()
            .map(|s| {
                json!({
                    "label": s.label(),
                    "points": s.samples.iter().map(|p| json!([p.timestamp, p.data])).collect::<Vec<_>>(),
                })
            })
            .collect();

        json!({
            "filter": self.filter,
            "total_samples": self.total_samples,
            "summary": {
                "count": self.stats.count,
                "mean": self.stats.mean,
                "min": self.stats.min,
                "max": self.stats.max,
                "std_dev": self.stats.std_dev,
                "duration_minutes": self.stats.duration_minutes,
                "mismatches": self.mismatches,
            },
            "labels": self.time_labels(),
            "health": health,
            "series": series,
        })
    }

    /// Write [`Dashboard::export_json`] to `path` as pretty-printed JSON.
    pub fn write_export(&self, path: &Path) -> Result<(), DashboardError> {
        let json = serde_json::to_string_pretty(&self.export_json())?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn count_mismatches(samples: &[SensorSample], configs: &ConfigSet) -> usize {
    samples
        .iter()
        .filter(|s| {
            configs
                .find(s.sensor_type, s.sample_type)
                .is_some_and(|c| c.classify(s.data) != s.health_status)
        })
        .count()
}
