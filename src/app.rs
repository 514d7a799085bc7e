//! Application state and navigation logic.
//!
//! [`App`] is the one session object: it owns the threshold collection, the
//! sample collection, the filter selection, the computed [`Dashboard`] and
//! the config editor state. Every user action is a method here.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{info, warn};

use crate::data::{
    parse_samples, ConfigSet, Dashboard, FieldValue, SampleFilter, SensorSample, ThresholdField,
};
use crate::error::DashboardError;
use crate::source::DataSource;
use crate::ui::Theme;

/// How long a status message stays visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Readings over time, one line per sensor/sample pair, plus statistics.
    Chart,
    /// Distribution of health statuses.
    Health,
    /// Threshold configuration editor.
    Config,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Chart => View::Health,
            View::Health => View::Config,
            View::Config => View::Chart,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Chart => View::Config,
            View::Health => View::Chart,
            View::Config => View::Health,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Chart => "Chart",
            View::Health => "Health",
            View::Config => "Config",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Data sources
    data_source: Box<dyn DataSource>,
    config_source: Option<Box<dyn DataSource>>,

    // Collections
    pub configs: ConfigSet,
    pub samples: Vec<SensorSample>,
    /// True once the data source has delivered at least once.
    pub loaded: bool,
    pub load_error: Option<String>,
    pub last_updated: Option<Instant>,

    /// Filter selectors as currently chosen; applied with [`App::apply_filters`].
    pub filter: SampleFilter,
    /// Everything derived from the samples for the applied filter.
    pub dashboard: Dashboard,

    // Config editor
    pub selected_config_index: usize,
    pub selected_field: ThresholdField,
    /// Text being typed into a threshold cell, if editing.
    pub edit_buffer: Option<String>,

    // Output paths
    pub config_output: PathBuf,
    pub export_path: PathBuf,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading samples from `data_source`.
    pub fn new(data_source: Box<dyn DataSource>, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Chart,
            show_help: false,
            data_source,
            config_source: None,
            configs: ConfigSet::default(),
            samples: Vec::new(),
            loaded: false,
            load_error: None,
            last_updated: None,
            filter: SampleFilter::all(),
            dashboard: Dashboard::default(),
            selected_config_index: 0,
            selected_field: ThresholdField::SensorType,
            edit_buffer: None,
            config_output: PathBuf::from("config.txt"),
            export_path: PathBuf::from("trailwatch_export.json"),
            theme,
            status_message: None,
        }
    }

    /// Read the threshold configuration from `source`.
    pub fn with_config_source(mut self, source: Box<dyn DataSource>) -> Self {
        self.config_source = Some(source);
        self
    }

    /// Start with `configs` loaded (replaced if a config source delivers).
    pub fn with_configs(mut self, configs: ConfigSet) -> Self {
        self.configs = configs;
        self
    }

    /// Start with the given filter selection.
    pub fn with_filter(mut self, filter: SampleFilter) -> Self {
        self.filter = filter;
        self.dashboard.filter = filter;
        self
    }

    /// Set where the config file and the export are written.
    pub fn with_output_paths(mut self, config_output: PathBuf, export_path: PathBuf) -> Self {
        self.config_output = config_output;
        self.export_path = export_path;
        self
    }

    /// Returns a description of the sample data source.
    pub fn source_description(&self) -> &str {
        self.data_source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Poll both sources for new content.
    ///
    /// A delivery replaces the matching collection as a whole and rebuilds
    /// the dashboard with the current filter selection. Read failures are
    /// shown as a status message and leave the previous data in place.
    ///
    /// Returns Ok(true) if anything new was received.
    pub fn reload_data(&mut self) -> Result<bool> {
        let mut changed = false;

        let config_text = self.config_source.as_mut().and_then(|s| s.poll());
        if let Some(text) = config_text {
            self.configs = ConfigSet::parse(&text);
            self.clamp_config_selection();
            info!(rows = self.configs.len(), "Loaded threshold configuration");
            self.set_status_message(format!("Loaded {} threshold rows", self.configs.len()));
            changed = true;
        }

        if let Some(text) = self.data_source.poll() {
            self.samples = parse_samples(&text);
            self.loaded = true;
            self.last_updated = Some(Instant::now());
            info!(samples = self.samples.len(), "Loaded sensor samples");
            self.set_status_message(format!("Loaded {} samples", self.samples.len()));
            changed = true;
        }

        let error = self
            .data_source
            .error()
            .or_else(|| self.config_source.as_ref().and_then(|s| s.error()))
            .map(str::to_string);
        if error.is_some() && error != self.load_error {
            warn!(error = ?error, "Source error");
            if let Some(ref e) = error {
                self.set_status_message(e.clone());
            }
        }
        self.load_error = error;

        if changed {
            self.dashboard = Dashboard::build(&self.samples, &self.configs, self.filter);
        }
        Ok(changed)
    }

    /// Recompute the dashboard from the current filter selection.
    pub fn apply_filters(&mut self) {
        self.dashboard = Dashboard::build(&self.samples, &self.configs, self.filter);
        self.set_status_message(format!("Filter: {}", self.filter.describe()));
    }

    /// Reset both selectors to "all" and recompute.
    pub fn clear_filters(&mut self) {
        self.filter = SampleFilter::all();
        self.apply_filters();
    }

    /// True when the selectors differ from what the dashboard shows.
    pub fn filter_pending(&self) -> bool {
        self.filter != self.dashboard.filter
    }

    pub fn cycle_sensor_filter(&mut self, forward: bool) {
        self.filter.cycle_sensor(forward);
    }

    pub fn cycle_sample_filter(&mut self, forward: bool) {
        self.filter.cycle_sample(forward);
    }

    /// Switch to the next view (cycles through Chart → Health → Config).
    pub fn next_view(&mut self) {
        self.cancel_edit();
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.cancel_edit();
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.cancel_edit();
        self.current_view = view;
    }

    /// Move the config row selection down by n rows.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.configs.len().saturating_sub(1);
        self.selected_config_index = (self.selected_config_index + n).min(max);
    }

    /// Move the config row selection up by n rows.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_config_index = self.selected_config_index.saturating_sub(n);
    }

    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    pub fn select_first(&mut self) {
        self.selected_config_index = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_config_index = self.configs.len().saturating_sub(1);
    }

    pub fn select_next_field(&mut self) {
        self.selected_field = self.selected_field.next();
    }

    pub fn select_prev_field(&mut self) {
        self.selected_field = self.selected_field.prev();
    }

    fn clamp_config_selection(&mut self) {
        if self.selected_config_index >= self.configs.len() {
            self.selected_config_index = self.configs.len().saturating_sub(1);
        }
    }

    /// Append a default threshold row and select it.
    pub fn add_config(&mut self) {
        self.cancel_edit();
        self.selected_config_index = self.configs.push_default();
        self.selected_field = ThresholdField::SensorType;
        self.refresh_dashboard();
    }

    /// Remove the selected threshold row.
    pub fn remove_config(&mut self) {
        self.cancel_edit();
        if self.configs.remove(self.selected_config_index).is_some() {
            self.clamp_config_selection();
            self.refresh_dashboard();
        }
    }

    /// Start editing the selected cell.
    ///
    /// Threshold cells open a text buffer; sensor and sample cells cycle to
    /// the next kind immediately.
    pub fn begin_edit(&mut self) {
        if self.configs.is_empty() {
            return;
        }
        if self.selected_field.threshold_index().is_some() {
            self.edit_buffer = Some(String::new());
        } else {
            self.cycle_selected_field(true);
        }
    }

    /// Step the selected sensor/sample cell forwards or backwards.
    pub fn cycle_selected_field(&mut self, forward: bool) {
        let field = self.selected_field;
        if let Some(config) = self.configs.get_mut(self.selected_config_index) {
            config.cycle(field, forward);
            self.refresh_dashboard();
        }
    }

    pub fn is_editing(&self) -> bool {
        self.edit_buffer.is_some()
    }

    pub fn edit_push(&mut self, c: char) {
        if let Some(buffer) = self.edit_buffer.as_mut() {
            buffer.push(c);
        }
    }

    pub fn edit_pop(&mut self) {
        if let Some(buffer) = self.edit_buffer.as_mut() {
            buffer.pop();
        }
    }

    /// Store the typed value. Text that is not a number is stored as NaN,
    /// which [`App::save_config`] later refuses.
    pub fn commit_edit(&mut self) {
        let Some(buffer) = self.edit_buffer.take() else {
            return;
        };
        let value = buffer.trim().parse::<f64>().unwrap_or(f64::NAN);
        let field = self.selected_field;
        if let Some(config) = self.configs.get_mut(self.selected_config_index) {
            config.set(field, FieldValue::Number(value));
            self.refresh_dashboard();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit_buffer = None;
    }

    /// Validate the threshold collection.
    ///
    /// Nothing changes on failure; the reason is shown as a status message.
    pub fn save_config(&mut self) -> Result<(), DashboardError> {
        match self.configs.validate() {
            Ok(()) => {
                info!(rows = self.configs.len(), "Configuration validated");
                self.set_status_message("Configuration saved".to_string());
                Ok(())
            }
            Err(e) => {
                self.set_status_message(format!("Save refused: {}", e));
                Err(e)
            }
        }
    }

    /// Write the threshold collection in config file format.
    pub fn write_config(&self, path: &Path) -> Result<(), DashboardError> {
        std::fs::write(path, self.configs.render())?;
        info!(path = %path.display(), rows = self.configs.len(), "Wrote configuration");
        Ok(())
    }

    /// Write the configuration to [`App::config_output`] and report the outcome.
    pub fn download_config(&mut self) {
        let path = self.config_output.clone();
        match self.write_config(&path) {
            Ok(()) => self.set_status_message(format!("Wrote {}", path.display())),
            Err(e) => self.set_status_message(format!("Write failed: {}", e)),
        }
    }

    /// Recompute derived data that depends on thresholds, keeping the
    /// applied filter.
    fn refresh_dashboard(&mut self) {
        self.dashboard = Dashboard::build(&self.samples, &self.configs, self.dashboard.filter);
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current dashboard to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        if !self.loaded {
            return Err(DashboardError::NoData.into());
        }
        self.dashboard.write_export(path)?;
        info!(path = %path.display(), "Exported dashboard");
        Ok(())
    }
}
