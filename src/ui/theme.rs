//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::HealthStatus;
use crate::settings::ThemeMode;

/// Line colors for chart series, reused in order.
const SERIES_COLORS: [Color; 6] = [
    Color::Rgb(102, 126, 234),
    Color::Rgb(118, 75, 162),
    Color::Rgb(56, 178, 172),
    Color::Rgb(245, 101, 101),
    Color::Rgb(237, 137, 54),
    Color::Rgb(72, 187, 120),
];

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for readings far below normal.
    pub extremely_low: Color,
    pub low: Color,
    pub normal: Color,
    pub high: Color,
    /// Color for readings far above normal.
    pub extremely_high: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Color of the "no data" placeholder.
    pub placeholder: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the cell being edited.
    pub editing: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            extremely_low: Color::Red,
            low: Color::Yellow,
            normal: Color::Green,
            high: Color::LightGreen,
            extremely_high: Color::Gray,
            border: Color::Gray,
            placeholder: Color::DarkGray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            editing: Style::default().fg(Color::Black).bg(Color::Cyan),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            extremely_low: Color::Red,
            low: Color::Rgb(237, 137, 54),
            normal: Color::Green,
            high: Color::Rgb(72, 187, 120),
            extremely_high: Color::DarkGray,
            border: Color::DarkGray,
            placeholder: Color::Gray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            editing: Style::default().fg(Color::White).bg(Color::Blue),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Auto => Self::auto_detect(),
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Color for a health status
    pub fn status_color(&self, status: HealthStatus) -> Color {
        match status {
            HealthStatus::ExtremelyLow => self.extremely_low,
            HealthStatus::Low => self.low,
            HealthStatus::Normal => self.normal,
            HealthStatus::High => self.high,
            HealthStatus::ExtremelyHigh => self.extremely_high,
        }
    }

    /// Get style for a health status
    pub fn status_style(&self, status: HealthStatus) -> Style {
        let style = Style::default().fg(self.status_color(status));
        match status {
            HealthStatus::ExtremelyLow | HealthStatus::ExtremelyHigh => {
                style.add_modifier(Modifier::BOLD)
            }
            _ => style,
        }
    }

    /// Line color for the `index`-th chart series.
    pub fn series_color(&self, index: usize) -> Color {
        SERIES_COLORS[index % SERIES_COLORS.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_colors_cycle() {
        let theme = Theme::dark();
        assert_eq!(theme.series_color(0), theme.series_color(6));
        assert_ne!(theme.series_color(0), theme.series_color(1));
    }

    #[test]
    fn test_status_colors_distinct() {
        let theme = Theme::dark();
        let colors: Vec<Color> = HealthStatus::ALL.iter().map(|s| theme.status_color(*s)).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
