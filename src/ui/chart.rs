//! Chart view rendering.
//!
//! A line chart of readings over time, one dataset per sensor/sample pair,
//! next to a panel with the descriptive statistics of the filtered set.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::duration::{format_minutes, format_timestamp};
use crate::data::Dashboard;

/// Width of the statistics panel.
const STATS_WIDTH: u16 = 28;

/// Render the Chart view: time series on the left, statistics on the right.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [chart_area, stats_area] =
        Layout::horizontal([Constraint::Min(20), Constraint::Length(STATS_WIDTH)]).areas(area);

    render_chart(frame, app, chart_area);
    render_stats(frame, app, stats_area);
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let dashboard = &app.dashboard;
    let block = Block::default()
        .title(format!(" Readings: {} ", dashboard.filter.describe()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let (Some((first, last)), Some((low, high))) = (dashboard.time_bounds(), value_bounds(dashboard))
    else {
        let message = if dashboard.is_empty() {
            "No samples match the current filter"
        } else {
            "No plottable readings (all values are NaN)"
        };
        let placeholder = Paragraph::new(message)
            .style(Style::default().fg(app.theme.placeholder))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    // NaN readings have no position on the chart
    let points: Vec<Vec<(f64, f64)>> = dashboard
        .series
        .iter()
        .map(|s| s.points().into_iter().filter(|(_, y)| y.is_finite()).collect())
        .collect();

    let datasets: Vec<Dataset> = dashboard
        .series
        .iter()
        .zip(&points)
        .enumerate()
        .map(|(i, (series, data))| {
            Dataset::default()
                .name(series.label())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(app.theme.series_color(i)))
                .data(data)
        })
        .collect();

    let (x_min, x_max) = if first == last {
        (first as f64 - 1000.0, last as f64 + 1000.0)
    } else {
        (first as f64, last as f64)
    };
    let x_labels = vec![
        Span::raw(format_timestamp(x_min as i64)),
        Span::raw(format_timestamp(((x_min + x_max) / 2.0) as i64)),
        Span::raw(format_timestamp(x_max as i64)),
    ];
    let y_labels = vec![
        Span::raw(format!("{:.2}", low)),
        Span::raw(format!("{:.2}", (low + high) / 2.0)),
        Span::raw(format!("{:.2}", high)),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Time")
                .style(Style::default().fg(app.theme.border))
                .bounds([x_min, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Value")
                .style(Style::default().fg(app.theme.border))
                .bounds([low, high])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

/// Padded y-axis range over the finite readings.
fn value_bounds(dashboard: &Dashboard) -> Option<(f64, f64)> {
    let finite = dashboard.samples.iter().map(|s| s.data).filter(|v| v.is_finite());
    let (min, max) = finite.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        None => Some((v, v)),
    })?;
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
    Some((min - pad, max + pad))
}

fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let stats = &app.dashboard.stats;
    let label = |text: &'static str| Span::styled(text, Style::default().add_modifier(Modifier::BOLD));

    let mut lines = vec![
        Line::from(vec![label("Samples   "), Span::raw(format!("{}", stats.count))]),
        Line::from(vec![label("Mean      "), Span::raw(format!("{:.2}", stats.mean))]),
        Line::from(vec![label("Min       "), Span::raw(format!("{:.2}", stats.min))]),
        Line::from(vec![label("Max       "), Span::raw(format!("{:.2}", stats.max))]),
        Line::from(vec![label("Std Dev   "), Span::raw(format!("{:.2}", stats.std_dev))]),
        Line::from(vec![
            label("Period    "),
            Span::raw(format_minutes(stats.duration_minutes)),
        ]),
        Line::from(""),
    ];

    let mismatches = app.dashboard.mismatches;
    let mismatch_style = if mismatches > 0 {
        Style::default().fg(app.theme.low)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    lines.push(Line::from(vec![
        label("Mismatch  "),
        Span::styled(format!("{}", mismatches), mismatch_style),
    ]));

    if !app.dashboard.series.is_empty() {
        lines.push(Line::from(""));
        for (i, series) in app.dashboard.series.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled("━ ", Style::default().fg(app.theme.series_color(i))),
                Span::raw(format!("{} ({})", series.sample_type.label(), series.samples.len())),
            ]));
        }
    }

    let block = Block::default()
        .title(" Statistics ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
