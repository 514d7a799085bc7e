//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::HealthStatus;

/// Render the header bar with a sample and health overview.
///
/// Displays: worst status indicator, sample counts, per-status counts and
/// the applied filter (marked when the selectors differ from it).
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    if !app.loaded {
        let line = Line::from(vec![
            Span::styled(" TRAILWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let dashboard = &app.dashboard;
    let indicator = match dashboard.health.worst() {
        Some(status) => Span::styled(" ● ", app.theme.status_style(status)),
        None => Span::styled(" ○ ", Style::default().add_modifier(Modifier::DIM)),
    };

    let mut spans = vec![
        indicator,
        Span::styled("TRAILWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            format!("{}", dashboard.samples.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("/{} samples │", dashboard.total_samples)),
    ];

    for status in HealthStatus::ALL {
        let count = dashboard.health.get(status);
        spans.push(Span::raw(" "));
        if count > 0 {
            spans.push(Span::styled(format!("{}", count), app.theme.status_style(status)));
        } else {
            spans.push(Span::styled("0", Style::default().add_modifier(Modifier::DIM)));
        }
        spans.push(Span::raw(format!(" {}", status.symbol())));
    }

    spans.push(Span::raw(format!(" │ {}", dashboard.filter.describe())));
    if app.filter_pending() {
        spans.push(Span::styled(
            format!(" → {} (a:apply)", app.filter.describe()),
            Style::default().fg(app.theme.highlight),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Chart "),
        Line::from(" 2:Health "),
        Line::from(" 3:Config "),
    ];

    let selected = match app.current_view {
        View::Chart => 0,
        View::Health => 1,
        View::Config => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: source, time since last update, available controls.
/// Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.current_view {
        View::Chart | View::Health => "s/t:filter a:apply c:clear Tab:switch ?:help q:quit",
        View::Config if app.is_editing() => "Type a number | Enter:store Esc:cancel",
        View::Config => "↑↓←→:move Enter:edit n:new x:remove w:save d:download ?:help",
    };

    let status = if let Some(ref err) = app.load_error {
        format!(" Error: {} | q:quit r:retry", err)
    } else if let Some(updated) = app.last_updated {
        format!(
            " {} | {} | Updated {:.1}s ago | {}",
            app.current_view.label(),
            app.source_description(),
            updated.elapsed().as_secs_f64(),
            controls,
        )
    } else {
        format!(" Loading {} | q:quit", app.source_description())
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(title, Style::default().add_modifier(Modifier::BOLD))])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  Tab/1-3     Switch views"),
        Line::from("  ↑/↓ j/k     Select config row"),
        Line::from("  ←/→ h/l     Select config field"),
        Line::from(""),
        section(" Filter"),
        Line::from("  s/S       Cycle sensor type"),
        Line::from("  t/T       Cycle sample type"),
        Line::from("  a         Apply filters"),
        Line::from("  c         Clear filters"),
        Line::from(""),
        section(" Config"),
        Line::from("  Enter     Edit cell"),
        Line::from("  +/-       Cycle sensor/sample"),
        Line::from("  n / x     Add / remove row"),
        Line::from("  w         Save (validate)"),
        Line::from("  d         Download config file"),
        Line::from(""),
        section(" General"),
        Line::from("  r         Reload data"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 29u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
