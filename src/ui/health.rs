//! Health view rendering.
//!
//! Shows how the filtered samples distribute over the health statuses as a
//! bar chart, with counts and percentages underneath. An empty selection
//! gets a placeholder instead of an empty chart.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::Distribution;

/// Render the Health view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Health Status: {} ", app.dashboard.filter.describe()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let counts = match app.dashboard.distribution() {
        Distribution::NoData => {
            let placeholder = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No data",
                    Style::default().fg(app.theme.placeholder).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Nothing matches the current filter",
                    Style::default().fg(app.theme.placeholder),
                )),
            ])
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(placeholder, area);
            return;
        }
        Distribution::Counts(counts) => counts,
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let legend_height = counts.len() as u16 + 1;
    let [bars_area, legend_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(legend_height)]).areas(inner);

    let bars: Vec<Bar> = counts
        .iter()
        .map(|(status, count)| {
            let style = app.theme.status_style(*status);
            Bar::default()
                .value(*count)
                .label(Line::from(status.symbol()))
                .style(style)
                .value_style(style.add_modifier(Modifier::REVERSED))
        })
        .collect();

    let bar_width = bar_width(bars_area.width, bars.len());
    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(2);
    frame.render_widget(chart, bars_area);

    let total: u64 = counts.iter().map(|(_, c)| c).sum();
    let mut legend = vec![Line::from("")];
    for (status, count) in &counts {
        let percent = *count as f64 * 100.0 / total as f64;
        legend.push(Line::from(vec![
            Span::styled(format!(" {:<15}", status.name()), app.theme.status_style(*status)),
            Span::raw(format!("{:>6}  {:>5.1}%", count, percent)),
        ]));
    }
    frame.render_widget(Paragraph::new(legend), legend_area);
}

/// Share the width between bars, keeping them between 3 and 12 cells.
fn bar_width(available: u16, bars: usize) -> u16 {
    if bars == 0 {
        return 3;
    }
    let per_bar = available / bars as u16;
    per_bar.saturating_sub(2).clamp(3, 12)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::samples::demo_log;
    use crate::data::{ConfigSet, SampleFilter, SensorType};
    use crate::source::ChannelSource;
    use crate::ui::Theme;
    use ratatui::{backend::TestBackend, Terminal};

    fn demo_app() -> App {
        let mut app = App::new(Box::new(ChannelSource::from_text(demo_log(), "demo")), Theme::dark())
            .with_configs(ConfigSet::demo());
        app.reload_data().unwrap();
        app
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(frame, app, frame.area())).unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_renders_counts_in_status_order() {
        let text = draw(&demo_app());
        let xlo = text.find("EXTREMELY LOW").unwrap();
        let lo = text.find("│ LOW").unwrap();
        let xhi = text.find("EXTREMELY HIGH").unwrap();
        assert!(xlo < lo && lo < xhi);
        assert!(text.contains("50.0%"));
    }

    #[test]
    fn test_no_data_placeholder() {
        let mut app = demo_app().with_filter(SampleFilter::new(Some(SensorType::Gps), None));
        app.apply_filters();
        let text = draw(&app);
        assert!(text.contains("No data"));
        assert!(!text.contains("EXTREMELY"));
    }

    #[test]
    fn test_bar_width_bounds() {
        assert_eq!(bar_width(100, 1), 12);
        assert_eq!(bar_width(10, 5), 3);
        assert_eq!(bar_width(40, 4), 8);
    }
}
