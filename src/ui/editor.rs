//! Config view rendering.
//!
//! A table of threshold rows with one selected cell. While a threshold is
//! being typed, the cell shows the edit buffer with a cursor.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::ThresholdField;

/// Render the Config view showing the threshold collection.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(title(app))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if app.configs.is_empty() {
        let placeholder = Paragraph::new(" No threshold rows. Press n to add one.")
            .style(Style::default().fg(app.theme.placeholder))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let header = Row::new(ThresholdField::ALL.iter().map(|f| Cell::from(f.label())))
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = app
        .configs
        .rows()
        .iter()
        .enumerate()
        .map(|(index, config)| {
            let cells = ThresholdField::ALL.iter().map(|field| {
                let selected = index == app.selected_config_index && *field == app.selected_field;
                match (&app.edit_buffer, selected) {
                    (Some(buffer), true) => Cell::from(format!("{}_", buffer)).style(app.theme.editing),
                    (None, true) => Cell::from(config.display(*field))
                        .style(Style::default().add_modifier(Modifier::REVERSED)),
                    _ => {
                        let text = config.display(*field);
                        if field.threshold_index().is_some() && text == "NaN" {
                            Cell::from(text).style(Style::default().fg(app.theme.extremely_low))
                        } else {
                            Cell::from(text)
                        }
                    }
                }
            });
            Row::new(cells)
        })
        .collect();

    let widths = [
        Constraint::Length(14), // Sensor
        Constraint::Length(12), // Sample
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(app.selected_config_index.min(app.configs.len().saturating_sub(1))));

    frame.render_stateful_widget(table, area, &mut state);
}

fn title(app: &App) -> String {
    let position = if app.configs.is_empty() {
        String::new()
    } else {
        format!(" [{}/{}]", app.selected_config_index + 1, app.configs.len())
    };
    let mode = if app.is_editing() { " editing" } else { "" };
    format!(" Thresholds{}{} ", position, mode)
}
