use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Typing into a threshold cell takes every key
    if app.is_editing() {
        handle_edit_input(app, key);
        return;
    }

    if app.current_view == View::Config && handle_config_key(app, key) {
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),

        // Direct view access
        KeyCode::Char('1') => app.set_view(View::Chart),
        KeyCode::Char('2') => app.set_view(View::Health),
        KeyCode::Char('3') => app.set_view(View::Config),

        // Filter selectors
        KeyCode::Char('s') => app.cycle_sensor_filter(true),
        KeyCode::Char('S') => app.cycle_sensor_filter(false),
        KeyCode::Char('t') => app.cycle_sample_filter(true),
        KeyCode::Char('T') => app.cycle_sample_filter(false),
        KeyCode::Char('a') => app.apply_filters(),
        KeyCode::Char('c') => app.clear_filters(),

        // Reload
        KeyCode::Char('r') => {
            let _ = app.reload_data();
        }

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let export_path = app.export_path.clone();
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Keys specific to the config editor. Returns false for keys it leaves to
/// the global handler.
fn handle_config_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        KeyCode::Left | KeyCode::Char('h') => app.select_prev_field(),
        KeyCode::Right | KeyCode::Char('l') => app.select_next_field(),
        KeyCode::Enter => app.begin_edit(),
        KeyCode::Char('+') => app.cycle_selected_field(true),
        KeyCode::Char('-') => app.cycle_selected_field(false),
        KeyCode::Char('n') => app.add_config(),
        KeyCode::Char('x') | KeyCode::Delete => app.remove_config(),
        KeyCode::Char('w') => {
            // Outcome is reported through the status bar
            let _ = app.save_config();
        }
        KeyCode::Char('d') => app.download_config(),
        _ => return false,
    }
    true
}

/// Handle key input while a threshold is being typed
fn handle_edit_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_edit(),
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Backspace => app.edit_pop(),
        KeyCode::Char(c) => app.edit_push(c),
        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        // Scroll wheel moves the config row selection
        MouseEventKind::ScrollUp if app.current_view == View::Config => app.select_prev(),
        MouseEventKind::ScrollDown if app.current_view == View::Config => app.select_next(),

        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Rows below the table header select a config row
            if app.current_view == View::Config && clicked_row > content_start_row {
                let item_row = (clicked_row - content_start_row - 1) as usize;
                if item_row < app.configs.len() {
                    app.selected_config_index = item_row;
                }
            }

            // Check for tab clicks (row 1, after header)
            if clicked_row == 1 {
                let col = mouse.column;
                // Approximate tab positions: Chart (0-11), Health (12-24), Config (25-36)
                if col < 12 {
                    app.set_view(View::Chart);
                } else if col < 25 {
                    app.set_view(View::Health);
                } else if col < 37 {
                    app.set_view(View::Config);
                }
            }
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::samples::demo_log;
    use crate::data::{ConfigSet, SensorType, ThresholdField};
    use crate::source::ChannelSource;
    use crate::ui::Theme;

    fn demo_app() -> App {
        let mut app = App::new(Box::new(ChannelSource::from_text(demo_log(), "demo")), Theme::dark())
            .with_configs(ConfigSet::demo());
        app.reload_data().unwrap();
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_view_switching() {
        let mut app = demo_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_view, View::Health);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_view, View::Config);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.current_view, View::Health);
    }

    #[test]
    fn test_filter_keys() {
        let mut app = demo_app();
        type_str(&mut app, "ss");
        assert_eq!(app.filter.sensor_type, Some(SensorType::Accelerometer));
        assert_eq!(app.dashboard.samples.len(), 6);

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.dashboard.samples.len(), 3);

        press(&mut app, KeyCode::Char('c'));
        assert!(app.filter.is_all());
        assert_eq!(app.dashboard.samples.len(), 6);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = demo_app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(app.running);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn test_config_editing_keys() {
        let mut app = demo_app();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.selected_config_index, 1);
        assert_eq!(app.selected_field, ThresholdField::Threshold1);

        press(&mut app, KeyCode::Enter);
        // 'q' while editing is text, not quit
        type_str(&mut app, "5q");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        assert!(app.running);
        assert_eq!(app.configs.rows()[1].thresholds[0], 5.0);

        // Left/right move between fields in the config view, not views
        press(&mut app, KeyCode::Left);
        assert_eq!(app.current_view, View::Config);
        assert_eq!(app.selected_field, ThresholdField::SampleType);
    }

    #[test]
    fn test_config_add_remove_keys() {
        let mut app = demo_app();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.configs.len(), 5);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.configs.len(), 4);
        press(&mut app, KeyCode::Char('w'));
        assert_eq!(app.get_status_message(), Some("Configuration saved"));
    }

    #[test]
    fn test_esc_cancels_edit() {
        let mut app = demo_app();
        press(&mut app, KeyCode::Char('3'));
        app.selected_field = ThresholdField::Threshold2;
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "12");
        press(&mut app, KeyCode::Esc);
        assert!(!app.is_editing());
        assert_eq!(app.configs.rows()[0].thresholds[1], 90.0);
    }

    #[test]
    fn test_tab_click() {
        let mut app = demo_app();
        let click = |column| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row: 1,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut app, click(30), 3);
        assert_eq!(app.current_view, View::Config);
        handle_mouse_event(&mut app, click(15), 3);
        assert_eq!(app.current_view, View::Health);
    }
}
