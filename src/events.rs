use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, MouseEvent, MouseEventKind};

use crate::app::{App, View, THRESHOLD_STEP};

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

    match key.code {
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab | KeyCode::BackTab => app.next_view(),
        KeyCode::Char('1') => app.set_view(View::Chart),
        KeyCode::Char('2') => app.set_view(View::Series),

        // Series selection
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Char(' ') => app.toggle_selected(),

        // Chart controls
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_threshold(THRESHOLD_STEP),
        KeyCode::Char('-') => app.adjust_threshold(-THRESHOLD_STEP),
        KeyCode::Char('p') => app.toggle_pause(),
        KeyCode::Char('c') => app.reset(),

        // Poll now
        KeyCode::Char('r') => {
            let accepted = app.reload_data();
            app.set_status_message(format!("Polled {} observation(s)", accepted));
        }

        KeyCode::Char('?') => app.toggle_help(),

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

/// Handle mouse events
///
/// The wheel moves the series selection; clicking the tab row switches views.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, tabs_row: u16) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),
        MouseEventKind::Down(_) if mouse.row == tabs_row => {
            // " 1:Chart " plus padding and divider spans the first 11 columns
            if mouse.column < 11 {
                app.set_view(View::Chart);
            } else if mouse.column < 23 {
                app.set_view(View::Series);
            }
        }
        _ => {}
    }
}
