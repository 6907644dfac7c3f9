use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;

/// Handle a single key input event. The only thing a user can do is close
/// the window.
pub fn handle_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::F(10) | KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        _ => {}
    }
}
