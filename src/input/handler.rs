use crate::app::AppState;
use crate::domain::UiMode;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

/// What a key does inside the focus overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusCommand {
    TogglePause,
    Refresh,
    Close,
}

/// Map a key to a focus overlay command
pub fn focus_command(key: KeyEvent) -> Option<FocusCommand> {
    match key.code {
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => Some(FocusCommand::TogglePause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(FocusCommand::Refresh),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('f') => Some(FocusCommand::Close),
        _ => None,
    }
}

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(true);
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingTask | UiMode::EditingTask => handle_input_form_mode(app, key),
        UiMode::ConfirmDelete => handle_confirm_delete_mode(app, key),
        UiMode::TaskStarting => handle_task_starting_mode(app, key),
        UiMode::Focus => handle_focus_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    app.status = None;

    match key.code {
        // Task selection
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),

        // Calendar navigation
        KeyCode::Left | KeyCode::Char('h') => app.shift_days(-1),
        KeyCode::Right | KeyCode::Char('l') => app.shift_days(1),
        KeyCode::PageUp => app.shift_days(-7),
        KeyCode::PageDown => app.shift_days(7),
        KeyCode::Char('<') => app.shift_months(-1),
        KeyCode::Char('>') => app.shift_months(1),
        KeyCode::Char(' ') | KeyCode::Home => app.go_today(),

        // Task editing
        KeyCode::Char('a') | KeyCode::Char('A') => app.start_add_task(),
        KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Enter => app.start_edit_task(),
        KeyCode::Char('d') | KeyCode::Char('D') => app.toggle_done(),
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('c') | KeyCode::Char('C') => app.toggle_show_done(),

        KeyCode::Char('f') | KeyCode::Char('F') => app.open_focus(Instant::now(), app.clock),

        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),

        _ => {}
    }
    Ok(false)
}

/// Handle keys in the add/edit task form
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.cancel_input_form(),
        KeyCode::Enter => app.submit_input_form(),
        KeyCode::Tab | KeyCode::Down => app.input_form_next_field(),
        KeyCode::Backspace => app.input_form_backspace(),
        KeyCode::Char(c) => app.input_form_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys while a delete waits for confirmation
fn handle_confirm_delete_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
    Ok(false)
}

/// Handle keys on the "task starting" prompt
fn handle_task_starting_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            app.accept_task_start(Instant::now(), app.clock)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.dismiss_task_start(),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the focus overlay
fn handle_focus_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match focus_command(key) {
        Some(FocusCommand::TogglePause) => app.focus_toggle_pause(Instant::now()),
        Some(FocusCommand::Refresh) => app.focus_recheck(Instant::now(), app.clock),
        Some(FocusCommand::Close) => app.close_focus(),
        None => {}
    }
    Ok(false)
}
