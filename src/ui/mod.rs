pub mod calendar_pane;
pub mod details_pane;
pub mod focus_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod styles;

use crate::app::AppState;
use crate::domain::UiMode;
use calendar_pane::render_calendar_pane;
use details_pane::render_details_pane;
use focus_pane::render_focus_overlay;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::{render_confirm_delete, render_task_starting};
use ratatui::{text::Span, widgets::Paragraph, Frame};
use styles::hint_style;

pub use focus_pane::render_focus_screen;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, app.ui_mode, layout.keybindings_area);
    render_calendar_pane(f, app, layout.calendar_area);
    render_details_pane(f, app, layout.details_area);
    render_list_pane(f, app, layout.list_area);

    let status = app
        .status
        .clone()
        .unwrap_or_else(|| format!(" {}", app.store.path().display()));
    f.render_widget(
        Paragraph::new(Span::styled(status, hint_style())),
        layout.status_area,
    );

    // Focus overlay sits below forms opened from it
    if let Some(panel) = &app.focus {
        render_focus_overlay(f, panel, size);
    }

    match app.ui_mode {
        UiMode::AddingTask | UiMode::EditingTask => render_input_form(f, app, size),
        UiMode::ConfirmDelete => render_confirm_delete(f, app, size),
        UiMode::TaskStarting => render_task_starting(f, app, size),
        UiMode::Normal | UiMode::Focus => {}
    }
}
