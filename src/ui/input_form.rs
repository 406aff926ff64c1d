use crate::app::AppState;
use crate::domain::{FormField, UiMode};
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the input form for adding or editing a task
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.input_form {
        let modal_area = create_modal_area(area);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let title_text = if app.ui_mode == UiMode::EditingTask {
            " Edit Task "
        } else {
            " Add Task "
        };

        let mut lines = Vec::new();
        for &field in FormField::all() {
            let editing = form.field == field;
            let label = if editing {
                format!("{}: (editing)", field.label())
            } else {
                format!("{}:", field.label())
            };
            lines.push(Line::raw(label));
            lines.push(Line::from(vec![
                Span::raw("> "),
                Span::styled(form.value(field).to_string(), modal_title_style()),
                if editing {
                    Span::styled("█", modal_title_style()) // Cursor
                } else {
                    Span::raw("")
                },
            ]));
        }

        lines.push(Line::raw(""));
        match &form.error {
            Some(error) => lines.push(Line::styled(format!("⚠ {}", error), error_style())),
            None => lines.push(Line::raw("Tab to switch fields  ·  Enter to save  ·  Esc to cancel")),
        }

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(title_text, modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
