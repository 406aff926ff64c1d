use crate::app::AppState;
use crate::domain::time_range;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Draw a yes/no modal with the given message lines
fn render_yes_no(f: &mut Frame, area: Rect, title: &str, mut lines: Vec<Line>) {
    let modal_area = create_modal_area(area);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("  [y]", modal_title_style()),
        Span::raw(" Yes  "),
        Span::styled("[n]", modal_title_style()),
        Span::raw(" No"),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title.to_string(), modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// Render the delete confirmation modal
pub fn render_confirm_delete(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(task) = app.selected_task() {
        let lines = vec![
            Line::raw(""),
            Line::raw(format!("  Delete '{}'?", task.display_title())),
            Line::raw(format!("  {}", time_range(task))),
        ];
        render_yes_no(f, area, " Delete Task ", lines);
    }
}

/// Render the "task starting now" prompt
pub fn render_task_starting(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(task) = &app.pending_start {
        let lines = vec![
            Line::raw(""),
            Line::raw(format!("  '{}' starts now ({}).", task.display_title(), time_range(task))),
            Line::raw(""),
            Line::raw("  Open the focus timer?"),
        ];
        render_yes_no(f, area, " ⏰ Time to start ", lines);
    }
}
