use crate::app::AppState;
use crate::domain::time_range;
use crate::ui::styles::{border_style, default_style, done_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the details pane for the selected task
pub fn render_details_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Details ", title_style()));

    let Some(task) = app.selected_task() else {
        f.render_widget(Paragraph::new("No task selected").block(block), area);
        return;
    };

    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Title: ", title_style()),
        Span::raw(task.display_title().to_string()),
    ]));
    lines.push(Line::raw(""));

    lines.push(Line::from(vec![
        Span::styled("Time:     ", title_style()),
        Span::raw(time_range(task)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Priority: ", title_style()),
        Span::raw(task.priority.to_string()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Status:   ", title_style()),
        if task.done {
            Span::styled("done", done_style())
        } else {
            Span::styled("pending", default_style())
        },
    ]));
    lines.push(Line::raw(""));

    if !task.description.trim().is_empty() {
        lines.push(Line::from(Span::styled("Description:", title_style())));
        for text in task.description.lines() {
            lines.push(Line::raw(format!("  {}", text)));
        }
    } else {
        lines.push(Line::from(Span::styled("Description: (empty)", default_style())));
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
