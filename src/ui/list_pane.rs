use crate::app::AppState;
use crate::domain::{done_badge, find_active_task, time_range, Task};
use crate::ui::styles::{
    border_style, default_style, done_style, hint_style, priority_style, running_style, selected_style,
    title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Render the task list of the selected date
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let tasks = app.store.tasks_on(app.selected_date);
    let active = find_active_task(tasks, app.selected_date, app.clock).map(|a| a.index);

    let mut title = format!(" Tasks · {} ", app.selected_date.format("%a %d %b %Y"));
    if !app.show_done {
        title.push_str("(done hidden) ");
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(title, title_style()));

    let visible = app.visible_indices();
    if visible.is_empty() {
        let empty = Paragraph::new(Line::styled("No tasks for this day. Press 'a' to add one.", hint_style()))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(row, &index)| {
            let task = &tasks[index];
            let line = create_task_line(task, active == Some(index));
            let style = if row == app.selected_index {
                selected_style()
            } else if task.done {
                done_style()
            } else {
                default_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

/// Create a single line for a task
/// Format: [ ] 09:00 → 10:30  Write proposal  P3  ● now
fn create_task_line(task: &Task, active: bool) -> Line<'static> {
    let mut spans = vec![
        Span::raw(format!("{} ", done_badge(task))),
        Span::raw(format!("{}  ", time_range(task))),
        Span::raw(task.display_title().to_string()),
    ];

    if task.priority > 0 {
        spans.push(Span::styled(format!("  P{}", task.priority), priority_style()));
    }

    if active {
        spans.push(Span::styled("  ● now".to_string(), running_style()));
    }

    Line::from(spans)
}
