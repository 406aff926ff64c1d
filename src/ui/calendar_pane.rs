use crate::app::AppState;
use crate::domain::month_grid;
use crate::ui::styles::{
    border_style, default_style, has_tasks_style, hint_style, selected_style, title_style, today_style,
};
use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::collections::BTreeSet;

const WEEKDAY_HEADER: &str = " Mo Tu We Th Fr Sa Su";

/// Build the month grid lines around the selected date
fn calendar_lines(selected: NaiveDate, today: NaiveDate, busy: &BTreeSet<NaiveDate>) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(WEEKDAY_HEADER, hint_style()))];

    for week in month_grid(selected) {
        let mut spans = Vec::with_capacity(14);
        for cell in week {
            spans.push(Span::raw(" "));
            match cell {
                Some(day) => {
                    let style = if day == selected {
                        selected_style()
                    } else if day == today {
                        today_style()
                    } else if busy.contains(&day) {
                        has_tasks_style()
                    } else {
                        default_style()
                    };
                    spans.push(Span::styled(format!("{:>2}", day.day()), style));
                }
                None => spans.push(Span::raw("  ")),
            }
        }
        lines.push(Line::from(spans));
    }
    lines
}

/// Render the month calendar pane
pub fn render_calendar_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let busy: BTreeSet<NaiveDate> = app.store.dates_with_tasks().into_iter().collect();
    let lines = calendar_lines(app.selected_date, app.clock.date(), &busy);

    let title = format!(" {} ", app.selected_date.format("%B %Y"));
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(title, title_style())),
    );

    f.render_widget(paragraph, area);
}
