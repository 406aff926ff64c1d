use crate::domain::CountdownPhase;
use crate::focus::FocusPanel;
use crate::ui::{
    layout::create_modal_area,
    styles::{
        gauge_style, hint_style, idle_style, modal_bg_style, modal_title_style, paused_style, running_style,
        title_style,
    },
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

fn phase_style(phase: CountdownPhase) -> Style {
    match phase {
        CountdownPhase::Running => running_style(),
        CountdownPhase::Paused => paused_style(),
        CountdownPhase::Idle => idle_style(),
    }
}

/// Text lines of the panel, above the gauge
fn focus_lines(panel: &FocusPanel) -> Vec<Line<'static>> {
    let phase = panel.countdown.phase;
    vec![
        Line::styled(panel.clock_label(), title_style()),
        Line::raw(""),
        Line::styled(panel.title_label().to_string(), modal_title_style()),
        Line::raw(""),
        Line::styled(panel.timer_label(), phase_style(phase)),
        Line::styled(phase.to_tag(), phase_style(phase)),
    ]
}

/// Draw the panel contents inside `block`
fn render_panel(f: &mut Frame, panel: &FocusPanel, block: Block, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Clock, title, timer
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Gauge
            Constraint::Min(0),
            Constraint::Length(1), // Hints
        ])
        .split(block.inner(area));

    let gauge = Gauge::default()
        .gauge_style(gauge_style())
        .ratio(panel.countdown.remaining_ratio().clamp(0.0, 1.0))
        .label(format!("{:.0}% elapsed", panel.countdown.progress_ratio() * 100.0));

    let hints = Line::from(vec![
        Span::raw("p pause/resume   "),
        Span::raw("r refresh   "),
        Span::raw("Esc close"),
    ]);

    f.render_widget(block, area);
    f.render_widget(Paragraph::new(focus_lines(panel)).alignment(Alignment::Center), chunks[0]);
    f.render_widget(gauge, chunks[2]);
    f.render_widget(Paragraph::new(hints).style(hint_style()).alignment(Alignment::Center), chunks[4]);
}

/// Render the focus panel as an overlay on top of the editor
pub fn render_focus_overlay(f: &mut Frame, panel: &FocusPanel, area: Rect) {
    let modal_area = create_modal_area(area);

    // Clear the area behind the overlay
    f.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Focus ", modal_title_style()))
        .style(modal_bg_style());
    render_panel(f, panel, block, modal_area);
}

/// Render the focus panel full screen, for the standalone `focus` command
pub fn render_focus_screen(f: &mut Frame, panel: &FocusPanel, source: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(format!(" Focus · {} ", source), title_style()));
    render_panel(f, panel, block, f.size());
}
