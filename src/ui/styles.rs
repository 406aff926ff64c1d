use ratatui::style::{Color, Modifier, Style};

/// Default text style
pub fn default_style() -> Style {
    Style::default().fg(Color::White)
}

/// Selected row highlight style
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Running countdown style
pub fn running_style() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

/// Paused countdown style
pub fn paused_style() -> Style {
    Style::default().fg(Color::Yellow)
}

/// Idle countdown style
pub fn idle_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Modal background style
pub fn modal_bg_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

/// Modal title style
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Focus gauge style
pub fn gauge_style() -> Style {
    Style::default().fg(Color::Green).bg(Color::DarkGray)
}

/// Error message style
pub fn error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Done/completed task style
pub fn done_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::CROSSED_OUT)
}

/// Today's cell in the calendar
pub fn today_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Calendar day that has tasks
pub fn has_tasks_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED)
}

/// Priority badge style
pub fn priority_style() -> Style {
    Style::default().fg(Color::Blue)
}
