use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the calendar column
const CALENDAR_WIDTH: u16 = 30;

/// Height of the month grid pane (title, weekday header, up to 6 weeks, borders)
const CALENDAR_HEIGHT: u16 = 10;

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub calendar_area: Rect,
    pub details_area: Rect,
    pub list_area: Rect,
    pub status_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Main area: Calendar over details (left) | Task list (right)
/// - Bottom bar: status line (1 row)
pub fn create_layout(area: Rect) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status line
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(CALENDAR_WIDTH), // Calendar + details
            Constraint::Min(0),                 // Task list
        ])
        .split(main_chunks[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(CALENDAR_HEIGHT), Constraint::Min(0)])
        .split(horizontal[0]);

    MainLayout {
        keybindings_area: main_chunks[0],
        calendar_area: left[0],
        details_area: left[1],
        list_area: horizontal[1],
        status_area: main_chunks[2],
    }
}

/// Create centered modal area
pub fn create_modal_area(area: Rect) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(16),
            Constraint::Percentage(25),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}
