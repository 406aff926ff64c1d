use crate::domain::UiMode;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Hints for the current mode
fn hints_for(mode: UiMode) -> Vec<&'static str> {
    match mode {
        UiMode::Normal => vec![
            " ←/→ day   ",
            "PgUp/PgDn week   ",
            "</> month   ",
            "Space today   ",
            "↑/↓ select   ",
            "a add   ",
            "e edit   ",
            "d done   ",
            "x delete   ",
            "c done-view   ",
            "f focus   ",
            "q quit",
        ],
        UiMode::AddingTask | UiMode::EditingTask => {
            vec![" Tab next field   ", "Enter save   ", "Esc cancel"]
        }
        UiMode::ConfirmDelete | UiMode::TaskStarting => vec![" y yes   ", "n no"],
        UiMode::Focus => vec![" p pause/resume   ", "r refresh   ", "Esc close"],
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, mode: UiMode, area: Rect) {
    let hints = Line::from(hints_for(mode).into_iter().map(Span::raw).collect::<Vec<_>>());

    let paragraph = Paragraph::new(hints).style(hint_style());
    f.render_widget(paragraph, area);
}
