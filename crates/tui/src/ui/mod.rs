pub mod components;
pub mod keymap;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{AppState, EditState, Mode};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();
    let editing = match &state.mode {
        Mode::Edit(edit) => Some(edit),
        Mode::Calculator => None,
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Display
            Constraint::Min(0),    // Ledger
            Constraint::Length(if editing.is_some() { 3 } else { 0 }),
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    let calculator = state.session.calculator();
    components::display::render(frame, layout[0], calculator, &theme);
    components::ledger::render(frame, layout[1], calculator, state.selected_index(), &theme);
    if let Some(edit) = editing {
        render_editor(frame, layout[2], edit, &theme);
    }
    components::hints::render(frame, layout[3], &state.mode, &theme);
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_editor(frame: &mut Frame<'_>, area: Rect, edit: &EditState, theme: &Theme) {
    let border = if edit.invalid { theme.error } else { theme.accent };
    let mut line = vec![
        Span::raw(edit.input.as_str()),
        Span::styled("▏", Style::default().fg(theme.accent)),
    ];
    if edit.invalid {
        line.push(Span::styled("  not a number", Style::default().fg(theme.error)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Edit entry ");
    frame.render_widget(Paragraph::new(Line::from(line)).block(block), area);
}
