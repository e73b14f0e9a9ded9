//! The calculator read-out: staged operand on top, entry below.

use engine::{Calculator, DisplayMode};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame<'_>, area: Rect, calculator: &Calculator, theme: &Theme) {
    let mode = match calculator.display_mode() {
        DisplayMode::Plain => "123",
        DisplayMode::Currency => "$",
    };
    let status = Line::from(vec![
        Span::styled(
            format!(" {} ", calculator.clear_key().label()),
            Style::default().fg(theme.accent),
        ),
        Span::styled(format!("{mode} "), Style::default().fg(theme.dim)),
    ])
    .right_aligned();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(" Tally ")
        .title(status)
        .style(Style::default().bg(theme.background));

    let lines = vec![
        Line::from(Span::styled(
            calculator.secondary_display(),
            Style::default().fg(theme.dim),
        ))
        .right_aligned(),
        Line::from(Span::styled(
            calculator.primary_display(),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        ))
        .right_aligned(),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
