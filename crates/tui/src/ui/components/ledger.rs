//! Scrollable operation history with running totals.

use chrono::Local;
use engine::Calculator;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame<'_>,
    area: Rect,
    calculator: &Calculator,
    selected: Option<usize>,
    theme: &Theme,
) {
    let ledger = calculator.ledger();
    let items = ledger
        .entries()
        .iter()
        .enumerate()
        .map(|(idx, op)| {
            let (amount, total) = calculator.entry_row(op);
            let time = op.created_at.with_timezone(&Local).format("%H:%M:%S");
            let total_style = if op.running_total < 0.0 {
                Style::default().fg(theme.error)
            } else {
                Style::default().fg(theme.text)
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>3}  {time}  ", idx + 1),
                    Style::default().fg(theme.dim),
                ),
                Span::raw(format!("{amount:>18}  ")),
                Span::styled(format!("{total:>20}"), total_style),
            ]))
        })
        .collect::<Vec<_>>();

    let grand_total = Line::from(format!(
        " Total {} ",
        calculator.format_amount(ledger.total())
    ))
    .right_aligned();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(format!(" Ledger ({}) ", ledger.len()))
        .title_bottom(grand_total)
        .style(Style::default().bg(theme.panel));

    let mut list_state = ListState::default();
    list_state.select(selected);

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);
}
