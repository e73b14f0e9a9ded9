use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{app::Mode, ui::theme::Theme};

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone, Copy)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

const CALCULATOR_HINTS: &[KeyHint] = &[
    KeyHint::new("0-9 . +-*/", "keys"),
    KeyHint::new("Enter", "="),
    KeyHint::new("Esc", "clear"),
    KeyHint::new("d", "00"),
    KeyHint::new("n", "±"),
    KeyHint::new("%", "percent"),
    KeyHint::new("$", "currency"),
    KeyHint::new("↑↓", "select"),
    KeyHint::new("e", "edit"),
];

const EDIT_HINTS: &[KeyHint] = &[
    KeyHint::new("Enter", "save"),
    KeyHint::new("Esc", "cancel"),
    KeyHint::new("Ctrl+D", "delete"),
];

/// Converts a list of key hints into styled spans for rendering.
pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

pub fn render(frame: &mut Frame<'_>, area: Rect, mode: &Mode, theme: &Theme) {
    let hints = match mode {
        Mode::Calculator => CALCULATOR_HINTS,
        Mode::Edit(_) => EDIT_HINTS,
    };
    let mut parts = hints_to_spans(hints, theme);

    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
