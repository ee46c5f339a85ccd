use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

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

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

/// Hint groups per context.
pub mod common {
    use super::KeyHint;

    pub fn alarm_form() -> Vec<KeyHint> {
        vec![
            KeyHint::new("Tab", "campo"),
            KeyHint::new("Espaço/w", "dias úteis"),
            KeyHint::new("Enter", "salvar"),
        ]
    }

    pub fn settings() -> Vec<KeyHint> {
        vec![
            KeyHint::new("↑↓", "escolher"),
            KeyHint::new("Enter", "executar"),
            KeyHint::new("t", "tema"),
            KeyHint::new("c", "limpar"),
        ]
    }

    pub fn notice() -> Vec<KeyHint> {
        vec![KeyHint::new("Enter/Esc", "fechar")]
    }
}
