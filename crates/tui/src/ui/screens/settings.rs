use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use engine::KeyValueStore;

use crate::{
    app::settings::{SettingsAction, SettingsScreen},
    ui::components::centered_box,
};

pub fn render<S: KeyValueStore>(frame: &mut Frame<'_>, area: Rect, screen: &SettingsScreen<S>) {
    let theme = screen.theme().palette();
    let card = centered_box(40, 9, area);

    let block = Block::default()
        .title(Span::styled(
            " Configurações ",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Toggle theme
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Clear alarms
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Current theme
        ])
        .margin(1)
        .split(inner);

    for (action, row) in SettingsAction::ALL.iter().zip([rows[0], rows[2]]) {
        let selected = *action == screen.selected();
        let style = if selected {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        let label = if selected && screen.in_flight() {
            format!("[ {}... ]", action.label())
        } else {
            format!("[ {} ]", action.label())
        };
        frame.render_widget(
            Paragraph::new(Span::styled(label, style)).alignment(Alignment::Center),
            row,
        );
    }

    let mode = Line::from(vec![
        Span::styled("Tema: ", Style::default().fg(theme.placeholder)),
        Span::styled(screen.theme().current().label(), Style::default().fg(theme.text)),
    ]);
    frame.render_widget(Paragraph::new(mode).alignment(Alignment::Center), rows[4]);
}
