use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::{
    app::{Notice, NoticeLevel},
    ui::{components::centered_box, theme::Theme},
};

/// Draws the pending notice as a centered modal over everything else.
pub fn render(frame: &mut Frame<'_>, area: Rect, notice: Option<&Notice>, theme: &Theme) {
    let Some(notice) = notice else {
        return;
    };

    let color = match notice.level {
        NoticeLevel::Success => theme.success,
        NoticeLevel::Error => theme.error,
    };
    let width = (notice.message.chars().count() + 6).clamp(24, 60) as u16;
    let rect = centered_box(width, 6, area);

    frame.render_widget(Clear, rect);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", notice.title()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme.background));

    let lines = vec![
        Line::from(Span::styled(
            notice.message.as_str(),
            Style::default().fg(theme.text),
        )),
        Line::from(""),
        Line::from(Span::styled("OK", Style::default().fg(theme.accent))),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        rect,
    );
}
