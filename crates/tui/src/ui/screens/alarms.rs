use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use engine::KeyValueStore;

use crate::{
    app::alarms::{AlarmsPhase, AlarmsScreen, FormField, message_for_rejection},
    ui::theme::Theme,
};

pub fn render<S: KeyValueStore>(frame: &mut Frame<'_>, area: Rect, screen: &AlarmsScreen<S>) {
    let theme = screen.theme().palette();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Hour : minute
            Constraint::Length(1), // Weekdays switch
            Constraint::Length(1), // Save button
            Constraint::Length(1), // Last rejection
            Constraint::Length(1), // List title
            Constraint::Min(0),    // List
        ])
        .margin(1)
        .split(area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "Cadastrar Alarme",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        layout[0],
    );

    render_time_row(frame, layout[1], screen, &theme);
    render_switch(frame, layout[2], screen, &theme);
    render_button(frame, layout[3], screen, &theme);

    if let Some(rejection) = screen.last_rejection() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                message_for_rejection(rejection),
                Style::default().fg(theme.error),
            )),
            layout[4],
        );
    }

    frame.render_widget(
        Paragraph::new(Span::styled(
            "Alarmes salvos:",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        layout[5],
    );
    render_list(frame, layout[6], screen, &theme);
}

fn render_time_row<S: KeyValueStore>(
    frame: &mut Frame<'_>,
    area: Rect,
    screen: &AlarmsScreen<S>,
    theme: &Theme,
) {
    let row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(10),
            Constraint::Length(3),
            Constraint::Length(10),
            Constraint::Min(0),
        ])
        .split(area);

    let form = screen.form();
    render_input(
        frame,
        row[0],
        &form.hour,
        "Hora",
        form.focus == FormField::Hour,
        theme,
    );
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(" : ", Style::default().fg(theme.text))),
        ]),
        row[1],
    );
    render_input(
        frame,
        row[2],
        &form.minute,
        "Minuto",
        form.focus == FormField::Minute,
        theme,
    );
}

/// Bordered input showing the placeholder while empty.
fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    value: &str,
    placeholder: &str,
    focused: bool,
    theme: &Theme,
) {
    let border = if focused { theme.accent } else { theme.border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border));

    let cursor = if focused { "│" } else { "" };
    let content = if value.is_empty() {
        Line::from(vec![
            Span::styled(placeholder.to_string(), Style::default().fg(theme.placeholder)),
            Span::styled(cursor, Style::default().fg(theme.accent)),
        ])
    } else {
        Line::from(vec![
            Span::styled(value.to_string(), Style::default().fg(theme.text)),
            Span::styled(cursor, Style::default().fg(theme.accent)),
        ])
    };

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_switch<S: KeyValueStore>(
    frame: &mut Frame<'_>,
    area: Rect,
    screen: &AlarmsScreen<S>,
    theme: &Theme,
) {
    let form = screen.form();
    let focused = form.focus == FormField::OnlyWeekdays;
    let mark = if form.only_weekdays { "[x]" } else { "[ ]" };
    let mark_style = if focused {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };

    let line = Line::from(vec![
        Span::styled("Apenas dias úteis ", Style::default().fg(theme.text)),
        Span::styled(mark, mark_style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_button<S: KeyValueStore>(
    frame: &mut Frame<'_>,
    area: Rect,
    screen: &AlarmsScreen<S>,
    theme: &Theme,
) {
    let label = match screen.phase() {
        AlarmsPhase::Loading => "[ Carregando... ]",
        AlarmsPhase::Validating | AlarmsPhase::Persisting => "[ Salvando... ]",
        AlarmsPhase::Idle => "[ Salvar Alarme ]",
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            label,
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        area,
    );
}

fn render_list<S: KeyValueStore>(
    frame: &mut Frame<'_>,
    area: Rect,
    screen: &AlarmsScreen<S>,
    theme: &Theme,
) {
    let items = screen
        .alarms()
        .iter()
        .map(|alarm| {
            let suffix = if alarm.only_weekdays() {
                " (Dias úteis)"
            } else {
                ""
            };
            ListItem::new(Line::from(format!(
                "{}:{}{suffix}",
                alarm.hour_text(),
                alarm.minute_text()
            )))
            .style(Style::default().fg(theme.text))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(screen.selected()));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(theme.border)),
        )
        .highlight_style(Style::default().fg(theme.accent))
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);
}
