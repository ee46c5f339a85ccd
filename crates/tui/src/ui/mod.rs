pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use engine::KeyValueStore;

use crate::app::{AppState, Section};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render<S: KeyValueStore>(frame: &mut Frame<'_>, state: &AppState<S>) {
    let area = frame.area();
    let theme = state.theme.palette();

    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background).fg(theme.text)),
        area,
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Tab bar (label + underline)
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    components::tabs::render_tabs(frame, layout[0], state.section, &theme);

    match state.section {
        Section::Alarms => screens::alarms::render(frame, layout[1], &state.alarms),
        Section::Settings => screens::settings::render(frame, layout[1], &state.settings),
    }

    render_bottom_bar(frame, layout[2], state, &theme);
    components::notice::render(frame, area, state.notice.as_ref(), &theme);
}

fn render_bottom_bar<S: KeyValueStore>(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState<S>,
    theme: &Theme,
) {
    let mut parts = components::tabs::tab_shortcuts(theme);

    let context = match (state.notice.is_some(), state.section) {
        (true, _) => components::hints::common::notice(),
        (false, Section::Alarms) => components::hints::common::alarm_form(),
        (false, Section::Settings) => components::hints::common::settings(),
    };
    parts.push(components::hints::hint_separator(theme));
    parts.extend(components::hints::hints_to_spans(&context, theme));

    parts.push(components::hints::hint_separator(theme));
    parts.push(Span::styled(
        format!("store: {}", state.storage_label),
        Style::default().fg(theme.placeholder),
    ));

    parts.push(components::hints::hint_separator(theme));
    parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" sair"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use engine::{AlarmRepository, MemoryStore};
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    use super::*;
    use crate::{
        app::Notice,
        appearance::{Appearance, ThemeStore},
    };

    fn buffer_text(buffer: &Buffer) -> String {
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    async fn state_with_alarm() -> (AppState<MemoryStore>, ThemeStore) {
        let theme = ThemeStore::new(Appearance::Light);
        let mut state = AppState::new(
            AlarmRepository::new(MemoryStore::new()),
            &theme,
            "memory".to_string(),
        );
        let form = state.alarms.form_mut();
        form.hour = "6".to_string();
        form.minute = "5".to_string();
        form.only_weekdays = true;
        state
            .alarms
            .submit(NaiveDate::from_ymd_opt(2024, 6, 12).unwrap())
            .await;
        (state, theme)
    }

    #[tokio::test]
    async fn alarms_tab_lists_saved_alarms() {
        let (state, _theme) = state_with_alarm().await;
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(frame, &state)).unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Cadastrar Alarme"));
        assert!(text.contains("Alarmes salvos:"));
        assert!(text.contains("06:05 (Dias úteis)"));
    }

    #[tokio::test]
    async fn rejection_stays_on_the_form_after_the_notice() {
        let (mut state, _theme) = state_with_alarm().await;
        let form = state.alarms.form_mut();
        form.hour = "8".to_string();
        form.minute = "0".to_string();
        form.only_weekdays = true;
        // 2024-12-25 is a Wednesday
        state.notice = Some(
            state
                .alarms
                .submit(NaiveDate::from_ymd_opt(2024, 12, 25).unwrap())
                .await,
        );
        state.notice = None;

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(frame, &state)).unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("O alarme não pode ser salvo para um feriado nacional."));
        assert!(!text.contains("Erro"));

        let form = state.alarms.form_mut();
        form.only_weekdays = false;
        state
            .alarms
            .submit(NaiveDate::from_ymd_opt(2024, 12, 25).unwrap())
            .await;
        terminal.draw(|frame| render(frame, &state)).unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(!text.contains("feriado nacional"));
        assert!(text.contains("08:00"));
    }

    #[tokio::test]
    async fn theme_and_notice_are_drawn() {
        let (mut state, theme) = state_with_alarm().await;
        theme.toggle();
        state.section = Section::Settings;

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(frame, &state)).unwrap();
        let buffer = terminal.backend().buffer();
        assert!(buffer_text(buffer).contains("Alternar Tema"));
        assert!(buffer_text(buffer).contains("Tema: escuro"));
        assert_eq!(buffer[(0, 23)].bg, Theme::dark().background);

        state.notice = Some(Notice::success("Todos os alarmes foram apagados."));
        terminal.draw(|frame| render(frame, &state)).unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Sucesso"));
        assert!(text.contains("Todos os alarmes foram apagados."));
    }
}
