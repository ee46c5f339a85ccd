pub mod alarms;
pub mod settings;

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use crossterm::event::{self, Event, KeyEvent};

use engine::{AlarmRepository, KeyValueStore, Storage};

use crate::{
    app::{alarms::AlarmsScreen, settings::SettingsScreen},
    appearance::{
        Appearance, AppearanceSource, AppearanceWatcher, SystemAppearance, ThemeStore,
        ThemeSubscription,
    },
    config::{AppConfig, AppearanceSetting},
    error::{AppError, Result},
    ui::{self, keymap::AppAction},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Alarms,
    Settings,
}

impl Section {
    pub const ALL: [Self; 2] = [Self::Alarms, Self::Settings];

    pub fn label(self) -> &'static str {
        match self {
            Self::Alarms => "Alarmes",
            Self::Settings => "Configurações",
        }
    }

    fn other(self) -> Self {
        match self {
            Self::Alarms => Self::Settings,
            Self::Settings => Self::Alarms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A modal message the user has to dismiss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.level {
            NoticeLevel::Success => "Sucesso",
            NoticeLevel::Error => "Erro",
        }
    }
}

/// Source of "today" for validation.
#[derive(Debug, Clone, Copy)]
pub enum ReferenceClock {
    Local,
    Zone(Tz),
}

impl ReferenceClock {
    pub fn today(self) -> NaiveDate {
        match self {
            Self::Local => chrono::Local::now().date_naive(),
            Self::Zone(zone) => Utc::now().with_timezone(&zone).date_naive(),
        }
    }
}

pub struct AppState<S> {
    pub section: Section,
    pub alarms: AlarmsScreen<S>,
    pub settings: SettingsScreen<S>,
    pub notice: Option<Notice>,
    pub theme: ThemeSubscription,
    pub storage_label: String,
}

impl<S: KeyValueStore> AppState<S> {
    pub fn new(repository: AlarmRepository<S>, theme: &ThemeStore, storage_label: String) -> Self {
        Self {
            section: Section::Alarms,
            alarms: AlarmsScreen::new(repository.clone(), theme.subscribe()),
            settings: SettingsScreen::new(repository, theme.clone()),
            notice: None,
            theme: theme.subscribe(),
            storage_label,
        }
    }
}

pub struct App<S> {
    clock: ReferenceClock,
    pub state: AppState<S>,
    should_quit: bool,
    _watcher: Option<AppearanceWatcher>,
}

impl App<Storage> {
    pub fn new(config: AppConfig) -> Result<Self> {
        let clock = match config.reference_zone()? {
            Some(zone) => ReferenceClock::Zone(zone),
            None => ReferenceClock::Local,
        };

        let storage = config.storage();
        let storage_label = storage.describe();
        tracing::info!("using store {storage_label}");

        let (theme, watcher) = match config.appearance {
            AppearanceSetting::System => {
                let source = SystemAppearance;
                let initial = source.detect();
                let theme = ThemeStore::new(initial);
                let watcher = AppearanceWatcher::spawn(
                    source,
                    theme.clone(),
                    initial,
                    Duration::from_millis(config.appearance_poll_ms.max(100)),
                );
                (theme, Some(watcher))
            }
            AppearanceSetting::Light => (ThemeStore::new(Appearance::Light), None),
            AppearanceSetting::Dark => (ThemeStore::new(Appearance::Dark), None),
        };

        let state = AppState::new(AlarmRepository::new(storage), &theme, storage_label);
        Ok(Self::with_state(state, clock, watcher))
    }
}

impl<S: KeyValueStore> App<S> {
    pub fn with_state(
        state: AppState<S>,
        clock: ReferenceClock,
        watcher: Option<AppearanceWatcher>,
    ) -> Self {
        Self {
            clock,
            state,
            should_quit: false,
            _watcher: watcher,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        self.mount().await;
        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key).await;
                }
            }
        }

        Ok(())
    }

    pub async fn mount(&mut self) {
        if let Some(notice) = self.state.alarms.load().await {
            self.state.notice = Some(notice);
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        self.handle_action(ui::keymap::map_key(key)).await;
    }

    pub async fn handle_action(&mut self, action: AppAction) {
        if self.state.notice.is_some() {
            match action {
                AppAction::Quit => self.should_quit = true,
                AppAction::Submit | AppAction::Cancel | AppAction::Toggle => {
                    self.state.notice = None;
                }
                _ => {}
            }
            return;
        }

        match action {
            AppAction::Quit => self.should_quit = true,
            AppAction::NextSection | AppAction::PrevSection => {
                self.switch_to(self.state.section.other()).await;
            }
            AppAction::NextField => match self.state.section {
                Section::Alarms => self.state.alarms.form_mut().next_focus(),
                Section::Settings => self.state.settings.select_next(),
            },
            AppAction::PrevField => match self.state.section {
                Section::Alarms => self.state.alarms.form_mut().prev_focus(),
                Section::Settings => self.state.settings.select_prev(),
            },
            AppAction::Up => match self.state.section {
                Section::Alarms => self.state.alarms.select_prev(),
                Section::Settings => self.state.settings.select_prev(),
            },
            AppAction::Down => match self.state.section {
                Section::Alarms => self.state.alarms.select_next(),
                Section::Settings => self.state.settings.select_next(),
            },
            AppAction::Submit => self.submit().await,
            AppAction::Toggle => match self.state.section {
                Section::Alarms => {
                    if self.state.alarms.form().focus == alarms::FormField::OnlyWeekdays {
                        self.state.alarms.form_mut().toggle_weekdays();
                    }
                }
                Section::Settings => self.submit().await,
            },
            AppAction::Backspace => {
                if self.state.section == Section::Alarms {
                    self.state.alarms.form_mut().backspace();
                }
            }
            AppAction::Input(ch) => self.handle_char(ch).await,
            AppAction::Cancel | AppAction::None => {}
        }
    }

    async fn handle_char(&mut self, ch: char) {
        match (self.state.section, ch) {
            (Section::Alarms, digit) if digit.is_ascii_digit() => {
                self.state.alarms.form_mut().push_digit(digit);
            }
            (_, 'a' | 'A') => self.switch_to(Section::Alarms).await,
            (_, 's' | 'S') => self.switch_to(Section::Settings).await,
            (Section::Alarms, 'w' | 'W') => self.state.alarms.form_mut().toggle_weekdays(),
            (Section::Settings, 't' | 'T') => {
                self.state.settings.toggle_theme();
            }
            (Section::Settings, 'c' | 'C') => {
                let notice = self.state.settings.clear_alarms().await;
                self.state.notice = Some(notice);
            }
            _ => {}
        }
    }

    async fn submit(&mut self) {
        let notice = match self.state.section {
            Section::Alarms => Some(self.state.alarms.submit(self.clock.today()).await),
            Section::Settings => self.state.settings.activate().await,
        };
        if notice.is_some() {
            self.state.notice = notice;
        }
    }

    /// Moving to the alarms tab reloads the list from the store.
    async fn switch_to(&mut self, section: Section) {
        if self.state.section == section {
            return;
        }
        self.state.section = section;
        if section == Section::Alarms {
            self.mount().await;
        }
    }
}
