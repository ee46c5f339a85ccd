use engine::{AlarmRepository, KeyValueStore};

use crate::{
    app::{Notice, alarms::message_for_repository_error},
    appearance::{ThemeMode, ThemeStore, ThemeSubscription},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    ToggleTheme,
    ClearAlarms,
}

impl SettingsAction {
    pub const ALL: [Self; 2] = [Self::ToggleTheme, Self::ClearAlarms];

    pub fn label(self) -> &'static str {
        match self {
            Self::ToggleTheme => "Alternar Tema",
            Self::ClearAlarms => "Limpar todos os alarmes",
        }
    }
}

pub struct SettingsScreen<S> {
    repository: AlarmRepository<S>,
    theme_store: ThemeStore,
    theme: ThemeSubscription,
    selected: SettingsAction,
    in_flight: bool,
}

impl<S: KeyValueStore> SettingsScreen<S> {
    pub fn new(repository: AlarmRepository<S>, theme_store: ThemeStore) -> Self {
        let theme = theme_store.subscribe();
        Self {
            repository,
            theme_store,
            theme,
            selected: SettingsAction::ToggleTheme,
            in_flight: false,
        }
    }

    pub fn selected(&self) -> SettingsAction {
        self.selected
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn theme(&self) -> &ThemeSubscription {
        &self.theme
    }

    pub fn select_next(&mut self) {
        self.selected = match self.selected {
            SettingsAction::ToggleTheme => SettingsAction::ClearAlarms,
            SettingsAction::ClearAlarms => SettingsAction::ToggleTheme,
        };
    }

    pub fn select_prev(&mut self) {
        // two entries, so previous and next coincide
        self.select_next();
    }

    /// Runs the selected action.
    pub async fn activate(&mut self) -> Option<Notice> {
        match self.selected {
            SettingsAction::ToggleTheme => {
                self.toggle_theme();
                None
            }
            SettingsAction::ClearAlarms => Some(self.clear_alarms().await),
        }
    }

    /// In-session only, never persisted.
    pub fn toggle_theme(&self) -> ThemeMode {
        self.theme_store.toggle()
    }

    /// Deletes every stored alarm. Other screens see it on their next load.
    pub async fn clear_alarms(&mut self) -> Notice {
        self.in_flight = true;
        let result = self.repository.clear().await;
        self.in_flight = false;

        match result {
            Ok(()) => Notice::success("Todos os alarmes foram apagados."),
            Err(err) => {
                tracing::error!("{err}");
                Notice::error(message_for_repository_error(&err))
            }
        }
    }
}
