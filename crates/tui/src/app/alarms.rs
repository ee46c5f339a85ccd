use chrono::NaiveDate;

use engine::{Alarm, AlarmRepository, KeyValueStore, RepositoryError, ValidationError, validate};

use crate::{app::Notice, appearance::ThemeSubscription};

/// Each time field takes at most two digits.
const FIELD_MAX_LEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmsPhase {
    Loading,
    Idle,
    Validating,
    Persisting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Hour,
    Minute,
    OnlyWeekdays,
}

#[derive(Debug, Clone)]
pub struct AlarmForm {
    pub hour: String,
    pub minute: String,
    pub only_weekdays: bool,
    pub focus: FormField,
}

impl Default for AlarmForm {
    fn default() -> Self {
        Self {
            hour: String::new(),
            minute: String::new(),
            only_weekdays: false,
            focus: FormField::Hour,
        }
    }
}

impl AlarmForm {
    /// Appends a digit to the focused time field. Returns false when the
    /// character was refused.
    pub fn push_digit(&mut self, ch: char) -> bool {
        if !ch.is_ascii_digit() {
            return false;
        }
        let field = match self.focus {
            FormField::Hour => &mut self.hour,
            FormField::Minute => &mut self.minute,
            FormField::OnlyWeekdays => return false,
        };
        if field.len() >= FIELD_MAX_LEN {
            return false;
        }
        field.push(ch);
        true
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormField::Hour => {
                self.hour.pop();
            }
            FormField::Minute => {
                self.minute.pop();
            }
            FormField::OnlyWeekdays => {}
        }
    }

    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Hour => FormField::Minute,
            FormField::Minute => FormField::OnlyWeekdays,
            FormField::OnlyWeekdays => FormField::Hour,
        };
    }

    pub fn prev_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Hour => FormField::OnlyWeekdays,
            FormField::Minute => FormField::Hour,
            FormField::OnlyWeekdays => FormField::Minute,
        };
    }

    pub fn toggle_weekdays(&mut self) {
        self.only_weekdays = !self.only_weekdays;
    }

    fn clear_time(&mut self) {
        self.hour.clear();
        self.minute.clear();
        self.focus = FormField::Hour;
    }
}

/// The add-alarm form and the list of saved alarms.
///
/// The list is a mirror of the store. It is replaced by a reload or by the
/// copy that was just saved, never patched in place.
pub struct AlarmsScreen<S> {
    repository: AlarmRepository<S>,
    theme: ThemeSubscription,
    form: AlarmForm,
    alarms: Vec<Alarm>,
    phase: AlarmsPhase,
    selected: usize,
    last_rejection: Option<ValidationError>,
}

impl<S: KeyValueStore> AlarmsScreen<S> {
    pub fn new(repository: AlarmRepository<S>, theme: ThemeSubscription) -> Self {
        Self {
            repository,
            theme,
            form: AlarmForm::default(),
            alarms: Vec::new(),
            phase: AlarmsPhase::Loading,
            selected: 0,
            last_rejection: None,
        }
    }

    pub fn form(&self) -> &AlarmForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut AlarmForm {
        &mut self.form
    }

    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }

    pub fn phase(&self) -> AlarmsPhase {
        self.phase
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Reason the last submit was refused, until a submit passes validation.
    pub fn last_rejection(&self) -> Option<ValidationError> {
        self.last_rejection
    }

    pub fn theme(&self) -> &ThemeSubscription {
        &self.theme
    }

    /// Reloads the list from the store, on mount and whenever the tab
    /// regains focus. A failed load leaves an empty list and reports it.
    pub async fn load(&mut self) -> Option<Notice> {
        self.phase = AlarmsPhase::Loading;
        let result = self.repository.load().await;
        self.phase = AlarmsPhase::Idle;

        match result {
            Ok(alarms) => {
                self.alarms = alarms;
                self.clamp_selection();
                None
            }
            Err(err) => {
                tracing::error!("{err}");
                self.alarms.clear();
                self.selected = 0;
                Some(Notice::error(message_for_repository_error(&err)))
            }
        }
    }

    /// Validates the form against `today` and appends the alarm to the
    /// stored list. Storage and the mirror are untouched on any failure.
    pub async fn submit(&mut self, today: NaiveDate) -> Notice {
        self.phase = AlarmsPhase::Validating;
        let alarm = match validate(
            &self.form.hour,
            &self.form.minute,
            self.form.only_weekdays,
            today,
        ) {
            Ok(alarm) => alarm,
            Err(err) => {
                tracing::info!("alarm refused: {err}");
                self.last_rejection = Some(err);
                self.phase = AlarmsPhase::Idle;
                return Notice::error(message_for_rejection(err));
            }
        };
        self.last_rejection = None;

        self.phase = AlarmsPhase::Persisting;
        let mut updated = self.alarms.clone();
        updated.push(alarm);
        let result = self.repository.save(&updated).await;
        self.phase = AlarmsPhase::Idle;

        match result {
            Ok(()) => {
                tracing::info!("alarm saved for {}", alarm.label());
                self.alarms = updated;
                self.form.clear_time();
                Notice::success(format!("Alarme salvo para {}", alarm.label()))
            }
            Err(err) => {
                tracing::error!("{err}");
                Notice::error(message_for_repository_error(&err))
            }
        }
    }

    pub fn select_next(&mut self) {
        if self.alarms.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.alarms.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.alarms.len().saturating_sub(1));
    }
}

pub fn message_for_rejection(err: ValidationError) -> &'static str {
    match err {
        ValidationError::MissingField => "Preencha todos os campos!",
        ValidationError::InvalidNumber => "Hora ou minuto inválido.",
        ValidationError::WeekendRejected => "O alarme não pode ser salvo para sábado ou domingo.",
        ValidationError::HolidayRejected => {
            "O alarme não pode ser salvo para um feriado nacional."
        }
    }
}

pub fn message_for_repository_error(err: &RepositoryError) -> &'static str {
    match err {
        RepositoryError::Load(_) => "Falha ao carregar alarmes.",
        RepositoryError::Save(_) => "Não foi possível salvar o alarme.",
        RepositoryError::Clear(_) => "Não foi possível apagar os alarmes.",
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::atomic::{AtomicBool, Ordering},
    };

    use engine::{ALARMS_KEY, MemoryStore, StoreError};

    use super::*;
    use crate::{
        app::NoticeLevel,
        appearance::{Appearance, ThemeStore},
    };

    /// Memory store whose writes can be made to fail.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
    }

    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(io::Error::other("disk full").into());
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key).await
        }
    }

    // 2024-06-12 is a Wednesday, 2024-06-16 a Sunday
    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    fn sunday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 16).unwrap()
    }

    fn alarm(hour: u8, minute: u8, only_weekdays: bool) -> Alarm {
        Alarm::new(hour, minute, only_weekdays).unwrap()
    }

    async fn screen_with(alarms: &[Alarm]) -> AlarmsScreen<FlakyStore> {
        let repository = AlarmRepository::new(FlakyStore::default());
        repository.save(alarms).await.unwrap();
        let theme = ThemeStore::new(Appearance::Light);
        let mut screen = AlarmsScreen::new(repository, theme.subscribe());
        assert!(screen.load().await.is_none());
        screen
    }

    fn fill(screen: &mut AlarmsScreen<FlakyStore>, hour: &str, minute: &str, weekdays: bool) {
        let form = screen.form_mut();
        form.hour = hour.to_string();
        form.minute = minute.to_string();
        form.only_weekdays = weekdays;
    }

    #[tokio::test]
    async fn submit_appends_to_existing_list() {
        let mut screen = screen_with(&[alarm(7, 30, false)]).await;
        fill(&mut screen, "9", "5", false);

        let notice = screen.submit(wednesday()).await;

        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.message, "Alarme salvo para 09:05");
        let expected = vec![alarm(7, 30, false), alarm(9, 5, false)];
        assert_eq!(screen.alarms(), expected.as_slice());
        assert_eq!(screen.repository.load().await.unwrap(), expected);
        assert!(screen.form().hour.is_empty());
        assert!(screen.form().minute.is_empty());
        assert_eq!(screen.phase(), AlarmsPhase::Idle);
    }

    #[tokio::test]
    async fn weekend_rejection_leaves_everything_untouched() {
        let mut screen = screen_with(&[alarm(7, 30, false)]).await;
        let before = screen
            .repository
            .store()
            .get(ALARMS_KEY)
            .await
            .unwrap();
        fill(&mut screen, "8", "00", true);

        let notice = screen.submit(sunday()).await;

        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(
            notice.message,
            "O alarme não pode ser salvo para sábado ou domingo."
        );
        assert_eq!(
            screen.last_rejection(),
            Some(ValidationError::WeekendRejected)
        );
        assert_eq!(screen.alarms(), &[alarm(7, 30, false)]);
        assert_eq!(
            screen.repository.store().get(ALARMS_KEY).await.unwrap(),
            before
        );
        // the input stays so the user can correct it
        assert_eq!(screen.form().hour, "8");
        assert_eq!(screen.phase(), AlarmsPhase::Idle);
    }

    #[tokio::test]
    async fn missing_field_is_reported() {
        let mut screen = screen_with(&[]).await;
        fill(&mut screen, "", "15", false);
        let notice = screen.submit(wednesday()).await;
        assert_eq!(notice.message, "Preencha todos os campos!");
        assert!(screen.alarms().is_empty());
    }

    #[tokio::test]
    async fn save_failure_keeps_list_and_inputs() {
        let mut screen = screen_with(&[alarm(6, 0, true)]).await;
        screen
            .repository
            .store()
            .fail_writes
            .store(true, Ordering::SeqCst);
        fill(&mut screen, "10", "30", false);

        let notice = screen.submit(wednesday()).await;

        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Não foi possível salvar o alarme.");
        assert_eq!(screen.alarms(), &[alarm(6, 0, true)]);
        assert_eq!(screen.repository.load().await.unwrap(), vec![alarm(6, 0, true)]);
        assert_eq!(screen.form().hour, "10");
    }

    #[tokio::test]
    async fn weekday_switch_survives_a_successful_submit() {
        let mut screen = screen_with(&[]).await;
        fill(&mut screen, "6", "45", true);
        screen.submit(wednesday()).await;
        assert!(screen.form().only_weekdays);
        assert_eq!(screen.alarms(), &[alarm(6, 45, true)]);
    }

    #[tokio::test]
    async fn load_error_leaves_empty_list() {
        let store = FlakyStore::default();
        store
            .set(ALARMS_KEY, "[{broken".to_string())
            .await
            .unwrap();
        let theme = ThemeStore::new(Appearance::Dark);
        let mut screen = AlarmsScreen::new(AlarmRepository::new(store), theme.subscribe());

        let notice = screen.load().await.unwrap();

        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Falha ao carregar alarmes.");
        assert!(screen.alarms().is_empty());
        assert_eq!(screen.phase(), AlarmsPhase::Idle);

        // still usable: the next save overwrites the broken value
        fill(&mut screen, "7", "0", false);
        let notice = screen.submit(wednesday()).await;
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(screen.repository.load().await.unwrap(), vec![alarm(7, 0, false)]);
    }

    #[tokio::test]
    async fn reload_picks_up_external_clear() {
        let mut screen = screen_with(&[alarm(7, 30, false), alarm(8, 0, false)]).await;
        screen.select_next();
        assert_eq!(screen.selected(), 1);

        screen.repository.clone().clear().await.unwrap();
        // the mirror is only refreshed by a reload
        assert_eq!(screen.alarms().len(), 2);

        assert!(screen.load().await.is_none());
        assert!(screen.alarms().is_empty());
        assert_eq!(screen.selected(), 0);
    }

    #[test]
    fn form_accepts_two_digits_per_field() {
        let mut form = AlarmForm::default();
        assert!(form.push_digit('1'));
        assert!(form.push_digit('2'));
        assert!(!form.push_digit('3'));
        assert!(!form.push_digit('x'));
        assert_eq!(form.hour, "12");

        form.next_focus();
        assert!(form.push_digit('5'));
        form.backspace();
        assert!(form.minute.is_empty());

        form.next_focus();
        assert_eq!(form.focus, FormField::OnlyWeekdays);
        assert!(!form.push_digit('1'));
        form.toggle_weekdays();
        assert!(form.only_weekdays);

        form.next_focus();
        assert_eq!(form.focus, FormField::Hour);
        form.prev_focus();
        assert_eq!(form.focus, FormField::OnlyWeekdays);
    }
}
