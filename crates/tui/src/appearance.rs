//! Process-wide light/dark theme.
//!
//! [`ThemeStore`] owns the current [`ThemeMode`] in a watch channel. Screens
//! hold a [`ThemeSubscription`] and read the palette from it while drawing;
//! dropping the subscription unsubscribes. The [`AppearanceWatcher`] feeds the
//! store from the desktop light/dark setting.
use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};

use crate::ui::Theme;

/// Light/dark signal reported by the desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appearance {
    Light,
    Dark,
    /// No preference reported.
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "claro",
            Self::Dark => "escuro",
        }
    }
}

impl From<Appearance> for ThemeMode {
    fn from(appearance: Appearance) -> Self {
        match appearance {
            Appearance::Dark => Self::Dark,
            Appearance::Light | Appearance::Unspecified => Self::Light,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThemeStore {
    sender: Arc<watch::Sender<ThemeMode>>,
}

impl ThemeStore {
    pub fn new(initial: Appearance) -> Self {
        let (sender, _) = watch::channel(ThemeMode::from(initial));
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn current(&self) -> ThemeMode {
        *self.sender.borrow()
    }

    pub fn palette(&self) -> Theme {
        Theme::for_mode(self.current())
    }

    pub fn subscribe(&self) -> ThemeSubscription {
        ThemeSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Flips the in-session mode. The next desktop change wins over it.
    pub fn toggle(&self) -> ThemeMode {
        self.sender.send_modify(|mode| *mode = mode.toggled());
        let mode = self.current();
        tracing::info!("theme toggled to {mode:?}");
        mode
    }

    pub fn apply_appearance(&self, appearance: Appearance) {
        let mode = ThemeMode::from(appearance);
        self.sender.send_replace(mode);
        tracing::info!("desktop appearance {appearance:?}, theme set to {mode:?}");
    }
}

/// Read-only view on the theme held by a screen.
#[derive(Debug, Clone)]
pub struct ThemeSubscription {
    receiver: watch::Receiver<ThemeMode>,
}

impl ThemeSubscription {
    pub fn current(&self) -> ThemeMode {
        *self.receiver.borrow()
    }

    pub fn palette(&self) -> Theme {
        Theme::for_mode(self.current())
    }
}

/// Something able to report the desktop appearance. May block.
pub trait AppearanceSource: Send + Sync + 'static {
    fn detect(&self) -> Appearance;
}

/// Reads the desktop setting through `dark-light`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAppearance;

impl AppearanceSource for SystemAppearance {
    fn detect(&self) -> Appearance {
        match dark_light::detect() {
            dark_light::Mode::Dark => Appearance::Dark,
            dark_light::Mode::Light => Appearance::Light,
            dark_light::Mode::Default => Appearance::Unspecified,
        }
    }
}

/// Background task that polls an [`AppearanceSource`] and pushes changes into
/// a [`ThemeStore`]. Only a change of the reported value is pushed, so a
/// manual toggle survives until the desktop setting actually changes.
///
/// The task is aborted when the watcher is dropped.
#[derive(Debug)]
pub struct AppearanceWatcher {
    handle: JoinHandle<()>,
}

impl AppearanceWatcher {
    pub fn spawn<A: AppearanceSource>(
        source: A,
        store: ThemeStore,
        initial: Appearance,
        every: Duration,
    ) -> Self {
        let source = Arc::new(source);
        let handle = tokio::spawn(async move {
            let mut last = initial;
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let probe = Arc::clone(&source);
                let current = match tokio::task::spawn_blocking(move || probe.detect()).await {
                    Ok(current) => current,
                    Err(err) => {
                        tracing::warn!("appearance probe failed: {err}");
                        continue;
                    }
                };
                if current != last {
                    store.apply_appearance(current);
                    last = current;
                }
            }
        });

        Self { handle }
    }
}

impl Drop for AppearanceWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    async fn next_mode(subscription: &mut ThemeSubscription) -> ThemeMode {
        tokio::time::timeout(Duration::from_secs(2), subscription.receiver.changed())
            .await
            .unwrap()
            .unwrap();
        *subscription.receiver.borrow_and_update()
    }

    #[derive(Clone)]
    struct SwitchableAppearance(Arc<Mutex<Appearance>>);

    impl SwitchableAppearance {
        fn set(&self, appearance: Appearance) {
            if let Ok(mut current) = self.0.lock() {
                *current = appearance;
            }
        }
    }

    impl AppearanceSource for SwitchableAppearance {
        fn detect(&self) -> Appearance {
            self.0.lock().map(|current| *current).unwrap_or(Appearance::Unspecified)
        }
    }

    #[test]
    fn unspecified_renders_light() {
        let store = ThemeStore::new(Appearance::Unspecified);
        assert_eq!(store.current(), ThemeMode::Light);
        assert_eq!(store.palette(), Theme::light());
    }

    #[test]
    fn toggle_is_seen_by_every_subscriber() {
        let store = ThemeStore::new(Appearance::Light);
        let alarms = store.subscribe();
        let settings = store.subscribe();

        assert_eq!(store.toggle(), ThemeMode::Dark);
        assert_eq!(alarms.current(), ThemeMode::Dark);
        assert_eq!(settings.palette(), Theme::dark());

        store.toggle();
        assert_eq!(alarms.palette(), Theme::light());
        assert_eq!(settings.current(), ThemeMode::Light);
    }

    #[test]
    fn desktop_change_overrides_manual_toggle() {
        let store = ThemeStore::new(Appearance::Light);
        store.toggle();
        assert_eq!(store.current(), ThemeMode::Dark);

        store.apply_appearance(Appearance::Light);
        assert_eq!(store.current(), ThemeMode::Light);
    }

    #[test]
    fn dropping_a_subscription_unsubscribes() {
        let store = ThemeStore::new(Appearance::Dark);
        let first = store.subscribe();
        let second = store.subscribe();
        assert_eq!(store.sender.receiver_count(), 2);

        drop(first);
        assert_eq!(store.sender.receiver_count(), 1);
        drop(second);
        assert_eq!(store.sender.receiver_count(), 0);

        // no subscribers left, updates still land in the store
        store.apply_appearance(Appearance::Light);
        assert_eq!(store.current(), ThemeMode::Light);
    }

    #[tokio::test]
    async fn subscription_wakes_on_change() {
        let store = ThemeStore::new(Appearance::Light);
        let mut subscription = store.subscribe();
        store.apply_appearance(Appearance::Dark);
        assert_eq!(next_mode(&mut subscription).await, ThemeMode::Dark);
    }

    #[tokio::test]
    async fn watcher_pushes_only_changes() {
        let source = SwitchableAppearance(Arc::new(Mutex::new(Appearance::Light)));
        let store = ThemeStore::new(Appearance::Light);
        let mut subscription = store.subscribe();
        let _watcher = AppearanceWatcher::spawn(
            source.clone(),
            store.clone(),
            Appearance::Light,
            Duration::from_millis(10),
        );

        store.toggle();
        assert_eq!(next_mode(&mut subscription).await, ThemeMode::Dark);

        // the desktop keeps reporting Light, the manual toggle holds
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.current(), ThemeMode::Dark);

        source.set(Appearance::Unspecified);
        assert_eq!(next_mode(&mut subscription).await, ThemeMode::Light);
    }

    #[tokio::test]
    async fn dropping_the_watcher_stops_it() {
        let source = SwitchableAppearance(Arc::new(Mutex::new(Appearance::Light)));
        let store = ThemeStore::new(Appearance::Light);
        let watcher = AppearanceWatcher::spawn(
            source.clone(),
            store.clone(),
            Appearance::Light,
            Duration::from_millis(10),
        );
        drop(watcher);

        source.set(Appearance::Dark);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.current(), ThemeMode::Light);
    }
}
