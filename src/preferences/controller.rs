//! Keeps the theme preference observable.

use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};

use crate::{
    SQLitePreferencesRepository, ThemePreference,
    db::run_blocking,
    sharing::{Collected, ObserverCount, StateObserver, WhileSubscribed, spawn_collector},
};

/// Publishes the stored theme preference and stores the user's new choices.
///
/// Reads as [ThemePreference::System] until the stored value has been loaded.
pub struct ThemeController {
    repository: SQLitePreferencesRepository,
    state: Arc<watch::Sender<ThemePreference>>,
    observers: ObserverCount,
    collector: JoinHandle<()>,
}

impl ThemeController {
    /// Create a controller over `repository`. Must be called from within a Tokio runtime.
    pub fn new(repository: SQLitePreferencesRepository, policy: WhileSubscribed) -> Self {
        let (state, _) = watch::channel(ThemePreference::default());
        let state = Arc::new(state);
        let observers = ObserverCount::new();

        let collector = {
            let state = state.clone();
            let repository = repository.clone();

            spawn_collector(
                policy,
                observers.subscribe(),
                move || repository.observe_theme(),
                move |collected| match collected {
                    Collected::Started => {}
                    Collected::Snapshot(theme) => {
                        state.send_if_modified(|current| {
                            let changed = *current != theme;
                            *current = theme;
                            changed
                        });
                    }
                    Collected::Failed(error) => {
                        tracing::error!("could not load theme preference: {error}")
                    }
                },
            )
        };

        Self {
            repository,
            state,
            observers,
            collector,
        }
    }

    /// Watch the theme preference. It is only kept up to date while observed.
    pub fn observe(&self) -> StateObserver<ThemePreference> {
        StateObserver::new(&self.state, &self.observers)
    }

    /// The latest known theme preference.
    pub fn current(&self) -> ThemePreference {
        *self.state.borrow()
    }

    /// Store `theme`. Failures are logged and otherwise ignored.
    pub async fn set_theme(&self, theme: ThemePreference) {
        let repository = self.repository.clone();

        match run_blocking(move || repository.set_theme(theme)).await {
            Ok(()) => tracing::info!("theme preference set to {theme}"),
            Err(error) => tracing::error!("could not save theme preference {theme}: {error}"),
        }
    }
}

impl Drop for ThemeController {
    fn drop(&mut self) {
        self.collector.abort();
    }
}
