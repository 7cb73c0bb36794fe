//! The state controller behind a list + form screen.

use std::sync::{Arc, Mutex};

use tokio::{sync::watch, task::JoinHandle};

use crate::{
    Error, EventReceiver, EventSender, MessageRef, UiEvent,
    db::run_blocking,
    event_channel,
    screen::{EntityForm, Identified, Repository, ScreenState},
    sharing::{Collected, ObserverCount, StateObserver, WhileSubscribed, spawn_collector},
};

/// Owns the state of one screen and turns user input into repository calls.
///
/// All state changes go through a single [watch] cell, so each update works on the latest
/// snapshot. Failures never escape: they end up either in the state or as a [UiEvent].
pub struct ScreenController<F, R>
where
    F: EntityForm,
    R: Repository<Entity = F::Entity>,
{
    name: &'static str,
    repository: R,
    state: Arc<watch::Sender<ScreenState<F>>>,
    observers: ObserverCount,
    events: EventSender,
    event_receiver: Mutex<Option<EventReceiver>>,
    collector: JoinHandle<()>,
}

impl<F, R> ScreenController<F, R>
where
    F: EntityForm,
    R: Repository<Entity = F::Entity>,
{
    /// Create a controller with an empty form.
    ///
    /// `name` is used to tell controllers apart in the logs. Must be called from within a
    /// Tokio runtime, the record list is loaded in a background task while the state is
    /// observed.
    pub fn new(repository: R, policy: WhileSubscribed, name: &'static str) -> Self {
        let (state, _) = watch::channel(ScreenState::default());
        let state = Arc::new(state);
        let observers = ObserverCount::new();
        let (events, event_receiver) = event_channel();

        let collector = {
            let state = state.clone();
            let repository = repository.clone();

            spawn_collector(
                policy,
                observers.subscribe(),
                move || repository.observe_all(),
                move |collected| apply_collected(&state, collected, name),
            )
        };

        Self {
            name,
            repository,
            state,
            observers,
            events,
            event_receiver: Mutex::new(Some(event_receiver)),
            collector,
        }
    }

    /// Watch the screen state.
    ///
    /// The record list is only kept up to date while at least one observer is alive.
    pub fn observe(&self) -> StateObserver<ScreenState<F>> {
        StateObserver::new(&self.state, &self.observers)
    }

    /// A copy of the current screen state.
    pub fn snapshot(&self) -> ScreenState<F> {
        self.state.borrow().clone()
    }

    /// Take the receiver for this controller's one-shot events.
    ///
    /// There is only one receiver, later calls return `None`.
    pub fn take_events(&self) -> Option<EventReceiver> {
        match self.event_receiver.lock() {
            Ok(mut receiver) => receiver.take(),
            Err(error) => {
                tracing::error!("{}: could not acquire event receiver lock: {error}", self.name);
                None
            }
        }
    }

    /// Update one form field.
    ///
    /// Clears that field's error and the form-level error.
    pub fn on_field_change(&self, change: F::Change) {
        self.state.send_modify(|state| {
            state.form.apply(change);
            state.form_error = None;
        });
    }

    /// Load `entity` into the form for editing.
    pub fn prepare_for_edit(&self, entity: &F::Entity) {
        self.state.send_modify(|state| {
            state.form = F::from_entity(entity);
            state.form_error = None;
        });
    }

    /// Reset the form to its defaults.
    pub fn clear_form(&self) {
        self.state.send_modify(|state| {
            state.form = F::default();
            state.form_error = None;
        });
    }

    /// Ask the user to confirm deleting `entity`.
    pub fn prepare_for_delete(&self, entity: F::Entity) {
        self.state.send_modify(|state| {
            state.pending_delete = Some(entity);
            state.show_delete_dialog = true;
        });
    }

    /// Close the delete dialog without deleting anything.
    pub fn cancel_delete(&self) {
        self.state.send_modify(|state| {
            state.pending_delete = None;
            state.show_delete_dialog = false;
        });
    }

    /// Delete the record waiting for confirmation, if any.
    ///
    /// Emits a toast on success and resets the form if it was editing the deleted record.
    /// On failure a snackbar is emitted and nothing else changes. Either way the dialog closes.
    /// The pending record is taken when the call starts, so overlapping calls delete it once.
    pub async fn confirm_delete(&self) {
        let mut pending_delete = None;

        self.state.send_if_modified(|state| {
            pending_delete = state.pending_delete.take();
            pending_delete.is_some()
        });

        let Some(entity) = pending_delete else {
            return;
        };

        let repository = self.repository.clone();
        let target = entity.clone();

        match run_blocking(move || repository.delete(&target)).await {
            Ok(()) => {
                tracing::info!("{}: deleted record {:?}", self.name, entity.id());
                self.events.send(UiEvent::toast(MessageRef::DeletedSuccessfully));

                self.state.send_modify(|state| {
                    if entity.id().is_some() && state.form.id() == entity.id() {
                        state.form = F::default();
                        state.form_error = None;
                    }
                });
            }
            Err(error) => {
                tracing::error!(
                    "{}: could not delete record {:?}: {error}",
                    self.name,
                    entity.id()
                );
                self.events.send(UiEvent::snackbar(MessageRef::DeleteFailed));
            }
        }

        self.cancel_delete();
    }

    /// Validate the form and save it.
    ///
    /// Does nothing if a save is already in flight. Validation errors are shown on their field,
    /// storage errors on the whole form. On success the form is reset and a snackbar emitted.
    pub async fn save(&self) {
        let mut form = None;

        self.state.send_if_modified(|state| {
            if state.form.is_saving() {
                return false;
            }

            state.form.set_saving(true);
            state.form_error = None;
            form = Some(state.form.clone());
            true
        });

        let Some(form) = form else {
            tracing::debug!("{}: save already in progress, ignoring", self.name);
            return;
        };

        let outcome = match form.validate() {
            Ok(entity) => {
                let repository = self.repository.clone();
                run_blocking(move || repository.save(&entity)).await
            }
            Err(error) => Err(error),
        };

        match outcome {
            Ok(id) => {
                tracing::info!("{}: saved record {id}", self.name);
                self.events.send(UiEvent::snackbar(MessageRef::SavedSuccessfully));

                self.state.send_modify(|state| {
                    state.form = F::default();
                    state.form_error = None;
                });
            }
            Err(error) if error.is_validation() => {
                tracing::debug!("{}: form is not valid: {error}", self.name);

                self.state.send_modify(|state| {
                    if !state.form.show_error(&error) {
                        state.form_error = Some(error.message());
                    }
                });
            }
            Err(error @ Error::ConstraintViolation { .. }) => {
                tracing::error!("{}: {error}", self.name);
                let message = error.message();

                self.state
                    .send_modify(|state| state.form_error = Some(message));
            }
            Err(error) => {
                tracing::error!("{}: unexpected error while saving: {error}", self.name);

                self.state
                    .send_modify(|state| state.form_error = Some(MessageRef::OperationFailed));
            }
        }

        self.state.send_modify(|state| state.form.set_saving(false));
    }
}

impl<F, R> Drop for ScreenController<F, R>
where
    F: EntityForm,
    R: Repository<Entity = F::Entity>,
{
    fn drop(&mut self) {
        self.collector.abort();
    }
}

fn apply_collected<F: EntityForm>(
    state: &watch::Sender<ScreenState<F>>,
    collected: Collected<Vec<F::Entity>>,
    name: &str,
) {
    match collected {
        Collected::Started => state.send_modify(|state| {
            state.is_loading = true;
            state.form_error = None;
        }),
        Collected::Snapshot(items) => state.send_modify(|state| {
            state.is_loading = false;
            state.items = items;
        }),
        Collected::Failed(error) => {
            tracing::error!("{name}: could not load records: {error}");

            state.send_modify(|state| {
                state.is_loading = false;
                state.form_error = Some(MessageRef::LoadFailed);
            });
        }
    }
}
