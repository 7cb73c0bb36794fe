//! The list, form and delete dialog pattern shared by the category and payment method screens.
//!
//! A feature plugs in its entity through [Repository] (how records are stored) and
//! [EntityForm] (how user input becomes a valid record), and gets a [ScreenController] that
//! owns the screen's state.

mod controller;

use std::fmt::Debug;

pub use controller::ScreenController;

use crate::{DatabaseId, Error, LiveQuery, MessageRef};

/// A record that may have been assigned a database ID.
pub trait Identified {
    /// The record's ID, or `None` if it has not been saved yet.
    fn id(&self) -> Option<DatabaseId>;
}

/// Stores the records for one screen.
pub trait Repository: Clone + Send + Sync + 'static {
    /// The record type.
    type Entity: Identified + Clone + Send + Sync + 'static;

    /// Every stored record, re-read whenever the table changes.
    fn observe_all(&self) -> LiveQuery<Vec<Self::Entity>>;

    /// Insert `entity`, or replace the stored record with the same ID. Returns the record's ID.
    ///
    /// # Errors
    /// Returns [Error::ConstraintViolation] if the write breaks a constraint such as a unique
    /// name, in which case nothing is written.
    fn save(&self, entity: &Self::Entity) -> Result<DatabaseId, Error>;

    /// Remove the stored record with the same ID as `entity`, if there is one.
    fn delete(&self, entity: &Self::Entity) -> Result<(), Error>;
}

/// The unsaved edit buffer for one record, with an error slot per field.
pub trait EntityForm: Default + Clone + Debug + PartialEq + Send + Sync + 'static {
    /// The record the form edits.
    type Entity: Identified + Clone + Debug + PartialEq + Send + Sync + 'static;

    /// A change to a single field.
    type Change: Debug + Send;

    /// The ID of the record being edited, `None` when creating a new one.
    fn id(&self) -> Option<DatabaseId>;

    /// Whether a save is in flight.
    fn is_saving(&self) -> bool;

    /// Set the in-flight flag.
    fn set_saving(&mut self, is_saving: bool);

    /// Apply `change` and clear the changed field's error.
    fn apply(&mut self, change: Self::Change);

    /// A form filled in with `entity`'s values and no errors.
    fn from_entity(entity: &Self::Entity) -> Self;

    /// Run the validation rules in order and build the record.
    ///
    /// # Errors
    /// Returns the first validation error found.
    fn validate(&self) -> Result<Self::Entity, Error>;

    /// Show `error` on the field it belongs to.
    ///
    /// Returns `false` if no field owns the error, so it should be shown for the whole form.
    fn show_error(&mut self, error: &Error) -> bool;
}

/// Everything a screen needs to draw itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenState<F: EntityForm> {
    /// The stored records, kept up to date while the state is observed.
    pub items: Vec<F::Entity>,
    /// The record being created or edited.
    pub form: F,
    /// Whether the records are still being loaded.
    pub is_loading: bool,
    /// The record waiting for the user to confirm its deletion.
    pub pending_delete: Option<F::Entity>,
    /// Whether the delete confirmation dialog is open.
    pub show_delete_dialog: bool,
    /// An error for the whole form rather than one field.
    pub form_error: Option<MessageRef>,
}

impl<F: EntityForm> Default for ScreenState<F> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            form: F::default(),
            is_loading: false,
            pending_delete: None,
            show_delete_dialog: false,
            form_error: None,
        }
    }
}
