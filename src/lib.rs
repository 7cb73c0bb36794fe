//! CatsVerse is a personal finance app for keeping track of where money comes from and goes.
//!
//! This library provides the app's core: local storage of categories and payment methods,
//! the screen controllers that turn user input into validated saves and deletes, the one-shot
//! UI events those controllers emit, and the persisted theme preference.

#![warn(missing_docs)]

mod app_state;
mod category;
mod color;
mod config;
mod database_id;
mod db;
mod icon;
mod live_query;
mod logging;
mod message;
mod name;
mod payment_method;
mod preferences;
mod screen;
mod sharing;
mod ui_event;

pub use app_state::AppState;
pub use category::{
    Category, CategoryChange, CategoryController, CategoryForm, CategoryKind, CategoryRecord,
    SQLiteCategoryRepository, validate_category_color,
};
pub use color::Argb;
pub use config::AppConfig;
pub use database_id::DatabaseId;
pub use db::{SCHEMA_VERSION, initialize as initialize_db};
pub use icon::{CategoryIcon, Icon, PaymentMethodIcon};
pub use live_query::{ChangeNotifier, LiveQuery};
pub use logging::setup_logging;
pub use message::MessageRef;
pub use name::EntityName;
pub use payment_method::{
    PaymentMethod, PaymentMethodChange, PaymentMethodController, PaymentMethodForm,
    PaymentMethodRecord, SQLitePaymentMethodRepository,
};
pub use preferences::{SQLitePreferencesRepository, THEME_KEY, ThemeController, ThemePreference};
pub use screen::{EntityForm, Identified, Repository, ScreenController, ScreenState};
pub use sharing::{StateObserver, WhileSubscribed};
pub use ui_event::{EventReceiver, EventSender, UiEvent, event_channel};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty or whitespace-only string was used as a name.
    #[error("name cannot be empty")]
    EmptyName,

    /// An expense category was saved without a color.
    #[error("expense categories need a color")]
    MissingColorForExpense,

    /// An income category was saved without a color, or with a fully transparent one.
    #[error("income categories need a color that is not transparent")]
    MissingColorForIncome,

    /// A stored category type could not be parsed.
    #[error("\"{0}\" is not a valid category type")]
    InvalidCategoryKind(String),

    /// A stored theme preference could not be parsed.
    #[error("\"{0}\" is not a valid theme preference")]
    InvalidThemePreference(String),

    /// A write was rejected by a database constraint, e.g. a duplicate name.
    ///
    /// `message` is the message to show the user, `cause` is the original SQL error and should
    /// only be logged.
    #[error("could not save \"{name}\": {cause}")]
    ConstraintViolation {
        /// The message to show the user.
        message: MessageRef,
        /// The name of the record that could not be saved.
        name: String,
        /// The underlying SQL error.
        #[source]
        cause: rusqlite::Error,
    },

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A background task panicked or was cancelled before finishing.
    #[error("background task failed: {0}")]
    TaskFailed(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl Error {
    /// The message to show the user for this error.
    ///
    /// Errors that are not meant for the user map to [MessageRef::OperationFailed].
    pub fn message(&self) -> MessageRef {
        match self {
            Error::EmptyName => MessageRef::EmptyName,
            Error::MissingColorForExpense => MessageRef::ColorRequiredForExpense,
            Error::MissingColorForIncome => MessageRef::ColorRequiredForIncome,
            Error::ConstraintViolation { message, .. } => *message,
            _ => MessageRef::OperationFailed,
        }
    }

    /// Whether the error was raised by a validation rule before touching the database.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::EmptyName | Error::MissingColorForExpense | Error::MissingColorForIncome
        )
    }

    /// Map constraint failures from a write of the record called `name` to
    /// [Error::ConstraintViolation], and everything else to [Error::SqlError].
    pub(crate) fn from_write(error: rusqlite::Error, name: &str) -> Self {
        match error {
            rusqlite::Error::SqliteFailure(sql_error, description)
                if sql_error.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                tracing::error!("could not save \"{name}\" due to a constraint: {sql_error}");
                Error::ConstraintViolation {
                    message: MessageRef::SaveFailed,
                    name: name.to_owned(),
                    cause: rusqlite::Error::SqliteFailure(sql_error, description),
                }
            }
            error => error.into(),
        }
    }
}
