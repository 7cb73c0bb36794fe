//! Wires the database, repositories and controllers together.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    AppConfig, CategoryController, Error, PaymentMethodController, SQLiteCategoryRepository,
    SQLitePaymentMethodRepository, SQLitePreferencesRepository, ThemeController, db::initialize,
};

/// The app's shared state: one repository per table over a single database connection.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The settings used to build controllers.
    pub config: AppConfig,

    /// The category store.
    pub category_repository: SQLiteCategoryRepository,

    /// The payment method store.
    pub payment_method_repository: SQLitePaymentMethodRepository,

    /// The preference store.
    pub preferences_repository: SQLitePreferencesRepository,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, config: AppConfig) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            config,
            category_repository: SQLiteCategoryRepository::new(connection.clone()),
            payment_method_repository: SQLitePaymentMethodRepository::new(connection.clone()),
            preferences_repository: SQLitePreferencesRepository::new(connection),
        })
    }

    /// A controller for the category screen. Must be called from within a Tokio runtime.
    pub fn category_controller(&self) -> CategoryController {
        CategoryController::new(
            self.category_repository.clone(),
            self.config.sharing,
            "category",
        )
    }

    /// A controller for the payment method screen. Must be called from within a Tokio runtime.
    pub fn payment_method_controller(&self) -> PaymentMethodController {
        PaymentMethodController::new(
            self.payment_method_repository.clone(),
            self.config.sharing,
            "payment_method",
        )
    }

    /// A controller for the theme preference. Must be called from within a Tokio runtime.
    pub fn theme_controller(&self) -> ThemeController {
        ThemeController::new(self.preferences_repository.clone(), self.config.sharing)
    }
}
