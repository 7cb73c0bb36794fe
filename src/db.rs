//! Database setup and helpers shared by the repositories.

use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error, category::create_category_table, payment_method::create_payment_method_table,
    preferences::create_preferences_table,
};

/// The version of the database schema created by [initialize].
pub const SCHEMA_VERSION: i32 = 1;

/// Create the tables for the domain models if they do not exist yet, and record the schema
/// version.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    create_category_table(&transaction)?;
    create_payment_method_table(&transaction)?;
    create_preferences_table(&transaction)?;
    transaction.pragma_update(None, "user_version", SCHEMA_VERSION)?;

    transaction.commit()?;

    Ok(())
}

/// Lock the shared connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if another thread panicked while holding the lock.
pub(crate) fn lock(connection: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, Error> {
    connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

/// Run blocking database work on Tokio's blocking thread pool.
///
/// # Errors
/// Returns the work's own error, or [Error::TaskFailed] if the work panicked.
pub(crate) async fn run_blocking<T, W>(work: W) -> Result<T, Error>
where
    T: Send + 'static,
    W: FnOnce() -> Result<T, Error> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|error| Error::TaskFailed(error.to_string()))?
}
