//! Key-value preference storage.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension};

use crate::{ChangeNotifier, Error, LiveQuery, db::lock, preferences::ThemePreference};

/// The key the theme preference is stored under.
pub const THEME_KEY: &str = "PREFERENCIA_TEMA";

/// Create the preferences table.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_preferences_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS preferencias (
            chave TEXT PRIMARY KEY,
            valor TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn get_preference(key: &str, connection: &Connection) -> Result<Option<String>, Error> {
    connection
        .prepare("SELECT valor FROM preferencias WHERE chave = ?1")?
        .query_row([key], |row| row.get(0))
        .optional()
        .map_err(|error| error.into())
}

fn set_preference(key: &str, value: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO preferencias (chave, valor) VALUES (?1, ?2)
        ON CONFLICT(chave) DO UPDATE SET valor = excluded.valor",
        (key, value),
    )?;

    Ok(())
}

/// Reads the theme preference, treating missing or unreadable values as
/// [ThemePreference::System].
fn get_theme(connection: &Connection) -> Result<ThemePreference, Error> {
    let Some(value) = get_preference(THEME_KEY, connection)? else {
        return Ok(ThemePreference::default());
    };

    match value.parse() {
        Ok(theme) => Ok(theme),
        Err(error) => {
            tracing::warn!("ignoring stored theme preference: {error}");
            Ok(ThemePreference::default())
        }
    }
}

/// Stores preferences in SQLite and wakes live queries after every write.
#[derive(Debug, Clone)]
pub struct SQLitePreferencesRepository {
    connection: Arc<Mutex<Connection>>,
    notifier: ChangeNotifier,
}

impl SQLitePreferencesRepository {
    /// Create a repository over an initialized database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            connection,
            notifier: ChangeNotifier::new(),
        }
    }

    /// The stored theme preference.
    pub fn get_theme(&self) -> Result<ThemePreference, Error> {
        get_theme(&*lock(&self.connection)?)
    }

    /// Store `theme`, replacing the previous choice.
    pub fn set_theme(&self, theme: ThemePreference) -> Result<(), Error> {
        set_preference(THEME_KEY, theme.as_str(), &*lock(&self.connection)?)?;
        self.notifier.notify();

        Ok(())
    }

    /// The stored theme preference, re-read whenever it is changed.
    pub fn observe_theme(&self) -> LiveQuery<ThemePreference> {
        let connection = self.connection.clone();

        self.notifier
            .live_query(move || get_theme(&*lock(&connection)?))
    }
}
