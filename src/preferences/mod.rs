//! User preferences stored alongside the app's data.

mod controller;
mod db;
mod theme;

pub use controller::ThemeController;
pub use db::{SQLitePreferencesRepository, THEME_KEY, create_preferences_table};
pub use theme::ThemePreference;
