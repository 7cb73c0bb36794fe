use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Which color scheme the user wants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum ThemePreference {
    /// Follow the platform setting.
    #[default]
    System,
    /// Always use the light theme.
    Light,
    /// Always use the dark theme.
    Dark,
}

impl ThemePreference {
    /// Every theme preference, in the order they are offered to the user.
    pub const ALL: [ThemePreference; 3] = [
        ThemePreference::System,
        ThemePreference::Light,
        ThemePreference::Dark,
    ];

    /// The value stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::System => "SYSTEM",
            ThemePreference::Light => "LIGHT",
            ThemePreference::Dark => "DARK",
        }
    }

    /// Whether to draw the dark theme, given whether the platform is currently dark.
    pub fn use_dark_theme(self, system_is_dark: bool) -> bool {
        match self {
            ThemePreference::System => system_is_dark,
            ThemePreference::Light => false,
            ThemePreference::Dark => true,
        }
    }
}

impl FromStr for ThemePreference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str() == s)
            .ok_or_else(|| Error::InvalidThemePreference(s.to_owned()))
    }
}

impl Display for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
