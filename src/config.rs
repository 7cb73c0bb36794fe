//! Settings for wiring up the app.

use std::time::Duration;

use crate::WhileSubscribed;

/// Settings shared by every controller the app creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppConfig {
    /// How long screens keep their live queries running after the last observer leaves.
    pub sharing: WhileSubscribed,
}

impl AppConfig {
    /// Use `stop_timeout` as the grace period for live queries.
    pub fn with_stop_timeout(stop_timeout: Duration) -> Self {
        Self {
            sharing: WhileSubscribed { stop_timeout },
        }
    }
}
