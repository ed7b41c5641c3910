//! Connection configuration.
//!
//! A small serde-friendly struct so embedding applications can carry the
//! engine settings inside their own configuration files.

use serde::{Deserialize, Serialize};

use crate::coerce::Mode;

/// Constructor-time settings for a [`crate::Connection`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Coercion mode for every render on this connection.
    pub mode: Mode,
    /// Whether executed queries accumulate in the diagnostics log.
    pub store_queries: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Transform,
            store_queries: true,
        }
    }
}
