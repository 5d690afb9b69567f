pub mod bus;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod notification;
pub mod payload;
pub mod translate;
pub mod utils;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::bus::Publisher;

fn default_level() -> f64 {
    4.0
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotifyConfig {
    /// GitHub logins whose events never produce notifications.
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Level stamped onto every published notification.
    #[serde(default = "default_level")]
    pub level: f64,
    /// Directory for rolling log files; console-only when unset.
    pub log_directory: Option<PathBuf>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            level: default_level(),
            log_directory: None,
        }
    }
}

impl NotifyConfig {
    /// Returns true if events from this sender should be dropped.
    pub fn is_ignored(&self, login: &str) -> bool {
        self.ignore.iter().any(|u| u == login)
    }
}

/// Per-process delivery counters, surfaced by the status endpoint.
#[derive(Debug, Default)]
pub struct Stats {
    pub received: AtomicU64,
    pub published: AtomicU64,
    pub suppressed: AtomicU64,
    pub ignored: AtomicU64,
    pub failed: AtomicU64,
}

impl Stats {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

pub struct AppState {
    pub config: NotifyConfig,
    pub publisher: Arc<dyn Publisher>,
    pub stats: Stats,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

pub type SharedState = Arc<AppState>;
