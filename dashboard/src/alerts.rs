use crate::model::{Alert, Severity};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use uuid::Uuid;

/// Alerts kept in the list; older ones fall off the tail
pub const ALERT_LIST_CAPACITY: usize = 50;

pub const BANNER_DURATION: Duration = Duration::from_secs(10);
pub const POPUP_DURATION: Duration = Duration::from_secs(5);

const CRITICAL_WEIGHT: f64 = 0.2;
const WARNING_WEIGHT: f64 = 0.5;

const CRITICAL_MESSAGES: [&str; 4] = [
    "Critical: Soil erosion detected in Sector C",
    "Critical: Water level rising rapidly",
    "Critical: Structural integrity compromised",
    "Critical: Power failure in Node 7",
];

const WARNING_MESSAGES: [&str; 4] = [
    "Warning: High humidity levels detected",
    "Warning: Wind gusts exceeding 50 km/h",
    "Warning: Temperature fluctuation detected",
    "Warning: Network latency increasing",
];

const INFO_MESSAGES: [&str; 4] = [
    "Info: Data sync completed successfully",
    "Info: Backup system activated",
    "Info: New firmware update available",
    "Info: Scheduled maintenance in 2 hours",
];

/// Alerts raised shortly after start-up, with their delay from launch
pub const SAMPLE_ALERTS: [(Duration, Severity, &str); 4] = [
    (
        Duration::from_secs(1),
        Severity::Critical,
        "Soil moisture level critically low in Sector B",
    ),
    (
        Duration::from_secs(2),
        Severity::Warning,
        "Wind speed exceeding safe threshold",
    ),
    (
        Duration::from_secs(3),
        Severity::Info,
        "New device connected to network",
    ),
    (
        Duration::from_secs(4),
        Severity::Warning,
        "Temperature sensor calibration required",
    ),
];

pub fn message_pool(severity: Severity) -> &'static [&'static str] {
    match severity {
        Severity::Critical => &CRITICAL_MESSAGES,
        Severity::Warning => &WARNING_MESSAGES,
        Severity::Info => &INFO_MESSAGES,
    }
}

/// Maps a uniform roll in [0, 1) onto critical 20%, warning 50%, info 30%
pub fn severity_for_roll(roll: f64) -> Severity {
    if roll < CRITICAL_WEIGHT {
        Severity::Critical
    } else if roll < CRITICAL_WEIGHT + WARNING_WEIGHT {
        Severity::Warning
    } else {
        Severity::Info
    }
}

/// One injector firing: with `probability`, picks a severity and a message.
pub fn roll_random_alert(rng: &mut impl Rng, probability: f64) -> Option<(Severity, &'static str)> {
    if !rng.gen_bool(probability.clamp(0.0, 1.0)) {
        return None;
    }

    let severity = severity_for_roll(rng.gen::<f64>());
    let message = *message_pool(severity).choose(rng)?;
    Some((severity, message))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertCounters {
    pub critical: u64,
    pub warning: u64,
    pub info: u64,
}

impl AlertCounters {
    fn increment(&mut self, severity: Severity) {
        let slot = match severity {
            Severity::Critical => &mut self.critical,
            Severity::Warning => &mut self.warning,
            Severity::Info => &mut self.info,
        };
        *slot = slot.saturating_add(1);
    }

    /// Header badge: everything that needs attention
    pub fn attention(&self) -> u64 {
        self.critical + self.warning
    }
}

/// Newest-first alert list with session counters
#[derive(Debug, Clone)]
pub struct AlertLog {
    entries: VecDeque<Alert>,
    counters: AlertCounters,
    capacity: usize,
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::with_capacity(ALERT_LIST_CAPACITY)
    }
}

impl AlertLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            counters: AlertCounters::default(),
            capacity,
        }
    }

    /// Records an alert at the head of the list and returns it
    pub fn push(&mut self, message: impl Into<String>, severity: Severity, now: DateTime<Utc>) -> Alert {
        self.counters.increment(severity);

        let alert = Alert {
            id: Uuid::new_v4(),
            severity,
            message: message.into(),
            created_at: now,
        };

        self.entries.push_front(alert.clone());
        self.entries.truncate(self.capacity);
        alert
    }

    pub fn counters(&self) -> AlertCounters {
        self.counters
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest first, optionally restricted to one severity
    pub fn list(&self, severity: Option<Severity>) -> Vec<Alert> {
        self.entries
            .iter()
            .filter(|a| severity.map_or(true, |s| a.severity == s))
            .cloned()
            .collect()
    }
}
