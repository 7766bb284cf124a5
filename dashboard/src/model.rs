use crate::errors::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// One of the four simulated environmental metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Soil,
    Humidity,
    Wind,
    #[serde(rename = "temp", alias = "temperature")]
    Temperature,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Soil,
        Metric::Humidity,
        Metric::Wind,
        Metric::Temperature,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Soil => "soil",
            Metric::Humidity => "humidity",
            Metric::Wind => "wind",
            Metric::Temperature => "temp",
        }
    }

    /// Legend label of the line chart
    pub fn label(self) -> &'static str {
        match self {
            Metric::Soil => "Soil Moisture (%)",
            Metric::Humidity => "Humidity (%)",
            Metric::Wind => "Wind Speed (km/h)",
            Metric::Temperature => "Temperature (°C)",
        }
    }

    pub fn trend_title(self) -> &'static str {
        match self {
            Metric::Soil => "Soil Moisture Trend",
            Metric::Humidity => "Humidity Trend",
            Metric::Wind => "Wind Speed Trend",
            Metric::Temperature => "Temperature Trend",
        }
    }

    pub fn border_color(self) -> &'static str {
        match self {
            Metric::Soil => "#22c55e",
            Metric::Humidity => "#0ea5e9",
            Metric::Wind => "#f97316",
            Metric::Temperature => "#ef4444",
        }
    }

    pub fn fill_color(self) -> &'static str {
        match self {
            Metric::Soil => "rgba(34, 197, 94, 0.2)",
            Metric::Humidity => "rgba(14, 165, 233, 0.2)",
            Metric::Wind => "rgba(249, 115, 22, 0.2)",
            Metric::Temperature => "rgba(239, 68, 68, 0.2)",
        }
    }

    /// Rounded value with its display unit, as shown on the readout cards
    pub fn format_readout(self, value: f64) -> String {
        let rounded = value.round() as i64;
        match self {
            Metric::Soil | Metric::Humidity => format!("{}%", rounded),
            Metric::Wind => format!("{} km/h", rounded),
            Metric::Temperature => format!("{}°C", rounded),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "soil" => Ok(Metric::Soil),
            "humidity" => Ok(Metric::Humidity),
            "wind" => Ok(Metric::Wind),
            "temp" | "temperature" => Ok(Metric::Temperature),
            other => Err(Error::UnknownMetric(other.to_string())),
        }
    }
}

/// Alert classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }

    /// Upper-case tag shown in front of the message in the alert list
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Severity::Info => "#0ea5e9",
            Severity::Warning => "#eab308",
            Severity::Critical => "#ef4444",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            other => Err(Error::UnknownSeverity(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub severity: Severity,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// One tick worth of simulated telemetry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    /// Local wall-clock label used on the chart x-axis
    pub label: String,
    pub soil: f64,
    pub humidity: f64,
    pub wind: f64,
    pub temperature: f64,
}

impl Reading {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Soil => self.soil,
            Metric::Humidity => self.humidity,
            Metric::Wind => self.wind,
            Metric::Temperature => self.temperature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}
