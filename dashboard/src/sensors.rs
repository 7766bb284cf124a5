use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    Online,
    Warning,
    Offline,
}

impl SensorStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SensorStatus::Online => "online",
            SensorStatus::Warning => "warning",
            SensorStatus::Offline => "offline",
        }
    }

    /// Marker color on the map
    pub fn marker_color(self) -> &'static str {
        match self {
            SensorStatus::Online => "green",
            SensorStatus::Warning => "orange",
            SensorStatus::Offline => "red",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Sensor {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub status: SensorStatus,
}

pub const SENSORS: [Sensor; 4] = [
    Sensor {
        name: "Central Hub",
        lat: 19.0760,
        lng: 72.8777,
        status: SensorStatus::Online,
    },
    Sensor {
        name: "Thane Node",
        lat: 19.2183,
        lng: 72.9781,
        status: SensorStatus::Online,
    },
    Sensor {
        name: "Navi Mumbai Node",
        lat: 19.0330,
        lng: 73.0297,
        status: SensorStatus::Warning,
    },
    Sensor {
        name: "South Mumbai Node",
        lat: 18.9220,
        lng: 72.8347,
        status: SensorStatus::Offline,
    },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCounts {
    pub online: usize,
    pub warning: usize,
    pub offline: usize,
}

impl DeviceCounts {
    pub fn from_sensors(sensors: &[Sensor]) -> Self {
        sensors.iter().fold(Self::default(), |mut counts, s| {
            match s.status {
                SensorStatus::Online => counts.online += 1,
                SensorStatus::Warning => counts.warning += 1,
                SensorStatus::Offline => counts.offline += 1,
            }
            counts
        })
    }

    pub fn total(&self) -> usize {
        self.online + self.warning + self.offline
    }
}

/// Slice of the device-status doughnut
#[derive(Debug, Clone, Serialize)]
pub struct StatusSlice {
    pub label: &'static str,
    pub count: usize,
    pub color: &'static str,
}

pub fn status_slices(counts: &DeviceCounts) -> Vec<StatusSlice> {
    vec![
        StatusSlice {
            label: "Online",
            count: counts.online,
            color: "#22c55e",
        },
        StatusSlice {
            label: "Warning",
            count: counts.warning,
            color: "#eab308",
        },
        StatusSlice {
            label: "Offline",
            count: counts.offline,
            color: "#ef4444",
        },
    ]
}
