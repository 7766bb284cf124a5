use crate::alerts::{AlertCounters, AlertLog};
use crate::errors::{Error, Result};
use crate::model::{Alert, Metric, Reading, Severity};
use crate::risk::{assess, RiskAssessment};
use crate::sensors::{status_slices, DeviceCounts, StatusSlice, SENSORS};
use crate::series::SeriesBuffer;
use crate::ui::{ChartView, FullscreenChart, Page, Palette, Theme, UiState, MAX_REFRESH_SECS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Numeric card above each chart
#[derive(Debug, Clone, Serialize)]
pub struct Readout {
    pub metric: Metric,
    pub value: f64,
    pub display: String,
}

/// Banner or popup currently on screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub alert_id: Uuid,
    pub severity: Severity,
    pub message: String,
    pub color: &'static str,
}

impl Notice {
    fn for_alert(alert: &Alert) -> Self {
        Self {
            alert_id: alert.id,
            severity: alert.severity,
            message: alert.message.clone(),
            color: alert.severity.color(),
        }
    }
}

/// Control operations coming from the browser
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UiAction {
    ToggleTheme,
    ToggleSidebar,
    ToggleMobileMenu,
    SwitchPage { page: Page },
    SetRefreshRate { seconds: u64 },
    SetSmoothing { metric: Option<Metric>, enabled: bool },
    SetPoints { metric: Option<Metric>, enabled: bool },
    Zoom { metric: Metric, start: usize, end: usize },
    ResetZoom { metric: Metric },
}

#[derive(Debug, Clone, Serialize)]
pub struct UiSnapshot {
    pub theme: Theme,
    pub palette: Palette,
    pub sidebar_collapsed: bool,
    pub mobile_menu_open: bool,
    pub page: Page,
    pub page_title: &'static str,
    pub refresh_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub ticks: u64,
    pub readouts: Vec<Readout>,
    pub risk: RiskAssessment,
    pub charts: Vec<ChartView>,
    pub devices: DeviceCounts,
    pub device_status: Vec<StatusSlice>,
    pub alert_counts: AlertCounters,
    /// Critical plus warning alerts, shown on the header badge
    pub attention: u64,
    pub alerts: Vec<Alert>,
    pub banner: Option<Notice>,
    pub popup: Option<Notice>,
    pub ui: UiSnapshot,
}

/// All dashboard state. Owned by the controller task and never shared.
#[derive(Debug)]
pub struct Dashboard {
    ticks: u64,
    latest: Option<Reading>,
    series: HashMap<Metric, SeriesBuffer>,
    risk: RiskAssessment,
    alerts: AlertLog,
    banner: Option<Notice>,
    popup: Option<Notice>,
    devices: DeviceCounts,
    pub ui: UiState,
}

impl Dashboard {
    pub fn new(refresh_ms: u64) -> Self {
        Self {
            ticks: 0,
            latest: None,
            series: Metric::ALL
                .iter()
                .map(|m| (*m, SeriesBuffer::default()))
                .collect(),
            risk: RiskAssessment::default(),
            alerts: AlertLog::default(),
            banner: None,
            popup: None,
            devices: DeviceCounts::from_sensors(&SENSORS),
            ui: UiState::new(refresh_ms),
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn risk(&self) -> &RiskAssessment {
        &self.risk
    }

    pub fn series(&self, metric: Metric) -> Option<&SeriesBuffer> {
        self.series.get(&metric)
    }

    /// Feeds one telemetry tick through readouts, risk and series.
    pub fn apply_reading(&mut self, reading: Reading) -> &RiskAssessment {
        self.risk = assess(reading.soil, reading.humidity);

        for metric in Metric::ALL {
            self.series
                .entry(metric)
                .or_default()
                .push(reading.label.clone(), reading.value(metric));
        }

        self.latest = Some(reading);
        self.ticks += 1;
        &self.risk
    }

    /// Records an alert; critical ones also raise the banner. Every alert pops up.
    pub fn raise(&mut self, message: impl Into<String>, severity: Severity, now: DateTime<Utc>) -> Alert {
        let alert = self.alerts.push(message, severity, now);

        if severity == Severity::Critical {
            self.banner = Some(Notice::for_alert(&alert));
        }
        self.popup = Some(Notice::for_alert(&alert));

        alert
    }

    /// Hides the banner if it still shows `alert_id`
    pub fn hide_banner(&mut self, alert_id: Uuid) -> bool {
        hide_if_current(&mut self.banner, alert_id)
    }

    pub fn hide_popup(&mut self, alert_id: Uuid) -> bool {
        hide_if_current(&mut self.popup, alert_id)
    }

    pub fn alerts(&self, severity: Option<Severity>) -> Vec<Alert> {
        self.alerts.list(severity)
    }

    pub fn alert_counts(&self) -> AlertCounters {
        self.alerts.counters()
    }

    /// Applies a UI action. Refresh-rate changes only update the stored
    /// interval; restarting the timer is up to the caller.
    pub fn apply_ui(&mut self, action: &UiAction) -> Result<()> {
        match action {
            UiAction::ToggleTheme => {
                self.ui.toggle_theme();
            }
            UiAction::ToggleSidebar => {
                self.ui.toggle_sidebar();
            }
            UiAction::ToggleMobileMenu => {
                self.ui.toggle_mobile_menu();
            }
            UiAction::SwitchPage { page } => self.ui.switch_page(*page),
            UiAction::SetRefreshRate { seconds } => {
                if !(1..=MAX_REFRESH_SECS).contains(seconds) {
                    return Err(Error::InvalidRefreshRate(*seconds));
                }
                self.ui.refresh_ms = seconds * 1000;
            }
            UiAction::SetSmoothing { metric, enabled } => self.ui.set_smoothing(*metric, *enabled),
            UiAction::SetPoints { metric, enabled } => self.ui.set_points(*metric, *enabled),
            UiAction::Zoom { metric, start, end } => {
                let len = self.series(*metric).map_or(0, SeriesBuffer::len);
                self.ui.zoom(*metric, *start, *end, len)?;
            }
            UiAction::ResetZoom { metric } => self.ui.reset_zoom(*metric),
        }
        Ok(())
    }

    pub fn chart(&self, metric: Metric) -> ChartView {
        let points = self.series(metric).map(SeriesBuffer::to_vec).unwrap_or_default();
        ChartView::new(metric, &self.ui.chart(metric), points)
    }

    pub fn fullscreen(&self, metric: Metric) -> FullscreenChart {
        FullscreenChart::clone_of(&self.chart(metric))
    }

    pub fn ui_snapshot(&self) -> UiSnapshot {
        UiSnapshot {
            theme: self.ui.theme,
            palette: self.ui.theme.palette(),
            sidebar_collapsed: self.ui.sidebar_collapsed,
            mobile_menu_open: self.ui.mobile_menu_open,
            page: self.ui.page,
            page_title: self.ui.page.title(),
            refresh_ms: self.ui.refresh_ms,
        }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let readouts = match &self.latest {
            Some(reading) => Metric::ALL
                .iter()
                .map(|m| Readout {
                    metric: *m,
                    value: reading.value(*m),
                    display: m.format_readout(reading.value(*m)),
                })
                .collect(),
            None => Vec::new(),
        };
        let counts = self.alert_counts();

        DashboardSnapshot {
            generated_at: Utc::now(),
            ticks: self.ticks,
            readouts,
            risk: self.risk.clone(),
            charts: Metric::ALL.iter().map(|m| self.chart(*m)).collect(),
            devices: self.devices,
            device_status: status_slices(&self.devices),
            alert_counts: counts,
            attention: counts.attention(),
            alerts: self.alerts.list(None),
            banner: self.banner.clone(),
            popup: self.popup.clone(),
            ui: self.ui_snapshot(),
        }
    }
}

fn hide_if_current(slot: &mut Option<Notice>, alert_id: Uuid) -> bool {
    match slot {
        Some(notice) if notice.alert_id == alert_id => {
            *slot = None;
            true
        }
        _ => false,
    }
}
