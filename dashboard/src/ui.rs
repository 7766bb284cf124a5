use crate::errors::{Error, Result};
use crate::model::{Metric, SeriesPoint};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

const SMOOTH_TENSION: f64 = 0.3;
const POINT_RADIUS: u32 = 2;
const MAX_ZOOM_SCALE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                grid: "rgba(0,0,0,0.1)",
                text: "#0b2340",
                toggle_icon: "fas fa-moon",
                toggle_label: "Dark Mode",
            },
            Theme::Dark => Palette {
                grid: "rgba(255,255,255,0.1)",
                text: "#e8f4ff",
                toggle_icon: "fas fa-sun",
                toggle_label: "Light Mode",
            },
        }
    }
}

/// Chart and toggle-button colors for a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub grid: &'static str,
    pub text: &'static str,
    pub toggle_icon: &'static str,
    /// The button offers the other mode
    pub toggle_label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Dashboard,
    Alerts,
    Devices,
    Settings,
}

impl Page {
    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Disaster Monitoring Dashboard",
            Page::Alerts => "Alert History",
            Page::Devices => "Connected Devices",
            Page::Settings => "Settings",
        }
    }
}

impl FromStr for Page {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "dashboard" => Ok(Page::Dashboard),
            "alerts" => Ok(Page::Alerts),
            "devices" => Ok(Page::Devices),
            "settings" => Ok(Page::Settings),
            other => Err(Error::UnknownPage(other.to_string())),
        }
    }
}

/// Visible x-axis window, as indices into the series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomWindow {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub smooth: bool,
    pub show_points: bool,
    pub zoom: Option<ZoomWindow>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            smooth: true,
            show_points: true,
            zoom: None,
        }
    }
}

impl ChartStyle {
    pub fn tension(&self) -> f64 {
        if self.smooth {
            SMOOTH_TENSION
        } else {
            0.0
        }
    }

    pub fn point_radius(&self) -> u32 {
        if self.show_points {
            POINT_RADIUS
        } else {
            0
        }
    }
}

/// Slowest telemetry refresh the UI accepts, in seconds
pub const MAX_REFRESH_SECS: u64 = 3600;

/// Ephemeral presentation state; nothing here outlives the process.
#[derive(Debug, Clone)]
pub struct UiState {
    pub theme: Theme,
    pub sidebar_collapsed: bool,
    pub mobile_menu_open: bool,
    pub page: Page,
    pub refresh_ms: u64,
    charts: HashMap<Metric, ChartStyle>,
}

impl UiState {
    pub fn new(refresh_ms: u64) -> Self {
        Self {
            theme: Theme::default(),
            sidebar_collapsed: false,
            mobile_menu_open: false,
            page: Page::default(),
            refresh_ms,
            charts: Metric::ALL
                .iter()
                .map(|m| (*m, ChartStyle::default()))
                .collect(),
        }
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_collapsed = !self.sidebar_collapsed;
        self.sidebar_collapsed
    }

    pub fn toggle_mobile_menu(&mut self) -> bool {
        self.mobile_menu_open = !self.mobile_menu_open;
        self.mobile_menu_open
    }

    /// Switching page also closes the mobile menu
    pub fn switch_page(&mut self, page: Page) {
        self.page = page;
        self.mobile_menu_open = false;
    }

    pub fn chart(&self, metric: Metric) -> ChartStyle {
        self.charts.get(&metric).cloned().unwrap_or_default()
    }

    fn chart_mut(&mut self, metric: Metric) -> &mut ChartStyle {
        self.charts.entry(metric).or_default()
    }

    /// `None` applies the setting to every chart
    pub fn set_smoothing(&mut self, metric: Option<Metric>, enabled: bool) {
        for m in targets(metric) {
            self.chart_mut(m).smooth = enabled;
        }
    }

    pub fn set_points(&mut self, metric: Option<Metric>, enabled: bool) {
        for m in targets(metric) {
            self.chart_mut(m).show_points = enabled;
        }
    }

    /// Zooms the x-axis to `start..end` of a series holding `len` points.
    pub fn zoom(&mut self, metric: Metric, start: usize, end: usize, len: usize) -> Result<ZoomWindow> {
        let min_width = len.div_ceil(MAX_ZOOM_SCALE).max(1);
        if start >= end || end > len || end - start < min_width {
            return Err(Error::InvalidZoom { start, end, len });
        }

        let window = ZoomWindow { start, end };
        self.chart_mut(metric).zoom = Some(window);
        Ok(window)
    }

    pub fn reset_zoom(&mut self, metric: Metric) {
        self.chart_mut(metric).zoom = None;
    }
}

fn targets(metric: Option<Metric>) -> Vec<Metric> {
    match metric {
        Some(m) => vec![m],
        None => Metric::ALL.to_vec(),
    }
}

/// Dataset description for one line chart
#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub metric: Metric,
    pub label: &'static str,
    pub border_color: &'static str,
    pub background_color: &'static str,
    pub tension: f64,
    pub point_radius: u32,
    pub zoom: Option<ZoomWindow>,
    pub points: Vec<SeriesPoint>,
}

impl ChartView {
    pub fn new(metric: Metric, style: &ChartStyle, points: Vec<SeriesPoint>) -> Self {
        Self {
            metric,
            label: metric.label(),
            border_color: metric.border_color(),
            background_color: metric.fill_color(),
            tension: style.tension(),
            point_radius: style.point_radius(),
            zoom: style.zoom,
            points,
        }
    }
}

/// Detached copy of a chart shown in the fullscreen modal
#[derive(Debug, Clone, Serialize)]
pub struct FullscreenChart {
    pub title: &'static str,
    pub aspect_ratio: f64,
    pub legend_position: &'static str,
    pub chart: ChartView,
}

impl FullscreenChart {
    pub fn clone_of(chart: &ChartView) -> Self {
        Self {
            title: chart.metric.trend_title(),
            aspect_ratio: 1.8,
            legend_position: "top",
            chart: chart.clone(),
        }
    }
}
