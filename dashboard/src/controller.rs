//! The dashboard controller task.
//!
//! One task owns the [`Dashboard`] state. Timers, the alert injector and HTTP
//! handlers all talk to it through [`Command`]s on a bounded channel, so state
//! is only ever touched from this task.

use crate::alerts::{roll_random_alert, BANNER_DURATION, POPUP_DURATION, SAMPLE_ALERTS};
use crate::dashboard::{Dashboard, DashboardSnapshot, UiAction, UiSnapshot};
use crate::errors::{Error, Result};
use crate::metrics::{
    ALERTS_TOTAL, METRIC_VALUE, REFRESH_INTERVAL_SECONDS, RISK_LEVEL, TICKS_TOTAL,
    TIMER_RESTARTS_TOTAL,
};
use crate::model::{Alert, Metric, Severity};
use crate::scheduler::{self, TaskHandle};
use crate::telemetry::generate_reading_now;
use crate::ui::FullscreenChart;
use chrono::Utc;
use rand::rngs::StdRng;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub refresh: Duration,
    pub alert_interval: Duration,
    pub alert_probability: f64,
    pub sample_alerts: bool,
    pub channel_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            refresh: Duration::from_millis(5000),
            alert_interval: Duration::from_millis(15000),
            alert_probability: 0.15,
            sample_alerts: true,
            channel_capacity: 1024,
        }
    }
}

#[derive(Debug)]
pub enum Command {
    Tick,
    InjectRandomAlert,
    RaiseAlert {
        message: String,
        severity: Severity,
        reply: Option<oneshot::Sender<Alert>>,
    },
    HideBanner(Uuid),
    HidePopup(Uuid),
    Ui {
        action: UiAction,
        reply: oneshot::Sender<Result<UiSnapshot>>,
    },
    Snapshot(oneshot::Sender<DashboardSnapshot>),
    Alerts {
        severity: Option<Severity>,
        reply: oneshot::Sender<Vec<Alert>>,
    },
    Fullscreen {
        metric: Metric,
        reply: oneshot::Sender<FullscreenChart>,
    },
    Shutdown,
}

/// Cloneable sender side used by the HTTP layer
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    tx: mpsc::Sender<Command>,
}

impl ControllerHandle {
    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| Error::ControllerClosed)?;
        rx.await.map_err(|_| Error::ControllerClosed)
    }

    pub async fn snapshot(&self) -> Result<DashboardSnapshot> {
        self.request(Command::Snapshot).await
    }

    pub async fn alerts(&self, severity: Option<Severity>) -> Result<Vec<Alert>> {
        self.request(|reply| Command::Alerts { severity, reply }).await
    }

    pub async fn raise(&self, message: String, severity: Severity) -> Result<Alert> {
        if message.trim().is_empty() {
            return Err(Error::EmptyAlertMessage);
        }
        self.request(|reply| Command::RaiseAlert {
            message,
            severity,
            reply: Some(reply),
        })
        .await
    }

    pub async fn ui(&self, action: UiAction) -> Result<UiSnapshot> {
        self.request(|reply| Command::Ui { action, reply }).await?
    }

    pub async fn fullscreen(&self, metric: Metric) -> Result<FullscreenChart> {
        self.request(|reply| Command::Fullscreen { metric, reply })
            .await
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| Error::ControllerClosed)
    }
}

pub struct Controller {
    dashboard: Dashboard,
    rng: StdRng,
    config: ControllerConfig,
    tx: mpsc::Sender<Command>,
    telemetry_timer: Option<TaskHandle>,
    injector_timer: Option<TaskHandle>,
    banner_timer: Option<TaskHandle>,
    popup_timer: Option<TaskHandle>,
    sample_timers: Vec<TaskHandle>,
}

/// Starts the controller task with its timers.
pub fn spawn(config: ControllerConfig, rng: StdRng) -> (ControllerHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
    let controller = Controller::new(config, rng, tx.clone());
    let task = tokio::spawn(controller.run(rx));
    (ControllerHandle { tx }, task)
}

impl Controller {
    fn new(config: ControllerConfig, rng: StdRng, tx: mpsc::Sender<Command>) -> Self {
        let refresh_ms = u64::try_from(config.refresh.as_millis()).unwrap_or(u64::MAX);
        Self {
            dashboard: Dashboard::new(refresh_ms),
            rng,
            config,
            tx,
            telemetry_timer: None,
            injector_timer: None,
            banner_timer: None,
            popup_timer: None,
            sample_timers: Vec::new(),
        }
    }

    async fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        info!(
            "Starting dashboard controller: refresh={:?}, alert_interval={:?}, alert_probability={}",
            self.config.refresh, self.config.alert_interval, self.config.alert_probability
        );

        self.restart_telemetry(self.config.refresh);
        self.injector_timer = Some(scheduler::every(
            "alert-injector",
            self.config.alert_interval,
            self.tx.clone(),
            || Command::InjectRandomAlert,
        ));
        if self.config.sample_alerts {
            self.schedule_sample_alerts();
        }

        while let Some(command) = rx.recv().await {
            if let Command::Shutdown = command {
                info!("Received shutdown command");
                break;
            }
            self.handle(command);
        }

        self.stop_timers();
        info!("Dashboard controller stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Tick => self.on_tick(),
            Command::InjectRandomAlert => {
                if let Some((severity, message)) =
                    roll_random_alert(&mut self.rng, self.config.alert_probability)
                {
                    self.raise(message.to_string(), severity);
                }
            }
            Command::RaiseAlert {
                message,
                severity,
                reply,
            } => {
                let alert = self.raise(message, severity);
                if let Some(reply) = reply {
                    let _ = reply.send(alert);
                }
            }
            Command::HideBanner(id) => {
                if self.dashboard.hide_banner(id) {
                    debug!("Banner for alert {} hidden", id);
                }
            }
            Command::HidePopup(id) => {
                if self.dashboard.hide_popup(id) {
                    debug!("Popup for alert {} hidden", id);
                }
            }
            Command::Ui { action, reply } => {
                let result = self.apply_ui(action);
                let _ = reply.send(result);
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.dashboard.snapshot());
            }
            Command::Alerts { severity, reply } => {
                let _ = reply.send(self.dashboard.alerts(severity));
            }
            Command::Fullscreen { metric, reply } => {
                let _ = reply.send(self.dashboard.fullscreen(metric));
            }
            Command::Shutdown => {}
        }
    }

    fn on_tick(&mut self) {
        let reading = generate_reading_now(&mut self.rng);
        for metric in Metric::ALL {
            METRIC_VALUE
                .with_label_values(&[metric.as_str()])
                .set(reading.value(metric));
        }

        let previous = self.dashboard.risk().level;
        let level = self.dashboard.apply_reading(reading).level;
        TICKS_TOTAL.inc();
        RISK_LEVEL.set(level.ordinal());

        if level != previous {
            info!("Flood risk changed from {} to {}", previous.as_str(), level.as_str());
        }
        debug!("Tick {} processed", self.dashboard.ticks());
    }

    fn raise(&mut self, message: String, severity: Severity) -> Alert {
        let alert = self.dashboard.raise(message, severity, Utc::now());
        ALERTS_TOTAL.with_label_values(&[severity.as_str()]).inc();

        match severity {
            Severity::Critical => warn!("{}: {}", severity.tag(), alert.message),
            _ => info!("{}: {}", severity.tag(), alert.message),
        }

        // A newer notice replaces the pending hide timer of the older one
        if severity == Severity::Critical {
            self.banner_timer = Some(scheduler::after(
                "banner-hide",
                BANNER_DURATION,
                self.tx.clone(),
                Command::HideBanner(alert.id),
            ));
        }
        self.popup_timer = Some(scheduler::after(
            "popup-hide",
            POPUP_DURATION,
            self.tx.clone(),
            Command::HidePopup(alert.id),
        ));

        alert
    }

    fn apply_ui(&mut self, action: UiAction) -> Result<UiSnapshot> {
        self.dashboard.apply_ui(&action)?;

        if let UiAction::SetRefreshRate { seconds } = action {
            info!("Refresh rate changed to {}s", seconds);
            self.restart_telemetry(Duration::from_secs(seconds));
            TIMER_RESTARTS_TOTAL.inc();
        }

        Ok(self.dashboard.ui_snapshot())
    }

    /// Cancels the running telemetry timer, if any, and starts a new one.
    fn restart_telemetry(&mut self, period: Duration) {
        if let Some(previous) = self.telemetry_timer.take() {
            previous.cancel();
        }
        self.telemetry_timer = Some(scheduler::every(
            "telemetry",
            period,
            self.tx.clone(),
            || Command::Tick,
        ));
        REFRESH_INTERVAL_SECONDS.set(period.as_secs_f64());
    }

    fn schedule_sample_alerts(&mut self) {
        self.sample_timers = SAMPLE_ALERTS
            .iter()
            .map(|(delay, severity, message)| {
                scheduler::after(
                    "sample-alert",
                    *delay,
                    self.tx.clone(),
                    Command::RaiseAlert {
                        message: message.to_string(),
                        severity: *severity,
                        reply: None,
                    },
                )
            })
            .collect();
    }

    fn stop_timers(&mut self) {
        let timers = [
            self.telemetry_timer.take(),
            self.injector_timer.take(),
            self.banner_timer.take(),
            self.popup_timer.take(),
        ];
        for timer in timers.into_iter().flatten().chain(self.sample_timers.drain(..)) {
            debug!("Stopping timer {}", timer.name());
            timer.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use tokio::time::sleep;

    fn quiet_config(refresh_ms: u64) -> ControllerConfig {
        ControllerConfig {
            refresh: Duration::from_millis(refresh_ms),
            alert_interval: Duration::from_secs(15),
            alert_probability: 0.0,
            sample_alerts: false,
            channel_capacity: 64,
        }
    }

    fn start(config: ControllerConfig) -> (ControllerHandle, JoinHandle<()>) {
        spawn(config, StdRng::seed_from_u64(11))
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_follow_refresh_interval() {
        let (handle, _task) = start(quiet_config(5000));

        sleep(Duration::from_millis(4900)).await;
        assert_eq!(handle.snapshot().await.unwrap().ticks, 0);

        sleep(Duration::from_millis(200)).await;
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.ticks, 1);
        assert_eq!(snapshot.readouts.len(), 4);
        assert!(snapshot.charts.iter().all(|c| c.points.len() == 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_change_restarts_timer() {
        let (handle, _task) = start(quiet_config(5000));

        // t = 5.1s: first tick of the 5s timer
        sleep(Duration::from_millis(5100)).await;
        assert_eq!(handle.snapshot().await.unwrap().ticks, 1);

        let ui = handle
            .ui(UiAction::SetRefreshRate { seconds: 2 })
            .await
            .unwrap();
        assert_eq!(ui.refresh_ms, 2000);

        // New timer fires at 7.1s and 9.1s
        sleep(Duration::from_millis(2100)).await;
        assert_eq!(handle.snapshot().await.unwrap().ticks, 2);
        sleep(Duration::from_millis(2000)).await;
        assert_eq!(handle.snapshot().await.unwrap().ticks, 3);

        // t = 10.5s: the old 5s timer would have fired at 10s
        sleep(Duration::from_millis(1300)).await;
        assert_eq!(handle.snapshot().await.unwrap().ticks, 3);

        // t = 11.2s: third tick of the new timer
        sleep(Duration::from_millis(700)).await;
        assert_eq!(handle.snapshot().await.unwrap().ticks, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_refresh_rate_is_rejected() {
        let (handle, _task) = start(quiet_config(5000));
        let err = handle
            .ui(UiAction::SetRefreshRate { seconds: 0 })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRefreshRate(0)));
        assert_eq!(handle.snapshot().await.unwrap().ui.refresh_ms, 5000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_refresh_rate_keeps_old_timer() {
        let (handle, _task) = start(quiet_config(5000));
        let err = handle
            .ui(UiAction::SetRefreshRate { seconds: u64::MAX })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRefreshRate(u64::MAX)));

        sleep(Duration::from_millis(5100)).await;
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.ui.refresh_ms, 5000);
        assert_eq!(snapshot.ticks, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_banner_and_popup_auto_hide() {
        let (handle, _task) = start(quiet_config(60_000));

        let alert = handle
            .raise("Water level rising".to_string(), Severity::Critical)
            .await
            .unwrap();
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.banner.unwrap().alert_id, alert.id);
        assert_eq!(snapshot.popup.unwrap().alert_id, alert.id);

        sleep(Duration::from_millis(5100)).await;
        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.popup.is_none());
        assert!(snapshot.banner.is_some());

        sleep(Duration::from_millis(5000)).await;
        assert!(handle.snapshot().await.unwrap().banner.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_banner_gets_full_duration() {
        let (handle, _task) = start(quiet_config(60_000));

        handle
            .raise("first".to_string(), Severity::Critical)
            .await
            .unwrap();
        sleep(Duration::from_secs(8)).await;
        let second = handle
            .raise("second".to_string(), Severity::Critical)
            .await
            .unwrap();

        // t = 10.5s: the first banner's timer would have fired by now
        sleep(Duration::from_millis(2500)).await;
        let banner = handle.snapshot().await.unwrap().banner.unwrap();
        assert_eq!(banner.alert_id, second.id);

        sleep(Duration::from_millis(7600)).await;
        assert!(handle.snapshot().await.unwrap().banner.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_injector_raises_alerts() {
        let mut config = quiet_config(60_000);
        config.alert_probability = 1.0;
        let (handle, _task) = start(config);

        sleep(Duration::from_millis(15_100)).await;
        let alerts = handle.alerts(None).await.unwrap();
        assert_eq!(alerts.len(), 1);

        sleep(Duration::from_secs(15)).await;
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.alerts.len(), 2);
        let counts = snapshot.alert_counts;
        assert_eq!(counts.critical + counts.warning + counts.info, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sample_alerts_arrive_in_order() {
        let mut config = quiet_config(60_000);
        config.sample_alerts = true;
        let (handle, _task) = start(config);

        sleep(Duration::from_millis(4500)).await;
        let alerts = handle.alerts(None).await.unwrap();
        let messages: Vec<&str> = alerts.iter().map(|a| a.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Temperature sensor calibration required",
                "New device connected to network",
                "Wind speed exceeding safe threshold",
                "Soil moisture level critically low in Sector B",
            ]
        );

        let warnings = handle.alerts(Some(Severity::Warning)).await.unwrap();
        assert_eq!(warnings.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_alert_message_is_rejected() {
        let (handle, _task) = start(quiet_config(60_000));
        let err = handle.raise("  ".to_string(), Severity::Info).await.unwrap_err();
        assert!(matches!(err, Error::EmptyAlertMessage));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_closes_controller() {
        let (handle, task) = start(quiet_config(5000));
        handle.shutdown().await.unwrap();
        task.await.unwrap();

        assert!(matches!(
            handle.snapshot().await,
            Err(Error::ControllerClosed)
        ));
    }
}
