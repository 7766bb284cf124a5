use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Encoder, Gauge, GaugeVec, IntGauge, Opts, Registry, TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref TICKS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_ticks_total",
        "Total synthetic telemetry ticks"
    ))
    .unwrap();
    pub static ref METRIC_VALUE: GaugeVec = GaugeVec::new(
        Opts::new("dashboard_metric_value", "Latest simulated value per metric"),
        &["metric"]
    )
    .unwrap();
    pub static ref RISK_LEVEL: IntGauge = IntGauge::with_opts(Opts::new(
        "dashboard_risk_level",
        "Current flood risk level (0=low, 1=medium, 2=high, 3=critical)"
    ))
    .unwrap();
    pub static ref ALERTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("dashboard_alerts_total", "Total alerts raised by severity"),
        &["severity"]
    )
    .unwrap();
    pub static ref TIMER_RESTARTS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_timer_restarts_total",
        "Total telemetry timer restarts after refresh rate changes"
    ))
    .unwrap();
    pub static ref REFRESH_INTERVAL_SECONDS: Gauge = Gauge::with_opts(Opts::new(
        "dashboard_refresh_interval_seconds",
        "Current telemetry refresh interval"
    ))
    .unwrap();
}

pub fn init_metrics() -> prometheus::Result<()> {
    REGISTRY.register(Box::new(TICKS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(METRIC_VALUE.clone()))?;
    REGISTRY.register(Box::new(RISK_LEVEL.clone()))?;
    REGISTRY.register(Box::new(ALERTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(TIMER_RESTARTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(REFRESH_INTERVAL_SECONDS.clone()))?;
    Ok(())
}

pub fn gather_metrics() -> prometheus::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
