use crate::controller::ControllerHandle;
use crate::dashboard::{DashboardSnapshot, UiAction, UiSnapshot};
use crate::errors::Error;
use crate::map::MapView;
use crate::model::{Alert, Metric, Severity};
use crate::sensors::{status_slices, DeviceCounts, Sensor, StatusSlice, SENSORS};
use crate::ui::{FullscreenChart, Page};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

#[derive(Debug, Clone)]
struct AppState {
    controller: ControllerHandle,
    map: Arc<MapView>,
}

#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    severity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RaiseRequest {
    message: String,
    severity: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    seconds: u64,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    enabled: bool,
    metric: Option<String>,
}

impl ToggleRequest {
    fn metric(&self) -> Result<Option<Metric>, Error> {
        self.metric.as_deref().map(str::parse::<Metric>).transpose()
    }
}

#[derive(Debug, Deserialize)]
pub struct ZoomRequest {
    start: usize,
    end: usize,
}

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub data: Vec<Alert>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DevicesResponse {
    pub sensors: &'static [Sensor],
    pub counts: DeviceCounts,
    pub status: Vec<StatusSlice>,
    pub total: usize,
}

pub fn create_router(controller: ControllerHandle, map: MapView) -> Router {
    let state = AppState {
        controller,
        map: Arc::new(map),
    };

    Router::new()
        .route("/api/v1/dashboard", get(get_dashboard))
        .route("/api/v1/alerts", get(get_alerts).post(raise_alert))
        .route("/api/v1/devices", get(get_devices))
        .route("/api/v1/map", get(get_map))
        .route("/api/v1/ui", post(apply_ui))
        .route("/api/v1/ui/theme", post(toggle_theme))
        .route("/api/v1/ui/sidebar", post(toggle_sidebar))
        .route("/api/v1/ui/mobile-menu", post(toggle_mobile_menu))
        .route("/api/v1/ui/page/:page", post(switch_page))
        .route("/api/v1/ui/refresh-rate", post(set_refresh_rate))
        .route("/api/v1/charts/smoothing", post(set_smoothing))
        .route("/api/v1/charts/points", post(set_points))
        .route("/api/v1/charts/:metric/zoom", post(zoom_chart))
        .route("/api/v1/charts/:metric/zoom/reset", post(reset_zoom))
        .route("/api/v1/charts/:metric/fullscreen", get(fullscreen_chart))
        .with_state(state)
}

async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardSnapshot>, AppError> {
    Ok(Json(state.controller.snapshot().await?))
}

async fn get_alerts(
    State(state): State<AppState>,
    Query(params): Query<AlertQuery>,
) -> Result<Json<AlertsResponse>, AppError> {
    let severity = params
        .severity
        .as_deref()
        .map(str::parse::<Severity>)
        .transpose()?;
    let data = state.controller.alerts(severity).await?;

    Ok(Json(AlertsResponse {
        total: data.len(),
        data,
    }))
}

async fn raise_alert(
    State(state): State<AppState>,
    Json(body): Json<RaiseRequest>,
) -> Result<(StatusCode, Json<Alert>), AppError> {
    let severity: Severity = body.severity.parse()?;
    let alert = state.controller.raise(body.message, severity).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

async fn get_devices() -> Json<DevicesResponse> {
    let counts = DeviceCounts::from_sensors(&SENSORS);
    Json(DevicesResponse {
        sensors: &SENSORS,
        counts,
        status: status_slices(&counts),
        total: counts.total(),
    })
}

async fn get_map(State(state): State<AppState>) -> Json<MapView> {
    Json(state.map.as_ref().clone())
}

async fn apply_ui(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<UiSnapshot>, AppError> {
    let action: UiAction =
        serde_json::from_value(body).map_err(|e| Error::InvalidAction(e.to_string()))?;
    Ok(Json(state.controller.ui(action).await?))
}

async fn toggle_theme(State(state): State<AppState>) -> Result<Json<UiSnapshot>, AppError> {
    Ok(Json(state.controller.ui(UiAction::ToggleTheme).await?))
}

async fn toggle_sidebar(State(state): State<AppState>) -> Result<Json<UiSnapshot>, AppError> {
    Ok(Json(state.controller.ui(UiAction::ToggleSidebar).await?))
}

async fn toggle_mobile_menu(State(state): State<AppState>) -> Result<Json<UiSnapshot>, AppError> {
    Ok(Json(state.controller.ui(UiAction::ToggleMobileMenu).await?))
}

async fn switch_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> Result<Json<UiSnapshot>, AppError> {
    let page: Page = page.parse()?;
    Ok(Json(state.controller.ui(UiAction::SwitchPage { page }).await?))
}

async fn set_refresh_rate(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<UiSnapshot>, AppError> {
    let action = UiAction::SetRefreshRate {
        seconds: body.seconds,
    };
    Ok(Json(state.controller.ui(action).await?))
}

async fn set_smoothing(
    State(state): State<AppState>,
    Json(body): Json<ToggleRequest>,
) -> Result<Json<UiSnapshot>, AppError> {
    let action = UiAction::SetSmoothing {
        metric: body.metric()?,
        enabled: body.enabled,
    };
    Ok(Json(state.controller.ui(action).await?))
}

async fn set_points(
    State(state): State<AppState>,
    Json(body): Json<ToggleRequest>,
) -> Result<Json<UiSnapshot>, AppError> {
    let action = UiAction::SetPoints {
        metric: body.metric()?,
        enabled: body.enabled,
    };
    Ok(Json(state.controller.ui(action).await?))
}

async fn zoom_chart(
    State(state): State<AppState>,
    Path(metric): Path<String>,
    Json(body): Json<ZoomRequest>,
) -> Result<Json<FullscreenChart>, AppError> {
    let metric: Metric = metric.parse()?;
    let action = UiAction::Zoom {
        metric,
        start: body.start,
        end: body.end,
    };
    state.controller.ui(action).await?;
    Ok(Json(state.controller.fullscreen(metric).await?))
}

async fn reset_zoom(
    State(state): State<AppState>,
    Path(metric): Path<String>,
) -> Result<StatusCode, AppError> {
    let metric: Metric = metric.parse()?;
    state.controller.ui(UiAction::ResetZoom { metric }).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn fullscreen_chart(
    State(state): State<AppState>,
    Path(metric): Path<String>,
) -> Result<Json<FullscreenChart>, AppError> {
    let metric: Metric = metric.parse()?;
    Ok(Json(state.controller.fullscreen(metric).await?))
}

struct AppError(Error);

impl AppError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            Error::UnknownMetric(_)
            | Error::UnknownPage(_)
            | Error::UnknownSeverity(_)
            | Error::InvalidAction(_) => StatusCode::BAD_REQUEST,
            Error::InvalidRefreshRate(_) | Error::InvalidZoom { .. } | Error::EmptyAlertMessage => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::ControllerClosed => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("API error: {}", self.0);
        } else {
            warn!("Rejected request: {}", self.0);
        }
        (
            status,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{self, ControllerConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::Value;
    use std::time::Duration;

    async fn serve() -> String {
        let config = ControllerConfig {
            refresh: Duration::from_secs(3600),
            alert_interval: Duration::from_secs(3600),
            alert_probability: 0.0,
            sample_alerts: false,
            channel_capacity: 64,
        };
        let (handle, _task) = controller::spawn(config, StdRng::seed_from_u64(5));
        let app = create_router(handle, MapView::new(Some("test-key"), &SENSORS));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_dashboard_snapshot() {
        let base = serve().await;
        let body: Value = reqwest::get(format!("{}/api/v1/dashboard", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["ticks"], 0);
        assert_eq!(body["risk"]["title"], "LOW RISK");
        assert_eq!(body["devices"]["online"], 2);
        assert_eq!(body["charts"].as_array().unwrap().len(), 4);
        assert_eq!(body["ui"]["page_title"], "Disaster Monitoring Dashboard");
    }

    #[tokio::test]
    async fn test_raise_and_filter_alerts() {
        let base = serve().await;
        let client = reqwest::Client::new();

        for (message, severity) in [("a", "warning"), ("b", "critical"), ("c", "info")] {
            let response = client
                .post(format!("{}/api/v1/alerts", base))
                .json(&serde_json::json!({ "message": message, "severity": severity }))
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        }

        let body: Value = client
            .get(format!("{}/api/v1/alerts?severity=critical", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"][0]["message"], "b");

        let response = client
            .get(format!("{}/api/v1/alerts?severity=urgent", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

        let response = client
            .post(format!("{}/api/v1/alerts", base))
            .json(&serde_json::json!({ "message": "d", "severity": "urgent" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Unknown severity: urgent");

        let body: Value = client
            .get(format!("{}/api/v1/dashboard", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["alerts"][0]["message"], "c");
        assert_eq!(body["attention"], 2);
        assert_eq!(body["banner"]["message"], "b");
    }

    #[tokio::test]
    async fn test_ui_controls() {
        let base = serve().await;
        let client = reqwest::Client::new();

        let body: Value = client
            .post(format!("{}/api/v1/ui/theme", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["theme"], "dark");
        assert_eq!(body["palette"]["text"], "#e8f4ff");

        let body: Value = client
            .post(format!("{}/api/v1/ui/page/settings", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["page_title"], "Settings");

        let response = client
            .post(format!("{}/api/v1/ui/page/reports", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

        let body: Value = client
            .post(format!("{}/api/v1/ui/refresh-rate", base))
            .json(&serde_json::json!({ "seconds": 2 }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["refresh_ms"], 2000);

        let response = client
            .post(format!("{}/api/v1/ui/refresh-rate", base))
            .json(&serde_json::json!({ "seconds": 0 }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);

        let response = client
            .post(format!("{}/api/v1/ui/refresh-rate", base))
            .json(&serde_json::json!({ "seconds": u64::MAX }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);

        let response = client
            .post(format!("{}/api/v1/ui", base))
            .json(&serde_json::json!({ "action": "switch_page", "page": "reports" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

        let body: Value = client
            .get(format!("{}/api/v1/dashboard", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["ui"]["refresh_ms"], 2000);
    }

    #[tokio::test]
    async fn test_chart_toggles_and_fullscreen() {
        let base = serve().await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/api/v1/charts/smoothing", base))
            .json(&serde_json::json!({ "enabled": false }))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());

        for path in ["smoothing", "points"] {
            let response = client
                .post(format!("{}/api/v1/charts/{}", base, path))
                .json(&serde_json::json!({ "enabled": true, "metric": "pressure" }))
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        }

        client
            .post(format!("{}/api/v1/charts/points", base))
            .json(&serde_json::json!({ "enabled": false, "metric": "wind" }))
            .send()
            .await
            .unwrap();

        let body: Value = client
            .get(format!("{}/api/v1/charts/wind/fullscreen", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["title"], "Wind Speed Trend");
        assert_eq!(body["aspect_ratio"], 1.8);
        assert_eq!(body["chart"]["tension"], 0.0);
        assert_eq!(body["chart"]["point_radius"], 0);

        let response = client
            .get(format!("{}/api/v1/charts/pressure/fullscreen", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

        // No points yet, so there is nothing to zoom into
        let response = client
            .post(format!("{}/api/v1/charts/soil/zoom", base))
            .json(&serde_json::json!({ "start": 0, "end": 2 }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);

        let response = client
            .post(format!("{}/api/v1/charts/soil/zoom/reset", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_map_and_devices() {
        let base = serve().await;

        let map: Value = reqwest::get(format!("{}/api/v1/map", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(map["zoom"], 10);
        assert_eq!(map["overlays"].as_array().unwrap().len(), 4);
        assert_eq!(map["markers"][1]["color"], "green");

        let devices: Value = reqwest::get(format!("{}/api/v1/devices", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(devices["sensors"].as_array().unwrap().len(), 4);
        assert_eq!(devices["counts"]["offline"], 1);
        assert_eq!(devices["total"], 4);
        assert_eq!(devices["status"][1]["label"], "Warning");
    }
}
