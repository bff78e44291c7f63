//! HTTP action surface for chat front ends.
//!
//! A single `POST /` endpoint takes `{"action": "...", "data": {...}}` and
//! dispatches to the companion service or the interaction log. Every reply is
//! a JSON object with a boolean `success` field.
//!
//! ## Actions
//!
//! - `generate_response`: `{message?, sentiment?, sessionId?}`
//! - `mood_response`: `{mood, sessionId?}`
//! - `track_interaction`: `{type, content, sessionId?, sentiment?, mood?}`
//! - `get_interactions`: `{sessionId}`
//! - `get_analytics`: `{windowDays?}`
//!
//! `GET /health` answers `{"status":"ok"}`.
//!
//! Every route allows any origin and answers `OPTIONS` preflights, so browser
//! front ends can call the server directly. A body that is not a valid
//! envelope gets the same `{success:false, error}` reply as any other bad
//! request.

use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderName, Method, StatusCode, header};
use axum::response::Json;
use axum::routing::{get, post};
use chrono::Utc;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::analytics::{AnalyticsSummary, window_start};
use crate::classifier::screen_crisis;
use crate::config::{MindMateConfig, ServerConfig};
use crate::error::{MindMateError, Result};
use crate::interaction::{InteractionKind, InteractionLog, InteractionRecord, new_session_id};
use crate::mood::MoodLabel;
use crate::service::CompanionService;
use crate::verdict::Verdict;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Envelope for every action request.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GenerateResponseData {
    message: Option<String>,
    sentiment: Option<Verdict>,
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoodResponseData {
    mood: String,
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackInteractionData {
    #[serde(rename = "type")]
    kind: InteractionKind,
    content: String,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    sentiment: Option<Verdict>,
    #[serde(default)]
    mood: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetInteractionsData {
    session_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GetAnalyticsData {
    window_days: Option<i64>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum ActionError {
    UnknownAction(String),
    BadRequest(String),
    Internal(String),
}

impl From<MindMateError> for ActionError {
    fn from(e: MindMateError) -> Self {
        match e {
            MindMateError::InvalidInput(m) => Self::BadRequest(m),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl ActionError {
    fn into_response(self) -> (StatusCode, Json<Value>) {
        let (status, message) = match self {
            Self::UnknownAction(action) => {
                tracing::debug!(action = %action, "unknown action");
                (StatusCode::BAD_REQUEST, "Unknown action".to_owned())
            }
            Self::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            Self::Internal(m) => {
                tracing::error!(error = %m, "action failed");
                (StatusCode::INTERNAL_SERVER_ERROR, m)
            }
        };
        (status, Json(json!({ "success": false, "error": message })))
    }
}

type ActionResult = std::result::Result<Value, ActionError>;

fn parse_data<T: DeserializeOwned>(action: &str, data: Value) -> std::result::Result<T, ActionError> {
    let data = if data.is_null() { json!({}) } else { data };
    serde_json::from_value(data)
        .map_err(|e| ActionError::BadRequest(format!("invalid data for {action}: {e}")))
}

fn parse_mood(mood: &str) -> std::result::Result<MoodLabel, ActionError> {
    mood.parse::<MoodLabel>().map_err(ActionError::from)
}

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    service: CompanionService,
    log: Arc<InteractionLog>,
    window_days: i64,
}

impl AppState {
    pub fn new(service: CompanionService, log: Arc<InteractionLog>, window_days: i64) -> Self {
        Self {
            service,
            log,
            window_days,
        }
    }

    /// State for `config`: service, log capacity and analytics window.
    ///
    /// # Errors
    ///
    /// Returns [`MindMateError::Config`] if the configuration is invalid.
    pub fn from_config(config: &MindMateConfig) -> Result<Self> {
        Ok(Self::new(
            CompanionService::from_config(config)?,
            Arc::new(InteractionLog::with_capacity(
                config.interactions.max_records,
            )),
            config.interactions.analytics_window_days,
        ))
    }

    pub fn log(&self) -> &Arc<InteractionLog> {
        &self.log
    }
}

/// Request headers browser clients may send.
pub const CORS_ALLOWED_HEADERS: [HeaderName; 4] = [
    header::AUTHORIZATION,
    HeaderName::from_static("x-client-info"),
    HeaderName::from_static("apikey"),
    header::CONTENT_TYPE,
];

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(CORS_ALLOWED_HEADERS)
}

/// Build the action router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handle_action))
        .route("/health", get(handle_health))
        .layer(cors_layer())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// MindMateServer
// ---------------------------------------------------------------------------

/// Background HTTP server for the action surface.
pub struct MindMateServer {
    /// The address the server is listening on.
    addr: SocketAddr,
    /// Handle to the background server task.
    handle: JoinHandle<()>,
}

impl MindMateServer {
    /// Start serving on `{config.host}:{config.port}` (port `0` auto-assigns).
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot bind.
    pub async fn start(state: AppState, config: &ServerConfig) -> Result<Self> {
        let bind_addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| MindMateError::Server(format!("bind {bind_addr} failed: {e}")))?;

        let addr = listener
            .local_addr()
            .map_err(|e| MindMateError::Server(format!("failed to get local addr: {e}")))?;

        info!("action server listening on http://{addr}");

        let app = router(state);
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("action server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for MindMateServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// `GET /health`
async fn handle_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /`: dispatch one action.
async fn handle_action(
    State(state): State<AppState>,
    request: std::result::Result<Json<ActionRequest>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let Json(ActionRequest { action, data }) = match request {
        Ok(request) => request,
        Err(rejection) => {
            return ActionError::BadRequest(format!("invalid request: {}", rejection.body_text()))
                .into_response();
        }
    };
    let result = match action.as_str() {
        "generate_response" => generate_response(&state, data).await,
        "mood_response" => mood_response(&state, data).await,
        "track_interaction" => track_interaction(&state, data).await,
        "get_interactions" => get_interactions(&state, data).await,
        "get_analytics" => get_analytics(&state, data).await,
        _ => Err(ActionError::UnknownAction(action)),
    };
    match result {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(e) => e.into_response(),
    }
}

async fn generate_response(state: &AppState, data: Value) -> ActionResult {
    let data: GenerateResponseData = parse_data("generate_response", data)?;
    let message = data
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty());

    // A caller-supplied verdict never masks a crisis phrase in the message.
    let verdict = match (message, data.sentiment) {
        (Some(text), Some(supplied)) => screen_crisis(text).unwrap_or(supplied),
        (Some(text), None) => state.service.classifier().classify(text).await?,
        (None, Some(supplied)) => supplied,
        (None, None) => {
            return Err(ActionError::BadRequest(
                "generate_response requires a non-empty `message` or a `sentiment`".to_owned(),
            ));
        }
    };
    let response = state.service.reply_to_verdict(&verdict);

    if let (Some(session_id), Some(text)) = (data.session_id, message) {
        state
            .log
            .record(InteractionRecord::message(session_id, text, Some(verdict)))
            .await;
    }

    Ok(json!({ "success": true, "response": response, "sentiment": verdict }))
}

async fn mood_response(state: &AppState, data: Value) -> ActionResult {
    let data: MoodResponseData = parse_data("mood_response", data)?;
    let mood = parse_mood(&data.mood)?;
    let response = state.service.reply_to_mood(mood);

    if let Some(session_id) = data.session_id {
        state
            .log
            .record(InteractionRecord::mood_selection(session_id, mood))
            .await;
    }

    Ok(json!({ "success": true, "response": response, "mood": mood }))
}

async fn track_interaction(state: &AppState, data: Value) -> ActionResult {
    let data: TrackInteractionData = parse_data("track_interaction", data)?;
    let session_id = data
        .session_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(new_session_id);
    let record = match data.kind {
        InteractionKind::Message => {
            InteractionRecord::message(session_id, data.content, data.sentiment)
        }
        InteractionKind::MoodSelection => {
            let mood = data.mood.as_deref().map(parse_mood).transpose()?.ok_or_else(|| {
                ActionError::BadRequest("mood_selection interactions require a `mood`".to_owned())
            })?;
            InteractionRecord {
                content: data.content,
                verdict: data.sentiment,
                ..InteractionRecord::mood_selection(session_id, mood)
            }
        }
    };

    state.log.record(record.clone()).await;
    Ok(json!({ "success": true, "interaction": record }))
}

async fn get_interactions(state: &AppState, data: Value) -> ActionResult {
    let data: GetInteractionsData = parse_data("get_interactions", data)?;
    let interactions = state.log.for_session(&data.session_id).await;
    Ok(json!({ "success": true, "interactions": interactions }))
}

async fn get_analytics(state: &AppState, data: Value) -> ActionResult {
    let data: GetAnalyticsData = parse_data("get_analytics", data)?;
    let window_days = data.window_days.unwrap_or(state.window_days);
    let now = Utc::now();
    let records = state.log.since(window_start(now, window_days)).await;
    let analytics = AnalyticsSummary::from_records(&records, now, window_days);
    Ok(json!({ "success": true, "analytics": analytics }))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::verdict::Label;

    fn state() -> AppState {
        AppState::new(
            CompanionService::keyword(),
            Arc::new(InteractionLog::default()),
            7,
        )
    }

    #[tokio::test]
    async fn generate_response_classifies_message() {
        let body = generate_response(&state(), json!({ "message": "I am sad and tired" }))
            .await
            .unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["sentiment"]["label"], "NEGATIVE");
        assert!(body["response"].as_str().is_some_and(|s| !s.is_empty()));
    }

    #[tokio::test]
    async fn supplied_sentiment_cannot_mask_crisis() {
        let body = generate_response(
            &state(),
            json!({
                "message": "I want to die",
                "sentiment": { "label": "POSITIVE", "score": 0.9 }
            }),
        )
        .await
        .unwrap();
        assert_eq!(body["sentiment"]["label"], "CRISIS");
    }

    #[tokio::test]
    async fn supplied_sentiment_alone_is_used() {
        let st = state();
        let body = generate_response(
            &st,
            json!({ "sentiment": { "label": "CRISIS", "score": 0.95 } }),
        )
        .await
        .unwrap();
        let response = body["response"].as_str().unwrap().to_owned();
        assert!(
            st.service
                .responder()
                .table()
                .for_label(Label::Crisis)
                .contains(&response)
        );
    }

    #[tokio::test]
    async fn supplied_sentiment_out_of_range_is_bad_request() {
        let st = state();
        let err = generate_response(
            &st,
            json!({
                "message": "hello",
                "sessionId": "s1",
                "sentiment": { "label": "POSITIVE", "score": 3.0 }
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ActionError::BadRequest(ref m) if m.contains("0..=1")));
        assert!(st.log.is_empty().await);
    }

    #[test]
    fn router_builds_with_cors() {
        let _ = router(state());
        assert_eq!(CORS_ALLOWED_HEADERS[2].as_str(), "apikey");
    }

    #[tokio::test]
    async fn generate_response_without_input_is_rejected() {
        let err = generate_response(&state(), json!({ "message": "   " }))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::BadRequest(_)));
    }

    #[tokio::test]
    async fn mood_response_records_when_session_given() {
        let st = state();
        let body = mood_response(&st, json!({ "mood": "Anxious", "sessionId": "s1" }))
            .await
            .unwrap();
        assert_eq!(body["mood"], "anxious");
        let records = st.log.for_session("s1").await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].mood, Some(MoodLabel::Anxious));
    }

    #[tokio::test]
    async fn unknown_mood_is_bad_request() {
        let err = mood_response(&state(), json!({ "mood": "ecstatic" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::BadRequest(_)));
    }

    #[tokio::test]
    async fn track_interaction_assigns_session() {
        let st = state();
        let body = track_interaction(
            &st,
            json!({
                "type": "message",
                "content": "hello",
                "sentiment": { "label": "NEUTRAL", "score": 0.5 }
            }),
        )
        .await
        .unwrap();
        let session = body["interaction"]["sessionId"].as_str().unwrap();
        assert!(session.starts_with("session_"));
        assert_eq!(st.log.len().await, 1);
    }

    #[tokio::test]
    async fn mood_interaction_requires_mood() {
        let err = track_interaction(
            &state(),
            json!({ "type": "mood_selection", "content": "I'm feeling down today" }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ActionError::BadRequest(_)));
    }

    #[tokio::test]
    async fn analytics_reflect_tracked_turns() {
        let st = state();
        for message in ["I am so tired", "I feel great", "I want to die"] {
            generate_response(&st, json!({ "message": message, "sessionId": "s" }))
                .await
                .unwrap();
        }
        mood_response(&st, json!({ "mood": "sad", "sessionId": "s" }))
            .await
            .unwrap();

        let body = get_analytics(&st, Value::Null).await.unwrap();
        let analytics = &body["analytics"];
        assert_eq!(analytics["totalInteractions"], 4);
        assert_eq!(analytics["sentimentDistribution"]["CRISIS"], 1);
        assert_eq!(analytics["sentimentDistribution"]["NEGATIVE"], 1);
        assert_eq!(analytics["sentimentDistribution"]["POSITIVE"], 1);
        assert_eq!(analytics["moodDistribution"]["sad"], 1);
    }

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let err = ActionError::from(MindMateError::InvalidInput("empty".to_owned()));
        assert!(matches!(err, ActionError::BadRequest(_)));
        let err = ActionError::from(MindMateError::Config("bad".to_owned()));
        let (status, _) = err.into_response();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
