//! Initialisation du logging et API de réglage du niveau de log.

use std::sync::{Arc, RwLock};

use anyhow::{Result, anyhow};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use pmoconfig::Config;
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::{
    Registry,
    filter::LevelFilter,
    layer::SubscriberExt,
    reload,
    util::SubscriberInitExt,
};

const AVAILABLE_LEVELS: [&str; 5] = ["ERROR", "WARN", "INFO", "DEBUG", "TRACE"];

/// État partagé du logging : niveau courant et handle de rechargement du filtre
#[derive(Clone)]
pub struct LogState {
    max_level: Arc<RwLock<Level>>,
    reload_handle: reload::Handle<LevelFilter, Registry>,
}

impl LogState {
    pub fn new(level: Level, reload_handle: reload::Handle<LevelFilter, Registry>) -> Self {
        Self {
            max_level: Arc::new(RwLock::new(level)),
            reload_handle,
        }
    }

    /// Change le niveau maximum et recharge le filtre à chaud
    pub fn set_max_level(&self, level: Level) -> Result<()> {
        self.reload_handle
            .reload(level_to_levelfilter(level))
            .map_err(|e| anyhow!("Failed to reload log level filter: {}", e))?;

        *self
            .max_level
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = level;
        Ok(())
    }

    pub fn get_max_level(&self) -> Level {
        *self
            .max_level
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Initialise le système de logging à partir de la configuration
///
/// Le filtre rechargeable est posé avant la sortie console : le niveau
/// peut ensuite être changé via [`LogState::set_max_level`].
///
/// Échoue si un subscriber global est déjà installé.
pub fn init_logging(config: &Config) -> Result<LogState> {
    let level = config
        .get_log_min_level()
        .ok()
        .and_then(|l| string_to_level(&l))
        .unwrap_or(Level::INFO);

    let (filter, reload_handle) = reload::Layer::new(level_to_levelfilter(level));
    let log_state = LogState::new(level, reload_handle);

    let subscriber = Registry::default().with(filter);
    let enable_console = config.get_log_enable_console().unwrap_or(true);

    let installed = if enable_console {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true),
            )
            .try_init()
    } else {
        subscriber.try_init()
    };
    installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(log_state)
}

/// Request body pour la configuration du logging
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LogSetupRequest {
    pub level: String,
}

/// Response pour la configuration du logging
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LogSetupResponse {
    pub current_level: String,
    pub available_levels: Vec<String>,
}

impl LogSetupResponse {
    fn for_level(level: Level) -> Self {
        Self {
            current_level: level_to_string(level),
            available_levels: AVAILABLE_LEVELS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Handler pour GET /api/logs/log_setup - retourne la configuration actuelle
#[utoipa::path(
    get,
    path = "/api/logs/log_setup",
    responses(
        (status = 200, description = "Log configuration retrieved successfully", body = LogSetupResponse)
    ),
    tag = "logs"
)]
pub async fn log_setup_get(State(state): State<LogState>) -> impl IntoResponse {
    Json(LogSetupResponse::for_level(state.get_max_level()))
}

/// Handler pour POST /api/logs/log_setup - met à jour le niveau de log
#[utoipa::path(
    post,
    path = "/api/logs/log_setup",
    request_body = LogSetupRequest,
    responses(
        (status = 200, description = "Log level updated successfully", body = LogSetupResponse),
        (status = 400, description = "Invalid log level"),
        (status = 500, description = "Filter reload failed")
    ),
    tag = "logs"
)]
pub async fn log_setup_post(
    State(state): State<LogState>,
    Json(payload): Json<LogSetupRequest>,
) -> impl IntoResponse {
    let Some(level) = string_to_level(&payload.level) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "INVALID_LOG_LEVEL",
                "message": "Invalid log level. Must be one of: ERROR, WARN, INFO, DEBUG, TRACE"
            })),
        )
            .into_response();
    };

    if let Err(e) = state.set_max_level(level) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": "LOG_RELOAD_FAILED",
                "message": e.to_string()
            })),
        )
            .into_response();
    }
    tracing::info!("Log level changed to: {}", payload.level);

    (StatusCode::OK, Json(LogSetupResponse::for_level(level))).into_response()
}

fn string_to_level(s: &str) -> Option<Level> {
    match s.trim().to_uppercase().as_str() {
        "ERROR" => Some(Level::ERROR),
        "WARN" => Some(Level::WARN),
        "INFO" => Some(Level::INFO),
        "DEBUG" => Some(Level::DEBUG),
        "TRACE" => Some(Level::TRACE),
        _ => None,
    }
}

fn level_to_string(level: Level) -> String {
    match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
    .to_string()
}

fn level_to_levelfilter(level: Level) -> LevelFilter {
    match level {
        Level::ERROR => LevelFilter::ERROR,
        Level::WARN => LevelFilter::WARN,
        Level::INFO => LevelFilter::INFO,
        Level::DEBUG => LevelFilter::DEBUG,
        Level::TRACE => LevelFilter::TRACE,
    }
}

/// Crée le router pour l'API de gestion des logs
pub fn create_logs_router(log_state: LogState) -> axum::Router {
    use axum::routing::get;
    axum::Router::new()
        .route("/log_setup", get(log_setup_get).post(log_setup_post))
        .with_state(log_state)
}

/// API OpenAPI pour la gestion des logs
#[derive(utoipa::OpenApi)]
#[openapi(
    paths(
        log_setup_get,
        log_setup_post,
    ),
    components(
        schemas(LogSetupRequest, LogSetupResponse)
    ),
    tags(
        (name = "logs", description = "Log level configuration endpoints")
    )
)]
pub struct LogsApiDoc;
