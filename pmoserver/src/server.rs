//! # Module Server - API de haut niveau pour Axum
//!
//! Ce module fournit une abstraction simple pour créer des serveurs HTTP
//! avec Axum, en cachant la configuration et le routage.
//!
//! ## Fonctionnalités
//!
//! - **Routes JSON simples** : endpoints en lecture seule avec `add_route()`
//! - **Sous-routers** : montage de routers Axum avec `add_router()`
//! - **Documentation API** : OpenAPI/Swagger automatique avec `add_openapi()`
//! - **CORS permissif** : toutes les origines sont acceptées
//! - **Gestion gracieuse** : arrêt propre sur Ctrl+C

use crate::logs::{LogState, LogsApiDoc, create_logs_router, init_logging};
use anyhow::Result;
use axum::routing::get;
use axum::{Json, Router};
use pmoconfig::Config;
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{signal, sync::RwLock, task::JoinHandle};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Info serveur sérialisable
#[derive(Clone, Debug, Serialize, utoipa::ToSchema)]
pub struct ServerInfo {
    pub name: String,
    pub base_url: String,
    pub http_port: u16,
}

/// Serveur principal
pub struct Server {
    name: String,
    base_url: String,
    http_port: u16,
    router: Arc<RwLock<Router>>,
    join_handle: Option<JoinHandle<()>>,
    log_state: Option<LogState>,
}

impl Server {
    /// Crée une nouvelle instance de serveur
    ///
    /// # Arguments
    ///
    /// * `name` - Nom du serveur (pour les logs)
    /// * `base_url` - Hôte annoncé (ex: "localhost")
    /// * `http_port` - Port HTTP à écouter
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
            router: Arc::new(RwLock::new(Router::new())),
            join_handle: None,
            log_state: None,
        }
    }

    /// Ajoute une route JSON dynamique
    ///
    /// La closure fournie est appelée à chaque requête GET sur le chemin.
    ///
    /// ```rust,no_run
    /// # use pmoserver::Server;
    /// # #[tokio::main]
    /// # async fn main() {
    /// # let mut server = Server::new("Test", "localhost", 3000);
    /// server.add_route("/info", || async {
    ///     serde_json::json!({"version": "1.0.0"})
    /// }).await;
    /// # }
    /// ```
    pub async fn add_route<F, Fut, T>(&mut self, path: &str, f: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let f = Arc::new(f);
        let handler = move || {
            let f = f.clone();
            async move { Json(f().await) }
        };

        let mut r = self.router.write().await;
        *r = std::mem::take(&mut *r).route(path, get(handler));
    }

    /// Ajoute un sous-router au serveur
    ///
    /// - Si `path` est "/", merge directement au router principal
    /// - Sinon, nest le router sous le chemin donné
    pub async fn add_router(&mut self, path: &str, sub_router: Router) {
        let mut r = self.router.write().await;

        *r = if path == "/" {
            std::mem::take(&mut *r).merge(sub_router)
        } else {
            let normalized = format!("/{}", path.trim_start_matches('/'));
            std::mem::take(&mut *r).nest(&normalized, sub_router)
        };
    }

    /// Ajoute une API documentée avec OpenAPI et Swagger UI
    ///
    /// Chaque appel ajoute une API distincte avec sa propre documentation :
    ///
    /// - `/api/{name}/...` sert les routes de `api_router`
    /// - `/swagger-ui/{name}` affiche la documentation Swagger
    /// - `/api-docs/{name}.json` fournit la spécification OpenAPI
    pub async fn add_openapi(
        &mut self,
        api_router: Router,
        openapi: utoipa::openapi::OpenApi,
        name: &str,
    ) {
        let swagger_path: &'static str =
            Box::leak(format!("/swagger-ui/{}", name).into_boxed_str());
        let openapi_json_path: &'static str =
            Box::leak(format!("/api-docs/{}.json", name).into_boxed_str());

        let swagger = SwaggerUi::new(swagger_path).url(openapi_json_path, openapi);

        let nested_router = Router::new().nest(&format!("/api/{}", name), api_router);

        let mut r = self.router.write().await;
        *r = std::mem::take(&mut *r).merge(nested_router).merge(swagger);
    }

    /// Router complet (avec la couche CORS), tel qu'il sera servi
    pub async fn router(&self) -> Router {
        self.router
            .read()
            .await
            .clone()
            .layer(CorsLayer::permissive())
    }

    /// Démarre le serveur HTTP
    ///
    /// Lance le serveur sur le port configuré ; Ctrl+C déclenche un
    /// arrêt gracieux. Échoue si le port ne peut pas être ouvert.
    pub async fn start(&mut self) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(
            "Server {} running at http://{}:{}",
            self.name, self.base_url, self.http_port
        );

        let app = self.router().await;
        self.join_handle = Some(tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app.into_make_service())
                .with_graceful_shutdown(shutdown_signal())
                .await
            {
                error!("HTTP server stopped with error: {}", e);
            }
        }));

        Ok(())
    }

    /// Attend la fin du serveur
    pub async fn wait(&mut self) {
        if let Some(h) = self.join_handle.take() {
            let _ = h.await;
        }
    }

    /// Récupère les infos du serveur
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            name: self.name.clone(),
            base_url: self.base_url.clone(),
            http_port: self.http_port,
        }
    }

    /// Niveau de log partagé, si `init_logging` a été appelé
    pub fn log_state(&self) -> Option<&LogState> {
        self.log_state.as_ref()
    }

    /// Initialise le système de logging et enregistre l'API de logs
    ///
    /// Routes enregistrées : `GET/POST /api/logs/log_setup`.
    pub async fn init_logging(&mut self, config: &Config) -> Result<()> {
        let log_state = init_logging(config)?;

        self.add_openapi(
            create_logs_router(log_state.clone()),
            LogsApiDoc::openapi(),
            "logs",
        )
        .await;

        self.log_state = Some(log_state);
        Ok(())
    }
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Ctrl+C reçu, arrêt gracieux"),
        Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
    }
}

/// Builder pattern
pub struct ServerBuilder {
    name: String,
    base_url: String,
    http_port: u16,
}

impl ServerBuilder {
    /// Crée un nouveau builder
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
        }
    }

    /// Builder initialisé depuis une configuration explicite
    pub fn from_config(name: impl Into<String>, config: &Config) -> Self {
        Self::new(name, config.get_base_url(), config.get_http_port())
    }

    /// Remplace le port HTTP
    pub fn http_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self
    }

    /// Construit le serveur
    pub fn build(self) -> Server {
        Server::new(self.name, self.base_url, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_add_route_serves_json() {
        let mut server = ServerBuilder::new("Test", "localhost", 0).build();
        server
            .add_route("/info", || async { serde_json::json!({"version": "1.0.0"}) })
            .await;

        let response = server
            .router()
            .await
            .oneshot(Request::get("/info").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["version"], "1.0.0");
    }

    #[tokio::test]
    async fn test_add_openapi_nests_under_api() {
        #[derive(utoipa::OpenApi)]
        #[openapi()]
        struct EmptyDoc;

        let mut server = ServerBuilder::new("Test", "localhost", 0).build();
        let api = Router::new().route("/ping", get(|| async { "pong" }));
        server.add_openapi(api, EmptyDoc::openapi(), "test").await;
        let app = server.router().await;

        let response = app
            .clone()
            .oneshot(Request::get("/api/test/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/api-docs/test.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let mut server = ServerBuilder::new("Test", "localhost", 0).build();
        server.add_route("/info", || async { "ok" }).await;

        let response = server
            .router()
            .await
            .oneshot(
                Request::get("/info")
                    .header("origin", "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }

    #[tokio::test]
    async fn test_add_router_merges_and_nests() {
        let mut server = ServerBuilder::new("Test", "localhost", 0).build();
        server
            .add_router("/", Router::new().route("/root", get(|| async { "root" })))
            .await;
        server
            .add_router("extra", Router::new().route("/leaf", get(|| async { "leaf" })))
            .await;
        let app = server.router().await;

        for uri in ["/root", "/extra/leaf"] {
            let response = app
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        }
    }

    // Seul test du binaire à installer le subscriber global
    #[tokio::test]
    async fn test_init_logging_mounts_log_api() {
        let config = Config::in_memory().unwrap();
        config.set_log_enable_console(false).unwrap();

        let mut server = ServerBuilder::new("Test", "localhost", 0).build();
        assert!(server.log_state().is_none());
        server.init_logging(&config).await.unwrap();
        assert_eq!(
            server.log_state().map(|s| s.get_max_level()),
            Some(tracing::Level::INFO)
        );

        let response = server
            .router()
            .await
            .oneshot(Request::get("/api/logs/log_setup").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["current_level"], "INFO");
    }

    #[test]
    fn test_builder_from_config() {
        let config = Config::in_memory().unwrap();
        let server = ServerBuilder::from_config("Cfg", &config).http_port(4000).build();
        let info = server.info();
        assert_eq!(info.name, "Cfg");
        assert_eq!(info.base_url, "localhost");
        assert_eq!(info.http_port, 4000);
    }
}
