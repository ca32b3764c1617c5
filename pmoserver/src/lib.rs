//! # pmoserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit une abstraction simple pour créer des serveurs HTTP
//! avec Axum, utilisée par les crates PMOCatalog pour exposer leurs API REST.
//!
//! ## Fonctionnalités
//!
//! - **API de haut niveau** : création de serveurs et composition de routers
//! - **Documentation OpenAPI** : génération automatique de Swagger UI
//! - **Logging** : initialisation depuis `pmoconfig` et réglage du niveau à chaud
//! - **Arrêt gracieux** : gestion propre de l'arrêt sur Ctrl+C
//!
//! Les autres crates étendent [`Server`] via des traits d'extension
//! (ex: `pmocatalog::CatalogExt`) sans que `pmoserver` les connaisse.
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use pmoserver::ServerBuilder;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut server = ServerBuilder::new("MyServer", "localhost", 8080).build();
//!
//!     server.add_route("/api/status", || async {
//!         serde_json::json!({"status": "ok"})
//!     }).await;
//!
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{LogState, LogsApiDoc};
pub use server::{Server, ServerBuilder, ServerInfo};
