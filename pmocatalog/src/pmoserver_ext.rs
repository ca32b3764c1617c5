//! Extension pour monter l'API du catalogue dans pmoserver
//!
//! `pmocatalog` étend `pmoserver::Server` sans que `pmoserver` connaisse
//! `pmocatalog`, via le trait [`CatalogExt`].
//!
//! ```rust,ignore
//! use pmocatalog::CatalogExt;
//! use pmoconfig::get_config;
//! use pmoserver::ServerBuilder;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = get_config();
//!     let mut server = ServerBuilder::from_config("Catalog", &config).build();
//!     let catalog = server.init_catalog_from(&config).await?;
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

use anyhow::Result;
use pmoconfig::Config;
use pmoserver::Server;
use tracing::info;
use utoipa::OpenApi;

use crate::api::catalog_api_router;
use crate::config_ext::CatalogConfigExt;
use crate::openapi::ApiDoc;
use crate::store::{CatalogStore, SharedCatalog};

/// Trait d'extension pour ajouter le catalogue à pmoserver
pub trait CatalogExt {
    /// Initialise le catalogue selon la configuration
    ///
    /// `catalog.seed_defaults` choisit entre le catalogue de démarrage et un
    /// catalogue vide ; `catalog.api_name` fixe le préfixe de montage.
    ///
    /// # Routes enregistrées
    ///
    /// - `GET|POST /api/{name}/songs`
    /// - `GET|PATCH|DELETE /api/{name}/songs/{song_id}`
    /// - `GET|POST /api/{name}/playlists`
    /// - `GET /api/{name}/playlists/{playlist_id}`
    /// - `PATCH /api/{name}/playlists/{playlist_id}/songs/{song_id}`
    /// - `GET /swagger-ui/{name}` - Documentation interactive Swagger
    async fn init_catalog_from(&mut self, config: &Config) -> Result<SharedCatalog>;

    /// Monte un catalogue déjà construit sous `/api/{api_name}`
    async fn init_catalog_with(
        &mut self,
        store: CatalogStore,
        api_name: &str,
    ) -> Result<SharedCatalog>;
}

impl CatalogExt for Server {
    async fn init_catalog_from(&mut self, config: &Config) -> Result<SharedCatalog> {
        let store = if config.catalog_seed_defaults() {
            CatalogStore::with_defaults()
        } else {
            CatalogStore::new()
        };
        self.init_catalog_with(store, &config.catalog_api_name())
            .await
    }

    async fn init_catalog_with(
        &mut self,
        store: CatalogStore,
        api_name: &str,
    ) -> Result<SharedCatalog> {
        info!(
            songs = store.list_songs(None).len(),
            playlists = store.list_playlists().len(),
            api = %api_name,
            "Mounting catalog API"
        );

        let catalog = store.into_shared();
        self.add_openapi(catalog_api_router(catalog.clone()), ApiDoc::openapi(), api_name)
            .await;

        Ok(catalog)
    }
}
