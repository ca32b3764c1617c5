use pmocatalog::{CatalogConfigExt, CatalogExt};
use pmoconfig::get_config;
use pmoserver::ServerBuilder;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_config();

    // ========== PHASE 1 : Infrastructure ==========
    let mut server = ServerBuilder::from_config("PMO-Catalog-Server", &config).build();
    server.init_logging(&config).await?;

    server
        .add_route("/info", || async {
            serde_json::json!({"name": "PMOCatalog", "version": env!("CARGO_PKG_VERSION")})
        })
        .await;

    // ========== PHASE 2 : Catalogue ==========
    info!("🎵 Initializing song catalog...");
    let catalog = server.init_catalog_from(&config).await?;
    {
        let store = catalog.read().await;
        info!(
            "✅ Catalog ready: {} song(s), {} playlist(s)",
            store.list_songs(None).len(),
            store.list_playlists().len()
        );
    }

    // ========== PHASE 3 : Démarrage du serveur ==========
    info!("🌐 Starting HTTP server...");
    server.start().await?;

    let server_info = server.info();
    info!(
        "✅ PMOCatalog is ready at http://{}:{}/api/{}",
        server_info.base_url,
        server_info.http_port,
        config.catalog_api_name()
    );
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    Ok(())
}
