//! Documentation OpenAPI pour l'API du catalogue.

use utoipa::OpenApi;

/// Documentation OpenAPI de l'API catalogue (morceaux et playlists).
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::list_songs,
        crate::api::get_song,
        crate::api::create_song,
        crate::api::update_song,
        crate::api::delete_song,
        crate::api::list_playlists,
        crate::api::get_playlist,
        crate::api::create_playlist,
        crate::api::add_song_to_playlist,
    ),
    components(
        schemas(
            crate::model::Song,
            crate::model::Playlist,
            crate::model::PlaylistDetail,
            crate::model::SongDraft,
            crate::model::SongPatch,
            crate::model::PlaylistDraft,
            crate::api::ErrorResponse,
        )
    ),
    tags(
        (name = "songs", description = "Gestion des morceaux du catalogue"),
        (name = "playlists", description = "Gestion des playlists et de leurs morceaux")
    ),
    info(
        title = "PMO Catalog API",
        version = "0.1.0",
        description = r#"
# Catalogue de morceaux et de playlists

Les playlists référencent les morceaux par identifiant :
- un morceau ne peut pas être ajouté deux fois à la même playlist
- un morceau référencé par une playlist ne peut pas être supprimé (409)
- le couple titre/artiste est unique, sans tenir compte de la casse

Codes d'erreur : 400 (paramètre invalide), 404 (introuvable), 409 (conflit).
        "#,
        license(
            name = "MIT",
        ),
    )
)]
pub struct ApiDoc;
