//! API REST du catalogue (morceaux et playlists).
//!
//! Les handlers se contentent d'extraire les paramètres de la requête,
//! d'appeler une opération du [`CatalogStore`](crate::CatalogStore) sous
//! le verrou, puis de sérialiser le résultat.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{Error, ErrorKind};
use crate::model::{Playlist, PlaylistDetail, PlaylistDraft, Song, SongDraft, SongPatch};
use crate::store::SharedCatalog;

/// Router du catalogue, à monter sous `/api/{name}`
pub fn catalog_api_router(catalog: SharedCatalog) -> Router {
    Router::new()
        .route("/songs", get(list_songs).post(create_song))
        .route(
            "/songs/{song_id}",
            get(get_song).patch(update_song).delete(delete_song),
        )
        .route("/playlists", get(list_playlists).post(create_playlist))
        .route("/playlists/{playlist_id}", get(get_playlist))
        .route(
            "/playlists/{playlist_id}/songs/{song_id}",
            patch(add_song_to_playlist),
        )
        .with_state(catalog)
}

/// Réponse d'erreur REST générique.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Paramètres de filtrage de `/songs`
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SongsQuery {
    /// Un terme ou une liste de termes séparés par des virgules
    pub filter: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/songs",
    tag = "songs",
    params(SongsQuery),
    responses(
        (status = 200, description = "Morceaux, éventuellement filtrés", body = [Song]),
        (status = 400, description = "Filtre vide ou requête mal formée", body = ErrorResponse)
    )
)]
pub async fn list_songs(
    State(catalog): State<SharedCatalog>,
    query: Result<Query<SongsQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            return map_status(StatusCode::BAD_REQUEST, "INVALID_QUERY", rejection.body_text())
        }
    };

    let terms = match query.filter.as_deref().map(parse_filter) {
        Some(Some(terms)) => Some(terms),
        Some(None) => {
            return map_status(
                StatusCode::BAD_REQUEST,
                "INVALID_FILTER",
                "filter must not be empty",
            )
        }
        None => None,
    };

    let songs = catalog.read().await.list_songs(terms.as_deref());
    (StatusCode::OK, Json(songs)).into_response()
}

#[utoipa::path(
    get,
    path = "/api/v1/songs/{song_id}",
    tag = "songs",
    params(
        ("song_id" = String, Path, description = "Identifiant du morceau")
    ),
    responses(
        (status = 200, description = "Morceau", body = Song),
        (status = 404, description = "Morceau introuvable", body = ErrorResponse)
    )
)]
pub async fn get_song(
    State(catalog): State<SharedCatalog>,
    Path(song_id): Path<String>,
) -> Response {
    respond(StatusCode::OK, catalog.read().await.get_song(&song_id))
}

#[utoipa::path(
    post,
    path = "/api/v1/songs",
    tag = "songs",
    request_body = SongDraft,
    responses(
        (status = 201, description = "Morceau créé", body = Song),
        (status = 400, description = "Requête invalide", body = ErrorResponse),
        (status = 409, description = "Morceau déjà existant", body = ErrorResponse)
    )
)]
pub async fn create_song(
    State(catalog): State<SharedCatalog>,
    payload: Result<Json<SongDraft>, JsonRejection>,
) -> Response {
    let draft = match payload {
        Ok(Json(draft)) => draft,
        Err(rejection) => return map_rejection(rejection),
    };
    respond(StatusCode::CREATED, catalog.write().await.create_song(&draft))
}

#[utoipa::path(
    patch,
    path = "/api/v1/songs/{song_id}",
    tag = "songs",
    params(
        ("song_id" = String, Path, description = "Identifiant du morceau")
    ),
    request_body = SongPatch,
    responses(
        (status = 200, description = "Morceau mis à jour", body = Song),
        (status = 400, description = "Requête invalide", body = ErrorResponse),
        (status = 404, description = "Morceau introuvable", body = ErrorResponse),
        (status = 409, description = "Le couple titre/artiste existe déjà", body = ErrorResponse)
    )
)]
pub async fn update_song(
    State(catalog): State<SharedCatalog>,
    Path(song_id): Path<String>,
    payload: Result<Json<SongPatch>, JsonRejection>,
) -> Response {
    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(rejection) => return map_rejection(rejection),
    };
    respond(
        StatusCode::OK,
        catalog.write().await.update_song(&song_id, &patch),
    )
}

#[utoipa::path(
    delete,
    path = "/api/v1/songs/{song_id}",
    tag = "songs",
    params(
        ("song_id" = String, Path, description = "Identifiant du morceau")
    ),
    responses(
        (status = 200, description = "Morceau supprimé", body = Song),
        (status = 400, description = "Identifiant invalide", body = ErrorResponse),
        (status = 404, description = "Morceau introuvable", body = ErrorResponse),
        (status = 409, description = "Morceau référencé par une playlist", body = ErrorResponse)
    )
)]
pub async fn delete_song(
    State(catalog): State<SharedCatalog>,
    Path(song_id): Path<String>,
) -> Response {
    respond(StatusCode::OK, catalog.write().await.delete_song(&song_id))
}

#[utoipa::path(
    get,
    path = "/api/v1/playlists",
    tag = "playlists",
    responses(
        (status = 200, description = "Liste de toutes les playlists", body = [Playlist])
    )
)]
pub async fn list_playlists(State(catalog): State<SharedCatalog>) -> Response {
    let playlists = catalog.read().await.list_playlists();
    (StatusCode::OK, Json(playlists)).into_response()
}

#[utoipa::path(
    get,
    path = "/api/v1/playlists/{playlist_id}",
    tag = "playlists",
    params(
        ("playlist_id" = String, Path, description = "Identifiant de la playlist")
    ),
    responses(
        (status = 200, description = "Playlist avec ses morceaux", body = PlaylistDetail),
        (status = 400, description = "Identifiant invalide", body = ErrorResponse),
        (status = 404, description = "Playlist introuvable", body = ErrorResponse)
    )
)]
pub async fn get_playlist(
    State(catalog): State<SharedCatalog>,
    Path(playlist_id): Path<String>,
) -> Response {
    respond(StatusCode::OK, catalog.read().await.get_playlist(&playlist_id))
}

#[utoipa::path(
    post,
    path = "/api/v1/playlists",
    tag = "playlists",
    request_body = PlaylistDraft,
    responses(
        (status = 201, description = "Playlist créée", body = Playlist),
        (status = 400, description = "Requête invalide", body = ErrorResponse),
        (status = 409, description = "Playlist déjà existante", body = ErrorResponse)
    )
)]
pub async fn create_playlist(
    State(catalog): State<SharedCatalog>,
    payload: Result<Json<PlaylistDraft>, JsonRejection>,
) -> Response {
    let draft = match payload {
        Ok(Json(draft)) => draft,
        Err(rejection) => return map_rejection(rejection),
    };
    respond(
        StatusCode::CREATED,
        catalog.write().await.create_playlist(&draft),
    )
}

#[utoipa::path(
    patch,
    path = "/api/v1/playlists/{playlist_id}/songs/{song_id}",
    tag = "playlists",
    params(
        ("playlist_id" = String, Path, description = "Identifiant de la playlist"),
        ("song_id" = String, Path, description = "Morceau à ajouter")
    ),
    responses(
        (status = 200, description = "Morceau ajouté", body = PlaylistDetail),
        (status = 400, description = "Identifiant invalide", body = ErrorResponse),
        (status = 404, description = "Playlist ou morceau introuvable", body = ErrorResponse),
        (status = 409, description = "Morceau déjà présent", body = ErrorResponse)
    )
)]
pub async fn add_song_to_playlist(
    State(catalog): State<SharedCatalog>,
    Path((playlist_id, song_id)): Path<(String, String)>,
) -> Response {
    respond(
        StatusCode::OK,
        catalog
            .write()
            .await
            .add_song_to_playlist(&playlist_id, &song_id),
    )
}

/// `a, b,,c` -> `["a", "b", "", "c"]` ; `None` si la valeur est vide
///
/// Les termes vides sont conservés : ils retiennent tous les morceaux.
fn parse_filter(raw: &str) -> Option<Vec<String>> {
    if raw.is_empty() {
        return None;
    }
    Some(raw.split(',').map(|t| t.trim().to_string()).collect())
}

fn respond<T: Serialize>(status: StatusCode, result: Result<T, Error>) -> Response {
    match result {
        Ok(value) => (status, Json(value)).into_response(),
        Err(err) => map_error(err),
    }
}

fn map_status<S: Into<String>>(status: StatusCode, error: &str, message: S) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
        .into_response()
}

fn map_rejection(rejection: JsonRejection) -> Response {
    map_status(StatusCode::BAD_REQUEST, "INVALID_BODY", rejection.body_text())
}

fn map_error(error: Error) -> Response {
    let status = match error.kind() {
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
    };
    tracing::debug!(status = %status, "Catalog request rejected: {}", error);
    map_status(status, error.code(), error.to_string())
}
