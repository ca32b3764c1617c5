//! # pmocatalog - Catalogue en mémoire de morceaux et de playlists
//!
//! Cette crate fournit :
//! - Le [`CatalogStore`] : morceaux, playlists et compteurs d'identifiants
//! - Une taxonomie d'erreurs typées ([`Error`], [`ErrorKind`])
//! - Une API REST Axum documentée avec OpenAPI (feature `pmoserver`)
//! - L'extension [`CatalogExt`] pour monter l'API dans `pmoserver`
//!
//! # Invariants
//!
//! - Le couple (titre, artiste) d'un morceau est unique, sans tenir compte de la casse
//! - Le nom d'une playlist est unique, sans tenir compte de la casse ni des espaces
//! - Une playlist ne contient que des morceaux existants, sans doublon
//! - Un morceau référencé par une playlist ne peut pas être supprimé
//! - Les identifiants croissent strictement et ne sont jamais réutilisés
//!
//! # Exemple d'utilisation
//!
//! ```
//! use pmocatalog::{CatalogStore, ErrorKind, PlaylistDraft, SongDraft};
//!
//! let mut store = CatalogStore::new();
//! let song = store.create_song(&SongDraft::new("Lucy", "Idle Cave"))?;
//! let playlist = store.create_playlist(&PlaylistDraft::new("Evening"))?;
//!
//! let detail = store.add_song_to_playlist(&playlist.id.to_string(), &song.id.to_string())?;
//! assert_eq!(detail.songs, vec![song.clone()]);
//!
//! // Le morceau est référencé : la suppression est refusée
//! let err = store.delete_song(&song.id.to_string()).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Conflict);
//! # Ok::<(), pmocatalog::Error>(())
//! ```

mod error;
mod model;
mod seed;
mod store;

#[cfg(feature = "pmoconfig")]
mod config_ext;

#[cfg(feature = "pmoserver")]
pub mod api;
#[cfg(feature = "pmoserver")]
pub mod openapi;
#[cfg(feature = "pmoserver")]
mod pmoserver_ext;

// Réexports publics
pub use error::{Error, ErrorKind, Result};
pub use model::{
    parse_id, Playlist, PlaylistDetail, PlaylistDraft, PlaylistId, Song, SongDraft, SongId,
    SongPatch,
};
pub use store::{CatalogStore, SharedCatalog};

#[cfg(feature = "pmoconfig")]
pub use config_ext::CatalogConfigExt;

#[cfg(feature = "pmoserver")]
pub use openapi::ApiDoc;
#[cfg(feature = "pmoserver")]
pub use pmoserver_ext::CatalogExt;
