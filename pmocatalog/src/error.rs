//! Types d'erreurs pour pmocatalog

use crate::model::{PlaylistId, SongId};

/// Catégorie d'une erreur, indépendante de la cause précise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Donnée manquante ou malformée fournie par l'appelant
    InvalidInput,
    /// Entité référencée absente
    NotFound,
    /// La requête violerait un invariant du catalogue
    Conflict,
}

/// Erreurs du catalogue
///
/// Une opération en échec laisse toujours le catalogue dans l'état où
/// elle l'a trouvé.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid id: '{0}'")]
    InvalidId(String),

    #[error("Song not found: {0}")]
    SongNotFound(String),

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    #[error("Song already exists: '{title}' by '{artist}'")]
    SongAlreadyExists { title: String, artist: String },

    #[error("Playlist already exists: {0}")]
    PlaylistAlreadyExists(String),

    #[error("Song {song_id} is already in playlist {playlist_id}")]
    SongAlreadyInPlaylist {
        playlist_id: PlaylistId,
        song_id: SongId,
    },

    #[error("Song {song_id} is referenced by playlists {playlist_ids:?}")]
    SongInUse {
        song_id: SongId,
        playlist_ids: Vec<PlaylistId>,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput(_) | Error::InvalidId(_) => ErrorKind::InvalidInput,
            Error::SongNotFound(_) | Error::PlaylistNotFound(_) => ErrorKind::NotFound,
            Error::SongAlreadyExists { .. }
            | Error::PlaylistAlreadyExists(_)
            | Error::SongAlreadyInPlaylist { .. }
            | Error::SongInUse { .. } => ErrorKind::Conflict,
        }
    }

    /// Code stable exposé dans les réponses d'erreur REST
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::InvalidId(_) => "INVALID_ID",
            Error::SongNotFound(_) => "SONG_NOT_FOUND",
            Error::PlaylistNotFound(_) => "PLAYLIST_NOT_FOUND",
            Error::SongAlreadyExists { .. } => "SONG_ALREADY_EXISTS",
            Error::PlaylistAlreadyExists(_) => "PLAYLIST_ALREADY_EXISTS",
            Error::SongAlreadyInPlaylist { .. } => "SONG_ALREADY_IN_PLAYLIST",
            Error::SongInUse { .. } => "SONG_IN_USE",
        }
    }
}

/// Type Result spécialisé pour pmocatalog
pub type Result<T> = std::result::Result<T, Error>;
