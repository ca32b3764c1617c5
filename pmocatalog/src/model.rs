//! Entités du catalogue et paramètres typés des opérations

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Identifiant de morceau, attribué par le catalogue
pub type SongId = u64;

/// Identifiant de playlist, attribué par le catalogue
pub type PlaylistId = u64;

/// Un morceau du catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "pmoserver", derive(utoipa::ToSchema))]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: String,
}

impl Song {
    /// Même couple (titre, artiste), sans tenir compte de la casse
    pub(crate) fn same_pair(&self, title: &str, artist: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
            && self.artist.to_lowercase() == artist.to_lowercase()
    }

    pub(crate) fn matches_any(&self, terms: &[String]) -> bool {
        let title = self.title.to_lowercase();
        let artist = self.artist.to_lowercase();
        terms
            .iter()
            .any(|term| title.contains(term.as_str()) || artist.contains(term.as_str()))
    }
}

/// Une playlist : liste ordonnée d'identifiants de morceaux
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "pmoserver", derive(utoipa::ToSchema))]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    #[serde(rename = "songIds")]
    pub song_ids: Vec<SongId>,
}

/// Playlist avec ses morceaux résolus, dans l'ordre de `songIds`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "pmoserver", derive(utoipa::ToSchema))]
pub struct PlaylistDetail {
    #[serde(flatten)]
    #[cfg_attr(feature = "pmoserver", schema(inline))]
    pub playlist: Playlist,
    pub songs: Vec<Song>,
}

/// Paramètres de création d'un morceau
///
/// Les champs restent des valeurs JSON brutes : un champ absent, `null`
/// ou d'un autre type qu'une chaîne est refusé à la validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "pmoserver", derive(utoipa::ToSchema))]
pub struct SongDraft {
    #[cfg_attr(feature = "pmoserver", schema(value_type = Option<String>, example = "Abracadabra"))]
    pub title: Option<Value>,
    #[cfg_attr(feature = "pmoserver", schema(value_type = Option<String>, example = "Lady Gaga"))]
    pub artist: Option<Value>,
}

impl SongDraft {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: Some(Value::String(title.into())),
            artist: Some(Value::String(artist.into())),
        }
    }
}

/// Mise à jour partielle d'un morceau
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "pmoserver", derive(utoipa::ToSchema))]
pub struct SongPatch {
    #[cfg_attr(feature = "pmoserver", schema(value_type = Option<String>))]
    pub title: Option<Value>,
    #[cfg_attr(feature = "pmoserver", schema(value_type = Option<String>))]
    pub artist: Option<Value>,
}

impl SongPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(Value::String(title.into()));
        self
    }

    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(Value::String(artist.into()));
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.title.is_none() && self.artist.is_none()
    }
}

/// Paramètres de création d'une playlist
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "pmoserver", derive(utoipa::ToSchema))]
pub struct PlaylistDraft {
    #[cfg_attr(feature = "pmoserver", schema(value_type = Option<String>, example = "Road Trip"))]
    pub name: Option<Value>,
}

impl PlaylistDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(Value::String(name.into())),
        }
    }
}

/// Extrait une chaîne non vide (après trim) d'un champ brut
pub(crate) fn required_text(field: &str, value: Option<&Value>) -> Result<String> {
    match value {
        None => Err(Error::InvalidInput(format!("Missing {}", field))),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(Error::InvalidInput(format!("{} cannot be empty", field)))
            } else {
                Ok(trimmed.to_string())
            }
        }
        Some(_) => Err(Error::InvalidInput(format!("{} must be a string", field))),
    }
}

/// Variante de [`required_text`] pour les champs facultatifs
pub(crate) fn optional_text(field: &str, value: Option<&Value>) -> Result<Option<String>> {
    value.map(|v| required_text(field, Some(v))).transpose()
}

/// Analyse un identifiant brut (segment de chemin) en entier positif
pub fn parse_id(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::InvalidId(raw.to_string())),
    }
}

/// Analyse un identifiant servant seulement à une recherche
///
/// Tout entier est accepté ; `None` s'il ne peut désigner aucune entité
/// (zéro ou négatif). Seul un texte qui n'est pas un entier est refusé.
pub(crate) fn parse_ref_id(raw: &str) -> Result<Option<u64>> {
    match raw.trim().parse::<i128>() {
        Ok(n) => Ok(u64::try_from(n).ok().filter(|&id| id > 0)),
        Err(_) => Err(Error::InvalidId(raw.to_string())),
    }
}
