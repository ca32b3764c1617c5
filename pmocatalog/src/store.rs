//! CatalogStore : propriétaire des morceaux, des playlists et des compteurs
//!
//! Toutes les opérations valident entièrement leurs paramètres avant de
//! modifier quoi que ce soit : une erreur laisse le catalogue intact.
//! Les identifiants viennent de compteurs monotones, jamais réutilisés,
//! même après suppression.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{
    optional_text, parse_id, parse_ref_id, required_text, Playlist, PlaylistDetail,
    PlaylistDraft, PlaylistId, Song, SongDraft, SongId, SongPatch,
};

/// Catalogue partagé entre les handlers HTTP
///
/// Chaque opération s'exécute entièrement sous le verrou : lecture,
/// vérification et modification sont atomiques vis-à-vis des autres requêtes.
pub type SharedCatalog = Arc<RwLock<CatalogStore>>;

/// Catalogue en mémoire
#[derive(Debug, Clone)]
pub struct CatalogStore {
    songs: Vec<Song>,
    playlists: Vec<Playlist>,
    next_song_id: SongId,
    next_playlist_id: PlaylistId,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    /// Catalogue vide, premiers identifiants à 1
    pub fn new() -> Self {
        Self {
            songs: Vec::new(),
            playlists: Vec::new(),
            next_song_id: 1,
            next_playlist_id: 1,
        }
    }

    /// Construit un catalogue à partir d'entités existantes
    ///
    /// Les compteurs repartent au-delà du plus grand identifiant présent.
    pub(crate) fn from_parts(songs: Vec<Song>, playlists: Vec<Playlist>) -> Self {
        let next_song_id = songs.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let next_playlist_id = playlists.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        Self {
            songs,
            playlists,
            next_song_id,
            next_playlist_id,
        }
    }

    /// Encapsule le catalogue pour un usage concurrent
    pub fn into_shared(self) -> SharedCatalog {
        Arc::new(RwLock::new(self))
    }

    pub fn next_song_id(&self) -> SongId {
        self.next_song_id
    }

    pub fn next_playlist_id(&self) -> PlaylistId {
        self.next_playlist_id
    }

    // ---------------------------------------------------------------
    // Morceaux
    // ---------------------------------------------------------------

    /// Liste les morceaux dans l'ordre de création
    ///
    /// Avec des termes de filtre, ne garde que les morceaux dont le titre
    /// ou l'artiste contient au moins un des termes (après trim, sans tenir
    /// compte de la casse). Un terme vide est contenu dans tout titre : il
    /// retient tous les morceaux.
    pub fn list_songs(&self, filter_terms: Option<&[String]>) -> Vec<Song> {
        let terms: Vec<String> = match filter_terms {
            Some(terms) if !terms.is_empty() => {
                terms.iter().map(|t| t.trim().to_lowercase()).collect()
            }
            _ => return self.songs.clone(),
        };

        self.songs
            .iter()
            .filter(|song| song.matches_any(&terms))
            .cloned()
            .collect()
    }

    /// Un identifiant illisible ne peut désigner aucun morceau : `SongNotFound`
    pub fn get_song(&self, id: &str) -> Result<Song> {
        parse_id(id)
            .ok()
            .and_then(|id| self.find_song(id))
            .cloned()
            .ok_or_else(|| Error::SongNotFound(id.to_string()))
    }

    pub fn create_song(&mut self, draft: &SongDraft) -> Result<Song> {
        let title = required_text("title", draft.title.as_ref())?;
        let artist = required_text("artist", draft.artist.as_ref())?;

        if self.songs.iter().any(|s| s.same_pair(&title, &artist)) {
            return Err(Error::SongAlreadyExists { title, artist });
        }

        let song = Song {
            id: self.next_song_id,
            title,
            artist,
        };
        self.songs.push(song.clone());
        self.next_song_id += 1;

        debug!(song_id = song.id, title = %song.title, artist = %song.artist, "Song created");
        Ok(song)
    }

    /// Mise à jour partielle : seuls les champs fournis sont modifiés
    pub fn update_song(&mut self, id: &str, patch: &SongPatch) -> Result<Song> {
        let song_id = parse_id(id)?;
        let index = self
            .song_index(song_id)
            .ok_or_else(|| Error::SongNotFound(id.to_string()))?;

        if patch.is_empty() {
            return Err(Error::InvalidInput(
                "At least one of title or artist must be provided".into(),
            ));
        }

        let title = optional_text("title", patch.title.as_ref())?;
        let artist = optional_text("artist", patch.artist.as_ref())?;

        let current = &self.songs[index];
        let new_title = title.unwrap_or_else(|| current.title.clone());
        let new_artist = artist.unwrap_or_else(|| current.artist.clone());

        if self
            .songs
            .iter()
            .any(|s| s.id != song_id && s.same_pair(&new_title, &new_artist))
        {
            return Err(Error::SongAlreadyExists {
                title: new_title,
                artist: new_artist,
            });
        }

        let song = &mut self.songs[index];
        song.title = new_title;
        song.artist = new_artist;

        debug!(song_id, "Song updated");
        Ok(song.clone())
    }

    /// Supprime un morceau qu'aucune playlist ne référence
    ///
    /// Renvoie le morceau supprimé. Si des playlists le référencent, la
    /// suppression est refusée (`SongInUse`) et rien n'est modifié.
    pub fn delete_song(&mut self, id: &str) -> Result<Song> {
        let song_id = parse_id(id)?;
        let index = self
            .song_index(song_id)
            .ok_or_else(|| Error::SongNotFound(id.to_string()))?;

        let playlist_ids: Vec<PlaylistId> = self
            .playlists
            .iter()
            .filter(|p| p.song_ids.contains(&song_id))
            .map(|p| p.id)
            .collect();
        if !playlist_ids.is_empty() {
            return Err(Error::SongInUse {
                song_id,
                playlist_ids,
            });
        }

        let song = self.songs.remove(index);
        info!(song_id, "Song deleted");
        Ok(song)
    }

    // ---------------------------------------------------------------
    // Playlists
    // ---------------------------------------------------------------

    /// Liste les playlists (identifiants bruts) dans l'ordre de création
    pub fn list_playlists(&self) -> Vec<Playlist> {
        self.playlists.clone()
    }

    /// `InvalidId` si l'identifiant n'est pas un entier ; un entier qui ne
    /// désigne aucune playlist (0, négatif, inconnu) donne `PlaylistNotFound`
    pub fn get_playlist(&self, id: &str) -> Result<PlaylistDetail> {
        let playlist = parse_ref_id(id)?
            .and_then(|pid| self.find_playlist(pid))
            .ok_or_else(|| Error::PlaylistNotFound(id.to_string()))?;
        Ok(self.expand(playlist))
    }

    pub fn create_playlist(&mut self, draft: &PlaylistDraft) -> Result<Playlist> {
        let name = required_text("name", draft.name.as_ref())?;

        let lowered = name.to_lowercase();
        if self
            .playlists
            .iter()
            .any(|p| p.name.trim().to_lowercase() == lowered)
        {
            return Err(Error::PlaylistAlreadyExists(name));
        }

        let playlist = Playlist {
            id: self.next_playlist_id,
            name,
            song_ids: Vec::new(),
        };
        self.playlists.push(playlist.clone());
        self.next_playlist_id += 1;

        debug!(playlist_id = playlist.id, name = %playlist.name, "Playlist created");
        Ok(playlist)
    }

    /// Ajoute un morceau en fin de playlist
    pub fn add_song_to_playlist(
        &mut self,
        playlist_id: &str,
        song_id: &str,
    ) -> Result<PlaylistDetail> {
        let pid = parse_ref_id(playlist_id)?;
        let sid = parse_ref_id(song_id)?;

        let index = pid
            .and_then(|pid| self.playlists.iter().position(|p| p.id == pid))
            .ok_or_else(|| Error::PlaylistNotFound(playlist_id.to_string()))?;
        let sid = sid
            .filter(|&sid| self.find_song(sid).is_some())
            .ok_or_else(|| Error::SongNotFound(song_id.to_string()))?;

        let playlist = &mut self.playlists[index];
        let pid = playlist.id;
        if playlist.song_ids.contains(&sid) {
            return Err(Error::SongAlreadyInPlaylist {
                playlist_id: pid,
                song_id: sid,
            });
        }
        playlist.song_ids.push(sid);

        debug!(playlist_id = pid, song_id = sid, "Song added to playlist");
        Ok(self.expand(&self.playlists[index]))
    }

    // ---------------------------------------------------------------

    fn find_song(&self, id: SongId) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == id)
    }

    fn song_index(&self, id: SongId) -> Option<usize> {
        self.songs.iter().position(|s| s.id == id)
    }

    fn find_playlist(&self, id: PlaylistId) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == id)
    }

    /// Résout `song_ids` dans l'ordre ; les références pendantes sont ignorées
    fn expand(&self, playlist: &Playlist) -> PlaylistDetail {
        let songs = playlist
            .song_ids
            .iter()
            .filter_map(|&sid| {
                let song = self.find_song(sid).cloned();
                if song.is_none() {
                    warn!(playlist_id = playlist.id, song_id = sid, "Dangling song reference skipped");
                }
                song
            })
            .collect();

        PlaylistDetail {
            playlist: playlist.clone(),
            songs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn song_titles(songs: &[Song]) -> Vec<&str> {
        songs.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_defaults() {
        let store = CatalogStore::with_defaults();
        assert_eq!(store.list_songs(None).len(), 8);
        assert_eq!(store.list_playlists().len(), 3);
        assert_eq!(store.next_song_id(), 9);
        assert_eq!(store.next_playlist_id(), 4);
    }

    #[test]
    fn test_list_songs_filter() {
        let store = CatalogStore::with_defaults();

        let songs = store.list_songs(Some(&["abra".to_string()]));
        assert_eq!(song_titles(&songs), vec!["Abracadabra"]);

        // Termes combinés en OU, sur le titre ou l'artiste
        let songs = store.list_songs(Some(&[" LUCY ".to_string(), "weeknd".to_string()]));
        assert_eq!(song_titles(&songs), vec!["Cry For Me", "Lucy"]);

        let songs = store.list_songs(Some(&["nothing-matches".to_string()]));
        assert!(songs.is_empty());

        let songs = store.list_songs(Some(&["  ".to_string()]));
        assert_eq!(songs.len(), 8);

        // Un terme vide retient tout, même combiné à un terme sans résultat
        let songs = store.list_songs(Some(&["zzz".to_string(), " ".to_string()]));
        assert_eq!(songs.len(), 8);

        assert_eq!(store.list_songs(Some(&[])).len(), 8);
    }

    #[test]
    fn test_create_and_get_song() {
        let mut store = CatalogStore::new();
        let song = store.create_song(&SongDraft::new("  A ", " B")).unwrap();
        assert_eq!(song.id, 1);
        assert_eq!(song.title, "A");
        assert_eq!(song.artist, "B");

        let fetched = store.get_song(&song.id.to_string()).unwrap();
        assert_eq!(fetched, song);
    }

    #[test]
    fn test_get_song_not_found() {
        let store = CatalogStore::with_defaults();
        assert_eq!(
            store.get_song("42").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            store.get_song("abc").unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_create_song_invalid_input() {
        let mut store = CatalogStore::with_defaults();
        let cases = [
            SongDraft::default(),
            SongDraft {
                title: Some(json!("Title")),
                artist: None,
            },
            SongDraft {
                title: Some(json!(12)),
                artist: Some(json!("Artist")),
            },
            SongDraft::new("   ", "Artist"),
        ];

        for draft in &cases {
            let err = store.create_song(draft).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{:?}", draft);
        }
        assert_eq!(store.next_song_id(), 9);
        assert_eq!(store.list_songs(None).len(), 8);
    }

    #[test]
    fn test_duplicate_song_conflict_keeps_counter() {
        let mut store = CatalogStore::with_defaults();
        let err = store
            .create_song(&SongDraft::new("abracadabra ", "LADY GAGA"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(store.next_song_id(), 9);
        assert_eq!(store.list_songs(None).len(), 8);

        // Même titre, autre artiste : accepté
        let song = store
            .create_song(&SongDraft::new("Abracadabra", "Someone Else"))
            .unwrap();
        assert_eq!(song.id, 9);
    }

    #[test]
    fn test_update_song() {
        let mut store = CatalogStore::with_defaults();

        let song = store
            .update_song("6", &SongPatch::default().title(" Messy (Remix) "))
            .unwrap();
        assert_eq!(song.title, "Messy (Remix)");
        assert_eq!(song.artist, "Lola Young");
        assert_eq!(store.get_song("6").unwrap(), song);

        let song = store
            .update_song("6", &SongPatch::default().artist("Lola"))
            .unwrap();
        assert_eq!(song.title, "Messy (Remix)");
        assert_eq!(song.artist, "Lola");
    }

    #[test]
    fn test_update_song_errors() {
        let mut store = CatalogStore::with_defaults();
        let patch = SongPatch::default().title("New");

        assert!(matches!(
            store.update_song("x", &patch),
            Err(Error::InvalidId(_))
        ));
        assert!(matches!(
            store.update_song("99", &patch),
            Err(Error::SongNotFound(_))
        ));
        assert!(matches!(
            store.update_song("1", &SongPatch::default()),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            store.update_song("1", &SongPatch::default().title("  ")),
            Err(Error::InvalidInput(_))
        ));

        // Ne doit pas créer de doublon (titre, artiste)
        let err = store
            .update_song(
                "1",
                &SongPatch::default().title("Busy Woman").artist("sabrina carpenter"),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(store.get_song("1").unwrap().title, "Cry For Me");

        // Changer la casse de son propre titre reste permis
        let song = store
            .update_song("1", &SongPatch::default().title("CRY FOR ME"))
            .unwrap();
        assert_eq!(song.title, "CRY FOR ME");
    }

    #[test]
    fn test_delete_song() {
        let mut store = CatalogStore::with_defaults();

        let deleted = store.delete_song("7").unwrap();
        assert_eq!(deleted.title, "Lucy");
        assert!(store.get_song("7").is_err());

        assert!(matches!(store.delete_song("7"), Err(Error::SongNotFound(_))));
        assert!(matches!(store.delete_song("seven"), Err(Error::InvalidId(_))));
    }

    #[test]
    fn test_delete_referenced_song_is_rejected() {
        let mut store = CatalogStore::with_defaults();
        let before = store.list_playlists();

        // Le morceau 2 est dans "Hot Hits Iceland" et "Workout Playlist"
        let err = store.delete_song("2").unwrap_err();
        assert_eq!(
            err,
            Error::SongInUse {
                song_id: 2,
                playlist_ids: vec![1, 2],
            }
        );
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(store.get_song("2").is_ok());
        assert_eq!(store.list_playlists(), before);
    }

    #[test]
    fn test_ids_never_reused() {
        let mut store = CatalogStore::new();
        let a = store.create_song(&SongDraft::new("A", "X")).unwrap();
        let b = store.create_song(&SongDraft::new("B", "X")).unwrap();
        store.delete_song(&b.id.to_string()).unwrap();
        store.delete_song(&a.id.to_string()).unwrap();

        let c = store.create_song(&SongDraft::new("C", "X")).unwrap();
        assert!(c.id > b.id);
        assert_eq!(c.id, 3);
    }

    #[test]
    fn test_get_playlist_expands_in_order() {
        let mut store = CatalogStore::with_defaults();
        let playlist = store.create_playlist(&PlaylistDraft::new("Duo")).unwrap();
        let pid = playlist.id.to_string();
        store.add_song_to_playlist(&pid, "2").unwrap();
        store.add_song_to_playlist(&pid, "1").unwrap();

        let detail = store.get_playlist(&pid).unwrap();
        assert_eq!(detail.playlist.song_ids, vec![2, 1]);
        assert_eq!(song_titles(&detail.songs), vec!["Busy Woman", "Cry For Me"]);
    }

    #[test]
    fn test_get_playlist_errors() {
        let store = CatalogStore::with_defaults();
        assert!(matches!(store.get_playlist("abc"), Err(Error::InvalidId(_))));
        assert!(matches!(
            store.get_playlist("10"),
            Err(Error::PlaylistNotFound(_))
        ));
    }

    #[test]
    fn test_expand_skips_dangling_references() {
        let store = CatalogStore::from_parts(
            vec![Song {
                id: 1,
                title: "Only".into(),
                artist: "One".into(),
            }],
            vec![Playlist {
                id: 1,
                name: "Broken".into(),
                song_ids: vec![5, 1],
            }],
        );

        let detail = store.get_playlist("1").unwrap();
        assert_eq!(detail.playlist.song_ids, vec![5, 1]);
        assert_eq!(song_titles(&detail.songs), vec!["Only"]);
    }

    #[test]
    fn test_create_playlist() {
        let mut store = CatalogStore::with_defaults();
        let playlist = store
            .create_playlist(&PlaylistDraft::new("  Road Trip "))
            .unwrap();
        assert_eq!(playlist.id, 4);
        assert_eq!(playlist.name, "Road Trip");
        assert!(playlist.song_ids.is_empty());

        let err = store
            .create_playlist(&PlaylistDraft::new(" Lo-Fi Study "))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err = store
            .create_playlist(&PlaylistDraft::new("hot hits iceland"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        for draft in [
            PlaylistDraft::default(),
            PlaylistDraft::new("   "),
            PlaylistDraft {
                name: Some(json!(["list"])),
            },
        ] {
            let err = store.create_playlist(&draft).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
        assert_eq!(store.next_playlist_id(), 5);
    }

    #[test]
    fn test_add_song_twice_conflicts() {
        let mut store = CatalogStore::with_defaults();

        let detail = store.add_song_to_playlist("3", "8").unwrap();
        assert_eq!(detail.playlist.song_ids, vec![8]);
        assert_eq!(song_titles(&detail.songs), vec!["Eclipse"]);

        let err = store.add_song_to_playlist("3", "8").unwrap_err();
        assert_eq!(
            err,
            Error::SongAlreadyInPlaylist {
                playlist_id: 3,
                song_id: 8
            }
        );
        assert_eq!(store.get_playlist("3").unwrap().playlist.song_ids, vec![8]);
    }

    #[test]
    fn test_add_song_to_playlist_errors() {
        let mut store = CatalogStore::with_defaults();
        assert!(matches!(
            store.add_song_to_playlist("x", "1"),
            Err(Error::InvalidId(_))
        ));
        assert!(matches!(
            store.add_song_to_playlist("1", "y"),
            Err(Error::InvalidId(_))
        ));
        assert!(matches!(
            store.add_song_to_playlist("9", "1"),
            Err(Error::PlaylistNotFound(_))
        ));
        assert!(matches!(
            store.add_song_to_playlist("3", "99"),
            Err(Error::SongNotFound(_))
        ));
        assert!(matches!(
            store.add_song_to_playlist("0", "1"),
            Err(Error::PlaylistNotFound(_))
        ));
        assert!(matches!(
            store.add_song_to_playlist("3", "-2"),
            Err(Error::SongNotFound(_))
        ));
        assert!(matches!(
            store.add_song_to_playlist("-1", "x"),
            Err(Error::InvalidId(_))
        ));
        assert!(store.get_playlist("3").unwrap().playlist.song_ids.is_empty());
    }

    #[test]
    fn test_get_playlist_with_integer_matching_nothing() {
        let store = CatalogStore::with_defaults();
        for id in ["0", "-1", " 42 "] {
            let err = store.get_playlist(id).unwrap_err();
            assert_eq!(err, Error::PlaylistNotFound(id.to_string()));
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
        assert_eq!(
            store.get_playlist("one").unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_added_song_blocks_deletion_everywhere() {
        let mut store = CatalogStore::with_defaults();
        store.add_song_to_playlist("3", "4").unwrap();

        let err = store.delete_song("4").unwrap_err();
        assert_eq!(
            err,
            Error::SongInUse {
                song_id: 4,
                playlist_ids: vec![1, 3],
            }
        );
    }
}
