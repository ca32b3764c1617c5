//! Catalogue de démarrage

use crate::model::{Playlist, PlaylistId, Song, SongId};
use crate::store::CatalogStore;

const DEFAULT_SONGS: &[(SongId, &str, &str)] = &[
    (1, "Cry For Me", "The Weeknd"),
    (2, "Busy Woman", "Sabrina Carpenter"),
    (
        3,
        "Call Me When You Break Up",
        "Selena Gomez, benny blanco, Gracie Adams",
    ),
    (4, "Abracadabra", "Lady Gaga"),
    (5, "Róa", "VÆB"),
    (6, "Messy", "Lola Young"),
    (7, "Lucy", "Idle Cave"),
    (8, "Eclipse", "parrow"),
];

const DEFAULT_PLAYLISTS: &[(PlaylistId, &str, &[SongId])] = &[
    (1, "Hot Hits Iceland", &[1, 2, 3, 4]),
    (2, "Workout Playlist", &[2, 5, 6]),
    (3, "Lo-Fi Study", &[]),
];

impl CatalogStore {
    /// Catalogue pré-rempli : 8 morceaux et 3 playlists
    ///
    /// Les prochains identifiants attribués sont 9 (morceaux) et 4 (playlists).
    pub fn with_defaults() -> Self {
        let songs = DEFAULT_SONGS
            .iter()
            .map(|&(id, title, artist)| Song {
                id,
                title: title.to_string(),
                artist: artist.to_string(),
            })
            .collect();

        let playlists = DEFAULT_PLAYLISTS
            .iter()
            .map(|&(id, name, song_ids)| Playlist {
                id,
                name: name.to_string(),
                song_ids: song_ids.to_vec(),
            })
            .collect();

        Self::from_parts(songs, playlists)
    }
}
