//! Per-platform game catalogs
//!
//! A catalog is the full game list of one platform, read from
//! `<root>/all_games_<platform>.csv`. Only one catalog is active at a time;
//! loading another platform replaces it.

use crate::{GenreMap, LibraryError};
use gamedex_config::DataConfig;
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Column holding the game name
pub const NAME_COLUMN: &str = "name";

/// Column holding the genre id list
pub const GENRES_COLUMN: &str = "genres";

/// Column holding the catalog rating
pub const RATING_COLUMN: &str = "rating";

/// A row of a platform catalog
///
/// Columns other than these are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub name: Option<String>,
    /// Raw id list on disk, decorated names once loaded
    pub genres: Option<String>,
    /// Passed through as written
    pub rating: Option<String>,
}

/// Genre tally for one requested genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

/// Active platform catalog
pub struct CatalogStore {
    data: DataConfig,
    genres: Arc<GenreMap>,
    platform: Option<String>,
    games: Vec<GameRecord>,
    has_genres_column: bool,
}

impl CatalogStore {
    /// Create an empty store around an already loaded genre map
    pub fn new(data: DataConfig, genres: Arc<GenreMap>) -> Self {
        Self {
            data,
            genres,
            platform: None,
            games: Vec::new(),
            has_genres_column: false,
        }
    }

    /// Create a store, loading the genre map named by `data`
    pub fn open(data: DataConfig) -> Self {
        let genres = GenreMap::load_or_empty(&data.genres_path());
        Self::new(data, Arc::new(genres))
    }

    pub fn genre_map(&self) -> &GenreMap {
        &self.genres
    }

    /// Sorted display names of every known genre
    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.names_sorted()
    }

    /// Decode a raw genre field with this store's genre map
    pub fn decorate_genres(&self, raw: Option<&str>) -> String {
        self.genres.decorate(raw)
    }

    /// Catalog file for a platform
    pub fn catalog_path(&self, platform: &str) -> PathBuf {
        self.data.catalog_path(platform)
    }

    /// Replace the active catalog with `platform`'s
    ///
    /// On failure the active catalog is left empty. Returns the row count.
    pub fn load_catalog(&mut self, platform: &str) -> Result<usize, LibraryError> {
        self.clear();

        let path = self.catalog_path(platform);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Catalog for {} not found at {}", platform, path.display());
                return Err(LibraryError::CatalogNotFound(path));
            }
            Err(e) => return Err(e.into()),
        };

        self.load_from_reader(platform, file)?;
        info!("Loaded {} games for {}", self.games.len(), platform);
        Ok(self.games.len())
    }

    /// Replace the active catalog with delimited data read from `reader`
    ///
    /// Columns are found by header name; when a header repeats, its first
    /// occurrence is used.
    pub fn load_from_reader<R: Read>(
        &mut self,
        platform: &str,
        reader: R,
    ) -> Result<usize, LibraryError> {
        self.clear();

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.data.catalog_delimiter())
            .flexible(true)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();
        let column = |wanted: &str| headers.iter().position(|h| h == wanted);
        let name_column = column(NAME_COLUMN);
        let genres_column = column(GENRES_COLUMN);
        let rating_column = column(RATING_COLUMN);

        let mut games = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let field = |index: Option<usize>| {
                index
                    .and_then(|i| record.get(i))
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            };
            games.push(GameRecord {
                name: field(name_column),
                genres: field(genres_column),
                rating: field(rating_column),
            });
        }

        let has_genres_column = genres_column.is_some();
        if has_genres_column && !self.genres.is_empty() {
            debug!("Translating genre ids to names for {} games", games.len());
            for game in &mut games {
                game.genres = Some(self.genres.decorate(game.genres.as_deref()));
            }
        }

        self.games = games;
        self.has_genres_column = has_genres_column;
        self.platform = Some(platform.to_string());
        Ok(self.games.len())
    }

    /// Drop the active catalog
    pub fn clear(&mut self) {
        self.games.clear();
        self.platform = None;
        self.has_genres_column = false;
    }

    /// Platform of the active catalog
    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.platform.is_some()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Every row of the active catalog, in file order
    pub fn full_catalog(&self) -> &[GameRecord] {
        &self.games
    }

    /// Rows whose name contains `query`, ignoring case
    ///
    /// An empty query matches every row. Rows without a name never match.
    pub fn search_by_name(&self, query: &str) -> Vec<&GameRecord> {
        if query.is_empty() {
            return self.games.iter().collect();
        }

        let needle = query.to_lowercase();
        self.games
            .iter()
            .filter(|game| {
                game.name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Count rows whose genres contain each requested name
    ///
    /// Results follow the request order; repeated names are counted once.
    /// Matching is a case-sensitive substring test against the decorated
    /// genres. Empty when no catalog with a genres column is loaded.
    pub fn count_by_genre<S: AsRef<str>>(&self, genres: &[S]) -> Vec<GenreCount> {
        if self.games.is_empty() || !self.has_genres_column {
            return Vec::new();
        }

        let mut counts: Vec<GenreCount> = Vec::with_capacity(genres.len());
        for genre in genres {
            let genre = genre.as_ref();
            if counts.iter().any(|c| c.genre == genre) {
                continue;
            }

            let count = self
                .games
                .iter()
                .filter(|game| game.genres.as_deref().is_some_and(|g| g.contains(genre)))
                .count();
            counts.push(GenreCount {
                genre: genre.to_string(),
                count,
            });
        }

        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = "\
name,genres,rating,released
The Legend of Zelda,\"[4, 9]\",4.5,1986
Doom,[4],4.2,1993
Tetris,[9],4.0,1984
Halo,\"[4, 5]\",4.3,2001
Mystery Cart,oops,,1990
,[5],3.0,2000
";

    fn store() -> CatalogStore {
        let genres: GenreMap = [
            (4, "Action".to_string()),
            (5, "Shooter".to_string()),
            (9, "Puzzle".to_string()),
        ]
        .into_iter()
        .collect();
        CatalogStore::new(DataConfig::default(), Arc::new(genres))
    }

    fn loaded() -> CatalogStore {
        let mut store = store();
        store.load_from_reader("PC", CATALOG.as_bytes()).unwrap();
        store
    }

    #[test]
    fn test_load_decorates_genres() {
        let store = loaded();
        assert_eq!(store.len(), 6);
        assert_eq!(store.platform(), Some("PC"));

        let games = store.full_catalog();
        assert_eq!(games[0].genres.as_deref(), Some("Action, Puzzle"));
        assert_eq!(games[3].genres.as_deref(), Some("Action, Shooter"));
        assert_eq!(games[4].genres.as_deref(), Some(crate::INVALID_GENRE));
        assert_eq!(games[0].rating.as_deref(), Some("4.5"));
        assert_eq!(games[4].rating, None);
    }

    #[test]
    fn test_load_without_genre_map_keeps_raw_ids() {
        let mut store = CatalogStore::new(DataConfig::default(), Arc::new(GenreMap::new()));
        store.load_from_reader("PC", CATALOG.as_bytes()).unwrap();
        assert_eq!(store.full_catalog()[1].genres.as_deref(), Some("[4]"));
    }

    #[test]
    fn test_search_empty_query_returns_everything() {
        let store = loaded();
        let results = store.search_by_name("");
        let expected: Vec<&GameRecord> = store.full_catalog().iter().collect();
        assert_eq!(results, expected);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = loaded();
        for query in ["Zelda", "zelda", "ZELDA"] {
            let results = store.search_by_name(query);
            assert_eq!(results.len(), 1);
            assert_eq!(results[0].name.as_deref(), Some("The Legend of Zelda"));
        }
    }

    #[test]
    fn test_search_treats_query_literally() {
        let store = loaded();
        assert!(store.search_by_name("Zel.a").is_empty());
    }

    #[test]
    fn test_search_skips_nameless_rows() {
        let store = loaded();
        let results = store.search_by_name("o");
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|game| game.name.is_some()));
        assert_eq!(store.search_by_name("").len(), 6);
    }

    #[test]
    fn test_search_does_not_mutate() {
        let store = loaded();
        let _ = store.search_by_name("doom");
        assert_eq!(store.len(), 6);
    }

    #[test]
    fn test_count_by_genre_keeps_request_order() {
        let store = loaded();
        let counts = store.count_by_genre(&["Shooter", "Action", "Racing"]);
        assert_eq!(
            counts,
            vec![
                GenreCount {
                    genre: "Shooter".to_string(),
                    count: 2
                },
                GenreCount {
                    genre: "Action".to_string(),
                    count: 3
                },
                GenreCount {
                    genre: "Racing".to_string(),
                    count: 0
                },
            ]
        );
    }

    #[test]
    fn test_count_by_genre_is_case_sensitive() {
        let store = loaded();
        assert_eq!(store.count_by_genre(&["action"])[0].count, 0);
    }

    #[test]
    fn test_count_by_genre_deduplicates_requests() {
        let store = loaded();
        let counts = store.count_by_genre(&["Puzzle", "Puzzle"]);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].count, 2);
    }

    #[test]
    fn test_count_by_genre_without_catalog() {
        let store = store();
        assert!(store.count_by_genre(&["Action"]).is_empty());
    }

    #[test]
    fn test_count_by_genre_without_genres_column() {
        let mut store = store();
        store
            .load_from_reader("PC", "name,rating\nDoom,4.2\n".as_bytes())
            .unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.count_by_genre(&["Action"]).is_empty());
    }

    #[test]
    fn test_load_missing_catalog_clears_table() {
        let mut store = loaded();
        let err = store.load_catalog("Atari").unwrap_err();
        assert!(matches!(err, LibraryError::CatalogNotFound(_)));
        assert!(store.is_empty());
        assert!(!store.is_loaded());
    }

    #[test]
    fn test_short_rows_load() {
        let mut store = store();
        store
            .load_from_reader("PC", "name,genres,rating\nDoom\n".as_bytes())
            .unwrap();
        let game = &store.full_catalog()[0];
        assert_eq!(game.name.as_deref(), Some("Doom"));
        assert_eq!(game.genres.as_deref(), Some(crate::NO_GENRE));
    }

    #[test]
    fn test_repeated_columns_use_first_occurrence() {
        let mut store = store();
        let data = "name,genres,rating,name,genres\nDoom,[4],4.2,DOOM (1993),[9]\n";
        assert_eq!(store.load_from_reader("PC", data.as_bytes()).unwrap(), 1);

        let game = &store.full_catalog()[0];
        assert_eq!(game.name.as_deref(), Some("Doom"));
        assert_eq!(game.genres.as_deref(), Some("Action"));
        assert_eq!(game.rating.as_deref(), Some("4.2"));
    }

    #[test]
    fn test_tab_separated_catalog() {
        let data = DataConfig {
            catalog_extension: "tsv".to_string(),
            ..DataConfig::default()
        };
        let genres: GenreMap = [(4, "Action".to_string())].into_iter().collect();
        let mut store = CatalogStore::new(data, Arc::new(genres));

        let tsv = "name\tgenres\trating\nDoom, Eternal\t[4]\t4.4\n";
        store.load_from_reader("PC", tsv.as_bytes()).unwrap();

        let game = &store.full_catalog()[0];
        assert_eq!(game.name.as_deref(), Some("Doom, Eternal"));
        assert_eq!(game.genres.as_deref(), Some("Action"));
    }
}
