//! User favorites, persisted as a CSV table
//!
//! The whole table is rewritten after every mutation, so the file on disk
//! always matches memory. Single-process use only.

use crate::{GameRecord, LibraryError};
use gamedex_config::DataConfig;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Header of the favorites file, in order
pub const FAVORITE_COLUMNS: [&str; 5] = [
    "name",
    "genres",
    "rating",
    "personal_notes",
    "personal_rating",
];

/// Highest personal rating a favorite can carry
pub const MAX_PERSONAL_RATING: u8 = 10;

/// A favorite game with personal annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub name: String,
    #[serde(default)]
    pub genres: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub personal_notes: String,
    #[serde(default, deserialize_with = "deserialize_personal_rating")]
    pub personal_rating: u8,
}

impl FavoriteRecord {
    /// New favorite without personal annotations
    pub fn new(
        name: impl Into<String>,
        genres: impl Into<String>,
        rating: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            genres: genres.into(),
            rating: rating.into(),
            personal_notes: String::new(),
            personal_rating: 0,
        }
    }

    /// Copy a catalog row's name, decorated genres and rating
    ///
    /// Returns `None` for rows without a name.
    pub fn from_game(game: &GameRecord) -> Option<Self> {
        let name = game.name.clone()?;
        Some(Self::new(
            name,
            game.genres.clone().unwrap_or_default(),
            game.rating.clone().unwrap_or_default(),
        ))
    }
}

/// Accepts blank cells and decimal forms such as `7.0`
fn deserialize_personal_rating<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let raw = match raw.as_deref().map(str::trim) {
        None | Some("") => return Ok(0),
        Some(raw) => raw,
    };

    let value: f64 = raw
        .parse()
        .map_err(|_| de::Error::custom(format!("invalid personal rating '{}'", raw)))?;
    if !value.is_finite() {
        return Ok(0);
    }
    Ok(value.round().clamp(0.0, f64::from(MAX_PERSONAL_RATING)) as u8)
}

/// Favorites table backed by a CSV file
pub struct FavoritesStore {
    path: PathBuf,
    favorites: Vec<FavoriteRecord>,
}

impl FavoritesStore {
    /// Open the favorites file, creating it when absent
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let mut store = Self {
            path: path.into(),
            favorites: Vec::new(),
        };
        store.load()?;
        Ok(store)
    }

    /// Open the favorites file named by `data`
    pub fn from_config(data: &DataConfig) -> Result<Self, LibraryError> {
        Self::open(data.favorites_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload from disk
    ///
    /// An empty file means no favorites yet. A missing file is created with
    /// just the header row.
    pub fn load(&mut self) -> Result<(), LibraryError> {
        if !self.path.exists() {
            info!("No favorites file found, creating {}", self.path.display());
            self.favorites.clear();
            return self.save();
        }

        self.favorites = read_favorites(File::open(&self.path)?)?;
        if self.favorites.is_empty() {
            info!("Favorites file is empty, starting with a new list");
        } else {
            info!("Loaded {} favorite games", self.favorites.len());
        }
        Ok(())
    }

    /// Rewrite the favorites file from memory
    pub fn save(&self) -> Result<(), LibraryError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        writer.write_record(FAVORITE_COLUMNS)?;
        for favorite in &self.favorites {
            writer.serialize(favorite)?;
        }
        writer.flush()?;

        debug!(
            "Saved {} favorites to {}",
            self.favorites.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Add a favorite, rejecting names already present
    ///
    /// Personal notes and rating always start out blank.
    pub fn add(&mut self, mut favorite: FavoriteRecord) -> Result<(), LibraryError> {
        if self.contains(&favorite.name) {
            info!("'{}' is already a favorite", favorite.name);
            return Err(LibraryError::DuplicateFavorite(favorite.name));
        }

        favorite.personal_notes.clear();
        favorite.personal_rating = 0;
        info!("Adding '{}' to favorites", favorite.name);
        self.favorites.push(favorite);
        self.save()
    }

    /// Remove every favorite named `name` and persist
    ///
    /// Returns how many rows were removed. The file is rewritten even when
    /// nothing matched.
    pub fn remove(&mut self, name: &str) -> Result<usize, LibraryError> {
        let before = self.favorites.len();
        self.favorites.retain(|f| f.name != name);
        let removed = before - self.favorites.len();
        if removed > 0 {
            info!("Removed '{}' from favorites", name);
        }
        self.save()?;
        Ok(removed)
    }

    /// All favorites in insertion order
    pub fn all(&self) -> &[FavoriteRecord] {
        &self.favorites
    }

    /// First favorite named `name`
    pub fn get(&self, name: &str) -> Option<&FavoriteRecord> {
        self.favorites.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// Overwrite a favorite's personal notes and rating, then persist
    pub fn update_details(
        &mut self,
        name: &str,
        notes: &str,
        rating: u8,
    ) -> Result<(), LibraryError> {
        if rating > MAX_PERSONAL_RATING {
            return Err(LibraryError::InvalidRating(rating));
        }

        let favorite = self
            .favorites
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| LibraryError::FavoriteNotFound(name.to_string()))?;
        favorite.personal_notes = notes.to_string();
        favorite.personal_rating = rating;

        info!("Updated details for '{}'", name);
        self.save()
    }
}

fn read_favorites<R: Read>(reader: R) -> Result<Vec<FavoriteRecord>, LibraryError> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
    let favorites = rdr
        .deserialize::<FavoriteRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(favorites)
}
