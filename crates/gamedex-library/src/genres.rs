//! Genre id to display name mapping
//!
//! Catalog files store a game's genres as a bracketed list of numeric ids
//! (`[4, 31]`). The genre reference table turns those ids into names; its first
//! column is the id and its second the name, whatever their headers say.

use crate::LibraryError;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Shown when there is no genre value or no genre map to decode it with
pub const NO_GENRE: &str = "No genre";

/// Substituted for an id missing from the genre map
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Shown when the raw genre value is not a list of integers
pub const INVALID_GENRE: &str = "Invalid genre";

/// Separator between decoded genre names
pub const GENRE_SEPARATOR: &str = ", ";

/// Immutable id -> display name lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreMap {
    names: HashMap<i64, String>,
}

impl FromIterator<(i64, String)> for GenreMap {
    fn from_iter<I: IntoIterator<Item = (i64, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

impl GenreMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the genre reference table
    pub fn load(path: &Path) -> Result<Self, LibraryError> {
        let map = Self::from_reader(File::open(path)?)?;
        info!("Loaded {} genres from {}", map.len(), path.display());
        Ok(map)
    }

    /// Load the genre reference table, degrading to an empty map
    ///
    /// With an empty map catalogs keep their raw genre ids.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(map) => map,
            Err(LibraryError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "Genre table {} not found, genre ids will be shown raw",
                    path.display()
                );
                Self::new()
            }
            Err(e) => {
                warn!("Could not read genre table {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    /// Build the map from CSV data with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LibraryError> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let columns = rdr.headers()?.len();
        if columns < 2 {
            return Err(LibraryError::InvalidGenreTable(format!(
                "expected at least 2 columns, found {}",
                columns
            )));
        }

        let mut names = HashMap::new();
        for record in rdr.records() {
            let record = record?;
            let (Some(id), Some(name)) = (record.get(0), record.get(1)) else {
                continue;
            };

            match id.trim().parse::<i64>() {
                Ok(id) => {
                    names.insert(id, name.to_string());
                }
                Err(_) => debug!("Skipping genre row with non-numeric id '{}'", id),
            }
        }

        Ok(Self { names })
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Display name for an id
    pub fn get(&self, id: i64) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// All display names, sorted and deduplicated
    pub fn names_sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.values().map(String::as_str).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Turn a raw genre field into a comma-joined list of names
    ///
    /// Never fails: a missing value or empty map gives [`NO_GENRE`], an
    /// unparseable value gives [`INVALID_GENRE`] and unmapped ids become
    /// [`UNKNOWN_GENRE`].
    pub fn decorate(&self, raw: Option<&str>) -> String {
        let raw = match raw {
            Some(raw) if !self.is_empty() => raw,
            _ => return NO_GENRE.to_string(),
        };

        match parse_genre_ids(raw) {
            Some(ids) => ids
                .into_iter()
                .map(|id| self.get(id).unwrap_or(UNKNOWN_GENRE))
                .collect::<Vec<_>>()
                .join(GENRE_SEPARATOR),
            None => INVALID_GENRE.to_string(),
        }
    }
}

/// Parse a bracketed integer list such as `[4, 31]`
///
/// A single trailing comma is accepted. Anything else that is not a list of
/// integers yields `None`.
pub fn parse_genre_ids(raw: &str) -> Option<Vec<i64>> {
    let inner = raw.trim().strip_prefix('[')?.strip_suffix(']')?.trim();
    if inner.is_empty() {
        return Some(Vec::new());
    }

    let inner = inner.strip_suffix(',').unwrap_or(inner);
    inner
        .split(',')
        .map(|token| token.trim().parse::<i64>().ok())
        .collect()
}
