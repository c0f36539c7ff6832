//! Game catalog and favorites management for Gamedex
//!
//! Loads per-platform game catalogs from CSV, decodes their genre ids, and
//! keeps a persisted list of favorite games with personal notes and ratings.
//! The catalog and favorites stores are independent; a front end copies
//! catalog rows into favorites.

mod catalog;
mod favorites;
mod genres;

pub use catalog::{CatalogStore, GENRES_COLUMN, GameRecord, GenreCount, NAME_COLUMN, RATING_COLUMN};
pub use favorites::{FAVORITE_COLUMNS, FavoriteRecord, FavoritesStore, MAX_PERSONAL_RATING};
pub use genres::{
    GENRE_SEPARATOR, GenreMap, INVALID_GENRE, NO_GENRE, UNKNOWN_GENRE, parse_genre_ids,
};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Catalog not found: {0}")]
    CatalogNotFound(PathBuf),

    #[error("Invalid genre table: {0}")]
    InvalidGenreTable(String),

    #[error("Game already in favorites: {0}")]
    DuplicateFavorite(String),

    #[error("Favorite not found: {0}")]
    FavoriteNotFound(String),

    #[error("Personal rating must be between 0 and 10, got {0}")]
    InvalidRating(u8),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
