//! Data file locations

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the catalog, genre and favorites tables live on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding every data table
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Genre reference table, relative to `root`
    #[serde(default = "default_genres_file")]
    pub genres_file: String,

    /// Favorites table, relative to `root`
    #[serde(default = "default_favorites_file")]
    pub favorites_file: String,

    /// File name prefix of per-platform catalogs
    #[serde(default = "default_catalog_prefix")]
    pub catalog_prefix: String,

    /// File extension of per-platform catalogs
    #[serde(default = "default_catalog_extension")]
    pub catalog_extension: String,
}

fn default_root() -> PathBuf {
    PathBuf::from("data_base_game")
}

fn default_genres_file() -> String {
    "genres.csv".to_string()
}

fn default_favorites_file() -> String {
    "favorites.csv".to_string()
}

fn default_catalog_prefix() -> String {
    "all_games_".to_string()
}

fn default_catalog_extension() -> String {
    "csv".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            genres_file: default_genres_file(),
            favorites_file: default_favorites_file(),
            catalog_prefix: default_catalog_prefix(),
            catalog_extension: default_catalog_extension(),
        }
    }
}

impl DataConfig {
    /// Data config rooted at `root` with default file names
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Path of the genre reference table
    pub fn genres_path(&self) -> PathBuf {
        self.root.join(&self.genres_file)
    }

    /// Path of the favorites table
    pub fn favorites_path(&self) -> PathBuf {
        self.root.join(&self.favorites_file)
    }

    /// Field delimiter of catalog files, tab for `tsv`, comma otherwise
    pub fn catalog_delimiter(&self) -> u8 {
        if self.catalog_extension.eq_ignore_ascii_case("tsv") {
            b'\t'
        } else {
            b','
        }
    }

    /// Path of a platform's catalog: `<root>/<prefix><platform>.<ext>`
    pub fn catalog_path(&self, platform: &str) -> PathBuf {
        self.root.join(format!(
            "{}{}.{}",
            self.catalog_prefix, platform, self.catalog_extension
        ))
    }
}
