//! Plain-text rendering of catalog rows, favorites and genre counts

use gamedex_library::{FavoriteRecord, GameRecord, GenreCount};
use std::fmt::Write;

/// Width of the longest bar in a genre chart
const BAR_WIDTH: usize = 40;

const MISSING: &str = "-";

/// Render catalog rows as a three-column table
pub fn games_table(games: &[&GameRecord]) -> String {
    let rows: Vec<[&str; 3]> = games
        .iter()
        .map(|g| {
            [
                g.name.as_deref().unwrap_or(MISSING),
                g.genres.as_deref().unwrap_or(MISSING),
                g.rating.as_deref().unwrap_or(MISSING),
            ]
        })
        .collect();
    table(["Name", "Genres", "Rating"], &rows)
}

/// Render favorites as a table with their personal rating
pub fn favorites_table(favorites: &[FavoriteRecord]) -> String {
    let ratings: Vec<String> = favorites
        .iter()
        .map(|f| f.personal_rating.to_string())
        .collect();
    let rows: Vec<[&str; 4]> = favorites
        .iter()
        .zip(&ratings)
        .map(|(f, r)| [f.name.as_str(), f.genres.as_str(), f.rating.as_str(), r.as_str()])
        .collect();
    table(["Name", "Genres", "Rating", "Mine"], &rows)
}

/// Render one favorite with its notes
pub fn favorite_details(favorite: &FavoriteRecord) -> String {
    let notes = if favorite.personal_notes.is_empty() {
        "(none)"
    } else {
        favorite.personal_notes.as_str()
    };
    format!(
        "Name:     {}\nGenres:   {}\nRating:   {}\nMy score: {}/10\nNotes:    {}\n",
        favorite.name, favorite.genres, favorite.rating, favorite.personal_rating, notes
    )
}

/// Horizontal bar chart, bars scaled to the largest count
pub fn genre_chart(counts: &[GenreCount]) -> String {
    let label_width = counts
        .iter()
        .map(|c| c.genre.chars().count())
        .max()
        .unwrap_or(0);
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0);

    let mut out = String::new();
    for c in counts {
        let len = if max == 0 { 0 } else { c.count * BAR_WIDTH / max };
        let _ = writeln!(
            out,
            "{:<width$}  {} {}",
            c.genre,
            "#".repeat(len),
            c.count,
            width = label_width
        );
    }
    out
}

fn table<const N: usize>(headers: [&str; N], rows: &[[&str; N]]) -> String {
    let mut widths = headers.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule: Vec<&str> = rule.iter().map(String::as_str).collect();
    write_row(&mut out, &rule, &widths);
    for row in rows {
        write_row(&mut out, row, &widths);
    }
    out
}

fn write_row(out: &mut String, cells: &[&str], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}
