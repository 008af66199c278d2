//! ASCII rendering and export for generated grids
//!
//! Every cell type knows its own character; a grid renders as one line per
//! row (top to bottom), one character per column (left to right), each line
//! terminated by a single `\n`.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;

use crate::tile::{RegionId, Tile};
use crate::tilemap::Tilemap;

/// Symbols cycled through for Voronoi regions.
pub const REGION_SYMBOLS: [char; 10] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J'];

/// Elevation bands as (exclusive upper bound, character).
pub const ELEVATION_BANDS: [(f32, char, &str); 3] = [
    (0.3, '~', "water"),
    (0.45, '.', "lowland"),
    (0.7, '^', "hills"),
];

/// Character used for the topmost elevation band.
pub const PEAK_CHAR: char = 'A';

/// A cell that can be drawn as a single character.
pub trait AsciiGlyph {
    fn glyph(&self) -> char;
}

impl AsciiGlyph for Tile {
    fn glyph(&self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Floor => '.',
        }
    }
}

impl AsciiGlyph for RegionId {
    fn glyph(&self) -> char {
        REGION_SYMBOLS[self.0 % REGION_SYMBOLS.len()]
    }
}

/// Normalized elevation in `[0, 1]`.
impl AsciiGlyph for f32 {
    fn glyph(&self) -> char {
        elevation_char(*self)
    }
}

/// Get ASCII character for a normalized elevation.
pub fn elevation_char(value: f32) -> char {
    for (limit, ch, _) in ELEVATION_BANDS {
        if value < limit {
            return ch;
        }
    }
    PEAK_CHAR
}

/// Render a grid as text.
pub fn render_ascii<T: AsciiGlyph + Clone>(map: &Tilemap<T>) -> String {
    let mut output = String::with_capacity((map.width + 1) * map.height);
    for y in 0..map.height {
        for cell in map.row(y) {
            output.push(cell.glyph());
        }
        output.push('\n');
    }
    output
}

/// Legend for elevation renders.
pub fn elevation_legend() -> String {
    let mut legend = String::from("=== ELEVATION LEGEND ===\n");
    let mut lower = 0.0;
    for (limit, ch, name) in ELEVATION_BANDS {
        legend.push_str(&format!("{}  {:<8} [{:.2}, {:.2})\n", ch, name, lower, limit));
        lower = limit;
    }
    legend.push_str(&format!("{}  {:<8} [{:.2}, 1.00]\n", PEAK_CHAR, "peaks", lower));
    legend
}

/// Write one or more rendered maps to a text file with a generation header.
pub fn export_ascii_file<P: AsRef<Path>>(
    path: P,
    seed: u64,
    sections: &[(&str, &str)],
) -> io::Result<()> {
    let mut file = File::create(path.as_ref())?;

    writeln!(file, "=== GRIDMAP GENERATOR OUTPUT ===")?;
    writeln!(file, "Seed: {}", seed)?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    for (title, ascii) in sections {
        writeln!(file, "=== {} ===", title)?;
        write!(file, "{}", ascii)?;
        writeln!(file)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_rows_in_order() {
        let mut map = Tilemap::new_with(3, 2, Tile::Wall);
        map.set(1, 0, Tile::Floor);
        map.set(2, 1, Tile::Floor);
        assert_eq!(render_ascii(&map), "#.#\n##.\n");
    }

    #[test]
    fn test_elevation_bands() {
        assert_eq!(elevation_char(0.0), '~');
        assert_eq!(elevation_char(0.29), '~');
        assert_eq!(elevation_char(0.3), '.');
        assert_eq!(elevation_char(0.45), '^');
        assert_eq!(elevation_char(0.69), '^');
        assert_eq!(elevation_char(0.7), 'A');
        assert_eq!(elevation_char(1.0), 'A');
    }

    #[test]
    fn test_region_symbols_wrap() {
        assert_eq!(RegionId(0).glyph(), 'A');
        assert_eq!(RegionId(9).glyph(), 'J');
        assert_eq!(RegionId(10).glyph(), 'A');
        assert_eq!(RegionId(13).glyph(), 'D');
    }

    #[test]
    fn test_export_writes_sections() {
        let path = std::env::temp_dir().join(format!("gridmap_ascii_export_{}.txt", std::process::id()));
        export_ascii_file(&path, 7, &[("Caves", "#.\n.#\n")]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Seed: 7"));
        assert!(text.contains("=== Caves ===\n#.\n.#\n"));
        let _ = std::fs::remove_file(&path);
    }
}
