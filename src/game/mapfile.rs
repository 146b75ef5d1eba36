//! Map-file decoding.
//!
//! A map file starts with a `<lines>, <columns>` header followed by one text
//! row per grid line:
//!
//! ```text
//! 5, 6
//! ######
//! # + W#
//! #    #
//! ######
//! ```
//!
//! Short rows and missing rows are filled with walls; anything past the
//! declared size is ignored.

use std::fs;
use std::path::Path;

use crate::game::{CellType, GridMap};

/// Largest dimension that still fits the 3-digit coordinate fields on the wire.
pub const MAX_DIMENSION: u16 = 999;

/// Error type for loading a grid source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The map file could not be read.
    Io {
        /// Path that failed.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// The `<lines>, <columns>` header is missing or malformed.
    Header {
        /// The offending header text.
        line: String,
    },
    /// A declared dimension is zero.
    Empty,
    /// A declared dimension exceeds [`MAX_DIMENSION`].
    TooLarge {
        /// Declared lines.
        lines: u32,
        /// Declared columns.
        columns: u32,
    },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot open {path}: {message}"),
            Self::Header { line } => write!(f, "format error: bad map header {line:?}"),
            Self::Empty => write!(f, "format error: map has a zero dimension"),
            Self::TooLarge { lines, columns } => write!(
                f,
                "format error: map {lines}x{columns} exceeds {MAX_DIMENSION} cells per side"
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Parse map text into a grid.
///
/// # Errors
///
/// Returns an error if the header is malformed or declares an unusable size.
pub fn parse_map(text: &str) -> Result<GridMap, GridError> {
    let mut lines = text.lines();
    let header = lines.next().unwrap_or_default();
    let (height, width) = parse_header(header)?;

    let mut cells = Vec::with_capacity(usize::from(width) * usize::from(height));
    for _ in 0..height {
        let row: Vec<char> = lines.next().unwrap_or_default().chars().collect();
        for x in 0..usize::from(width) {
            let symbol = row.get(x).copied().unwrap_or('#');
            cells.push(CellType::from_symbol(symbol));
        }
    }

    GridMap::from_cells(width, height, cells).ok_or(GridError::Empty)
}

/// Read and parse a map file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is malformed.
pub fn load_map(path: &Path) -> Result<GridMap, GridError> {
    let text = fs::read_to_string(path).map_err(|e| GridError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_map(&text)
}

/// Returns `(lines, columns)`.
fn parse_header(header: &str) -> Result<(u16, u16), GridError> {
    let bad = || GridError::Header {
        line: header.to_string(),
    };

    let (lines, columns) = header.split_once(',').ok_or_else(bad)?;
    let lines: u32 = lines.trim().parse().map_err(|_| bad())?;
    let columns: u32 = columns.trim().parse().map_err(|_| bad())?;

    if lines == 0 || columns == 0 {
        return Err(GridError::Empty);
    }
    if lines > u32::from(MAX_DIMENSION) || columns > u32::from(MAX_DIMENSION) {
        return Err(GridError::TooLarge { lines, columns });
    }

    let lines = u16::try_from(lines).map_err(|_| bad())?;
    let columns = u16::try_from(columns).map_err(|_| bad())?;
    Ok((lines, columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Coord;

    #[test]
    fn test_parse_small_map() {
        let map = parse_map("4, 6\n######\n# + W#\n#    #\n######\n").unwrap();
        assert_eq!(map.height(), 4);
        assert_eq!(map.width(), 6);
        assert_eq!(map.cell_at(Coord::new(1, 1)), CellType::Empty);
        assert_eq!(map.cell_at(Coord::new(2, 1)), CellType::JumpableWall);
        assert_eq!(map.cell_at(Coord::new(4, 1)), CellType::Warp);
        assert!(map.has_closed_border());
    }

    #[test]
    fn test_short_and_missing_rows_are_walls() {
        let map = parse_map("3, 4\n#  \n").unwrap();
        assert_eq!(map.cell_at(Coord::new(1, 0)), CellType::Empty);
        assert_eq!(map.cell_at(Coord::new(3, 0)), CellType::Wall);
        assert_eq!(map.cell_at(Coord::new(1, 2)), CellType::Wall);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let map = parse_map("1, 2\n  WWW\n  \n").unwrap();
        assert_eq!(map.width(), 2);
        assert_eq!(map.count(CellType::Warp), 0);
    }

    #[test]
    fn test_bad_header() {
        assert!(matches!(parse_map("twenty"), Err(GridError::Header { .. })));
        assert!(matches!(parse_map(""), Err(GridError::Header { .. })));
        assert!(matches!(parse_map("20; 40"), Err(GridError::Header { .. })));
        assert_eq!(parse_map("0, 40"), Err(GridError::Empty));
        assert!(matches!(parse_map("20, 1000"), Err(GridError::TooLarge { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_map(Path::new("/nonexistent/O-map.txt")).unwrap_err();
        assert!(err.to_string().contains("cannot open"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("T-map.txt");
        fs::write(&path, "3, 3\n###\n#W#\n###\n").unwrap();
        let map = load_map(&path).unwrap();
        assert_eq!(map.count(CellType::Warp), 1);
    }
}
