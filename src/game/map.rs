//! Grid maps and cell types.

use serde::{Deserialize, Serialize};

/// A coordinate on a grid map.
///
/// `x` is the column and `y` the row, both counted from the top-left corner
/// of the map including its border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Which of the two linked maps a player occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapId {
    /// The primary (large) map.
    Primary,
    /// The secondary map reached through warp cells.
    Secondary,
}

impl MapId {
    /// The other map of the pair.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            MapId::Primary => MapId::Secondary,
            MapId::Secondary => MapId::Primary,
        }
    }

    /// Membership flag as carried on the wire.
    #[must_use]
    pub const fn is_primary(self) -> bool {
        matches!(self, MapId::Primary)
    }

    /// Build from the on-wire membership flag.
    #[must_use]
    pub const fn from_primary_flag(on_primary: bool) -> Self {
        if on_primary { MapId::Primary } else { MapId::Secondary }
    }
}

/// Type of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CellType {
    /// Traversable floor.
    Empty = 0,
    /// Fully blocking wall.
    Wall = 1,
    /// Crossing this cell switches maps.
    Warp = 2,
    /// Blocks a step, but can be vaulted with a jump.
    JumpableWall = 3,
}

impl CellType {
    /// Decode a map-file symbol. Unknown symbols are walls.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Self {
        match symbol {
            ' ' => CellType::Empty,
            'W' => CellType::Warp,
            '+' => CellType::JumpableWall,
            _ => CellType::Wall,
        }
    }

    /// Symbol used when drawing the cell.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            CellType::Empty => ' ',
            CellType::Wall => '#',
            CellType::Warp => 'W',
            CellType::JumpableWall => '+',
        }
    }

    /// Whether a single-cell step into this cell is refused outright.
    #[must_use]
    pub const fn blocks_step(self) -> bool {
        matches!(self, CellType::Wall | CellType::JumpableWall)
    }
}

/// An immutable rectangular grid of cells.
///
/// The outermost rows and columns form the border; players only ever stand
/// on the interior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    /// Width of the map in cells (columns).
    width: u16,
    /// Height of the map in cells (lines).
    height: u16,
    /// Cells stored in row-major order.
    cells: Vec<CellType>,
}

impl GridMap {
    /// Create a map from row-major cells.
    ///
    /// Returns `None` if a dimension is zero or the cell count does not
    /// match `width * height`.
    #[must_use]
    pub fn from_cells(width: u16, height: u16, cells: Vec<CellType>) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        if cells.len() != usize::from(width) * usize::from(height) {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    /// Create a map of the given size with a wall border and an empty interior.
    #[must_use]
    pub fn walled(width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let mut cells = Vec::with_capacity(usize::from(width) * usize::from(height));
        for y in 0..height {
            for x in 0..width {
                let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                cells.push(if border { CellType::Wall } else { CellType::Empty });
            }
        }
        Self::from_cells(width, height, cells)
    }

    /// Get the width of the map.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the height of the map.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Raw cells in row-major order.
    #[must_use]
    #[inline]
    pub fn cells(&self) -> &[CellType] {
        &self.cells
    }

    /// Check if a coordinate is within the map bounds.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Check if a coordinate lies strictly inside the border.
    #[must_use]
    pub const fn is_interior(&self, coord: Coord) -> bool {
        coord.x >= 1 && coord.y >= 1 && coord.x + 1 < self.width && coord.y + 1 < self.height
    }

    fn coord_to_index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// Get the cell at the given coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<CellType> {
        self.coord_to_index(coord).map(|idx| self.cells[idx])
    }

    /// Get the cell at the given coordinate, treating anything off the map
    /// as a wall.
    #[must_use]
    #[inline]
    pub fn cell_at(&self, coord: Coord) -> CellType {
        self.get(coord).unwrap_or(CellType::Wall)
    }

    /// Replace a cell. Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, coord: Coord, cell: CellType) -> bool {
        if let Some(idx) = self.coord_to_index(coord) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// Iterate over all coordinates and cells.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, CellType)> + '_ {
        let width = usize::from(self.width);
        self.cells.iter().enumerate().map(move |(idx, cell)| {
            #[allow(clippy::cast_possible_truncation)]
            let coord = Coord::new((idx % width) as u16, (idx / width) as u16);
            (coord, *cell)
        })
    }

    /// Count cells of one type.
    #[must_use]
    pub fn count(&self, cell: CellType) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    /// Whether every border cell is a wall.
    #[must_use]
    pub fn has_closed_border(&self) -> bool {
        self.iter()
            .filter(|(coord, _)| !self.is_interior(*coord))
            .all(|(_, cell)| cell == CellType::Wall)
    }

    /// Render one row as display symbols.
    #[must_use]
    pub fn row_symbols(&self, y: u16) -> String {
        (0..self.width)
            .map(|x| self.cell_at(Coord::new(x, y)).symbol())
            .collect()
    }
}

/// The two linked maps of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapPair {
    /// The primary map.
    pub primary: GridMap,
    /// The secondary map.
    pub secondary: GridMap,
}

impl MapPair {
    /// Pair two maps.
    #[must_use]
    pub const fn new(primary: GridMap, secondary: GridMap) -> Self {
        Self { primary, secondary }
    }

    /// Select the map for a membership flag.
    #[must_use]
    pub const fn get(&self, id: MapId) -> &GridMap {
        match id {
            MapId::Primary => &self.primary,
            MapId::Secondary => &self.secondary,
        }
    }
}
