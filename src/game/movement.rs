//! Movement resolution.
//!
//! Resolution is a pure function of the grid, the warp anchors, the player's
//! position and the requested move. Illegal moves are not errors: they
//! resolve to the unchanged position.
//!
//! Margin guards are applied per direction:
//!
//! | move | up      | down       | left    | right      |
//! |------|---------|------------|---------|------------|
//! | step | `y > 1` | `y < h-2`  | `x > 1` | `x < w-2`  |
//! | jump | `y > 2` | `y < h-3`  | `x > 2` | `x < w-3`  |

use crate::game::{CellType, Coord, Direction, GridMap, Move, MoveKind, Position, WarpTable};

/// Resolve one move on the map the player currently occupies.
#[must_use]
pub fn resolve(grid: &GridMap, warps: &WarpTable, at: Position, mv: Move) -> Position {
    match mv.kind {
        MoveKind::Step => resolve_step(grid, warps, at, mv.direction),
        MoveKind::Jump => resolve_jump(grid, at, mv.direction),
    }
}

/// Single-cell move. Walls and jumpable walls block; a warp cell hands the
/// player to the warp table.
#[must_use]
pub fn resolve_step(grid: &GridMap, warps: &WarpTable, at: Position, dir: Direction) -> Position {
    let Some(next) = offset(at.coord, dir, 1) else {
        return at;
    };

    match grid.cell_at(next) {
        CellType::Wall | CellType::JumpableWall => at,
        CellType::Warp => warps.transition(at.map),
        CellType::Empty => {
            if within_margin(grid, at.coord, dir, 1) {
                Position::new(next, at.map)
            } else {
                at
            }
        }
    }
}

/// Two-cell vault. Succeeds only over a jumpable wall onto an empty cell;
/// never degrades to a step.
#[must_use]
pub fn resolve_jump(grid: &GridMap, at: Position, dir: Direction) -> Position {
    if !within_margin(grid, at.coord, dir, 2) {
        return at;
    }
    let (Some(over), Some(land)) = (offset(at.coord, dir, 1), offset(at.coord, dir, 2)) else {
        return at;
    };

    if grid.cell_at(over) == CellType::JumpableWall && grid.cell_at(land) == CellType::Empty {
        Position::new(land, at.map)
    } else {
        at
    }
}

/// Whether moving `dist` cells from `coord` keeps clear of the border.
fn within_margin(grid: &GridMap, coord: Coord, dir: Direction, dist: u16) -> bool {
    let (x, y) = (u32::from(coord.x), u32::from(coord.y));
    let dist = u32::from(dist);
    let width = u32::from(grid.width());
    let height = u32::from(grid.height());
    match dir {
        Direction::Up => y > dist,
        Direction::Down => y + dist + 1 < height,
        Direction::Left => x > dist,
        Direction::Right => x + dist + 1 < width,
    }
}

fn offset(coord: Coord, dir: Direction, dist: u16) -> Option<Coord> {
    match dir {
        Direction::Up => coord.y.checked_sub(dist).map(|y| Coord::new(coord.x, y)),
        Direction::Down => coord.y.checked_add(dist).map(|y| Coord::new(coord.x, y)),
        Direction::Left => coord.x.checked_sub(dist).map(|x| Coord::new(x, coord.y)),
        Direction::Right => coord.x.checked_add(dist).map(|x| Coord::new(x, coord.y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::MapId;

    fn open_map() -> GridMap {
        GridMap::walled(40, 20).unwrap()
    }

    #[test]
    fn test_step_into_empty() {
        let map = open_map();
        let warps = WarpTable::default();
        let at = Position::primary(5, 5);
        assert_eq!(resolve_step(&map, &warps, at, Direction::Up), Position::primary(5, 4));
        assert_eq!(resolve_step(&map, &warps, at, Direction::Down), Position::primary(5, 6));
        assert_eq!(resolve_step(&map, &warps, at, Direction::Left), Position::primary(4, 5));
        assert_eq!(resolve_step(&map, &warps, at, Direction::Right), Position::primary(6, 5));
    }

    #[test]
    fn test_step_blocked_by_walls() {
        let mut map = open_map();
        let warps = WarpTable::default();
        map.set(Coord::new(6, 5), CellType::Wall);
        map.set(Coord::new(4, 5), CellType::JumpableWall);
        let at = Position::primary(5, 5);
        assert_eq!(resolve_step(&map, &warps, at, Direction::Right), at);
        assert_eq!(resolve_step(&map, &warps, at, Direction::Left), at);
    }

    #[test]
    fn test_step_never_onto_border() {
        let map = open_map();
        let warps = WarpTable::default();
        let corner = Position::primary(1, 1);
        assert_eq!(resolve_step(&map, &warps, corner, Direction::Up), corner);
        assert_eq!(resolve_step(&map, &warps, corner, Direction::Left), corner);
        let far = Position::primary(38, 18);
        assert_eq!(resolve_step(&map, &warps, far, Direction::Down), far);
        assert_eq!(resolve_step(&map, &warps, far, Direction::Right), far);
    }

    #[test]
    fn test_step_onto_warp_switches_map() {
        let mut map = open_map();
        let warps = WarpTable::default();
        map.set(Coord::new(10, 9), CellType::Warp);
        let at = Position::primary(10, 10);
        assert_eq!(resolve_step(&map, &warps, at, Direction::Up), Position::secondary(2, 2));
    }

    #[test]
    fn test_step_onto_warp_from_secondary() {
        let mut map = GridMap::walled(40, 10).unwrap();
        let warps = WarpTable::default();
        map.set(Coord::new(3, 3), CellType::Warp);
        let at = Position::secondary(2, 3);
        let landed = resolve_step(&map, &warps, at, Direction::Right);
        assert_eq!(landed, Position::primary(37, 17));
        assert_eq!(landed.map, MapId::Primary);
    }

    #[test]
    fn test_jump_over_jumpable_wall() {
        let mut map = open_map();
        map.set(Coord::new(6, 5), CellType::JumpableWall);
        let at = Position::primary(5, 5);
        assert_eq!(resolve_jump(&map, at, Direction::Right), Position::primary(7, 5));
    }

    #[test]
    fn test_jump_onto_wall_fails() {
        let mut map = open_map();
        map.set(Coord::new(6, 5), CellType::JumpableWall);
        map.set(Coord::new(7, 5), CellType::Wall);
        let at = Position::primary(5, 5);
        assert_eq!(resolve_jump(&map, at, Direction::Right), at);
    }

    #[test]
    fn test_jump_without_jumpable_wall_is_noop() {
        let map = open_map();
        let at = Position::primary(5, 5);
        for dir in Direction::ALL {
            assert_eq!(resolve_jump(&map, at, dir), at);
        }
    }

    #[test]
    fn test_jump_margin_guards() {
        let mut map = open_map();
        map.set(Coord::new(5, 1), CellType::JumpableWall);
        // Landing would be the top border row.
        assert_eq!(resolve_jump(&map, Position::primary(5, 2), Direction::Up), Position::primary(5, 2));

        map.set(Coord::new(5, 2), CellType::JumpableWall);
        map.set(Coord::new(5, 1), CellType::Empty);
        assert_eq!(resolve_jump(&map, Position::primary(5, 3), Direction::Up), Position::primary(5, 1));

        map.set(Coord::new(5, 17), CellType::JumpableWall);
        assert_eq!(resolve_jump(&map, Position::primary(5, 16), Direction::Down), Position::primary(5, 18));
        map.set(Coord::new(5, 18), CellType::JumpableWall);
        assert_eq!(resolve_jump(&map, Position::primary(5, 17), Direction::Down), Position::primary(5, 17));
    }

    #[test]
    fn test_jump_ignores_warp() {
        let mut map = open_map();
        map.set(Coord::new(6, 5), CellType::Warp);
        let at = Position::primary(5, 5);
        assert_eq!(resolve(&map, &WarpTable::default(), at, Move::jump(Direction::Right)), at);
    }
}
