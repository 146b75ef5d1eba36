#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use warptag::game::{
    CellType, Coord, Direction, GridMap, MapId, Move, Position, WarpTable, resolve,
};

/// Structured input for movement fuzzing.
#[derive(Arbitrary, Debug)]
struct MovementInput {
    /// Map width before clamping.
    width: u8,
    /// Map height before clamping.
    height: u8,
    /// Raw cell symbols, reused cyclically.
    cells: Vec<u8>,
    /// Player x before clamping into the interior.
    x: u8,
    /// Player y before clamping into the interior.
    y: u8,
    /// Direction index.
    dir: u8,
    /// Jump instead of step.
    jump: bool,
    /// Player starts on the secondary map.
    secondary: bool,
}

fuzz_target!(|input: MovementInput| {
    let width = u16::from(input.width % 60) + 5;
    let height = u16::from(input.height % 30) + 5;
    if input.cells.is_empty() {
        return;
    }

    let size = usize::from(width) * usize::from(height);
    let cells: Vec<CellType> = (0..size)
        .map(|i| CellType::from_symbol(char::from(input.cells[i % input.cells.len()])))
        .collect();
    let Some(mut grid) = GridMap::from_cells(width, height, cells) else {
        return;
    };
    for y in 0..height {
        for x in 0..width {
            let coord = Coord::new(x, y);
            if !grid.is_interior(coord) {
                grid.set(coord, CellType::Wall);
            }
        }
    }

    let at = Position::new(
        Coord::new(
            1 + u16::from(input.x) % (width - 2),
            1 + u16::from(input.y) % (height - 2),
        ),
        if input.secondary { MapId::Secondary } else { MapId::Primary },
    );
    let dir = Direction::ALL[usize::from(input.dir % 4)];
    let mv = if input.jump { Move::jump(dir) } else { Move::step(dir) };
    let warps = WarpTable {
        to_secondary: Coord::new(2, 2),
        to_primary: Coord::new(3, 3),
    };

    // Resolution must not panic and must keep the player inside
    let before = grid.clone();
    let next = resolve(&grid, &warps, at, mv);
    assert_eq!(grid, before, "resolution changed the grid");

    if next.map == at.map {
        assert!(grid.is_interior(next.coord), "{at:?} {mv:?} left the interior: {next:?}");
        let dx = next.coord.x.abs_diff(at.coord.x);
        let dy = next.coord.y.abs_diff(at.coord.y);
        let reach = if input.jump { 2 } else { 1 };
        assert!(dx + dy == 0 || (dx + dy == reach && (dx == 0 || dy == 0)));
    } else {
        assert!(!input.jump, "a jump changed maps");
        assert_eq!(next.coord, warps.anchor(next.map));
    }
});
