//! Map file validation command implementation.

use super::CliError;
use std::path::PathBuf;
use warptag::game::{CellType, load_map};

/// Execute the check-map command.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or fails a check.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn execute(map: PathBuf) -> Result<(), CliError> {
    println!("Checking: {}", map.display());
    println!();

    let grid = load_map(&map)?;
    print_check("Header and rows", true);

    let border_ok = grid.has_closed_border();
    print_check("Closed wall border", border_ok);

    let warps = grid.count(CellType::Warp);
    let warp_ok = warps > 0;
    print_check("At least one warp cell", warp_ok);

    println!();
    println!("Summary:");
    println!("  Size:          {} columns x {} lines", grid.width(), grid.height());
    println!("  Empty:         {}", grid.count(CellType::Empty));
    println!("  Wall:          {}", grid.count(CellType::Wall));
    println!("  Jumpable wall: {}", grid.count(CellType::JumpableWall));
    println!("  Warp:          {warps}");
    println!();

    if !border_ok {
        return Err(CliError::new("Map border has open cells"));
    }
    if !warp_ok {
        return Err(CliError::new("Map has no warp cell"));
    }

    println!("Map is playable!");
    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
