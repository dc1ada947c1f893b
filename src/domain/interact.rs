/// Paint: the player's one world-mutating verb.
///
/// The target cell is found from the player's center, offset one tile in the
/// facing direction. Painting a dead interactive prop flips it alive, makes
/// it solid, and swaps its visual. Anything else (background, terrain, an
/// already-alive prop, out-of-bounds) is a no-op.

use super::entity::{EntityKind, Facing, Player, Visual};
use super::grid::TileGrid;

/// Cell targeted by a paint attempt, if it falls inside the grid.
pub fn paint_target(grid: &TileGrid, player: &Player) -> Option<(usize, usize)> {
    let center_x = player.x + player.width / 2.0;
    let center_y = player.y + player.height / 2.0;
    let offset = match player.facing {
        Facing::Right => grid.tile_size(),
        Facing::Left => -grid.tile_size(),
    };
    let tx = center_x + offset;
    if tx < 0.0 || center_y < 0.0 {
        return None;
    }
    let col = (tx / grid.tile_size()) as usize;
    let row = (center_y / grid.tile_size()) as usize;
    if row >= grid.rows() || col >= grid.cols() {
        return None;
    }
    Some((row, col))
}

/// Attempt to paint the faced cell. Returns the painted cell coordinate,
/// or `None` when nothing changed.
pub fn try_paint(
    grid: &mut TileGrid,
    player: &Player,
    alive_visual: Visual,
) -> Option<(usize, usize)> {
    let (row, col) = paint_target(grid, player)?;
    let cell = grid.cell_mut(row, col)?;
    if cell.kind != EntityKind::InteractiveProp || cell.alive {
        return None;
    }
    cell.alive = true;
    cell.is_solid = true;
    cell.visual = alive_visual;
    Some((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::{GridBuild, TileGrid, TileVisuals};

    const ALIVE: Visual = Visual { glyph: '@', color: (50, 200, 50) };

    fn build(map: &[&str]) -> GridBuild {
        let rows = map.len();
        let cols = map.iter().map(|r| r.len()).max().unwrap_or(0);
        TileGrid::build(map, cols, rows, 32.0, &TileVisuals::default())
    }

    #[test]
    fn paints_prop_in_facing_direction() {
        let mut b = build(&["..i.", "...."]);
        // Player in column 1, facing right toward the prop in column 2
        let mut p = Player::new(32.0, -8.0); // center row 0
        p.facing = Facing::Right;
        assert_eq!(try_paint(&mut b.grid, &p, ALIVE), Some((0, 2)));
        let cell = b.grid.cell(0, 2).unwrap();
        assert!(cell.alive);
        assert!(cell.is_solid);
        assert_eq!(cell.visual, ALIVE);
    }

    #[test]
    fn facing_left_targets_opposite_cell() {
        let mut b = build(&["i...", "...."]);
        let mut p = Player::new(32.0, -8.0);
        p.facing = Facing::Left;
        assert_eq!(try_paint(&mut b.grid, &p, ALIVE), Some((0, 0)));
    }

    #[test]
    fn paint_is_idempotent() {
        let mut b = build(&["..i.", "...."]);
        let mut p = Player::new(32.0, -8.0);
        p.facing = Facing::Right;
        assert!(try_paint(&mut b.grid, &p, ALIVE).is_some());
        assert!(try_paint(&mut b.grid, &p, ALIVE).is_none());
        assert!(b.grid.cell(0, 2).unwrap().alive);
    }

    #[test]
    fn non_prop_cells_are_no_ops() {
        let mut b = build(&[".#..", "...."]);
        let mut p = Player::new(0.0, -8.0);
        p.facing = Facing::Right;
        // Terrain
        assert!(try_paint(&mut b.grid, &p, ALIVE).is_none());
        // Background
        p.facing = Facing::Left;
        p.x = 32.0;
        assert!(try_paint(&mut b.grid, &p, ALIVE).is_none());
    }

    #[test]
    fn out_of_bounds_target_is_none() {
        let mut b = build(&["....", "...."]);
        let mut p = Player::new(0.0, 0.0);
        p.facing = Facing::Left; // target column -1
        assert!(try_paint(&mut b.grid, &p, ALIVE).is_none());
        p.facing = Facing::Right;
        p.x = 3.0 * 32.0; // target column 4, past the right edge
        assert!(try_paint(&mut b.grid, &p, ALIVE).is_none());
    }
}
