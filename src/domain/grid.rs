/// Tile grid: a fixed-size 2D array of entities built from a level string.
///
/// Grid dimensions come from the canvas, not from the level string — longer
/// rows/columns in the string are truncated, shorter ones leave the pre-fill
/// background in place. Unknown characters are treated as background so a
/// sloppy level file never errors.
///
/// The grid is read-only to the physics resolver; only `paint` on an
/// interactive prop mutates a cell after load. Because paint can toggle
/// solidity mid-level, solid-tile enumeration is re-derived on every call,
/// never cached.

use super::entity::{Entity, Visual};

/// Tile legend:
///   '.' = background        '#' = solid terrain
///   'P' = player spawn      'i' = interactive prop (dead)
///   'M' = movable crate     anything else = background
pub const CH_BACKGROUND: char = '.';
pub const CH_TERRAIN: char = '#';
pub const CH_SPAWN: char = 'P';
pub const CH_PROP: char = 'i';
pub const CH_MOVABLE: char = 'M';

/// Visuals handed to the builder, one per tile variant.
/// Defaults mirror the classic palette; the theme layer overrides them.
#[derive(Clone, Copy, Debug)]
pub struct TileVisuals {
    pub background: Visual,
    pub terrain: Visual,
    pub prop_dead: Visual,
    pub movable: Visual,
}

impl Default for TileVisuals {
    fn default() -> Self {
        TileVisuals {
            background: Visual { glyph: ' ', color: (135, 206, 235) },
            terrain: Visual { glyph: '#', color: (139, 69, 19) },
            prop_dead: Visual { glyph: '*', color: (100, 100, 100) },
            movable: Visual { glyph: '%', color: (160, 82, 45) },
        }
    }
}

pub struct TileGrid {
    cells: Vec<Vec<Entity>>,
    cols: usize,
    rows: usize,
    tile_size: f32,
}

/// Result of parsing a level string: the grid itself, the movable objects
/// spawned from 'M' markers (in scan order), and the spawn pixel coordinate
/// recorded by 'P' (if any).
pub struct GridBuild {
    pub grid: TileGrid,
    pub movables: Vec<Entity>,
    pub spawn: Option<(f32, f32)>,
}

impl TileGrid {
    /// Grid pre-filled with background tiles.
    pub fn new(cols: usize, rows: usize, tile_size: f32, visuals: &TileVisuals) -> Self {
        let cells = (0..rows)
            .map(|r| {
                (0..cols)
                    .map(|c| {
                        Entity::background(
                            c as f32 * tile_size,
                            r as f32 * tile_size,
                            tile_size,
                            visuals.background,
                        )
                    })
                    .collect()
            })
            .collect();
        TileGrid { cells, cols, rows, tile_size }
    }

    /// Parse a level string into a grid of the given dimensions.
    /// Cells are replaced in place; out-of-grid rows and columns are skipped.
    pub fn build(
        map: &[&str],
        cols: usize,
        rows: usize,
        tile_size: f32,
        visuals: &TileVisuals,
    ) -> GridBuild {
        let mut grid = TileGrid::new(cols, rows, tile_size, visuals);
        let mut movables = Vec::new();
        let mut spawn = None;

        for (r, line) in map.iter().enumerate() {
            if r >= rows {
                break;
            }
            for (c, ch) in line.chars().enumerate() {
                if c >= cols {
                    break;
                }
                let x = c as f32 * tile_size;
                let y = r as f32 * tile_size;
                match ch {
                    CH_TERRAIN => {
                        grid.cells[r][c] = Entity::terrain(x, y, tile_size, visuals.terrain);
                    }
                    CH_PROP => {
                        grid.cells[r][c] = Entity::prop(x, y, tile_size, visuals.prop_dead);
                    }
                    CH_SPAWN => {
                        spawn = Some((x, y));
                        grid.cells[r][c] =
                            Entity::background(x, y, tile_size, visuals.background);
                    }
                    CH_MOVABLE => {
                        grid.cells[r][c] =
                            Entity::background(x, y, tile_size, visuals.background);
                        movables.push(Entity::movable(x, y, tile_size, visuals.movable));
                    }
                    // '.' and anything unrecognized: background (permissive)
                    _ => {
                        grid.cells[r][c] =
                            Entity::background(x, y, tile_size, visuals.background);
                    }
                }
            }
        }

        GridBuild { grid, movables, spawn }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Entity> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Entity> {
        self.cells.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// Coordinates of every solid tile, row-major. Re-derived each call:
    /// paint toggles prop solidity at runtime, and the iteration order is
    /// the collision tie-breaking order.
    pub fn solid_tiles(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, e)| e.is_solid)
                .map(move |(c, _)| (r, c))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.cells.iter().flat_map(|row| row.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::EntityKind;

    fn build(map: &[&str], cols: usize, rows: usize) -> GridBuild {
        TileGrid::build(map, cols, rows, 32.0, &TileVisuals::default())
    }

    #[test]
    fn char_table_maps_variants() {
        let b = build(&[".#iM", "P..."], 4, 2);
        assert_eq!(b.grid.cell(0, 0).unwrap().kind, EntityKind::Background);
        assert_eq!(b.grid.cell(0, 1).unwrap().kind, EntityKind::Terrain);
        assert_eq!(b.grid.cell(0, 2).unwrap().kind, EntityKind::InteractiveProp);
        // 'M' leaves a background tile; the crate lives in the parallel list
        assert_eq!(b.grid.cell(0, 3).unwrap().kind, EntityKind::Background);
        assert_eq!(b.movables.len(), 1);
        assert_eq!(b.movables[0].x, 96.0);
        assert_eq!(b.movables[0].y, 0.0);
    }

    #[test]
    fn spawn_records_pixel_coordinate() {
        let b = build(&["....", ".P.."], 4, 2);
        assert_eq!(b.spawn, Some((32.0, 32.0)));
        assert_eq!(b.grid.cell(1, 1).unwrap().kind, EntityKind::Background);
    }

    #[test]
    fn unknown_chars_are_background() {
        let b = build(&["?x@!"], 4, 1);
        for c in 0..4 {
            assert_eq!(b.grid.cell(0, c).unwrap().kind, EntityKind::Background);
            assert!(!b.grid.cell(0, c).unwrap().is_solid);
        }
    }

    #[test]
    fn short_rows_leave_prefill_background() {
        let b = build(&["##"], 4, 2);
        assert!(b.grid.cell(0, 2).unwrap().kind == EntityKind::Background);
        assert!(b.grid.cell(1, 0).unwrap().kind == EntityKind::Background);
    }

    #[test]
    fn long_map_is_truncated() {
        // 3 columns and 3 rows of terrain into a 2x2 grid: no panic, edges dropped
        let b = build(&["###", "###", "###"], 2, 2);
        assert_eq!(b.grid.solid_tiles().count(), 4);
        assert!(b.grid.cell(2, 0).is_none());
        assert!(b.grid.cell(0, 2).is_none());
    }

    #[test]
    fn solid_tiles_row_major_order() {
        let b = build(&[".#", "#."], 2, 2);
        let solids: Vec<_> = b.grid.solid_tiles().collect();
        assert_eq!(solids, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn solid_tiles_rederived_after_paint() {
        let mut b = build(&["i."], 2, 1);
        assert_eq!(b.grid.solid_tiles().count(), 0);
        let cell = b.grid.cell_mut(0, 0).unwrap();
        cell.is_solid = true;
        cell.alive = true;
        assert_eq!(b.grid.solid_tiles().count(), 1);
    }

    #[test]
    fn tile_positions_scale_with_tile_size(){
        let b = TileGrid::build(&[".#"], 2, 1, 16.0, &TileVisuals::default());
        let t = b.grid.cell(0, 1).unwrap();
        assert_eq!((t.x, t.y, t.width), (16.0, 0.0, 16.0));
    }
}
