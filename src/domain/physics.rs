/// Axis-separated collision resolution — single source of truth.
///
/// ## Algorithm
///
/// Movement resolves one axis at a time, horizontal before vertical, so a
/// diagonal step can never tunnel through a corner. Each pass tentatively
/// applies the displacement, then walks every solid in a fixed order:
/// solid tiles row-major first, then movable objects (then the player, for
/// the movable self-update scan). The mover's box is re-read on every
/// iteration, so a clamp or push earlier in the scan is visible to later
/// checks. Tile-before-movable ordering is the collision tie-break.
///
/// ## Pushing
///
/// Only the player pushes. A push step equals the player's speed, signed by
/// the movement direction. The push is committed only if the obstacle's
/// displaced box is clear of every other solid (tiles + other movables; the
/// pushing player is not part of that check). A blocked push clamps the
/// player flush against the obstacle instead. Vertical pushing exists only
/// in top-down mode; in platformer mode crates are walls on the vertical
/// axis. Validity is re-derived on every attempt, never cached.
///
/// ## Head-riding
///
/// A movable object whose downward resolution lands on the player
/// (platformer mode, rider slot free) starts riding: its position tracks
/// the player, its velocity is zeroed, and the player's own scans skip it.
/// The single rider back-reference is an index into the movable list and is
/// cleared in the same pass that drops the flag.

use super::entity::{Entity, Mode, Player, Rect};
use super::grid::TileGrid;

/// Handle to one solid obstacle during a scan. Tile rects are captured at
/// scan start (tiles never move mid-pass); movable and player geometry is
/// read live because earlier resolutions may have displaced them.
#[derive(Clone, Copy)]
enum Solid {
    Tile(Rect),
    Movable(usize),
    Player,
}

/// Solid enumeration in tie-breaking order: tiles row-major, then movables
/// (minus `exclude`), then the player if requested. Rebuilt for every pass —
/// paint can toggle tile solidity between ticks.
fn solid_scan(
    grid: &TileGrid,
    movables: &[Entity],
    exclude: Option<usize>,
    include_player: bool,
) -> Vec<Solid> {
    let mut solids: Vec<Solid> = grid
        .solid_tiles()
        .filter_map(|(r, c)| grid.cell(r, c).map(|e| Solid::Tile(e.rect())))
        .collect();
    for (i, m) in movables.iter().enumerate() {
        if Some(i) != exclude && m.is_solid {
            solids.push(Solid::Movable(i));
        }
    }
    if include_player {
        solids.push(Solid::Player);
    }
    solids
}

#[inline]
fn live_rect(solid: &Solid, movables: &[Entity], player: &Player) -> Rect {
    match solid {
        Solid::Tile(rect) => *rect,
        Solid::Movable(i) => movables[*i].rect(),
        Solid::Player => player.rect(),
    }
}

/// Would displacing `movables[idx]` by (step_x, step_y) leave it clear of
/// every other solid? Tiles and the other movables are checked; the pushing
/// player is not part of the solid source.
pub fn can_push(grid: &TileGrid, movables: &[Entity], idx: usize, step_x: f32, step_y: f32) -> bool {
    let m = &movables[idx];
    let test = Rect::new(m.x + step_x, m.y + step_y, m.width, m.height);
    for solid in solid_scan(grid, movables, Some(idx), false) {
        let obs = match solid {
            Solid::Tile(rect) => rect,
            Solid::Movable(j) => movables[j].rect(),
            Solid::Player => continue,
        };
        if test.overlaps(&obs) {
            return false;
        }
    }
    true
}

/// Move the player by (dx, dy), resolving collisions axis by axis.
///
/// The object currently riding the player's head (`rider`) is skipped so a
/// carried crate never blocks its carrier. With no obstacles the result is
/// exactly the pre-move position plus (dx, dy).
pub fn move_player(
    grid: &TileGrid,
    movables: &mut [Entity],
    player: &mut Player,
    rider: Option<usize>,
    dx: f32,
    dy: f32,
) {
    // ── Horizontal pass ──
    if dx != 0.0 {
        player.x += dx;
        for solid in solid_scan(grid, movables, None, false) {
            if let Solid::Movable(i) = solid {
                if rider == Some(i) {
                    continue;
                }
            }
            let obs = live_rect(&solid, movables, player);
            if !player.rect().overlaps(&obs) {
                continue;
            }
            match solid {
                Solid::Movable(i) if movables[i].is_movable => {
                    let step = if dx > 0.0 { player.speed } else { -player.speed };
                    if can_push(grid, movables, i, step, 0.0) {
                        movables[i].vel_x = step;
                        movables[i].x += step;
                    } else if dx > 0.0 {
                        player.x = obs.x - player.width;
                    } else {
                        player.x = obs.x + obs.w;
                    }
                }
                _ => {
                    if dx > 0.0 {
                        player.x = obs.x - player.width;
                    } else {
                        player.x = obs.x + obs.w;
                    }
                }
            }
        }
    }

    // ── Vertical pass ──
    player.grounded = false;
    if dy != 0.0 {
        player.y += dy;
        for solid in solid_scan(grid, movables, None, false) {
            if let Solid::Movable(i) = solid {
                if rider == Some(i) {
                    continue;
                }
            }
            let obs = live_rect(&solid, movables, player);
            if !player.rect().overlaps(&obs) {
                continue;
            }
            match solid {
                Solid::Movable(i) if movables[i].is_movable => {
                    if player.mode == Mode::TopDown {
                        let step = if dy > 0.0 { player.speed } else { -player.speed };
                        if can_push(grid, movables, i, 0.0, step) {
                            movables[i].vel_y = step;
                            movables[i].y += step;
                        } else if dy > 0.0 {
                            player.y = obs.y - player.height;
                        } else {
                            player.y = obs.y + obs.h;
                        }
                    } else if dy > 0.0 {
                        // Platformer: crates never move vertically under the player
                        player.y = obs.y - player.height;
                        player.vel_y = 0.0;
                        player.grounded = true;
                    } else {
                        player.y = obs.y + obs.h;
                        player.vel_y = 0.0;
                    }
                }
                _ => {
                    if dy > 0.0 {
                        player.y = obs.y - player.height;
                        player.vel_y = 0.0;
                        if player.mode == Mode::Platformer {
                            player.grounded = true;
                        }
                    } else {
                        player.y = obs.y + obs.h;
                        player.vel_y = 0.0;
                    }
                }
            }
        }
    }
}

/// Per-tick self-update for every movable object. Runs after the player
/// update. Returns the index of an object that started riding the player's
/// head this tick, if any.
///
/// Non-riding objects get gravity (platformer) or zeroed vertical velocity
/// (top-down), clamp-on-first-collision resolution against all other solids
/// including the player, and friction while grounded. Movables never push
/// anything.
pub fn update_movables(
    grid: &TileGrid,
    movables: &mut [Entity],
    player: &Player,
    rider: &mut Option<usize>,
    gravity: f32,
    friction: f32,
) -> Option<usize> {
    let mut captured = None;

    for i in 0..movables.len() {
        if player.mode == Mode::Platformer && movables[i].on_player_head {
            // Track the carrier: centered horizontally, flush on top.
            movables[i].x = player.x + (player.width - movables[i].width) / 2.0;
            movables[i].y = player.y - movables[i].height;
            movables[i].vel_x = 0.0;
            movables[i].vel_y = 0.0;
            movables[i].grounded = true;
            continue;
        }

        // Flag and back-reference drop together (mode switch ends a ride).
        movables[i].on_player_head = false;
        if *rider == Some(i) {
            *rider = None;
        }

        if player.mode == Mode::Platformer {
            movables[i].vel_y += gravity;
        } else {
            movables[i].vel_y = 0.0;
        }

        let dx = movables[i].vel_x;
        let dy = movables[i].vel_y;

        if dx != 0.0 {
            movables[i].x += dx;
            for solid in solid_scan(grid, movables, Some(i), true) {
                let obs = live_rect(&solid, movables, player);
                if !movables[i].rect().overlaps(&obs) {
                    continue;
                }
                if dx > 0.0 {
                    movables[i].x = obs.x - movables[i].width;
                } else {
                    movables[i].x = obs.x + obs.w;
                }
                movables[i].vel_x = 0.0;
                break;
            }
        }

        movables[i].grounded = false;
        if dy != 0.0 {
            movables[i].y += dy;
            for solid in solid_scan(grid, movables, Some(i), true) {
                let obs = live_rect(&solid, movables, player);
                if !movables[i].rect().overlaps(&obs) {
                    continue;
                }
                if dy > 0.0 {
                    movables[i].y = obs.y - movables[i].height;
                    movables[i].vel_y = 0.0;
                    movables[i].grounded = true;
                    // Landing on the player starts a ride, one rider at a time.
                    if matches!(solid, Solid::Player)
                        && player.mode == Mode::Platformer
                        && rider.is_none()
                    {
                        movables[i].on_player_head = true;
                        *rider = Some(i);
                        captured = Some(i);
                    }
                } else {
                    movables[i].y = obs.y + obs.h;
                    movables[i].vel_y = 0.0;
                }
                break;
            }
        }

        if movables[i].grounded {
            movables[i].vel_x *= friction;
        }
    }

    captured
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
