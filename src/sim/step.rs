/// One simulation tick: apply input intents, run the player through the
/// resolver, then self-update every movable object. Order matters and is
/// fixed: mode toggle, paint, movement intents, player physics, movables.

use crate::domain::entity::{Facing, FrameInput, Mode};
use crate::domain::interact::try_paint;
use crate::domain::physics;
use crate::sim::event::GameEvent;
use crate::sim::world::WorldState;

pub fn step(world: &mut WorldState, input: FrameInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Mode toggle zeroes every velocity in the world so nothing carries
    // momentum across the physics-rule change.
    if input.toggle_mode {
        let mode = world.player.mode.toggled();
        world.player.mode = mode;
        world.player.vel_x = 0.0;
        world.player.vel_y = 0.0;
        for m in world.movables.iter_mut() {
            m.vel_x = 0.0;
            m.vel_y = 0.0;
        }
        events.push(GameEvent::ModeToggled(mode));
    }

    // Paint is a platformer-only verb.
    if input.interact && world.player.mode == Mode::Platformer {
        if let Some((row, col)) = try_paint(&mut world.grid, &world.player, world.prop_alive_visual)
        {
            events.push(GameEvent::PropPainted(row, col));
        }
    }

    let was_grounded = world.player.grounded;

    match world.player.mode {
        Mode::Platformer => {
            // UP while grounded: eject the carried crate, or jump.
            if input.up && world.player.grounded {
                if let Some(i) = world.rider {
                    world.movables[i].on_player_head = false;
                    world.movables[i].vel_y = world.tuning.eject_velocity;
                    world.rider = None;
                    events.push(GameEvent::CrateEjected(i));
                } else {
                    world.player.vel_y = world.player.jump_strength;
                    events.push(GameEvent::PlayerJumped);
                }
            }
            if input.right {
                world.player.vel_x = world.player.speed;
                world.player.facing = Facing::Right;
            } else if input.left {
                world.player.vel_x = -world.player.speed;
                world.player.facing = Facing::Left;
            } else {
                world.player.vel_x = 0.0;
            }
            world.player.vel_y += world.player.gravity;
        }
        Mode::TopDown => {
            world.player.vel_x = 0.0;
            world.player.vel_y = 0.0;
            if input.left {
                world.player.vel_x = -world.player.speed;
                world.player.facing = Facing::Left;
            }
            if input.right {
                world.player.vel_x = world.player.speed;
                world.player.facing = Facing::Right;
            }
            if input.up {
                world.player.vel_y = -world.player.speed;
            }
            if input.down {
                world.player.vel_y = world.player.speed;
            }
        }
    }

    let (dx, dy) = (world.player.vel_x, world.player.vel_y);
    physics::move_player(
        &world.grid,
        &mut world.movables,
        &mut world.player,
        world.rider,
        dx,
        dy,
    );
    if world.player.grounded && !was_grounded {
        events.push(GameEvent::PlayerLanded);
    }

    if let Some(i) = physics::update_movables(
        &world.grid,
        &mut world.movables,
        &world.player,
        &mut world.rider,
        world.tuning.gravity,
        world.tuning.friction,
    ) {
        events.push(GameEvent::CrateCaptured(i));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Visual;
    use crate::domain::grid::{TileGrid, TileVisuals};
    use crate::sim::world::Tuning;

    fn world(map: &[&str]) -> WorldState {
        let rows = map.len();
        let cols = map.iter().map(|r| r.len()).max().unwrap_or(0);
        let build = TileGrid::build(map, cols, rows, 32.0, &TileVisuals::default());
        WorldState::new(
            build,
            Tuning::default(),
            Visual { glyph: '@', color: (50, 200, 50) },
        )
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    /// Run ticks until the player grounds.
    fn settle(w: &mut WorldState) {
        for _ in 0..30 {
            step(w, idle());
            if w.player.grounded {
                return;
            }
        }
        panic!("player never landed");
    }

    #[test]
    fn mode_toggle_zeroes_all_velocities() {
        let mut w = world(&["P.M.", "....", "####"]);
        w.player.vel_x = 5.0;
        w.player.vel_y = 3.0;
        w.movables[0].vel_x = 2.0;
        let events = step(&mut w, FrameInput { toggle_mode: true, ..idle() });
        assert!(events.contains(&GameEvent::ModeToggled(Mode::TopDown)));
        assert_eq!(w.player.mode, Mode::TopDown);
        // Top-down with no directional input: the player does not move
        assert_eq!((w.player.vel_x, w.player.vel_y), (0.0, 0.0));
        assert_eq!((w.movables[0].vel_x, w.movables[0].vel_y), (0.0, 0.0));
    }

    #[test]
    fn gravity_pulls_player_down_until_landing() {
        let mut w = world(&["P...", "....", "####"]);
        let start_y = w.player.y;
        let events = step(&mut w, idle());
        assert!(w.player.y > start_y);
        assert!(!events.contains(&GameEvent::PlayerLanded));
        settle(&mut w);
        // 48-tall player flush on the floor at y 64
        assert_eq!(w.player.y, 16.0);
        assert!(w.player.grounded);
    }

    #[test]
    fn landing_emits_event_once() {
        let mut w = world(&["P...", "....", "####"]);
        let mut landings = 0;
        for _ in 0..10 {
            if step(&mut w, idle()).contains(&GameEvent::PlayerLanded) {
                landings += 1;
            }
        }
        assert_eq!(landings, 1);
    }

    #[test]
    fn jump_requires_ground() {
        let mut w = world(&["P...", "....", "####"]);
        // Airborne on the first tick: UP is ignored
        let events = step(&mut w, FrameInput { up: true, ..idle() });
        assert!(!events.contains(&GameEvent::PlayerJumped));

        settle(&mut w);
        let events = step(&mut w, FrameInput { up: true, ..idle() });
        assert!(events.contains(&GameEvent::PlayerJumped));
        assert!(w.player.vel_y < 0.0);
    }

    #[test]
    fn horizontal_input_sets_velocity_and_facing() {
        let mut w = world(&["P.......", "########"]);
        settle(&mut w);
        step(&mut w, FrameInput { right: true, ..idle() });
        assert_eq!(w.player.facing, Facing::Right);
        assert_eq!(w.player.vel_x, w.player.speed);
        step(&mut w, FrameInput { left: true, ..idle() });
        assert_eq!(w.player.facing, Facing::Left);
        assert_eq!(w.player.vel_x, -w.player.speed);
        // Right wins over left when both are held
        step(&mut w, FrameInput { left: true, right: true, ..idle() });
        assert_eq!(w.player.facing, Facing::Right);
        step(&mut w, idle());
        assert_eq!(w.player.vel_x, 0.0);
    }

    #[test]
    fn top_down_moves_all_four_directions_without_gravity() {
        let mut w = world(&["....", ".P..", "....", "...."]);
        step(&mut w, FrameInput { toggle_mode: true, ..idle() });
        let (x0, y0) = (w.player.x, w.player.y);
        step(&mut w, idle());
        assert_eq!((w.player.x, w.player.y), (x0, y0)); // no gravity

        step(&mut w, FrameInput { right: true, down: true, ..idle() });
        assert_eq!(w.player.x, x0 + w.player.speed);
        assert_eq!(w.player.y, y0 + w.player.speed);
        step(&mut w, FrameInput { left: true, up: true, ..idle() });
        assert_eq!((w.player.x, w.player.y), (x0, y0));
    }

    #[test]
    fn paint_only_in_platformer() {
        // Prop one column right of the spawn
        let mut w = world(&["Pi..", "####"]);
        settle(&mut w);
        step(&mut w, FrameInput { toggle_mode: true, ..idle() });
        let events = step(&mut w, FrameInput { interact: true, ..idle() });
        assert!(!events.iter().any(|e| matches!(e, GameEvent::PropPainted(..))));
        assert!(!w.grid.cell(0, 1).unwrap().alive);

        step(&mut w, FrameInput { toggle_mode: true, ..idle() });
        settle(&mut w);
        let events = step(&mut w, FrameInput { interact: true, ..idle() });
        assert!(events.contains(&GameEvent::PropPainted(0, 1)));
        assert!(w.grid.cell(0, 1).unwrap().is_solid);
    }

    #[test]
    fn falling_crate_is_captured_and_ejected() {
        // Crate directly above the spawn column, high enough to fall onto
        // the player's head after the player lands.
        let mut w = world(&[
            ".M..",
            "....",
            "....",
            "....",
            "P...",
            "####",
        ]);
        w.player.x = 32.0; // under the crate
        let mut captured = false;
        for _ in 0..40 {
            let events = step(&mut w, idle());
            if events.iter().any(|e| matches!(e, GameEvent::CrateCaptured(0))) {
                captured = true;
                break;
            }
        }
        assert!(captured);
        assert_eq!(w.rider, Some(0));
        assert!(w.movables[0].on_player_head);

        // UP ejects the crate instead of jumping
        let events = step(&mut w, FrameInput { up: true, ..idle() });
        assert!(events.contains(&GameEvent::CrateEjected(0)));
        assert!(!events.contains(&GameEvent::PlayerJumped));
        assert_eq!(w.rider, None);
        assert!(!w.movables[0].on_player_head);
    }

    #[test]
    fn player_pushes_crate_along_the_floor() {
        let mut w = world(&["PM......", "########"]);
        settle(&mut w);
        let crate_x = w.movables[0].x;
        for _ in 0..3 {
            step(&mut w, FrameInput { right: true, ..idle() });
        }
        assert!(w.movables[0].x > crate_x);
        // Flush contact, never interpenetrating
        assert!(w.player.x + w.player.width <= w.movables[0].x);
    }
}
