/// Entities: tiles, props, crates, and the player.
///
/// One tagged-variant entity type covers every world object. Capabilities
/// (solidity, movability) are plain data fields read by the resolver at
/// runtime, not subtype checks. The `Visual` is a render detail only —
/// collision never looks at it.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EntityKind {
    Background,
    Terrain,
    InteractiveProp,
    MovableObject,
}

/// Movement mode. Platformer has gravity and jumping; top-down has neither.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Platformer,
    TopDown,
}

impl Mode {
    pub fn toggled(self) -> Mode {
        match self {
            Mode::Platformer => Mode::TopDown,
            Mode::TopDown => Mode::Platformer,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

/// Glyph + RGB color pair. Assigned from the theme at load time and swapped
/// by paint; never consulted by physics.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Visual {
    pub glyph: char,
    pub color: (u8, u8, u8),
}

/// Axis-aligned bounding box in pixel coordinates.
#[derive(Clone, Copy, Debug)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Strict overlap: boxes that merely touch edge-to-edge do not collide.
    /// Clamp-to-flush resolution relies on this.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub is_solid: bool,
    pub is_movable: bool,
    pub grounded: bool,
    /// Riding the player's head (movable objects only).
    pub on_player_head: bool,
    /// Painted state (interactive props only).
    pub alive: bool,
    pub visual: Visual,
}

impl Entity {
    fn base(kind: EntityKind, x: f32, y: f32, size: f32, visual: Visual) -> Self {
        Entity {
            kind,
            x,
            y,
            width: size,
            height: size,
            vel_x: 0.0,
            vel_y: 0.0,
            is_solid: false,
            is_movable: false,
            grounded: false,
            on_player_head: false,
            alive: false,
            visual,
        }
    }

    pub fn background(x: f32, y: f32, size: f32, visual: Visual) -> Self {
        Entity::base(EntityKind::Background, x, y, size, visual)
    }

    pub fn terrain(x: f32, y: f32, size: f32, visual: Visual) -> Self {
        let mut e = Entity::base(EntityKind::Terrain, x, y, size, visual);
        e.is_solid = true;
        e
    }

    /// Interactive prop, non-solid and "dead" until painted.
    pub fn prop(x: f32, y: f32, size: f32, visual: Visual) -> Self {
        Entity::base(EntityKind::InteractiveProp, x, y, size, visual)
    }

    /// Pushable crate: solid, movable, subject to gravity and friction.
    pub fn movable(x: f32, y: f32, size: f32, visual: Visual) -> Self {
        let mut e = Entity::base(EntityKind::MovableObject, x, y, size, visual);
        e.is_solid = true;
        e.is_movable = true;
        e
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Per-frame input intents, sampled once per tick.
/// Directions are continuous (held keys); interact and mode toggle are
/// edge-triggered so a press between ticks is never lost.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub interact: bool,
    pub toggle_mode: bool,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub facing: Facing,
    pub mode: Mode,
    pub grounded: bool,
    // Tuning, copied from config at level load.
    pub speed: f32,
    pub jump_strength: f32,
    pub gravity: f32,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Player {
            x,
            y,
            width: 32.0,
            height: 48.0,
            vel_x: 0.0,
            vel_y: 0.0,
            facing: Facing::Right,
            mode: Mode::Platformer,
            grounded: false,
            speed: 5.0,
            jump_strength: -20.0,
            gravity: 1.0,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 32.0, 32.0);
        let b = Rect::new(32.0, 0.0, 32.0, 32.0); // flush right of a
        assert!(!a.overlaps(&b));
        let c = Rect::new(31.0, 0.0, 32.0, 32.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn overlap_vertical_flush() {
        let a = Rect::new(0.0, 112.0, 32.0, 48.0); // bottom at 160
        let b = Rect::new(0.0, 160.0, 32.0, 32.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn entity_capability_fields() {
        let v = Visual { glyph: ' ', color: (0, 0, 0) };
        assert!(!Entity::background(0.0, 0.0, 32.0, v).is_solid);
        assert!(Entity::terrain(0.0, 0.0, 32.0, v).is_solid);
        let m = Entity::movable(0.0, 0.0, 32.0, v);
        assert!(m.is_solid && m.is_movable);
        let p = Entity::prop(0.0, 0.0, 32.0, v);
        assert!(!p.is_solid && !p.alive);
    }

    #[test]
    fn mode_toggle_roundtrip() {
        assert_eq!(Mode::Platformer.toggled(), Mode::TopDown);
        assert_eq!(Mode::TopDown.toggled(), Mode::Platformer);
    }
}
