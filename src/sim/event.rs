/// Things that happened during one tick, reported by the step function.
/// The UI layer turns these into status-line messages; the core never
/// formats text.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum GameEvent {
    /// Movement mode flipped; carries the new mode.
    ModeToggled(crate::domain::entity::Mode),
    /// A dead prop was painted alive at (row, col).
    PropPainted(usize, usize),
    /// A falling crate landed on the player's head.
    CrateCaptured(usize),
    /// A carried crate was launched upward instead of a jump.
    CrateEjected(usize),
    PlayerJumped,
    PlayerLanded,
}
