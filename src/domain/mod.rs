pub mod entity;
pub mod grid;
pub mod interact;
pub mod physics;
