pub mod corruption;
pub mod entity;
pub mod grid;
pub mod mover;
pub mod physics;
pub mod rules;
pub mod tile;
