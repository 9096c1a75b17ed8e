pub mod event;
pub mod level;
pub mod save;
pub mod step;
pub mod transition;
pub mod world;
