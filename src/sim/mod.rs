pub mod event;
pub mod round;
pub mod state;
pub mod world;
