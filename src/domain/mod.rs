pub mod catalog;
pub mod rules;
pub mod shuffle;
pub mod tray;
