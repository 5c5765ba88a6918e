//! Interactive console menu

pub mod controller;
pub mod input;
pub mod render;

pub use controller::{Halt, MenuController};
pub use input::{Input, Prompter};
