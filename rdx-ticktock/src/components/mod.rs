//! The two cooperating clock tasks and the handle used to supervise them.
//!
//! `Updater` writes the shared value, `Display` reads and prints it, and
//! `TaskHandle` is how the coordinator starts, stops and joins either one.

pub mod display;
pub mod handle;
pub mod updater;
