//! Terminal user interface.
//!
//! Rendering is split in two layers: `view` builds plain data view-models
//! (article cards, the pagination strip) that tests can assert on, and
//! `render` turns those into ratatui widgets. The event loop in
//! `loop_runner` multiplexes terminal input with background-task events;
//! `input` handles keys, `events` applies task results, `tasks` spawns the
//! network calls.

mod events;
mod input;
mod loop_runner;
mod render;
pub mod tasks;
pub mod view;

pub use loop_runner::{run, Action};
