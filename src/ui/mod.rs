//! Ratatui front-end: a Psalms tab (chapter list, then an open chapter with
//! the highlight picker) and a Library tab listing highlights by color.

mod app;
mod forms;
mod helpers;
mod palette;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::{restore_terminal, run_app};
