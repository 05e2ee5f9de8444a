//! Command implementations for mythly.
//!
//! Each command returns the text to print; `main` does the printing.

mod completions;
mod library;
mod progress;

pub use completions::completions;
pub use library::{favorite, library, load, show, today};
pub use progress::{read, sessions, stats};
