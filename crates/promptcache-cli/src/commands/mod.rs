//! Subcommand handlers

mod check;
mod inspect;

pub use check::check;
pub use inspect::{breakpoints, render};
