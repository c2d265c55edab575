//! Project log module
//!
//! A ProjectLog points at a directory of plain-text application logs that
//! the dashboard lists and displays.

mod files;
mod model;
mod store;

pub use files::*;
pub use model::*;
pub use store::*;
