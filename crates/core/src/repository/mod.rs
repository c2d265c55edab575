//! Repository module
//!
//! A Repository is a working tree on this machine whose history the
//! dashboard displays and which the pull helper may update.

mod model;
mod store;

pub use model::*;
pub use store::*;
