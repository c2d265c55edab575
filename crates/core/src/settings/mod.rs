//! Settings module
//!
//! Key/value settings edited from the dashboard, plus the frontend folder
//! listing driven by the `frontend_folder_path` setting.

mod folders;
mod store;

pub use folders::*;
pub use store::*;

/// Directory whose subfolders are listed on the frontend dashboard
pub const FRONTEND_FOLDER_PATH: &str = "frontend_folder_path";
