//! Core library for the git log dashboard
//!
//! This crate contains the dashboard's records and file helpers:
//! - Repository records
//! - Project log folders and their files
//! - Settings and the frontend folder listing

mod json_file;

pub mod error;
pub mod project_log;
pub mod repository;
pub mod settings;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
