//! Strata Core - Shared library for the strata site viewer

pub mod color;
pub mod dataset;
pub mod db;
pub mod scene;
pub mod types;

pub use types::*;
