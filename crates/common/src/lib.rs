//! Mavis Common Library
//!
//! Domain model shared by the Mavis end-to-end suite: vaccines, children,
//! schools, delivery sites, and the text/time helpers used to render them.

pub mod error;
pub mod text;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use text::{current_datetime, normalize_whitespace};
pub use types::*;

/// Mavis common library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
