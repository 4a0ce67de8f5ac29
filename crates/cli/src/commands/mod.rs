//! CLI Commands

pub mod payload;
pub mod records;
pub mod scenario;
