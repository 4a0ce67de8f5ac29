//! Mavis E2E Test Data
//!
//! Deterministic inputs and expected outputs for the browser-driven Mavis
//! suite:
//! - a catalogue of named fixture scenarios per import type
//! - readers and mutators for CSV and workbook record files
//! - `<<TOKEN>>` template substitution, including FHIR Immunization payloads
//!
//! # Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  data::file_mappings   ScenarioGroup / *FileMapping         │
//! │        │ relative paths (no I/O)                            │
//! │        ▼                                                    │
//! │  data::fixtures        Fixtures { root } ── audit()         │
//! │        │ absolute paths                                     │
//! │        ▼                                                    │
//! │  data::file_utils      names, DOB shift, site, first name   │
//! │  data::spreadsheet     SESSION_ID from Vaccinations sheet   │
//! │  data::generator       CSV templates ─┐                     │
//! │  data::fhir            JSON template ─┴─ data::template     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod data;
pub mod error;

pub use config::{DataConfig, SubstitutionMode};
pub use error::{DataError, DataResult};
