//! Test-data configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::DataResult;

/// Fixture tree shipped with this crate
pub fn default_fixture_root() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures"))
}

/// How strictly placeholder substitution checks its inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionMode {
    /// Every declared token must occur and none may be left over
    #[default]
    Strict,
    /// Unused tokens are ignored and leftovers are not checked
    Permissive,
}

/// Configuration for fixture lookup and file generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Root of the fixture tree (vaccs/, child/, class_list/, ...)
    pub fixture_root: PathBuf,

    /// Directory for files generated from templates (None = <fixture_root>/generated)
    pub output_dir: Option<PathBuf>,

    /// FHIR Immunization template, relative to the fixture root
    pub fhir_template: PathBuf,

    /// Token mixed into derived filenames so parallel runs do not collide
    pub run_token: Option<String>,

    /// Validation applied to the FHIR payload template
    pub substitution: SubstitutionMode,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            fixture_root: default_fixture_root(),
            output_dir: None,
            fhir_template: PathBuf::from("fhir_immunization_template.json.template"),
            run_token: None,
            substitution: SubstitutionMode::Strict,
        }
    }
}

impl DataConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> DataResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> DataResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get the output directory for generated files
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.fixture_root.join("generated"))
    }

    /// Get the FHIR template path
    pub fn fhir_template_path(&self) -> PathBuf {
        self.fixture_root.join(&self.fhir_template)
    }
}
