//! Fixture tree anchored at a root directory

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

use crate::config::DataConfig;
use crate::data::file_mappings::{
    all_scenarios, lookup, FileMapping, ImportFormatDetails, ScenarioFiles, ScenarioGroup,
};
use crate::data::file_utils::{DIFFERENT_FIRST_NAME_SUFFIX, SITE_SUFFIX};
use crate::error::{read_to_string, DataResult};

/// `_[<run token>_]<8 hex>` as appended by template generation
static GENERATED_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^_(.+_)?[0-9a-f]{8}$").expect("generated suffix pattern is valid"));

/// Resolves registry paths against a fixture root
#[derive(Debug, Clone)]
pub struct Fixtures {
    root: PathBuf,
}

/// Differences between the registry and the files on disk
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditReport {
    /// Registered scenarios whose input file is absent
    pub missing_inputs: Vec<PathBuf>,

    /// Registered scenarios whose expected-output file is absent
    pub missing_outputs: Vec<PathBuf>,

    /// Import format categories without a reference text
    pub missing_format_details: Vec<PathBuf>,

    /// Fixture files in a group folder that no scenario refers to
    pub unregistered: Vec<PathBuf>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.missing_inputs.is_empty()
            && self.missing_outputs.is_empty()
            && self.missing_format_details.is_empty()
            && self.unregistered.is_empty()
    }
}

impl Fixtures {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(config.fixture_root.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn input_path<M: FileMapping>(&self, mapping: M) -> PathBuf {
        self.root.join(mapping.input_template_path())
    }

    pub fn output_path<M: FileMapping>(&self, mapping: M) -> PathBuf {
        self.root.join(mapping.output_path())
    }

    /// Absolute input and output paths of a catalogue entry
    pub fn scenario_paths(&self, files: &ScenarioFiles) -> (PathBuf, PathBuf) {
        (self.root.join(&files.input), self.root.join(&files.output))
    }

    pub fn import_format_details_path(&self, category: ImportFormatDetails) -> PathBuf {
        self.root.join(category.import_format_details_path())
    }

    /// Expected page text for a scenario
    pub fn read_expected_output<M: FileMapping>(&self, mapping: M) -> DataResult<String> {
        read_to_string(&self.output_path(mapping))
    }

    /// Reference text for an import format category
    pub fn read_import_format_details(&self, category: ImportFormatDetails) -> DataResult<String> {
        read_to_string(&self.import_format_details_path(category))
    }

    /// Compare the registry with the fixture tree
    pub fn audit(&self) -> DataResult<AuditReport> {
        let mut report = AuditReport::default();
        let mut registered = BTreeSet::new();

        for files in all_scenarios() {
            let (input, output) = self.scenario_paths(files);
            if !input.is_file() {
                report.missing_inputs.push(input.clone());
            }
            if !output.is_file() {
                report.missing_outputs.push(output.clone());
            }
            registered.insert(input);
            registered.insert(output);
        }

        for category in ImportFormatDetails::ALL {
            let path = self.import_format_details_path(category);
            if !path.is_file() {
                report.missing_format_details.push(path);
            }
        }

        for group in ScenarioGroup::ALL {
            let folder = self.root.join(group.folder());
            if !folder.is_dir() {
                continue;
            }
            for entry in WalkDir::new(&folder).max_depth(1) {
                let entry = entry.map_err(std::io::Error::from)?;
                let path = entry.path();
                if entry.file_type().is_file()
                    && is_scenario_file(path, group)
                    && !registered.contains(path)
                {
                    report.unregistered.push(path.to_path_buf());
                }
            }
        }
        report.unregistered.sort();

        for path in report.missing_inputs.iter().chain(&report.unregistered) {
            warn!("Fixture audit: {}", path.display());
        }
        debug!(
            "Audited {}: {} missing input(s), {} missing output(s), {} unregistered",
            self.root.display(),
            report.missing_inputs.len(),
            report.missing_outputs.len(),
            report.unregistered.len()
        );

        Ok(report)
    }
}

impl Default for Fixtures {
    fn default() -> Self {
        Self::from_config(&DataConfig::default())
    }
}

/// Whether a file follows the `i_<key>.csv` / `o_<key>.txt` convention
/// without being catalogued or written by a generator
fn is_scenario_file(path: &Path, group: ScenarioGroup) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    if let Some(key) = name.strip_prefix("i_").and_then(|n| n.strip_suffix(".csv")) {
        return lookup(group, key).is_none() && !is_derived_key(group, key);
    }
    if let Some(key) = name.strip_prefix("o_").and_then(|n| n.strip_suffix(".txt")) {
        return lookup(group, key).is_none();
    }
    false
}

/// A catalogued key followed by a suffix the record and file generators write
fn is_derived_key(group: ScenarioGroup, key: &str) -> bool {
    group.keys().into_iter().any(|known| {
        key.strip_prefix(known).is_some_and(|rest| {
            rest.starts_with(SITE_SUFFIX)
                || rest.starts_with(DIFFERENT_FIRST_NAME_SUFFIX)
                || GENERATED_SUFFIX.is_match(rest)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::file_mappings::{ChildFileMapping, VaccsFileMapping};
    use test_case::test_case;

    #[test]
    fn test_paths_are_joined_to_root() {
        let fixtures = Fixtures::new("/srv/fixtures");
        assert_eq!(
            fixtures.input_path(VaccsFileMapping::Positive),
            PathBuf::from("/srv/fixtures/vaccs/i_positive.csv")
        );
        assert_eq!(
            fixtures.output_path(ChildFileMapping::FixedChild),
            PathBuf::from("/srv/fixtures/child/o_fixed_child.txt")
        );
    }

    #[test_case("child/i_mystery.csv", true ; "unknown key")]
    #[test_case("child/i_positive_old.csv", true ; "stale copy of known input")]
    #[test_case("child/o_positive_v2.txt", true ; "stale copy of known output")]
    #[test_case("child/o_positivewithsite12.txt", true ; "outputs are never derived")]
    #[test_case("child/i_positive.csv", false ; "catalogued")]
    #[test_case("child/i_positivewithsite12.csv", false ; "site list")]
    #[test_case("child/i_positivewithsite12_run7.csv", false ; "site list with token")]
    #[test_case("child/i_positivewith_different_first_name.csv", false ; "renamed list")]
    #[test_case("child/i_fixed_child_1a2b3c4d.csv", false ; "generated")]
    #[test_case("child/i_fixed_child_ci42_1a2b3c4d.csv", false ; "generated with token")]
    #[test_case("child/README.md", false ; "not scenario shaped")]
    fn test_is_scenario_file(path: &str, expected: bool) {
        assert_eq!(is_scenario_file(Path::new(path), ScenarioGroup::Child), expected);
    }
}
