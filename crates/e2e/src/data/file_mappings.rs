//! Catalogue of named fixture scenarios
//!
//! Each scenario key resolves to an input template (`i_<key>.csv`) and an
//! expected-output file (`o_<key>.txt`) inside its group's folder. Paths are
//! relative to the fixture root and built without touching the filesystem;
//! a missing file only shows up when something reads it.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Folder holding the import format reference texts
pub const IMPORT_FORMAT_DETAILS_FOLDER: &str = "import_format_details";

/// A family of scenarios sharing a fixture folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioGroup {
    Vaccs,
    Child,
    ClassList,
}

impl ScenarioGroup {
    pub const ALL: [ScenarioGroup; 3] = [
        ScenarioGroup::Vaccs,
        ScenarioGroup::Child,
        ScenarioGroup::ClassList,
    ];

    pub fn folder(&self) -> &'static str {
        match self {
            ScenarioGroup::Vaccs => "vaccs",
            ScenarioGroup::Child => "child",
            ScenarioGroup::ClassList => "class_list",
        }
    }

    /// Scenario keys of this group, in declaration order
    pub fn keys(&self) -> Vec<&'static str> {
        match self {
            ScenarioGroup::Vaccs => VaccsFileMapping::ALL.iter().map(|m| m.value()).collect(),
            ScenarioGroup::Child => ChildFileMapping::ALL.iter().map(|m| m.value()).collect(),
            ScenarioGroup::ClassList => ClassFileMapping::ALL.iter().map(|m| m.value()).collect(),
        }
    }

    /// Catalogue entries of this group, ordered by key
    pub fn scenarios(&self) -> impl Iterator<Item = &'static ScenarioFiles> {
        CATALOGUE
            .get(self)
            .into_iter()
            .flat_map(|entries| entries.values())
    }
}

impl fmt::Display for ScenarioGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder())
    }
}

impl FromStr for ScenarioGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vaccs" | "vaccinations" => Ok(ScenarioGroup::Vaccs),
            "child" | "children" => Ok(ScenarioGroup::Child),
            "class_list" | "class" => Ok(ScenarioGroup::ClassList),
            other => Err(format!("unknown scenario group: {}", other)),
        }
    }
}

/// Resolved paths of one scenario, relative to the fixture root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioFiles {
    pub group: ScenarioGroup,
    pub key: &'static str,
    pub folder: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl ScenarioFiles {
    fn new(group: ScenarioGroup, key: &'static str) -> Self {
        let folder = PathBuf::from(group.folder());
        Self {
            group,
            key,
            input: folder.join(input_file_name(key)),
            output: folder.join(output_file_name(key)),
            folder,
        }
    }
}

pub(crate) fn input_file_name(key: &str) -> String {
    format!("i_{}.csv", key)
}

pub(crate) fn output_file_name(key: &str) -> String {
    format!("o_{}.txt", key)
}

/// A typed scenario key belonging to one group
pub trait FileMapping: Copy + fmt::Debug {
    const GROUP: ScenarioGroup;

    /// Stable key used in fixture filenames
    fn value(&self) -> &'static str;

    fn folder(&self) -> PathBuf {
        PathBuf::from(Self::GROUP.folder())
    }

    fn input_template_path(&self) -> PathBuf {
        self.folder().join(input_file_name(self.value()))
    }

    fn output_path(&self) -> PathBuf {
        self.folder().join(output_file_name(self.value()))
    }

    /// Catalogue entry for this key
    fn files(&self) -> ScenarioFiles {
        ScenarioFiles::new(Self::GROUP, self.value())
    }
}

macro_rules! file_mapping {
    (
        $(#[$meta:meta])*
        $name:ident => $group:expr, {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl FileMapping for $name {
            const GROUP: ScenarioGroup = $group;

            fn value(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|m| m.value() == s)
                    .ok_or_else(|| format!("unknown {} scenario: {}", $group, s))
            }
        }
    };
}

file_mapping! {
    /// Vaccination record imports
    VaccsFileMapping => ScenarioGroup::Vaccs, {
        ClinicNameCase => "clinic_name_case",
        Dup1 => "dup_1",
        Dup2 => "dup_2",
        EmptyFile => "empty",
        FluInjected => "flu_injected",
        FluNasal => "flu_nasal",
        HeaderOnly => "header_only",
        HistFluNivs => "hist_flu_nivs",
        HistFluSystmone => "hist_flu_systmone",
        HistHpv => "hist_hpv",
        HistNegative => "hist_negative",
        HistPositive => "hist_positive",
        HpvDoseTwo => "hpv_dose_two",
        InvalidStructure => "invalid_structure",
        MmrDoseOne => "mmr_dose_one",
        NationalReportingHpv => "national_reporting_hpv",
        NationalReportingNegative => "national_reporting_negative",
        NationalReportingPositive => "national_reporting_positive",
        Negative => "negative",
        NoCareSetting => "no_care_setting",
        NotGiven => "not_given",
        Positive => "positive",
        SnomedVerification => "snomed_verification",
        SystmoneHistNegative => "systmone_hist_negative",
        SystmoneNegative => "systmone_negative",
        SystmonePositive => "systmone_positive",
        SystmoneWhitespace => "systmone_whitespace",
        Whitespace => "whitespace",
    }
}

file_mapping! {
    /// Child record imports
    ChildFileMapping => ScenarioGroup::Child, {
        EmptyFile => "empty",
        HeaderOnly => "header_only",
        InvalidStructure => "invalid_structure",
        Negative => "negative",
        Positive => "positive",
        Whitespace => "whitespace",
        FixedChild => "fixed_child",
        RandomChildWithoutNhsNumber => "random_child_without_nhs_number",
    }
}

file_mapping! {
    /// Class list imports
    ClassFileMapping => ScenarioGroup::ClassList, {
        EmptyFile => "empty",
        FixedChild => "fixed_child",
        HeaderOnly => "header_only",
        InvalidStructure => "invalid_structure",
        Negative => "negative",
        Positive => "positive",
        RandomChild => "random_child",
        TwoFixedChildren => "two_fixed_children",
        TwoFixedChildrenHomeschool => "two_fixed_children_homeschool",
        Whitespace => "whitespace",
        WrongYearGroup => "wrong_year_group",
    }
}

static CATALOGUE: Lazy<BTreeMap<ScenarioGroup, BTreeMap<&'static str, ScenarioFiles>>> =
    Lazy::new(|| {
        ScenarioGroup::ALL
            .iter()
            .map(|&group| {
                let entries = group
                    .keys()
                    .into_iter()
                    .map(|key| (key, ScenarioFiles::new(group, key)))
                    .collect();
                (group, entries)
            })
            .collect()
    });

/// Look up a scenario by group and key
pub fn lookup(group: ScenarioGroup, key: &str) -> Option<&'static ScenarioFiles> {
    CATALOGUE.get(&group).and_then(|entries| entries.get(key))
}

/// Every catalogued scenario, grouped and ordered by key
pub fn all_scenarios() -> impl Iterator<Item = &'static ScenarioFiles> {
    CATALOGUE.values().flat_map(|entries| entries.values())
}

/// Category of an import format reference text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportFormatDetails {
    Class,
    Child,
    Vaccs,
}

impl ImportFormatDetails {
    pub const ALL: [ImportFormatDetails; 3] = [
        ImportFormatDetails::Class,
        ImportFormatDetails::Child,
        ImportFormatDetails::Vaccs,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            ImportFormatDetails::Class => "class",
            ImportFormatDetails::Child => "child",
            ImportFormatDetails::Vaccs => "vaccs",
        }
    }

    pub fn folder(&self) -> PathBuf {
        PathBuf::from(IMPORT_FORMAT_DETAILS_FOLDER)
    }

    /// Path of the reference text for this category
    pub fn import_format_details_path(&self) -> PathBuf {
        self.folder().join(format!("{}.txt", self.value()))
    }
}

impl FromStr for ImportFormatDetails {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImportFormatDetails::ALL
            .into_iter()
            .find(|c| c.value() == s.trim())
            .ok_or_else(|| format!("unknown import format category: {}", s))
    }
}
