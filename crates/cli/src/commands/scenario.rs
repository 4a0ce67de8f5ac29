//! Scenario Commands

use anyhow::{anyhow, Result};
use clap::Subcommand;
use serde::Serialize;

use mavis_e2e::data::file_mappings::{lookup, ScenarioFiles};
use mavis_e2e::data::{Fixtures, ImportFormatDetails, ScenarioGroup};

use crate::output::{
    print_item, print_list, print_message, print_success, print_warning, OutputFormat,
    TableDisplay,
};

#[derive(Subcommand)]
pub enum ScenarioCommands {
    /// List catalogued scenarios
    List {
        /// Only this group (vaccs, child, class_list)
        #[arg(short, long)]
        group: Option<ScenarioGroup>,
    },

    /// Show the input and expected-output paths of a scenario
    Resolve {
        /// Scenario group
        group: ScenarioGroup,

        /// Scenario key, e.g. dup_1
        key: String,
    },

    /// Compare the catalogue with the fixture tree
    Audit,

    /// Print the import format reference text for a category
    FormatDetails {
        /// class, child or vaccs
        category: ImportFormatDetails,
    },
}

/// Scenario display wrapper for serialization
#[derive(Serialize)]
pub struct ScenarioDisplay {
    pub group: String,
    pub key: String,
    pub input: String,
    pub output: String,
    pub on_disk: bool,
}

impl ScenarioDisplay {
    fn new(files: &ScenarioFiles, fixtures: &Fixtures) -> Self {
        let (input, output) = fixtures.scenario_paths(files);
        Self {
            group: files.group.to_string(),
            key: files.key.to_string(),
            on_disk: input.is_file(),
            input: input.display().to_string(),
            output: output.display().to_string(),
        }
    }
}

impl TableDisplay for ScenarioDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Group", "Key", "Input", "Output", "On disk"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.group.clone(),
            self.key.clone(),
            self.input.clone(),
            self.output.clone(),
            if self.on_disk { "yes" } else { "no" }.to_string(),
        ]
    }
}

pub fn execute(cmd: ScenarioCommands, fixtures: &Fixtures, format: OutputFormat) -> Result<()> {
    match cmd {
        ScenarioCommands::List { group } => {
            let groups = match group {
                Some(group) => vec![group],
                None => ScenarioGroup::ALL.to_vec(),
            };
            let displays: Vec<ScenarioDisplay> = groups
                .iter()
                .flat_map(|group| group.scenarios())
                .map(|files| ScenarioDisplay::new(files, fixtures))
                .collect();
            print_list(&displays, format);
        }

        ScenarioCommands::Resolve { group, key } => {
            let files = lookup(group, &key)
                .ok_or_else(|| anyhow!("No {} scenario named '{}'", group, key))?;
            print_item(&ScenarioDisplay::new(files, fixtures), format);
        }

        ScenarioCommands::Audit => {
            let report = fixtures.audit()?;
            if let OutputFormat::Json = format {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.is_clean() {
                print_success(&format!(
                    "Fixture tree at {} matches the catalogue",
                    fixtures.root().display()
                ));
            } else {
                for path in &report.missing_inputs {
                    print_warning(&format!("missing input: {}", path.display()));
                }
                for path in &report.missing_outputs {
                    print_warning(&format!("missing output: {}", path.display()));
                }
                for path in &report.missing_format_details {
                    print_warning(&format!("missing format details: {}", path.display()));
                }
                for path in &report.unregistered {
                    print_warning(&format!("not in catalogue: {}", path.display()));
                }
            }
        }

        ScenarioCommands::FormatDetails { category } => {
            let text = fixtures.read_import_format_details(category)?;
            print_message(text.trim_end(), format);
        }
    }

    Ok(())
}
