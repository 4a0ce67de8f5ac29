//! Record File Commands

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use mavis_e2e::data::{
    create_child_list_from_file, get_session_id, increment_date_of_birth_for_records,
    read_scenario_list_from_file, RecordFileGenerator,
};

use crate::output::{print_message, print_success, print_values, OutputFormat};

#[derive(Subcommand)]
pub enum RecordCommands {
    /// List record names as "LAST, First"
    Names {
        /// CSV record file
        file: PathBuf,

        /// Read PERSON_SURNAME/PERSON_FORENAME (vaccination files)
        #[arg(long)]
        vaccinations: bool,
    },

    /// Add one day to every CHILD_DATE_OF_BIRTH, in place
    ShiftDob {
        /// CSV record file
        file: PathBuf,
    },

    /// Append a site identifier to every CHILD_SCHOOL_URN
    SetSite {
        /// CSV record file
        file: PathBuf,

        /// Site identifier to append
        site: String,
    },

    /// Set every CHILD_FIRST_NAME to the same value
    SetFirstName {
        /// CSV record file
        file: PathBuf,

        /// First name to use
        name: String,
    },

    /// Print the first SESSION_ID of a vaccinations workbook
    SessionId {
        /// Workbook with a Vaccinations sheet
        workbook: PathBuf,
    },

    /// Print the TEST_DESC_IGNORED descriptions of a file
    Description {
        /// CSV record file
        file: PathBuf,
    },
}

pub fn execute(
    cmd: RecordCommands,
    records: &RecordFileGenerator,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        RecordCommands::Names { file, vaccinations } => {
            let names = create_child_list_from_file(&file, vaccinations)?;
            print_values(&names, format);
        }

        RecordCommands::ShiftDob { file } => {
            increment_date_of_birth_for_records(&file)?;
            print_success(&format!("Dates of birth in {} moved one day later", file.display()));
        }

        RecordCommands::SetSite { file, site } => {
            let path = records.set_site_for_child_list(&file, &site)?;
            print_message(&path.display().to_string(), format);
        }

        RecordCommands::SetFirstName { file, name } => {
            let path = records.set_first_name_for_child_list(&file, &name)?;
            print_message(&path.display().to_string(), format);
        }

        RecordCommands::SessionId { workbook } => {
            let session_id = get_session_id(&workbook)?;
            print_message(&session_id, format);
        }

        RecordCommands::Description { file } => match read_scenario_list_from_file(&file)? {
            Some(description) => print_message(&description, format),
            None => print_message("No scenario description", format),
        },
    }

    Ok(())
}
