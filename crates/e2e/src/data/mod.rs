//! Test data: fixture registry, record file generators and payload templates

pub mod fhir;
pub mod file_mappings;
pub mod file_utils;
pub mod fixtures;
pub mod generator;
pub mod spreadsheet;
pub mod table;
pub mod template;

pub use fhir::{create_fhir_immunization_payload, FhirPayloadGenerator};
pub use file_mappings::{
    ChildFileMapping, ClassFileMapping, FileMapping, ImportFormatDetails, ScenarioFiles,
    ScenarioGroup, VaccsFileMapping,
};
pub use file_utils::{
    create_child_list_from_file, get_session_id, increment_date_of_birth_for_records,
    read_scenario_list_from_file, set_first_name_for_child_list, set_site_for_child_list,
    RecordFileGenerator,
};
pub use fixtures::{AuditReport, Fixtures};
pub use generator::{child_placeholders, FileGenerator, GeneratedFiles};
pub use template::{Placeholders, Template};
