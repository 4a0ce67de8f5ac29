//! Fixture files generated from `<<TOKEN>>` CSV templates

use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use mavis_common::text::format_date;
use mavis_common::{Child, School};

use crate::config::{DataConfig, SubstitutionMode};
use crate::data::file_mappings::FileMapping;
use crate::data::file_utils::RecordFileGenerator;
use crate::data::fixtures::Fixtures;
use crate::data::template::{Placeholders, Template};
use crate::error::DataResult;

/// Paths handed to an import journey
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    /// Rendered file to upload
    pub input: PathBuf,

    /// Expected page text for the scenario (not rendered)
    pub expected_output: PathBuf,
}

/// Standard child and school tokens used by the CSV templates
pub fn child_placeholders(child: &Child, school: &School) -> DataResult<Placeholders> {
    Placeholders::new()
        .with("CHILD_FIRST_NAME", child.first_name.as_str())?
        .with("CHILD_LAST_NAME", child.last_name.as_str())?
        .with("CHILD_NHS_NUMBER", child.nhs_number.as_str())?
        .with("CHILD_DATE_OF_BIRTH", format_date(child.date_of_birth))?
        .with("CHILD_POSTCODE", child.address.postcode.as_str())?
        .with("SCHOOL_URN", school.urn.as_str())?
        .with("SCHOOL_NAME", school.name.as_str())
}

/// Renders scenario templates into uniquely named upload files
#[derive(Debug, Clone)]
pub struct FileGenerator {
    fixtures: Fixtures,
    output_dir: PathBuf,
    records: RecordFileGenerator,
}

impl FileGenerator {
    pub fn new(config: &DataConfig) -> Self {
        Self {
            fixtures: Fixtures::from_config(config),
            output_dir: config.output_dir(),
            records: RecordFileGenerator::new(config.run_token.clone()),
        }
    }

    pub fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generator for derived record files, sharing this run's token
    pub fn records(&self) -> &RecordFileGenerator {
        &self.records
    }

    /// Render a scenario's input template with `placeholders`
    ///
    /// CSV templates use only some of the standard tokens, so substitution
    /// is permissive. Values are quoted as CSV fields where needed.
    pub fn generate<M: FileMapping>(
        &self,
        mapping: M,
        placeholders: &Placeholders,
    ) -> DataResult<GeneratedFiles> {
        let template_path = self.fixtures.input_path(mapping);
        let rendered = Template::load(&template_path)?
            .render_csv(placeholders, SubstitutionMode::Permissive)?;

        std::fs::create_dir_all(&self.output_dir)?;
        let input = self.output_dir.join(self.generated_file_name(&template_path));
        std::fs::write(&input, rendered)?;

        info!("Generated {:?} input at {}", mapping, input.display());
        Ok(GeneratedFiles {
            input,
            expected_output: self.fixtures.output_path(mapping),
        })
    }

    fn generated_file_name(&self, template_path: &Path) -> String {
        let stem = template_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let unique = Uuid::new_v4().simple().to_string();
        match self.records.run_token() {
            Some(token) => format!("{}_{}_{}.csv", stem, token, &unique[..8]),
            None => format!("{}_{}.csv", stem, &unique[..8]),
        }
    }
}

impl Default for FileGenerator {
    fn default() -> Self {
        Self::new(&DataConfig::default())
    }
}
