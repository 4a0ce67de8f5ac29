//! FHIR R4 Immunization payloads built from the shipped template

use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

use mavis_common::text::{format_date, format_utc_datetime};
use mavis_common::{current_datetime, Child, DeliverySite, RecordBundle, School, Vaccine};

use crate::config::{DataConfig, SubstitutionMode};
use crate::data::template::{Placeholders, Template};
use crate::error::DataResult;

/// The child model carries no gender, so the payload always says unknown
pub const PATIENT_GENDER: &str = "unknown";

/// Placeholder values for one immunisation, before the template is applied
pub fn immunization_placeholders(
    vaccine: &Vaccine,
    child: &Child,
    school: &School,
    delivery_site: DeliverySite,
    vaccination_time: DateTime<Utc>,
) -> DataResult<Placeholders> {
    let immunization_id = Uuid::new_v4().to_string();

    Placeholders::new()
        .with("IMMUNIZATION_ID", immunization_id)?
        .with("VACCINE_CODE", vaccine.imms_api_code.as_str())?
        .with("VACCINE_NAME", vaccine.name.as_str())?
        .with("PATIENT_NHS_NUMBER", child.nhs_number.as_str())?
        .with("PATIENT_FAMILY_NAME", child.last_name.as_str())?
        .with("PATIENT_GIVEN_NAME", child.first_name.as_str())?
        .with("PATIENT_GENDER", PATIENT_GENDER)?
        .with("PATIENT_BIRTH_DATE", format_date(child.date_of_birth))?
        .with("PATIENT_POSTAL_CODE", child.address.postcode.as_str())?
        .with("VACCINATION_TIME", format_utc_datetime(vaccination_time))?
        .with("RECORDED_TIME", format_utc_datetime(current_datetime()))?
        .with("SCHOOL_URN", school.urn.as_str())?
        .with("DELIVERY_SITE_CODE", delivery_site.imms_api_code())?
        .with("DELIVERY_SITE_DISPLAY", delivery_site.value())?
        .with("TARGET_DISEASE_CODE", vaccine.target_disease_code.as_str())?
        .with("TARGET_DISEASE_DISPLAY", vaccine.target_disease_display.as_str())
}

/// Builds Immunization resources from a template file
#[derive(Debug, Clone)]
pub struct FhirPayloadGenerator {
    template: Template,
    mode: SubstitutionMode,
}

impl FhirPayloadGenerator {
    pub fn new(template: Template, mode: SubstitutionMode) -> Self {
        Self { template, mode }
    }

    /// Load the template named by the configuration
    pub fn from_config(config: &DataConfig) -> DataResult<Self> {
        Self::from_path(&config.fhir_template_path(), config.substitution)
    }

    pub fn from_path(path: &Path, mode: SubstitutionMode) -> DataResult<Self> {
        Ok(Self::new(Template::load(path)?, mode))
    }

    /// Fill the template for one vaccination and parse it
    pub fn create(
        &self,
        vaccine: &Vaccine,
        child: &Child,
        school: &School,
        delivery_site: DeliverySite,
        vaccination_time: DateTime<Utc>,
    ) -> DataResult<serde_json::Value> {
        let placeholders =
            immunization_placeholders(vaccine, child, school, delivery_site, vaccination_time)?;
        let payload = self.template.render_json(&placeholders, self.mode)?;

        debug!(
            "Built Immunization {} for {} ({})",
            placeholders.get("IMMUNIZATION_ID").unwrap_or_default(),
            child,
            vaccine
        );
        Ok(payload)
    }

    pub fn create_from_bundle(&self, bundle: &RecordBundle) -> DataResult<serde_json::Value> {
        self.create(
            &bundle.vaccine,
            &bundle.child,
            &bundle.school,
            bundle.delivery_site,
            bundle.vaccination_time,
        )
    }
}

/// Immunization resource from the default fixture template, strictly checked
pub fn create_fhir_immunization_payload(
    vaccine: &Vaccine,
    child: &Child,
    school: &School,
    delivery_site: DeliverySite,
    vaccination_time: DateTime<Utc>,
) -> DataResult<serde_json::Value> {
    FhirPayloadGenerator::from_config(&DataConfig::default())?.create(
        vaccine,
        child,
        school,
        delivery_site,
        vaccination_time,
    )
}
