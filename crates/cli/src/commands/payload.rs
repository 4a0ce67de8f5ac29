//! Payload Commands

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::PathBuf;
use tracing::warn;

use mavis_common::{validate_nhs_number, RecordBundle};
use mavis_e2e::data::FhirPayloadGenerator;
use mavis_e2e::DataConfig;

#[derive(Subcommand)]
pub enum PayloadCommands {
    /// Build a FHIR Immunization resource from a record bundle
    Fhir {
        /// JSON file with vaccine, child, school, delivery_site and vaccination_time
        bundle: PathBuf,

        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },
}

pub fn execute(cmd: PayloadCommands, config: &DataConfig) -> Result<()> {
    match cmd {
        PayloadCommands::Fhir { bundle, compact } => {
            let json = std::fs::read_to_string(&bundle)
                .with_context(|| format!("reading bundle {}", bundle.display()))?;
            let bundle = RecordBundle::from_json(&json)?;

            if let Err(e) = validate_nhs_number(&bundle.child.nhs_number) {
                warn!("{}", e);
            }

            let payload = FhirPayloadGenerator::from_config(config)?.create_from_bundle(&bundle)?;
            let rendered = if compact {
                serde_json::to_string(&payload)?
            } else {
                serde_json::to_string_pretty(&payload)?
            };
            println!("{}", rendered);
        }
    }

    Ok(())
}
