//! Core domain types for the Mavis suite

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A vaccine product as the immunisation API codes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vaccine {
    /// Brand name shown in the service
    pub name: String,

    /// Product code used by the immunisation API
    pub imms_api_code: String,

    /// SNOMED code of the disease the vaccine targets
    pub target_disease_code: String,

    /// Display text for the target disease code
    pub target_disease_display: String,
}

impl Vaccine {
    pub fn new(
        name: impl Into<String>,
        imms_api_code: impl Into<String>,
        target_disease_code: impl Into<String>,
        target_disease_display: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            imms_api_code: imms_api_code.into(),
            target_disease_code: target_disease_code.into(),
            target_disease_display: target_disease_display.into(),
        }
    }
}

impl fmt::Display for Vaccine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Postal address, ordered the way the consent journey enters it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line_1: String,
    #[serde(default)]
    pub line_2: String,
    pub town: String,
    pub postcode: String,
}

impl Address {
    pub fn new(
        line_1: impl Into<String>,
        line_2: impl Into<String>,
        town: impl Into<String>,
        postcode: impl Into<String>,
    ) -> Self {
        Self {
            line_1: line_1.into(),
            line_2: line_2.into(),
            town: town.into(),
            postcode: postcode.into(),
        }
    }
}

/// A child patient record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    pub first_name: String,
    pub last_name: String,
    pub nhs_number: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub address: Address,
}

impl Child {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        nhs_number: impl Into<String>,
        date_of_birth: NaiveDate,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            nhs_number: nhs_number.into(),
            date_of_birth,
            address: Address::default(),
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }
}

impl fmt::Display for Child {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// A school (or other site) identified by its URN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub name: String,
    pub urn: String,
}

impl School {
    pub fn new(name: impl Into<String>, urn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            urn: urn.into(),
        }
    }
}

impl fmt::Display for School {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Anatomical site a vaccine was delivered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliverySite {
    LeftArmUpper,
    RightArmUpper,
    LeftThigh,
    RightThigh,
    Nose,
}

impl DeliverySite {
    pub const ALL: [DeliverySite; 5] = [
        DeliverySite::LeftArmUpper,
        DeliverySite::RightArmUpper,
        DeliverySite::LeftThigh,
        DeliverySite::RightThigh,
        DeliverySite::Nose,
    ];

    /// Label the service displays for this site
    pub fn value(&self) -> &'static str {
        match self {
            DeliverySite::LeftArmUpper => "Left arm (upper position)",
            DeliverySite::RightArmUpper => "Right arm (upper position)",
            DeliverySite::LeftThigh => "Left thigh",
            DeliverySite::RightThigh => "Right thigh",
            DeliverySite::Nose => "Nose",
        }
    }

    /// SNOMED body structure code sent to the immunisation API
    pub fn imms_api_code(&self) -> &'static str {
        match self {
            DeliverySite::LeftArmUpper => "368208006",
            DeliverySite::RightArmUpper => "368209003",
            DeliverySite::LeftThigh => "61396006",
            DeliverySite::RightThigh => "11207009",
            DeliverySite::Nose => "1797002",
        }
    }
}

impl fmt::Display for DeliverySite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl FromStr for DeliverySite {
    type Err = Error;

    /// Accepts either the snake_case identifier or the display label
    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        DeliverySite::ALL
            .into_iter()
            .find(|site| {
                site.value().eq_ignore_ascii_case(needle)
                    || site.identifier().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| Error::UnknownDeliverySite(s.to_string()))
    }
}

impl DeliverySite {
    fn identifier(&self) -> &'static str {
        match self {
            DeliverySite::LeftArmUpper => "left_arm_upper",
            DeliverySite::RightArmUpper => "right_arm_upper",
            DeliverySite::LeftThigh => "left_thigh",
            DeliverySite::RightThigh => "right_thigh",
            DeliverySite::Nose => "nose",
        }
    }
}

/// Everything needed to describe one administered vaccination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordBundle {
    pub vaccine: Vaccine,
    pub child: Child,
    pub school: School,
    pub delivery_site: DeliverySite,
    pub vaccination_time: DateTime<Utc>,
}

impl RecordBundle {
    /// Parse a bundle from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Check an NHS number's length and modulus 11 check digit
pub fn validate_nhs_number(value: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidNhsNumber {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let digits: Vec<u32> = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_digit(10).ok_or_else(|| invalid("contains a non-digit")))
        .collect::<Result<_>>()?;

    if digits.len() != 10 {
        return Err(invalid("must be 10 digits"));
    }

    let sum: u32 = digits[..9]
        .iter()
        .zip((2..=10).rev())
        .map(|(d, weight)| d * weight)
        .sum();

    let check = match 11 - (sum % 11) {
        11 => 0,
        10 => return Err(invalid("check digit would be 10")),
        n => n,
    };

    if check != digits[9] {
        return Err(invalid("check digit mismatch"));
    }

    Ok(())
}
