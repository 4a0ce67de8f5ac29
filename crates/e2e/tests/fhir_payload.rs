//! FHIR Immunization payload tests against the shipped template

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;
use tempfile::TempDir;

use mavis_common::text::UTC_DATETIME_FORMAT;
use mavis_common::{Address, Child, DeliverySite, RecordBundle, School, Vaccine};
use mavis_e2e::data::{create_fhir_immunization_payload, FhirPayloadGenerator, Template};
use mavis_e2e::{DataConfig, DataError, SubstitutionMode};

fn vaccine() -> Vaccine {
    Vaccine::new("Gardasil 9", "756", "240532009", "Human papillomavirus infection")
}

fn child() -> Child {
    Child::new(
        "Jo",
        "Smith",
        "9990000123",
        NaiveDate::from_ymd_opt(2012, 9, 1).unwrap(),
    )
    .with_address(Address::new("1 High Street", "", "Leeds", "LS1 1AA"))
}

fn school() -> School {
    School::new("Test Academy", "123456")
}

fn vaccination_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap()
}

fn payload() -> Value {
    create_fhir_immunization_payload(
        &vaccine(),
        &child(),
        &school(),
        DeliverySite::LeftArmUpper,
        vaccination_time(),
    )
    .unwrap()
}

#[test]
fn payload_carries_domain_values() {
    let payload = payload();
    let patient = &payload["contained"][0];

    assert_eq!(payload["resourceType"], "Immunization");
    assert_eq!(payload["vaccineCode"]["coding"][0]["code"], "756");
    assert_eq!(payload["vaccineCode"]["coding"][0]["display"], "Gardasil 9");
    assert_eq!(patient["identifier"][0]["value"], "9990000123");
    assert_eq!(patient["name"][0]["family"], "Smith");
    assert_eq!(patient["name"][0]["given"][0], "Jo");
    assert_eq!(patient["gender"], "unknown");
    assert_eq!(patient["birthDate"], "2012-09-01");
    assert_eq!(patient["address"][0]["postalCode"], "LS1 1AA");
    assert_eq!(payload["location"]["identifier"]["value"], "123456");
    assert_eq!(payload["site"]["coding"][0]["code"], "368208006");
    assert_eq!(payload["site"]["coding"][0]["display"], "Left arm (upper position)");

    let disease = &payload["protocolApplied"][0]["targetDisease"][0]["coding"][0];
    assert_eq!(disease["code"], "240532009");
    assert_eq!(disease["display"], "Human papillomavirus infection");
}

#[test]
fn timestamps_use_fixed_utc_offset() {
    let before = Utc::now().timestamp();
    let payload = payload();
    let after = Utc::now().timestamp();

    assert_eq!(payload["occurrenceDateTime"], "2025-01-15T10:30:00+00:00");

    let recorded = payload["recorded"].as_str().unwrap();
    assert!(recorded.ends_with("+00:00"));
    let recorded = chrono::NaiveDateTime::parse_from_str(recorded, UTC_DATETIME_FORMAT)
        .unwrap()
        .and_utc()
        .timestamp();
    assert!(recorded >= before && recorded <= after);
}

#[test]
fn immunization_id_is_fresh_per_call() {
    let first = payload();
    let second = payload();

    let id_a = first["identifier"][0]["value"].as_str().unwrap();
    let id_b = second["identifier"][0]["value"].as_str().unwrap();
    assert_ne!(id_a, id_b);
    assert!(uuid::Uuid::parse_str(id_a).is_ok());
}

#[test]
fn quotes_in_names_do_not_break_the_payload() {
    let mut child = child();
    child.last_name = "O\"Neil".to_string();

    let payload = create_fhir_immunization_payload(
        &vaccine(),
        &child,
        &school(),
        DeliverySite::Nose,
        vaccination_time(),
    )
    .unwrap();
    assert_eq!(payload["contained"][0]["name"][0]["family"], "O\"Neil");
}

#[test]
fn delimiter_in_value_is_rejected() {
    let mut child = child();
    child.first_name = "<<VACCINE_CODE>>".to_string();

    let err = create_fhir_immunization_payload(
        &vaccine(),
        &child,
        &school(),
        DeliverySite::RightThigh,
        vaccination_time(),
    )
    .unwrap_err();
    assert!(matches!(err, DataError::PlaceholderCollision { .. }));
}

#[test]
fn strict_template_must_use_every_token() {
    let template = Template::new(
        "partial",
        r#"{"id": "<<IMMUNIZATION_ID>>", "code": "<<VACCINE_CODE>>"}"#,
    );

    let strict = FhirPayloadGenerator::new(template.clone(), SubstitutionMode::Strict);
    let err = strict
        .create(&vaccine(), &child(), &school(), DeliverySite::LeftThigh, vaccination_time())
        .unwrap_err();
    assert!(matches!(err, DataError::UnusedPlaceholder(_)));

    let permissive = FhirPayloadGenerator::new(template, SubstitutionMode::Permissive);
    let payload = permissive
        .create(&vaccine(), &child(), &school(), DeliverySite::LeftThigh, vaccination_time())
        .unwrap();
    assert_eq!(payload["code"], "756");
}

#[test]
fn generator_follows_config_and_bundle() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("mini.json.template"),
        r#"{
            "nhs": "<<PATIENT_NHS_NUMBER>>",
            "site": "<<DELIVERY_SITE_CODE>>",
            "other": "<<SCHOOL_NAME>>"
        }"#,
    )
    .unwrap();

    let config = DataConfig {
        fixture_root: tmp.path().to_path_buf(),
        fhir_template: "mini.json.template".into(),
        substitution: SubstitutionMode::Permissive,
        ..Default::default()
    };
    let bundle = RecordBundle {
        vaccine: vaccine(),
        child: child(),
        school: school(),
        delivery_site: DeliverySite::RightArmUpper,
        vaccination_time: vaccination_time(),
    };

    let payload = FhirPayloadGenerator::from_config(&config)
        .unwrap()
        .create_from_bundle(&bundle)
        .unwrap();
    assert_eq!(payload["nhs"], "9990000123");
    assert_eq!(payload["site"], "368209003");
    assert_eq!(payload["other"], "<<SCHOOL_NAME>>");
}

#[test]
fn missing_template_is_a_read_error() {
    let config = DataConfig {
        fixture_root: "/nonexistent".into(),
        ..Default::default()
    };
    assert!(matches!(
        FhirPayloadGenerator::from_config(&config).unwrap_err(),
        DataError::Read { .. }
    ));
}
