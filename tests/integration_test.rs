use anyhow::Result;
use blood_calculator::{
    compatibility::CompatibilityResolver, output::*, request::*, types::*, CalculatorError,
};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;

fn respond(input: &Value) -> Result<Value> {
    let response = process(&input.to_string())?;
    let text = ReportGenerator::new(ReportFormat::Json).render(&response)?;
    Ok(serde_json::from_str(&text)?)
}

fn donations() -> Value {
    json!([
        {"blood_group": "A+", "units": 3, "donor_name": "Ravi", "date": "2024-01-05", "location": "Mumbai", "is_available": true},
        {"blood_group": "O-", "units": 2, "donor_name": "Meera", "date": "2024-02-11", "location": "Delhi", "is_available": false},
        {"blood_group": "A+", "units": 2, "donor_name": "Arjun", "date": "2024-02-19", "location": "Delhi", "is_available": false},
        {"blood_group": "AB-", "units": 1, "donor_name": "Sana", "date": "2024-03-02", "location": "Delhi", "is_available": true}
    ])
}

#[test]
fn test_check_compatibility_end_to_end() -> Result<()> {
    let value = respond(&json!({
        "operation": "check_compatibility",
        "donor": "O-",
        "recipient": "AB-"
    }))?;

    assert_eq!(
        value,
        json!({
            "compatible": true,
            "description": "Can receive from A-, B-, AB-, O-",
            "isUniversalDonor": true,
            "isUniversalRecipient": false
        })
    );
    Ok(())
}

#[test]
fn test_invalid_blood_group_is_not_a_failure() -> Result<()> {
    let value = respond(&json!({
        "operation": "check_compatibility",
        "donor": "XX",
        "recipient": "A+"
    }))?;

    assert_eq!(value, json!({"error": "Invalid blood group"}));
    Ok(())
}

#[test]
fn test_search_donations_end_to_end() -> Result<()> {
    let value = respond(&json!({
        "operation": "search_donations",
        "donations": donations(),
        "location": "Delhi",
        "available_only": false
    }))?;

    let names: Vec<&str> = value["donations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["donorName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Meera", "Arjun", "Sana"]);
    assert_eq!(value["donations"][0]["bloodGroup"], "O-");
    assert_eq!(value["donations"][0]["isAvailable"], false);
    Ok(())
}

#[test]
fn test_search_with_python_style_nulls() -> Result<()> {
    let value = respond(&json!({
        "operation": "search_donations",
        "donations": donations(),
        "blood_group": null,
        "location": null,
        "date_range": null,
        "available_only": true
    }))?;

    assert_eq!(value["donations"].as_array().unwrap().len(), 2);
    Ok(())
}

#[test]
fn test_search_unknown_group_is_empty() -> Result<()> {
    let value = respond(&json!({
        "operation": "search_donations",
        "donations": donations(),
        "blood_group": "B+",
        "available_only": false
    }))?;

    assert_eq!(value, json!({"donations": []}));
    Ok(())
}

#[test]
fn test_calculate_availability_end_to_end() -> Result<()> {
    let value = respond(&json!({
        "operation": "calculate_availability",
        "donations": donations()
    }))?;

    assert_eq!(
        value,
        json!({
            "A+": {"available": 3, "total": 5, "utilization": 0.6},
            "AB-": {"available": 1, "total": 1, "utilization": 1.0}
        })
    );
    Ok(())
}

#[test]
fn test_fatal_errors_render_error_objects() {
    let generator = ReportGenerator::new(ReportFormat::Json);

    for input in ["{not json", r#"{"operation":"transfuse"}"#] {
        let err = process(input).unwrap_err();
        let value: Value = serde_json::from_str(&generator.render_error(&err)).unwrap();

        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object["error"].as_str().unwrap().len() > 0);
    }

    assert!(matches!(
        process(r#"{"operation":"transfuse"}"#),
        Err(CalculatorError::UnknownOperation(_))
    ));
}

#[test]
fn test_request_read_from_file() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(
        file,
        r#"{{"operation":"check_compatibility","donor":"A-","recipient":"A+"}}"#
    )?;

    let input = read_input(Some(file.path()))?;
    let response = process(&input)?;

    match response {
        Response::Compatibility(outcome) => assert!(outcome.report().unwrap().compatible),
        other => panic!("unexpected response: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_missing_input_file_is_io_error() {
    let err = read_input(Some(std::path::Path::new("/nonexistent/request.json"))).unwrap_err();
    assert_eq!(err.kind(), "IoError");
}

fn blood_group() -> impl Strategy<Value = BloodGroup> {
    proptest::sample::select(BloodGroup::ALL.to_vec())
}

proptest! {
    #[test]
    fn compatible_iff_donor_in_recipient_set(donor in blood_group(), recipient in blood_group()) {
        let resolver = CompatibilityResolver::new();
        let outcome = resolver.check(donor.as_str(), recipient.as_str());
        let report = outcome.report().unwrap();

        prop_assert_eq!(
            report.compatible,
            resolver.compatible_donors(recipient).contains(&donor)
        );
        prop_assert_eq!(report.is_universal_donor, donor == BloodGroup::ONegative);
        prop_assert_eq!(report.is_universal_recipient, recipient == BloodGroup::ABPositive);
    }

    #[test]
    fn every_group_receives_from_itself(group in blood_group()) {
        let resolver = CompatibilityResolver::new();
        prop_assert!(resolver.check(group.as_str(), group.as_str()).report().unwrap().compatible);
    }

    #[test]
    fn operations_are_idempotent(
        records in proptest::collection::vec((blood_group(), 0u32..50, any::<bool>()), 0..20),
        available_only in any::<bool>(),
    ) {
        let donations: Vec<Value> = records
            .iter()
            .map(|(group, units, available)| json!({
                "blood_group": group.as_str(),
                "units": units,
                "donor_name": "",
                "date": "",
                "location": "",
                "is_available": available
            }))
            .collect();

        let search = json!({
            "operation": "search_donations",
            "donations": donations,
            "available_only": available_only
        })
        .to_string();
        let availability = json!({
            "operation": "calculate_availability",
            "donations": donations
        })
        .to_string();

        prop_assert_eq!(process(&search).unwrap(), process(&search).unwrap());
        prop_assert_eq!(process(&availability).unwrap(), process(&availability).unwrap());

        if !available_only {
            match process(&search).unwrap() {
                Response::Search(results) => prop_assert_eq!(results.donations.len(), records.len()),
                other => prop_assert!(false, "unexpected response: {:?}", other),
            }
        }
    }
}
