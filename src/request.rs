//! Request parsing and dispatch.
//!
//! A request is one JSON object whose `operation` field selects what to do:
//!
//! ```json
//! {"operation": "check_compatibility", "donor": "O-", "recipient": "A+"}
//! ```
//!
//! Parsing happens in two steps so that the three failure kinds stay apart:
//! text that is not JSON is a parse error, an unrecognised `operation` is an
//! unknown operation, and anything wrong with the remaining fields is a
//! malformed request.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::compatibility::{CompatibilityOutcome, CompatibilityResolver};
use crate::donations::{
    AvailabilityAggregator, AvailabilityReport, DonationFilter, SearchCriteria, SearchResults,
};
use crate::error::CalculatorError;
use crate::types::DonationRecord;

pub const OPERATIONS: [&str; 3] = [
    "check_compatibility",
    "search_donations",
    "calculate_availability",
];

/// A validated request
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Request {
    CheckCompatibility {
        donor: String,
        recipient: String,
    },
    SearchDonations {
        donations: Vec<DonationRecord>,
        #[serde(default)]
        blood_group: Option<String>,
        #[serde(default)]
        location: Option<String>,
        #[serde(default)]
        date_range: Option<String>,
        #[serde(default)]
        available_only: Option<bool>,
    },
    CalculateAvailability {
        donations: Vec<AvailabilityInput>,
    },
}

/// Donation as accepted by `calculate_availability`, where only the group,
/// units and availability are required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AvailabilityInput {
    pub blood_group: String,
    pub units: u32,
    pub is_available: bool,
    #[serde(default)]
    pub donor_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location: String,
}

impl From<AvailabilityInput> for DonationRecord {
    fn from(input: AvailabilityInput) -> Self {
        DonationRecord {
            blood_group: input.blood_group,
            units: input.units,
            donor_name: input.donor_name,
            date: input.date,
            location: input.location,
            is_available: input.is_available,
        }
    }
}

/// Successful response body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Compatibility(CompatibilityOutcome),
    Search(SearchResults),
    Availability(AvailabilityReport),
}

impl Request {
    /// Parse raw request text
    pub fn parse(input: &str) -> Result<Self, CalculatorError> {
        let value: Value =
            serde_json::from_str(input).map_err(|e| CalculatorError::Parse(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, CalculatorError> {
        let operation = match value.get("operation") {
            Some(Value::String(operation)) => operation.clone(),
            Some(other) => {
                return Err(CalculatorError::MalformedRequest(format!(
                    "`operation` must be a string, got {}",
                    other
                )))
            }
            None if value.is_object() => {
                return Err(CalculatorError::MalformedRequest(
                    "missing field `operation`".to_string(),
                ))
            }
            None => {
                return Err(CalculatorError::MalformedRequest(
                    "request must be a JSON object".to_string(),
                ))
            }
        };

        if !OPERATIONS.contains(&operation.as_str()) {
            return Err(CalculatorError::UnknownOperation(operation));
        }

        Request::deserialize(value).map_err(|e| CalculatorError::MalformedRequest(e.to_string()))
    }

    pub fn operation(&self) -> &'static str {
        match self {
            Request::CheckCompatibility { .. } => OPERATIONS[0],
            Request::SearchDonations { .. } => OPERATIONS[1],
            Request::CalculateAvailability { .. } => OPERATIONS[2],
        }
    }

    /// Run the request against the static table and the supplied donations
    pub fn execute(self) -> Response {
        info!("Running {}", self.operation());

        match self {
            Request::CheckCompatibility { donor, recipient } => {
                let resolver = CompatibilityResolver::new();
                Response::Compatibility(resolver.check(&donor, &recipient))
            }
            Request::SearchDonations {
                donations,
                blood_group,
                location,
                date_range,
                available_only,
            } => {
                let criteria = SearchCriteria {
                    blood_group: blood_group.unwrap_or_default(),
                    location: location.unwrap_or_default(),
                    date_range: date_range.unwrap_or_default(),
                    available_only: available_only.unwrap_or(true),
                };
                debug!(?criteria, "searching {} donations", donations.len());

                Response::Search(DonationFilter::new().search(&donations, &criteria))
            }
            Request::CalculateAvailability { donations } => {
                let records: Vec<DonationRecord> =
                    donations.into_iter().map(DonationRecord::from).collect();
                Response::Availability(AvailabilityAggregator::new().calculate(&records))
            }
        }
    }
}

/// Parse and run one request
pub fn process(input: &str) -> Result<Response, CalculatorError> {
    let request = Request::parse(input)?;
    Ok(request.execute())
}

/// Read the whole request text from a file, or from stdin when no path is given
pub fn read_input(path: Option<&Path>) -> Result<String, CalculatorError> {
    let input = match path {
        Some(path) => {
            debug!("Reading request from {}", path.display());
            fs::read_to_string(path)?
        }
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    Ok(input)
}
