use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CalculatorError;

/// ABO/Rh blood group
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    ABPositive,
    #[serde(rename = "AB-")]
    ABNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::ABPositive,
        BloodGroup::ABNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::ABPositive => "AB+",
            BloodGroup::ABNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A Positive",
            BloodGroup::ANegative => "A Negative",
            BloodGroup::BPositive => "B Positive",
            BloodGroup::BNegative => "B Negative",
            BloodGroup::ABPositive => "AB Positive",
            BloodGroup::ABNegative => "AB Negative",
            BloodGroup::OPositive => "O Positive",
            BloodGroup::ONegative => "O Negative",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = CalculatorError;

    /// Exact, case-sensitive match on the canonical spelling ("AB+", not "ab+")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BloodGroup::ALL
            .iter()
            .copied()
            .find(|group| group.as_str() == s)
            .ok_or_else(|| CalculatorError::InvalidBloodGroup(s.to_string()))
    }
}

/// A batch of donated blood units as supplied by the caller.
///
/// `blood_group` stays a raw string: filtering and grouping compare it
/// verbatim, so records with unrecognised groups pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationRecord {
    #[serde(rename(serialize = "bloodGroup"))]
    pub blood_group: String,
    pub units: u32,
    #[serde(rename(serialize = "donorName"))]
    pub donor_name: String,
    pub date: String,
    pub location: String,
    #[serde(rename(serialize = "isAvailable"))]
    pub is_available: bool,
}

impl DonationRecord {
    pub fn new(blood_group: impl Into<String>, units: u32, is_available: bool) -> Self {
        Self {
            blood_group: blood_group.into(),
            units,
            donor_name: String::new(),
            date: String::new(),
            location: String::new(),
            is_available,
        }
    }

    pub fn with_donor(mut self, donor_name: impl Into<String>) -> Self {
        self.donor_name = donor_name.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

/// Outcome of a donor/recipient compatibility check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityReport {
    pub compatible: bool,
    pub description: String,
    pub is_universal_donor: bool,
    pub is_universal_recipient: bool,
}

/// Availability statistics for one blood group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupAvailability {
    pub available: u64,
    pub total: u64,
    pub utilization: f64,
}
