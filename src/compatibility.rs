use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::types::{BloodGroup, CompatibilityReport};
use crate::types::BloodGroup::*;

/// Static compatibility data for one recipient group
#[derive(Debug)]
pub struct CompatibilityEntry {
    /// Groups that may donate to this group, always including itself
    pub compatible_donors: &'static [BloodGroup],
    pub description: &'static str,
    pub is_universal_donor: bool,
    pub is_universal_recipient: bool,
}

lazy_static! {
    static ref COMPATIBILITY_TABLE: HashMap<BloodGroup, CompatibilityEntry> = {
        let mut table = HashMap::with_capacity(BloodGroup::ALL.len());
        table.insert(
            APositive,
            CompatibilityEntry {
                compatible_donors: &[APositive, ANegative, OPositive, ONegative],
                description: "Can receive from A+, A-, O+, O-",
                is_universal_donor: false,
                is_universal_recipient: false,
            },
        );
        table.insert(
            ANegative,
            CompatibilityEntry {
                compatible_donors: &[ANegative, ONegative],
                description: "Can receive from A- and O-",
                is_universal_donor: false,
                is_universal_recipient: false,
            },
        );
        table.insert(
            BPositive,
            CompatibilityEntry {
                compatible_donors: &[BPositive, BNegative, OPositive, ONegative],
                description: "Can receive from B+, B-, O+, O-",
                is_universal_donor: false,
                is_universal_recipient: false,
            },
        );
        table.insert(
            BNegative,
            CompatibilityEntry {
                compatible_donors: &[BNegative, ONegative],
                description: "Can receive from B- and O-",
                is_universal_donor: false,
                is_universal_recipient: false,
            },
        );
        table.insert(
            ABPositive,
            CompatibilityEntry {
                compatible_donors: &BloodGroup::ALL,
                description: "Can receive from all blood types",
                is_universal_donor: false,
                is_universal_recipient: true,
            },
        );
        table.insert(
            ABNegative,
            CompatibilityEntry {
                compatible_donors: &[ANegative, BNegative, ABNegative, ONegative],
                description: "Can receive from A-, B-, AB-, O-",
                is_universal_donor: false,
                is_universal_recipient: false,
            },
        );
        table.insert(
            OPositive,
            CompatibilityEntry {
                compatible_donors: &[OPositive, ONegative],
                description: "Can receive from O+ and O-",
                is_universal_donor: false,
                is_universal_recipient: false,
            },
        );
        table.insert(
            ONegative,
            CompatibilityEntry {
                compatible_donors: &[ONegative],
                description: "Can receive from O- only",
                is_universal_donor: true,
                is_universal_recipient: false,
            },
        );
        table
    };
}

/// Result of a compatibility check.
///
/// An unknown blood group is an ordinary answer here, not a failure, so it
/// serializes to `{"error": "Invalid blood group"}` alongside a zero exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CompatibilityOutcome {
    Report(CompatibilityReport),
    Invalid { error: String },
}

impl CompatibilityOutcome {
    pub fn report(&self) -> Option<&CompatibilityReport> {
        match self {
            CompatibilityOutcome::Report(report) => Some(report),
            CompatibilityOutcome::Invalid { .. } => None,
        }
    }
}

/// Donor/recipient compatibility lookups over the static table
pub struct CompatibilityResolver;

impl CompatibilityResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn entry(&self, group: BloodGroup) -> &'static CompatibilityEntry {
        // Every variant is inserted above
        &COMPATIBILITY_TABLE[&group]
    }

    /// Check whether `donor` may give blood to `recipient`
    pub fn check(&self, donor: &str, recipient: &str) -> CompatibilityOutcome {
        let groups = donor
            .parse::<BloodGroup>()
            .and_then(|d| recipient.parse::<BloodGroup>().map(|r| (d, r)));

        match groups {
            Ok((donor, recipient)) => {
                CompatibilityOutcome::Report(self.check_groups(donor, recipient))
            }
            Err(err) => {
                warn!(donor, recipient, kind = err.kind(), "rejecting compatibility check");
                CompatibilityOutcome::Invalid {
                    error: err.to_string(),
                }
            }
        }
    }

    pub fn check_groups(&self, donor: BloodGroup, recipient: BloodGroup) -> CompatibilityReport {
        let recipient_entry = self.entry(recipient);
        let compatible = recipient_entry.compatible_donors.contains(&donor);

        debug!(%donor, %recipient, compatible, "compatibility lookup");

        CompatibilityReport {
            compatible,
            description: recipient_entry.description.to_string(),
            is_universal_donor: self.entry(donor).is_universal_donor,
            is_universal_recipient: recipient_entry.is_universal_recipient,
        }
    }

    /// Groups that may donate to `recipient`
    pub fn compatible_donors(&self, recipient: BloodGroup) -> &'static [BloodGroup] {
        self.entry(recipient).compatible_donors
    }

    /// Groups that `donor` may give to, in canonical order
    pub fn compatible_recipients(&self, donor: BloodGroup) -> Vec<BloodGroup> {
        BloodGroup::ALL
            .iter()
            .copied()
            .filter(|recipient| self.compatible_donors(*recipient).contains(&donor))
            .collect()
    }
}

impl Default for CompatibilityResolver {
    fn default() -> Self {
        Self::new()
    }
}
