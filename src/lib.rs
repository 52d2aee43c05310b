//! # Blood Calculator
//!
//! Answers blood donation logistics questions over a single JSON request.
//!
//! ## Features
//!
//! - Donor/recipient compatibility checks against the ABO/Rh table
//! - Donation search by blood group, location and availability
//! - Per-group availability and utilization statistics
//! - JSON, pretty JSON and CSV responses

pub mod compatibility;
pub mod donations;
pub mod error;
pub mod output;
pub mod request;
pub mod types;

// Re-export key types
pub use compatibility::{CompatibilityOutcome, CompatibilityResolver};
pub use donations::{AvailabilityAggregator, AvailabilityReport, DonationFilter, SearchCriteria};
pub use error::CalculatorError;
pub use output::{ReportFormat, ReportGenerator};
pub use request::{process, read_input, Request, Response};
pub use types::*;
