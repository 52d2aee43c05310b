use csv::Writer;
use serde::Serialize;

use crate::compatibility::CompatibilityOutcome;
use crate::donations::{AvailabilityReport, SearchResults};
use crate::error::CalculatorError;
use crate::request::Response;
use crate::types::CompatibilityReport;

/// Supported response formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Single-line JSON
    #[default]
    Json,
    Pretty,
    Csv,
}

/// Body written on any fatal error
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&CalculatorError> for ErrorResponse {
    fn from(err: &CalculatorError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Renders responses for stdout. Every rendered string ends in a newline.
pub struct ReportGenerator {
    format: ReportFormat,
}

impl ReportGenerator {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, response: &Response) -> Result<String, CalculatorError> {
        match self.format {
            ReportFormat::Json => json_line(response),
            ReportFormat::Pretty => Ok(format!("{}\n", serde_json::to_string_pretty(response)?)),
            ReportFormat::Csv => self.render_csv(response),
        }
    }

    /// Errors are always JSON so callers can parse them uniformly
    pub fn render_error(&self, err: &CalculatorError) -> String {
        let body = ErrorResponse::from(err);
        let rendered = match self.format {
            ReportFormat::Pretty => serde_json::to_string_pretty(&body),
            _ => serde_json::to_string(&body),
        };

        match rendered {
            Ok(text) => format!("{}\n", text),
            Err(_) => format!("{{\"error\":{:?}}}\n", body.error),
        }
    }

    fn render_csv(&self, response: &Response) -> Result<String, CalculatorError> {
        match response {
            Response::Compatibility(CompatibilityOutcome::Report(report)) => {
                compatibility_csv(report)
            }
            Response::Compatibility(invalid @ CompatibilityOutcome::Invalid { .. }) => {
                json_line(invalid)
            }
            Response::Search(results) => search_csv(results),
            Response::Availability(report) => availability_csv(report),
        }
    }
}

fn json_line<T: Serialize>(value: &T) -> Result<String, CalculatorError> {
    Ok(format!("{}\n", serde_json::to_string(value)?))
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String, CalculatorError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| CalculatorError::Render {
            format: "csv",
            message: e.to_string(),
        })?;

    String::from_utf8(bytes).map_err(|e| CalculatorError::Render {
        format: "csv",
        message: e.to_string(),
    })
}

fn compatibility_csv(report: &CompatibilityReport) -> Result<String, CalculatorError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record([
        "compatible",
        "description",
        "is_universal_donor",
        "is_universal_recipient",
    ])?;
    writer.write_record([
        report.compatible.to_string(),
        report.description.clone(),
        report.is_universal_donor.to_string(),
        report.is_universal_recipient.to_string(),
    ])?;

    finish(writer)
}

fn search_csv(results: &SearchResults) -> Result<String, CalculatorError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record([
        "blood_group",
        "units",
        "donor_name",
        "date",
        "location",
        "is_available",
    ])?;

    for donation in &results.donations {
        writer.write_record([
            donation.blood_group.clone(),
            donation.units.to_string(),
            donation.donor_name.clone(),
            donation.date.clone(),
            donation.location.clone(),
            donation.is_available.to_string(),
        ])?;
    }

    finish(writer)
}

fn availability_csv(report: &AvailabilityReport) -> Result<String, CalculatorError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["blood_group", "available", "total", "utilization"])?;

    for (group, stats) in report {
        writer.write_record([
            group.clone(),
            stats.available.to_string(),
            stats.total.to_string(),
            format!("{:.4}", stats.utilization),
        ])?;
    }

    finish(writer)
}
