//! Error types for request handling.

/// Everything that can go wrong while answering one request
#[derive(Debug, thiserror::Error)]
pub enum CalculatorError {
    #[error("Error parsing JSON input: {0}")]
    Parse(String),

    #[error("Invalid operation: {0}")]
    UnknownOperation(String),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Non-fatal for `check_compatibility`, where it is reported as a result
    #[error("Invalid blood group")]
    InvalidBloodGroup(String),

    #[error("Failed to render {format} output: {message}")]
    Render { format: &'static str, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CalculatorError {
    /// Short machine-readable kind, used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            CalculatorError::Parse(_) => "ParseError",
            CalculatorError::UnknownOperation(_) => "UnknownOperation",
            CalculatorError::MalformedRequest(_) => "MalformedRequest",
            CalculatorError::InvalidBloodGroup(_) => "InvalidBloodGroup",
            CalculatorError::Render { .. } => "RenderError",
            CalculatorError::Io(_) => "IoError",
        }
    }
}

impl From<csv::Error> for CalculatorError {
    fn from(e: csv::Error) -> Self {
        CalculatorError::Render {
            format: "csv",
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for CalculatorError {
    fn from(e: serde_json::Error) -> Self {
        CalculatorError::Render {
            format: "json",
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CalculatorError::UnknownOperation("frobnicate".into()).to_string(),
            "Invalid operation: frobnicate"
        );
        assert_eq!(
            CalculatorError::InvalidBloodGroup("XX".into()).to_string(),
            "Invalid blood group"
        );
        assert_eq!(CalculatorError::Parse("eof".into()).kind(), "ParseError");
    }
}
