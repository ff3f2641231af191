//! Configuration issues.
//!
//! Validation never fails hard: every check produces a [`ConfigIssue`] with a
//! severity, and callers decide whether errors are fatal.
//!
//! ```
//! use chorus_domain::ScoringConfig;
//!
//! let issues = ScoringConfig::default().validate();
//! assert!(issues.is_empty());
//! ```

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: a default is used instead.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigIssueCode {
    /// Factor weights do not add up to 1.0.
    WeightsDoNotSumToOne { sum: f64 },
    /// A numeric setting is outside its allowed range.
    OutOfRange { field: String, value: String },
    /// A string setting is not one of the known values.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    /// Issue for a string field that does not parse into one of `valid_values`.
    pub fn invalid_enum(field: &str, value: &str, valid_values: &[&str], fallback: &str) -> Self {
        Self::warning(
            ConfigIssueCode::InvalidEnumValue {
                field: field.to_string(),
                value: value.to_string(),
                valid_values: valid_values.iter().map(|v| v.to_string()).collect(),
            },
            format!(
                "{}: unknown value '{}', falling back to '{}'",
                field, value, fallback
            ),
        )
    }
}

/// Check whether any issues are errors (i.e. fatal).
pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_enum_message() {
        let issue = ConfigIssue::invalid_enum(
            "auto_run.strategy",
            "loudest",
            &["round-robin", "random", "intelligent"],
            "intelligent",
        );
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(
            issue.message,
            "auto_run.strategy: unknown value 'loudest', falling back to 'intelligent'"
        );
        assert!(matches!(
            issue.code,
            ConfigIssueCode::InvalidEnumValue { ref valid_values, .. } if valid_values.len() == 3
        ));
    }

    #[test]
    fn test_has_errors() {
        let warning = ConfigIssue::warning(
            ConfigIssueCode::OutOfRange {
                field: "x".to_string(),
                value: "1".to_string(),
            },
            "w",
        );
        assert!(!has_errors(std::slice::from_ref(&warning)));
        let error = ConfigIssue::error(ConfigIssueCode::WeightsDoNotSumToOne { sum: 0.7 }, "e");
        assert!(has_errors(&[warning, error]));
    }
}
