//! Field-level input validation.

use serde::Serialize;

/// A single problem with one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// Every field issue found while validating one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    issues: Vec<FieldIssue>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an error with a single issue.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Returns `Ok(())` if no issue was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Checks that `value` is non-blank and at most `max_len` characters,
    /// returning the trimmed text.
    pub fn text(&mut self, field: &str, label: &str, value: &str, max_len: usize) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.push(field, format!("{label} is required"));
        } else if trimmed.chars().count() > max_len {
            self.push(
                field,
                format!("{label} must be at most {max_len} characters"),
            );
        }
        trimmed.to_string()
    }

    /// Checks that `value` fits in `min..=u32::MAX`.
    pub fn count(&mut self, field: &str, label: &str, value: i64, min: u32) -> u32 {
        if value > i64::from(u32::MAX) {
            self.push(field, format!("{label} is too large"));
            return 0;
        }
        if value < i64::from(min) {
            let message = if min == 0 {
                format!("{label} must not be negative")
            } else {
                format!("{label} must be at least {min}")
            };
            self.push(field, message);
            return 0;
        }
        u32::try_from(value).unwrap_or(0)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .issues
            .iter()
            .map(|i| format!("{}: {}", i.field, i.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
